use crate::constraints::ConstraintState;
use crate::letters::{LetterSet, Word, WORD_LENGTH};
use crate::results::WordleError;

/// Builds a guess that satisfies every known constraint, whether or not it is a real word.
///
/// Used when no word in the dictionary is still possible. The construction is deterministic:
///
/// 1. Confirmed slots are filled first.
/// 2. Each required letter that is not yet placed goes into the lowest-indexed open slot that
///    still allows it. Letters with the fewest open slots are placed first, ties going
///    alphabetically. If that leaves a later letter with no slot, earlier choices are revisited.
/// 3. Every other slot gets the alphabetically first allowed letter that is not known to be
///    absent, preferring letters not already in the guess.
///
/// Fails with [`WordleError::UnsatisfiableConstraints`] if some letter or slot cannot be filled,
/// which only happens when contradictory feedback was recorded.
pub fn synthesize_guess(state: &ConstraintState) -> Result<Word, WordleError> {
    let mut guess: [Option<char>; WORD_LENGTH] = [None; WORD_LENGTH];
    for (slot, letter) in state.confirmed_positions() {
        guess[slot] = Some(letter);
    }

    let placed: LetterSet = guess.iter().flatten().copied().collect();
    let mut pending: Vec<char> = state.must_include().difference(&placed).iter().collect();
    if !place_required(state, &mut guess, &mut pending) {
        let required: String = state.must_include().difference(&placed).iter().collect();
        return Err(WordleError::UnsatisfiableConstraints(format!(
            "the required letters {} do not fit in the open slots",
            required
        )));
    }

    let mut letters = ['A'; WORD_LENGTH];
    for slot in 0..WORD_LENGTH {
        letters[slot] = match guess[slot] {
            Some(letter) => letter,
            None => {
                let used: LetterSet = guess.iter().flatten().copied().collect();
                let allowed = state
                    .slot_possibilities(slot)
                    .difference(&state.absent_letters());
                let letter = allowed
                    .difference(&used)
                    .first()
                    .or_else(|| allowed.first())
                    .ok_or_else(|| {
                        WordleError::UnsatisfiableConstraints(format!(
                            "no letter is possible at slot {}",
                            slot
                        ))
                    })?;
                guess[slot] = Some(letter);
                letter
            }
        };
    }
    Word::from_letters(letters)
}

/// Places each pending letter in an open slot that allows it, backtracking when a choice
/// leaves some later letter with nowhere to go.
fn place_required(
    state: &ConstraintState,
    guess: &mut [Option<char>; WORD_LENGTH],
    pending: &mut Vec<char>,
) -> bool {
    let Some((index, open_slots)) = pending
        .iter()
        .map(|letter| open_slots_for(state, guess, *letter))
        .enumerate()
        .min_by_key(|(_, open_slots)| open_slots.len())
    else {
        return true;
    };
    let letter = pending.remove(index);
    for slot in open_slots {
        guess[slot] = Some(letter);
        if place_required(state, guess, pending) {
            return true;
        }
        guess[slot] = None;
    }
    pending.insert(index, letter);
    false
}

fn open_slots_for(
    state: &ConstraintState,
    guess: &[Option<char>; WORD_LENGTH],
    letter: char,
) -> Vec<usize> {
    (0..WORD_LENGTH)
        .filter(|slot| guess[*slot].is_none() && state.slot_possibilities(*slot).contains(letter))
        .collect()
}
