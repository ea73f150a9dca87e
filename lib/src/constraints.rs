use crate::feedback::{interpret_round, RoundDeltas};
use crate::letters::{LetterSet, Word, WORD_LENGTH};
use crate::results::{GuessResult, WordleError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Everything learned about the objective word during one puzzle.
///
/// Knowledge only ever grows: letters removed from a slot never return, and confirmed slots,
/// required letters and absent letters are never forgotten.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstraintState {
    slot_possibilities: [LetterSet; WORD_LENGTH],
    confirmed_positions: [Option<char>; WORD_LENGTH],
    must_include: LetterSet,
    absent_letters: LetterSet,
}

impl Default for ConstraintState {
    fn default() -> Self {
        ConstraintState::new()
    }
}

impl ConstraintState {
    /// Creates a state where every letter is still possible in every slot.
    pub fn new() -> ConstraintState {
        ConstraintState {
            slot_possibilities: [LetterSet::full(); WORD_LENGTH],
            confirmed_positions: [None; WORD_LENGTH],
            must_include: LetterSet::empty(),
            absent_letters: LetterSet::empty(),
        }
    }

    /// The letters that may still appear at the given slot.
    pub fn slot_possibilities(&self, slot: usize) -> LetterSet {
        self.slot_possibilities[slot]
    }

    /// The confirmed letter at the given slot, if known.
    pub fn confirmed(&self, slot: usize) -> Option<char> {
        self.confirmed_positions[slot]
    }

    /// Iterates over `(slot, letter)` for every confirmed slot.
    pub fn confirmed_positions(&self) -> impl Iterator<Item = (usize, char)> + '_ {
        self.confirmed_positions
            .iter()
            .enumerate()
            .filter_map(|(slot, letter)| letter.map(|letter| (slot, letter)))
    }

    /// Letters known to be somewhere in the word.
    pub fn must_include(&self) -> LetterSet {
        self.must_include
    }

    /// Letters known not to be in the word.
    pub fn absent_letters(&self) -> LetterSet {
        self.absent_letters
    }

    /// Adds the constraints arising from the given guess result.
    pub fn apply_round(&mut self, guess_result: &GuessResult) -> Result<(), WordleError> {
        let deltas = interpret_round(&guess_result.guess, &guess_result.results)?;
        self.apply_deltas(&deltas)
    }

    /// Applies already-interpreted constraints.
    ///
    /// The deltas are checked against what is already confirmed before anything changes, so a
    /// rejected round leaves the state untouched.
    pub fn apply_deltas(&mut self, deltas: &RoundDeltas) -> Result<(), WordleError> {
        self.check_deltas(deltas)?;

        for (slot, letter) in &deltas.confirmed {
            self.confirmed_positions[*slot] = Some(*letter);
            self.slot_possibilities[*slot] =
                self.slot_possibilities[*slot].intersection(&LetterSet::only(*letter));
        }
        self.must_include = self.must_include.union(&deltas.must_include);
        for (slot, letter) in &deltas.slot_removals {
            self.slot_possibilities[*slot].remove(*letter);
        }
        self.absent_letters = self.absent_letters.union(&deltas.global_removals);
        for (slot, possibilities) in self.slot_possibilities.iter_mut().enumerate() {
            let removable = match self.confirmed_positions[slot] {
                Some(letter) => {
                    let mut removable = deltas.global_removals;
                    removable.remove(letter);
                    removable
                }
                None => deltas.global_removals,
            };
            *possibilities = possibilities.difference(&removable);
        }
        Ok(())
    }

    fn check_deltas(&self, deltas: &RoundDeltas) -> Result<(), WordleError> {
        for (slot, letter) in &deltas.confirmed {
            if let Some(existing) = self.confirmed_positions[*slot] {
                if existing != *letter {
                    return Err(WordleError::IllegalFeedback(format!(
                        "slot {} is already confirmed as '{}', not '{}'",
                        slot, existing, letter
                    )));
                }
            }
            if !self.slot_possibilities[*slot].contains(*letter) {
                return Err(WordleError::IllegalFeedback(format!(
                    "'{}' was already ruled out at slot {}",
                    letter, slot
                )));
            }
        }
        for (slot, letter) in &deltas.slot_removals {
            if self.confirmed_positions[*slot] == Some(*letter) {
                return Err(WordleError::IllegalFeedback(format!(
                    "slot {} is confirmed as '{}' but was reported elsewhere",
                    slot, letter
                )));
            }
        }
        Ok(())
    }

    /// Returns `true` iff the given word satisfies these constraints.
    ///
    /// Absent letters that are also required do not disqualify a word: the absence was only
    /// ever slot-scoped for them.
    pub fn is_satisfied_by(&self, word: &Word) -> bool {
        let letters = word.letter_set();
        word.letters()
            .iter()
            .zip(self.slot_possibilities.iter())
            .all(|(letter, possibilities)| possibilities.contains(*letter))
            && self.must_include.is_subset(&letters)
            && self
                .absent_letters
                .difference(&self.must_include)
                .intersection(&letters)
                .is_empty()
    }
}
