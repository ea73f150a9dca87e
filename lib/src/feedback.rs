use crate::letters::{LetterSet, Word, WORD_LENGTH};
use crate::results::{GuessResult, LetterResult, WordleError};

/// The constraint changes implied by a single round of feedback.
///
/// Produced by [`interpret_round`] and applied by
/// [`ConstraintState::apply_deltas`](crate::ConstraintState::apply_deltas).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RoundDeltas {
    /// Slots whose letter is now known, from `Correct` results.
    pub confirmed: Vec<(usize, char)>,
    /// Letters that must appear somewhere in the word.
    pub must_include: LetterSet,
    /// Letters that cannot be at one specific slot, but may still be elsewhere.
    pub slot_removals: Vec<(usize, char)>,
    /// Letters that are not in the word at all.
    pub global_removals: LetterSet,
}

/// Splits one round of feedback into slot-scoped and word-scoped constraints.
///
/// A `NotPresent` letter only rules out the whole word when no other occurrence of the same
/// letter in this guess scored `Correct` or `PresentNotHere`. Otherwise it only means there is
/// no additional occurrence at that slot.
pub fn interpret_round(
    guess: &Word,
    results: &[LetterResult],
) -> Result<RoundDeltas, WordleError> {
    if results.len() != WORD_LENGTH {
        return Err(WordleError::IllegalFeedback(format!(
            "expected {} letter results, got {}",
            WORD_LENGTH,
            results.len()
        )));
    }

    let positive_letters: LetterSet = guess
        .letters()
        .iter()
        .zip(results)
        .filter(|(_, result)| result.is_positive())
        .map(|(letter, _)| *letter)
        .collect();

    let mut deltas = RoundDeltas::default();
    for (slot, (letter, result)) in guess.letters().iter().zip(results).enumerate() {
        match result {
            LetterResult::Correct => {
                deltas.confirmed.push((slot, *letter));
                deltas.must_include.insert(*letter);
            }
            LetterResult::PresentNotHere => {
                deltas.slot_removals.push((slot, *letter));
                deltas.must_include.insert(*letter);
            }
            LetterResult::NotPresent => {
                if positive_letters.contains(*letter) {
                    deltas.slot_removals.push((slot, *letter));
                } else {
                    deltas.global_removals.insert(*letter);
                }
            }
        }
    }
    Ok(deltas)
}

/// Parses a round given as raw text, e.g. straight from the scoring service.
///
/// Any problem with the input, including a guess of the wrong length, is reported as
/// [`WordleError::IllegalFeedback`].
pub fn parse_round(guess: &str, results: &[&str]) -> Result<GuessResult, WordleError> {
    let guess: Word = guess
        .parse()
        .map_err(|err: WordleError| WordleError::IllegalFeedback(err.to_string()))?;
    let results = results
        .iter()
        .map(|result| result.parse())
        .collect::<Result<Vec<LetterResult>, WordleError>>()?;
    GuessResult::new(guess, results)
}
