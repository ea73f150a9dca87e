use crate::letters::{Word, WORD_LENGTH};
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The result of a given letter at a specific location.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LetterResult {
    /// The letter is in the word at this location.
    #[cfg_attr(feature = "serde", serde(rename = "correct"))]
    Correct,
    /// The letter is in the word, but somewhere else.
    #[cfg_attr(feature = "serde", serde(rename = "present"))]
    PresentNotHere,
    /// There is no further occurrence of this letter in the word.
    #[cfg_attr(feature = "serde", serde(rename = "absent"))]
    NotPresent,
}

impl LetterResult {
    /// Whether this result proves the letter occurs in the word.
    pub fn is_positive(&self) -> bool {
        !matches!(self, LetterResult::NotPresent)
    }
}

impl FromStr for LetterResult {
    type Err = WordleError;

    /// Parses the result names used by the scoring service: `correct`, `present` and `absent`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "correct" => Ok(LetterResult::Correct),
            "present" => Ok(LetterResult::PresentNotHere),
            "absent" => Ok(LetterResult::NotPresent),
            other => Err(WordleError::IllegalFeedback(format!(
                "unknown letter result '{}'",
                other
            ))),
        }
    }
}

/// Indicates that an error occurred while trying to guess the objective word.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum WordleError {
    /// The feedback for a round was malformed or contradicts what is already confirmed.
    #[error("illegal feedback: {0}")]
    IllegalFeedback(String),
    /// No letter sequence satisfies the recorded constraints, so the feedback was contradictory.
    #[error("unsatisfiable constraints: {0}")]
    UnsatisfiableConstraints(String),
    /// Words must all be [`WORD_LENGTH`] letters long. Holds the offending length.
    #[error("words must have 5 letters, found {0}")]
    WordLength(usize),
    /// Only the letters `A` to `Z` are supported.
    #[error("unsupported character '{0}'")]
    UnsupportedCharacter(char),
    /// Reading a word list failed.
    #[error("failed to read words: {0}")]
    Io(String),
    /// The feedback source failed for a reason other than a timeout.
    #[error("feedback source failed: {0}")]
    Transport(String),
}

/// One entry of the feedback returned by the scoring service.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlotFeedback {
    pub slot: usize,
    /// The letter that was guessed at this slot.
    #[cfg_attr(feature = "serde", serde(rename = "guess"))]
    pub letter: char,
    pub result: LetterResult,
}

impl SlotFeedback {
    pub fn new(slot: usize, letter: char, result: LetterResult) -> SlotFeedback {
        SlotFeedback {
            slot,
            letter,
            result,
        }
    }
}

/// The result of a single word guess.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GuessResult {
    pub guess: Word,
    /// The result of each letter, provided in the same letter order as in the guess.
    pub results: Vec<LetterResult>,
}

impl GuessResult {
    /// Checks that there is exactly one result per letter of the guess.
    pub fn new(guess: Word, results: Vec<LetterResult>) -> Result<GuessResult, WordleError> {
        if results.len() != WORD_LENGTH {
            return Err(WordleError::IllegalFeedback(format!(
                "expected {} letter results, got {}",
                WORD_LENGTH,
                results.len()
            )));
        }
        Ok(GuessResult { guess, results })
    }

    /// Assembles a result from the per-slot entries returned by the scoring service.
    ///
    /// Entries may arrive in any order, but every slot must be reported exactly once and
    /// each entry's letter must match the guess at that slot.
    pub fn from_slot_feedback(
        guess: Word,
        feedback: &[SlotFeedback],
    ) -> Result<GuessResult, WordleError> {
        if feedback.len() != WORD_LENGTH {
            return Err(WordleError::IllegalFeedback(format!(
                "expected feedback for {} slots, got {}",
                WORD_LENGTH,
                feedback.len()
            )));
        }
        let mut results: [Option<LetterResult>; WORD_LENGTH] = [None; WORD_LENGTH];
        for entry in feedback {
            if entry.slot >= WORD_LENGTH {
                return Err(WordleError::IllegalFeedback(format!(
                    "slot {} is out of range",
                    entry.slot
                )));
            }
            if !entry.letter.eq_ignore_ascii_case(&guess[entry.slot]) {
                return Err(WordleError::IllegalFeedback(format!(
                    "slot {} reports '{}' but the guess has '{}'",
                    entry.slot, entry.letter, guess[entry.slot]
                )));
            }
            if results[entry.slot].replace(entry.result).is_some() {
                return Err(WordleError::IllegalFeedback(format!(
                    "slot {} is reported more than once",
                    entry.slot
                )));
            }
        }
        // Five in-range, distinct slots means every slot is filled.
        let results = results.iter().flatten().copied().collect();
        GuessResult::new(guess, results)
    }

    /// Converts back to the per-slot form used by the scoring service.
    pub fn to_slot_feedback(&self) -> Vec<SlotFeedback> {
        self.results
            .iter()
            .enumerate()
            .map(|(slot, result)| SlotFeedback::new(slot, self.guess[slot], *result))
            .collect()
    }

    /// Whether every letter was in its correct location.
    pub fn is_solved(&self) -> bool {
        self.results
            .iter()
            .all(|result| *result == LetterResult::Correct)
    }
}

/// Why a puzzle was given up on.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AbandonReason {
    /// The configured maximum number of rounds was used up.
    RoundLimit,
    /// The feedback source timed out twice in a row.
    Timeout,
}

/// A suggestion to add a word to the dictionary.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WordProposal {
    pub word: Word,
    /// How many guesses it took to find the word.
    pub attempts_used: u32,
}

/// Whether the puzzle was solved or abandoned by the guesser.
#[derive(Debug, Eq, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameResult {
    /// The guesser found the word. The last guess is the objective.
    Solved {
        guesses: Vec<Word>,
        /// Set when the word took many guesses and is missing from the dictionary.
        learned: Option<WordProposal>,
    },
    /// The guesser stopped before finding the word.
    Abandoned {
        guesses: Vec<Word>,
        reason: AbandonReason,
    },
}

impl GameResult {
    pub fn guesses(&self) -> &[Word] {
        match self {
            GameResult::Solved { guesses, .. } => guesses,
            GameResult::Abandoned { guesses, .. } => guesses,
        }
    }

    /// The dictionary addition suggested by a solved game, if any.
    pub fn learned(&self) -> Option<WordProposal> {
        match self {
            GameResult::Solved { learned, .. } => *learned,
            GameResult::Abandoned { .. } => None,
        }
    }

    /// The solved word, if there is one.
    pub fn solution(&self) -> Option<Word> {
        match self {
            GameResult::Solved { guesses, .. } => guesses.last().copied(),
            GameResult::Abandoned { .. } => None,
        }
    }
}

/// Determines the result of the given `guess` when applied to the given `objective`.
///
/// Repeated letters are scored the usual way: exact matches are claimed first, then each
/// remaining occurrence in the guess is `PresentNotHere` only while unclaimed occurrences
/// remain in the objective.
pub fn get_result_for_guess(objective: &Word, guess: &Word) -> GuessResult {
    let mut results = vec![LetterResult::NotPresent; WORD_LENGTH];
    let mut unclaimed = [0u8; 26];
    for slot in 0..WORD_LENGTH {
        if objective[slot] == guess[slot] {
            results[slot] = LetterResult::Correct;
        } else {
            unclaimed[objective[slot] as usize - 'A' as usize] += 1;
        }
    }
    for slot in 0..WORD_LENGTH {
        if results[slot] == LetterResult::Correct {
            continue;
        }
        let count = &mut unclaimed[guess[slot] as usize - 'A' as usize];
        if *count > 0 {
            *count -= 1;
            results[slot] = LetterResult::PresentNotHere;
        }
    }
    GuessResult {
        guess: *guess,
        results,
    }
}
