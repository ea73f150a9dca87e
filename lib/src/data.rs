use crate::constraints::ConstraintState;
use crate::letters::Word;
use crate::results::{WordProposal, WordleError};
use log::warn;
use std::collections::HashSet;
use std::io::BufRead;
use std::ops::Deref;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Contains all the known words, in the order they were added.
///
/// Words are stored in upper case and never removed. Adding a word that is already present has
/// no effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<Word>", into = "Vec<Word>"))]
pub struct WordBank {
    all_words: Vec<Word>,
    known: HashSet<Word>,
}

impl WordBank {
    /// Constructs a new `WordBank` by reading words from the given reader.
    ///
    /// The reader should provide one word per line. Blank lines are skipped, and so are lines
    /// that are not valid five-letter words, with a warning naming the line.
    pub fn from_reader<R: BufRead>(word_reader: R) -> Result<Self, WordleError> {
        let mut bank = WordBank::default();
        for (number, line) in word_reader.lines().enumerate() {
            let line = line.map_err(|err| WordleError::Io(err.to_string()))?;
            if line.trim().is_empty() {
                continue;
            }
            match line.parse() {
                Ok(word) => {
                    bank.insert(word);
                }
                Err(err) => warn!("Skipping line {} ({:?}): {}", number + 1, line.trim(), err),
            }
        }
        Ok(bank)
    }

    /// Like [`WordBank::from_reader`], but fails on the first line that is not a valid word.
    pub fn from_reader_strict<R: BufRead>(word_reader: R) -> Result<Self, WordleError> {
        let mut bank = WordBank::default();
        for line in word_reader.lines() {
            let line = line.map_err(|err| WordleError::Io(err.to_string()))?;
            if line.trim().is_empty() {
                continue;
            }
            bank.insert(line.parse()?);
        }
        Ok(bank)
    }

    /// Constructs a new `WordBank` from the given words, skipping empty ones.
    pub fn from_iterator<S, I>(words: I) -> Result<Self, WordleError>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        let mut bank = WordBank::default();
        for word in words {
            let word = word.as_ref();
            if word.trim().is_empty() {
                continue;
            }
            bank.insert(word.parse()?);
        }
        Ok(bank)
    }

    /// Appends the word, returning whether it was new.
    pub fn insert(&mut self, word: Word) -> bool {
        if self.known.insert(word) {
            self.all_words.push(word);
            return true;
        }
        false
    }

    pub fn contains(&self, word: &Word) -> bool {
        self.known.contains(word)
    }

    /// Adds every proposed word that is not yet known, returning the ones that were added.
    ///
    /// Proposals from parallel puzzles should be funnelled through this single call so that no
    /// addition is lost or duplicated.
    pub fn apply_proposals<I>(&mut self, proposals: I) -> Vec<WordProposal>
    where
        I: IntoIterator<Item = WordProposal>,
    {
        proposals
            .into_iter()
            .filter(|proposal| self.insert(proposal.word))
            .collect()
    }
}

impl Deref for WordBank {
    type Target = [Word];

    fn deref(&self) -> &Self::Target {
        &self.all_words
    }
}

impl From<Vec<Word>> for WordBank {
    fn from(words: Vec<Word>) -> Self {
        let mut bank = WordBank::default();
        for word in words {
            bank.insert(word);
        }
        bank
    }
}

impl From<WordBank> for Vec<Word> {
    fn from(bank: WordBank) -> Self {
        bank.all_words
    }
}

/// Gets the words in the bank that meet the given constraints, in bank order.
pub fn filter_candidates(bank: &WordBank, state: &ConstraintState) -> Vec<Word> {
    bank.iter()
        .filter(|word| state.is_satisfied_by(word))
        .copied()
        .collect()
}

/// Gets the first word in the bank that meets the given constraints.
pub fn first_candidate(bank: &WordBank, state: &ConstraintState) -> Option<Word> {
    bank.iter().find(|word| state.is_satisfied_by(word)).copied()
}
