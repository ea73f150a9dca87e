use crate::results::WordleError;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::Index;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The number of letters in every word handled by this crate.
pub const WORD_LENGTH: usize = 5;

const ALPHABET_MASK: u32 = (1 << 26) - 1;

fn letter_index(letter: char) -> Option<u32> {
    let upper = letter.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        Some(upper as u32 - 'A' as u32)
    } else {
        None
    }
}

/// A set of the letters `A` through `Z`.
///
/// Iteration is always in alphabetical order, so any letter picked from a set is
/// deterministic.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LetterSet(u32);

impl LetterSet {
    /// Creates an empty set.
    pub const fn empty() -> Self {
        LetterSet(0)
    }

    /// Creates a set containing the whole alphabet.
    pub const fn full() -> Self {
        LetterSet(ALPHABET_MASK)
    }

    /// Creates a set containing just the given letter.
    pub fn only(letter: char) -> Self {
        let mut set = LetterSet::empty();
        set.insert(letter);
        set
    }

    /// Inserts the letter, returning whether it was newly added. Non-letters are ignored.
    pub fn insert(&mut self, letter: char) -> bool {
        match letter_index(letter) {
            Some(index) => {
                let added = self.0 & (1 << index) == 0;
                self.0 |= 1 << index;
                added
            }
            None => false,
        }
    }

    /// Removes the letter, returning whether it was present.
    pub fn remove(&mut self, letter: char) -> bool {
        match letter_index(letter) {
            Some(index) => {
                let removed = self.0 & (1 << index) != 0;
                self.0 &= !(1 << index);
                removed
            }
            None => false,
        }
    }

    pub fn contains(&self, letter: char) -> bool {
        letter_index(letter).map_or(false, |index| self.0 & (1 << index) != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_subset(&self, other: &LetterSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn union(&self, other: &LetterSet) -> LetterSet {
        LetterSet(self.0 | other.0)
    }

    pub fn intersection(&self, other: &LetterSet) -> LetterSet {
        LetterSet(self.0 & other.0)
    }

    pub fn difference(&self, other: &LetterSet) -> LetterSet {
        LetterSet(self.0 & !other.0)
    }

    /// Returns the alphabetically first letter in the set.
    pub fn first(&self) -> Option<char> {
        self.iter().next()
    }

    pub fn iter(&self) -> Iter {
        Iter(self.0)
    }
}

impl fmt::Debug for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<char> for LetterSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut set = LetterSet::empty();
        for letter in iter {
            set.insert(letter);
        }
        set
    }
}

/// Iterates over the letters of a [`LetterSet`] in alphabetical order.
pub struct Iter(u32);

impl Iterator for Iter {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        match self.0 {
            0 => None,
            bits => {
                let index = bits.trailing_zeros();
                self.0 &= bits - 1;
                char::from_u32('A' as u32 + index)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.count_ones() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for Iter {}
impl FusedIterator for Iter {}

impl IntoIterator for LetterSet {
    type Item = char;
    type IntoIter = Iter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A validated five-letter word, stored in upper case.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Word(pub(crate) [char; WORD_LENGTH]);

impl Word {
    /// Builds a word from individual letters, upper-casing them.
    pub fn from_letters(letters: [char; WORD_LENGTH]) -> Result<Word, WordleError> {
        let mut upper = ['A'; WORD_LENGTH];
        for (slot, letter) in letters.iter().enumerate() {
            if letter_index(*letter).is_none() {
                return Err(WordleError::UnsupportedCharacter(*letter));
            }
            upper[slot] = letter.to_ascii_uppercase();
        }
        Ok(Word(upper))
    }

    pub fn letters(&self) -> &[char; WORD_LENGTH] {
        &self.0
    }

    pub fn contains(&self, letter: char) -> bool {
        self.0.contains(&letter)
    }

    /// The set of distinct letters in this word.
    pub fn letter_set(&self) -> LetterSet {
        self.0.iter().copied().collect()
    }
}

impl Index<usize> for Word {
    type Output = char;

    fn index(&self, slot: usize) -> &char {
        &self.0[slot]
    }
}

impl FromStr for Word {
    type Err = WordleError;

    /// Parses a word, ignoring surrounding whitespace and case.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let length = trimmed.chars().count();
        if length != WORD_LENGTH {
            return Err(WordleError::WordLength(length));
        }
        let mut letters = ['A'; WORD_LENGTH];
        for (slot, letter) in trimmed.chars().enumerate() {
            letters[slot] = letter;
        }
        Word::from_letters(letters)
    }
}

impl TryFrom<String> for Word {
    type Error = WordleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.to_string()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in &self.0 {
            write!(f, "{}", letter)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({})", self)
    }
}
