#![cfg_attr(feature = "unstable", feature(test))]

//! Solves Wordle-style puzzles by accumulating per-slot letter constraints.
//!
//! Each round's feedback narrows a [`ConstraintState`]. Guesses come from the first word in the
//! [`WordBank`] that still satisfies the constraints, or, when no word does, from
//! [`synthesize_guess`], which builds a letter sequence that satisfies them directly.

mod constraints;
mod data;
mod engine;
mod feedback;
mod letters;
mod results;
mod synthesizer;

pub use constraints::ConstraintState;
pub use data::{filter_candidates, first_candidate, WordBank};
pub use engine::*;
pub use letters::{LetterSet, Word, WORD_LENGTH};
pub use results::*;
pub use synthesizer::synthesize_guess;

/// Lower-level building blocks for interpreting feedback.
pub mod details {
    pub use crate::feedback::{interpret_round, parse_round, RoundDeltas};
}
