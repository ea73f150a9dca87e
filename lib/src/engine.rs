use crate::constraints::ConstraintState;
use crate::data::{filter_candidates, first_candidate, WordBank};
use crate::letters::Word;
use crate::results::*;
use crate::synthesizer::synthesize_guess;
use log::{debug, info, log_enabled, warn, Level};
use rayon::prelude::*;
use std::time::Duration;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The guess used to open a puzzle unless configured otherwise.
pub const DEFAULT_OPENING_GUESS: Word = Word(['R', 'A', 'I', 'S', 'E']);

/// How many times a guess is sent before a timing-out source is given up on.
const SUBMIT_ATTEMPTS: u32 = 2;

/// Why a [`FeedbackSource`] could not score a guess.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// No answer arrived within the allowed time. This may succeed if tried again.
    #[error("timed out waiting for feedback")]
    Timeout,
    /// Any other failure to reach the scorer.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Something that scores guesses against a hidden word, such as a remote Wordle service.
pub trait FeedbackSource {
    /// Scores the guess, giving up after `timeout`.
    fn submit_guess(
        &mut self,
        guess: &Word,
        timeout: Duration,
    ) -> Result<Vec<SlotFeedback>, SubmitError>;
}

/// Scores guesses locally against a known objective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalOracle {
    objective: Word,
}

impl LocalOracle {
    pub fn new(objective: Word) -> LocalOracle {
        LocalOracle { objective }
    }

    pub fn objective(&self) -> Word {
        self.objective
    }
}

impl FeedbackSource for LocalOracle {
    fn submit_guess(
        &mut self,
        guess: &Word,
        _timeout: Duration,
    ) -> Result<Vec<SlotFeedback>, SubmitError> {
        Ok(get_result_for_guess(&self.objective, guess).to_slot_feedback())
    }
}

/// Tunable limits for solving a puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverConfig {
    /// The puzzle is abandoned once this many guesses have been made without solving it.
    pub max_rounds: u32,
    /// Solved words that took more than this many guesses are proposed for the word bank.
    pub learn_threshold: u32,
    /// The first guess of every puzzle. When `None`, the first word in the bank is used.
    pub opening_guess: Option<Word>,
    /// How long to wait for each round's feedback.
    pub round_timeout: Duration,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            max_rounds: 50,
            learn_threshold: 8,
            opening_guess: Some(DEFAULT_OPENING_GUESS),
            round_timeout: Duration::from_secs(10),
        }
    }
}

impl SolverConfig {
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_learn_threshold(mut self, learn_threshold: u32) -> Self {
        self.learn_threshold = learn_threshold;
        self
    }

    pub fn with_opening_guess(mut self, opening_guess: Option<Word>) -> Self {
        self.opening_guess = opening_guess;
        self
    }

    pub fn with_round_timeout(mut self, round_timeout: Duration) -> Self {
        self.round_timeout = round_timeout;
        self
    }
}

/// Where a puzzle is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PuzzleStatus {
    Active,
    Solved,
    Abandoned,
}

/// Solves a single puzzle one round at a time.
///
/// Each round, call [`PuzzleSolver::next_guess`], score the guess however you like, then pass
/// the outcome to [`PuzzleSolver::record_result`]. [`play_puzzle`] does this against a
/// [`FeedbackSource`].
pub struct PuzzleSolver<'a> {
    bank: &'a WordBank,
    config: SolverConfig,
    state: ConstraintState,
    guesses: Vec<Word>,
    status: PuzzleStatus,
    abandon_reason: Option<AbandonReason>,
}

impl<'a> PuzzleSolver<'a> {
    pub fn new(bank: &'a WordBank, config: SolverConfig) -> PuzzleSolver<'a> {
        let mut solver = PuzzleSolver {
            bank,
            config,
            state: ConstraintState::new(),
            guesses: Vec::new(),
            status: PuzzleStatus::Active,
            abandon_reason: None,
        };
        if solver.config.max_rounds == 0 {
            solver.abandon(AbandonReason::RoundLimit);
        }
        solver
    }

    pub fn status(&self) -> PuzzleStatus {
        self.status
    }

    pub fn state(&self) -> &ConstraintState {
        &self.state
    }

    pub fn guesses(&self) -> &[Word] {
        &self.guesses
    }

    pub fn rounds_played(&self) -> u32 {
        self.guesses.len() as u32
    }

    /// The words in the bank that are still possible.
    pub fn candidates(&self) -> Vec<Word> {
        filter_candidates(self.bank, &self.state)
    }

    /// Chooses the next word to guess.
    ///
    /// This is the first word in the bank that is still possible. If none is, a guess is built
    /// directly from the constraints. Fails once the puzzle is no longer active.
    pub fn next_guess(&self) -> Result<Word, WordleError> {
        if self.status != PuzzleStatus::Active {
            return Err(WordleError::IllegalFeedback(format!(
                "the puzzle is already {:?}",
                self.status
            )));
        }
        if self.guesses.is_empty() {
            if let Some(opening) = self.config.opening_guess {
                return Ok(opening);
            }
        }
        if let Some(word) = first_candidate(self.bank, &self.state) {
            return Ok(word);
        }
        warn!("No words in the bank match the constraints. Synthesizing a guess.");
        let guess = synthesize_guess(&self.state)?;
        debug!("Synthesized guess: {}", guess);
        Ok(guess)
    }

    /// Adds the result of a guess, and moves the puzzle on to `Solved` or `Abandoned` if needed.
    ///
    /// Rejected feedback does not count as a round.
    pub fn record_result(&mut self, result: &GuessResult) -> Result<PuzzleStatus, WordleError> {
        if self.status != PuzzleStatus::Active {
            return Err(WordleError::IllegalFeedback(format!(
                "the puzzle is already {:?}",
                self.status
            )));
        }
        self.state.apply_round(result)?;
        self.guesses.push(result.guess);

        if log_enabled!(Level::Debug) {
            debug!(
                "Round {}: {} -> {:?}, {} candidates remain",
                self.guesses.len(),
                result.guess,
                result.results,
                self.candidates().len()
            );
        }

        if result.is_solved() {
            self.status = PuzzleStatus::Solved;
            info!(
                "Solved {} in {} guesses",
                result.guess,
                self.guesses.len()
            );
        } else if self.rounds_played() >= self.config.max_rounds {
            self.abandon(AbandonReason::RoundLimit);
        }
        Ok(self.status)
    }

    /// Gives up on the puzzle.
    pub fn abandon(&mut self, reason: AbandonReason) {
        if self.status == PuzzleStatus::Active {
            info!(
                "Abandoning puzzle after {} guesses: {:?}",
                self.guesses.len(),
                reason
            );
            self.status = PuzzleStatus::Abandoned;
            self.abandon_reason = Some(reason);
        }
    }

    /// The word to propose for the word bank, if the puzzle was solved only after many guesses
    /// and the word is not yet known.
    pub fn learned_word(&self) -> Option<WordProposal> {
        if self.status != PuzzleStatus::Solved || self.rounds_played() <= self.config.learn_threshold
        {
            return None;
        }
        let word = *self.guesses.last()?;
        if self.bank.contains(&word) {
            return None;
        }
        info!(
            "Proposing {} for the word bank after {} guesses",
            word,
            self.rounds_played()
        );
        Some(WordProposal {
            word,
            attempts_used: self.rounds_played(),
        })
    }

    /// The outcome of the puzzle, or `None` while it is still active.
    pub fn game_result(&self) -> Option<GameResult> {
        match self.status {
            PuzzleStatus::Active => None,
            PuzzleStatus::Solved => Some(GameResult::Solved {
                guesses: self.guesses.clone(),
                learned: self.learned_word(),
            }),
            PuzzleStatus::Abandoned => Some(GameResult::Abandoned {
                guesses: self.guesses.clone(),
                reason: self.abandon_reason.unwrap_or(AbandonReason::RoundLimit),
            }),
        }
    }
}

/// Plays a whole puzzle against the given source of feedback.
///
/// A round that times out is sent once more; a second timeout abandons the puzzle. Other
/// transport failures and malformed feedback are returned as errors.
pub fn play_puzzle<S>(
    bank: &WordBank,
    config: &SolverConfig,
    source: &mut S,
) -> Result<GameResult, WordleError>
where
    S: FeedbackSource + ?Sized,
{
    let mut solver = PuzzleSolver::new(bank, config.clone());
    loop {
        if let Some(result) = solver.game_result() {
            return Ok(result);
        }
        let guess = solver.next_guess()?;
        match submit_with_retry(source, &guess, config.round_timeout)? {
            Some(feedback) => {
                let result = GuessResult::from_slot_feedback(guess, &feedback)?;
                solver.record_result(&result)?;
            }
            None => solver.abandon(AbandonReason::Timeout),
        }
    }
}

fn submit_with_retry<S>(
    source: &mut S,
    guess: &Word,
    timeout: Duration,
) -> Result<Option<Vec<SlotFeedback>>, WordleError>
where
    S: FeedbackSource + ?Sized,
{
    for attempt in 1..=SUBMIT_ATTEMPTS {
        match source.submit_guess(guess, timeout) {
            Ok(feedback) => return Ok(Some(feedback)),
            Err(SubmitError::Timeout) => warn!(
                "Timed out submitting {} (attempt {} of {})",
                guess, attempt, SUBMIT_ATTEMPTS
            ),
            Err(SubmitError::Transport(message)) => return Err(WordleError::Transport(message)),
        }
    }
    Ok(None)
}

/// Plays many independent puzzles in parallel, one per source.
///
/// Results are in the same order as the sources. The bank is only read; apply any
/// [`GameResult::learned`] proposals afterwards with [`WordBank::apply_proposals`].
pub fn solve_batch<S>(
    bank: &WordBank,
    config: &SolverConfig,
    sources: Vec<S>,
) -> Vec<Result<GameResult, WordleError>>
where
    S: FeedbackSource + Send,
{
    sources
        .into_par_iter()
        .map(|mut source| play_puzzle(bank, config, &mut source))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str) -> Word {
        text.parse().unwrap()
    }

    struct TimingOut {
        timeouts_left: u32,
        inner: LocalOracle,
    }

    impl FeedbackSource for TimingOut {
        fn submit_guess(
            &mut self,
            guess: &Word,
            timeout: Duration,
        ) -> Result<Vec<SlotFeedback>, SubmitError> {
            if self.timeouts_left > 0 {
                self.timeouts_left -= 1;
                return Err(SubmitError::Timeout);
            }
            self.inner.submit_guess(guess, timeout)
        }
    }

    #[test]
    fn next_guess_uses_opening_guess_first() -> Result<(), WordleError> {
        let bank = WordBank::from_iterator(["crane", "slate"])?;
        let solver = PuzzleSolver::new(&bank, SolverConfig::default());

        assert_eq!(solver.next_guess()?, DEFAULT_OPENING_GUESS);
        Ok(())
    }

    #[test]
    fn next_guess_without_opening_uses_bank_order() -> Result<(), WordleError> {
        let bank = WordBank::from_iterator(["crane", "slate"])?;
        let solver = PuzzleSolver::new(&bank, SolverConfig::default().with_opening_guess(None));

        assert_eq!(solver.next_guess()?, word("crane"));
        Ok(())
    }

    #[test]
    fn record_result_after_solved_fails() -> Result<(), WordleError> {
        let bank = WordBank::from_iterator(["crane"])?;
        let mut solver = PuzzleSolver::new(&bank, SolverConfig::default());
        let solved = get_result_for_guess(&word("crane"), &word("crane"));

        assert_eq!(solver.record_result(&solved)?, PuzzleStatus::Solved);
        assert!(matches!(
            solver.record_result(&solved),
            Err(WordleError::IllegalFeedback(_))
        ));
        assert_eq!(solver.rounds_played(), 1);
        Ok(())
    }

    #[test]
    fn next_guess_after_puzzle_ends_fails() -> Result<(), WordleError> {
        let bank = WordBank::from_iterator(["crane"])?;
        let mut solved = PuzzleSolver::new(&bank, SolverConfig::default());
        solved.record_result(&get_result_for_guess(&word("crane"), &word("crane")))?;
        let mut abandoned = PuzzleSolver::new(&bank, SolverConfig::default());
        abandoned.abandon(AbandonReason::Timeout);

        assert!(matches!(
            solved.next_guess(),
            Err(WordleError::IllegalFeedback(_))
        ));
        assert!(matches!(
            abandoned.next_guess(),
            Err(WordleError::IllegalFeedback(_))
        ));
        assert!(matches!(
            PuzzleSolver::new(&bank, SolverConfig::default().with_max_rounds(0)).next_guess(),
            Err(WordleError::IllegalFeedback(_))
        ));
        Ok(())
    }

    #[test]
    fn zero_max_rounds_abandons_immediately() -> Result<(), WordleError> {
        let bank = WordBank::from_iterator(["crane"])?;
        let mut oracle = LocalOracle::new(word("crane"));

        let result = play_puzzle(
            &bank,
            &SolverConfig::default().with_max_rounds(0),
            &mut oracle,
        )?;

        assert_eq!(
            result,
            GameResult::Abandoned {
                guesses: vec![],
                reason: AbandonReason::RoundLimit,
            }
        );
        Ok(())
    }

    #[test]
    fn single_timeout_is_retried() -> Result<(), WordleError> {
        let bank = WordBank::from_iterator(["crane"])?;
        let mut source = TimingOut {
            timeouts_left: 1,
            inner: LocalOracle::new(word("crane")),
        };

        let result = play_puzzle(
            &bank,
            &SolverConfig::default().with_opening_guess(None),
            &mut source,
        )?;

        assert_eq!(result.solution(), Some(word("crane")));
        Ok(())
    }

    #[test]
    fn second_timeout_abandons() -> Result<(), WordleError> {
        let bank = WordBank::from_iterator(["crane"])?;
        let mut source = TimingOut {
            timeouts_left: 2,
            inner: LocalOracle::new(word("crane")),
        };

        let result = play_puzzle(&bank, &SolverConfig::default(), &mut source)?;

        assert_eq!(
            result,
            GameResult::Abandoned {
                guesses: vec![],
                reason: AbandonReason::Timeout,
            }
        );
        Ok(())
    }
}
