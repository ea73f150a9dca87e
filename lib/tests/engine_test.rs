#[macro_use]
extern crate assert_matches;

use rs_wordle_constraints::*;

use std::result::Result;
use std::time::Duration;

fn word(text: &str) -> Word {
    text.parse().unwrap()
}

struct Unreachable;

impl FeedbackSource for Unreachable {
    fn submit_guess(
        &mut self,
        _guess: &Word,
        _timeout: Duration,
    ) -> Result<Vec<SlotFeedback>, SubmitError> {
        Err(SubmitError::Transport("connection refused".to_string()))
    }
}

struct Truncating(LocalOracle);

impl FeedbackSource for Truncating {
    fn submit_guess(
        &mut self,
        guess: &Word,
        timeout: Duration,
    ) -> Result<Vec<SlotFeedback>, SubmitError> {
        let mut feedback = self.0.submit_guess(guess, timeout)?;
        feedback.pop();
        Ok(feedback)
    }
}

#[test]
fn play_puzzle_solves_bank_word() -> Result<(), WordleError> {
    let bank = WordBank::from_iterator(["crane", "slate", "burnt", "rhino"])?;
    let mut oracle = LocalOracle::new(word("rhino"));

    let result = play_puzzle(&bank, &SolverConfig::default(), &mut oracle)?;

    assert_eq!(
        result,
        GameResult::Solved {
            guesses: vec![word("raise"), word("rhino")],
            learned: None,
        }
    );
    Ok(())
}

#[test]
fn play_puzzle_synthesizes_word_missing_from_bank() -> Result<(), WordleError> {
    let bank = WordBank::from_iterator(["crane", "slate"])?;
    let mut oracle = LocalOracle::new(word("fjord"));
    let config = SolverConfig::default().with_opening_guess(None);

    let result = play_puzzle(&bank, &config, &mut oracle)?;

    assert_eq!(result.solution(), Some(word("fjord")));
    assert_eq!(result.guesses()[0], word("crane"));
    assert!(result.guesses().len() <= config.max_rounds as usize);
    Ok(())
}

#[test]
fn play_puzzle_abandons_at_round_limit() -> Result<(), WordleError> {
    let bank = WordBank::from_iterator(["crane", "slate"])?;
    let mut oracle = LocalOracle::new(word("slate"));
    let config = SolverConfig::default()
        .with_opening_guess(None)
        .with_max_rounds(1);

    let result = play_puzzle(&bank, &config, &mut oracle)?;

    assert_eq!(
        result,
        GameResult::Abandoned {
            guesses: vec![word("crane")],
            reason: AbandonReason::RoundLimit,
        }
    );
    assert_eq!(result.learned(), None);
    Ok(())
}

#[test]
fn slow_solve_of_unknown_word_is_proposed() -> Result<(), WordleError> {
    let bank = WordBank::from_iterator(["crane", "slate"])?;
    let mut oracle = LocalOracle::new(word("fjord"));
    let config = SolverConfig::default()
        .with_opening_guess(None)
        .with_learn_threshold(0);

    let result = play_puzzle(&bank, &config, &mut oracle)?;

    assert_eq!(
        result.learned(),
        Some(WordProposal {
            word: word("fjord"),
            attempts_used: result.guesses().len() as u32,
        })
    );
    Ok(())
}

#[test]
fn known_word_is_never_proposed() -> Result<(), WordleError> {
    let bank = WordBank::from_iterator(["crane", "fjord"])?;
    let mut oracle = LocalOracle::new(word("fjord"));
    let config = SolverConfig::default().with_learn_threshold(0);

    let result = play_puzzle(&bank, &config, &mut oracle)?;

    assert_eq!(result.solution(), Some(word("fjord")));
    assert_eq!(result.learned(), None);
    Ok(())
}

#[test]
fn quick_solve_is_not_proposed() -> Result<(), WordleError> {
    let bank = WordBank::from_iterator(["crane"])?;
    let mut oracle = LocalOracle::new(word("fjord"));
    let config = SolverConfig::default().with_learn_threshold(u32::MAX);

    let result = play_puzzle(&bank, &config, &mut oracle)?;

    assert_eq!(result.solution(), Some(word("fjord")));
    assert_eq!(result.learned(), None);
    Ok(())
}

#[test]
fn play_puzzle_surfaces_transport_errors() -> Result<(), WordleError> {
    let bank = WordBank::from_iterator(["crane"])?;

    assert_matches!(
        play_puzzle(&bank, &SolverConfig::default(), &mut Unreachable),
        Err(WordleError::Transport(message)) if message == "connection refused"
    );
    Ok(())
}

#[test]
fn play_puzzle_rejects_incomplete_feedback() -> Result<(), WordleError> {
    let bank = WordBank::from_iterator(["crane"])?;
    let mut source = Truncating(LocalOracle::new(word("crane")));

    assert_matches!(
        play_puzzle(&bank, &SolverConfig::default(), &mut source),
        Err(WordleError::IllegalFeedback(_))
    );
    Ok(())
}

#[test]
fn play_puzzle_accepts_boxed_source() -> Result<(), WordleError> {
    let bank = WordBank::from_iterator(["crane", "slate"])?;
    let mut source: Box<dyn FeedbackSource> = Box::new(LocalOracle::new(word("slate")));

    let result = play_puzzle(&bank, &SolverConfig::default(), source.as_mut())?;

    assert_eq!(result.solution(), Some(word("slate")));
    Ok(())
}

#[test]
fn solve_batch_keeps_source_order() -> Result<(), WordleError> {
    let mut bank = WordBank::from_iterator(["crane", "slate", "rhino"])?;
    let config = SolverConfig::default().with_learn_threshold(0);
    let objectives = vec![word("rhino"), word("crane"), word("fjord"), word("slate")];
    let sources: Vec<LocalOracle> = objectives.iter().copied().map(LocalOracle::new).collect();

    let results = solve_batch(&bank, &config, sources)
        .into_iter()
        .collect::<Result<Vec<GameResult>, WordleError>>()?;

    let solutions: Vec<Option<Word>> = results.iter().map(GameResult::solution).collect();
    assert_eq!(
        solutions,
        objectives.iter().copied().map(Some).collect::<Vec<_>>()
    );

    let added = bank.apply_proposals(results.iter().filter_map(GameResult::learned));
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].word, word("fjord"));
    assert!(bank.contains(&word("fjord")));
    assert_eq!(bank.len(), 4);
    Ok(())
}

#[test]
fn puzzle_solver_can_be_driven_by_hand() -> Result<(), WordleError> {
    let bank = WordBank::from_iterator(["crane", "slate", "burnt", "rhino"])?;
    let mut solver = PuzzleSolver::new(&bank, SolverConfig::default().with_opening_guess(None));

    let guess = solver.next_guess()?;
    assert_eq!(guess, word("crane"));
    let status = solver.record_result(&details::parse_round(
        "crane",
        &["absent", "present", "absent", "correct", "absent"],
    )?)?;

    assert_eq!(status, PuzzleStatus::Active);
    assert_eq!(solver.candidates(), vec![word("burnt"), word("rhino")]);
    assert_eq!(solver.next_guess()?, word("burnt"));
    assert_eq!(solver.game_result(), None);
    Ok(())
}

#[test]
fn rejected_feedback_does_not_count_as_a_round() -> Result<(), WordleError> {
    let bank = WordBank::from_iterator(["crane"])?;
    let mut solver = PuzzleSolver::new(&bank, SolverConfig::default());

    assert_matches!(
        solver.record_result(&GuessResult {
            guess: word("crane"),
            results: vec![LetterResult::Correct; 4],
        }),
        Err(WordleError::IllegalFeedback(_))
    );
    assert_eq!(solver.rounds_played(), 0);
    assert_eq!(solver.status(), PuzzleStatus::Active);
    Ok(())
}
