use clap::{Parser, Subcommand};
use log::{debug, warn};
use rand::seq::SliceRandom;
use rs_wordle_constraints::*;
use std::collections::{BTreeSet, HashMap};
use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Instant;

/// Simple program to run a Wordle game in reverse, where the computer guesses the word by
/// narrowing down which letters are possible in each slot.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Path to a file that contains a list of known words, with one word on each line. Words
    /// learned while solving are appended to it. Required by every command except `merge`.
    #[clap(short = 'f', long)]
    words_file: Option<String>,

    /// Give up on a puzzle after this many guesses.
    #[clap(long, default_value_t = 50)]
    max_rounds: u32,

    /// Propose solved words that took more than this many guesses for the words file.
    #[clap(long, default_value_t = 8)]
    learn_threshold: u32,

    /// The first guess of every puzzle. Defaults to RAISE.
    #[clap(long)]
    opening_guess: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single game with the given word. The word doesn't need to be in the words file.
    Single { word: String },
    /// Run an interactive game against the solver.
    Interactive,
    /// Solve randomly chosen words from the words file in parallel.
    Batch {
        /// How many words to solve.
        #[clap(short = 'n', long, default_value_t = 100)]
        games: usize,
    },
    /// Combine two word lists into a sorted list without duplicates.
    Merge {
        first: String,
        second: String,
        output: String,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let start_time = Instant::now();
    let args = Args::parse();

    if let Command::Merge {
        first,
        second,
        output,
    } = &args.command
    {
        merge_word_files(first, second, output)?;
        print_elapsed(start_time);
        return Ok(());
    }

    let words_file = args
        .words_file
        .as_deref()
        .ok_or("--words-file is required for this command")?;
    println!("File: {}", words_file);
    let words_reader = io::BufReader::new(File::open(words_file)?);
    let mut word_bank = WordBank::from_reader(words_reader)?;
    println!("There are {} known words.", word_bank.len());

    let opening_guess = match &args.opening_guess {
        Some(text) => text.parse::<Word>()?,
        None => DEFAULT_OPENING_GUESS,
    };
    let config = SolverConfig::default()
        .with_max_rounds(args.max_rounds)
        .with_learn_threshold(args.learn_threshold)
        .with_opening_guess(Some(opening_guess));
    debug!("Using {:?}", config);

    let proposals = match args.command {
        Command::Single { word } => play_single_game(&word, &word_bank, &config)?,
        Command::Interactive => play_interactive_game(&word_bank, &config)?,
        Command::Batch { games } => run_batch(games, &word_bank, &config)?,
        Command::Merge { .. } => Vec::new(),
    };

    let learned = word_bank.apply_proposals(proposals);
    if !learned.is_empty() {
        append_learned_words(words_file, &learned)?;
    }

    print_elapsed(start_time);
    Ok(())
}

fn print_elapsed(start_time: Instant) {
    println!(
        "Command executed in {:.3}s.",
        start_time.elapsed().as_secs_f64()
    );
}

fn play_single_game(
    word: &str,
    word_bank: &WordBank,
    config: &SolverConfig,
) -> Result<Vec<WordProposal>, WordleError> {
    let objective: Word = word.parse()?;
    if !word_bank.contains(&objective) {
        println!("{} is not in the words file. I'll try anyway.", objective);
    }
    let mut oracle = LocalOracle::new(objective);
    let result = play_puzzle(word_bank, config, &mut oracle)?;
    print_game_result(&result);
    Ok(result.learned().into_iter().collect())
}

fn print_game_result(result: &GameResult) {
    match result {
        GameResult::Solved { guesses, .. } => {
            println!("Solved it! It took me {} guesses.", guesses.len());
        }
        GameResult::Abandoned { guesses, reason } => {
            println!(
                "I gave up after {} guesses ({:?}) :(",
                guesses.len(),
                reason
            );
        }
    }
    for guess in result.guesses() {
        println!("\t{}", guess);
    }
}

fn run_batch(
    games: usize,
    word_bank: &WordBank,
    config: &SolverConfig,
) -> Result<Vec<WordProposal>, WordleError> {
    let objectives: Vec<Word> = word_bank
        .choose_multiple(&mut rand::thread_rng(), games)
        .copied()
        .collect();
    let sources: Vec<LocalOracle> = objectives.iter().copied().map(LocalOracle::new).collect();

    let results = solve_batch(word_bank, config, sources);

    let mut num_games_per_round: HashMap<usize, u32> = HashMap::new();
    let mut num_abandoned = 0;
    let mut proposals = Vec::new();
    for (objective, result) in objectives.iter().zip(results) {
        match result? {
            GameResult::Solved { guesses, learned } => {
                *(num_games_per_round.entry(guesses.len()).or_insert(0)) += 1;
                proposals.extend(learned);
            }
            GameResult::Abandoned { reason, .. } => {
                warn!("Gave up on {}: {:?}", objective, reason);
                num_abandoned += 1;
            }
        }
    }
    println!(
        "Solved {} of {} words. Results:",
        objectives.len() - num_abandoned,
        objectives.len()
    );

    println!("|Num guesses|Num games|");
    println!("|-----------|---------|");
    let mut num_rounds: Vec<&usize> = num_games_per_round.keys().collect();
    num_rounds.sort_unstable();
    for num_round in num_rounds {
        println!("|{}|{}|", num_round, num_games_per_round[num_round]);
    }

    let num_solved: u32 = num_games_per_round.values().sum();
    if num_solved > 0 {
        let total_guesses: usize = num_games_per_round
            .iter()
            .map(|(num_guesses, num_games)| num_guesses * *num_games as usize)
            .sum();
        println!(
            "\n**Average number of guesses:** {:.2}",
            total_guesses as f64 / num_solved as f64
        );
    }
    Ok(proposals)
}

fn play_interactive_game(
    word_bank: &WordBank,
    config: &SolverConfig,
) -> Result<Vec<WordProposal>, Box<dyn Error>> {
    let mut solver = PuzzleSolver::new(word_bank, config.clone());
    println!("Choose a five-letter word. Press enter once you've chosen.");

    {
        let mut buffer = String::new();
        io::stdin().read_line(&mut buffer)?;
    }

    println!(
        "I will now try to guess your word.\n\n\
         For each guess, enter the correctness of each letter as:\n\n\
           * '.' = this letter is not in the word\n\
           * 'y' = this letter is in the word, but not in this location\n\
           * 'g' = this letter is in the word and in the right location.\n\n\
         For example, if your word was \"spade\" and the guess was \"soapy\", you would enter \"g.gy.\"");

    while solver.status() == PuzzleStatus::Active {
        let guess = solver.next_guess()?;
        println!("I'm guessing: {}. How did I do?", guess);

        loop {
            let result = read_guess_result(guess)?;
            match solver.record_result(&result) {
                Ok(_) => break,
                Err(err) => println!("{} Try again.", err),
            }
        }
    }

    let Some(result) = solver.game_result() else {
        return Ok(Vec::new());
    };
    match &result {
        GameResult::Solved { guesses, .. } => {
            println!("I did it! It took me {} guesses.", guesses.len());
        }
        GameResult::Abandoned { .. } => println!("I couldn't guess it :("),
    }
    Ok(result.learned().into_iter().collect())
}

/// Reads one line of `g`, `y` and `.` feedback from stdin, asking again until it is valid.
fn read_guess_result(guess: Word) -> io::Result<GuessResult> {
    loop {
        let mut buffer = String::new();
        if io::stdin().read_line(&mut buffer)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed before the puzzle ended",
            ));
        }
        match parse_feedback_line(guess, buffer.trim()) {
            Ok(result) => return Ok(result),
            Err(message) => println!("{} Try again.", message),
        }
    }
}

fn parse_feedback_line(guess: Word, input: &str) -> Result<GuessResult, String> {
    if input.chars().count() != WORD_LENGTH {
        return Err(format!(
            "Input {} didn't match the length of my guess.",
            input
        ));
    }
    let results = input
        .chars()
        .map(|letter| match letter {
            '.' => Ok(LetterResult::NotPresent),
            'y' | 'Y' => Ok(LetterResult::PresentNotHere),
            'g' | 'G' => Ok(LetterResult::Correct),
            _ => Err("Must enter only the letters '.', 'y', or 'g'.".to_string()),
        })
        .collect::<Result<Vec<LetterResult>, String>>()?;
    GuessResult::new(guess, results).map_err(|err| err.to_string())
}

fn append_learned_words(words_file: &str, learned: &[WordProposal]) -> io::Result<()> {
    let mut file = OpenOptions::new().append(true).open(words_file)?;
    for proposal in learned {
        writeln!(file, "{}", proposal.word.to_string().to_lowercase())?;
        println!(
            "Learned {} after {} guesses.",
            proposal.word, proposal.attempts_used
        );
    }
    Ok(())
}

fn merge_word_files(first: &str, second: &str, output: &str) -> io::Result<()> {
    let mut unique_words = BTreeSet::new();
    for path in [first, second] {
        let before = unique_words.len();
        read_word_list(Path::new(path), &mut unique_words)?;
        println!(
            "Added {} new words from {}",
            unique_words.len() - before,
            path
        );
    }

    let mut file = io::BufWriter::new(File::create(output)?);
    for word in &unique_words {
        writeln!(file, "{}", word)?;
    }
    file.flush()?;
    println!("Wrote {} unique words to {}", unique_words.len(), output);
    Ok(())
}

fn read_word_list(path: &Path, words: &mut BTreeSet<String>) -> io::Result<()> {
    let reader = io::BufReader::new(File::open(path)?);
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<Word>() {
            Ok(word) => {
                words.insert(word.to_string().to_lowercase());
            }
            Err(err) => warn!("Skipping {:?} in {}: {}", line, path.display(), err),
        }
    }
    Ok(())
}
