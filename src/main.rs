use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    thread::sleep,
    time::{Duration, Instant},
};

use clap::{Args, Parser, Subcommand};
use ludo::{
    config::{GameConfig, Mode, Participant},
    error::GameError,
    ludo::{Color, Game, MoveReport, Phase, RollOutcome, SafeZones},
    selfplay,
    snapshot::{self, Snapshot},
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Parser, Debug)]
#[command(name = "ludo", version, about = "Four-player Ludo with computer opponents")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a game in the terminal
    Play(PlayArgs),
    /// Run AI-only games in parallel and report win rates
    Simulate {
        #[arg(long, default_value_t = 1000)]
        games: u32,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        secondary_safe: bool,
    },
    /// Print a saved game
    Show { path: PathBuf },
}

#[derive(Args, Debug)]
struct PlayArgs {
    /// Colors played from the keyboard; every other color is the computer
    #[arg(long = "human", value_parser = parse_color)]
    humans: Vec<Color>,
    #[arg(long)]
    secondary_safe: bool,
    /// Entry squares are not safe
    #[arg(long)]
    open_starts: bool,
    /// Seconds per roll; enables timed scoring
    #[arg(long)]
    timed: Option<u32>,
    #[arg(long)]
    seed: Option<u64>,
    /// Pause before each computer move
    #[arg(long, default_value_t = 400)]
    think_ms: u64,
    /// Write the game here after every move
    #[arg(long)]
    save: Option<PathBuf>,
    /// Continue a saved game; falls back to a new game if it cannot be resumed
    #[arg(long)]
    resume: Option<PathBuf>,
}

fn parse_color(s: &str) -> Result<Color, String> {
    Color::parse(s).ok_or_else(|| format!("unknown color '{s}'"))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match cli.cmd {
        Command::Play(args) => play(args),
        Command::Simulate { games, seed, secondary_safe } => simulate(games, seed, secondary_safe),
        Command::Show { path } => show(path),
    };
    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn simulate(games: u32, seed: u64, secondary_safe: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = GameConfig::default().with_zones(SafeZones::with_secondary(secondary_safe));
    let start = Instant::now();
    let stats = selfplay::simulate(&config, games, seed)?;
    println!("============================================");
    println!("Games: {}, Unfinished: {}", stats.games, stats.unfinished);
    for color in Color::ALL {
        println!(
            "{:<6} wins: {:>6}, win rate: {:.2}%",
            color.to_string(),
            stats.wins.get(&color).copied().unwrap_or(0),
            stats.win_rate(color)
        );
    }
    println!("Moves per game: {:.1}, captures per game: {:.1}", stats.average_moves, stats.average_captures);
    println!("Simulation took: {:?}", start.elapsed());
    println!("============================================");
    Ok(())
}

fn show(path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = Snapshot::load(&path)?;
    println!("{}", snapshot.board.to_fancy_string(&snapshot.config.zones));
    println!("{} to play, phase {:?}", snapshot.current, snapshot.phase);
    match Game::resume(snapshot) {
        Ok(game) => print_standings(&game),
        Err(err) => println!("cannot be resumed: {err}"),
    }
    Ok(())
}

fn play(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = GameConfig::default().with_zones(SafeZones { entries: !args.open_starts, secondary: args.secondary_safe });
    for &color in &args.humans {
        config.seats.set(color, Participant::Human);
    }
    if let Some(turn_secs) = args.timed {
        config = config.with_mode(Mode::Timed { turn_secs });
    }

    let mut game = match &args.resume {
        Some(path) => snapshot::resume_or_new(path, config)?,
        None => Game::new(config)?,
    };
    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    };
    let think = Duration::from_millis(args.think_ms);
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        let color = game.current();
        match game.phase() {
            Phase::GameOver { winner } => {
                println!("{}", game.board().to_fancy_string(&game.config().zones));
                println!("Player {winner} wins!");
                print_standings(&game);
                return Ok(());
            }
            Phase::Rolling => {
                game.start_turn_clock(Instant::now());
                if game.participant(color) == Participant::Human {
                    println!("{}", game.board().to_fancy_string(&game.config().zones));
                    prompt(&format!("{color}: press enter to roll"))?;
                    if read_line(&mut input)?.is_none() {
                        return Ok(());
                    }
                    if game.poll_turn_clock(Instant::now()) {
                        println!("{color} took too long and loses the turn");
                        continue;
                    }
                }
                match game.roll_random(&mut rng)? {
                    RollOutcome::NoMove { reroll: true } => println!("{color} rolled 6 but cannot move, rolls again"),
                    RollOutcome::NoMove { reroll: false } => println!("{color} rolled {} and cannot move", die_of(&game)),
                    RollOutcome::AwaitingMove(moves) => println!("{color} rolled {}, {} options", die_of(&game), moves.len()),
                    RollOutcome::Moved(report) => print_report(&report),
                }
            }
            Phase::Moving { .. } => match game.participant(color) {
                Participant::Human => {
                    for mv in game.legal_moves().iter() {
                        println!("  {mv:?}");
                    }
                    prompt(&format!("{color}: pawn to move"))?;
                    let Some(line) = read_line(&mut input)? else {
                        return Ok(());
                    };
                    let Ok(pawn) = line.trim().parse::<u8>() else {
                        println!("enter a pawn number");
                        continue;
                    };
                    match game.select(color, pawn) {
                        Ok(report) => print_report(&report),
                        Err(err @ GameError::InvalidMoveSelection { .. }) => println!("{err}, try again"),
                        Err(err) => return Err(err.into()),
                    }
                }
                _ => {
                    let ticket = game.ticket();
                    sleep(think);
                    if game.is_current(ticket) {
                        print_report(&game.play_ai(&mut rng)?);
                    }
                }
            },
        }

        if let Some(path) = &args.save {
            game.snapshot().save(path)?;
        }
    }
}

fn die_of(game: &Game) -> u8 {
    game.last_die().map_or(0, |d| d.value())
}

fn print_report(report: &MoveReport) {
    println!("{} rolled {} and moved {:?}", report.color, report.die.value(), report.mv);
    for (victim, pawn) in report.outcome.captured.iter() {
        println!("  captured {victim} pawn {pawn}");
    }
    if report.outcome.reached_home {
        println!("  a pawn reached home");
    }
}

fn print_standings(game: &Game) {
    for (place, standing) in game.standings().iter().enumerate() {
        println!(
            "{}. {:<6} finished {} score {} progress {}",
            place + 1,
            standing.color.to_string(),
            standing.finished,
            standing.effective_score,
            standing.progress
        );
    }
}

fn prompt(text: &str) -> io::Result<()> {
    print!("{text}> ");
    io::stdout().flush()
}

/// `None` once the input is closed.
fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    match input.read_line(&mut line)? {
        0 => Ok(None),
        _ => Ok(Some(line)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn closed_input_ends_reading() {
        let mut input = Cursor::new("2\n\n");
        assert_eq!(read_line(&mut input).unwrap().as_deref(), Some("2\n"));
        assert_eq!(read_line(&mut input).unwrap().as_deref(), Some("\n"));
        assert_eq!(read_line(&mut input).unwrap(), None);
    }
}
