use std::error::Error;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};

use connect_four::ai::greedy::GreedyBot;
use connect_four::board::{GameEvent, GameOutcome, Input};
use connect_four::bot_game::BotGame;
use connect_four::config::AppConfig;
use connect_four::controller::TurnController;
use connect_four::grid::Grid;
use connect_four::net::{NetworkSession, SessionEvent};
use connect_four::rank::{FileRankStore, RankStore};
use connect_four::util::tiny::seeded_rng;

const INPUT_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Parser)]
#[command(about = "Connect Four in the terminal: local, against a bot, or over the network")]
struct Args {
    /// TOML config file, defaults are used if it does not exist.
    #[arg(long, default_value = "connect4.toml")]
    config: PathBuf,

    #[arg(long)]
    username: Option<String>,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Two players on this terminal.
    Local {
        #[arg(long)]
        size: Option<usize>,
    },
    /// Play against the bot, wins are added to the rank file.
    Bot {
        #[arg(long)]
        size: Option<usize>,
    },
    /// Wait for an opponent to join.
    Host {
        #[arg(long)]
        size: Option<usize>,
        #[arg(long)]
        addr: Option<String>,
    },
    /// Join a hosted game at ip:port.
    Join {
        #[arg(long)]
        addr: Option<String>,
    },
    /// Print the rank leaderboard.
    Ranks,
}

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let mut config = AppConfig::load_or_default(&args.config)?;
    if let Some(username) = args.username {
        config.username = username;
    }
    match &args.mode {
        Mode::Local { size: Some(size) } | Mode::Bot { size: Some(size) } | Mode::Host { size: Some(size), .. } => {
            config.board.size = *size
        }
        _ => {}
    }
    match &args.mode {
        Mode::Host { addr: Some(addr), .. } => config.network.host_addr = addr.clone(),
        Mode::Join { addr: Some(addr) } => config.network.join_addr = addr.clone(),
        _ => {}
    }
    config.validate()?;

    match args.mode {
        Mode::Local { .. } => run_local(&config),
        Mode::Bot { .. } => run_bot(&config),
        Mode::Host { .. } => {
            let session = NetworkSession::host(config.host_addr()?, config.board.size, &config.username)?;
            println!("Waiting for an opponent on {}...", session.local_addr());
            run_network(session)
        }
        Mode::Join { .. } => {
            let session = NetworkSession::join(config.join_addr()?, config.network.join_size, &config.username)?;
            println!("Connected, waiting for the host...");
            run_network(session)
        }
        Mode::Ranks => {
            let store = FileRankStore::open(&config.ranks.path)?;
            for (i, (name, rank)) in store.leaderboard()?.iter().enumerate() {
                println!("{:>3}. {:<20} {}", i + 1, name, rank);
            }
            Ok(())
        }
    }
}

fn run_local(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let mut controller = TurnController::new(Grid::with_columns(config.board.size)?);
    let input = spawn_input_reader();

    print!("{}", controller.grid());
    while let Some(color) = controller.active_color() {
        println!("{}'s turn, pick a column (q to quit):", color);
        let events = controller.handle(next_input(&input));
        render(controller.grid(), &events);
    }

    Ok(())
}

fn run_bot(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let seed = config.bot.seed.unwrap_or_else(rand::random);
    let bot = GreedyBot::new(seeded_rng(seed));
    let ranks = FileRankStore::open(&config.ranks.path)?;
    let grid = Grid::with_columns(config.board.size)?;

    let mut game = BotGame::new(grid, bot, ranks, &config.username, config.bot_delay());
    let input = spawn_input_reader();

    print!("{}", game.grid());
    while !game.outcome().is_done() {
        println!("{}'s turn, pick a column (q to quit):", config.username);
        let events = game.handle(next_input(&input))?;
        render(game.grid(), &events);
    }

    println!("Your rank: {}", game.ranks().rank(&config.username)?);
    Ok(())
}

fn run_network(mut session: NetworkSession) -> Result<(), Box<dyn Error>> {
    let input = spawn_input_reader();
    let mut prompted = false;

    while !session.is_terminated() {
        let mut events = session.wait_event(INPUT_POLL);

        // input is applied in every phase, the session rejects moves out of turn
        match input.try_recv() {
            Ok(input) => match session.handle(input) {
                Ok(more) => events.extend(more),
                Err(e) => println!("{}", e),
            },
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => events.extend(session.close()),
        }

        if session.is_local_turn() {
            if !prompted {
                println!("Your turn ({}), pick a column (q to quit):", session.local_color());
                prompted = true;
            }
        } else {
            prompted = false;
        }

        for event in &events {
            match event {
                SessionEvent::Connected { size, local_color } => {
                    println!("Opponent connected, {0}x{0} board, you play {1}", size, local_color)
                }
                SessionEvent::Game(_) => {}
            }
        }
        let game_events: Vec<GameEvent> = events
            .into_iter()
            .filter_map(|event| match event {
                SessionEvent::Game(event) => Some(event),
                SessionEvent::Connected { .. } => None,
            })
            .collect();
        render(session.grid(), &game_events);
    }

    if let Some(reason) = session.end_reason() {
        println!("Session ended: {:?}", reason);
    }
    Ok(())
}

fn render(grid: &Grid, events: &[GameEvent]) {
    let mut changed = false;
    for event in events {
        match event {
            GameEvent::BoardChanged { mv, row } => {
                log::debug!("{} landed on row {}", mv, row);
                changed = true;
            }
            GameEvent::TurnChanged(_) => {}
            GameEvent::GameEnded(outcome) => match outcome {
                GameOutcome::Win(color) => println!("Game over, {} wins!", color),
                GameOutcome::Draw => println!("Game over, it's a draw."),
                GameOutcome::Disconnected => println!("Game abandoned."),
                GameOutcome::InProgress => {}
            },
        }
    }
    if changed {
        print!("{}", grid);
    }
}

/// Read stdin on its own thread so the game loop can keep polling the network.
fn spawn_input_reader() -> Receiver<Input> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(_) => break,
            };
            let line = line.trim();
            let input = if line.eq_ignore_ascii_case("q") {
                Input::Abort
            } else {
                match line.parse() {
                    Ok(column) => Input::ColumnSelected(column),
                    Err(_) => {
                        println!("'{}' is not a column number", line);
                        continue;
                    }
                }
            };
            if sender.send(input).is_err() {
                break;
            }
        }
    });
    receiver
}

/// Block until the player enters something, stdin closing counts as quitting.
fn next_input(input: &Receiver<Input>) -> Input {
    input.recv().unwrap_or(Input::Abort)
}
