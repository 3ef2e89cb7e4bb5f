use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use snake_qlearn::config::{Config, ObstacleMode};
use snake_qlearn::experiment;
use snake_qlearn::qtable::QTable;
use snake_qlearn::results::{self, Summary, TrainingRecord};
use snake_qlearn::session::Session;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snake-qlearn", version, about = "Snake played by a tabular Q-learning agent")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run replicated experiments for each trial count
    Train(TrainArgs),
    /// Train a single agent episode by episode
    Play(PlayArgs),
    /// Describe the records of one training session in a results file
    Summary {
        file: PathBuf,
        /// Session number; the latest when omitted
        count: Option<u64>,
    },
}

#[derive(Args)]
struct BoardArgs {
    /// JSON config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    /// Turn away from collisions when a safe move exists
    #[arg(long)]
    assist: bool,
    /// Wrap around the edges instead of dying on them
    #[arg(long)]
    no_boundary: bool,
    #[arg(long)]
    obstacles: Option<usize>,
    /// Obstacles kill instead of bouncing the snake
    #[arg(long)]
    solid_obstacles: bool,
    #[arg(long)]
    epsilon: Option<f32>,
    #[arg(long)]
    tick_limit: Option<u64>,
}

impl BoardArgs {
    fn resolve(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path).with_context(|| format!("loading config {}", path.display()))?,
            None => Config::default(),
        };
        config.game.assist |= self.assist;
        config.game.no_boundary |= self.no_boundary;
        if let Some(n) = self.obstacles {
            config.game.obstacles = n;
        }
        if self.solid_obstacles {
            config.game.obstacle_mode = ObstacleMode::Solid;
        }
        if let Some(e) = self.epsilon {
            config.learning.epsilon = e;
        }
        if let Some(t) = self.tick_limit {
            config.learning.tick_limit = t;
        }
        config.validate()?;
        Ok(config)
    }

    fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

#[derive(Args)]
struct TrainArgs {
    #[arg(short, long, default_value_t = 100)]
    replications: u32,
    /// Trial counts, one experiment each
    #[arg(short, long = "trials", num_args = 1.., default_values_t = [10, 20])]
    trials: Vec<u32>,
    /// Results file to append to; prints a summary when omitted
    #[arg(short, long)]
    out: Option<PathBuf>,
    #[command(flatten)]
    board: BoardArgs,
}

#[derive(Args)]
struct PlayArgs {
    #[arg(short, long, default_value_t = 100)]
    episodes: u32,
    #[arg(long)]
    load: Option<PathBuf>,
    #[arg(long)]
    save: Option<PathBuf>,
    /// Print the board after the last episode
    #[arg(long)]
    show: bool,
    #[command(flatten)]
    board: BoardArgs,
}

fn print_records(records: &[TrainingRecord]) {
    for record in records {
        println!("Trials: {}; Replications: {}", record.trials, record.replications);
        match Summary::of(&record.final_scores) {
            Some(summary) => println!("{summary}"),
            None => println!("no scores"),
        }
    }
}

fn train(args: TrainArgs) -> Result<()> {
    let config = args.board.resolve()?;
    let seed = args.board.seed();
    log::info!("seed {seed}");

    let records = experiment::train(&config, args.replications, &args.trials, seed)?;
    match &args.out {
        Some(path) => {
            let session = results::append_session(path, &records)
                .with_context(|| format!("writing results to {}", path.display()))?;
            println!("Training: {session} -> {}", path.display());
        }
        None => print_records(&records),
    }
    Ok(())
}

fn play(args: PlayArgs) -> Result<()> {
    let config = args.board.resolve()?;
    let seed = args.board.seed();
    let table = match &args.load {
        Some(path) => QTable::load(path).with_context(|| format!("loading q-table {}", path.display()))?,
        None => QTable::from_config(&config.learning),
    };

    let mut session = Session::with_table(config, table, seed)?;
    let mut scores = Vec::with_capacity(args.episodes as usize);
    for episode in 1..=args.episodes {
        if episode > 1 {
            session.reset()?;
        }
        let summary = session.play_episode();
        log::info!(
            "episode {episode}: score {} in {} ticks ({:?})",
            summary.score,
            summary.ticks,
            summary.death
        );
        scores.push(summary.score);
    }

    if args.show {
        println!("{}", session.game());
    }
    if let Some(summary) = Summary::of(&scores) {
        println!("{summary}");
    }
    println!("{} states learned", session.table().len());

    if let Some(path) = &args.save {
        session.table().save(path).with_context(|| format!("saving q-table {}", path.display()))?;
    }
    Ok(())
}

fn summary(file: PathBuf, count: Option<u64>) -> Result<()> {
    let (session, records) =
        results::read_session(&file, count).with_context(|| format!("reading {}", file.display()))?;
    if records.is_empty() {
        bail!("training session {session} in {} has no records", file.display());
    }
    println!("Training: {session}");
    print_records(&records);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Train(args) => train(args)?,
        Commands::Play(args) => play(args)?,
        Commands::Summary { file, count } => summary(file, count)?,
    }
    Ok(())
}
