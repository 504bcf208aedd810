use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use caves::generate::{generate, GeneratorOptions};
use caves::path::route_string;
use caves::trace::write_instructions;
use caves::util::{parse_cav, to_cav_string};
use caves::{CavernId, LogSink, PathFinder, PathFinderState, Trace};
use clap::{Args, Parser, Subcommand};
use log::info;
use rand::{rngs::StdRng, SeedableRng};

/// Find routes through caves
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search a route from the first to the last cavern of a cave
    Route(RouteArgs),
    /// Write a random cave description
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct RouteArgs {
    /// Cave description to search
    #[arg(short, long, default_value = "input.cav")]
    input: PathBuf,

    /// Log every iteration of the search
    #[arg(short, long)]
    verbose: bool,

    /// Write the replay script for the cave viewer
    #[arg(long)]
    visualize: bool,

    /// Where the replay script is written
    #[arg(long, default_value = "visualization/instructions.js")]
    instructions: PathBuf,

    /// Start cavern, defaults to the first one
    #[arg(long)]
    start: Option<usize>,

    /// Goal cavern, defaults to the last one
    #[arg(long)]
    goal: Option<usize>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// The number of caverns to create
    #[arg(long, default_value_t = 100)]
    count: usize,

    /// The width of the cave
    #[arg(long, default_value_t = 400)]
    width: i32,

    /// The height of the cave
    #[arg(long, default_value_t = 200)]
    height: i32,

    /// The chance in percent for 2 caverns to be connected
    #[arg(long, default_value_t = 50)]
    connectivity: u32,

    /// The max radius for a cavern's connections
    #[arg(long, default_value_t = 30)]
    radius: u32,

    /// Seed for reproducible caves
    #[arg(long)]
    seed: Option<u64>,

    #[arg(short, long, default_value = "generated.cav")]
    output: PathBuf,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn route(args: RouteArgs) -> Result<(), anyhow::Error> {
    let input = fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let cave = parse_cav(&input).with_context(|| format!("invalid cave {}", args.input.display()))?;

    let start = args.start.map(CavernId).unwrap_or_else(|| cave.first());
    let goal = args.goal.map(CavernId).unwrap_or_else(|| cave.last());
    info!(
        "Starting search from {} to {} in {} caverns",
        start,
        goal,
        cave.len()
    );

    let mut sinks = (
        args.verbose.then_some(LogSink),
        args.visualize.then(Trace::default),
    );
    let state = PathFinder::new(&cave, start, goal)?.finish(&cave, &mut sinks);

    match &state {
        PathFinderState::PathFound(result) => {
            println!("Found path: {}", route_string(&result.path));
            println!("Total distance: {}", result.total_distance);
            println!("Iterations: {}", result.iterations);
        }
        PathFinderState::NoPathFound { iterations } => {
            println!("Could not find a path");
            println!("Iterations: {}", iterations);
        }
        PathFinderState::Computing => return Err(anyhow!("search stopped early")),
    }

    if let Some(trace) = &sinks.1 {
        if let Some(dir) = args.instructions.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("cannot create {}", dir.display()))?;
        }
        let file = File::create(&args.instructions)
            .with_context(|| format!("cannot create {}", args.instructions.display()))?;
        write_instructions(BufWriter::new(file), &cave, trace)
            .with_context(|| format!("cannot write {}", args.instructions.display()))?;
        info!(
            "wrote {} states to {}",
            trace.records().len(),
            args.instructions.display()
        );
    }

    Ok(())
}

fn generate_cave(args: GenerateArgs) -> Result<(), anyhow::Error> {
    let options = GeneratorOptions {
        count: args.count,
        width: args.width,
        height: args.height,
        connectivity: args.connectivity,
        radius: args.radius,
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let cave = generate(&options, &mut rng)?;
    fs::write(&args.output, to_cav_string(&cave))
        .with_context(|| format!("cannot write {}", args.output.display()))?;
    info!(
        "wrote {} caverns with {} connections to {}",
        cave.len(),
        cave.edges().count(),
        args.output.display()
    );

    Ok(())
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    match cli.command {
        Command::Route(args) => {
            init_logging(args.verbose);
            route(args)
        }
        Command::Generate(args) => {
            init_logging(false);
            generate_cave(args)
        }
    }
}
