use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;

use bpnet::prelude::*;
use clap::Parser;
use env_logger::{Env, Target};

#[derive(Parser, Debug)]
#[command(author, version, about = "Train or test a backpropagation classifier")]
struct Args {
    /// JSON configuration file
    #[arg(short, long, default_value = "./config.json")]
    config: PathBuf,

    /// Overrides `data_file`
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Overrides `epochs`
    #[arg(short, long)]
    epochs: Option<usize>,

    /// Overrides `seed`
    #[arg(long)]
    seed: Option<u64>,
}

fn init_logging(config: &Config) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if let Some(path) = &config.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn start(args: Args) -> Result<()> {
    let mut config = Config::from_file(&args.config)?;
    if let Some(data) = args.data {
        config.data_file = data;
    }
    if let Some(epochs) = args.epochs {
        config.epochs = epochs;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;

    init_logging(&config)?;
    bpnet::models::run(&config)?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match start(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
