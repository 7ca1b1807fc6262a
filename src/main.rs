//! Life GIF CLI - Render a seeded simulation to an animated GIF.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use log::error;

use life_gif::{
    animation::{AnimationError, render_to_file, resolve_selection},
    schema::{AnimationConfig, Seed},
};

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [output.gif]", args[0]);
        eprintln!();
        eprintln!("Render a Life-like pattern to an animated GIF.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to animation configuration file");
        eprintln!("  output.gif   Destination (overrides \"output\" in the config)");
        eprintln!();
        eprintln!("The seed is read from <config>.seed.json when present (default: glider).");
        eprintln!("Example configuration is generated with --example flag.");
        return ExitCode::FAILURE;
    }

    if args[1] == "--example" {
        print_example_config();
        return ExitCode::SUCCESS;
    }

    let config_path = PathBuf::from(&args[1]);
    match run(&config_path, args.get(2).map(PathBuf::from)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: &Path, output: Option<PathBuf>) -> Result<(), CliError> {
    let config_str = fs::read_to_string(config_path).map_err(|source| CliError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;
    let mut config: AnimationConfig = serde_json::from_str(&config_str).map_err(|source| {
        CliError::Parse {
            path: config_path.to_path_buf(),
            source,
        }
    })?;
    if let Some(output) = output {
        config.output = output;
    }

    let seed_path = config_path.with_extension("seed.json");
    let seed: Seed = if seed_path.exists() {
        let seed_str = fs::read_to_string(&seed_path).map_err(|source| CliError::Read {
            path: seed_path.clone(),
            source,
        })?;
        serde_json::from_str(&seed_str).map_err(|source| CliError::Parse {
            path: seed_path.clone(),
            source,
        })?
    } else {
        Seed::default()
    };

    let mut seeded = seed.generate().map_err(AnimationError::from)?;
    let selection = resolve_selection(&config, seeded.bounds).map_err(AnimationError::from)?;

    let start = Instant::now();
    render_to_file(&config, &selection, &mut seeded.grid)?;
    log::info!(
        "Done in {:.2}s (generation {}, population {})",
        start.elapsed().as_secs_f32(),
        seeded.grid.generation(),
        seeded.grid.population()
    );
    Ok(())
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Error parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Animation(#[from] AnimationError),
}

fn print_example_config() {
    let config = AnimationConfig::default();
    let seed = Seed::default();

    match (
        serde_json::to_string_pretty(&config),
        serde_json::to_string_pretty(&seed),
    ) {
        (Ok(config), Ok(seed)) => {
            println!("Example configuration (config.json):");
            println!("{config}");
            println!();
            println!("Example seed (config.seed.json):");
            println!("{seed}");
        }
        (Err(e), _) | (_, Err(e)) => error!("Could not serialize example: {e}"),
    }
}
