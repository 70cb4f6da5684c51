#![warn(clippy::pedantic)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use bld::{
    Moveset,
    api::{self, BldSolutionData, BldSolutionResult, MistakeData, StateData},
    default_moveset,
};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{WrapErr, eyre};
use env_logger::TimestampPrecision;
use itertools::Itertools;
use log::{LevelFilter, info};

/// Blindfolded solutions for the 3x3x3 cube
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a scramble and print its moves.
    Parse {
        /// The scramble, e.g. "R U' F2". Separate words are joined with spaces.
        scramble: Vec<String>,
    },
    /// Print the cube state a scramble produces.
    State {
        /// The scramble, e.g. "R U' F2". Separate words are joined with spaces.
        scramble: Vec<String>,
    },
    /// Solve a scrambled cube with buffer swaps.
    Solve {
        /// The scramble, e.g. "R U' F2". Separate words are joined with spaces.
        scramble: Vec<String>,
        /// A moveset JSON file to use instead of the default one
        #[arg(long, short = 'm', value_name = "MOVESET")]
        moveset: Option<PathBuf>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write out commutator and conjugate shorthand move by move.
    Expand {
        /// The notation, e.g. "R U R': D". Separate words are joined with spaces.
        notation: Vec<String>,
    },
    /// Find the operation that went wrong while solving a scramble.
    Check {
        /// The scramble that was solved. Separate words are joined with spaces.
        scramble: Vec<String>,
        /// The moves actually performed after the scramble
        #[arg(long, short = 'p', value_name = "MOVES")]
        performed: String,
    },
    /// Write the default moveset as JSON.
    ExportMoveset {
        /// Where to write the moveset; stdout if omitted
        output: Option<PathBuf>,
    },
}

fn load_moveset(path: &Path) -> color_eyre::Result<Moveset> {
    let json = fs::read_to_string(path).wrap_err_with(|| format!("Could not read {}", path.display()))?;
    let moveset = Moveset::from_json(&json)?;
    moveset.verify()?;
    info!("Loaded moveset `{}` with {} algorithms", moveset.name(), moveset.len());
    Ok(moveset)
}

fn scramble_state(scramble: &str) -> color_eyre::Result<StateData> {
    let result = api::apply_scramble_to_state(scramble);
    result.state.ok_or_else(|| eyre!(result.error.unwrap_or_default()))
}

/// Solves `scramble` with the moveset at `moveset`, or the default moveset if
/// there is none.
fn solve_scramble(scramble: &str, moveset: Option<&Path>) -> color_eyre::Result<BldSolutionResult> {
    let custom = moveset.map(load_moveset).transpose()?;
    let moveset = match &custom {
        Some(moveset) => moveset,
        None => default_moveset(),
    };

    let state = scramble_state(scramble)?;
    Ok(api::solve_bld(&state.cp, &state.co, &state.ep, &state.eo, moveset))
}

/// The single wrong operations that explain ending up where `performed`
/// leaves the cube after `scramble`.
fn check_execution(scramble: &str, performed: &str) -> color_eyre::Result<Vec<MistakeData>> {
    let before = scramble_state(scramble)?;
    let after = scramble_state(&format!("{scramble} {performed}"))?;
    let result = api::detect_wrong_operations(&before, &after);
    result.mistakes.ok_or_else(|| eyre!(result.error.unwrap_or_default()))
}

fn print_solution(solution: &BldSolutionData) {
    if solution.move_sequences.is_empty() {
        println!("Already solved");
        return;
    }

    for sequence in &solution.move_sequences {
        println!("{}", sequence.description);
        println!("    {}", sequence.sequence);
    }
    println!();
    println!("{}", solution.formatted_solution);
}

fn main() -> color_eyre::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    match cli.command {
        Commands::Parse { scramble } => {
            let parsed = api::parse_scramble(&scramble.join(" "));
            match parsed.moves {
                Some(moves) => println!("{}", moves.iter().join(" ")),
                None => return Err(eyre!(parsed.error.unwrap_or_default())),
            }
        }
        Commands::State { scramble } => {
            let result = api::apply_scramble_to_state(&scramble.join(" "));
            let Some(state) = result.state else {
                return Err(eyre!(result.error.unwrap_or_default()));
            };
            println!("cp: [{}]", state.cp.iter().join(", "));
            println!("co: [{}]", state.co.iter().join(", "));
            println!("ep: [{}]", state.ep.iter().join(", "));
            println!("eo: [{}]", state.eo.iter().join(", "));
        }
        Commands::Solve {
            scramble,
            moveset,
            json,
        } => {
            let result = solve_scramble(&scramble.join(" "), moveset.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else if let Some(solution) = &result.solution {
                print_solution(solution);
            } else {
                return Err(eyre!(result.error.unwrap_or_default()));
            }
        }
        Commands::Expand { notation } => {
            let expanded = api::expand_notation(&notation.join(" "));
            match expanded.moves {
                Some(moves) => println!("{}", moves.iter().join(" ")),
                None => return Err(eyre!(expanded.error.unwrap_or_default())),
            }
        }
        Commands::Check { scramble, performed } => {
            let mistakes = check_execution(&scramble.join(" "), &performed)?;
            if mistakes.is_empty() {
                println!("No single wrong operation leads to this state");
            }
            for mistake in &mistakes {
                println!("{}", mistake.description);
            }
        }
        Commands::ExportMoveset { output } => {
            let json = default_moveset().to_json()?;
            match output {
                Some(path) => {
                    fs::write(&path, json).wrap_err_with(|| format!("Could not write {}", path.display()))?;
                }
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    #[test]
    fn solves_with_exported_moveset() {
        let path = env::temp_dir().join(format!("bld-cli-moveset-{}.json", std::process::id()));
        fs::write(&path, default_moveset().to_json().unwrap()).unwrap();

        let custom = solve_scramble("R U F'", Some(&path)).unwrap();
        let default = solve_scramble("R U F'", None).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(custom.success, "{:?}", custom.error);
        assert_eq!(custom, default);
    }

    #[test]
    fn missing_moveset_file() {
        let path = env::temp_dir().join("bld-cli-no-such-moveset.json");
        let err = solve_scramble("R", Some(&path)).unwrap_err();
        assert!(err.to_string().starts_with("Could not read"));
    }

    #[test]
    fn bad_scramble_is_an_error() {
        assert!(solve_scramble("R Q", None).is_err());
    }

    #[test]
    fn check_finds_skipped_operation() {
        let scramble = "R U2 F' L D";
        let solution = solve_scramble(scramble, None).unwrap().solution.unwrap();
        let performed = solution.move_sequences[1..]
            .iter()
            .map(|sequence| sequence.sequence.as_str())
            .join(" ");

        let mistakes = check_execution(scramble, &performed).unwrap();
        assert_eq!(mistakes.len(), 1);
        assert_eq!(mistakes[0].step, 0);
        assert_eq!(mistakes[0].performed, None);

        let correct = check_execution(scramble, &solution.formatted_solution).unwrap();
        assert!(correct.is_empty());
    }
}
