//! Headless converter and inspector for recordings.
//!
//! ```text
//! ts-scribe convert <input> <output>
//! ts-scribe info <file>
//! ```
//!
//! Formats are chosen by file name (`.txt` raw export, `.csv` processed
//! table, `.scribe.json` session).

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

#[cfg(not(target_arch = "wasm32"))]
use clap::{Parser, Subcommand};

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "ts-scribe")]
#[command(about = "Convert and inspect labeled reflux recordings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Convert a recording between formats
    Convert {
        /// Raw export, processed table or session file to read
        input: PathBuf,
        /// Destination; the format follows its file name
        output: PathBuf,
    },
    /// Print a per-channel and per-category summary
    Info { file: PathBuf },
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    use ts_scribe::AppConfig;

    let config = AppConfig::load_from_default_path().unwrap_or_default();
    let level = config.preferences.log_level.to_level_filter();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .format_timestamp(None)
        .init();

    let args = Cli::parse();
    let result = match args.command {
        Commands::Convert { input, output } => cli::convert(config, &input, &output),
        Commands::Info { file } => cli::info(config, &file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::collections::BTreeMap;
    use std::path::Path;

    use ts_scribe::frame::format_clock;
    use ts_scribe::{AppConfig, DataError, Session};

    pub fn convert(config: AppConfig, input: &Path, output: &Path) -> Result<(), DataError> {
        let mut session = Session::new(config);
        session.load_file(input)?;
        let result = session.export(output)?;
        println!(
            "Wrote {} rows and {} labels to {}",
            result.rows_written,
            result.labels_exported,
            output.display()
        );
        Ok(())
    }

    pub fn info(config: AppConfig, file: &Path) -> Result<(), DataError> {
        let mut session = Session::new(config);
        session.load_file(file)?;
        let (Some(dataset), Some(labels)) = (session.dataset(), session.labels()) else {
            return Ok(());
        };

        println!("{}", file.display());
        for (id, channel) in dataset.channels() {
            let first = channel.time.first().copied().unwrap_or_default();
            let last = channel.time.last().copied().unwrap_or_default();
            println!(
                "  {:<3} {:>10} samples  {} .. {}",
                id.name(),
                channel.len(),
                format_clock(first),
                format_clock(last)
            );
        }
        println!("  impedance ceiling {}", dataset.impedance_ceiling);

        let mut per_category: BTreeMap<&str, usize> = BTreeMap::new();
        for label in labels {
            *per_category.entry(label.category.as_str()).or_default() += 1;
        }
        println!("  {} labels", labels.len());
        for (category, count) in per_category {
            println!("    {:<16} {}", category, count);
        }
        Ok(())
    }
}

// No command line on wasm
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_convert() {
        let cli = Cli::try_parse_from(["ts-scribe", "convert", "in.txt", "out.scribe.json"])
            .expect("convert should parse");
        assert_eq!(
            cli.command,
            Commands::Convert {
                input: PathBuf::from("in.txt"),
                output: PathBuf::from("out.scribe.json"),
            }
        );
    }

    #[test]
    fn test_parse_info() {
        let cli = Cli::try_parse_from(["ts-scribe", "info", "rec.csv"]).expect("info should parse");
        assert_eq!(
            cli.command,
            Commands::Info {
                file: PathBuf::from("rec.csv")
            }
        );
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(Cli::try_parse_from(["ts-scribe"]).is_err());
        assert!(Cli::try_parse_from(["ts-scribe", "convert", "only-one"]).is_err());
        assert!(Cli::try_parse_from(["ts-scribe", "render", "x"]).is_err());
    }

    #[test]
    fn test_command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
