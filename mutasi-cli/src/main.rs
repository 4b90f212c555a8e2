use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use mutasi_ingest::{pages_from_json, parse_document, StatementFormat};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

mod config;
mod export;
mod logging;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "mutasi",
    version = env!("MUTASI_VERSION"),
    about = "Extract transactions from bank statement text"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a JSON dump of positioned page tokens into transactions
    Parse {
        /// Token dump: {"pages": [[{"text","x","y"}, ...], ...]}
        tokens: PathBuf,

        /// Statement layout (defaults to config parse.default_format)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Fallback statement year when the period label is unreadable
        #[arg(long)]
        year: Option<i32>,

        /// Write CSV to this file instead of printing a table
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print the full report (records + per-page strategy) as JSON
        #[arg(long, conflicts_with = "out")]
        json: bool,
    },

    /// Manage ~/.mutasi/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    /// Sequential layout (DD/MM dates, 1,234.56 amounts, DB marker)
    A,
    /// Tabular layout (numbered rows, DD Mon YYYY dates, -1.234,56 amounts)
    B,
}

impl From<FormatArg> for StatementFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::A => StatementFormat::Sequential,
            FormatArg::B => StatementFormat::Tabular,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    logging::setup_logging(&cfg.output.log_level);

    match cli.command {
        Command::Parse {
            tokens,
            format,
            year,
            out,
            json,
        } => {
            if !tokens.exists() {
                bail!("token dump not found: {}", tokens.display());
            }
            let format = format.map(StatementFormat::from).unwrap_or(cfg.parse.default_format);
            let options = cfg.parse_options(year);

            let raw = state::read_token_dump(&tokens).await?;
            let mut pages = pages_from_json(&raw)
                .with_context(|| format!("parsing {}", tokens.display()))?;
            let report = parse_document(&mut pages, format, &options)?;

            if let Some(path) = out {
                let file = File::create(&path)
                    .with_context(|| format!("create {}", path.display()))?;
                export::write_csv(BufWriter::new(file), &report.records)?;
                info!(records = report.records.len(), path = %path.display(), "wrote csv");
            } else if json {
                export::write_json(std::io::stdout().lock(), &report)?;
                println!();
            } else {
                export::print_table(&report);
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}
