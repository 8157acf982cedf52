//! goalstats - analyses over persisted goal tables
//!
//! Tables are given as paths, or taken from a dataset plan:
//!
//! ```text
//! goalstats summary data/goals_competition43_season106.csv
//! goalstats home-away --plan config/datasets.yaml --kind league
//! goalstats histogram --plan config/datasets.yaml --kind tournament --stage knockout --weighted
//! ```

mod commands;
mod render;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use commands::{HistogramRequest, Layout, StageFilter};
use dataset_builder::DatasetPlan;
use goal_core::{DatasetKind, GoalTable};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "goalstats")]
#[command(about = "Goal timing statistics over goal tables", long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct TableArgs {
    /// Goal table CSV files (pooled)
    tables: Vec<PathBuf>,

    /// Take the tables from a dataset plan instead
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Which tables of the plan
    #[arg(long, value_enum, default_value = "league")]
    kind: KindArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    League,
    Tournament,
}

impl From<KindArg> for DatasetKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::League => DatasetKind::League,
            KindArg::Tournament => DatasetKind::Tournament,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Timeline,
    SplitHalves,
}

#[derive(Clone, Copy, ValueEnum)]
enum StageArg {
    All,
    Group,
    Knockout,
}

#[derive(Subcommand)]
enum Commands {
    /// Goals per match, per half and (tournaments) per stage
    Summary {
        #[command(flatten)]
        input: TableArgs,
    },

    /// Home vs away goal rates and timing
    HomeAway {
        #[command(flatten)]
        input: TableArgs,
    },

    /// First vs second half tests and pairwise interval p-values
    Halves {
        #[command(flatten)]
        input: TableArgs,

        /// Interval length in minutes (must divide 45)
        #[arg(long, default_value_t = 5)]
        interval: u32,
    },

    /// Goal histogram over the continuous minute axis
    Histogram {
        #[command(flatten)]
        input: TableArgs,

        /// Bin width in minutes
        #[arg(long, default_value_t = 15)]
        width: u32,

        /// Goals per match instead of total goals
        #[arg(long)]
        weighted: bool,

        #[arg(long, value_enum, default_value = "timeline")]
        layout: LayoutArg,

        /// Tournament stage to include
        #[arg(long, value_enum, default_value = "all")]
        stage: StageArg,
    },
}

impl TableArgs {
    fn load(&self) -> Result<GoalTable> {
        let paths = match (&self.plan, self.tables.is_empty()) {
            (Some(_), false) => bail!("Give either table paths or --plan, not both"),
            (Some(plan), true) => DatasetPlan::load(plan)?.table_paths(self.kind.into()),
            (None, false) => self.tables.clone(),
            (None, true) => bail!("No goal tables given (pass CSV paths or --plan)"),
        };
        commands::load_tables(&paths)
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text(value));
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Summary { input } => {
            let table = input.load()?;
            emit(cli.json, &commands::summary(&table), render::summary)
        }
        Commands::HomeAway { input } => {
            let table = input.load()?;
            emit(cli.json, &commands::home_away(&table)?, render::home_away)
        }
        Commands::Halves { input, interval } => {
            let table = input.load()?;
            emit(cli.json, &commands::halves(&table, interval)?, render::halves)
        }
        Commands::Histogram {
            input,
            width,
            weighted,
            layout,
            stage,
        } => {
            let table = input.load()?;
            let request = HistogramRequest {
                width,
                weighted,
                layout: match layout {
                    LayoutArg::Timeline => Layout::Timeline,
                    LayoutArg::SplitHalves => Layout::SplitHalves,
                },
                stage: match stage {
                    StageArg::All => StageFilter::All,
                    StageArg::Group => StageFilter::Group,
                    StageArg::Knockout => StageFilter::Knockout,
                },
            };
            emit(
                cli.json,
                &commands::histogram(&table, &request)?,
                render::histogram,
            )
        }
    }
}
