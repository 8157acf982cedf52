//! Dataset Builder CLI
//!
//! StatsBomb open data → goal tables (one CSV per competition + season)

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use dataset_builder::{BuildConfig, BuildOutcome, DatasetPlan, SourceConfig};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "dataset_builder")]
#[command(about = "Build goal tables from StatsBomb open data", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    League,
    Tournament,
}

#[cfg(feature = "cli")]
impl From<Kind> for goal_core::DatasetKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::League => goal_core::DatasetKind::League,
            Kind::Tournament => goal_core::DatasetKind::Tournament,
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Build the table of one competition + season
    Build {
        #[arg(long)]
        competition: u32,

        #[arg(long)]
        season: u32,

        #[arg(long, value_enum, default_value = "league")]
        kind: Kind,

        /// Directory the table and its metadata are written to
        #[arg(long, default_value = "data")]
        out_dir: PathBuf,

        /// Rebuild even if the table exists
        #[arg(long)]
        force: bool,

        /// Skip home/away attribution
        #[arg(long)]
        no_side: bool,

        /// Local open-data `data/` directory (instead of HTTP)
        #[arg(long)]
        source_dir: Option<PathBuf>,

        /// Open-data base URL
        #[arg(long, default_value = dataset_builder::source::DEFAULT_BASE_URL)]
        base_url: String,

        /// HTTP attempts per request
        #[arg(long, default_value_t = dataset_builder::source::DEFAULT_MAX_ATTEMPTS)]
        max_attempts: u32,
    },

    /// Build every table listed in a dataset plan
    BuildPlan {
        #[arg(long, default_value = "config/datasets.yaml")]
        plan: PathBuf,

        #[arg(long)]
        force: bool,
    },

    /// Check tables against the checksums in their metadata
    Verify {
        #[arg(required = true)]
        tables: Vec<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Build {
            competition,
            season,
            kind,
            out_dir,
            force,
            no_side,
            source_dir,
            base_url,
            max_attempts,
        } => {
            let source = match source_dir {
                Some(path) => SourceConfig::OpenDataDir { path },
                None => SourceConfig::Http {
                    base_url,
                    max_attempts,
                },
            }
            .open()?;

            let config = BuildConfig::new(competition, season, &out_dir, kind.into())
                .force(force)
                .with_side(!no_side);

            println!("🔨 Building goal table...");
            println!("   Competition: {}", competition);
            println!("   Season:      {}", season);
            println!("   Output:      {}", config.output_path.display());

            let outcome = dataset_builder::build_dataset(source.as_ref(), &config)?;
            let failed = print_outcome(&config.output_path.display().to_string(), &outcome);
            if failed > 0 {
                anyhow::bail!("❌ {} matches failed (table written without them)", failed);
            }
        }

        Commands::BuildPlan { plan, force } => {
            let plan = DatasetPlan::load(&plan)?;
            let source = plan.source.open()?;

            println!("🔨 Building {} datasets...", plan.leagues.len() + plan.tournaments.len());

            let mut errors = 0;
            let mut failed_matches = 0;
            for (label, result) in dataset_builder::build_plan(&plan, source.as_ref(), force) {
                match result {
                    Ok(outcome) => failed_matches += print_outcome(&label, &outcome),
                    Err(err) => {
                        println!("\n❌ {}: {:#}", label, err);
                        errors += 1;
                    }
                }
            }

            if errors > 0 || failed_matches > 0 {
                anyhow::bail!(
                    "❌ {} datasets failed, {} matches failed",
                    errors,
                    failed_matches
                );
            }
        }

        Commands::Verify { tables } => {
            println!("🔍 Verifying table integrity...");
            let mut mismatches = 0;
            for table in &tables {
                if dataset_builder::verify_table(table)? {
                    println!("✅ {}", table.display());
                } else {
                    println!("❌ {} - checksum mismatch", table.display());
                    mismatches += 1;
                }
            }
            if mismatches > 0 {
                anyhow::bail!("{} of {} tables failed verification", mismatches, tables.len());
            }
        }
    }

    Ok(())
}

/// Print a build outcome; returns the number of failed matches.
#[cfg(feature = "cli")]
fn print_outcome(label: &str, outcome: &BuildOutcome) -> usize {
    match outcome {
        BuildOutcome::Skipped { table_path } => {
            println!("\n⏭️  {}: {} exists, skipped", label, table_path.display());
            0
        }
        BuildOutcome::Built(report) => {
            let meta = &report.metadata;
            println!("\n✅ {}: table built", label);
            println!("   Matches:        {}", meta.counts.total);
            if meta.kind == goal_core::DatasetKind::Tournament {
                println!(
                    "   Group / KO / ET: {} / {} / {}",
                    meta.counts.group, meta.counts.knockout, meta.counts.extra_time
                );
            }
            println!("   Goals:          {}", meta.goal_count);
            if report.shootout_goals > 0 {
                println!("   Shoot-out goals dropped: {}", report.shootout_goals);
            }
            println!("   Checksum:       {}", meta.checksum);
            println!("   Created:        {}", meta.created_at);
            for failure in &report.failures {
                println!("   ⚠️  match {}: {}", failure.match_id, failure.message);
            }
            report.failures.len()
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("dataset_builder CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
