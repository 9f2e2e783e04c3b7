use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use relief_priority::allocation::plan::{plan_allocation, rank_barangays, rank_residents};
use relief_priority::allocation::{parse_resources, AllocationPlan, RankLevel};
use relief_priority::config::{Config, ConfigOverrides};
use relief_priority::output::csv::{
    allocation_to_csv, barangays_to_csv, ranked_barangays_to_csv, ranked_residents_to_csv,
    residents_to_csv,
};
use relief_priority::output::json::render_json;
use relief_priority::output::table::{
    render_allocation_table, render_barangays_table, render_ranked_barangays_table,
    render_ranked_residents_table, render_residents_table, render_weights_table,
};
use relief_priority::population::aggregator::PopulationAggregator;
use relief_priority::population::grouping::aggregate_by_barangay;
use relief_priority::residents::loader::{filter_by_barangay, load_residents};
use relief_priority::residents::ResidentRecord;
use relief_priority::scoring::model::{ScoreModel, WeightsUpdate};
use relief_priority::scoring::scorer::ResidentScorer;
use relief_priority::server::run_server;
use relief_priority::telemetry;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "relief-priority",
    about = "Need-based priority scoring and relief allocation for barangays"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[arg(long = "log-level")]
    log_level: Option<String>,
    #[command(flatten)]
    weights: WeightArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args, Clone, Default)]
struct WeightArgs {
    #[arg(long = "weight-evacuation")]
    evacuation_history: Option<f64>,
    #[arg(long = "weight-income")]
    income_level: Option<f64>,
    #[arg(long = "weight-family")]
    family_size: Option<f64>,
    #[arg(long = "weight-housing")]
    housing_condition: Option<f64>,
    #[arg(long = "weight-terrain")]
    terrain: Option<f64>,
}

impl From<WeightArgs> for WeightsUpdate {
    fn from(value: WeightArgs) -> Self {
        Self {
            evacuation_history: value.evacuation_history,
            income_level: value.income_level,
            family_size: value.family_size,
            housing_condition: value.housing_condition,
            terrain: value.terrain,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score every resident in a CSV or JSON file.
    Score {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        barangay: Option<String>,
    },
    /// Aggregate residents per barangay.
    Barangays {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Rank residents or barangays by priority score.
    Rank {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = RankLevel::Barangay)]
        level: RankLevel,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Split a resource pool in proportion to priority score.
    Allocate {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = RankLevel::Barangay)]
        level: RankLevel,
        #[arg(long)]
        top: Option<usize>,
        /// NAME=QUANTITY, repeatable. Replaces the configured pool.
        #[arg(long = "resource")]
        resources: Vec<String>,
    },
    /// Show the active factor weights.
    Weights,
    /// Run the REST API.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Write a config template or print the active config.
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        weights: cli.weights.clone().into(),
        default_limit: None,
        resources: resource_overrides(&cli.command)?,
        log_level: cli.log_level.clone(),
    });
    telemetry::init(&config.logging)?;

    if matches!(cli.command, Commands::Config { .. }) {
        return handle_config_command(&cli.command, &config, &config_path);
    }

    let model = config.build_model()?;

    match &cli.command {
        Commands::Score { input, barangay } => {
            let mut residents = load_residents(input)?;
            if let Some(barangay) = barangay {
                residents = filter_by_barangay(residents, barangay);
                if residents.is_empty() {
                    warn!("no residents matched barangay {barangay}");
                }
            }
            let scored = ResidentScorer::new(&model).score_all(&residents);
            match cli.output {
                OutputFormat::Table => println!("{}", render_residents_table(&scored)),
                OutputFormat::Json => println!("{}", render_json(&scored)?),
                OutputFormat::Csv => println!("{}", residents_to_csv(&scored)?),
            }
        }
        Commands::Barangays { input } => {
            let residents = load_residents(input)?;
            let aggregator = PopulationAggregator::new(ResidentScorer::new(&model));
            let aggregates = aggregate_by_barangay(&aggregator, &residents);
            match cli.output {
                OutputFormat::Table => println!("{}", render_barangays_table(&aggregates)),
                OutputFormat::Json => println!("{}", render_json(&aggregates)?),
                OutputFormat::Csv => println!("{}", barangays_to_csv(&aggregates)?),
            }
        }
        Commands::Rank {
            input,
            level,
            limit,
        } => {
            let residents = load_residents(input)?;
            let limit = limit.unwrap_or(config.ranking.default_limit);
            if residents.is_empty() {
                warn!("input contained no residents");
            }
            print_ranking(&model, &residents, *level, limit, cli.output)?;
        }
        Commands::Allocate {
            input, level, top, ..
        } => {
            let resources = &config.allocation.resources;
            if resources.is_empty() {
                return Err(anyhow!(
                    "no resources to allocate; pass --resource NAME=QTY or configure [allocation.resources]"
                ));
            }
            let residents = load_residents(input)?;
            let plan = plan_allocation(&model, &residents, *level, *top, resources)?;
            print_allocation(&plan, cli.output)?;
        }
        Commands::Weights => {
            let weights = model.get_weights();
            if let Err(err) = weights.validate() {
                warn!("{err}");
            }
            match cli.output {
                OutputFormat::Table => println!("{}", render_weights_table(&weights)),
                OutputFormat::Json | OutputFormat::Csv => println!("{}", render_json(&weights)?),
            }
        }
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            let addr: SocketAddr = config.bind_addr()?;
            info!(weights = ?model.get_weights(), "starting relief priority API");
            run_server(config, model, addr).await?;
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn handle_config_command(command: &Commands, config: &Config, config_path: &Path) -> Result<()> {
    let Commands::Config { init, show } = command else {
        return Ok(());
    };
    if *init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if *show || !*init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn resource_overrides(command: &Commands) -> Result<Option<BTreeMap<String, u64>>> {
    let Commands::Allocate { resources, .. } = command else {
        return Ok(None);
    };
    if resources.is_empty() {
        return Ok(None);
    }
    Ok(Some(parse_resources(resources)?))
}

fn print_ranking(
    model: &ScoreModel,
    residents: &[ResidentRecord],
    level: RankLevel,
    limit: usize,
    format: OutputFormat,
) -> Result<()> {
    match level {
        RankLevel::Resident => {
            let ranked = rank_residents(model, residents, limit);
            match format {
                OutputFormat::Table => println!("{}", render_ranked_residents_table(&ranked)),
                OutputFormat::Json => println!("{}", render_json(&ranked)?),
                OutputFormat::Csv => println!("{}", ranked_residents_to_csv(&ranked)?),
            }
        }
        RankLevel::Barangay => {
            let ranked = rank_barangays(model, residents, limit);
            match format {
                OutputFormat::Table => println!("{}", render_ranked_barangays_table(&ranked)),
                OutputFormat::Json => println!("{}", render_json(&ranked)?),
                OutputFormat::Csv => println!("{}", ranked_barangays_to_csv(&ranked)?),
            }
        }
    }
    Ok(())
}

fn print_allocation(plan: &AllocationPlan, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_allocation_table(plan)),
        OutputFormat::Json => println!("{}", render_json(plan)?),
        OutputFormat::Csv => println!("{}", allocation_to_csv(plan)?),
    }
    Ok(())
}
