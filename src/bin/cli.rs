//! University Dashboard CLI
//!
//! Drives the dashboard pipeline against a JSON fixture or the REST API.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dashboard::{
    config::{load_config, open_source},
    error::{AppError, Result},
    models::{CardStyles, Config, DashboardState, EntityType},
    pipeline::{DashboardController, FormPopupController},
    services::{ConfigRegistry, forms::FormData},
    storage::{EntityDataSource, MemoryDataSource},
};

/// Entity dashboard for the university management portal
#[derive(Parser, Debug)]
#[command(name = "dashboard", version, about = "University entity dashboard")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Read and write records from a JSON fixture instead of the REST API
    #[arg(short, long, global = true)]
    fixture: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show stats, cards and filtered records
    Show {
        /// Entity type (students, lecturers)
        #[arg(short, long)]
        entity: Option<String>,

        /// Primary filter value
        #[arg(short, long)]
        primary: Option<String>,

        /// Secondary filter as key=value (repeatable)
        #[arg(long = "filter", value_parser = parse_pair)]
        filters: Vec<(String, String)>,

        /// Apply a card's click action
        #[arg(long)]
        card: Option<String>,

        /// Print the full view as JSON
        #[arg(long)]
        json: bool,
    },

    /// List filter options
    Options {
        #[arg(short, long)]
        entity: Option<String>,
    },

    /// Create a record
    Add {
        #[arg(short, long)]
        entity: Option<String>,

        /// Field as key=value (repeatable)
        #[arg(long = "field", value_parser = parse_pair)]
        fields: Vec<(String, String)>,
    },

    /// Update a record
    Edit {
        #[arg(short, long)]
        entity: Option<String>,

        #[arg(long)]
        id: i64,

        /// Field as key=value (repeatable)
        #[arg(long = "field", value_parser = parse_pair)]
        fields: Vec<(String, String)>,
    },

    /// Validate configuration files
    Validate,
}

fn parse_pair(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{s}'"))
}

/// Initialize logging based on verbosity flag and configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config);
    init_logging(cli.verbose, &config.logging.level);

    let entity_or_default =
        |entity: Option<String>| entity.unwrap_or_else(|| config.dashboard.default_entity.clone());

    match cli.command {
        Command::Show {
            entity,
            primary,
            filters,
            card,
            json,
        } => {
            let source = open_source(&config, cli.fixture.as_deref()).await?;
            let mut dashboard = controller(&config, source);
            load_or_fail(&mut dashboard, &entity_or_default(entity)).await?;

            if let Some(card) = card {
                dashboard.card_click(&card);
            }
            if let Some(primary) = primary {
                if !dashboard.set_primary_filter(&primary) {
                    return Err(AppError::config(format!("Unknown primary value '{primary}'")));
                }
            }
            for (name, value) in filters {
                if !dashboard.set_secondary_filter(&name, &value) {
                    return Err(AppError::config(format!("Unknown filter '{name}'")));
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(dashboard.view())?);
            } else {
                print_summary(&dashboard);
            }
        }

        Command::Options { entity } => {
            let source = open_source(&config, cli.fixture.as_deref()).await?;
            let mut dashboard = controller(&config, source);
            load_or_fail(&mut dashboard, &entity_or_default(entity)).await?;

            let Some(entity_config) = dashboard.config() else {
                return Ok(());
            };
            println!(
                "{}: {}",
                entity_config.primary_filter_label,
                dashboard.primary_options().join(", ")
            );
            for filter in &entity_config.secondary_filters {
                println!(
                    "{}: {}",
                    filter.label,
                    dashboard.filter_options(filter.name).join(", ")
                );
            }
        }

        Command::Add { entity, fields } => {
            let entity = entity_or_default(entity);
            let outcome = with_form(&config, cli.fixture.as_deref(), &entity, None, fields).await?;
            log::info!("Created record {}", outcome);
        }

        Command::Edit { entity, id, fields } => {
            let entity = entity_or_default(entity);
            let outcome =
                with_form(&config, cli.fixture.as_deref(), &entity, Some(id), fields).await?;
            log::info!("Updated record {}", outcome);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({} card styles)", config.card_styles.len());

            if let Some(path) = &cli.fixture {
                let source = MemoryDataSource::load(path).await?;
                for ty in EntityType::ALL {
                    let count = source.fetch_records(ty).await?.len();
                    log::info!("✓ Fixture has {count} {ty}");
                }
            }

            log::info!("All validations passed!");
        }
    }

    Ok(())
}

fn controller(config: &Config, source: Arc<dyn EntityDataSource>) -> DashboardController {
    DashboardController::with_registry(
        source,
        Arc::new(ConfigRegistry::new()),
        CardStyles::new(&config.card_styles),
    )
}

async fn load_or_fail(dashboard: &mut DashboardController, entity: &str) -> Result<()> {
    dashboard.load(entity).await?;
    if let DashboardState::Error(message) = dashboard.state() {
        return Err(AppError::fetch(entity, message));
    }
    Ok(())
}

/// Run the add/edit form flow and return the saved record id.
async fn with_form(
    config: &Config,
    fixture: Option<&Path>,
    entity: &str,
    id: Option<i64>,
    fields: Vec<(String, String)>,
) -> Result<i64> {
    let memory = match fixture {
        Some(path) => Some(Arc::new(MemoryDataSource::load(path).await?)),
        None => None,
    };
    let source: Arc<dyn EntityDataSource> = match &memory {
        Some(memory) => Arc::clone(memory) as Arc<dyn EntityDataSource>,
        None => open_source(config, None).await?,
    };

    let mut dashboard = controller(config, Arc::clone(&source));
    load_or_fail(&mut dashboard, entity).await?;

    let Some(entity_config) = dashboard.config() else {
        return Err(AppError::UnknownEntityType(entity.to_string()));
    };
    let mut form = FormPopupController::new(Arc::clone(&source), entity_config);

    let mut data: FormData = FormData::new();
    match id {
        Some(id) => {
            let Some(record) = dashboard.view().records.iter().find(|r| r.id == id).cloned() else {
                return Err(AppError::NotFound {
                    entity: entity.to_string(),
                    id,
                });
            };
            form.open_for_edit(record).await;
            data.extend(form.data().clone());
        }
        None => form.open_for_add().await,
    }
    data.extend(fields);

    let saved = form.submit(data, &mut dashboard).await?;

    if let (Some(memory), Some(path)) = (&memory, fixture) {
        memory.save(path).await?;
        log::info!("Fixture saved to {}", path.display());
    }
    Ok(saved.id)
}

fn print_summary(dashboard: &DashboardController) {
    let view = dashboard.view();
    if let Some(config) = dashboard.config() {
        println!("{}", config.title);
        println!("{}", config.subtitle);
        println!("{}", "─".repeat(60));
    }

    for card in &view.cards {
        println!("  [{}] {:<20} {}", card.icon, card.title, card.value);
    }
    println!("{}", "─".repeat(60));
    println!(
        "Filter: {} = {}, {}",
        dashboard
            .config()
            .map_or("primary", |c| c.primary_filter_label),
        view.primary_filter,
        view.secondary_filters
            .iter()
            .map(|(k, v)| format!("{k} = {v}"))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("Showing {} of {} records", view.filtered.len(), view.records.len());
    for record in &view.filtered {
        let department = record.get("department").map(|v| v.to_string()).unwrap_or_default();
        println!("  #{:<5} {:<30} {}", record.id, record.display_name(), department);
    }
}
