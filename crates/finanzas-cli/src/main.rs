//! finanzas - command-line client for the personal-finance backend

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use finanzas_core::{ClientConfig, SortOrder};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod terminal;

/// Session file used when the configuration names none
const DEFAULT_SESSION_FILE: &str = ".finanzas/session.json";

/// finanzas - personal-finance client
#[derive(Parser, Debug)]
#[command(name = "finanzas")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "FINANZAS_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and persist the session cookie
    Login {
        /// Account e-mail
        #[arg(long)]
        correo: String,

        /// Password
        #[arg(long, env = "FINANZAS_CONTRASENA", hide_env_values = true)]
        contrasena: String,
    },

    /// Forget the stored session
    Logout,

    /// Show who is logged in
    Status,

    /// List one page of an entity
    #[command(alias = "ls")]
    List {
        /// Entity collection
        entity: Entity,

        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,

        /// Page size
        #[arg(long)]
        size: Option<u32>,

        /// Free-text filter
        #[arg(long)]
        search: Option<String>,

        /// Column to sort by
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Search an entity by text
    Search {
        /// Entity collection
        entity: Entity,

        /// Text to look for
        term: String,

        /// Maximum results
        #[arg(short = 'n', long, default_value = "10")]
        limit: u32,
    },

    /// Most recently used items of an entity
    Recent {
        /// Entity collection
        entity: Entity,

        /// Maximum results
        #[arg(short = 'n', long, default_value = "5")]
        limit: u32,
    },

    /// Delete one item
    Delete {
        /// Entity collection
        entity: Entity,

        /// Item id
        id: String,
    },

    /// Pause or resume a scheduled transaction
    Toggle {
        /// Scheduled collection
        entity: ScheduledEntity,

        /// Item id
        id: String,
    },

    /// Category management
    #[command(subcommand)]
    Categoria(CategoriaCommands),

    /// Ask the backend for a newer client version
    CheckUpdate,
}

#[derive(Subcommand, Debug)]
enum CategoriaCommands {
    /// Create a category
    Add {
        /// Category name
        nombre: String,
    },
}

/// REST collections reachable from the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Entity {
    Categorias,
    Conceptos,
    Proveedores,
    Clientes,
    Personas,
    Cuentas,
    FormasPago,
    Gastos,
    Ingresos,
    Traspasos,
    GastosProgramados,
    IngresosProgramados,
    TraspasosProgramados,
}

/// Collections supporting pause/resume
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ScheduledEntity {
    GastosProgramados,
    IngresosProgramados,
    TraspasosProgramados,
}

fn load_config(path: Option<&PathBuf>) -> Result<ClientConfig> {
    let mut config = match path {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => {
            let mut config = ClientConfig::default();
            config.apply_env();
            config
        }
    };
    if config.session.storage_path.is_none() {
        config.session.storage_path = Some(PathBuf::from(DEFAULT_SESSION_FILE));
    }
    Ok(config)
}

fn sort_order(desc: bool) -> SortOrder {
    if desc {
        SortOrder::Desc
    } else {
        SortOrder::Asc
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = load_config(cli.config.as_ref())?;
    let app = commands::build_app(config)?;

    match cli.command {
        Commands::Login { correo, contrasena } => commands::login(&app, correo, contrasena).await,
        Commands::Logout => commands::logout(&app).await,
        Commands::Status => commands::status(&app),
        Commands::List {
            entity,
            page,
            size,
            search,
            sort,
            desc,
        } => {
            let page_size = size.unwrap_or(app.config().stores.page_size);
            let mut query = finanzas_core::PageQuery::new(page, page_size);
            if let Some(term) = search {
                query = query.with_search(term);
            }
            if let Some(column) = sort {
                query = query.with_sort(column, sort_order(desc));
            }
            commands::list(&app, entity, query).await
        }
        Commands::Search {
            entity,
            term,
            limit,
        } => commands::search(&app, entity, &term, limit).await,
        Commands::Recent { entity, limit } => commands::recent(&app, entity, limit).await,
        Commands::Delete { entity, id } => commands::delete(&app, entity, id).await,
        Commands::Toggle { entity, id } => commands::toggle(&app, entity, id).await,
        Commands::Categoria(CategoriaCommands::Add { nombre }) => {
            commands::add_categoria(&app, nombre).await
        }
        Commands::CheckUpdate => commands::check_update(&app).await,
    }
}
