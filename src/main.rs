mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::{Config, Overrides};
use dbplatform::model::{
    DatabasePrimaryKeyProperties, DatabaseProperties, IntegratorIdentity,
};
use dbplatform::{format_catalog_error, CatalogClient, CatalogError, ClientConfig, PlatformCredentials, ResourceKind};
use serde::Serialize;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Catalogue relational database assets in an open metadata server
#[derive(Parser, Debug)]
#[command(name = "dbplatform", version, about, long_about = None)]
struct Args {
    /// Platform root URL
    #[arg(long, global = true, env = "DBPLATFORM_URL")]
    url: Option<String>,

    /// Metadata server name
    #[arg(long, global = true, env = "DBPLATFORM_SERVER")]
    server: Option<String>,

    /// End user the calls are made for
    #[arg(short, long, global = true, env = "DBPLATFORM_USER")]
    user: Option<String>,

    /// GUID of the integrator recorded as author of changes
    #[arg(long, global = true)]
    integrator_guid: Option<String>,

    /// Name of the integrator recorded as author of changes
    #[arg(long, global = true)]
    integrator_name: Option<String>,

    /// Platform user for HTTP basic authentication
    #[arg(long, global = true, env = "DBPLATFORM_PLATFORM_USER")]
    platform_user: Option<String>,

    #[arg(long, global = true, env = "DBPLATFORM_PLATFORM_PASSWORD", hide_env_values = true)]
    platform_password: Option<String>,

    /// Largest page size the server accepts (0 = unbounded)
    #[arg(long, global = true)]
    max_page_size: Option<u32>,

    /// Log level for debugging
    #[arg(long, global = true, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Database,
    Schema,
    Table,
    View,
    Column,
    DerivedColumn,
}

impl From<Kind> for ResourceKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Database => ResourceKind::Database,
            Kind::Schema => ResourceKind::Schema,
            Kind::Table => ResourceKind::Table,
            Kind::View => ResourceKind::View,
            Kind::Column => ResourceKind::Column,
            Kind::DerivedColumn => ResourceKind::DerivedColumn,
        }
    }
}

#[derive(clap::Args, Debug, Clone, Copy)]
struct Paging {
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    start_from: i32,

    /// 0 asks for as many as the server allows
    #[arg(long, default_value_t = 25, allow_hyphen_values = true)]
    page_size: i32,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Regular-expression search over element properties
    Find {
        #[arg(value_enum)]
        kind: Kind,
        search: String,
        #[command(flatten)]
        paging: Paging,
    },
    /// Exact match on qualified name or display name
    ByName {
        #[arg(value_enum)]
        kind: Kind,
        name: String,
        #[command(flatten)]
        paging: Paging,
    },
    /// Read one element by GUID
    Get {
        #[arg(value_enum)]
        kind: Kind,
        guid: String,
    },
    /// List the elements of a kind under a parent element
    Children {
        #[arg(value_enum)]
        kind: Kind,
        parent_guid: String,
        #[command(flatten)]
        paging: Paging,
    },
    /// Databases attributed to the configured integrator
    Integrator {
        #[command(flatten)]
        paging: Paging,
    },
    CreateDatabase {
        qualified_name: String,
        #[arg(long)]
        display_name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        database_type: Option<String>,
    },
    Publish {
        #[arg(value_enum)]
        kind: Kind,
        guid: String,
    },
    Withdraw {
        #[arg(value_enum)]
        kind: Kind,
        guid: String,
    },
    /// Remove an element; the qualified name must match the element's
    Remove {
        #[arg(value_enum)]
        kind: Kind,
        guid: String,
        qualified_name: String,
    },
    SetPrimaryKey {
        column_guid: String,
        name: String,
    },
    /// Show or persist the effective configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum ConfigAction {
    Show,
    Save,
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        EnvFilter::from_default_env()
    } else {
        let tracing_level = level.to_tracing_level()?;
        EnvFilter::default().add_directive(LevelFilter::from_level(tracing_level).into())
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Cannot open log file {}: {}", log_path.display(), e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("dbplatform started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("dbplatform").join("dbplatform.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".dbplatform").join("dbplatform.log");
    }
    PathBuf::from("dbplatform.log")
}

/// Run `$body` with `$res` bound to the typed handle for `$kind`
macro_rules! with_resources {
    ($client:expr, $kind:expr, |$res:ident| $body:expr) => {
        match ResourceKind::from($kind) {
            ResourceKind::Database => {
                let $res = $client.databases();
                $body
            }
            ResourceKind::Schema => {
                let $res = $client.schemas();
                $body
            }
            ResourceKind::Table => {
                let $res = $client.tables();
                $body
            }
            ResourceKind::View => {
                let $res = $client.views();
                $body
            }
            ResourceKind::Column => {
                let $res = $client.columns();
                $body
            }
            ResourceKind::DerivedColumn => {
                let $res = $client.derived_columns();
                $body
            }
        }
    };
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn user_id(config: &Config) -> Result<String> {
    config
        .user_id
        .clone()
        .context("no user id configured; pass --user or set DBPLATFORM_USER")
}

fn integrator(config: &Config) -> Result<IntegratorIdentity> {
    match (&config.integrator_guid, &config.integrator_name) {
        (Some(guid), Some(name)) => Ok(IntegratorIdentity::new(guid.clone(), name.clone())),
        _ => bail!("changes need an integrator; pass --integrator-guid and --integrator-name"),
    }
}

fn platform_credentials(user: Option<&str>, password: Option<&str>) -> Result<Option<PlatformCredentials>> {
    match (user, password) {
        (Some(user), Some(password)) => Ok(Some(PlatformCredentials::basic(user, password))),
        (Some(_), None) => bail!("--platform-user needs --platform-password"),
        (None, Some(_)) => bail!("--platform-password needs --platform-user"),
        (None, None) => Ok(None),
    }
}

fn build_client(config: &Config, args: &Args) -> Result<CatalogClient> {
    let mut builder = ClientConfig::builder(config.effective_platform_url(), config.effective_server_name())
        .max_page_size(config.effective_max_page_size());

    if let Some(credentials) =
        platform_credentials(args.platform_user.as_deref(), args.platform_password.as_deref())?
    {
        builder = builder.credentials(credentials);
    }

    Ok(CatalogClient::new(builder.build()?)?)
}

async fn run(args: Args) -> Result<()> {
    let config = Config::load().with_overrides(Overrides {
        platform_url: args.url.clone(),
        server_name: args.server.clone(),
        user_id: args.user.clone(),
        integrator_guid: args.integrator_guid.clone(),
        integrator_name: args.integrator_name.clone(),
        max_page_size: args.max_page_size,
    });

    if let Command::Config { action } = &args.command {
        let resolved = config.resolved();
        match action {
            ConfigAction::Show => print_json(&resolved)?,
            ConfigAction::Save => {
                let path = resolved.save()?;
                eprintln!("Saved configuration to {}", path.display());
            }
        }
        return Ok(());
    }

    let client = build_client(&config, &args)?;
    let user = user_id(&config)?;
    tracing::info!(
        "Using server {} at {} as {}",
        client.server_name(),
        client.platform_url(),
        user
    );

    match args.command {
        Command::Find { kind, search, paging } => with_resources!(client, kind, |res| {
            print_json(&res.find(&user, &search, paging.start_from, paging.page_size).await?)
        }),
        Command::ByName { kind, name, paging } => with_resources!(client, kind, |res| {
            print_json(&res.get_by_name(&user, &name, paging.start_from, paging.page_size).await?)
        }),
        Command::Get { kind, guid } => with_resources!(client, kind, |res| {
            print_json(&res.get_by_guid(&user, &guid).await?)
        }),
        Command::Children {
            kind,
            parent_guid,
            paging,
        } => with_resources!(client, kind, |res| {
            print_json(
                &res.list_for_parent(&user, &parent_guid, paging.start_from, paging.page_size)
                    .await?,
            )
        }),
        Command::Integrator { paging } => {
            let integrator = integrator(&config)?;
            print_json(
                &client
                    .databases_for_integrator(&user, &integrator, paging.start_from, paging.page_size)
                    .await?,
            )
        }
        Command::CreateDatabase {
            qualified_name,
            display_name,
            description,
            database_type,
        } => {
            let integrator = integrator(&config)?;
            let properties = DatabaseProperties {
                qualified_name,
                display_name,
                description,
                database_type,
                ..Default::default()
            };
            let guid = client
                .databases()
                .create(&user, &integrator, None, &properties)
                .await?;
            println!("{}", guid);
            Ok(())
        }
        Command::Publish { kind, guid } => {
            let integrator = integrator(&config)?;
            with_resources!(client, kind, |res| Ok(res.publish(&user, &integrator, &guid).await?))
        }
        Command::Withdraw { kind, guid } => {
            let integrator = integrator(&config)?;
            with_resources!(client, kind, |res| Ok(res.withdraw(&user, &integrator, &guid).await?))
        }
        Command::Remove {
            kind,
            guid,
            qualified_name,
        } => {
            let integrator = integrator(&config)?;
            with_resources!(client, kind, |res| {
                Ok(res.remove(&user, &integrator, &guid, &qualified_name).await?)
            })
        }
        Command::SetPrimaryKey { column_guid, name } => {
            let integrator = integrator(&config)?;
            let properties = DatabasePrimaryKeyProperties {
                name: Some(name),
                ..Default::default()
            };
            Ok(client
                .set_primary_key_on_column(&user, &integrator, &column_guid, &properties)
                .await?)
        }
        Command::Config { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    if let Err(err) = run(args).await {
        match err.downcast_ref::<CatalogError>() {
            Some(catalog_error) => {
                tracing::error!("{}", catalog_error);
                eprintln!("Error: {}", format_catalog_error(catalog_error));
            }
            None => eprintln!("Error: {err:#}"),
        }
        std::process::exit(1);
    }
}
