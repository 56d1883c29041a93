mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use atlas_authz::auth::{
    AuthorizationFacade, AuthorizationSettings, CachedPermissionStore, PermissionStore,
    ScopePolicy,
};
use atlas_authz::domain::{DomainError, Located, ResourceLocation};
use atlas_authz::http::AccessDeniedBody;
use atlas_authz::postgres::{PostgresClient, PostgresConfig, PostgresPermissionStore};
use atlas_authz::telemetry::{init_telemetry, TelemetryConfig};
use clap::{Parser, Subcommand};
use config::ServiceConfig;
use serde_json::{json, Value};
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(name = "atlas-authz", about = "Inspect authorization decisions against the permission store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decide whether a subject may perform an action on a resource type
    Check {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        resource: String,
        #[arg(long)]
        action: String,
    },
    /// Show the rules and region a subject holds for a resource type
    Summary {
        #[arg(long)]
        subject: String,
        #[arg(long, default_value = "all")]
        resource: String,
    },
    /// Print the records from a JSON array file the subject may see
    Filter {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        records: PathBuf,
    },
}

/// A record read from disk; location fields are taken from the object.
struct JsonRecord {
    value: Value,
    location: ResourceLocation,
}

impl JsonRecord {
    fn new(value: Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let location = ResourceLocation::new(field("state"), field("district"), field("block"));
        Self { value, location }
    }
}

impl Located for JsonRecord {
    fn location(&self) -> &ResourceLocation {
        &self.location
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ServiceConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_telemetry(&TelemetryConfig {
        service_name: "atlas-authz".to_string(),
        log_level: config.log_level.clone(),
    }) {
        eprintln!("Failed to initialize telemetry: {}", e);
        std::process::exit(1);
    }

    debug!("Configuration: {:?}", config);

    let facade = match build_facade(&config).await {
        Ok(facade) => facade,
        Err(e) => {
            error!(error = %e, "failed to build authorization facade");
            std::process::exit(1);
        }
    };

    match run(cli.command, &facade).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!(error = %e, "command failed");
            let status = e
                .downcast_ref::<DomainError>()
                .map(DomainError::http_status)
                .unwrap_or(500);
            println!("{}", json!({"error": e.to_string(), "status": status}));
            std::process::exit(1);
        }
    }
}

async fn build_facade(config: &ServiceConfig) -> Result<AuthorizationFacade> {
    let client = PostgresClient::new(&PostgresConfig {
        host: config.postgres_host.clone(),
        port: config.postgres_port,
        database: config.postgres_database.clone(),
        username: config.postgres_username.clone(),
        password: config.postgres_password.clone(),
        max_pool_size: config.postgres_max_pool_size,
    })
    .context("creating postgres pool")?;
    client.ping().await?;

    let postgres_store = PostgresPermissionStore::new(client);
    let store: Arc<dyn PermissionStore> = if config.permission_cache_ttl_secs > 0 {
        info!(
            ttl_secs = config.permission_cache_ttl_secs,
            "permission rule cache enabled"
        );
        Arc::new(CachedPermissionStore::new(
            postgres_store,
            Duration::from_secs(config.permission_cache_ttl_secs),
        ))
    } else {
        Arc::new(postgres_store)
    };

    Ok(AuthorizationFacade::new(
        store,
        AuthorizationSettings {
            store_timeout: Duration::from_millis(config.store_timeout_ms),
            scope_policy: ScopePolicy {
                open_unset_levels: config.open_unset_location_levels,
            },
            filter_batch_limit: config.filter_batch_limit,
        },
    ))
}

/// Reads a JSON array of records from `path`.
async fn load_records(path: &Path) -> Result<Vec<JsonRecord>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let values: Vec<Value> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {} as a JSON array", path.display()))?;

    Ok(values.into_iter().map(JsonRecord::new).collect())
}

/// Runs one command and returns the process exit code.
async fn run(command: Command, facade: &AuthorizationFacade) -> Result<i32> {
    match command {
        Command::Check {
            subject,
            resource,
            action,
        } => {
            let subject = facade.resolve_subject(&subject).await?;
            match facade.require_access(&subject, &resource, &action).await {
                Ok(()) => {
                    println!(
                        "{}",
                        json!({"allowed": true, "resource": resource, "action": action})
                    );
                    Ok(0)
                }
                Err(denied @ DomainError::AccessDenied { .. }) => {
                    if let Some(body) = AccessDeniedBody::from_error(&denied) {
                        println!("{}", serde_json::to_string(&body)?);
                    }
                    Ok(2)
                }
                Err(e) => Err(e.into()),
            }
        }
        Command::Summary { subject, resource } => {
            let subject = facade.resolve_subject(&subject).await?;
            let summary = facade.access_summary(&subject, &resource).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(0)
        }
        Command::Filter { subject, records } => {
            let subject = facade.resolve_subject(&subject).await?;
            let records = load_records(&records).await?;
            let visible: Vec<&Value> = facade
                .visible_subset(&subject, &records)
                .into_iter()
                .map(|record| &record.value)
                .collect();

            info!(
                candidates = records.len(),
                visible = visible.len(),
                "filtered records"
            );
            println!("{}", serde_json::to_string_pretty(&visible)?);
            Ok(0)
        }
    }
}
