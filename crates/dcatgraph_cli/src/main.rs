//! `dcatgraph` command-line entry point.
//!
//! # Responsibility
//! - Map `post <kind>` / `get <kind>` invocations onto the core handlers.
//! - Build store and logging settings from flags and `DCAT_*` variables.
//!
//! Output is pretty-printed JSON on stdout; diagnostics go to the log.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use dcatgraph_core::{
    connect, default_log_level, get_documents, init_logging, post_document, EntityService,
    ListMode, SqliteVertexRepository, StoreConfig, VertexKind, DEFAULT_GRAPH,
};
use log::info;
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "dcatgraph", version, about = "Publish DCAT metadata into a vertex store")]
struct Cli {
    /// SQLite file holding the vertex store. Without it, a private in-memory
    /// store is used and discarded on exit.
    #[arg(long, env = "DCAT_DB_PATH", global = true)]
    db: Option<PathBuf>,

    /// Graph name that scopes every vertex.
    #[arg(long, env = "DCAT_GRAPH", default_value = DEFAULT_GRAPH, global = true)]
    graph: String,

    /// trace|debug|info|warn|error
    #[arg(long, env = "DCAT_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Absolute directory for rotating log files; stderr when unset.
    #[arg(long, env = "DCAT_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create or update one record from a JSON document.
    Post {
        /// catalog|dataset|distribution|service
        #[arg(value_parser = parse_kind)]
        kind: VertexKind,
        /// Document file; `-` or absent reads stdin.
        input: Option<PathBuf>,
    },
    /// List every record of a kind.
    Get {
        #[arg(value_parser = parse_kind)]
        kind: VertexKind,
        /// Fail when any stored row does not decode.
        #[arg(long)]
        strict: bool,
    },
    /// Print the known entity kinds and their vertex types.
    Kinds,
}

fn parse_kind(value: &str) -> Result<VertexKind, String> {
    VertexKind::parse(value).ok_or_else(|| {
        format!("unknown kind `{value}`; expected catalog|dataset|distribution|service")
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, cli.log_dir.as_deref()).map_err(|err| anyhow!(err))?;

    let config = match cli.db {
        Some(path) => StoreConfig::file(path, cli.graph),
        None => StoreConfig::in_memory(cli.graph),
    };

    match cli.command {
        Command::Kinds => {
            for kind in VertexKind::ALL {
                println!("{}\t{}", kind.route(), kind.vertex_type());
            }
            Ok(())
        }
        Command::Post { kind, input } => {
            let document = read_document(input.as_ref())?;
            with_service(&config, |service| {
                let ack = post_document(service, kind, &document)
                    .with_context(|| format!("POST {} failed", kind.route()))?;
                info!(
                    "event=cli_post module=cli status=ok kind={} id={}",
                    ack.kind, ack.id
                );
                println!("{}", serde_json::to_string_pretty(&ack)?);
                Ok(())
            })
        }
        Command::Get { kind, strict } => {
            let mode = if strict {
                ListMode::Strict
            } else {
                ListMode::Lenient
            };
            with_service(&config, |service| {
                let response = get_documents(service, kind, mode)
                    .with_context(|| format!("GET {} failed", kind.route()))?;
                println!("{}", serde_json::to_string_pretty(&response)?);
                Ok(())
            })
        }
    }
}

fn with_service<T>(
    config: &StoreConfig,
    run: impl FnOnce(&EntityService<SqliteVertexRepository<'_>>) -> Result<T>,
) -> Result<T> {
    let conn = connect(config).context("failed to open vertex store")?;
    let repo = SqliteVertexRepository::try_new(&conn, config.graph.as_str())
        .context("vertex store is not ready")?;
    run(&EntityService::new(repo))
}

fn read_document(input: Option<&PathBuf>) -> Result<serde_json::Value> {
    let raw = match input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?,
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read document from stdin")?;
            buffer
        }
    };

    if raw.trim().is_empty() {
        bail!("document is empty");
    }
    serde_json::from_str(&raw).context("document is not valid JSON")
}
