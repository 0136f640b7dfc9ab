// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod backends;
mod routes;

#[cfg(test)]
mod tests;

use axum::Router;
use clap::{Parser, Subcommand};
use rti_tracker::{ComplaintStore, Moment};
use rti_tracker_api::{ImportDocument, ImportResponse, import_complaints, parse_import_document};
use rti_tracker_persistence::Persistence;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::backends::{AttachmentBackend, CacheBackend, ServerStore};
use crate::routes::{AppState, build_router};

/// RTI Tracker Server - HTTP server for the RTI and complaint tracker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "RTI_TRACKER_DATABASE", global = true)]
    database: Option<PathBuf>,

    /// Path to the JSON snapshot cache. If not provided, the cache lives in memory.
    #[arg(long, env = "RTI_TRACKER_CACHE", global = true)]
    cache: Option<PathBuf>,

    /// Directory for document blobs. If not provided, documents live in memory.
    #[arg(long, env = "RTI_TRACKER_ATTACHMENTS", global = true)]
    attachments: Option<PathBuf>,

    /// Address to bind the server to
    #[arg(long, env = "RTI_TRACKER_HOST", default_value = "127.0.0.1", global = true)]
    host: String,

    /// Port to bind the server to
    #[arg(short, long, env = "RTI_TRACKER_PORT", default_value_t = 4000, global = true)]
    port: u16,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Debug, Clone)]
enum Mode {
    /// Serve the HTTP API (the default)
    Serve,
    /// Import complaints from a JSON file, then exit
    Import {
        /// A JSON array of complaints, or an object with a `complaints` array
        file: PathBuf,
    },
}

/// Opens the database and local collaborators named on the command line.
fn open_store(args: &Args) -> Result<ServerStore, Box<dyn std::error::Error>> {
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path.display());
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let cache: CacheBackend = CacheBackend::from_path(args.cache.as_deref());
    let attachments: AttachmentBackend = AttachmentBackend::from_path(args.attachments.as_deref())?;

    let mut store: ServerStore = ComplaintStore::new(persistence, cache, attachments);
    let loaded: usize = store.load();
    info!(loaded, "Complaint store ready");
    Ok(store)
}

fn run_import(args: &Args, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let text: String = std::fs::read_to_string(file)?;
    let document: ImportDocument = parse_import_document(&text)?;

    let mut store: ServerStore = open_store(args)?;
    let now: Moment = Moment::now()?;
    let source: String = file.display().to_string();
    let response: ImportResponse = import_complaints(&mut store, document, &source, &now)?;

    info!(
        source = %response.source,
        upserted = response.summary.upserted,
        inserted = response.summary.inserted,
        updated = response.summary.updated,
        "Import complete"
    );
    Ok(())
}

async fn run_server(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let store: ServerStore = open_store(args)?;
    let app: Router = build_router(AppState::new(store));

    let addr: std::net::SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing RTI Tracker Server");

    match args.mode.clone() {
        Some(Mode::Import { file }) => run_import(&args, &file),
        Some(Mode::Serve) | None => run_server(&args).await,
    }
}
