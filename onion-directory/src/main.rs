// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Onion Directory Service
//!
//! Serves the node directory over HTTP and offers key tooling for operators.
//!
//! ## Configuration
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `MAX_PUBLIC_KEY_LEN`: Longest accepted base64 public key (default: 4096)
//! - `EXPOSE_DEBUG_KEYS`: Mount the private-key debug routes (default: false)

use clap::{Parser, Subcommand};
use onion_crypto::{
    export_private_key, export_public_key, export_symmetric_key, generate_key_pair,
    generate_symmetric_key,
};
use onion_directory::{router, AppState, Config};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "onion-directory", about = "Node directory for the onion routing simulator")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the directory HTTP service (default)
    Serve,
    /// Generate an RSA-2048 key pair and print base64 SPKI / PKCS#8
    Keygen,
    /// Generate an AES-256 key and print it as base64
    Symkey,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::Keygen => keygen(),
        Command::Symkey => {
            println!("{}", export_symmetric_key(&generate_symmetric_key()));
            Ok(())
        }
    }
}

async fn serve() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::from_env();
    info!(
        bind_addr = %config.bind_addr,
        max_public_key_len = config.validation.max_public_key_len,
        expose_debug_keys = config.expose_debug_keys,
        debug_keys_compiled = cfg!(feature = "debug-keys"),
        "Starting onion directory"
    );

    let addr: SocketAddr = config.bind_addr.parse()?;
    let app = router(Arc::new(AppState::new(config)));

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Generate and print a new RSA key pair.
fn keygen() -> anyhow::Result<()> {
    let pair = generate_key_pair()?;
    let public = export_public_key(&pair.public)?;
    let private = export_private_key(Some(&pair.private))?
        .ok_or_else(|| anyhow::anyhow!("private key export returned nothing"))?;

    println!("RSA-2048 Key Pair (OAEP / SHA-256)");
    println!("==================================");
    println!();
    println!("Public Key  (SPKI, base64):");
    println!("{public}");
    println!();
    println!("Private Key (PKCS#8, base64):");
    println!("{private}");
    println!();
    println!("Register the public key with POST /register {{\"nodeId\": <id>, \"pubKey\": <key>}}.");
    println!("Keep the private key on the node; it decrypts every layer addressed to it.");

    Ok(())
}
