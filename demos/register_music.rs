//! Register a music file end to end: pin, create, mint, register copyright.
//!
//! Usage:
//!   MUSIK_KEYPAIR=<base58 secret> PINATA_API_KEY=... PINATA_SECRET_KEY=... \
//!   cargo run --example register_music -- "<title>" "<artist>" song.mp3 certificate.pdf
//!
//! `MUSIK_RPC_URL`, `MUSIK_COMMITMENT` and the other `MUSIK_*` variables
//! override the client defaults. Set `RUST_LOG=musik_sdk=debug` for flow logs.

use std::env;
use std::fs;
use std::path::Path;

use musik_sdk::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn read_file(path: &str) -> Result<FileUpload, Box<dyn std::error::Error>> {
    let name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
        .to_string();
    Ok(FileUpload::new(name, fs::read(path)?))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "musik_sdk=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() != 4 {
        eprintln!("usage: register_music <title> <artist> <music file> <certificate file>");
        std::process::exit(2);
    }

    let wallet = match env::var("MUSIK_KEYPAIR") {
        Ok(secret) => KeypairWallet::from_base58(&secret)?,
        Err(_) => {
            let wallet = KeypairWallet::new(Keypair::new());
            println!(
                "MUSIK_KEYPAIR not set, using fresh wallet {} (fund it first)",
                wallet.keypair().pubkey()
            );
            wallet
        }
    };

    let client = MusicNftClient::from_env()?;
    let pinata = PinataClient::from_env()?;
    println!("RPC: {}", client.config().rpc_url);
    println!("Program: {}", client.program_id());

    let upload = AssetUpload {
        title: args[0].clone(),
        artist: args[1].clone(),
        music_file: Some(read_file(&args[2])?),
        certificate_file: Some(read_file(&args[3])?),
    };

    let created = match client.upload_and_create_asset(&wallet, &pinata, upload).await {
        Ok(created) => created,
        Err(e) => {
            eprintln!("{}", e.user_message());
            return Err(e.into());
        }
    };
    println!("Asset created: {}", created.asset);
    println!("  signature: {}", created.signature);
    println!("  slot: {}", created.confirmation.slot);

    let minted = client.mint(&wallet, &created.asset).await?;
    println!("Minted in slot {}", minted.slot);

    let registered = client.register_copyright(&wallet, &created.asset).await?;
    println!("Copyright registered in slot {}", registered.slot);

    let asset = client.get_asset(&created.asset).await?;
    println!("\n{} by {}", asset.title, asset.artist);
    println!("  music: ipfs://{}", asset.ipfs_hash);
    println!("  certificate: ipfs://{}", asset.certificate_hash);
    println!("  status: {:?}", asset.status());
    if let Some(created_at) = asset.created_at() {
        println!("  created: {}", created_at.to_rfc3339());
    }

    Ok(())
}
