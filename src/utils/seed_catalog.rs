use clap::Parser;
use gamedex_backend::{api::FirestoreApi, documents::GameRecord, library::firestore::games, *};

/// Gamedex util for seeding the games catalog from a JSON file.
#[derive(Parser)]
struct Opts {
    /// JSON file with an array of catalog game records.
    #[clap(long, default_value = "catalog.json")]
    catalog: String,

    /// Firestore project that holds the catalog.
    #[clap(long, default_value = "gamedex-library")]
    project_id: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    Tracing::setup("utils/seed_catalog")?;

    let opts: Opts = Opts::parse();
    let firestore = FirestoreApi::connect(&opts.project_id).await?;

    let text = std::fs::read_to_string(&opts.catalog)?;
    let records: Vec<GameRecord> = serde_json::from_str(&text)?;

    let mut uploaded = 0;
    for game in &records {
        match games::write(&firestore, game).await {
            Ok(()) => uploaded += 1,
            Err(status) => eprintln!("Failed to upload '{}': {status}", game.title),
        }
    }
    println!("Uploaded {uploaded}/{} catalog entries", records.len());

    Ok(())
}
