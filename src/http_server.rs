use clap::Parser;
use gamedex_backend::{api::FirestoreApi, http, Status, Tracing};
use std::{env, sync::Arc};
use tracing::info;
use warp::{self, Filter};

#[derive(Parser)]
struct Opts {
    /// Port number to use for listening to HTTP requests.
    #[clap(short, long, default_value = "8080")]
    port: u16,

    /// Firestore project that holds the catalog and user wishlists.
    #[clap(long, default_value = "gamedex-library")]
    project_id: String,

    #[clap(long)]
    prod_tracing: bool,
}

#[tokio::main]
async fn main() -> Result<(), Status> {
    let opts: Opts = Opts::parse();

    match opts.prod_tracing {
        false => Tracing::setup("gamedex-http-server")?,
        true => Tracing::setup_prod(&opts.project_id)?,
    }

    // Let ENV VAR override flag.
    let port: u16 = match env::var("PORT") {
        Ok(port) => match port.parse::<u16>() {
            Ok(port) => port,
            Err(_) => opts.port,
        },
        Err(_) => opts.port,
    };

    let firestore = FirestoreApi::connect(&opts.project_id).await?;

    info!("gamedex http server started");

    warp::serve(
        http::routes(Arc::new(firestore)).with(
            warp::cors()
                .allow_methods(vec!["GET", "POST"])
                .allow_headers(vec!["Content-Type", "Authorization"])
                .allow_any_origin()
                .allow_credentials(true),
        ),
    )
    .run(([0, 0, 0, 0], port))
    .await;

    Ok(())
}
