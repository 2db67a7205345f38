use tracing_subscriber::EnvFilter;

use shelfwatch::config::AlertConfig;
use shelfwatch::errors::AlertResult;
use shelfwatch::firebase::auth::mint_access_token;
use shelfwatch::firebase::{FirestoreClient, MessagingClient, ServiceAccountKey};
use shelfwatch::job::run_expiry_alert_job;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // Startup failures can precede subscriber init, so hit stderr directly
        eprintln!("Job failed: {err}");
        std::process::exit(1);
    }
}

async fn run() -> AlertResult<()> {
    let config = AlertConfig::load()?;

    // Initialize logging at the configured level
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // The credential must be present and well-formed before any I/O
    let key = ServiceAccountKey::from_env()?;

    let project_id = if config.firestore.project_id.is_empty() {
        key.project_id.clone()
    } else {
        config.firestore.project_id.clone()
    };

    let http = reqwest::Client::new();
    let access_token = mint_access_token(&http, &key, &config.endpoints.token_url).await?;

    let firestore = FirestoreClient::new(
        http.clone(),
        &config,
        project_id.clone(),
        access_token.clone(),
    );
    let messaging = MessagingClient::new(http, &config, project_id, access_token);

    run_expiry_alert_job(&config, &firestore, &firestore, &messaging).await?;

    Ok(())
}
