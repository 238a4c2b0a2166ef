use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use nhl_core::{CoreConfig, PatientService, ReferenceData};

/// Main entry point for the NHL application
///
/// Loads the reference data once, then serves the REST API with Swagger UI.
///
/// # Environment Variables
/// - `NHL_REST_ADDR`: REST server address (default: "0.0.0.0:$PORT")
/// - `PORT`: port used when `NHL_REST_ADDR` is unset (default: 8080)
/// - `NHL_DATA_DIR`: directory holding the JSON data files (default: "data")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the data directory does not exist,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nhl_run=info".parse()?)
                .add_directive("nhl_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("NHL_REST_ADDR").unwrap_or_else(|_| {
        let port = std::env::var("PORT").unwrap_or_else(|_| "8080".into());
        format!("0.0.0.0:{port}")
    });

    let data_dir =
        std::env::var("NHL_DATA_DIR").unwrap_or_else(|_| nhl_core::DEFAULT_DATA_DIR.into());
    let data_path = Path::new(&data_dir);
    if !data_path.exists() {
        anyhow::bail!("Data directory does not exist: {}", data_path.display());
    }

    let cfg = Arc::new(CoreConfig::new(data_path.to_path_buf())?);
    let reference = Arc::new(ReferenceData::load(&cfg));
    let patient_service = PatientService::new(cfg, reference);

    tracing::info!("++ Starting NHL REST on {}", rest_addr);

    let app = api_rest::router(AppState::new(patient_service));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
