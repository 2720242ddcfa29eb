pub mod app;
pub mod handlers;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;

use folio::database::{establish_connection, get_database_url, setup_database};
use folio::FolioConfig;

pub use app::create_app;

pub async fn start_server(port: u16, config: FolioConfig, cors_origin: Option<&str>) -> Result<()> {
    let database_url = get_database_url(Some(&config.database_url));
    info!("Connecting to database: {}", database_url);

    let db = establish_connection(&database_url).await?;
    info!("Running database migrations");
    setup_database(&db).await?;

    tokio::fs::create_dir_all(&config.public_dir).await?;
    tokio::fs::create_dir_all(&config.upload_tmp_dir).await?;

    let app = create_app(db, config, cors_origin).await?;

    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Server listening on http://0.0.0.0:{}", port);
    log_routes(port);

    axum::serve(listener, app).await?;
    Ok(())
}

fn log_routes(port: u16) {
    info!("Health check: http://localhost:{}/health", port);
    info!("GraphQL endpoint: http://localhost:{}/graphql", port);
    info!("GraphQL playground: http://localhost:{}/graphql (GET)", port);
}
