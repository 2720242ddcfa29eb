use anyhow::Result;
use clap::Parser;
use folio::FolioConfig;
use folio_server::server;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about)]
struct ServerArgs {
    #[clap(short, long)]
    log_level: Option<String>,
    #[clap(short, long, default_value = "3000")]
    port: u16,
    /// Database file path; falls back to FOLIO_DATABASE_URL
    #[clap(short, long)]
    database: Option<String>,
    #[clap(long)]
    public_dir: Option<String>,
    #[clap(long)]
    upload_tmp_dir: Option<String>,
    /// Upload size limit in bytes
    #[clap(long)]
    max_upload_size: Option<u64>,
    #[clap(long)]
    cors_origin: Option<String>,
}

impl ServerArgs {
    fn config(&self) -> FolioConfig {
        let mut config = FolioConfig::from_env();
        if let Some(database) = &self.database {
            config.database_url = database.clone();
        }
        if let Some(public_dir) = &self.public_dir {
            config.public_dir = public_dir.into();
        }
        if let Some(upload_tmp_dir) = &self.upload_tmp_dir {
            config.upload_tmp_dir = upload_tmp_dir.into();
        }
        if let Some(max_upload_size) = self.max_upload_size {
            config.max_upload_size = max_upload_size;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();
    setup_logging(&args.log_level);

    let config = args.config();
    info!("Starting server on port {}", args.port);
    server::start_server(args.port, config, args.cors_origin.as_deref()).await?;

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("sqlx=warn,{}", log_level)))
        .without_time()
        .init();
}
