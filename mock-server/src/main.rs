use mock_server::Dataset;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let dataset = match std::env::var("MOCK_DATASET") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)?;
            let dataset: Dataset = serde_json::from_str(&raw)?;
            tracing::info!(
                %path,
                operadoras = dataset.operadoras.len(),
                despesas = dataset.despesas.len(),
                "loaded dataset"
            );
            dataset
        }
        Err(_) => {
            tracing::info!("using built-in sample dataset");
            Dataset::sample()
        }
    };

    let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    mock_server::run_with(listener, dataset).await?;
    Ok(())
}
