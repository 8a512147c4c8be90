use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let var = |name: &str, default: &str| std::env::var(name).unwrap_or_else(|_| default.to_string());
    let port = var("PORT", "3000");
    let backend = mock_server::Backend::new(
        &var("CONTENTFUL_SPACE_ID", "dev-space"),
        &var("CONTENTFUL_ACCESS_TOKEN", "dev-delivery-token"),
        &var("CONTENTFUL_PREVIEW_ACCESS_TOKEN", "dev-preview-token"),
    )
    .with_posts(mock_server::sample_posts());

    let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;
    mock_server::run(listener, backend).await
}
