use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    console_observability::init();

    let settings = console_core::Settings::from_env().context("invalid CONSOLE_* settings")?;
    let addr = std::env::var("CONSOLE_MOCK_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let app = console_mock::build_app();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        title = %settings.title,
        "mock api listening"
    );

    axum::serve(listener, app).await.context("mock api server failed")?;
    Ok(())
}
