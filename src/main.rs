use blog_toggles::{
    Config, ControlKind, PageController, ReqwestTransport, ToggleOutcome, cli::Cli,
    errors::ToggleError, load_page, persist_page, resolve_page_path,
};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let (kind, key) = cli.command.target();

    let config = Config::from_env()?;
    let page_path = resolve_page_path();
    let document = load_page(&page_path).await?;
    let transport = Arc::new(ReqwestTransport::new(&config)?);
    info!(base_url = %config.base_url, page = %page_path.display(), "driving page");

    let page = PageController::ready(document, transport, config);
    let target = match kind {
        ControlKind::Like => page.find_like(key).await,
        ControlKind::Subscription => page.find_subscription(key).await,
    };
    let Some(target) = target else {
        let kind = match kind {
            ControlKind::Like => "like",
            ControlKind::Subscription => "subscription",
        };
        let key = key.to_string();
        return Err(ToggleError::ControlNotFound { kind, key }.into());
    };

    let outcome = page.click(target).await.settled().await;
    if outcome != ToggleOutcome::Applied {
        warn!(?outcome, "page left unchanged");
        return Ok(());
    }

    persist_page(&page_path, &page.snapshot().await).await?;
    info!(page = %page_path.display(), "page updated");
    Ok(())
}
