use crate::dom::{Document, Markup};
use crate::errors::ToggleError;
use std::path::Path;
use tokio::fs;
use tracing::debug;

pub async fn load_page(path: &Path) -> Result<Document, ToggleError> {
    let bytes = fs::read(path).await?;
    let markup: Markup = serde_json::from_slice(&bytes)?;
    debug!(path = %path.display(), "page snapshot loaded");
    Ok(Document::new(markup))
}

pub async fn persist_page(path: &Path, document: &Document) -> Result<(), ToggleError> {
    let payload = serde_json::to_vec_pretty(&document.to_markup())?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, payload).await?;
    Ok(())
}
