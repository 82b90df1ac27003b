//! Project file I/O
//!
//! A project file is a [`MemoryDocument`] serialized as JSON.

#[cfg(feature = "serde")]
use crate::memory::MemoryDocument;
#[cfg(feature = "serde")]
use crate::types::*;
#[cfg(feature = "serde")]
use std::path::Path;

/// Load a project document
#[cfg(feature = "serde")]
pub async fn load_project(path: impl AsRef<Path>) -> Result<MemoryDocument> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let doc = tokio::task::spawn_blocking(move || {
        serde_json::from_slice::<MemoryDocument>(&bytes)
    })
    .await??;
    Ok(doc)
}

/// Save a project document
#[cfg(feature = "serde")]
pub async fn save_project(doc: &MemoryDocument, path: impl AsRef<Path>) -> Result<()> {
    if doc.in_transaction() {
        return Err(ComposeError::Config(
            "Cannot save a document with an open transaction".to_string(),
        ));
    }
    let json = serde_json::to_vec_pretty(doc)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
