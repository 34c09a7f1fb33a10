pub mod captions;
pub mod formats;
pub mod inspect;
pub mod output;
pub mod urls;

use std::path::Path;

use anyhow::{Context, Result};

use tubeinfo::{EngineConfig, PlaybackDescriptor, PlayerResponse};

/// Read a player response from disk and assemble it.
pub async fn load_descriptor(path: &Path, config: &EngineConfig) -> Result<PlaybackDescriptor> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let response = PlayerResponse::from_slice(&bytes)
        .with_context(|| format!("{} is not a player response", path.display()))?;

    Ok(PlaybackDescriptor::assemble(response, config))
}
