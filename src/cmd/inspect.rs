use std::path::Path;

use anyhow::{Context, Result};

use tubeinfo::{EngineConfig, LiveTiming};

use super::load_descriptor;
use super::output::{print_text, DescriptorSummary};
use crate::OutputFormat;

pub async fn cmd_inspect(
    file: &Path,
    timing: Option<&Path>,
    format: OutputFormat,
    config: &EngineConfig,
) -> Result<()> {
    let mut descriptor = load_descriptor(file, config).await?;

    if let Some(path) = timing {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let live: LiveTiming = serde_json::from_slice(&bytes)
            .with_context(|| format!("invalid live timing in {}", path.display()))?;
        descriptor.sync(Some(&live));
    }

    if !descriptor.is_valid() {
        tracing::warn!("Document carries no watch-history data");
    }

    let summary = DescriptorSummary::new(&descriptor);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => print_text(&summary),
    }

    Ok(())
}
