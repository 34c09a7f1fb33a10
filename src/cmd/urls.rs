use std::path::Path;

use anyhow::Result;

use tubeinfo::{EngineConfig, RegularUrlList};

use super::load_descriptor;

pub async fn cmd_urls(file: &Path, config: &EngineConfig) -> Result<()> {
    let descriptor = load_descriptor(file, config).await?;

    for url in descriptor.create_url_list(&RegularUrlList) {
        println!("{url}");
    }

    Ok(())
}
