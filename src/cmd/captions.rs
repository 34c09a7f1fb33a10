use std::path::Path;

use anyhow::Result;

use tubeinfo::EngineConfig;

use super::load_descriptor;

pub async fn cmd_captions(file: &Path, config: &EngineConfig) -> Result<()> {
    let descriptor = load_descriptor(file, config).await?;
    let captions = descriptor.captions();

    for caption in captions {
        let marker = if caption.is_translated() { "🌐" } else { "📝" };
        println!("{marker} {:<8} {}", caption.language_code(), caption.name());
        println!("   {}", caption.base_url());
    }
    println!("\n({} caption tracks)", captions.len());

    Ok(())
}
