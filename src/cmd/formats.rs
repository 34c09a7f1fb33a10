use std::path::Path;

use anyhow::Result;

use tubeinfo::{EngineConfig, FormatKind, MediaFormat};

use super::load_descriptor;

pub async fn cmd_formats(file: &Path, kind: Option<FormatKind>, config: &EngineConfig) -> Result<()> {
    let descriptor = load_descriptor(file, config).await?;

    let formats: Vec<&MediaFormat> = descriptor
        .formats()
        .iter()
        .filter(|format| kind.is_none_or(|kind| format.kind == kind))
        .collect();

    println!(
        "{:<10} {:>5} {:<11} {:<8} {:>10} {:>9} {:<5} LIVE",
        "KIND", "ITAG", "MIME", "CODEC", "SIZE", "BITRATE", "DASH"
    );
    for format in &formats {
        let normalized = &format.normalized;
        let size = if normalized.width.is_empty() {
            "-".to_string()
        } else {
            format!("{}x{}", normalized.width, normalized.height)
        };
        println!(
            "{:<10} {:>5} {:<11} {:<8} {:>10} {:>9} {:<5} {}",
            format!("{:?}", format.kind),
            format.raw.itag.as_deref().unwrap_or("-"),
            normalized.mime_type.as_ref().map_or("?", |mime| mime.as_str()),
            format!("{:?}", normalized.codec_family),
            size,
            format.raw.bitrate.map_or_else(|| "-".to_string(), |b| b.to_string()),
            normalized.is_dash,
            normalized.is_live,
        );
    }
    println!("\n({} formats)", formats.len());

    Ok(())
}
