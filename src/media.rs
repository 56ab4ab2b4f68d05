use crate::config::SUPPORTED_IMAGE_TYPES;
use crate::document::Asset;
use crate::markdown::LinkMap;
use crate::wordpress::{BlogClient, UploadedMedia};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Maps original local references to remote media ids
pub type MediaIdMap = HashMap<String, String>;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Outcome of a batch upload
#[derive(Debug, Default)]
pub struct UploadReport {
    pub links: LinkMap,
    pub media_ids: MediaIdMap,
    pub failed: Vec<String>,
}

/// Upload each asset in turn. A failure is logged and recorded, and the
/// batch moves on to the next asset.
pub fn upload_assets(client: &dyn BlogClient, assets: &[&Asset], prefix: &str) -> UploadReport {
    let mut report = UploadReport::default();

    if assets.is_empty() {
        log::info!("No local resources to upload");
        return report;
    }

    let total = assets.len();
    log::info!(
        "Uploading {} local resources (prefix: {})",
        total,
        if prefix.is_empty() { "none" } else { prefix }
    );

    for (i, asset) in assets.iter().enumerate() {
        let idx = i + 1;
        log::debug!("Uploading ({}/{}): {}", idx, total, asset.display_name());

        match upload_asset(client, asset, prefix) {
            Ok(media) => {
                log::info!(
                    "Uploaded ({}/{}): {} -> {} (id {})",
                    idx,
                    total,
                    asset.display_name(),
                    media.url,
                    media.id
                );
                report
                    .links
                    .insert(asset.original_reference.clone(), media.url);
                report
                    .media_ids
                    .insert(asset.original_reference.clone(), media.id);
            }
            Err(e) => {
                log::error!(
                    "Upload failed ({}/{}): {}: {:#}",
                    idx,
                    total,
                    asset.display_name(),
                    e
                );
                report.failed.push(asset.original_reference.clone());
            }
        }
    }

    log::info!(
        "Uploads finished: {}/{} succeeded",
        total - report.failed.len(),
        total
    );
    report
}

fn upload_asset(client: &dyn BlogClient, asset: &Asset, prefix: &str) -> Result<UploadedMedia> {
    let filename = format!("{}{}", prefix, asset.display_name());

    let data = fs::read(&asset.resolved_path)
        .with_context(|| format!("Failed to read {}", asset.resolved_path.display()))?;

    let mime_type = detect_mime_type(&asset.resolved_path).unwrap_or_else(|| {
        log::warn!(
            "Unknown MIME type for {}, using {}",
            asset.display_name(),
            FALLBACK_MIME_TYPE
        );
        FALLBACK_MIME_TYPE
    });
    if asset.is_image && !SUPPORTED_IMAGE_TYPES.contains(&mime_type) {
        log::warn!(
            "{} is not a supported image type ({}), uploading anyway",
            asset.display_name(),
            mime_type
        );
    }

    client.upload(data, &filename, mime_type)
}

/// MIME type from the file extension
pub fn detect_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "tif" | "tiff" => "image/tiff",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "md" | "markdown" => "text/markdown",
        _ => return None,
    };
    Some(mime)
}
