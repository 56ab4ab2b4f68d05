use crate::document::{resolve_path, Asset};
use crate::patterns::COVER_RE;
use std::path::Path;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// Find the first `<!-- cover: path -->` annotation and resolve it to an
/// existing image. Any failure is logged and yields `None`.
pub fn extract(text: &str, base_dir: &Path) -> Option<Asset> {
    let Some(caps) = COVER_RE.captures(text) else {
        log::debug!("No cover annotation found");
        return None;
    };

    let reference = caps[1].trim();
    if reference.is_empty() {
        log::warn!("Cover annotation has an empty path, skipping");
        return None;
    }

    let resolved = resolve_path(reference, base_dir);
    if !resolved.exists() {
        log::warn!(
            "Cover image not found, skipping: {} (resolved to {})",
            reference,
            resolved.display()
        );
        return None;
    }

    if !is_image_file(&resolved) {
        log::warn!("Cover is not an image file, skipping: {}", resolved.display());
        return None;
    }

    log::debug!("Cover image: {} ({})", reference, resolved.display());
    Some(Asset {
        original_reference: reference.to_string(),
        resolved_path: resolved,
        is_image: true,
    })
}

/// Extension check against the supported image types
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}
