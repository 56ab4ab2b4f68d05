use crate::cover;
use crate::document::ParsedDocument;
use crate::error::ParseError;
use crate::front_matter;
use crate::links;
use std::fs;
use std::path::Path;

/// Read and extract a Markdown document.
///
/// A missing file or non-UTF-8 content aborts; everything else that goes
/// wrong (missing assets, bad cover) only degrades the result.
pub fn parse(path: &Path) -> Result<ParsedDocument, ParseError> {
    if !path.exists() {
        log::error!("Markdown file not found: {}", path.display());
        return Err(ParseError::NotFound(path.to_path_buf()));
    }

    let source_path = std::path::absolute(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let source_dir = source_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| source_path.clone());
    log::debug!(
        "Parsing {} (directory: {})",
        source_path.display(),
        source_dir.display()
    );

    let bytes = fs::read(&source_path).map_err(|source| ParseError::Io {
        path: source_path.clone(),
        source,
    })?;
    let raw_text = String::from_utf8(bytes).map_err(|source| {
        log::error!("Markdown file is not valid UTF-8: {}", source_path.display());
        ParseError::Decode {
            path: source_path.clone(),
            source,
        }
    })?;

    let front_matter = front_matter::extract(&raw_text);
    let links = links::extract(&raw_text, &source_dir);
    let cover_asset = cover::extract(&raw_text, &source_dir);

    let doc = ParsedDocument {
        raw_text,
        source_path,
        source_dir,
        external_links: links.external_links,
        local_assets: links.local_assets,
        cover_asset,
        front_matter,
    };

    log::info!(
        "Parsed Markdown: {} local resources, {} external links, cover {}, {} front matter entries",
        doc.local_assets.len(),
        doc.external_links.len(),
        if doc.cover_asset.is_some() { "found" } else { "not set" },
        doc.front_matter.len()
    );

    Ok(doc)
}
