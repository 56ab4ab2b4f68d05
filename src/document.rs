use crate::front_matter::{self, FrontMatter};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::path::{Component, Path, PathBuf};

/// A local file referenced from the document
#[derive(Debug, Clone)]
pub struct Asset {
    /// Reference exactly as written in the document
    pub original_reference: String,
    /// Absolute path, resolved against the document's directory
    pub resolved_path: PathBuf,
    /// Referenced with `![..](..)` rather than `[..](..)`
    pub is_image: bool,
}

impl Asset {
    /// Resolve `reference` against `base_dir`, returning `None` when the
    /// resulting path does not exist.
    pub fn resolve(reference: &str, base_dir: &Path, is_image: bool) -> Option<Self> {
        let resolved_path = resolve_path(reference, base_dir);
        if !resolved_path.exists() {
            return None;
        }

        Some(Self {
            original_reference: reference.to_string(),
            resolved_path,
            is_image,
        })
    }

    pub fn display_name(&self) -> String {
        self.resolved_path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

// Identity is the reference string: the same reference seen as a body
// image and as the cover is one upload.
impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        self.original_reference == other.original_reference
    }
}

impl Eq for Asset {}

impl Hash for Asset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.original_reference.hash(state);
    }
}

/// Everything extracted from one source document
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub raw_text: String,
    pub source_path: PathBuf,
    pub source_dir: PathBuf,
    /// `http`/`https` targets in first-seen order, duplicates kept
    pub external_links: Vec<String>,
    /// Existing local files in encounter order, duplicates kept
    pub local_assets: Vec<Asset>,
    pub cover_asset: Option<Asset>,
    pub front_matter: FrontMatter,
}

impl ParsedDocument {
    /// Text following the front-matter block, or the whole text if there is none
    pub fn body(&self) -> &str {
        match front_matter::block_len(&self.raw_text) {
            Some(len) => self.raw_text[len..].trim_start_matches(['\r', '\n']),
            None => &self.raw_text,
        }
    }

    /// Replace the cover, e.g. with one given on the command line
    pub fn set_cover(&mut self, asset: Asset) {
        self.cover_asset = Some(asset);
    }

    /// Files to upload: local assets then the cover, each reference once
    pub fn upload_set(&self) -> Vec<&Asset> {
        let mut seen = HashSet::new();
        self.local_assets
            .iter()
            .chain(self.cover_asset.iter())
            .filter(|asset| seen.insert(asset.original_reference.as_str()))
            .collect()
    }

    /// File stem of the source, used for the default title and upload prefix
    pub fn stem(&self) -> String {
        self.source_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Join `reference` onto `base_dir` and fold `.`/`..` components lexically.
/// Absolute references replace the base.
pub fn resolve_path(reference: &str, base_dir: &Path) -> PathBuf {
    normalize_path(&base_dir.join(reference))
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                }
            }
            c => components.push(c),
        }
    }
    components.iter().collect()
}
