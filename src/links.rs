use crate::document::Asset;
use crate::patterns::ANY_LINK_RE;
use std::path::Path;

/// Links found in a document body
#[derive(Debug, Default)]
pub struct ExtractedLinks {
    pub external_links: Vec<String>,
    pub local_assets: Vec<Asset>,
}

/// Scan `text` for `![..](..)` and `[..](..)` links and classify each target.
///
/// Web targets are kept verbatim. Anything else is resolved against
/// `base_dir`; targets that do not exist are logged and dropped.
pub fn extract(text: &str, base_dir: &Path) -> ExtractedLinks {
    let mut links = ExtractedLinks::default();

    for caps in ANY_LINK_RE.captures_iter(text) {
        let target = caps[2].trim();
        if target.is_empty() {
            continue;
        }

        if is_web_url(target) {
            log::debug!("External link: {}", target);
            links.external_links.push(target.to_string());
            continue;
        }

        let is_image = !caps[1].is_empty();
        match Asset::resolve(target, base_dir, is_image) {
            Some(asset) => {
                log::debug!(
                    "Local {}: {} ({})",
                    if is_image { "image" } else { "file" },
                    asset.display_name(),
                    asset.resolved_path.display()
                );
                links.local_assets.push(asset);
            }
            None => log::warn!(
                "Local resource not found, skipping: {} (resolved to {})",
                target,
                base_dir.join(target).display()
            ),
        }
    }

    links
}

/// True when the target's URL scheme is `http` or `https`
pub fn is_web_url(target: &str) -> bool {
    matches!(scheme(target), Some(s) if s.eq_ignore_ascii_case("http") || s.eq_ignore_ascii_case("https"))
}

fn scheme(target: &str) -> Option<&str> {
    let (scheme, _) = target.split_once(':')?;
    let mut chars = scheme.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let rest_valid = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    (starts_alpha && rest_valid).then_some(scheme)
}
