use crate::patterns::{MEDIA_LINK_RE, PLAIN_LINK_RE};
use regex::{Captures, Regex};
use std::collections::HashMap;

/// Maps original local references to their uploaded URLs
pub type LinkMap = HashMap<String, String>;

/// Point every mapped link target at its replacement.
///
/// Embedded media is rewritten first, then plain links over the result.
/// Only the target inside each matched link changes; unmapped targets and
/// all other text are returned byte-for-byte.
pub fn rewrite_links(body: &str, link_map: &LinkMap) -> String {
    if link_map.is_empty() {
        return body.to_string();
    }

    let md = rewrite_pass(&MEDIA_LINK_RE, body, link_map);
    rewrite_pass(&PLAIN_LINK_RE, &md, link_map)
}

fn rewrite_pass(pattern: &Regex, text: &str, link_map: &LinkMap) -> String {
    pattern
        .replace_all(text, |caps: &Captures| rewrite_target(caps, link_map))
        .into_owned()
}

fn rewrite_target(caps: &Captures, link_map: &LinkMap) -> String {
    let whole = &caps[0];
    let Some(target) = caps.get(1) else {
        return whole.to_string();
    };

    let raw = target.as_str();
    let trimmed = raw.trim();
    let Some(replacement) = link_map.get(trimmed) else {
        return whole.to_string();
    };

    let whole_start = caps.get(0).map_or(0, |m| m.start());
    let start = target.start() - whole_start + (raw.len() - raw.trim_start().len());
    let end = start + trimmed.len();

    format!("{}{}{}", &whole[..start], replacement, &whole[end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> LinkMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_map_is_noop() {
        let body = "![a](a.png) [b](b.pdf) text";
        assert_eq!(rewrite_links(body, &LinkMap::new()), body);
    }

    #[test]
    fn test_unmapped_keys_leave_body_unchanged() {
        let body = "![a](a.png) [b](https://example.com)\n";
        let m = map(&[("other.png", "https://cdn.example/other.png")]);
        assert_eq!(rewrite_links(body, &m), body);
    }

    #[test]
    fn test_image_with_title() {
        let m = map(&[("img/a.png", "https://cdn.example/a.png")]);
        assert_eq!(
            rewrite_links(r#"![alt](img/a.png "t")"#, &m),
            r#"![alt](https://cdn.example/a.png "t")"#
        );
    }

    #[test]
    fn test_plain_link() {
        let m = map(&[("./spec.pdf", "https://cdn.example/spec.pdf")]);
        assert_eq!(
            rewrite_links("Read [the spec](./spec.pdf).", &m),
            "Read [the spec](https://cdn.example/spec.pdf)."
        );
    }

    #[test]
    fn test_only_target_position_is_replaced() {
        let m = map(&[("a.png", "https://cdn.example/a.png")]);
        assert_eq!(
            rewrite_links("a.png: ![a.png](a.png) and a.png", &m),
            "a.png: ![a.png](https://cdn.example/a.png) and a.png"
        );
    }

    #[test]
    fn test_surrounding_whitespace_kept() {
        let m = map(&[("a.png", "https://cdn.example/a.png")]);
        assert_eq!(
            rewrite_links("![x]( a.png )", &m),
            "![x]( https://cdn.example/a.png )"
        );
    }

    #[test]
    fn test_mixed_document() {
        let m = map(&[
            ("img/a.png", "https://cdn.example/a.png"),
            ("doc.pdf", "https://cdn.example/doc.pdf"),
        ]);
        let body = "# T\n\n![a](img/a.png)\n[ext](https://rust-lang.org)\n[d](doc.pdf \"Doc\")\n![missing](gone.png)\n![again](img/a.png)\n";
        let expected = "# T\n\n![a](https://cdn.example/a.png)\n[ext](https://rust-lang.org)\n[d](https://cdn.example/doc.pdf \"Doc\")\n![missing](gone.png)\n![again](https://cdn.example/a.png)\n";
        assert_eq!(rewrite_links(body, &m), expected);
    }

    #[test]
    fn test_rewrite_is_idempotent_for_same_mapping() {
        let m = map(&[("a.png", "https://cdn.example/a.png")]);
        let once = rewrite_links("![x](a.png)", &m);
        assert_eq!(rewrite_links(&once, &m), once);
    }
}
