use crate::patterns::FRONT_MATTER_RE;
use indexmap::IndexMap;

/// Front-matter entries in declaration order
pub type FrontMatter = IndexMap<String, String>;

/// Extract the flat `key: value` block fenced by `---` lines at the very
/// start of `text`. Returns an empty map when there is no block.
pub fn extract(text: &str) -> FrontMatter {
    let mut front_matter = FrontMatter::new();

    let Some(caps) = FRONT_MATTER_RE.captures(text) else {
        return front_matter;
    };

    for line in caps[1].lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once(':') {
            front_matter.insert(key.trim().to_lowercase(), value.trim().to_string());
        }
    }

    log::debug!("Front matter: {:?}", front_matter);
    front_matter
}

/// Byte length of the front-matter block, closing fence included
pub fn block_len(text: &str) -> Option<usize> {
    FRONT_MATTER_RE.find(text).map(|m| m.end())
}

/// Split comma-separated values, dropping empty items
pub fn split_list<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.as_ref().split(','))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_block_is_empty() {
        assert!(extract("# Title\n\nkey: value\n").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_block_must_start_at_offset_zero() {
        assert!(extract("\n---\ntitle: x\n---\n").is_empty());
        assert!(extract("intro\n---\ntitle: x\n---\n").is_empty());
    }

    #[test]
    fn test_keys_lowercased_and_trimmed() {
        let fm = extract("---\n  Title :  Hello World  \nTAGS: a, b\n---\nbody");
        assert_eq!(fm.get("title").map(String::as_str), Some("Hello World"));
        assert_eq!(fm.get("tags").map(String::as_str), Some("a, b"));
    }

    #[test]
    fn test_last_write_wins_keeps_first_position() {
        let fm = extract("---\ntitle: one\nauthor: me\nTitle: two\n---\n");
        assert_eq!(fm.get("title").map(String::as_str), Some("two"));
        let keys: Vec<_> = fm.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["title", "author"]);
    }

    #[test]
    fn test_malformed_and_comment_lines_skipped() {
        let fm = extract("---\n# comment: no\njust text\n\nurl: http://x.test/a\n---\n");
        assert_eq!(fm.len(), 1);
        // Only the first colon splits
        assert_eq!(fm.get("url").map(String::as_str), Some("http://x.test/a"));
    }

    #[test]
    fn test_crlf_block() {
        let fm = extract("---\r\ntitle: Hi\r\n---\r\nbody");
        assert_eq!(fm.get("title").map(String::as_str), Some("Hi"));
    }

    #[test]
    fn test_block_len() {
        let text = "---\na: b\n---\nbody";
        assert_eq!(block_len(text), Some(12));
        assert_eq!(&text[12..], "\nbody");
        assert_eq!(block_len("body"), None);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(&["rust, cli", " ", "blog"]),
            vec!["rust", "cli", "blog"]
        );
        assert!(split_list::<&str>(&[]).is_empty());
    }
}
