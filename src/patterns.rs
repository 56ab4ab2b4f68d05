//! Cached regex patterns for the Markdown mini-grammar.
//!
//! Only three constructs are recognised: embedded media, plain links and
//! the cover comment, plus the leading front-matter fence. This is not a
//! Markdown parser; nested brackets or escaped parens will misfire.

use regex::Regex;
use std::sync::LazyLock;

/// Leading `---` fenced block, anchored at offset 0. Group 1 is the body.
pub static FRONT_MATTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A---\s*\n(.*?)\n---").unwrap());

/// Either link form. Group 1 is the `!` marker (possibly empty), group 2
/// the target, group 3 the optional quoted title.
pub static ANY_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(!?)\[.*?\]\((.*?)(\s+"[^"]+")?\)"#).unwrap());

/// `![label](target "title")`. Group 1 is the target.
pub static MEDIA_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"!\[.*?\]\((.*?)(\s+"[^"]+")?\)"#).unwrap());

/// `[label](target "title")`. Group 1 is the target.
pub static PLAIN_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[.*?\]\((.*?)(\s+"[^"]+")?\)"#).unwrap());

/// `<!-- cover: target -->`. Group 1 is the target.
pub static COVER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--\s*cover:\s*(.*?)\s*-->").unwrap());
