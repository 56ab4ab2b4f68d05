use crate::wordpress::PostStatus;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

/// Publish a local Markdown file to WordPress
#[derive(Parser, Debug)]
#[command(
    name = "md2wp",
    version,
    about,
    after_help = "Example: md2wp ./article.md --url https://example.com --username admin --category Tech --tag Rust"
)]
pub struct Cli {
    /// Path to the Markdown file
    pub input: PathBuf,

    /// Site root URL, e.g. https://example.com
    #[arg(long, env = "MD2WP_URL")]
    pub url: Option<String>,

    /// Login user name (needs permission to upload media and publish posts)
    #[arg(long, env = "MD2WP_USERNAME")]
    pub username: Option<String>,

    /// Login or application password
    #[arg(long, env = "MD2WP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Post title. Defaults to the front matter `title`, then the file name.
    #[arg(long)]
    pub title: Option<String>,

    /// Cover image path, relative to the Markdown file.
    /// Takes precedence over a `<!-- cover: ... -->` annotation.
    #[arg(long)]
    pub cover: Option<PathBuf>,

    /// Post category; repeatable or comma-separated
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Post tag; repeatable or comma-separated
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Prefix for uploaded file names. Defaults to "<file stem>_".
    #[arg(long)]
    pub prefix: Option<String>,

    /// Post status. Defaults to the config file's value, then draft.
    #[arg(long, value_enum)]
    pub status: Option<PostStatus>,

    /// Config file. Defaults to ./md2wp.toml when present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_repeatable_lists_and_defaults() {
        let cli = Cli::try_parse_from([
            "md2wp",
            "post.md",
            "--category",
            "Tech,Rust",
            "--category",
            "Notes",
            "--tag",
            "cli",
            "--status",
            "publish",
        ])
        .unwrap();

        assert_eq!(cli.input, PathBuf::from("post.md"));
        assert_eq!(cli.categories, vec!["Tech,Rust", "Notes"]);
        assert_eq!(cli.tags, vec!["cli"]);
        assert_eq!(cli.status, Some(PostStatus::Publish));
        assert_eq!(cli.log_level, LogLevel::Info);
        assert!(cli.cover.is_none());
    }

    #[test]
    fn test_rejects_unknown_status() {
        assert!(Cli::try_parse_from(["md2wp", "post.md", "--status", "live"]).is_err());
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(LevelFilter::from(LogLevel::Warn), LevelFilter::Warn);
    }
}
