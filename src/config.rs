use crate::wordpress::PostStatus;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "md2wp.toml";

/// Blog id for single-site installs
pub const DEFAULT_BLOG_ID: i64 = 0;

/// MIME types accepted as images by the media library
pub const SUPPORTED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
];

/// Contents of `md2wp.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub site: SiteSection,
    pub post: PostSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub blog_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PostSection {
    pub status: Option<PostStatus>,
}

impl FileConfig {
    /// Load an explicit config file, or `md2wp.toml` in the working
    /// directory if it exists.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Connection settings after merging flags, environment and file
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    pub blog_id: i64,
}

impl SiteConfig {
    /// Command-line (or environment) values win over the config file
    pub fn resolve(
        url: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
        file: &SiteSection,
    ) -> Result<Self> {
        Ok(Self {
            url: pick(url, &file.url, "--url", "MD2WP_URL", "site.url")?,
            username: pick(
                username,
                &file.username,
                "--username",
                "MD2WP_USERNAME",
                "site.username",
            )?,
            password: pick(
                password,
                &file.password,
                "--password",
                "MD2WP_PASSWORD",
                "site.password",
            )?,
            blog_id: file.blog_id.unwrap_or(DEFAULT_BLOG_ID),
        })
    }
}

fn pick(
    flag_value: Option<&str>,
    file_value: &Option<String>,
    flag: &str,
    env: &str,
    key: &str,
) -> Result<String> {
    let non_empty = |v: &&str| !v.trim().is_empty();
    match flag_value
        .filter(non_empty)
        .or(file_value.as_deref().filter(non_empty))
    {
        Some(value) => Ok(value.to_string()),
        None => bail!(
            "Missing {}: pass it on the command line, set {}, or add `{}` to {}",
            flag,
            env,
            key,
            DEFAULT_CONFIG_FILE
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = FileConfig::parse(
            r#"
[site]
url = "https://blog.example.com"
username = "admin"
password = "app pass"
blog_id = 3

[post]
status = "pending"
"#,
        )
        .unwrap();

        assert_eq!(config.site.url.as_deref(), Some("https://blog.example.com"));
        assert_eq!(config.site.blog_id, Some(3));
        assert_eq!(config.post.status, Some(PostStatus::Pending));
    }

    #[test]
    fn test_parse_empty_and_unknown() {
        let config = FileConfig::parse("").unwrap();
        assert!(config.site.url.is_none());
        assert!(config.post.status.is_none());

        assert!(FileConfig::parse("[site]\nhost = \"x\"\n").is_err());
        assert!(FileConfig::parse("[post]\nstatus = \"live\"\n").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("site.toml");
        std::fs::write(&path, "[site]\nusername = \"me\"\n").unwrap();

        let config = FileConfig::load(Some(&path)).unwrap();
        assert_eq!(config.site.username.as_deref(), Some("me"));

        assert!(FileConfig::load(Some(&temp.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_site_config_precedence() {
        let file = SiteSection {
            url: Some("https://file.example".to_string()),
            username: Some("file-user".to_string()),
            password: Some("file-pass".to_string()),
            blog_id: None,
        };

        let site = SiteConfig::resolve(Some("https://cli.example"), None, None, &file).unwrap();
        assert_eq!(site.url, "https://cli.example");
        assert_eq!(site.username, "file-user");
        assert_eq!(site.password, "file-pass");
        assert_eq!(site.blog_id, DEFAULT_BLOG_ID);
    }

    #[test]
    fn test_site_config_missing_value() {
        let err = SiteConfig::resolve(Some("https://x"), Some("u"), None, &SiteSection::default())
            .unwrap_err();
        assert!(err.to_string().contains("--password"));
    }
}
