use crate::config::SiteConfig;
use crate::xmlrpc::{self, Value};
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;

/// Publication state of a new post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Publish,
    #[default]
    Draft,
    Pending,
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PostStatus::Publish => "publish",
            PostStatus::Draft => "draft",
            PostStatus::Pending => "pending",
        };
        f.write_str(s)
    }
}

/// A media item stored on the remote site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub id: String,
    pub url: String,
}

/// Everything needed to create a post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub thumbnail_id: Option<String>,
}

/// Remote operations the publisher needs from a blog
pub trait BlogClient {
    /// Store a file in the media library
    fn upload(&self, data: Vec<u8>, filename: &str, mime_type: &str) -> Result<UploadedMedia>;
    /// Create a post and return its id
    fn create_post(&self, post: &NewPost) -> Result<String>;
}

/// WordPress XML-RPC client
///
/// XML-RPC must be enabled on the site. Accounts with two-factor login
/// need an application password.
pub struct WordPressClient {
    rpc: xmlrpc::Client,
    username: String,
    password: String,
    blog_id: i64,
}

impl WordPressClient {
    /// Validate the site URL and probe the endpoint with `system.listMethods`
    pub fn connect(site: &SiteConfig) -> Result<Self> {
        let base = validate_site_url(&site.url)?;
        let endpoint = format!("{}/xmlrpc.php", base);

        let rpc = xmlrpc::Client::new(endpoint.clone());
        rpc.call("system.listMethods", &[]).with_context(|| {
            format!(
                "Cannot reach {}; check the URL and that XML-RPC is enabled",
                endpoint
            )
        })?;
        log::debug!("Connected to WordPress XML-RPC endpoint: {}", endpoint);

        Ok(Self {
            rpc,
            username: site.username.clone(),
            password: site.password.clone(),
            blog_id: site.blog_id,
        })
    }

    fn auth_params(&self) -> Vec<Value> {
        vec![
            Value::Int(self.blog_id),
            Value::from(self.username.as_str()),
            Value::from(self.password.as_str()),
        ]
    }
}

impl BlogClient for WordPressClient {
    fn upload(&self, data: Vec<u8>, filename: &str, mime_type: &str) -> Result<UploadedMedia> {
        let mut file = IndexMap::new();
        file.insert("name".to_string(), Value::from(filename));
        file.insert("type".to_string(), Value::from(mime_type));
        file.insert("bits".to_string(), Value::Base64(data));
        // Never replace an existing file; WordPress adds a suffix instead
        file.insert("overwrite".to_string(), Value::Bool(false));

        let mut params = self.auth_params();
        params.push(Value::Struct(file));

        let response = self
            .rpc
            .call("wp.uploadFile", &params)
            .context("XML-RPC upload failed")?;
        media_from_response(&response)
    }

    fn create_post(&self, post: &NewPost) -> Result<String> {
        let mut params = self.auth_params();
        params.push(post_struct(post));

        let response = self
            .rpc
            .call("wp.newPost", &params)
            .context("XML-RPC post creation failed")?;
        response
            .to_id()
            .context("wp.newPost returned no post id")
    }
}

/// Require an http(s) URL and drop trailing slashes
pub fn validate_site_url(url: &str) -> Result<&str> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        bail!("WordPress URL must start with http:// or https://: {}", url);
    }
    Ok(url.trim_end_matches('/'))
}

fn media_from_response(response: &Value) -> Result<UploadedMedia> {
    let id = response
        .get("id")
        .and_then(Value::to_id)
        .context("wp.uploadFile response has no id")?;
    let url = response
        .get("url")
        .and_then(Value::as_str)
        .context("wp.uploadFile response has no url")?
        .to_string();
    Ok(UploadedMedia { id, url })
}

fn post_struct(post: &NewPost) -> Value {
    let mut terms = IndexMap::new();
    terms.insert("category".to_string(), Value::from(post.categories.clone()));
    terms.insert("post_tag".to_string(), Value::from(post.tags.clone()));

    let mut data = IndexMap::new();
    data.insert("post_title".to_string(), Value::from(post.title.as_str()));
    data.insert("post_content".to_string(), Value::from(post.content.as_str()));
    data.insert("post_status".to_string(), Value::from(post.status.to_string()));
    data.insert("post_type".to_string(), Value::from("post"));
    data.insert("terms_names".to_string(), Value::Struct(terms));

    if let Some(ref id) = post.thumbnail_id {
        // Numeric ids go over as ints, which is what WordPress expects
        let thumbnail = id
            .parse::<i64>()
            .map(Value::Int)
            .unwrap_or_else(|_| Value::from(id.as_str()));
        data.insert("post_thumbnail".to_string(), thumbnail);
    }

    Value::Struct(data)
}
