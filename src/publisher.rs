use crate::cli::Cli;
use crate::config::{FileConfig, SiteConfig};
use crate::document::{Asset, ParsedDocument};
use crate::front_matter::split_list;
use crate::markdown;
use crate::media;
use crate::parser;
use crate::wordpress::{BlogClient, NewPost, PostStatus, WordPressClient};
use anyhow::Result;
use std::path::Path;

/// Settings for one publish run after merging flags, front matter and config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOptions {
    pub title: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub prefix: String,
}

impl PublishOptions {
    /// Flags win; front matter fills in what they leave out
    pub fn resolve(cli: &Cli, doc: &ParsedDocument, default_status: PostStatus) -> Self {
        let title = cli
            .title
            .clone()
            .or_else(|| front_matter_value(doc, "title"))
            .unwrap_or_else(|| doc.stem());

        let categories = list_or_front_matter(&cli.categories, doc, "categories");
        let tags = list_or_front_matter(&cli.tags, doc, "tags");

        let prefix = cli
            .prefix
            .clone()
            .unwrap_or_else(|| format!("{}_", doc.stem()));

        Self {
            title,
            categories,
            tags,
            status: cli.status.unwrap_or(default_status),
            prefix,
        }
    }
}

pub fn publish(cli: &Cli) -> Result<()> {
    let file_config = FileConfig::load(cli.config.as_deref())?;
    let site = SiteConfig::resolve(
        cli.url.as_deref(),
        cli.username.as_deref(),
        cli.password.as_deref(),
        &file_config.site,
    )?;

    let mut doc = parser::parse(&cli.input)?;

    if let Some(ref cover) = cli.cover {
        apply_cover_override(&mut doc, cover);
    }

    let options = PublishOptions::resolve(cli, &doc, file_config.post.status.unwrap_or_default());
    log::debug!("Publish options: {:?}", options);

    let client = WordPressClient::connect(&site)?;
    let post_id = publish_document(&client, &doc, &options)?;

    log::info!("Published post {}", post_id);
    log::info!("Post link: {}/?p={}", site.url.trim_end_matches('/'), post_id);

    Ok(())
}

/// Upload the document's files, rewrite its links and create the post.
///
/// Only post creation failing is an error; a failed upload leaves that
/// link as written, and a failed cover upload only drops the thumbnail.
pub fn publish_document(
    client: &dyn BlogClient,
    doc: &ParsedDocument,
    options: &PublishOptions,
) -> Result<String> {
    let assets = doc.upload_set();
    let report = media::upload_assets(client, &assets, &options.prefix);

    let content = markdown::rewrite_links(doc.body(), &report.links);

    let thumbnail_id = doc.cover_asset.as_ref().and_then(|cover| {
        let id = report.media_ids.get(&cover.original_reference).cloned();
        if id.is_none() {
            log::warn!("Cover image was not uploaded, post will have no cover");
        }
        id
    });

    let post = NewPost {
        title: options.title.clone(),
        content,
        categories: options.categories.clone(),
        tags: options.tags.clone(),
        status: options.status,
        thumbnail_id,
    };

    log::info!(
        "Creating post \"{}\" (status: {}, categories: {:?}, tags: {:?})",
        post.title,
        post.status,
        post.categories,
        post.tags
    );
    client.create_post(&post)
}

/// Swap in a cover given outside the document. The path is resolved like a
/// body reference; a missing file keeps whatever cover the document had.
pub fn apply_cover_override(doc: &mut ParsedDocument, cover: &Path) {
    let reference = cover.to_string_lossy();
    match Asset::resolve(&reference, &doc.source_dir, true) {
        Some(asset) => {
            log::info!("Using cover from command line: {}", reference);
            doc.set_cover(asset);
        }
        None => log::warn!("Cover image not found, ignoring --cover: {}", reference),
    }
}

fn front_matter_value(doc: &ParsedDocument, key: &str) -> Option<String> {
    doc.front_matter
        .get(key)
        .filter(|v| !v.is_empty())
        .cloned()
}

fn list_or_front_matter(values: &[String], doc: &ParsedDocument, key: &str) -> Vec<String> {
    let list = split_list(values);
    if !list.is_empty() {
        return list;
    }

    match front_matter_value(doc, key) {
        Some(value) => {
            let list = split_list(&[value]);
            log::info!("Using {} from front matter: {:?}", key, list);
            list
        }
        None => list,
    }
}
