//! Feed command - render the blog RSS feed.

use std::path::Path;

use anyhow::{Context, Result};
use devsolo_core::feed::{build_feed, load_entries};
use devsolo_core::SiteConfig;
use tokio::fs;
use tracing::debug;

/// Command-line replacements for the default site constants.
pub struct SiteOverrides {
    pub site: Option<String>,
    pub base: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl SiteOverrides {
    fn apply(self, mut site: SiteConfig) -> SiteConfig {
        if let Some(origin) = self.site {
            site.site = origin;
        }
        if let Some(base) = self.base {
            site.base = base;
        }
        if let Some(title) = self.title {
            site.title = title;
        }
        if let Some(description) = self.description {
            site.description = description;
        }
        site
    }
}

pub async fn run(entries: &Path, overrides: SiteOverrides, output: Option<&Path>) -> Result<i32> {
    let json = fs::read_to_string(entries)
        .await
        .with_context(|| format!("Failed to read {}", entries.display()))?;
    let entries = load_entries(&json).context("Invalid entries file")?;

    let site = overrides.apply(SiteConfig::default());
    let feed = build_feed(&entries, &site);
    debug!(items = feed.items.len(), "Rendered feed");

    let xml = feed.to_xml();
    match output {
        Some(path) => fs::write(path, xml)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", xml),
    }

    Ok(0)
}
