//! RSS feed generation for the blog collection.
//!
//! Entries come from the content collection (read here as JSON), each item
//! links to `<base>/blog/<id>/`, and the document is rendered as RSS 2.0.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::SiteConfig;
use crate::error::Result;

/// Frontmatter fields of a blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "de_post_date")]
    pub pub_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_post_date")]
    pub updated_date: Option<NaiveDate>,
    #[serde(default)]
    pub hero_image: Option<String>,
}

/// One entry of the blog collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    /// Collection id, used as the URL slug.
    pub id: String,
    pub data: PostData,
}

/// One `<item>` of the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedItem {
    pub title: String,
    pub description: String,
    /// Site-relative link, `<base>/blog/<id>/`.
    pub link: String,
    pub pub_date: Option<NaiveDate>,
}

/// An RSS channel ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feed {
    pub title: String,
    pub description: String,
    /// Site origin; relative item links resolve against it.
    pub site: String,
    pub items: Vec<FeedItem>,
}

/// Calendar date of a frontmatter date string.
///
/// Accepts `2022-07-08`, RFC 3339 (`2022-07-08T10:00:00Z`, offset dates are
/// taken in UTC), a bare `2022-07-08T10:00:00`, RFC 2822 and the written
/// `Jul 08 2022` / `July 8, 2022` forms.
pub fn parse_post_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc).date_naive());
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(at.date());
    }
    if let Ok(at) = DateTime::parse_from_rfc2822(raw) {
        return Some(at.with_timezone(&Utc).date_naive());
    }
    ["%b %d %Y", "%b %d, %Y", "%a %b %d %Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

fn de_post_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_post_date(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognised date: {}", raw))),
    }
}

/// Parse a JSON array of collection entries.
pub fn load_entries(json: &str) -> Result<Vec<ContentEntry>> {
    Ok(serde_json::from_str(json)?)
}

/// Base path with exactly one leading and one trailing slash.
pub fn normalize_base(base: &str) -> String {
    let trimmed = base.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

/// Link of a post: `<base>/blog/<id>/`.
pub fn post_link(base: &str, id: &str) -> String {
    format!("{}blog/{}/", normalize_base(base), id)
}

/// Map collection entries to feed items, keeping their order.
pub fn build_feed(entries: &[ContentEntry], site: &SiteConfig) -> Feed {
    let items = entries
        .iter()
        .map(|entry| FeedItem {
            title: entry.data.title.clone(),
            description: entry.data.description.clone(),
            link: post_link(&site.base, &entry.id),
            pub_date: entry.data.pub_date,
        })
        .collect();

    Feed {
        title: site.title.clone(),
        description: site.description.clone(),
        site: site.site.clone(),
        items,
    }
}

impl Feed {
    /// Absolute URL of `item` on the deployed site.
    pub fn absolute_link(&self, item: &FeedItem) -> String {
        format!("{}{}", self.site.trim_end_matches('/'), item.link)
    }

    /// Render the channel as an RSS 2.0 document.
    pub fn to_xml(&self) -> String {
        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push_str(r#"<rss version="2.0"><channel>"#);
        push_element(&mut xml, "title", &self.title);
        push_element(&mut xml, "description", &self.description);
        push_element(&mut xml, "link", &format!("{}/", self.site.trim_end_matches('/')));

        for item in &self.items {
            let link = self.absolute_link(item);
            xml.push_str("<item>");
            push_element(&mut xml, "title", &item.title);
            push_element(&mut xml, "link", &link);
            xml.push_str(r#"<guid isPermaLink="true">"#);
            xml.push_str(&escape(&link));
            xml.push_str("</guid>");
            if !item.description.is_empty() {
                push_element(&mut xml, "description", &item.description);
            }
            if let Some(date) = item.pub_date {
                push_element(&mut xml, "pubDate", &rfc2822(date));
            }
            xml.push_str("</item>");
        }

        xml.push_str("</channel></rss>");
        xml
    }
}

fn push_element(xml: &mut String, name: &str, text: &str) {
    xml.push('<');
    xml.push_str(name);
    xml.push('>');
    xml.push_str(&escape(text));
    xml.push_str("</");
    xml.push_str(name);
    xml.push('>');
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn rfc2822(date: NaiveDate) -> String {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
        .to_rfc2822()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, title: &str) -> ContentEntry {
        ContentEntry {
            id: id.to_string(),
            data: PostData {
                title: title.to_string(),
                description: format!("About {}", title),
                pub_date: NaiveDate::from_ymd_opt(2024, 7, 1),
                updated_date: None,
                hero_image: None,
            },
        }
    }

    #[test]
    fn test_item_link_uses_base_path() {
        let site = SiteConfig {
            base: "/badware/".to_string(),
            ..SiteConfig::default()
        };
        let feed = build_feed(&[entry("hello-world", "Hello")], &site);

        assert_eq!(feed.items.len(), 1);
        assert_eq!(feed.items[0].link, "/badware/blog/hello-world/");
    }

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base("/badware"), "/badware/");
        assert_eq!(normalize_base("badware/"), "/badware/");
        assert_eq!(normalize_base(""), "/");
        assert_eq!(normalize_base("/"), "/");
        assert_eq!(post_link("", "first"), "/blog/first/");
    }

    #[test]
    fn test_feed_keeps_entry_order_and_site_constants() {
        let site = SiteConfig::default();
        let feed = build_feed(&[entry("b", "Second"), entry("a", "First")], &site);

        assert_eq!(feed.title, site.title);
        assert_eq!(feed.description, site.description);
        let ids: Vec<_> = feed.items.iter().map(|i| i.link.as_str()).collect();
        assert_eq!(ids, vec!["/badware/blog/b/", "/badware/blog/a/"]);
    }

    #[test]
    fn test_to_xml() {
        let feed = build_feed(&[entry("hello-world", "Fish & <Chips>")], &SiteConfig::default());
        let xml = feed.to_xml();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0">"#));
        assert!(xml.contains("<title>Fish &amp; &lt;Chips&gt;</title>"));
        assert!(xml.contains(
            "<link>https://johngithubby.github.io/badware/blog/hello-world/</link>"
        ));
        assert!(xml.contains("<pubDate>Mon, 1 Jul 2024 00:00:00 +0000</pubDate>"));
        assert!(xml.ends_with("</channel></rss>"));
    }

    #[test]
    fn test_load_entries() {
        let json = r#"[
            {"id": "hello-world", "data": {"title": "Hello", "pubDate": "2024-07-01"}},
            {"id": "draft", "data": {"title": "Draft", "description": "wip"}}
        ]"#;
        let entries = load_entries(json).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].data.pub_date, NaiveDate::from_ymd_opt(2024, 7, 1));
        assert_eq!(entries[1].data.description, "wip");
        assert!(load_entries("{not json").is_err());
    }

    #[test]
    fn test_load_entries_coerces_frontmatter_dates() {
        let json = r#"[
            {"id": "first", "data": {"title": "First", "pubDate": "Jul 08 2022"}},
            {"id": "second", "data": {"title": "Second", "pubDate": "July 15, 2022", "updatedDate": "2022-07-20T23:30:00-05:00"}},
            {"id": "third", "data": {"title": "Third", "pubDate": "Fri, 22 Jul 2022 10:00:00 +0000"}},
            {"id": "fourth", "data": {"title": "Fourth", "pubDate": null}}
        ]"#;
        let entries = load_entries(json).unwrap();

        assert_eq!(entries[0].data.pub_date, NaiveDate::from_ymd_opt(2022, 7, 8));
        assert_eq!(entries[1].data.pub_date, NaiveDate::from_ymd_opt(2022, 7, 15));
        assert_eq!(entries[1].data.updated_date, NaiveDate::from_ymd_opt(2022, 7, 21));
        assert_eq!(entries[2].data.pub_date, NaiveDate::from_ymd_opt(2022, 7, 22));
        assert_eq!(entries[3].data.pub_date, None);
    }

    #[test]
    fn test_unrecognised_date_is_rejected() {
        assert_eq!(parse_post_date("2022-07-08T10:00:00"), NaiveDate::from_ymd_opt(2022, 7, 8));
        assert_eq!(parse_post_date("someday"), None);

        let json = r#"[{"id": "x", "data": {"title": "X", "pubDate": "someday"}}]"#;
        let err = load_entries(json).unwrap_err();
        assert!(err.to_string().contains("unrecognised date: someday"));
    }
}
