//! # Dataset Metadata Extraction
//!
//! Builds a `{title, description, keywords, url}` record for a dataset link
//! from the page that links to it. The page is walked once, skipping chrome
//! such as navigation and footers, and any linked RSS/Atom feeds fill fields
//! the page left empty.
//!
//! Extraction is split in two so that the parsed document never lives across
//! an await point: [`scan_page`] is synchronous and returns plain data, and
//! [`PageMetadata::apply_feeds`] does the network work afterwards.

use std::time::Duration;

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use scraper::node::Element;
use scraper::{ElementRef, Html, Node};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::crawler::classify::is_boilerplate;

/// Sectioning tags skipped by name, on top of the boilerplate markers
const CHROME_TAGS: &[&str] = &["nav", "header", "footer", "aside"];

/// Elements whose direct text counts as visible description text
const TEXT_ELEMENTS: &[&str] = &["p", "h1", "h2", "h3", "h4", "li"];

const HEADING_ELEMENTS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Metadata describing a downloadable dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    /// The dataset link this record describes
    pub url: String,
}

impl DatasetMetadata {
    /// JSON form used as the dataset's embedding text
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Page-level metadata shared by every dataset link on the page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMetadata {
    title: String,
    description: String,
    visible_text: String,
    keywords: Vec<String>,
    feeds: Vec<String>,
}

impl PageMetadata {
    /// Feed hrefs declared by `<link type="...xml...">`, unresolved
    pub fn feeds(&self) -> &[String] {
        &self.feeds
    }

    fn set_title(&mut self, candidate: &str) {
        if self.title.is_empty() {
            self.title = normalize(candidate);
        }
    }

    fn set_description(&mut self, candidate: &str) {
        if self.description.is_empty() {
            self.description = normalize(candidate);
        }
    }

    fn set_keywords<'a>(&mut self, candidates: impl IntoIterator<Item = &'a str>) {
        if !self.keywords.is_empty() {
            return;
        }
        self.keywords = candidates
            .into_iter()
            .flat_map(|value| value.split(','))
            .map(normalize)
            .filter(|keyword| !keyword.is_empty())
            .collect();
    }

    fn push_visible_text(&mut self, text: &str) {
        let text = normalize(text);
        if text.is_empty() {
            return;
        }
        if !self.visible_text.is_empty() {
            self.visible_text.push(' ');
        }
        self.visible_text.push_str(&text);
    }

    /// Fill empty fields from the page's linked feeds
    ///
    /// Each feed is resolved against `page_url` and fetched with `timeout`.
    /// Unreachable or unparsable feeds are skipped.
    pub async fn apply_feeds(&mut self, client: &reqwest::Client, page_url: &Url, timeout: Duration) {
        for href in self.feeds.clone() {
            if !self.title.is_empty() && !self.description.is_empty() {
                break;
            }
            let Ok(feed_url) = page_url.join(&href) else {
                continue;
            };
            match fetch_feed(client, &feed_url, timeout).await {
                Ok(body) => {
                    let summary = parse_feed(&body);
                    if let Some(title) = summary.title {
                        self.set_title(&title);
                    }
                    if let Some(description) = summary.description {
                        self.set_description(&description);
                    }
                }
                Err(e) => debug!("Skipping feed {}: {}", feed_url, e),
            }
        }
    }

    /// The record for one dataset link on this page
    ///
    /// Visible page text is the description only when no explicit
    /// description was found.
    pub fn for_link(&self, link: &str) -> DatasetMetadata {
        let description = if self.description.is_empty() {
            self.visible_text.clone()
        } else {
            self.description.clone()
        };
        DatasetMetadata {
            title: self.title.clone(),
            description,
            keywords: self.keywords.clone(),
            url: link.to_string(),
        }
    }
}

/// Extract the metadata record for `link` from a page
///
/// Convenience over [`scan_page`], [`PageMetadata::apply_feeds`] and
/// [`PageMetadata::for_link`].
pub async fn extract_metadata(
    client: &reqwest::Client,
    html: &str,
    page_url: &Url,
    link: &str,
    feed_timeout: Duration,
) -> DatasetMetadata {
    let mut page = scan_page(html);
    page.apply_feeds(client, page_url, feed_timeout).await;
    page.for_link(link)
}

/// Walk a page and collect its metadata, skipping chrome subtrees
pub fn scan_page(html: &str) -> PageMetadata {
    let document = Html::parse_document(html);
    scan_document(&document)
}

pub(crate) fn scan_document(document: &Html) -> PageMetadata {
    let mut page = PageMetadata::default();
    let root = document.root_element();
    if !is_chrome(root.value()) {
        visit(root, is_chrome, &mut page);
    }
    page
}

/// Chrome for metadata purposes: a sectioning tag or a boilerplate marker
fn is_chrome(element: &Element) -> bool {
    CHROME_TAGS.contains(&element.name()) || is_boilerplate(element)
}

fn visit(element: ElementRef<'_>, skip: fn(&Element) -> bool, page: &mut PageMetadata) {
    let name = element.value().name();
    let collects_text = TEXT_ELEMENTS.contains(&name);

    match name {
        "title" => page.set_title(&element.text().collect::<String>()),
        "meta" => read_meta(element.value(), page),
        "link" => read_link(element.value(), page),
        "script" => {
            if is_json_ld(element.value()) {
                read_json_ld(&element.text().collect::<String>(), page);
            }
            return;
        }
        _ if HEADING_ELEMENTS.contains(&name) => {
            page.set_title(&element.text().collect::<String>());
        }
        _ => {}
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) if collects_text => page.push_visible_text(text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    if !skip(child.value()) {
                        visit(child, skip, page);
                    }
                }
            }
            _ => {}
        }
    }
}

fn read_meta(element: &Element, page: &mut PageMetadata) {
    let key = element
        .attr("name")
        .or_else(|| element.attr("property"))
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let content = element.attr("content").unwrap_or_default();
    if content.trim().is_empty() {
        return;
    }

    match key.as_str() {
        "description" | "og:description" => page.set_description(content),
        "keywords" => page.set_keywords([content]),
        "og:title" | "headline" => page.set_title(content),
        _ => {}
    }
}

fn read_link(element: &Element, page: &mut PageMetadata) {
    let is_xml = element
        .attr("type")
        .is_some_and(|kind| kind.to_ascii_lowercase().contains("xml"));
    if let (true, Some(href)) = (is_xml, element.attr("href")) {
        page.feeds.push(href.to_string());
    }
}

fn is_json_ld(element: &Element) -> bool {
    element
        .attr("type")
        .is_some_and(|kind| kind.to_ascii_lowercase().contains("ld+json"))
}

/// Read one JSON-LD block; malformed blocks are ignored
fn read_json_ld(source: &str, page: &mut PageMetadata) {
    let Ok(value) = serde_json::from_str::<Value>(source) else {
        debug!("Ignoring malformed JSON-LD block");
        return;
    };

    let objects: Vec<&Value> = match &value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => match map.get("@graph") {
            Some(Value::Array(items)) => items.iter().collect(),
            _ => vec![&value],
        },
        _ => Vec::new(),
    };

    for object in objects {
        if let Some(description) = object.get("description").and_then(Value::as_str) {
            page.set_description(description);
        }
        for key in ["name", "headline"] {
            if let Some(title) = object.get(key).and_then(Value::as_str) {
                page.set_title(title);
            }
        }
        match object.get("keywords") {
            Some(Value::String(keywords)) => page.set_keywords([keywords.as_str()]),
            Some(Value::Array(items)) => page.set_keywords(items.iter().filter_map(Value::as_str)),
            _ => {}
        }
    }
}

async fn fetch_feed(
    client: &reqwest::Client,
    url: &Url,
    timeout: Duration,
) -> reqwest::Result<String> {
    client
        .get(url.clone())
        .timeout(timeout)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

/// First title and description found in an RSS or Atom document
#[derive(Debug, Default, PartialEq, Eq)]
struct FeedSummary {
    title: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedField {
    Title,
    Description,
}

fn parse_feed(xml: &str) -> FeedSummary {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut summary = FeedSummary::default();
    let mut field = None;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                field = match start.local_name().as_ref() {
                    b"title" => Some(FeedField::Title),
                    b"description" | b"subtitle" => Some(FeedField::Description),
                    _ => None,
                };
                text.clear();
            }
            Ok(Event::Text(content)) if field.is_some() => {
                if let Ok(unescaped) = content.unescape() {
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::CData(content)) if field.is_some() => {
                text.push_str(&String::from_utf8_lossy(&content.into_inner()));
            }
            Ok(Event::End(_)) => {
                let slot = match field.take() {
                    Some(FeedField::Title) => &mut summary.title,
                    Some(FeedField::Description) => &mut summary.description,
                    None => continue,
                };
                let value = normalize(&text);
                if slot.is_none() && !value.is_empty() {
                    *slot = Some(value);
                }
                if summary.title.is_some() && summary.description.is_some() {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                debug!("Stopping feed parse: {}", e);
                break;
            }
            _ => {}
        }
    }
    summary
}

/// Collapse runs of whitespace and trim
fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
