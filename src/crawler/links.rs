//! Anchor discovery on fetched pages

use std::collections::HashSet;

use scraper::node::Element;
use scraper::{ElementRef, Html, Node};
use url::Url;

/// Href prefixes that never lead to a crawlable resource
const SKIPPED_PREFIXES: &[&str] = &["mailto:", "tel:", "javascript:"];

/// Collect the absolute targets of every anchor outside skipped subtrees
///
/// Hrefs are resolved against `base` (the page's final URL) and stripped of
/// their fragment. Each target is returned once, in document order.
pub fn discover_links(document: &Html, base: &Url, skip: fn(&Element) -> bool) -> Vec<Url> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();
    let root = document.root_element();
    if !skip(root.value()) {
        walk(root, base, skip, &mut seen, &mut links);
    }
    links
}

fn walk(
    element: ElementRef<'_>,
    base: &Url,
    skip: fn(&Element) -> bool,
    seen: &mut HashSet<String>,
    links: &mut Vec<Url>,
) {
    if element.value().name() == "a" {
        if let Some(link) = element.value().attr("href").and_then(|href| resolve(base, href)) {
            if seen.insert(link.as_str().to_string()) {
                links.push(link);
            }
        }
    }

    for child in element.children() {
        if let Node::Element(el) = child.value() {
            if skip(el) {
                continue;
            }
            if let Some(child) = ElementRef::wrap(child) {
                walk(child, base, skip, seen, links);
            }
        }
    }
}

/// Resolve an href, dropping targets that cannot be fetched over HTTP
fn resolve(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let lowered = href.to_ascii_lowercase();
    if SKIPPED_PREFIXES.iter().any(|prefix| lowered.starts_with(prefix)) {
        return None;
    }

    let mut link = base.join(href).ok()?;
    if !matches!(link.scheme(), "http" | "https") {
        return None;
    }
    link.set_fragment(None);
    Some(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::is_boilerplate;

    fn links(html: &str, base: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let base = Url::parse(base).unwrap();
        discover_links(&document, &base, is_boilerplate)
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_resolves_relative_links() {
        let found = links(
            r#"<body>
                 <a href="data/roads.zip#top">roads</a>
                 <a href="/catalog?page=2">next</a>
                 <a href="https://other.example/x">other</a>
               </body>"#,
            "https://portal.example/gis/index.html",
        );
        assert_eq!(
            found,
            vec![
                "https://portal.example/gis/data/roads.zip",
                "https://portal.example/catalog?page=2",
                "https://other.example/x",
            ]
        );
    }

    #[test]
    fn test_skips_non_http_targets() {
        let found = links(
            r##"<body>
                 <a href="mailto:gis@example.gov">mail</a>
                 <a href="tel:+15555550100">call</a>
                 <a href="JavaScript:void(0)">js</a>
                 <a href="#section">anchor</a>
                 <a href="ftp://files.example/a.zip">ftp</a>
                 <a>no href</a>
                 <a href="page.html">page</a>
               </body>"##,
            "https://portal.example/",
        );
        assert_eq!(found, vec!["https://portal.example/page.html"]);
    }

    #[test]
    fn test_skips_boilerplate_subtrees() {
        let found = links(
            r#"<body>
                 <div class="site-header"><a href="/home">home</a></div>
                 <div id="content">
                   <ul role="navigation"><li><a href="/about">about</a></li></ul>
                   <a class="nav-link" href="/nav">nav</a>
                   <div><a href="/data/a.csv">csv</a></div>
                 </div>
                 <div class="usa-footer"><a href="/privacy">privacy</a></div>
               </body>"#,
            "https://portal.example/",
        );
        assert_eq!(found, vec!["https://portal.example/data/a.csv"]);
    }

    #[test]
    fn test_deduplicates_targets() {
        let found = links(
            r#"<body><a href="/a">1</a><a href="/a#x">2</a><a href="a">3</a></body>"#,
            "https://portal.example/",
        );
        assert_eq!(found, vec!["https://portal.example/a"]);
    }
}
