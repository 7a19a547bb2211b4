//! HTML to visible text, and bibliographic metadata from `<head>`.

use scraper::{Html, Selector};

/// Elements whose text is never part of the article body.
const SKIPPED_ELEMENTS: &[&str] = &[
    "head", "script", "style", "noscript", "nav", "header", "footer", "aside", "iframe",
    "template", "svg",
];

const AUTHOR_META: &[&str] = &["author", "article:author", "dc.creator", "citation_author"];
const DATE_META: &[&str] = &[
    "article:published_time",
    "citation_publication_date",
    "dc.date",
    "date",
];

/// Visible body text with boilerplate removed and whitespace collapsed.
pub fn clean_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut words: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|e| SKIPPED_ELEMENTS.contains(&e.name()))
        });
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }

    words.join(" ")
}

/// Bibliographic fields found in a page's markup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub published: Option<String>,
}

pub fn page_metadata(html: &str) -> PageMetadata {
    let document = Html::parse_document(html);
    PageMetadata {
        title: extract_title(&document),
        author: AUTHOR_META.iter().find_map(|name| meta_content(&document, name)),
        published: DATE_META.iter().find_map(|name| meta_content(&document, name)),
    }
}

fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| meta_content(document, "og:title"))
}

/// `content` of the first `<meta name=..>` or `<meta property=..>` tag.
fn meta_content(document: &Html, name: &str) -> Option<String> {
    ["name", "property"].iter().find_map(|attr| {
        let selector = Selector::parse(&format!("meta[{}=\"{}\"]", attr, name)).ok()?;
        document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html>
        <head>
            <title>Albert Einstein | Archive</title>
            <meta name="author" content="Walter Isaacson">
            <meta property="article:published_time" content="2007-04-10">
            <script>var tracking = "einstein";</script>
        </head>
        <body>
            <nav>Home | About | Search</nav>
            <main><h1>Albert Einstein</h1><p>Born   in Ulm,
            1879.</p></main>
            <footer>Copyright</footer>
        </body>
    </html>"#;

    #[test]
    fn test_clean_text_strips_boilerplate() {
        assert_eq!(clean_text(PAGE), "Albert Einstein Born in Ulm, 1879.");
    }

    #[test]
    fn test_empty_page() {
        assert_eq!(clean_text("<html><body></body></html>"), "");
    }

    #[test]
    fn test_page_metadata() {
        let meta = page_metadata(PAGE);
        assert_eq!(meta.title.as_deref(), Some("Albert Einstein | Archive"));
        assert_eq!(meta.author.as_deref(), Some("Walter Isaacson"));
        assert_eq!(meta.published.as_deref(), Some("2007-04-10"));
    }

    #[test]
    fn test_page_metadata_missing() {
        assert_eq!(page_metadata("<p>plain</p>"), PageMetadata::default());
    }
}
