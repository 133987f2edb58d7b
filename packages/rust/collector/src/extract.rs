//! Main-text extraction from article HTML.
//!
//! Candidates are tried in order: `<article>`, `<main>`, the first `<div>`
//! carrying one of [`CONTENT_CLASSES`] (checked class by class), then
//! `<body>` with page chrome removed. Text nodes are trimmed, empties
//! dropped, and the rest joined with newlines.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

/// Div classes that commonly wrap article bodies, in priority order.
pub const CONTENT_CLASSES: [&str; 5] = [
    "post-content",
    "article-content",
    "entry-content",
    "post-body",
    "article-body",
];

/// Never part of readable text.
const ALWAYS_SKIP: [&str; 3] = ["script", "style", "noscript"];

/// Page chrome dropped when falling back to the whole body.
const BODY_SKIP: [&str; 6] = ["nav", "footer", "header", "script", "style", "noscript"];

static ARTICLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article").expect("valid selector"));
static MAIN: LazyLock<Selector> = LazyLock::new(|| Selector::parse("main").expect("valid selector"));
static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").expect("valid selector"));
static CONTENT_DIVS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    CONTENT_CLASSES
        .iter()
        .map(|class| Selector::parse(&format!("div.{class}")).expect("valid selector"))
        .collect()
});

/// Extract the readable main text of an HTML page. Returns an empty string
/// when nothing readable is found.
pub fn extract_main_text(html: &str) -> String {
    let doc = Html::parse_document(html);

    let candidate = doc
        .select(&ARTICLE)
        .next()
        .or_else(|| doc.select(&MAIN).next())
        .or_else(|| {
            CONTENT_DIVS
                .iter()
                .find_map(|selector| doc.select(selector).next())
        });

    match candidate {
        Some(el) => collect_text(el, &ALWAYS_SKIP),
        None => doc
            .select(&BODY)
            .next()
            .map(|body| collect_text(body, &BODY_SKIP))
            .unwrap_or_default(),
    }
}

fn collect_text(root: ElementRef<'_>, skip: &[&str]) -> String {
    let mut lines: Vec<&str> = Vec::new();

    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != root.id())
            .any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| skip.contains(&el.name()))
            });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed);
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_article_element() {
        let html = r#"<html><body>
            <nav>Home | About</nav>
            <main><p>Main wrapper text.</p>
              <article>
                <h1>Headline</h1>
                <p>First   paragraph. </p>
                <p>  </p>
                <script>var tracking = 1;</script>
                <p>Second paragraph.</p>
              </article>
            </main>
        </body></html>"#;

        assert_eq!(
            extract_main_text(html),
            "Headline\nFirst   paragraph.\nSecond paragraph."
        );
    }

    #[test]
    fn falls_back_to_main() {
        let html = "<html><body><header>Site</header><main><p>Inside main.</p></main></body></html>";
        assert_eq!(extract_main_text(html), "Inside main.");
    }

    #[test]
    fn content_classes_checked_in_priority_order() {
        let html = r#"<html><body>
            <div class="entry-content wide"><p>Entry content.</p></div>
            <div class="article-content"><p>Article content.</p></div>
        </body></html>"#;
        assert_eq!(extract_main_text(html), "Article content.");
    }

    #[test]
    fn body_fallback_drops_page_chrome() {
        let html = r#"<html><head><title>T</title></head><body>
            <header>Logo</header>
            <nav><a href="/">Home</a></nav>
            <div><p>Plain body text.</p><style>p { color: red }</style></div>
            <footer>Copyright</footer>
        </body></html>"#;
        assert_eq!(extract_main_text(html), "Plain body text.");
    }

    #[test]
    fn empty_page_yields_empty_text() {
        assert_eq!(extract_main_text(""), "");
        assert_eq!(extract_main_text("<html><body>  </body></html>"), "");
    }
}
