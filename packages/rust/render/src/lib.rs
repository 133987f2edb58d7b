//! Standalone HTML page for the document store.
//!
//! The page is self-contained (inline stylesheet, no scripts). Articles are
//! shown newest first with their summary, full text and questions.

use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime};
use html_escape::encode_text;
use tracing::debug;

use newsdigest_shared::{DigestError, ProcessedArticle, Result};

/// Date layouts recognized in the `date` field, tried in order.
const DATE_INPUT_FORMATS: [&str; 3] = ["%Y-%m-%d", "%y/%m/%d", "%Y/%m/%d"];

/// Display layout for article dates.
const DATE_DISPLAY_FORMAT: &str = "%B %d, %Y";

const STYLES: &str = r#"
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
           line-height: 1.6; color: #333; max-width: 1200px; margin: 0 auto;
           padding: 20px; background-color: #f8f9fa; }
    .header { text-align: center; margin-bottom: 40px; padding: 20px; color: white;
              background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); border-radius: 10px; }
    .header h1 { margin: 0; font-size: 2.5em; font-weight: 300; }
    .article-count { background: rgba(255, 255, 255, 0.2); padding: 8px 16px;
                     border-radius: 20px; display: inline-block; margin-top: 10px; }
    .article { background: white; margin: 30px 0; border-radius: 12px; overflow: hidden;
               box-shadow: 0 4px 12px rgba(0, 0, 0, 0.1); }
    .article-header { color: white; padding: 25px;
                      background: linear-gradient(135deg, #4facfe 0%, #00f2fe 100%); }
    .article-date { font-size: 0.9em; opacity: 0.9; margin-bottom: 8px; }
    .article-title { font-size: 1.4em; margin: 0; line-height: 1.3; }
    .article-content { padding: 25px; }
    .section { margin-bottom: 25px; }
    .section-title { font-size: 1.1em; color: #2c3e50; border-bottom: 2px solid #e9ecef;
                     padding-bottom: 8px; }
    .summary { background: #f8f9fa; padding: 20px; border-radius: 8px;
               border-left: 4px solid #4facfe; font-style: italic; }
    .source-content { padding: 20px; border: 1px solid #e9ecef; border-radius: 8px;
                      max-height: 400px; overflow-y: auto; font-size: 0.95em; }
    .questions li { background: #f8f9fa; margin: 12px 0; padding: 15px 20px;
                    border-left: 4px solid #28a745; border-radius: 8px; }
    .footer { text-align: center; margin-top: 50px; padding: 30px; background: #2c3e50;
              color: white; border-radius: 10px; }
    @media (max-width: 768px) { body { padding: 10px; } .source-content { max-height: 300px; } }
"#;

/// Rendering options.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Page title and heading.
    pub title: String,
    /// Keep only the N most recent articles. `None` or `Some(0)` keeps all.
    pub limit: Option<usize>,
    /// Shown in the footer.
    pub generated_at: NaiveDateTime,
}

/// Articles in display order: `date` descending (string order, stable),
/// truncated to the limit.
pub fn select_articles<'a>(
    articles: &'a [ProcessedArticle],
    limit: Option<usize>,
) -> Vec<&'a ProcessedArticle> {
    let mut selected: Vec<&ProcessedArticle> = articles.iter().collect();
    selected.sort_by(|a, b| b.date.cmp(&a.date));
    if let Some(limit) = limit.filter(|&n| n > 0) {
        selected.truncate(limit);
    }
    selected
}

/// Format a stored date for display, or return it unchanged when it matches
/// none of the known layouts.
pub fn display_date(raw: &str) -> String {
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(|date| date.format(DATE_DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Render the page.
pub fn render_html(articles: &[ProcessedArticle], options: &RenderOptions) -> Result<String> {
    let selected = select_articles(articles, options.limit);
    debug!(total = articles.len(), shown = selected.len(), "rendering articles");

    let mut html = String::with_capacity(4096 + selected.len() * 2048);
    write_page(&mut html, &selected, options)
        .map_err(|e| DigestError::Render(format!("failed to build page: {e}")))?;
    Ok(html)
}

fn write_page(
    out: &mut String,
    articles: &[&ProcessedArticle],
    options: &RenderOptions,
) -> std::fmt::Result {
    let title = encode_text(&options.title);
    let count = articles.len();

    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "    <meta charset=\"UTF-8\">")?;
    writeln!(
        out,
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
    )?;
    writeln!(out, "    <title>{title}</title>")?;
    writeln!(out, "    <style>{STYLES}    </style>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "    <div class=\"header\">")?;
    writeln!(out, "        <h1>{title}</h1>")?;
    writeln!(
        out,
        "        <div class=\"article-count\">{count} {}</div>",
        plural(count)
    )?;
    writeln!(out, "    </div>")?;

    for article in articles {
        write_article(out, article)?;
    }

    writeln!(out, "    <div class=\"footer\">")?;
    writeln!(
        out,
        "        <p>Generated on {}.</p>",
        options.generated_at.format("%B %d, %Y %H:%M")
    )?;
    writeln!(
        out,
        "        <p>This page contains {count} {}.</p>",
        plural(count)
    )?;
    writeln!(out, "    </div>")?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

fn write_article(out: &mut String, article: &ProcessedArticle) -> std::fmt::Result {
    let date = encode_text(&display_date(&article.date)).into_owned();
    let source = encode_text(&article.source).replace('\n', "<br>");

    writeln!(out, "    <article class=\"article\">")?;
    writeln!(out, "        <div class=\"article-header\">")?;
    writeln!(out, "            <div class=\"article-date\">{date}</div>")?;
    writeln!(
        out,
        "            <h2 class=\"article-title\">{}</h2>",
        encode_text(&article.topic)
    )?;
    writeln!(out, "        </div>")?;
    writeln!(out, "        <div class=\"article-content\">")?;

    writeln!(out, "            <div class=\"section\">")?;
    writeln!(out, "                <h3 class=\"section-title\">Summary</h3>")?;
    writeln!(
        out,
        "                <div class=\"summary\">{}</div>",
        encode_text(&article.summary)
    )?;
    writeln!(out, "            </div>")?;

    writeln!(out, "            <div class=\"section\">")?;
    writeln!(out, "                <h3 class=\"section-title\">Full Text</h3>")?;
    writeln!(out, "                <div class=\"source-content\">{source}</div>")?;
    writeln!(out, "            </div>")?;

    writeln!(out, "            <div class=\"section\">")?;
    writeln!(out, "                <h3 class=\"section-title\">Questions</h3>")?;
    writeln!(out, "                <ol class=\"questions\">")?;
    for question in &article.questions {
        writeln!(out, "                    <li>{}</li>", encode_text(question))?;
    }
    writeln!(out, "                </ol>")?;
    writeln!(out, "            </div>")?;

    writeln!(out, "        </div>")?;
    writeln!(out, "    </article>")
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "article" } else { "articles" }
}
