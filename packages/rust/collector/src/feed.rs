//! RSS 2.0, RSS 1.0 (RDF) and Atom feed parsing.

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;

use newsdigest_shared::{DigestError, Result};

/// One feed entry: headline and article link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
}

// RSS 2.0: <rss><channel><item>...
#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

// RSS 1.0 keeps items beside the channel element.
#[derive(Debug, Deserialize)]
struct Rdf {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<AtomText>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
}

#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

impl AtomEntry {
    /// The `alternate` link (or a link without `rel`), else the first one.
    fn link(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.rel.as_deref().is_none_or(|rel| rel == "alternate"))
            .or_else(|| self.links.first())
            .and_then(|l| l.href.as_deref())
    }
}

/// Parse a feed document into entries, in document order.
///
/// Entries without a link are dropped. Titles are trimmed and may be empty.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>> {
    let root = root_element(xml)?;
    let raw: Vec<(Option<String>, Option<String>)> = match root.as_str() {
        "rss" => {
            let rss: Rss = from_xml(xml, "RSS")?;
            rss.channel
                .items
                .into_iter()
                .map(|i| (i.title, i.link))
                .collect()
        }
        "RDF" => {
            let rdf: Rdf = from_xml(xml, "RDF")?;
            rdf.items.into_iter().map(|i| (i.title, i.link)).collect()
        }
        "feed" => {
            let atom: AtomFeed = from_xml(xml, "Atom")?;
            atom.entries
                .into_iter()
                .map(|e| {
                    let link = e.link().map(str::to_string);
                    (e.title.map(|t| t.value), link)
                })
                .collect()
        }
        other => {
            return Err(DigestError::parse(format!(
                "unsupported feed root element <{other}>"
            )));
        }
    };

    Ok(raw
        .into_iter()
        .filter_map(|(title, link)| {
            let link = link?.trim().to_string();
            if link.is_empty() {
                return None;
            }
            Some(FeedEntry {
                title: title.map(|t| t.trim().to_string()).unwrap_or_default(),
                link,
            })
        })
        .collect())
}

fn from_xml<T: for<'de> Deserialize<'de>>(xml: &str, kind: &str) -> Result<T> {
    quick_xml::de::from_str(xml)
        .map_err(|e| DigestError::parse(format!("invalid {kind} document: {e}")))
}

/// Local name of the first element in the document.
fn root_element(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Ok(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Eof) => return Err(DigestError::parse("feed document has no elements")),
            Err(e) => return Err(DigestError::parse(format!("invalid feed XML: {e}"))),
            Ok(_) => {}
        }
    }
}
