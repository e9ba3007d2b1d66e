//! arXiv Atom feed parsing.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::ClientResult;
use crate::models::{Paper, clean_text, strip_arxiv_version};

use super::arxiv::arxiv_id_from_url;

/// Entry fields collected while walking the feed.
#[derive(Default)]
struct EntryBuilder {
    id_url: String,
    title: String,
    summary: String,
    published: String,
    authors: Vec<String>,
    alternate: Option<String>,
}

impl EntryBuilder {
    /// arXiv reports query errors as an entry whose id points at `/api/errors`.
    fn is_error_entry(&self) -> bool {
        self.id_url.contains("/api/errors")
    }

    fn build(self) -> Paper {
        let id = arxiv_id_from_url(&self.id_url)
            .map(|id| strip_arxiv_version(&id).to_string())
            .unwrap_or_else(|| self.id_url.clone());

        Paper {
            id,
            title: self.title,
            authors: self.authors.join(", "),
            summary: self.summary,
            published: self.published,
            link: self.alternate.unwrap_or(self.id_url),
            citation_id: None,
        }
        .cleaned()
    }
}

/// Parse an arXiv Atom response into papers, skipping error entries.
pub fn parse_atom_feed(xml: &str) -> ClientResult<Vec<Paper>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut papers = Vec::new();
    let mut entry: Option<EntryBuilder> = None;
    let mut in_author = false;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(e) => {
                text.clear();
                match e.local_name().as_ref() {
                    b"entry" => entry = Some(EntryBuilder::default()),
                    b"author" => in_author = true,
                    b"link" => {
                        if let Some(cur) = entry.as_mut() {
                            read_link(&e, cur)?;
                        }
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"link" {
                    if let Some(cur) = entry.as_mut() {
                        read_link(&e, cur)?;
                    }
                }
            }
            Event::Text(t) => {
                text.push_str(&t.unescape().map_err(quick_xml::Error::from)?);
            }
            Event::CData(t) => {
                text.push_str(&String::from_utf8_lossy(&t.into_inner()));
            }
            Event::End(e) => {
                let name = e.local_name();
                let Some(cur) = entry.as_mut() else {
                    text.clear();
                    continue;
                };
                let value = std::mem::take(&mut text);

                match name.as_ref() {
                    b"id" => cur.id_url = value.trim().to_string(),
                    b"title" => cur.title = value,
                    b"summary" => cur.summary = value,
                    b"published" => cur.published = value.trim().to_string(),
                    b"name" if in_author => {
                        let name = clean_text(&value);
                        if !name.is_empty() {
                            cur.authors.push(name);
                        }
                    }
                    b"author" => in_author = false,
                    b"entry" => {
                        if let Some(done) = entry.take() {
                            if done.is_error_entry() {
                                tracing::warn!(message = %done.summary.trim(), "arXiv returned an error entry");
                            } else {
                                papers.push(done.build());
                            }
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    Ok(papers)
}

/// Keep the `rel="alternate"` link as the paper's canonical URL.
fn read_link(e: &BytesStart<'_>, cur: &mut EntryBuilder) -> ClientResult<()> {
    let mut rel = None;
    let mut href = None;

    for attr in e.attributes().flatten() {
        let value = attr.unescape_value().map_err(quick_xml::Error::from)?.into_owned();
        match attr.key.local_name().as_ref() {
            b"rel" => rel = Some(value),
            b"href" => href = Some(value),
            _ => {}
        }
    }

    if rel.as_deref().is_none_or(|r| r == "alternate") {
        if let Some(href) = href {
            cur.alternate.get_or_insert(href);
        }
    }
    Ok(())
}
