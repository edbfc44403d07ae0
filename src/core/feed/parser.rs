use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::types::FeedPost;

/// Upper bound on posts extracted from a single payload.
pub const MAX_POSTS: usize = 5;

const RENDER_WIDTH: usize = 10_000;

#[derive(Debug, thiserror::Error)]
pub enum FeedParseError {
    #[error("xml feed parse error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("xml attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("markup extraction failed: {0}")]
    Markup(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
}

/// Text being collected for an open `<title>` or `<link>` element.
#[derive(Debug)]
struct Capture {
    field: Field,
    depth: usize,
    text: String,
    has_markup: bool,
    href: Option<String>,
}

impl Capture {
    fn new(field: Field, href: Option<String>) -> Self {
        Self {
            field,
            depth: 1,
            text: String::new(),
            has_markup: false,
            href,
        }
    }

    fn push(&mut self, text: &str, has_markup: bool) {
        self.has_markup |= has_markup || text.contains('<');
        self.text.push_str(text);
    }

    fn finish(self) -> Result<String, FeedParseError> {
        let text = clean_text(&self.text, self.has_markup)?;
        if text.is_empty() && self.field == Field::Link {
            return Ok(self.href.unwrap_or_default());
        }
        Ok(text)
    }
}

/// Extracts up to [`MAX_POSTS`] title/link pairs from `raw`, in document order.
///
/// A `<title>` only produces a post when the next thing after it, ignoring
/// whitespace, is a `<link>`. Parse failures are logged and the posts found
/// before the failure are returned.
pub fn parse_posts(feed_name: &str, raw: &str) -> Vec<FeedPost> {
    let mut posts = Vec::new();
    if let Err(error) = collect_posts(feed_name, raw, &mut posts) {
        tracing::warn!(
            feed = %feed_name,
            error = %error,
            collected = posts.len(),
            "failed to parse feed posts"
        );
    }
    posts
}

fn collect_posts(
    feed_name: &str,
    raw: &str,
    posts: &mut Vec<FeedPost>,
) -> Result<(), FeedParseError> {
    let mut reader = Reader::from_str(raw);
    reader.config_mut().check_end_names = false;

    let mut pending_title: Option<String> = None;
    let mut capture: Option<Capture> = None;

    while posts.len() < MAX_POSTS {
        match reader.read_event()? {
            Event::Start(element) => {
                if let Some(open) = capture.as_mut() {
                    open.depth += 1;
                    continue;
                }
                match element.local_name().as_ref() {
                    b"title" => {
                        pending_title = None;
                        capture = Some(Capture::new(Field::Title, None));
                    }
                    b"link" if pending_title.is_some() => {
                        capture = Some(Capture::new(Field::Link, href_of(&element)?));
                    }
                    _ => pending_title = None,
                }
            }
            Event::Empty(element) => {
                if capture.is_some() {
                    continue;
                }
                match element.local_name().as_ref() {
                    b"link" => {
                        if let Some(title) = pending_title.take() {
                            let link = Capture::new(Field::Link, href_of(&element)?).finish()?;
                            posts.push(FeedPost::new(feed_name, title, link));
                        }
                    }
                    _ => pending_title = None,
                }
            }
            Event::End(_) => {
                let Some(open) = capture.as_mut() else {
                    continue;
                };
                open.depth -= 1;
                if open.depth > 0 {
                    continue;
                }
                if let Some(done) = capture.take() {
                    match done.field {
                        Field::Title => pending_title = Some(done.finish()?),
                        Field::Link => {
                            let link = done.finish()?;
                            if let Some(title) = pending_title.take() {
                                posts.push(FeedPost::new(feed_name, title, link));
                            }
                        }
                    }
                }
            }
            Event::Text(text) => {
                if let Some(open) = capture.as_mut() {
                    // Entities XML does not define (`&nbsp;`) are left for the HTML pass.
                    match text.unescape() {
                        Ok(unescaped) => open.push(&unescaped, false),
                        Err(_) => open.push(&String::from_utf8_lossy(&text), true),
                    }
                } else if !text.iter().all(u8::is_ascii_whitespace) {
                    pending_title = None;
                }
            }
            Event::CData(data) => {
                if let Some(open) = capture.as_mut() {
                    open.push(&String::from_utf8_lossy(&data), false);
                } else if !data.iter().all(u8::is_ascii_whitespace) {
                    pending_title = None;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(())
}

fn href_of(element: &BytesStart<'_>) -> Result<Option<String>, FeedParseError> {
    match element.try_get_attribute("href")? {
        Some(attribute) => Ok(Some(attribute.unescape_value()?.trim().to_string())),
        None => Ok(None),
    }
}

/// Strips embedded HTML when `has_markup` is set, then collapses whitespace runs.
pub fn clean_text(text: &str, has_markup: bool) -> Result<String, FeedParseError> {
    let stripped = if has_markup {
        html2text::config::with_decorator(html2text::render::text_renderer::TrivialDecorator::new())
            .string_from_read(text.as_bytes(), RENDER_WIDTH)
            .map_err(|error| FeedParseError::Markup(error.to_string()))?
    } else {
        text.to_string()
    };
    Ok(stripped.split_whitespace().collect::<Vec<_>>().join(" "))
}
