use scraper::{ElementRef, Html, Selector};

use crate::crawler::Profile;
use crate::error::{CrawlError, ExtractionError};
use crate::models::Record;

pub fn selector(css: &'static str) -> Result<Selector, CrawlError> {
    Selector::parse(css).map_err(|_| CrawlError::Selector(css))
}

/// Trimmed text content of an element and all its descendants.
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// How one named field is read from a listing container.
pub enum FieldRule {
    /// Text of every element matching the selector, concatenated.
    Text { css: &'static str, selector: Selector },
    /// Attribute of the first matching element.
    Attr {
        css: &'static str,
        selector: Selector,
        attr: &'static str,
    },
    /// The `index`-th element of a repeated group, optionally narrowed to
    /// an inner element.
    Nth {
        css: &'static str,
        group: Selector,
        index: usize,
        inner: Option<Selector>,
    },
    /// A constant the listing type implies.
    Fixed(&'static str),
}

impl FieldRule {
    pub fn text(css: &'static str) -> Result<Self, CrawlError> {
        Ok(FieldRule::Text {
            css,
            selector: selector(css)?,
        })
    }

    pub fn attr(css: &'static str, attr: &'static str) -> Result<Self, CrawlError> {
        Ok(FieldRule::Attr {
            css,
            selector: selector(css)?,
            attr,
        })
    }

    pub fn nth(css: &'static str, index: usize) -> Result<Self, CrawlError> {
        Ok(FieldRule::Nth {
            css,
            group: selector(css)?,
            index,
            inner: None,
        })
    }

    pub fn nth_within(
        css: &'static str,
        index: usize,
        inner: &'static str,
    ) -> Result<Self, CrawlError> {
        Ok(FieldRule::Nth {
            css,
            group: selector(css)?,
            index,
            inner: Some(selector(inner)?),
        })
    }

    /// The field's value, or `None` when the container lacks it.
    pub fn find(&self, scope: ElementRef<'_>) -> Option<String> {
        match self {
            FieldRule::Text { selector, .. } => {
                let mut matches = scope.select(selector).peekable();
                matches.peek()?;
                Some(
                    matches
                        .flat_map(|el| el.text())
                        .collect::<String>()
                        .trim()
                        .to_string(),
                )
            }
            FieldRule::Attr { selector, attr, .. } => scope
                .select(selector)
                .next()?
                .value()
                .attr(attr)
                .map(|v| v.trim().to_string()),
            FieldRule::Nth {
                group,
                index,
                inner,
                ..
            } => {
                let element = scope.select(group).nth(*index)?;
                Some(match inner {
                    Some(inner) => element
                        .select(inner)
                        .flat_map(|el| el.text())
                        .collect::<String>()
                        .trim()
                        .to_string(),
                    None => text_of(element),
                })
            }
            FieldRule::Fixed(value) => Some((*value).to_string()),
        }
    }

    /// The field's value, empty when absent.
    pub fn apply(&self, scope: ElementRef<'_>) -> String {
        self.find(scope).unwrap_or_default()
    }

    /// The field's value, or an error naming what was missing.
    pub fn require(&self, scope: ElementRef<'_>) -> Result<String, ExtractionError> {
        match self {
            FieldRule::Fixed(value) => Ok((*value).to_string()),
            FieldRule::Attr { css, attr, .. } => {
                self.find(scope).ok_or(ExtractionError::MissingAttribute {
                    selector: *css,
                    attr: *attr,
                })
            }
            FieldRule::Text { css, .. } | FieldRule::Nth { css, .. } => self
                .find(scope)
                .ok_or(ExtractionError::MissingElement(*css)),
        }
    }
}

/// Find the first `label` element whose text equals `label_text` and
/// return the text of the `dd` element immediately after it.
pub fn value_after_label(
    scope: ElementRef<'_>,
    label: &Selector,
    label_text: &str,
) -> Option<String> {
    scope
        .select(label)
        .find(|dt| text_of(*dt) == label_text)
        .and_then(|dt| dt.next_siblings().find_map(ElementRef::wrap))
        .filter(|dd| dd.value().name() == "dd")
        .map(text_of)
}

/// Extract every complete record on a listing page, in DOM order.
/// A container that fails or lacks required fields is skipped on its own.
pub fn extract_page<P: Profile>(profile: &P, html: &str) -> Vec<P::Record> {
    let document = Html::parse_document(html);
    let mut records = Vec::new();

    for (index, container) in document.select(profile.container()).enumerate() {
        match profile.extract(container) {
            Ok(record) if record.is_complete() => records.push(record),
            Ok(_) => {
                tracing::debug!(
                    "Skipping {} listing {index}: required fields missing",
                    profile.kind()
                );
            }
            Err(e) => {
                tracing::warn!("Skipping {} listing {index}: {e}", profile.kind());
            }
        }
    }

    records
}
