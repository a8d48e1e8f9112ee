//! HTML parsers for index and detail pages
//!
//! This module handles parsing HTML content to extract:
//! - Listing stubs (title + link) from index pages
//! - Attribute tables, title, price and publication date from detail pages

use crate::config::{MissingFieldPolicy, SelectorConfig};
use crate::listing::{DetailAttributes, ListingStub};
use crate::{ConfigError, HarvestError};
use regex_lite::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Record key for the detail page heading
pub const PAGE_TITLE_KEY: &str = "page_title";

/// Record key for the listing price
pub const PRICE_KEY: &str = "price";

/// Record key for the publication date
pub const PUBLICATION_DATE_KEY: &str = "publication_date";

/// Attributes extracted from one detail page
#[derive(Debug, Clone, Default)]
pub struct ParsedDetail {
    /// Attribute mapping in document order
    pub attributes: DetailAttributes,

    /// Whether the page had an attribute table at all
    pub table_found: bool,
}

/// Compiled selectors used by both parsers
#[derive(Debug, Clone)]
pub struct Selectors {
    index_heading: Selector,
    detail_table: Selector,
    page_title: Selector,
    price: Selector,
    publication_date: Selector,
    date_pattern: Regex,
    row: Selector,
    header_cell: Selector,
    data_cell: Selector,
    trim_whitespace: bool,
}

impl Selectors {
    /// Compiles the configured selectors
    ///
    /// # Returns
    ///
    /// * `Ok(Selectors)` - All selectors and the date pattern compiled
    /// * `Err(ConfigError)` - A selector or the date pattern is invalid
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        let date_pattern = Regex::new(&config.date_pattern)
            .map_err(|e| ConfigError::InvalidPattern(format!("{}: {}", config.date_pattern, e)))?;

        Ok(Self {
            index_heading: compile_selector("index-heading", &config.index_heading)?,
            detail_table: compile_selector("detail-table", &config.detail_table)?,
            page_title: compile_selector("page-title", &config.page_title)?,
            price: compile_selector("price", &config.price)?,
            publication_date: compile_selector("publication-date", &config.publication_date)?,
            date_pattern,
            row: compile_selector("row", "tr")?,
            header_cell: compile_selector("header-cell", "th")?,
            data_cell: compile_selector("data-cell", "td")?,
            trim_whitespace: false,
        })
    }

    /// Strips leading and trailing whitespace from every extracted text
    pub fn with_trim(mut self, trim_whitespace: bool) -> Self {
        self.trim_whitespace = trim_whitespace;
        self
    }
}

fn compile_selector(name: &str, css: &str) -> Result<Selector, ConfigError> {
    Selector::parse(css).map_err(|e| ConfigError::InvalidSelector {
        name: name.to_string(),
        message: format!("'{}': {:?}", css, e),
    })
}

/// Extracts listing stubs from one index page
///
/// Every element matched by the index heading selector (`a > h3` by default)
/// whose parent is an `<a>` element with an `href` yields one stub. Relative
/// links are resolved against `page_url`.
///
/// An empty result is not an error: it is how the paginator knows the index
/// has run out.
pub fn parse_index(html: &str, page_url: &Url, selectors: &Selectors) -> Vec<ListingStub> {
    let document = Html::parse_document(html);
    let mut stubs = Vec::new();

    for heading in document.select(&selectors.index_heading) {
        let Some(anchor) = heading
            .parent()
            .and_then(ElementRef::wrap)
            .filter(|parent| parent.value().name() == "a")
        else {
            continue;
        };

        let Some(href) = anchor.value().attr("href") else {
            tracing::warn!("Index entry without href on {}", page_url);
            continue;
        };

        stubs.push(ListingStub {
            title: element_text(&heading, selectors.trim_whitespace),
            link: resolve_link(href, page_url),
        });
    }

    stubs
}

/// Resolves an href against the page it was found on
///
/// Hrefs that cannot be joined are kept verbatim.
fn resolve_link(href: &str, page_url: &Url) -> String {
    let href = href.trim();
    match page_url.join(href) {
        Ok(absolute) => absolute.to_string(),
        Err(_) => href.to_string(),
    }
}

/// Extracts the attribute mapping of one detail page
///
/// # Extraction Rules
///
/// | Source | Key | Absent |
/// |--------|-----|--------|
/// | first attribute table | row header text | empty, `table_found: false` |
/// | page title element | `page_title` | per `policy` |
/// | price element | `price` | per `policy` |
/// | publication date element | `publication_date` | key omitted |
///
/// Non-breaking spaces are replaced by ordinary spaces in every key and value.
///
/// # Returns
///
/// * `Ok(ParsedDetail)` - Extracted attributes, empty when the page has no table
/// * `Err(HarvestError::MissingElement)` - Title or price missing under
///   [`MissingFieldPolicy::Fail`]
pub fn parse_detail(
    html: &str,
    selectors: &Selectors,
    policy: MissingFieldPolicy,
) -> Result<ParsedDetail, HarvestError> {
    let document = Html::parse_document(html);
    let mut data = DetailAttributes::new();
    let trim = selectors.trim_whitespace;

    let Some(table) = document.select(&selectors.detail_table).next() else {
        return Ok(ParsedDetail {
            attributes: data,
            table_found: false,
        });
    };

    for row in table.select(&selectors.row) {
        let Some(header) = row.select(&selectors.header_cell).next() else {
            continue;
        };
        let value = row
            .select(&selectors.data_cell)
            .next()
            .map(|cell| element_text(&cell, trim))
            .unwrap_or_default();
        data.insert(element_text(&header, trim), value);
    }

    let required = [
        (PAGE_TITLE_KEY, &selectors.page_title),
        (PRICE_KEY, &selectors.price),
    ];
    for (key, selector) in required {
        match select_first_text(&document, selector, trim) {
            Some(text) => {
                data.insert(key.to_string(), text);
            }
            None if policy == MissingFieldPolicy::Fail => {
                return Err(HarvestError::MissingElement {
                    field: key.to_string(),
                });
            }
            None => tracing::debug!("No {} element on detail page", key),
        }
    }

    if let Some(date) = select_first_text(&document, &selectors.publication_date, trim)
        .and_then(|text| extract_date(&text, &selectors.date_pattern))
    {
        data.insert(PUBLICATION_DATE_KEY.to_string(), date);
    }

    Ok(ParsedDetail {
        attributes: data,
        table_found: true,
    })
}

/// Returns the normalized text of the first element matching `selector`
pub fn select_first_text(document: &Html, selector: &Selector, trim: bool) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|element| element_text(&element, trim))
}

fn extract_date(text: &str, pattern: &Regex) -> Option<String> {
    pattern.find(text).map(|m| m.as_str().to_string())
}

fn element_text(element: &ElementRef<'_>, trim: bool) -> String {
    let text = normalize_text(&element.text().collect::<String>());
    if trim {
        text.trim().to_string()
    } else {
        text
    }
}

/// Replaces non-breaking spaces with ordinary ones
pub fn normalize_text(text: &str) -> String {
    text.replace('\u{a0}', " ")
}
