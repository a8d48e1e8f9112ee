//! Listing data model
//!
//! A listing starts life as a [`ListingStub`] scraped from an index page and
//! becomes a [`ListingRecord`] once its detail page has been merged in.

use indexmap::IndexMap;

/// Record key holding the title scraped from the index page
pub const TITLE_KEY: &str = "title";

/// Record key holding the detail page link
pub const LINK_KEY: &str = "link";

/// A (title, link) pair discovered on an index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingStub {
    /// Heading text of the index entry
    pub title: String,

    /// Detail page URL
    pub link: String,
}

impl ListingStub {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }
}

/// Attribute mapping extracted from a single detail page
pub type DetailAttributes = IndexMap<String, String>;

/// A listing with all attributes collected for it
///
/// Keys are dynamic and kept in insertion order: the stub's `title` and `link`
/// first, then whatever the detail page exposed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRecord {
    fields: IndexMap<String, String>,
}

impl ListingRecord {
    /// Promotes a stub into a record holding only `title` and `link`
    pub fn from_stub(stub: ListingStub) -> Self {
        let mut fields = IndexMap::new();
        fields.insert(TITLE_KEY.to_string(), stub.title);
        fields.insert(LINK_KEY.to_string(), stub.link);
        Self { fields }
    }

    /// Adds detail attributes on top of the existing fields
    ///
    /// Keys already present are left untouched, so the stub's `title` and
    /// `link` survive a detail table row with the same name.
    pub fn merge_detail(&mut self, detail: DetailAttributes) {
        for (key, value) in detail {
            self.fields.entry(key).or_insert(value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<ListingStub> for ListingRecord {
    fn from(stub: ListingStub) -> Self {
        Self::from_stub(stub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(pairs: &[(&str, &str)]) -> DetailAttributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_stub_has_title_and_link() {
        let record = ListingRecord::from_stub(ListingStub::new("Lada Granta", "https://x/1"));
        assert_eq!(record.get("title"), Some("Lada Granta"));
        assert_eq!(record.get("link"), Some("https://x/1"));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["title", "link"]);
    }

    #[test]
    fn test_merge_adds_detail_keys_in_order() {
        let mut record = ListingRecord::from_stub(ListingStub::new("A", "https://x/a"));
        record.merge_detail(detail(&[("Двигатель", "бензин, 1.6 л"), ("price", "500 000 ₽")]));

        assert_eq!(
            record.keys().collect::<Vec<_>>(),
            vec!["title", "link", "Двигатель", "price"]
        );
        assert_eq!(record.get("price"), Some("500 000 ₽"));
    }

    #[test]
    fn test_stub_fields_win_over_detail() {
        let mut record = ListingRecord::from_stub(ListingStub::new("Index title", "https://x/a"));
        record.merge_detail(detail(&[("title", "Table title"), ("link", "elsewhere")]));

        assert_eq!(record.get("title"), Some("Index title"));
        assert_eq!(record.get("link"), Some("https://x/a"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_merge_empty_detail_is_noop() {
        let mut record = ListingRecord::from_stub(ListingStub::new("A", "https://x/a"));
        record.merge_detail(DetailAttributes::new());
        assert_eq!(record.len(), 2);
        assert!(!record.is_empty());
    }
}
