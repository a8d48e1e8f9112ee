use serde::Deserialize;

/// Main configuration structure for Listing Harvester
///
/// Every section is optional; a missing section or key falls back to the
/// defaults below, which target drom.ru-style listing pages.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub selectors: SelectorConfig,
    pub extraction: ExtractionConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Exclusive upper bound on index page numbers (pages 1..max-pages)
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Delay after each non-empty index page (milliseconds)
    #[serde(rename = "index-delay-ms")]
    pub index_delay_ms: u64,

    /// Delay after each detail page (milliseconds)
    #[serde(rename = "detail-delay-ms")]
    pub detail_delay_ms: u64,

    /// Path appended to the base URL for page `n`; must contain `{n}`
    #[serde(rename = "page-path-template")]
    pub page_path_template: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 100,
            index_delay_ms: 1000,
            detail_delay_ms: 1000,
            page_path_template: "/page{n}/".to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "ListingHarvester".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            contact_email: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// `Name/Version (+ContactURL; ContactEmail)`, with the parenthesised part
    /// reduced to whatever contact details are configured.
    pub fn header_value(&self) -> String {
        let contact: Vec<String> = [
            self.contact_url.as_ref().map(|u| format!("+{}", u)),
            self.contact_email.clone(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if contact.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} ({})",
                self.crawler_name,
                self.crawler_version,
                contact.join("; ")
            )
        }
    }
}

/// CSS selectors and patterns used to pick data out of pages
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Index entry heading; its parent anchor carries the link
    #[serde(rename = "index-heading")]
    pub index_heading: String,

    /// Attribute table on the detail page (first match is used)
    #[serde(rename = "detail-table")]
    pub detail_table: String,

    /// Primary heading of the detail page
    #[serde(rename = "page-title")]
    pub page_title: String,

    /// Price element
    pub price: String,

    /// Element holding the publication date text
    #[serde(rename = "publication-date")]
    pub publication_date: String,

    /// Regular expression matching the date inside the publication element
    #[serde(rename = "date-pattern")]
    pub date_pattern: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            index_heading: "a > h3".to_string(),
            detail_table: "table".to_string(),
            page_title: "h1 > span".to_string(),
            price: ".wb9m8q0".to_string(),
            publication_date: ".css-pxeubi.evnwjo70".to_string(),
            date_pattern: r"\d{2}\.\d{2}\.\d{4}".to_string(),
        }
    }
}

/// What to do when a detail page lacks its title or price element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingFieldPolicy {
    /// Abort the run
    #[default]
    Fail,

    /// Leave the key out of the record
    Omit,
}

/// Detail extraction configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    #[serde(rename = "missing-required")]
    pub missing_required: MissingFieldPolicy,

    /// Strip leading and trailing whitespace from extracted keys and values.
    /// Off by default so columns keep the page's exact text.
    #[serde(rename = "trim-whitespace")]
    pub trim_whitespace: bool,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Field delimiter; must be a single ASCII character
    pub delimiter: String,

    /// Whether to prepend a row-index column
    #[serde(rename = "index-column")]
    pub index_column: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            index_column: true,
        }
    }
}
