//! Locations of pre-rendered screenshots shown on image cards.
//!
//! Screenshots are captured and uploaded by an external job. The assistant
//! only derives the object key a page was stored under.

use url::Url;

/// Object key of the screenshot of `page_url`.
///
/// Drops the scheme, then removes every `/` and `.`.
///
/// # Examples
/// ```
/// use campus_assistant::domain::screenshot_key;
///
/// assert_eq!(
///     screenshot_key("https://www.upm.es/guias/redes.pdf"),
///     "wwwupmesguiasredespdf"
/// );
/// ```
pub fn screenshot_key(page_url: &str) -> String {
    let without_scheme = match Url::parse(page_url) {
        Ok(parsed) if parsed.has_host() => page_url
            .split_once("://")
            .map_or(page_url, |(_, rest)| rest),
        _ => page_url,
    };
    without_scheme.replace(['/', '.'], "")
}

/// Bucket holding the screenshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageStore {
    base_url: String,
}

impl ImageStore {
    /// Default public bucket.
    pub const DEFAULT_BASE_URL: &'static str = "https://imagenes-tfg.s3.eu-west-3.amazonaws.com";

    /// Create a store rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Public URL of the PNG stored under `key`.
    pub fn image_url(&self, key: &str) -> String {
        format!("{}/{key}.png", self.base_url)
    }

    /// Public URL of the screenshot of `page_url`.
    pub fn screenshot_of(&self, page_url: &str) -> String {
        self.image_url(&screenshot_key(page_url))
    }
}

impl Default for ImageStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}
