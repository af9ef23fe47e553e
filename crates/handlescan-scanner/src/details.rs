use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Metadata observed while probing, for display only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeDetails {
    /// HTTP status code; absent for rendered pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Body length in bytes
    pub content_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    pub has_profile_image: bool,
}

/// Whether a content type denotes an HTML document.
pub fn is_markup(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| {
        let ct = ct.to_ascii_lowercase();
        ct.contains("text/html") || ct.contains("application/xhtml+xml")
    })
}

fn title_selector() -> &'static Selector {
    static TITLE: OnceLock<Selector> = OnceLock::new();
    TITLE.get_or_init(|| Selector::parse("title").expect("valid selector"))
}

fn image_selector() -> &'static Selector {
    static IMG: OnceLock<Selector> = OnceLock::new();
    IMG.get_or_init(|| Selector::parse("img[alt]").expect("valid selector"))
}

/// Extract the trimmed page title and whether a profile/avatar image is present.
///
/// The parser is lenient, so malformed markup just yields less metadata.
pub fn extract_page_metadata(html: &str) -> (Option<String>, bool) {
    let document = Html::parse_document(html);

    let title = document
        .select(title_selector())
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    let has_profile_image = document.select(image_selector()).any(|img| {
        img.value().attr("alt").is_some_and(|alt| {
            let alt = alt.to_ascii_lowercase();
            alt.contains("profile") || alt.contains("avatar")
        })
    });

    (title, has_profile_image)
}
