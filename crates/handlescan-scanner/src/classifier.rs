//! Verdicts from HTTP responses and rendered pages.
//!
//! Both entry points are pure: the same input always yields the same
//! [`Classification`], and metadata extraction never affects the verdict.

use crate::details::{extract_page_metadata, is_markup, ProbeDetails};
use crate::fuzzy::looks_like_match;
use handlescan_catalog::TargetDefinition;
use handlescan_core::{Handle, ProbeStatus};

/// Phrases a service shows on a page for a handle nobody has registered.
pub const NOT_FOUND_PHRASES: [&str; 8] = [
    "user not found",
    "profile not found",
    "page not found",
    "does not exist",
    "not available",
    "username not found",
    "account not found",
    "user does not exist",
];

/// What a probe received, reduced to the parts the classifier reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status_code: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// A verdict plus the metadata gathered alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: ProbeStatus,
    pub details: ProbeDetails,
}

/// Whether `text` contains any not-found phrase, ignoring case.
pub fn contains_not_found_phrase(text: &str) -> bool {
    let text = text.to_lowercase();
    NOT_FOUND_PHRASES.iter().any(|phrase| text.contains(phrase))
}

/// Classify an HTTP response for `handle` under the target's rules.
///
/// First match wins:
/// 1. the target's expected status, honouring `invert_expected_status`
/// 2. 404 is available
/// 3. 200 is taken when the body mentions the handle, available when it
///    carries a not-found phrase, taken otherwise
/// 4. 3xx is taken
/// 5. anything else is unknown
pub fn classify(target: &TargetDefinition, response: &ProbeResponse, handle: &Handle) -> Classification {
    Classification {
        status: status_verdict(target, response, handle),
        details: response_details(response),
    }
}

fn status_verdict(target: &TargetDefinition, response: &ProbeResponse, handle: &Handle) -> ProbeStatus {
    let code = response.status_code;

    if target.expected_status == Some(code) {
        return if target.invert_expected_status {
            ProbeStatus::Available
        } else {
            ProbeStatus::Taken
        };
    }

    match code {
        404 => ProbeStatus::Available,
        200 => {
            if looks_like_match(&response.body, handle.as_str()) {
                ProbeStatus::Taken
            } else if contains_not_found_phrase(&response.body) {
                ProbeStatus::Available
            } else {
                ProbeStatus::Taken
            }
        }
        300..=399 => ProbeStatus::Taken,
        _ => ProbeStatus::Unknown,
    }
}

fn response_details(response: &ProbeResponse) -> ProbeDetails {
    let mut details = ProbeDetails {
        status_code: Some(response.status_code),
        content_type: response.content_type.clone(),
        content_length: response.body.len(),
        ..ProbeDetails::default()
    };

    if is_markup(response.content_type.as_deref()) {
        let (title, has_profile_image) = extract_page_metadata(&response.body);
        details.page_title = title;
        details.has_profile_image = has_profile_image;
    }

    details
}

/// Classify a page rendered by the browser.
///
/// A not-found phrase anywhere on the page means available; otherwise a
/// mention of the handle in the title or body means taken. Anything else
/// is unknown, since a rendered page carries no status code to fall back on.
pub fn classify_rendered(title: Option<&str>, html: &str, handle: &Handle) -> Classification {
    let title_text = title.unwrap_or_default();

    let status = if contains_not_found_phrase(title_text) || contains_not_found_phrase(html) {
        ProbeStatus::Available
    } else if looks_like_match(title_text, handle.as_str()) || looks_like_match(html, handle.as_str()) {
        ProbeStatus::Taken
    } else {
        ProbeStatus::Unknown
    };

    let (page_title, has_profile_image) = extract_page_metadata(html);
    let details = ProbeDetails {
        status_code: None,
        content_type: None,
        content_length: html.len(),
        page_title: title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()).or(page_title),
        has_profile_image,
    };

    Classification { status, details }
}
