//! Content negotiation via an exact-match media-type table.
//!
//! No wildcard or quality-value parsing: a header value either is a key of
//! [`MIME_MAP`] verbatim or negotiation fails.

use frontdesk_core::{Headers, Negotiated};

/// Media type → format identifier.
pub const MIME_MAP: &[(&str, &str)] = &[
    ("application/xml", "xml"),
    ("text/xml", "xml"),
    ("application/json", "json"),
    ("text/json", "json"),
    ("text/html", "html"),
    ("text/plain", "json"),
    ("text/javascript", "js"),
];

/// Format mapped to `mime_type`, if any. Case-sensitive.
pub fn lookup(mime_type: &str) -> Option<&'static str> {
    MIME_MAP
        .iter()
        .find(|(mime, _)| *mime == mime_type)
        .map(|(_, format)| *format)
}

/// Infer the preferred output format from `Accept` / `Content-Type`.
///
/// `Accept` wins when both are present. Returns `None` when neither header
/// is set or the chosen value is not mapped.
pub fn detect_mime_type(headers: &Headers) -> Option<Negotiated> {
    let mime_type = headers.get("accept").or_else(|| headers.get("content-type"))?;
    let format = lookup(mime_type)?;

    Some(Negotiated {
        mime_type: mime_type.to_string(),
        output_format: format.to_ascii_uppercase(),
    })
}
