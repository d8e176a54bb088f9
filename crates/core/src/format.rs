//! Output format identifiers and negotiation results.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Format used when neither routing nor negotiation selected one.
pub const DEFAULT_OUTPUT_FORMAT: &str = "xml";

/// Symbolic name selecting an output renderer (e.g. "xml", "json").
///
/// Identifiers are normalized to lowercase so `JSON` and `json` select the
/// same renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatId(Cow<'static, str>);

impl FormatId {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        if name.chars().any(|c| c.is_ascii_uppercase()) {
            Self(Cow::Owned(name.to_ascii_lowercase()))
        } else {
            Self(name)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FormatId {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_FORMAT)
    }
}

impl core::fmt::Display for FormatId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a successful content negotiation.
///
/// `output_format` is the mapped format identifier upper-cased (e.g. "JSON").
/// It is advisory: renderers receive it as options, it does not pick the
/// renderer by itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Negotiated {
    pub mime_type: String,
    pub output_format: String,
}

impl Negotiated {
    /// Whether this negotiation result describes `format`.
    pub fn matches(&self, format: &FormatId) -> bool {
        self.output_format.eq_ignore_ascii_case(format.as_str())
    }

    /// The negotiated format as a renderer-selecting identifier.
    pub fn format_id(&self) -> FormatId {
        FormatId::new(self.output_format.clone())
    }
}
