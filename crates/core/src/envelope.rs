//! Response envelope and action result normalization.

use serde::Serialize;
use serde_json::Value as JsonValue;

/// Status attached to envelopes that do not set one.
const DEFAULT_STATUS: u16 = 200;

/// Uniform wrapper around an action's result.
///
/// Renderers only ever see envelopes; see [`ActionResult::into_envelope`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    data: JsonValue,
    template: Option<String>,
    status: u16,
}

impl Envelope {
    pub fn new(data: JsonValue) -> Self {
        Self {
            data,
            template: None,
            status: DEFAULT_STATUS,
        }
    }

    /// Template/view name hint for renderers that use one.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn data(&self) -> &JsonValue {
        &self.data
    }

    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn into_data(self) -> JsonValue {
        self.data
    }
}

/// What an action entry point returns: either a bare value or an envelope
/// the action built itself (to set a status or template).
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    Raw(JsonValue),
    Envelope(Envelope),
}

impl ActionResult {
    /// Normalize into an envelope. Raw values become the envelope's `data`
    /// unchanged.
    pub fn into_envelope(self) -> Envelope {
        match self {
            Self::Raw(data) => Envelope::new(data),
            Self::Envelope(envelope) => envelope,
        }
    }
}

impl From<JsonValue> for ActionResult {
    fn from(value: JsonValue) -> Self {
        Self::Raw(value)
    }
}

impl From<Envelope> for ActionResult {
    fn from(value: Envelope) -> Self {
        Self::Envelope(value)
    }
}
