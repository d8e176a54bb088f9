//! Renderers and the output resolver.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use frontdesk_core::{ApiError, DispatchError, Envelope, FormatId, Negotiated, ResolutionFailure};

/// What `send_headers` derives status and headers from.
#[derive(Debug, Clone, Copy)]
pub enum ResponseMeta<'a> {
    Success(&'a Envelope),
    Error(&'a ApiError),
}

impl ResponseMeta<'_> {
    pub fn status(&self) -> u16 {
        match self {
            Self::Success(envelope) => envelope.status(),
            Self::Error(err) => err.status(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Final rendered response: status, headers and body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl RenderedOutput {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self { status, headers, body }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_parts(self) -> (u16, Vec<(String, String)>, Vec<u8>) {
        (self.status, self.headers, self.body)
    }
}

/// Format-specific serializer, used in a fixed order:
/// `set_output_action` → `populate_output` → `send_headers` → `execute_output`.
pub trait Renderer: Send {
    /// The action tag being rendered (`defaultError` on the error path).
    fn set_output_action(&mut self, action: &str);

    fn populate_output(&mut self, data: JsonValue, template: Option<&str>);

    fn send_headers(&mut self, meta: ResponseMeta<'_>);

    fn execute_output(&mut self) -> Result<RenderedOutput, DispatchError>;
}

/// Maps a format identifier (plus negotiation options) to a renderer.
pub trait OutputRegistry: Send + Sync {
    fn resolve(
        &self,
        format: &FormatId,
        options: Option<Negotiated>,
    ) -> Result<Box<dyn Renderer>, ResolutionFailure>;

    fn supports(&self, format: &FormatId) -> bool;
}

type RendererFactory = Arc<dyn Fn(Option<Negotiated>) -> Box<dyn Renderer> + Send + Sync>;

/// Registry backed by a fixed format → factory table.
#[derive(Clone, Default)]
pub struct StaticOutputRegistry {
    factories: HashMap<FormatId, RendererFactory>,
}

impl StaticOutputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON and XML renderers.
    pub fn with_defaults() -> Self {
        Self::new()
            .register(FormatId::new("json"), |options| {
                Box::new(crate::renderers::JsonRenderer::new(options))
            })
            .register(FormatId::new("xml"), |options| {
                Box::new(crate::renderers::XmlRenderer::new(options))
            })
    }

    pub fn register<F>(mut self, format: FormatId, factory: F) -> Self
    where
        F: Fn(Option<Negotiated>) -> Box<dyn Renderer> + Send + Sync + 'static,
    {
        self.factories.insert(format, Arc::new(factory));
        self
    }
}

impl core::fmt::Debug for StaticOutputRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut formats: Vec<&str> = self.factories.keys().map(FormatId::as_str).collect();
        formats.sort_unstable();
        f.debug_struct("StaticOutputRegistry").field("formats", &formats).finish()
    }
}

impl OutputRegistry for StaticOutputRegistry {
    fn resolve(
        &self,
        format: &FormatId,
        options: Option<Negotiated>,
    ) -> Result<Box<dyn Renderer>, ResolutionFailure> {
        self.factories
            .get(format)
            .map(|factory| factory(options))
            .ok_or_else(|| ResolutionFailure::UnknownFormat(format.clone()))
    }

    fn supports(&self, format: &FormatId) -> bool {
        self.factories.contains_key(format)
    }
}
