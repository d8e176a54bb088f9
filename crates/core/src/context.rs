//! Immutable per-request metadata.
//!
//! The transport layer builds one [`RequestContext`] per inbound request and
//! hands it to the authorizer and dispatcher. Nothing downstream reads
//! process-wide state.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::Serialize;
use uuid::Uuid;

use crate::{ActionName, FormatId};

/// Parsed request parameters (query string and form body).
pub type Params = BTreeMap<String, String>;

/// Request headers keyed by lowercase name.
///
/// Values are kept verbatim; only names are case-insensitive. Repeated
/// headers are folded into one comma-separated value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.0.insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Add `value` under `name`, joining it to an existing value with `", "`.
    pub fn append(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        let value = value.into();
        match self.0.entry(name.as_ref().to_ascii_lowercase()) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.push_str(", ");
                existing.push_str(&value);
            }
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

/// A file uploaded with the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// Everything the dispatch pipeline knows about the current request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Uuid,
    action: ActionName,
    method: Option<String>,
    headers: Headers,
    params: Params,
    files: Vec<UploadedFile>,
    format: Option<FormatId>,
}

impl RequestContext {
    pub fn new(action: impl Into<ActionName>) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            action: action.into(),
            method: None,
            headers: Headers::new(),
            params: Params::new(),
            files: Vec::new(),
            format: None,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_file(mut self, file: UploadedFile) -> Self {
        self.files.push(file);
        self
    }

    /// Set the format explicitly (URL suffix, query parameter, negotiation
    /// wired in by the host). Takes priority over the default format.
    pub fn with_format(mut self, format: FormatId) -> Self {
        self.format = Some(format);
        self
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn action(&self) -> &ActionName {
        &self.action
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn format(&self) -> Option<&FormatId> {
        self.format.as_ref()
    }
}
