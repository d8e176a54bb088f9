//! HTTP request → [`RequestContext`].
//!
//! This is the routing collaborator: it picks the action name and an
//! explicit format from the path and parses parameters. Everything else is
//! left to the dispatcher.

use axum::http::{HeaderMap, Method, Uri};
use url::form_urlencoded;

use frontdesk_core::{FormatId, Headers, Params, RequestContext};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Query parameter selecting a format when the path has no suffix.
const FORMAT_PARAM: &str = "format";

pub fn context_from_parts(method: &Method, uri: &Uri, headers: &HeaderMap, body: &[u8]) -> RequestContext {
    let (action, suffix) = split_action_path(uri.path());

    // Non-UTF-8 values are kept (lossily) so they still count as present.
    let headers: Headers = headers
        .iter()
        .map(|(name, value)| (name.as_str(), String::from_utf8_lossy(value.as_bytes()).into_owned()))
        .collect();

    let mut params = Params::new();
    if let Some(query) = uri.query() {
        params.extend(parse_form(query.as_bytes()));
    }
    let is_form = headers
        .get("content-type")
        .is_some_and(|ct| ct.starts_with(FORM_CONTENT_TYPE));
    if is_form {
        params.extend(parse_form(body));
    }

    let format = suffix.or_else(|| params.get(FORMAT_PARAM).filter(|f| !f.is_empty()).cloned());

    let ctx = RequestContext::new(action)
        .with_method(method.as_str())
        .with_headers(headers)
        .with_params(params);

    match format {
        Some(format) => ctx.with_format(FormatId::new(format)),
        None => ctx,
    }
}

/// `/users/list.json` → (`users/list`, `Some("json")`).
///
/// Only a dot in the last path segment is a format suffix.
pub fn split_action_path(path: &str) -> (String, Option<String>) {
    let trimmed = path.trim_matches('/');
    let last_start = trimmed.rfind('/').map_or(0, |i| i + 1);

    match trimmed[last_start..].rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            let cut = last_start + stem.len();
            (trimmed[..cut].to_string(), Some(ext.to_string()))
        }
        _ => (trimmed.to_string(), None),
    }
}

fn parse_form(input: &[u8]) -> impl Iterator<Item = (String, String)> + '_ {
    form_urlencoded::parse(input).map(|(k, v)| (k.into_owned(), v.into_owned()))
}
