//! Built-in JSON and XML renderers.

use serde_json::Value as JsonValue;
use tracing::debug;

use frontdesk_core::{DispatchError, FormatId, Negotiated};

use crate::output::{RenderedOutput, Renderer, ResponseMeta};

/// State every built-in renderer accumulates before `execute_output`.
#[derive(Debug, Default)]
struct RenderState {
    options: Option<Negotiated>,
    action: Option<String>,
    template: Option<String>,
    data: JsonValue,
    status: u16,
    headers: Vec<(String, String)>,
}

impl RenderState {
    fn new(options: Option<Negotiated>) -> Self {
        Self {
            options,
            status: 200,
            ..Self::default()
        }
    }

    /// The negotiated media type when it describes this format, else the
    /// renderer's own.
    fn content_type(&self, format: &FormatId, own: &'static str) -> String {
        match &self.options {
            Some(negotiated) if negotiated.matches(format) => negotiated.mime_type.clone(),
            _ => own.to_string(),
        }
    }

    fn send_headers(&mut self, meta: ResponseMeta<'_>, format: &FormatId, own: &'static str) {
        self.status = meta.status();
        self.headers = vec![
            ("Content-Type".to_string(), self.content_type(format, own)),
            ("Cache-Control".to_string(), "no-cache".to_string()),
        ];
    }

    fn finish(&mut self, format: &FormatId, body: Vec<u8>) -> RenderedOutput {
        debug!(
            %format,
            action = self.action.as_deref().unwrap_or(""),
            template = self.template.as_deref().unwrap_or(""),
            status = self.status,
            bytes = body.len(),
            "rendered output"
        );
        RenderedOutput::new(self.status, std::mem::take(&mut self.headers), body)
    }
}

/// Serializes `data` as a JSON document.
#[derive(Debug)]
pub struct JsonRenderer {
    format: FormatId,
    state: RenderState,
}

impl JsonRenderer {
    pub const MIME_TYPE: &'static str = "application/json";

    pub fn new(options: Option<Negotiated>) -> Self {
        Self {
            format: FormatId::new("json"),
            state: RenderState::new(options),
        }
    }
}

impl Renderer for JsonRenderer {
    fn set_output_action(&mut self, action: &str) {
        self.state.action = Some(action.to_string());
    }

    fn populate_output(&mut self, data: JsonValue, template: Option<&str>) {
        self.state.data = data;
        self.state.template = template.map(str::to_string);
    }

    fn send_headers(&mut self, meta: ResponseMeta<'_>) {
        self.state.send_headers(meta, &self.format, Self::MIME_TYPE);
    }

    fn execute_output(&mut self) -> Result<RenderedOutput, DispatchError> {
        let body = serde_json::to_vec(&self.state.data)
            .map_err(|e| DispatchError::Rendering(e.to_string()))?;
        Ok(self.state.finish(&self.format, body))
    }
}

/// Serializes `data` under a `<response>` root element.
///
/// Object keys become element names (invalid characters replaced by `_`),
/// array entries become repeated `<item>` elements, `null` an empty element.
/// Characters XML 1.0 cannot carry are replaced by U+FFFD.
#[derive(Debug)]
pub struct XmlRenderer {
    format: FormatId,
    state: RenderState,
}

impl XmlRenderer {
    pub const MIME_TYPE: &'static str = "application/xml";
    const ROOT: &'static str = "response";

    pub fn new(options: Option<Negotiated>) -> Self {
        Self {
            format: FormatId::new("xml"),
            state: RenderState::new(options),
        }
    }
}

impl Renderer for XmlRenderer {
    fn set_output_action(&mut self, action: &str) {
        self.state.action = Some(action.to_string());
    }

    fn populate_output(&mut self, data: JsonValue, template: Option<&str>) {
        self.state.data = data;
        self.state.template = template.map(str::to_string);
    }

    fn send_headers(&mut self, meta: ResponseMeta<'_>) {
        self.state.send_headers(meta, &self.format, Self::MIME_TYPE);
    }

    fn execute_output(&mut self) -> Result<RenderedOutput, DispatchError> {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        write_element(&mut out, Self::ROOT, &self.state.data);
        Ok(self.state.finish(&self.format, out.into_bytes()))
    }
}

fn write_element(out: &mut String, name: &str, value: &JsonValue) {
    let name = element_name(name);

    if value.is_null() {
        out.push('<');
        out.push_str(&name);
        out.push_str("/>");
        return;
    }

    out.push('<');
    out.push_str(&name);
    out.push('>');

    match value {
        JsonValue::Object(map) => {
            for (key, child) in map {
                write_element(out, key, child);
            }
        }
        JsonValue::Array(items) => {
            for child in items {
                write_element(out, "item", child);
            }
        }
        JsonValue::String(s) => escape_into(out, s),
        other => escape_into(out, &other.to_string()),
    }

    out.push_str("</");
    out.push_str(&name);
    out.push('>');
}

fn element_name(raw: &str) -> String {
    let mut name: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    match name.chars().next() {
        None => name.push_str("item"),
        Some(first) if !(first.is_ascii_alphabetic() || first == '_') => name.insert(0, '_'),
        // Names starting with "xml" are reserved.
        Some(_) if name.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("xml")) => name.insert(0, '_'),
        Some(_) => {}
    }

    name
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_xml_char(c) => out.push(c),
            _ => out.push(char::REPLACEMENT_CHARACTER),
        }
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..)
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontdesk_core::{ApiError, Envelope};
    use serde_json::json;

    fn render(renderer: &mut dyn Renderer, data: JsonValue, meta: ResponseMeta<'_>) -> RenderedOutput {
        renderer.set_output_action("test");
        renderer.populate_output(data, None);
        renderer.send_headers(meta);
        renderer.execute_output().unwrap()
    }

    fn body(out: &RenderedOutput) -> &str {
        std::str::from_utf8(out.body()).unwrap()
    }

    #[test]
    fn json_success() {
        let envelope = Envelope::new(json!({"id": 1}));
        let out = render(&mut JsonRenderer::new(None), envelope.data().clone(), ResponseMeta::Success(&envelope));

        assert_eq!(out.status(), 200);
        assert_eq!(out.header("content-type"), Some("application/json"));
        assert_eq!(serde_json::from_slice::<JsonValue>(out.body()).unwrap(), json!({"id": 1}));
    }

    #[test]
    fn json_uses_negotiated_mime_type_when_it_matches() {
        let options = Negotiated {
            mime_type: "text/plain".to_string(),
            output_format: "JSON".to_string(),
        };
        let envelope = Envelope::new(json!([]));
        let out = render(&mut JsonRenderer::new(Some(options)), json!([]), ResponseMeta::Success(&envelope));

        assert_eq!(out.header("content-type"), Some("text/plain"));
    }

    #[test]
    fn negotiated_mime_type_for_another_format_is_ignored() {
        let options = Negotiated {
            mime_type: "application/json".to_string(),
            output_format: "JSON".to_string(),
        };
        let envelope = Envelope::new(json!("x"));
        let out = render(&mut XmlRenderer::new(Some(options)), json!("x"), ResponseMeta::Success(&envelope));

        assert_eq!(out.header("content-type"), Some("application/xml"));
    }

    #[test]
    fn error_status_comes_from_error() {
        let err = ApiError::new("ERROR_NOPE", "nope", 403);
        let out = render(&mut JsonRenderer::new(None), err.to_error_map(), ResponseMeta::Error(&err));

        assert_eq!(out.status(), 403);
    }

    #[test]
    fn xml_structure() {
        let envelope = Envelope::new(json!({"meta": "pong", "tags": ["a", "b"], "none": null}));
        let out = render(&mut XmlRenderer::new(None), envelope.data().clone(), ResponseMeta::Success(&envelope));

        assert_eq!(
            body(&out),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <response><meta>pong</meta><none/><tags><item>a</item><item>b</item></tags></response>"
        );
    }

    #[test]
    fn xml_escapes_text_and_sanitizes_names() {
        let envelope = Envelope::new(json!({"1st key": "a<b & \"c\""}));
        let out = render(&mut XmlRenderer::new(None), envelope.data().clone(), ResponseMeta::Success(&envelope));

        assert!(body(&out).contains("<_1st_key>a&lt;b &amp; &quot;c&quot;</_1st_key>"));
    }

    #[test]
    fn xml_replaces_characters_xml_cannot_carry() {
        let data = json!({"name": "a\u{1}b\tc\u{0}\u{FFFF}"});
        let envelope = Envelope::new(data.clone());
        let out = render(&mut XmlRenderer::new(None), data, ResponseMeta::Success(&envelope));

        assert!(body(&out).contains("<name>a\u{FFFD}b\tc\u{FFFD}\u{FFFD}</name>"));
    }

    #[test]
    fn xml_reserved_element_names_are_prefixed() {
        let data = json!({"xmlns": 1, "XML_data": 2, "xylophone": 3});
        let envelope = Envelope::new(data.clone());
        let out = render(&mut XmlRenderer::new(None), data, ResponseMeta::Success(&envelope));

        assert!(body(&out).contains("<_xmlns>1</_xmlns>"));
        assert!(body(&out).contains("<_XML_data>2</_XML_data>"));
        assert!(body(&out).contains("<xylophone>3</xylophone>"));
    }

    #[test]
    fn xml_scalars() {
        let envelope = Envelope::new(json!(42));
        let out = render(&mut XmlRenderer::new(None), json!(42), ResponseMeta::Success(&envelope));
        assert!(body(&out).ends_with("<response>42</response>"));
    }
}
