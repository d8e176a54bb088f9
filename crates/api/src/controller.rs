//! Request lifecycle: authorize → bind → run → render, errors rendered
//! through the same output path.

use std::sync::Arc;

use tracing::{Span, error, info, info_span, warn};

use frontdesk_auth::{PartnerBackend, PublicActions, authorize};
use frontdesk_core::{ApiError, DispatchError, RequestContext};

use crate::action::ActionRegistry;
use crate::dispatcher::Dispatcher;
use crate::errors;
use crate::negotiation;
use crate::output::{OutputRegistry, RenderedOutput};

/// Front controller shared by all requests.
///
/// Holds only read-only collaborators; each call to [`FrontController::handle`]
/// builds its own [`Dispatcher`].
#[derive(Clone)]
pub struct FrontController {
    actions: Arc<dyn ActionRegistry>,
    outputs: Arc<dyn OutputRegistry>,
    public_actions: Arc<PublicActions>,
    partners: Arc<dyn PartnerBackend>,
}

impl FrontController {
    pub fn new(
        actions: Arc<dyn ActionRegistry>,
        outputs: Arc<dyn OutputRegistry>,
        public_actions: Arc<PublicActions>,
        partners: Arc<dyn PartnerBackend>,
    ) -> Self {
        Self {
            actions,
            outputs,
            public_actions,
            partners,
        }
    }

    /// Produce a response for `ctx`. Never fails: errors are rendered, and
    /// if that is impossible a plain-text fallback is returned.
    pub fn handle(&self, ctx: RequestContext) -> RenderedOutput {
        let ctx = self.with_negotiated_format(ctx);
        let span = dispatch_span(&ctx);
        let _guard = span.enter();

        let mut dispatcher = Dispatcher::new(&ctx, self.actions.as_ref(), self.outputs.as_ref());
        let format = dispatcher.get_format();

        match self.run(&mut dispatcher) {
            Ok(output) => {
                info!(%format, status = output.status(), "request dispatched");
                output
            }
            Err(err) => render_error(&dispatcher, errors::translate(err)),
        }
    }

    /// Render `api_error` for a request that failed before dispatch (e.g. its
    /// body could not be read). Uses the same format selection and error
    /// output as [`FrontController::handle`]; no action runs.
    pub fn reject(&self, ctx: RequestContext, api_error: ApiError) -> RenderedOutput {
        let ctx = self.with_negotiated_format(ctx);
        let span = dispatch_span(&ctx);
        let _guard = span.enter();

        let dispatcher = Dispatcher::new(&ctx, self.actions.as_ref(), self.outputs.as_ref());
        render_error(&dispatcher, api_error)
    }

    fn run(&self, dispatcher: &mut Dispatcher<'_>) -> Result<RenderedOutput, DispatchError> {
        authorize(&self.public_actions, self.partners.as_ref(), dispatcher.context())?;
        dispatcher.process_action()?;
        dispatcher.process_output()
    }

    /// Wire negotiation into format selection when routing did not pick a
    /// format and a renderer exists for the negotiated one.
    fn with_negotiated_format(&self, ctx: RequestContext) -> RequestContext {
        if ctx.format().is_some() {
            return ctx;
        }

        match negotiation::detect_mime_type(ctx.headers()) {
            Some(negotiated) if self.outputs.supports(&negotiated.format_id()) => {
                ctx.with_format(negotiated.format_id())
            }
            _ => ctx,
        }
    }
}

fn dispatch_span(ctx: &RequestContext) -> Span {
    info_span!(
        "dispatch",
        request_id = %ctx.request_id(),
        action = %ctx.action(),
        method = ctx.method().unwrap_or("-"),
    )
}

fn render_error(dispatcher: &Dispatcher<'_>, api_error: ApiError) -> RenderedOutput {
    let format = dispatcher.get_format();
    warn!(%format, error = %api_error, status = api_error.status(), "request failed");

    dispatcher.process_error(&api_error).unwrap_or_else(|render_err| {
        error!(%format, error = %render_err, "error output could not be rendered");
        errors::fallback_output(&api_error)
    })
}

impl core::fmt::Debug for FrontController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrontController")
            .field("public_actions", &self.public_actions)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::{Value as JsonValue, json};

    use super::*;
    use crate::action::{Action, ActionOutcome, StaticActionRegistry};
    use crate::builtin;
    use crate::output::StaticOutputRegistry;
    use frontdesk_auth::{Partner, StaticPartnerBackend};
    use frontdesk_core::error::ERROR_INVALID_ACTION_REQUEST_NAME;
    use frontdesk_core::{FormatId, Params, UploadedFile};

    struct Failing;

    impl Action for Failing {
        fn set_action_params(&mut self, _params: Params) {}
        fn set_action_files(&mut self, _files: Vec<UploadedFile>) {}

        fn execute_action(&mut self) -> ActionOutcome {
            Err(ApiError::new("ERROR_QUOTA", "quota exceeded", 429))
        }
    }

    /// Backend double counting how often it was consulted.
    struct CountingBackend {
        answer: Result<bool, ApiError>,
        calls: Mutex<usize>,
    }

    impl PartnerBackend for CountingBackend {
        fn authorize(&self, _partner: &Partner) -> Result<bool, ApiError> {
            *self.calls.lock().unwrap() += 1;
            self.answer.clone()
        }
    }

    fn controller_with(backend: Arc<dyn PartnerBackend>) -> FrontController {
        let actions = builtin::registry().register("quota", || Box::new(Failing));
        FrontController::new(
            Arc::new(actions),
            Arc::new(StaticOutputRegistry::with_defaults()),
            Arc::new(PublicActions::new(["ping"])),
            backend,
        )
    }

    fn controller() -> FrontController {
        controller_with(Arc::new(StaticPartnerBackend::new(["k1"])))
    }

    fn json_body(out: &RenderedOutput) -> JsonValue {
        serde_json::from_slice(out.body()).unwrap()
    }

    #[test]
    fn public_action_renders_without_partner() {
        let backend = Arc::new(CountingBackend {
            answer: Ok(false),
            calls: Mutex::new(0),
        });
        let out = controller_with(backend.clone()).handle(
            RequestContext::new("ping")
                .with_method("GET")
                .with_header("Accept", "application/json"),
        );

        assert_eq!(out.status(), 200);
        assert_eq!(json_body(&out)["meta"], "pong");
        assert_eq!(*backend.calls.lock().unwrap(), 0);
    }

    #[test]
    fn default_format_is_xml() {
        let out = controller().handle(RequestContext::new("ping").with_method("GET"));

        assert_eq!(out.status(), 200);
        assert_eq!(out.header("content-type"), Some("application/xml"));
        assert!(std::str::from_utf8(out.body()).unwrap().contains("<meta>pong</meta>"));
    }

    #[test]
    fn unsupported_negotiated_format_falls_back_to_default() {
        let out = controller().handle(
            RequestContext::new("ping")
                .with_method("GET")
                .with_header("Accept", "text/html"),
        );

        assert_eq!(out.status(), 200);
        assert_eq!(out.header("content-type"), Some("application/xml"));
    }

    #[test]
    fn explicit_format_beats_negotiation() {
        let out = controller().handle(
            RequestContext::new("ping")
                .with_method("GET")
                .with_format(FormatId::new("json"))
                .with_header("Accept", "application/xml"),
        );

        assert_eq!(out.header("content-type"), Some("application/json"));
    }

    #[test]
    fn silent_partner_decline_renders_invalid_action_request() {
        let out = controller().handle(
            RequestContext::new("echo")
                .with_method("GET")
                .with_format(FormatId::new("json"))
                .with_header("X-Partner-Digest", "wrong"),
        );

        assert_eq!(out.status(), 400);
        assert_eq!(json_body(&out)["errors"][0]["name"], ERROR_INVALID_ACTION_REQUEST_NAME);
    }

    #[test]
    fn backend_error_is_rendered_verbatim() {
        let out = controller().handle(
            RequestContext::new("echo")
                .with_method("GET")
                .with_format(FormatId::new("json")),
        );

        assert_eq!(out.status(), 401);
        assert_eq!(json_body(&out)["errors"][0]["name"], "ERROR_MISSING_PARTNER_DIGEST");
    }

    #[test]
    fn authorized_partner_reaches_action() {
        let out = controller().handle(
            RequestContext::new("echo")
                .with_method("POST")
                .with_format(FormatId::new("json"))
                .with_header("Authorization", "Digest k1")
                .with_param("name", "acme"),
        );

        assert_eq!(out.status(), 201);
        assert_eq!(json_body(&out)["params"], json!({"name": "acme"}));
    }

    #[test]
    fn action_error_goes_through_error_path_in_same_format() {
        let out = controller().handle(
            RequestContext::new("quota")
                .with_method("GET")
                .with_header("Accept", "application/json")
                .with_header("X-Partner-Digest", "k1"),
        );

        assert_eq!(out.status(), 429);
        assert_eq!(out.header("content-type"), Some("application/json"));
        assert_eq!(json_body(&out)["errors"][0]["message"], "quota exceeded");
    }

    #[test]
    fn unknown_action_renders_invalid_action_request() {
        let out = controller().handle(
            RequestContext::new("nope")
                .with_method("GET")
                .with_format(FormatId::new("json"))
                .with_header("X-Partner-Digest", "k1"),
        );

        let body = json_body(&out);
        assert_eq!(out.status(), 400);
        assert_eq!(body["errors"][0]["name"], ERROR_INVALID_ACTION_REQUEST_NAME);
        assert_eq!(body["errors"][0]["at"], "nope");
    }

    #[test]
    fn unknown_format_falls_back_to_plain_text() {
        let out = controller().handle(
            RequestContext::new("ping")
                .with_method("GET")
                .with_format(FormatId::new("yaml")),
        );

        assert_eq!(out.status(), 400);
        assert_eq!(out.header("content-type"), Some("text/plain; charset=utf-8"));
    }

    #[test]
    fn rejected_request_renders_error_without_running_action() {
        let backend = Arc::new(CountingBackend {
            answer: Ok(true),
            calls: Mutex::new(0),
        });
        let out = controller_with(backend.clone()).reject(
            RequestContext::new("quota")
                .with_method("POST")
                .with_header("Accept", "application/json"),
            ApiError::new("ERROR_REQUEST_BODY", "length limit exceeded", 413),
        );

        assert_eq!(out.status(), 413);
        assert_eq!(out.header("content-type"), Some("application/json"));
        assert_eq!(json_body(&out)["errors"][0]["name"], "ERROR_REQUEST_BODY");
        assert_eq!(*backend.calls.lock().unwrap(), 0);
    }
}
