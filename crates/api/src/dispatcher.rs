//! Per-request dispatch: resolve, bind, invoke, normalize, render.
//!
//! ```text
//! process_action:  resolve action by name → bind params/files
//! (authorization runs here, in the request lifecycle)
//! process_output:  verb → entry point → ActionResult → Envelope
//!                  → renderer(format, negotiation) → RenderedOutput
//! process_error:   ApiError → error map → same renderer path
//! ```
//!
//! A `Dispatcher` lives for exactly one request and holds no shared mutable
//! state.

use tracing::debug;

use frontdesk_core::{
    ActionName, ApiError, DispatchError, FormatId, HttpVerb, RequestContext, ResolutionFailure,
};

use crate::action::{Action, ActionOutcome, ActionRegistry};
use crate::negotiation;
use crate::output::{OutputRegistry, RenderedOutput, Renderer, ResponseMeta};

/// Action tag set on the error path so error templates are distinguishable
/// from success templates.
pub const DEFAULT_ERROR_ACTION: &str = "defaultError";

pub struct Dispatcher<'a> {
    ctx: &'a RequestContext,
    actions: &'a dyn ActionRegistry,
    outputs: &'a dyn OutputRegistry,
    action: Option<Box<dyn Action>>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        ctx: &'a RequestContext,
        actions: &'a dyn ActionRegistry,
        outputs: &'a dyn OutputRegistry,
    ) -> Self {
        Self {
            ctx,
            actions,
            outputs,
            action: None,
        }
    }

    pub fn context(&self) -> &'a RequestContext {
        self.ctx
    }

    /// The format used to pick a renderer: the one set on the context, or
    /// the default.
    pub fn get_format(&self) -> FormatId {
        self.ctx.format().cloned().unwrap_or_default()
    }

    /// Resolve `name` and keep the instance for the rest of the request.
    pub fn get_action_instance(
        &mut self,
        name: &ActionName,
    ) -> Result<&mut dyn Action, DispatchError> {
        let action = self.actions.resolve(name)?;
        Ok(&mut **self.action.insert(action))
    }

    /// Resolve a renderer for `format`, passing the negotiation outcome as
    /// its options.
    pub fn get_output_instance(&self, format: &FormatId) -> Result<Box<dyn Renderer>, DispatchError> {
        let options = negotiation::detect_mime_type(self.ctx.headers());
        Ok(self.outputs.resolve(format, options)?)
    }

    /// Resolve the requested action and bind the request's inputs to it,
    /// without running it.
    pub fn process_action(&mut self) -> Result<(), DispatchError> {
        let ctx = self.ctx;
        let action = self.get_action_instance(ctx.action())?;
        action.set_action_params(ctx.params().clone());
        action.set_action_files(ctx.files().to_vec());

        debug!(
            action = %ctx.action(),
            params = ctx.params().len(),
            files = ctx.files().len(),
            "action bound"
        );
        Ok(())
    }

    /// Run the bound action for the request's verb and render its result.
    pub fn process_output(&mut self) -> Result<RenderedOutput, DispatchError> {
        let verb = HttpVerb::from_method(self.ctx.method());
        let action = self
            .action
            .as_deref_mut()
            .ok_or(ResolutionFailure::ActionNotBound)?;

        debug!(action = %self.ctx.action(), entry_point = verb.entry_point(), "invoking action");
        let envelope = invoke(action, verb).map_err(DispatchError::Action)?.into_envelope();

        let template = envelope
            .template()
            .map(str::to_string)
            .or_else(|| action.template_file_name());

        let mut renderer = self.get_output_instance(&self.get_format())?;
        renderer.set_output_action(self.ctx.action().as_str());
        renderer.populate_output(envelope.data().clone(), template.as_deref());
        renderer.send_headers(ResponseMeta::Success(&envelope));
        renderer.execute_output()
    }

    /// Render `error` through the same renderer path as a success.
    pub fn process_error(&self, error: &ApiError) -> Result<RenderedOutput, DispatchError> {
        let mut renderer = self.get_output_instance(&self.get_format())?;
        renderer.set_output_action(DEFAULT_ERROR_ACTION);
        renderer.populate_output(error.to_error_map(), None);
        renderer.send_headers(ResponseMeta::Error(error));
        renderer.execute_output()
    }
}

fn invoke(action: &mut dyn Action, verb: HttpVerb) -> ActionOutcome {
    match verb {
        HttpVerb::Get => action.execute_get(),
        HttpVerb::Post => action.execute_post(),
        HttpVerb::Put => action.execute_put(),
        HttpVerb::Delete => action.execute_delete(),
        HttpVerb::Head => action.execute_head(),
        HttpVerb::Other => action.execute_action(),
    }
}
