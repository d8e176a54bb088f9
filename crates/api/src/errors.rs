//! Error translation: every [`DispatchError`] becomes a renderable
//! [`ApiError`].

use frontdesk_core::{ApiError, DispatchError, ResolutionFailure};

use crate::output::RenderedOutput;

pub fn translate(err: DispatchError) -> ApiError {
    match err {
        // Unknown or unbound actions are reported like a failed authorization.
        DispatchError::Resolution(ResolutionFailure::UnknownAction(name)) => {
            ApiError::invalid_action_request().with_at(name.as_str())
        }
        DispatchError::Resolution(ResolutionFailure::ActionNotBound) => {
            ApiError::invalid_action_request()
        }
        DispatchError::Resolution(ResolutionFailure::UnknownFormat(format)) => {
            ApiError::invalid_output_format(&format)
        }
        DispatchError::Authorization(err) | DispatchError::Backend(err) | DispatchError::Action(err) => err,
        DispatchError::Rendering(msg) => ApiError::rendering(msg),
    }
}

/// Plain-text response for when not even the error path can render.
pub fn fallback_output(error: &ApiError) -> RenderedOutput {
    RenderedOutput::new(
        error.status(),
        vec![("Content-Type".to_string(), "text/plain; charset=utf-8".to_string())],
        error.to_string().into_bytes(),
    )
}
