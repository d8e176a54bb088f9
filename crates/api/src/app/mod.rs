//! HTTP host: Axum router around the [`FrontController`].
//!
//! - `request.rs`: HTTP request → `RequestContext` (routing, params)
//!
//! Every path goes through a single fallback handler; the path names the
//! action, not a route table.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, Bytes},
    extract::{State, rejection::BytesRejection},
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::Response,
};
use tracing::warn;

use frontdesk_auth::{PublicActions, StaticPartnerBackend};
use frontdesk_core::ApiError;

use crate::builtin;
use crate::config::FrontdeskConfig;
use crate::controller::FrontController;
use crate::output::{RenderedOutput, StaticOutputRegistry};

pub mod request;

/// Error name for a request body that could not be read.
pub const ERROR_REQUEST_BODY_NAME: &str = "ERROR_REQUEST_BODY";

/// Wire the built-in actions, renderers and partner backend from config.
pub fn build_controller(config: &FrontdeskConfig) -> FrontController {
    FrontController::new(
        Arc::new(builtin::registry()),
        Arc::new(StaticOutputRegistry::with_defaults()),
        Arc::new(PublicActions::new(config.public_actions.iter().cloned())),
        Arc::new(StaticPartnerBackend::new(config.partner_digests.iter().cloned())),
    )
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(controller: Arc<FrontController>) -> Router {
    Router::new().fallback(dispatch).with_state(controller)
}

async fn dispatch(
    State(controller): State<Arc<FrontController>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match body {
        Ok(body) => {
            let ctx = request::context_from_parts(&method, &uri, &headers, &body);
            into_response(controller.handle(ctx))
        }
        Err(rejection) => {
            let ctx = request::context_from_parts(&method, &uri, &headers, &[]);
            let api_error = ApiError::new(
                ERROR_REQUEST_BODY_NAME,
                rejection.body_text(),
                rejection.status().as_u16(),
            );
            into_response(controller.reject(ctx, api_error))
        }
    }
}

fn into_response(output: RenderedOutput) -> Response {
    let (status, headers, body) = output.into_parts();

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    for (name, value) in headers {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&value)) {
            (Ok(header), Ok(value)) => {
                response.headers_mut().insert(header, value);
            }
            _ => warn!(header = %name, "dropping invalid response header"),
        }
    }

    response
}
