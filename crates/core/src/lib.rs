//! `frontdesk-core` — request-dispatch primitives shared by every layer.
//!
//! This crate is transport-agnostic: no HTTP framework, no IO. The API crate
//! builds a [`RequestContext`] at the edge and passes it down explicitly.

pub mod action;
pub mod context;
pub mod envelope;
pub mod error;
pub mod format;
pub mod verb;

pub use action::ActionName;
pub use context::{Headers, Params, RequestContext, UploadedFile};
pub use envelope::{ActionResult, Envelope};
pub use error::{ApiError, DispatchError, ResolutionFailure};
pub use format::{DEFAULT_OUTPUT_FORMAT, FormatId, Negotiated};
pub use verb::HttpVerb;
