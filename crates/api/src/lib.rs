//! HTTP API front controller: negotiation, resolution, dispatch and
//! error rendering, plus the Axum host around them.

pub mod action;
pub mod app;
pub mod builtin;
pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod errors;
pub mod negotiation;
pub mod output;
pub mod renderers;

pub use action::{Action, ActionOutcome, ActionRegistry, StaticActionRegistry};
pub use controller::FrontController;
pub use dispatcher::Dispatcher;
pub use output::{OutputRegistry, RenderedOutput, Renderer, ResponseMeta, StaticOutputRegistry};
