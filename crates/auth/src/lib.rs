//! `frontdesk-auth` — partner/public authorization boundary.
//!
//! This crate is decoupled from HTTP and from credential storage: the
//! backend that actually verifies a partner is injected via
//! [`PartnerBackend`].

pub mod authorize;
pub mod partner;
pub mod public;

pub use authorize::{Authorization, AuthzError, authorize};
pub use partner::{AuthorizationParams, Partner, PartnerBackend, StaticPartnerBackend};
pub use public::PublicActions;
