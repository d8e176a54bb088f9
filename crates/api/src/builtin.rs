//! Actions shipped with the server.

use chrono::{SecondsFormat, Utc};
use serde_json::{Value as JsonValue, json};

use frontdesk_core::{ApiError, Envelope, Params, UploadedFile};

use crate::action::{Action, ActionOutcome, StaticActionRegistry};

/// Liveness check; public by default.
#[derive(Debug, Default)]
pub struct PingAction;

impl Action for PingAction {
    fn set_action_params(&mut self, _params: Params) {}

    fn set_action_files(&mut self, _files: Vec<UploadedFile>) {}

    fn execute_action(&mut self) -> ActionOutcome {
        Ok(json!({
            "meta": "pong",
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        })
        .into())
    }
}

/// Echoes bound parameters and uploaded file names back.
///
/// `POST` answers `201`; `DELETE` is refused.
#[derive(Debug, Default)]
pub struct EchoAction {
    params: Params,
    files: Vec<UploadedFile>,
}

impl EchoAction {
    fn echo(&self) -> JsonValue {
        json!({
            "params": self.params,
            "files": self.files.iter().map(|f| f.file_name.as_str()).collect::<Vec<_>>(),
        })
    }
}

impl Action for EchoAction {
    fn set_action_params(&mut self, params: Params) {
        self.params = params;
    }

    fn set_action_files(&mut self, files: Vec<UploadedFile>) {
        self.files = files;
    }

    fn execute_post(&mut self) -> ActionOutcome {
        Ok(Envelope::new(self.echo()).with_status(201).into())
    }

    fn execute_delete(&mut self) -> ActionOutcome {
        Err(ApiError::new("ERROR_METHOD_NOT_ALLOWED", "echo cannot be deleted", 405))
    }

    fn execute_action(&mut self) -> ActionOutcome {
        Ok(self.echo().into())
    }

    fn template_file_name(&self) -> Option<String> {
        Some("echo".to_string())
    }
}

/// Registry holding the built-in actions (`ping`, `echo`).
pub fn registry() -> StaticActionRegistry {
    StaticActionRegistry::new()
        .register("ping", || Box::new(PingAction))
        .register("echo", || Box::new(EchoAction::default()))
}
