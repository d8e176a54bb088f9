//! Actions and the action resolver.

use std::collections::HashMap;
use std::sync::Arc;

use frontdesk_core::{ActionName, ActionResult, ApiError, Params, ResolutionFailure, UploadedFile};

/// What an entry point produces: a result to render, or a structured error.
pub type ActionOutcome = Result<ActionResult, ApiError>;

/// A named unit of business logic, instantiated once per request.
///
/// Inputs are bound before execution; exactly one entry point is invoked.
/// Verb-specific entry points default to [`Action::execute_action`].
pub trait Action: Send {
    fn set_action_params(&mut self, params: Params);

    fn set_action_files(&mut self, files: Vec<UploadedFile>);

    fn execute_get(&mut self) -> ActionOutcome {
        self.execute_action()
    }

    fn execute_post(&mut self) -> ActionOutcome {
        self.execute_action()
    }

    fn execute_put(&mut self) -> ActionOutcome {
        self.execute_action()
    }

    fn execute_delete(&mut self) -> ActionOutcome {
        self.execute_action()
    }

    fn execute_head(&mut self) -> ActionOutcome {
        self.execute_action()
    }

    /// Generic entry point for verbs without a dedicated one.
    fn execute_action(&mut self) -> ActionOutcome;

    /// Template/view name used by template-driven renderers.
    fn template_file_name(&self) -> Option<String> {
        None
    }
}

/// Maps action names to fresh action instances.
///
/// Name validation lives here; an unknown or disallowed name is a
/// [`ResolutionFailure::UnknownAction`], never a default action.
pub trait ActionRegistry: Send + Sync {
    fn resolve(&self, name: &ActionName) -> Result<Box<dyn Action>, ResolutionFailure>;
}

type ActionFactory = Arc<dyn Fn() -> Box<dyn Action> + Send + Sync>;

/// Registry backed by a fixed name → factory table.
#[derive(Clone, Default)]
pub struct StaticActionRegistry {
    factories: HashMap<ActionName, ActionFactory>,
}

impl StaticActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(mut self, name: impl Into<ActionName>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Action> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    pub fn contains(&self, name: &ActionName) -> bool {
        self.factories.contains_key(name)
    }
}

impl core::fmt::Debug for StaticActionRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut names: Vec<&str> = self.factories.keys().map(ActionName::as_str).collect();
        names.sort_unstable();
        f.debug_struct("StaticActionRegistry").field("actions", &names).finish()
    }
}

impl ActionRegistry for StaticActionRegistry {
    fn resolve(&self, name: &ActionName) -> Result<Box<dyn Action>, ResolutionFailure> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| ResolutionFailure::UnknownAction(name.clone()))
    }
}
