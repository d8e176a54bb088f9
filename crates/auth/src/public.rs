use std::collections::HashSet;

use frontdesk_core::ActionName;

/// Actions exempt from partner authorization.
///
/// Built once at startup and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicActions(HashSet<ActionName>);

impl PublicActions {
    pub fn new<I, A>(actions: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<ActionName>,
    {
        Self(actions.into_iter().map(Into::into).collect())
    }

    pub fn is_public(&self, action: &ActionName) -> bool {
        self.0.contains(action)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_is_exact() {
        let public = PublicActions::new(["ping", "status"]);
        assert!(public.is_public(&ActionName::new("ping")));
        assert!(!public.is_public(&ActionName::new("Ping")));
        assert!(!public.is_public(&ActionName::new("users/list")));
        assert_eq!(public.len(), 2);
    }
}
