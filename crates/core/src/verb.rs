//! HTTP verb → action entry point mapping.

/// The verbs an action exposes a dedicated entry point for.
///
/// Anything else (PATCH, OPTIONS, a missing method) is `Other` and is routed
/// to the generic entry point.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Other,
}

impl HttpVerb {
    /// Map a request method (case-insensitively) to a verb.
    pub fn from_method(method: Option<&str>) -> Self {
        let Some(method) = method else {
            return Self::Other;
        };

        match method.to_ascii_lowercase().as_str() {
            "get" => Self::Get,
            "post" => Self::Post,
            "put" => Self::Put,
            "delete" => Self::Delete,
            "head" => Self::Head,
            _ => Self::Other,
        }
    }

    /// Name of the entry point this verb invokes (for logs).
    pub fn entry_point(self) -> &'static str {
        match self {
            Self::Get => "execute_get",
            Self::Post => "execute_post",
            Self::Put => "execute_put",
            Self::Delete => "execute_delete",
            Self::Head => "execute_head",
            Self::Other => "execute_action",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_verbs_map_case_insensitively() {
        assert_eq!(HttpVerb::from_method(Some("GET")), HttpVerb::Get);
        assert_eq!(HttpVerb::from_method(Some("post")), HttpVerb::Post);
        assert_eq!(HttpVerb::from_method(Some("Put")), HttpVerb::Put);
        assert_eq!(HttpVerb::from_method(Some("dElEtE")), HttpVerb::Delete);
        assert_eq!(HttpVerb::from_method(Some("HEAD")), HttpVerb::Head);
    }

    #[test]
    fn unmapped_or_missing_method_falls_back() {
        assert_eq!(HttpVerb::from_method(Some("PATCH")), HttpVerb::Other);
        assert_eq!(HttpVerb::from_method(Some("")), HttpVerb::Other);
        assert_eq!(HttpVerb::from_method(None), HttpVerb::Other);
        assert_eq!(HttpVerb::Other.entry_point(), "execute_action");
    }

    proptest! {
        #[test]
        fn any_casing_of_a_known_verb_maps_to_it(
            idx in 0usize..5,
            mask in proptest::collection::vec(any::<bool>(), 6),
        ) {
            let (name, verb) = [
                ("get", HttpVerb::Get),
                ("post", HttpVerb::Post),
                ("put", HttpVerb::Put),
                ("delete", HttpVerb::Delete),
                ("head", HttpVerb::Head),
            ][idx];

            let mixed: String = name
                .chars()
                .zip(mask.iter().cycle())
                .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c })
                .collect();

            prop_assert_eq!(HttpVerb::from_method(Some(&mixed)), verb);
        }

        #[test]
        fn non_verbs_fall_back_to_generic(method in "[a-zA-Z]{1,10}") {
            let lower = method.to_ascii_lowercase();
            prop_assume!(!["get", "post", "put", "delete", "head"].contains(&lower.as_str()));
            prop_assert_eq!(HttpVerb::from_method(Some(&method)), HttpVerb::Other);
        }
    }
}
