/// Identity asserted by a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Identity {
    pub(crate) username: String,
}

/// Proof that the caller owns `username`. Only [`belongs_to`] hands these out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Owner {
    username: String,
}

impl Owner {
    pub(crate) fn username(&self) -> &str {
        &self.username
    }

    #[cfg(test)]
    pub(crate) fn for_tests(username: &str) -> Self {
        Self {
            username: username.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Access {
    Granted(Owner),
    Denied,
}

/// Missing credentials and credentials for someone else are both `Denied`.
pub(crate) fn belongs_to(identity: Option<&Identity>, username: &str) -> Access {
    match identity {
        Some(identity) if identity.username == username => Access::Granted(Owner {
            username: username.to_string(),
        }),
        _ => Access::Denied,
    }
}

#[cfg(test)]
mod tests {
    use super::{Access, Identity, belongs_to};

    fn identity(username: &str) -> Identity {
        Identity {
            username: username.to_string(),
        }
    }

    #[test]
    fn matching_identity_is_granted() {
        match belongs_to(Some(&identity("Dan")), "Dan") {
            Access::Granted(owner) => assert_eq!(owner.username(), "Dan"),
            Access::Denied => panic!("owner must be granted"),
        }
    }

    #[test]
    fn missing_identity_is_denied() {
        assert_eq!(belongs_to(None, "Dan"), Access::Denied);
    }

    #[test]
    fn other_identity_is_denied() {
        assert_eq!(belongs_to(Some(&identity("Bob")), "Dan"), Access::Denied);
    }

    #[test]
    fn username_comparison_is_exact() {
        assert_eq!(belongs_to(Some(&identity("dan")), "Dan"), Access::Denied);
        assert_eq!(belongs_to(Some(&identity("Dan ")), "Dan"), Access::Denied);
    }
}
