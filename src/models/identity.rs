use serde::{Deserialize, Serialize};

/// The authenticated person as reported by the identity provider.
///
/// Embedded verbatim into the session token, so the field names are part of
/// the cookie format.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub username: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, username: impl Into<String>) -> Self {
        Identity {
            name: name.into(),
            username: username.into(),
        }
    }
}
