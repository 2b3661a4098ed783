use std::fmt;

// Access/refresh pair for an authenticated organizer session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub access: String,
    pub refresh: String,
}

impl Credential {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }
}

// Tokens never reach logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}
