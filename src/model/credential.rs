use std::fmt;

/// Keys issued by the illustration provider start with this.
pub const EXPECTED_PREFIX: &str = "sk-";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("An API key is required")]
    Empty,
}

/// Outcome of the superficial format check done on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialCheck {
    Accepted,
    /// Stored anyway; the provider will have the final word.
    UnexpectedPrefix,
}

/// Access token for the illustration provider.
///
/// Lives only in memory for the current session. Never serialized, never logged.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential {
    token: Option<String>,
}

impl Credential {
    pub fn set(&mut self, raw: &str) -> Result<CredentialCheck, CredentialError> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(CredentialError::Empty);
        }

        self.token = Some(token.to_string());

        if token.starts_with(EXPECTED_PREFIX) {
            Ok(CredentialCheck::Accepted)
        } else {
            Ok(CredentialCheck::UnexpectedPrefix)
        }
    }

    pub fn is_set(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    pub fn expose(&self) -> &str {
        self.token.as_deref().unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.token = None;
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = if self.is_set() { "<redacted>" } else { "<empty>" };
        f.debug_struct("Credential").field("token", &shown).finish()
    }
}
