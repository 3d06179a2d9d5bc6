//! Session token sources.
//!
//! # Design
//! - Token storage is owned elsewhere; this crate only reads it, synchronously,
//!   right before each request.
//! - Blank tokens count as absent so callers fail fast with `AuthMissing`.

/// Synchronous provider of the current bearer token.
pub trait TokenSource: Send + Sync {
    /// Current token, or `None` when signed out.
    fn token(&self) -> Option<String>;
}

fn usable(token: Option<String>) -> Option<String> {
    token
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Fixed token supplied at startup (flags, tests).
#[derive(Clone, Debug, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    /// Source that always yields `token`.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    /// Source that is always signed out.
    #[must_use]
    pub const fn absent() -> Self {
        Self(None)
    }

    /// Source built from an optional value.
    #[must_use]
    pub const fn from_option(token: Option<String>) -> Self {
        Self(token)
    }
}

impl TokenSource for StaticToken {
    fn token(&self) -> Option<String> {
        usable(self.0.clone())
    }
}

/// Token read from an environment variable on every call.
#[derive(Clone, Debug)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    /// Read the token from `var`.
    #[must_use]
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl TokenSource for EnvToken {
    fn token(&self) -> Option<String> {
        usable(std::env::var(&self.var).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_tokens_are_absent() {
        assert_eq!(StaticToken::new("   ").token(), None);
        assert_eq!(StaticToken::absent().token(), None);
        assert_eq!(StaticToken::new(" abc ").token().as_deref(), Some("abc"));
    }

    #[test]
    fn env_token_reads_missing_variable_as_absent() {
        let source = EnvToken::new("STOREDESK_TEST_TOKEN_THAT_IS_NEVER_SET");
        assert_eq!(source.token(), None);
    }
}
