//! Token construction options

/// Default name given to the structure of a new token.
pub const DEFAULT_STRUCTURE_NAME: &str = "Token";

/// How [`Token::make_writable`](crate::Token::make_writable) treats a
/// shared token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    /// Refuse with `NotWritable`; callers duplicate explicitly.
    #[default]
    Strict,

    /// Duplicate the store into this handle, leaving other holders on
    /// the original.
    CopyOnWrite,
}

/// Configuration applied when a token is created.
///
/// Tokens remember their options, and duplicates inherit them.
///
/// # Example
///
/// ```
/// use permit::{Token, TokenOptions, WritePolicy};
///
/// let opts = TokenOptions::new()
///     .with_structure_name("Session")
///     .with_write_policy(WritePolicy::CopyOnWrite);
/// let token = Token::with_options(opts);
///
/// assert_eq!(token.structure().name(), "Session");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOptions {
    /// Name given to the token's structure
    pub structure_name: String,

    /// Behavior of `make_writable` on shared tokens
    pub write_policy: WritePolicy,
}

impl Default for TokenOptions {
    fn default() -> Self {
        Self {
            structure_name: DEFAULT_STRUCTURE_NAME.to_string(),
            write_policy: WritePolicy::default(),
        }
    }
}

impl TokenOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the structure name.
    pub fn with_structure_name(self, name: impl Into<String>) -> Self {
        Self {
            structure_name: name.into(),
            ..self
        }
    }

    /// Set the write policy.
    pub fn with_write_policy(self, write_policy: WritePolicy) -> Self {
        Self {
            write_policy,
            ..self
        }
    }
}
