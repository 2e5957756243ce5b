//! Single-owner token

use tracing::trace;

use super::Token;
use crate::error::StructureError;
use crate::options::{TokenOptions, WritePolicy};
use crate::structure::Structure;
use crate::value::Value;

/// A token with exactly one owner.
///
/// Writes never fail for lack of ownership: there is no reference count
/// to check. Publish it with [`into_shared`](Self::into_shared) once it is
/// populated, after which it can only be read until the shared handles
/// are released again.
///
/// # Example
///
/// ```
/// use permit::{fields, UniqueToken};
///
/// let token = UniqueToken::new()
///     .with_field(fields::MEDIA_FACTORY_ROLE, "admin")
///     .unwrap()
///     .into_shared();
///
/// let for_request = token.share();
/// assert_eq!(for_request.get_string(fields::MEDIA_FACTORY_ROLE), Some("admin"));
/// ```
#[derive(Debug, PartialEq)]
pub struct UniqueToken {
    structure: Structure,
    policy: WritePolicy,
}

impl Default for UniqueToken {
    fn default() -> Self {
        Self::new()
    }
}

impl UniqueToken {
    /// Create a new empty token with default options.
    pub fn new() -> Self {
        Self::with_options(TokenOptions::default())
    }

    /// Create a new empty token.
    pub fn with_options(options: TokenOptions) -> Self {
        Self::from_parts(Structure::new_empty(options.structure_name), options.write_policy)
    }

    pub(crate) fn from_parts(structure: Structure, policy: WritePolicy) -> Self {
        Self { structure, policy }
    }

    /// Read-only view of the fields.
    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Mutable view of the fields.
    pub fn structure_mut(&mut self) -> &mut Structure {
        &mut self.structure
    }

    /// Add a field (builder pattern).
    ///
    /// # Errors
    ///
    /// - `InvalidFieldName` if `name` is empty
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, StructureError> {
        self.structure.set(name, value)?;
        Ok(self)
    }

    /// Publish as a shared token with a single handle.
    pub fn into_shared(self) -> Token {
        trace!(fields = self.structure.len(), "publishing unique token");
        Token::from_parts(self.structure, self.policy)
    }
}

impl From<UniqueToken> for Token {
    fn from(unique: UniqueToken) -> Self {
        unique.into_shared()
    }
}
