//! Reference-counted authorization token
//!
//! A [`Token`] is a cheap-to-clone handle onto a [`Structure`]. Every clone
//! bumps an atomic reference count instead of copying the fields, so a
//! token can be handed to any number of request contexts and read
//! concurrently. Mutation goes through [`Token::writable_structure`], which
//! only succeeds while the handle is the sole owner.

mod unique;

pub use unique::UniqueToken;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{Result, TokenError};
use crate::options::{TokenOptions, WritePolicy};
use crate::structure::Structure;
use crate::value::Value;

/// A shared, copy-on-write set of authorization fields.
///
/// # Example
///
/// ```
/// use permit::{Token, TokenError};
///
/// let mut token = Token::new();
/// token.set_string("role", "admin").unwrap();
///
/// // Hand a second handle to another context
/// let mut shared = token.share();
/// assert_eq!(
///     shared.writable_structure().unwrap_err(),
///     TokenError::NotWritable { ref_count: 2 }
/// );
/// assert_eq!(shared.get_string("role"), Some("admin"));
///
/// // Once the first handle is gone the survivor may write again
/// token.release();
/// assert!(shared.writable_structure().is_ok());
/// ```
#[derive(Clone)]
pub struct Token {
    /// The store, shared between every handle of this token
    inner: Arc<Structure>,

    /// Behavior of `make_writable` for this handle
    policy: WritePolicy,
}

impl Default for Token {
    fn default() -> Self {
        Self::new()
    }
}

impl Token {
    /// Create a new empty token with default options.
    pub fn new() -> Self {
        Self::with_options(TokenOptions::default())
    }

    /// Create a new empty token.
    pub fn with_options(options: TokenOptions) -> Self {
        Self::from_parts(Structure::new_empty(options.structure_name), options.write_policy)
    }

    /// Create a token pre-populated with fields.
    ///
    /// Pairs with an empty name are skipped.
    pub fn from_fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut structure = Structure::new_empty(crate::options::DEFAULT_STRUCTURE_NAME);
        structure.extend(fields);
        Self::from_parts(structure, WritePolicy::default())
    }

    pub(crate) fn from_parts(structure: Structure, policy: WritePolicy) -> Self {
        trace!(name = structure.name(), fields = structure.len(), "created token");
        Self {
            inner: Arc::new(structure),
            policy,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Ownership
    // ═══════════════════════════════════════════════════════════════════

    /// Get another handle to this token.
    ///
    /// The fields are not copied; both handles see the same store and
    /// neither is writable until the other is released.
    pub fn share(&self) -> Token {
        self.clone()
    }

    /// Release this handle.
    ///
    /// The store is freed together with the last handle. Equivalent to
    /// dropping the token.
    pub fn release(self) {
        trace!(remaining = self.ref_count() - 1, "releasing token handle");
        drop(self);
    }

    /// Number of live handles to this token.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Check if this handle is currently the only one.
    ///
    /// Another handle may appear or vanish right after this returns; use
    /// [`writable_structure`](Self::writable_structure) to check and
    /// acquire in one step.
    pub fn is_writable(&self) -> bool {
        self.ref_count() == 1
    }

    /// Check if two handles share the same store.
    pub fn ptr_eq(&self, other: &Token) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// The write policy of this handle.
    pub fn write_policy(&self) -> WritePolicy {
        self.policy
    }

    /// Deep-copy the fields into a new token with a single handle.
    ///
    /// Works whether or not `self` is shared. The copy inherits this
    /// handle's write policy.
    pub fn duplicate(&self) -> Token {
        debug!(
            name = self.inner.name(),
            fields = self.inner.len(),
            ref_count = self.ref_count(),
            "duplicating token"
        );
        Token {
            inner: Arc::new(Structure::clone(&self.inner)),
            policy: self.policy,
        }
    }

    /// Convert into a [`UniqueToken`] if this is the last handle.
    ///
    /// Returns the handle unchanged when it is still shared.
    pub fn try_unique(self) -> std::result::Result<UniqueToken, Token> {
        let policy = self.policy;
        Arc::try_unwrap(self.inner)
            .map(|structure| UniqueToken::from_parts(structure, policy))
            .map_err(|inner| Token { inner, policy })
    }

    /// Convert into a [`UniqueToken`], copying the fields if other
    /// handles exist.
    pub fn into_unique(self) -> UniqueToken {
        match self.try_unique() {
            Ok(unique) => unique,
            Err(shared) => {
                let policy = shared.policy;
                UniqueToken::from_parts(Structure::clone(&shared.inner), policy)
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Structure Access
    // ═══════════════════════════════════════════════════════════════════

    /// Read-only view of the token's fields.
    ///
    /// The view borrows this handle and cannot outlive it.
    pub fn structure(&self) -> &Structure {
        &self.inner
    }

    /// Mutable view of the token's fields.
    ///
    /// The uniqueness check and the acquisition of the view are a single
    /// atomic step, and the `&mut` borrow keeps this handle from being
    /// shared while the view is alive.
    ///
    /// # Errors
    ///
    /// - `NotWritable` if other handles to this token exist
    pub fn writable_structure(&mut self) -> std::result::Result<&mut Structure, TokenError> {
        // No weak handles are ever created, so get_mut fails only while
        // the strong count is above one.
        let ref_count = self.ref_count();
        Arc::get_mut(&mut self.inner).ok_or_else(|| {
            debug!(ref_count, "refused write to shared token");
            TokenError::NotWritable { ref_count }
        })
    }

    /// Mutable view of the token's fields, following the handle's
    /// [`WritePolicy`].
    ///
    /// Under `Strict` this is [`writable_structure`](Self::writable_structure).
    /// Under `CopyOnWrite` a shared handle is first detached onto a
    /// private copy; other handles keep the original fields.
    pub fn make_writable(&mut self) -> std::result::Result<&mut Structure, TokenError> {
        match self.policy {
            WritePolicy::Strict => self.writable_structure(),
            WritePolicy::CopyOnWrite => {
                let ref_count = self.ref_count();
                if ref_count > 1 {
                    debug!(ref_count, "copying shared token on write");
                }
                Ok(Arc::make_mut(&mut self.inner))
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Field Access
    // ═══════════════════════════════════════════════════════════════════

    /// Look up a field by name.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.inner.get(name)
    }

    /// Look up a string field.
    ///
    /// Returns `None` if the field is absent or not a string.
    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.get_field(name).and_then(Value::as_str)
    }

    /// Check a permission flag.
    ///
    /// True only when the field exists and is `Bool(true)`.
    pub fn is_allowed(&self, name: &str) -> bool {
        self.get_field(name)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Set a field through the writable view.
    ///
    /// # Errors
    ///
    /// - `NotWritable` if other handles to this token exist
    /// - `InvalidFieldName` if `name` is empty
    pub fn set_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>> {
        Ok(self.writable_structure()?.set(name, value)?)
    }

    /// Set a string field. See [`set_field`](Self::set_field).
    pub fn set_string(&mut self, name: impl Into<String>, value: &str) -> Result<()> {
        self.set_field(name, value).map(|_| ())
    }

    /// Set a boolean field. See [`set_field`](Self::set_field).
    pub fn set_bool(&mut self, name: impl Into<String>, value: bool) -> Result<()> {
        self.set_field(name, value).map(|_| ())
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.inner == *other.inner
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("ref_count", &self.ref_count())
            .field("policy", &self.policy)
            .field("structure", &self.inner)
            .finish()
    }
}

impl From<Structure> for Token {
    fn from(structure: Structure) -> Self {
        Self::from_parts(structure, WritePolicy::default())
    }
}

/// Views borrow the handle they came from.
///
/// A read-only view stays usable until its handle is released:
///
/// ```
/// let mut t = permit::Token::new();
/// t.set_string("role", "admin").unwrap();
/// let view = t.structure();
/// assert!(view.get("role").is_some());
/// t.release();
/// ```
///
/// ```compile_fail
/// let mut t = permit::Token::new();
/// t.set_string("role", "admin").unwrap();
/// let view = t.structure();
/// t.release();
/// assert!(view.get("role").is_some());
/// ```
///
/// A writable view keeps the handle from being shared while it is alive:
///
/// ```compile_fail
/// let mut t = permit::Token::new();
/// let s = t.writable_structure().unwrap();
/// let _other = t.share();
/// s.set("role", "admin").unwrap();
/// ```
///
/// A released handle cannot be used again:
///
/// ```compile_fail
/// let t = permit::Token::new();
/// t.release();
/// assert_eq!(t.ref_count(), 0);
/// ```
mod compile_tests {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PermitError;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_token_is_send_sync() {
        assert_send_sync::<Token>();
        assert_send_sync::<Value>();
    }

    #[test]
    fn test_new_has_single_handle() {
        let mut t = Token::new();
        assert_eq!(t.ref_count(), 1);
        assert!(t.is_writable());
        assert!(t.writable_structure().is_ok());
        assert_eq!(t.structure().name(), "Token");
        assert!(t.structure().is_empty());
    }

    #[test]
    fn test_share_aliases_store() {
        let t = Token::new();
        let s = t.share();
        assert!(t.ptr_eq(&s));
        assert_eq!(t.ref_count(), 2);
        assert_eq!(s.ref_count(), 2);
    }

    #[test]
    fn test_writable_refused_when_shared() {
        let mut t = Token::new();
        let mut s = t.share();
        assert_eq!(
            t.writable_structure().unwrap_err(),
            TokenError::NotWritable { ref_count: 2 }
        );
        assert!(s.writable_structure().is_err());

        s.release();
        assert!(t.writable_structure().is_ok());
    }

    #[test]
    fn test_set_field_on_shared_token() {
        let mut t = Token::new();
        let _s = t.share();
        assert_eq!(
            t.set_string("role", "admin"),
            Err(PermitError::Token(TokenError::NotWritable { ref_count: 2 }))
        );
        assert_eq!(t.get_field("role"), None);
    }

    #[test]
    fn test_duplicate_is_private() {
        let mut t = Token::new();
        t.set_string("role", "user").unwrap();
        let _s = t.share();

        let mut d = t.duplicate();
        assert_eq!(d.ref_count(), 1);
        assert!(!d.ptr_eq(&t));
        assert_eq!(d, t);

        d.set_string("role", "admin").unwrap();
        assert_eq!(t.get_string("role"), Some("user"));
        assert_eq!(d.get_string("role"), Some("admin"));
    }

    #[test]
    fn test_make_writable_strict() {
        let mut t = Token::new();
        let _s = t.share();
        assert!(t.make_writable().is_err());
    }

    #[test]
    fn test_make_writable_copy_on_write() {
        let opts = TokenOptions::new().with_write_policy(WritePolicy::CopyOnWrite);
        let mut t = Token::with_options(opts);
        t.set_bool("play", true).unwrap();
        let s = t.share();

        t.make_writable().unwrap().set("play", false).unwrap();

        assert!(!t.ptr_eq(&s));
        assert_eq!(t.ref_count(), 1);
        assert_eq!(s.ref_count(), 1);
        assert!(!t.is_allowed("play"));
        assert!(s.is_allowed("play"));
    }

    #[test]
    fn test_make_writable_unique_does_not_copy() {
        let opts = TokenOptions::new().with_write_policy(WritePolicy::CopyOnWrite);
        let mut t = Token::with_options(opts);
        let before = t.structure() as *const Structure;
        let after = t.make_writable().unwrap() as *const Structure;
        assert_eq!(before, after);
    }

    #[test]
    fn test_duplicate_inherits_policy() {
        let opts = TokenOptions::new().with_write_policy(WritePolicy::CopyOnWrite);
        let t = Token::with_options(opts);
        assert_eq!(t.duplicate().write_policy(), WritePolicy::CopyOnWrite);
        assert_eq!(t.share().write_policy(), WritePolicy::CopyOnWrite);
    }

    #[test]
    fn test_try_unique() {
        let t = Token::from_fields([("role", "admin")]);
        let s = t.share();

        let t = t.try_unique().unwrap_err();
        drop(s);
        let unique = t.try_unique().unwrap();
        assert_eq!(unique.structure().get_string("role"), Ok(Some("admin")));
    }

    #[test]
    fn test_into_unique_copies_when_shared() {
        let t = Token::from_fields([("role", "admin")]);
        let s = t.share();
        let mut unique = t.into_unique();
        unique.structure_mut().set("role", "user").unwrap();
        assert_eq!(s.get_string("role"), Some("admin"));
        assert_eq!(s.ref_count(), 1);
    }

    #[test]
    fn test_is_allowed() {
        let t = Token::from_fields([
            ("media.play", Value::Bool(true)),
            ("media.record", Value::Bool(false)),
            ("role", Value::from("admin")),
        ]);
        assert!(t.is_allowed("media.play"));
        assert!(!t.is_allowed("media.record"));
        assert!(!t.is_allowed("role"));
        assert!(!t.is_allowed("missing"));
    }

    #[test]
    fn test_get_string_wrong_type() {
        let t = Token::from_fields([("uid", 7i64)]);
        assert_eq!(t.get_string("uid"), None);
        assert_eq!(t.get_field("uid"), Some(&Value::I64(7)));
    }

    #[test]
    fn test_debug_output() {
        let t = Token::from_fields([("role", "admin")]);
        assert_eq!(
            format!("{:?}", t),
            "Token { ref_count: 1, policy: Strict, structure: Token, role=\"admin\"; }"
        );
    }
}
