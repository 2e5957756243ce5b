//! # Permit
//!
//! Reference-counted, copy-on-write authorization tokens.
//!
//! A [`Token`] carries the outcome of authenticating a client: a named
//! set of typed fields (roles, permission flags, identity claims). Tokens
//! are shared by cloning the handle, which bumps an atomic reference count
//! rather than copying the fields. Shared tokens are read-only; a handle
//! may mutate its fields only while it is the sole owner, and callers that
//! need to change a shared token [`duplicate`](Token::duplicate) it first.
//!
//! ## Architecture
//!
//! - **Token**: shared handle with a runtime uniqueness check on writes
//! - **UniqueToken**: single-owner variant, writable without any check
//! - **Structure**: the named, ordered field store a token owns
//! - **Value**: the typed payload of a field
//!
//! ## Example
//!
//! ```
//! use permit::{fields, Token};
//!
//! let mut token = Token::new();
//! token.set_string(fields::MEDIA_FACTORY_ROLE, "admin").unwrap();
//! token.set_bool("media.factory.access", true).unwrap();
//!
//! let per_request = token.share();
//! assert!(per_request.is_allowed("media.factory.access"));
//! assert!(!token.is_writable());
//!
//! let mut private = per_request.duplicate();
//! private.set_bool("media.factory.access", false).unwrap();
//! assert!(per_request.is_allowed("media.factory.access"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod fields;
pub mod options;
pub mod structure;
pub mod token;
pub mod value;

// Re-export main types
pub use error::{PermitError, Result, StructureError, TokenError};
pub use options::{TokenOptions, WritePolicy, DEFAULT_STRUCTURE_NAME};
pub use structure::Structure;
pub use token::{Token, UniqueToken};
pub use value::Value;

/// Permit version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
