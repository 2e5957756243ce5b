//! Well-known field names
//!
//! Authentication layers populate these when building a token; request
//! handlers read them back. Nothing in this crate interprets them.

/// Role used to look up permissions on a media factory (String).
pub const MEDIA_FACTORY_ROLE: &str = "media.factory.role";

/// Client-provided transport settings the session may honor (String).
pub const TRANSPORT_CLIENT_SETTINGS: &str = "transport.client-settings";
