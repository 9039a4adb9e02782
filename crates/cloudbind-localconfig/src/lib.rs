//! # cloudbind-localconfig
//!
//! Locates an external properties source through a fixed precedence chain:
//! a system-level override key, then a literal path key in a designated
//! resource, then a path template with `${var}` placeholders. The locator
//! performs only first-match selection; merging with other configuration
//! sources belongs to a higher layer.

pub mod loader;
pub mod locator;
pub mod properties;
