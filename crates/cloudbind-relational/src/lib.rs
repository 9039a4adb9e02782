//! # cloudbind-relational
//!
//! Relational service support for the cloudbind pipeline: descriptor kinds
//! and standard declared properties for MySQL and PostgreSQL bindings,
//! data-source connector creators, driver selection, and the ordered
//! fallback chain of pooling providers.
//!
//! Created connectors are inert configuration products: no connection is
//! opened and no connectivity is validated here.

pub mod creator;
pub mod datasource;
pub mod descriptor;
pub mod driver;
pub mod pooled;
