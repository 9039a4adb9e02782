//! # cloudbind-core
//!
//! The descriptor resolution pipeline: raw platform-supplied service
//! descriptions are resolved into typed descriptors by registered
//! recognizers, composite descriptors are flattened into leaves, and the
//! result is consumed either by the connector creator registry (to build
//! runtime connectors) or by the property projector (to build the exposed
//! `cloud.*` namespace).
//!
//! All registries follow an init-then-freeze lifecycle: registration happens
//! once at startup, after which every lookup is a pure read over immutable
//! data and may run concurrently without locking.

pub mod app;
pub mod cloud;
pub mod descriptor;
pub mod flatten;
pub mod projector;
pub mod registry;
pub mod resolver;
