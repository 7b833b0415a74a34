//! Core types for abap-scope.
//!
//! Provides the transient analysis model ([`model::DependencyReport`],
//! [`model::MethodDependencies`], [`model::TableFieldMap`]), the error taxonomy
//! shared by the extraction engine, the ordered-unique collection used by every
//! extractor, and the project configuration loader.

pub mod config;
pub mod error;
pub mod model;
pub mod ordered;
