//! Factum Core Types
//!
//! This crate provides the foundational types for Factum ORM models:
//!
//! - **Identifiers**: Kind-tagged numeric ids and per-kind issuance
//!   ([`identifier::ObjectId`], [`identifier::IdCounters`])
//! - **Geometry**: Diagram-space points and the circle-boundary anchor
//!   computation ([`geometry`] module)

pub mod geometry;
pub mod identifier;
