//! Floe Core Types and Definitions
//!
//! This crate provides the foundational types for the Floe push tool:
//!
//! - **Plan**: the declarative input schema describing model objects,
//!   connections, a diagram, and interaction flows ([`plan`] module)
//! - **Content**: derived diagram-content types sent to the remote
//!   modeling service ([`content`] module)
//! - **Geometry**: basic geometric types used by layout ([`geometry`] module)

pub mod content;
pub mod geometry;
pub mod plan;
