//! Domain types shared across the Foodgram service.
//!
//! This crate contains only pure types and helpers with no framework
//! dependencies.

pub mod bounds;
pub mod pagination;
pub mod slug;
