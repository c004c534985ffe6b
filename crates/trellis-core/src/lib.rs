//! Trellis Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Trellis topic
//! engine and its front ends. It includes:
//!
//! - **Identifiers**: Node, edge, diagram and arguable identifiers plus the
//!   topic-wide id allocator ([`identifier`] module)
//! - **Geometry**: Points produced by layout engines ([`geometry`] module)
//! - **Scores**: The ordered score scale ([`score::Score`])
//! - **Schema**: Node types, relations and the type schema that licenses them
//!   ([`schema`] module)

pub mod geometry;
pub mod identifier;
pub mod schema;
pub mod score;
