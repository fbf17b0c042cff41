//! Chorus Core Types and Definitions
//!
//! This crate provides the foundational types for importing BPMN choreography
//! diagrams. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Geometry**: Points, sizes and bounds ([`geometry`] module)
//! - **Semantic**: The business-process model elements ([`semantic`] module)
//! - **DI**: Diagram-interchange geometry records ([`di`] module)
//! - **Model**: Elements and DI bundled together ([`model::Model`])
//! - **Text**: Label text measurement ([`text`] module)

pub mod di;
pub mod error;
pub mod geometry;
pub mod identifier;
pub mod model;
pub mod semantic;
pub mod text;
