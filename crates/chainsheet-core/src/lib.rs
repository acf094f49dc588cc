//! # Chainsheet Core - Supply-Chain Template Extraction
//!
//! Extracts structured supply-chain documentation from vendor-supplied
//! spreadsheet templates. The input is a [`Grid`] of [`Cell`]s; the output is
//! a [`ParsedSheet`] with four independent results:
//!
//! - **Header**: vendor and item identifiers, ship date, PO quantity
//! - **Components**: material breakdown with percentages and origins
//! - **Nodes**: the chain of document groups between trading parties
//! - **Details**: free-floating `(Role)` evidence blocks
//!
//! Every extractor is label-anchored and tolerant: a missing section yields an
//! empty result, never an error. Reading files into a grid lives in
//! `chainsheet-backend`.
//!
//! ## Quick Start
//!
//! ```rust
//! use chainsheet_core::{parse_grid, Grid};
//!
//! let grid = Grid::from_text_rows(&[
//!     &["Vendor Number", "V-1001"],
//!     &["Component Breakdown", ""],
//!     &["Cotton", "100%"],
//! ]);
//! let parsed = parse_grid(&grid);
//! assert_eq!(parsed.components[0].name, "Cotton");
//! assert_eq!(parsed.components[0].percent, Some(100.0));
//! ```
//!
//! ## Template Layout
//!
//! Node rows and detail-block offsets are fixed by the template. Their
//! defaults live in [`TemplateSchema`]; use [`parse_grid_with`] to parse a
//! revised template without code changes.

pub mod cell;
pub mod classify;
pub mod components;
pub mod details;
pub mod error;
pub mod grid;
pub mod header;
pub mod nodes;
pub mod parse;
pub mod record;
pub mod template;

/// Placeholder emitted where a required string field has no value
pub const NONE_SENTINEL: &str = "none";

pub use cell::{Cell, DATE_FORMAT};
pub use classify::CellKind;
pub use components::{extract_components, Component};
pub use details::{extract_detail_blocks, DetailBlock};
pub use error::*;
pub use grid::{Grid, GridBuilder};
pub use header::{extract_header, Header, HeaderValue};
pub use nodes::{extract_nodes, Node, PartyBox};
pub use parse::{parse_grid, parse_grid_with, ParsedSheet};
pub use record::{UploadRecord, UploadStatus, UploadSummary};
pub use template::{DetailLayout, NodeLayout, TemplateSchema};
