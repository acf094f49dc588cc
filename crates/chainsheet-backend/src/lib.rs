//! # Chainsheet Backend - Grid Sources
//!
//! Decoders that turn uploaded files into a [`chainsheet_core::Grid`]:
//!
//! - [`XlsxBackend`]: first worksheet of `.xlsx`, `.xlsm`, `.xls`, `.xlsb`
//!   and `.ods` workbooks, via calamine
//! - [`CsvBackend`]: `.csv` / `.tsv` exports, delimiter sniffed
//!
//! [`parse_file`] picks the source by extension, loads the grid and runs the
//! extractors.
//!
//! ```rust,no_run
//! use chainsheet_backend::parse_file;
//! use chainsheet_core::TemplateSchema;
//!
//! let parsed = parse_file("supply_map.xlsx", &TemplateSchema::default())?;
//! println!("{} nodes", parsed.nodes.len());
//! # Ok::<(), chainsheet_core::ChainsheetError>(())
//! ```

pub mod converter;
pub mod csv;
pub mod format;
pub mod traits;
pub mod xlsx;

pub use converter::{load_grid, parse_file};
pub use csv::CsvBackend;
pub use format::InputFormat;
pub use traits::GridSource;
pub use xlsx::XlsxBackend;
