//! In-memory book catalog with file persistence.
//!
//! # File Layout
//!
//! ```text
//! books.txt                     # One record per line, append-only
//!   Pan Tadeusz;Adam Mickiewicz;46.99;
//!   Lalka;Bolesław Prus;39.5;
//! ```

pub mod catalog;

pub use catalog::{Catalog, CatalogError, LoadOutcome, SaveReport};
