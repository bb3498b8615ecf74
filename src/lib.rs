//! bookshop - Book catalog with delimited file persistence
//!
//! Keeps an ordered, in-memory list of books, answers exact-title queries,
//! and appends/reads records to a semicolon-delimited text file.
//!
//! # File format
//!
//! One record per line, no header and no escaping:
//!
//! ```text
//! <title>;<author>;<price>;
//! ```
//!
//! # Modules
//!
//! - `domain`: The book record and its encoding
//! - `library`: The catalog, queries and persistence
//! - `config`: Catalog file resolution
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! bookshop add --author "Adam Mickiewicz" --title "Pan Tadeusz" --price 46.99
//! bookshop find "Pan Tadeusz"
//! bookshop --file shelf.txt list --format json
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod library;

// Re-export main types at crate root for convenience
pub use domain::{Book, RecordError};
pub use library::{Catalog, CatalogError, LoadOutcome, SaveReport};
