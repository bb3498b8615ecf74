//! Domain types for the bookshop catalog.
//!
//! - Book: a single catalog record and its delimited text encoding

pub mod book;

pub use book::{Book, RecordError, DELIMITER};
