//! Book record and its delimited text encoding.
//!
//! A record is stored as `title;author;price;` with no escaping. A field
//! that itself contains `;` cannot be read back intact.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::num::ParseFloatError;
use std::string::FromUtf8Error;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field terminator in the record encoding
pub const DELIMITER: u8 = b';';

/// Number of fields in one encoded record
const FIELD_COUNT: usize = 3;

/// Errors that can occur while decoding a record
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Invalid price {value:?}: {source}")]
    InvalidPrice {
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("Record field is not valid UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A single book in the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    title: String,
    author: String,
    price: f64,
}

impl Book {
    /// Create a new book. Note the argument order: author first.
    pub fn new(author: impl Into<String>, title: impl Into<String>, price: f64) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            price,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Print the one-line description to stdout
    pub fn print(&self) {
        println!("{}", self);
    }

    /// Append `title;author;price;` to the sink (no trailing newline)
    pub fn write_record<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        self.warn_if_unencodable();
        write!(sink, "{}", Encoded(self))
    }

    /// Encoded record as a string
    pub fn to_record(&self) -> String {
        self.warn_if_unencodable();
        Encoded(self).to_string()
    }

    /// Read one record from the source.
    ///
    /// Returns `Ok(None)` when the source ends before the third delimiter.
    /// On success the source is positioned right after the third delimiter.
    pub fn read_record<R: BufRead>(source: &mut R) -> Result<Option<Self>, RecordError> {
        let mut fields: Vec<String> = Vec::with_capacity(FIELD_COUNT);

        for _ in 0..FIELD_COUNT {
            match read_field(source)? {
                Some(field) => fields.push(field),
                None => return Ok(None),
            }
        }

        let price = parse_price(&fields[2])?;
        let mut fields = fields.into_iter();

        Ok(Some(Self {
            title: fields.next().unwrap_or_default(),
            author: fields.next().unwrap_or_default(),
            price,
        }))
    }

    fn warn_if_unencodable(&self) {
        let unencodable = [&self.title, &self.author]
            .iter()
            .any(|f| f.contains(DELIMITER as char) || f.contains('\n') || f.contains('\r'));

        if unencodable {
            tracing::warn!(
                title = %self.title,
                "Book field contains a delimiter or line break; it will not read back intact"
            );
        }
    }
}

/// On-disk form of a book: `title;author;price;`
struct Encoded<'a>(&'a Book);

impl fmt::Display for Encoded<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let book = self.0;
        write!(f, "{};{};{};", book.title, book.author, book.price)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Book: \"{}\", author: {}, price: {} $.",
            self.title, self.author, self.price
        )
    }
}

/// Read bytes up to and including the next delimiter.
/// Returns `None` if the source ends before a delimiter is found.
fn read_field<R: BufRead>(source: &mut R) -> Result<Option<String>, RecordError> {
    let mut buf = Vec::new();
    source.read_until(DELIMITER, &mut buf)?;

    if buf.last() != Some(&DELIMITER) {
        return Ok(None);
    }
    buf.pop();

    Ok(Some(String::from_utf8(buf)?))
}

fn parse_price(text: &str) -> Result<f64, RecordError> {
    text.trim()
        .parse::<f64>()
        .map_err(|source| RecordError::InvalidPrice {
            value: text.to_string(),
            source,
        })
}
