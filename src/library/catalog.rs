//! Catalog of books with append-only file persistence.
//!
//! Records keep insertion order and duplicates are allowed. Saving appends
//! to the target file; loading appends the file's records to the catalog.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{Book, RecordError};

/// Errors that can occur while persisting or loading a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Bad record #{record} in {}: {source}", .path.display())]
    Record {
        path: PathBuf,
        record: usize,
        #[source]
        source: RecordError,
    },
}

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    /// File the records were appended to
    pub path: PathBuf,

    /// Number of records written
    pub records: usize,

    /// Number of bytes appended
    pub bytes: u64,
}

impl fmt::Display for SaveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Data saved to file: {}", self.path.display())
    }
}

/// Result of a load attempt that did not fail on the data itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// File was read; `records` books were appended
    Loaded { path: PathBuf, records: usize },

    /// File could not be opened; catalog unchanged
    Unavailable { path: PathBuf },
}

impl LoadOutcome {
    /// Number of records appended by this load
    pub fn records(&self) -> usize {
        match self {
            LoadOutcome::Loaded { records, .. } => *records,
            LoadOutcome::Unavailable { .. } => 0,
        }
    }
}

impl fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadOutcome::Loaded { path, .. } => {
                write!(f, "Data loaded from file: {}", path.display())
            }
            LoadOutcome::Unavailable { path } => {
                write!(f, "Cannot open file: {}", path.display())
            }
        }
    }
}

/// Ordered collection of books
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self { books: Vec::new() }
    }

    /// Append a book to the end of the catalog
    pub fn add(&mut self, book: Book) {
        self.books.push(book);
    }

    /// Iterate over all books in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Book> {
        self.books.iter()
    }

    /// Books matching the predicate, in insertion order.
    ///
    /// The iterator is lazy; call again to restart.
    pub fn query<'a, P>(&'a self, mut predicate: P) -> impl Iterator<Item = &'a Book> + 'a
    where
        P: FnMut(&Book) -> bool + 'a,
    {
        self.books.iter().filter(move |book| predicate(*book))
    }

    /// Books whose title is exactly `title` (case-sensitive, no trimming)
    pub fn find_by_title<'a>(&'a self, title: &'a str) -> impl Iterator<Item = &'a Book> + 'a {
        self.query(move |book| book.title() == title)
    }

    /// Write one description line per book to `out`
    pub fn write_books<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for book in &self.books {
            writeln!(out, "{}", book)?;
        }
        Ok(())
    }

    /// Print every book to stdout
    pub fn show_all(&self) {
        for book in &self.books {
            book.print();
        }
    }

    /// Append every book to the file at `path`, one record per line.
    ///
    /// The file is created if missing; existing contents are kept.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<SaveReport, CatalogError> {
        let path = path.as_ref();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| CatalogError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        let write_err = |source: io::Error| CatalogError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = BufWriter::new(file);
        let mut line = Vec::new();
        let mut bytes = 0u64;

        for book in &self.books {
            line.clear();
            book.write_record(&mut line).map_err(write_err)?;
            line.push(b'\n');

            writer.write_all(&line).map_err(write_err)?;
            bytes += line.len() as u64;
        }

        writer.flush().map_err(write_err)?;

        info!(
            path = %path.display(),
            records = self.books.len(),
            bytes,
            "Catalog saved"
        );

        Ok(SaveReport {
            path: path.to_path_buf(),
            records: self.books.len(),
            bytes,
        })
    }

    /// Append the records stored at `path` to this catalog.
    ///
    /// Reading stops at the first incomplete record. A record that fails to
    /// decode ends the load with an error; records before it stay appended.
    pub fn read_from_file(&mut self, path: impl AsRef<Path>) -> Result<LoadOutcome, CatalogError> {
        let path = path.as_ref();

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot open catalog file");
                return Ok(LoadOutcome::Unavailable {
                    path: path.to_path_buf(),
                });
            }
        };

        let mut reader = BufReader::new(file);
        let mut records = 0;

        loop {
            skip_line_breaks(&mut reader).map_err(|source| CatalogError::Read {
                path: path.to_path_buf(),
                source,
            })?;

            match Book::read_record(&mut reader) {
                Ok(Some(book)) => {
                    self.books.push(book);
                    records += 1;
                }
                Ok(None) => break,
                Err(RecordError::Io(source)) => {
                    return Err(CatalogError::Read {
                        path: path.to_path_buf(),
                        source,
                    });
                }
                Err(source) => {
                    return Err(CatalogError::Record {
                        path: path.to_path_buf(),
                        record: records + 1,
                        source,
                    });
                }
            }
        }

        info!(path = %path.display(), records, total = self.books.len(), "Catalog loaded");

        Ok(LoadOutcome::Loaded {
            path: path.to_path_buf(),
            records,
        })
    }

    /// Get the number of books
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl FromIterator<Book> for Catalog {
    fn from_iter<I: IntoIterator<Item = Book>>(iter: I) -> Self {
        Self {
            books: iter.into_iter().collect(),
        }
    }
}

impl Extend<Book> for Catalog {
    fn extend<I: IntoIterator<Item = Book>>(&mut self, iter: I) {
        self.books.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Book;
    type IntoIter = std::slice::Iter<'a, Book>;

    fn into_iter(self) -> Self::IntoIter {
        self.books.iter()
    }
}

/// Consume `\n` and `\r` bytes separating records
fn skip_line_breaks<R: BufRead>(reader: &mut R) -> io::Result<()> {
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(());
        }

        let breaks = buf.iter().take_while(|b| matches!(**b, b'\n' | b'\r')).count();
        let exhausted = breaks == buf.len();
        reader.consume(breaks);

        if !exhausted {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample() -> Catalog {
        [
            Book::new("Adam Mickiewicz", "Pan Tadeusz", 46.99),
            Book::new("Bolesław Prus", "Lalka", 39.5),
            Book::new("Adam Mickiewicz", "Pan Tadeusz", 46.99),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_catalog_add_keeps_order_and_duplicates() {
        let mut catalog = Catalog::new();
        assert!(catalog.is_empty());

        catalog.add(Book::new("A", "R1", 1.0));
        catalog.add(Book::new("A", "R2", 1.0));
        catalog.add(Book::new("A", "R1", 1.0));

        let titles: Vec<_> = catalog.iter().map(Book::title).collect();
        assert_eq!(titles, vec!["R1", "R2", "R1"]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_find_by_title_exact_match() {
        let catalog = sample();

        assert_eq!(catalog.find_by_title("Pan Tadeusz").count(), 2);
        assert_eq!(catalog.find_by_title("Lalka").count(), 1);

        // No case folding, trimming or partial matches
        assert_eq!(catalog.find_by_title("pan tadeusz").count(), 0);
        assert_eq!(catalog.find_by_title("Pan Tadeusz ").count(), 0);
        assert_eq!(catalog.find_by_title("Pan").count(), 0);
    }

    #[test]
    fn test_query_is_restartable() {
        let catalog = sample();
        let cheap = || catalog.query(|b| b.price() < 40.0);

        assert_eq!(cheap().count(), 1);
        assert_eq!(cheap().next().map(Book::title), Some("Lalka"));
    }

    #[test]
    fn test_write_books() {
        let catalog = sample();
        let mut out = Vec::new();
        catalog.write_books(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "Book: \"Lalka\", author: Bolesław Prus, price: 39.5 $."
        );
    }

    #[test]
    fn test_skip_line_breaks() {
        let mut cursor = Cursor::new(b"\r\n\nabc".to_vec());
        skip_line_breaks(&mut cursor).unwrap();

        let mut rest = String::new();
        std::io::Read::read_to_string(&mut cursor, &mut rest).unwrap();
        assert_eq!(rest, "abc");
    }

    #[test]
    fn test_load_outcome_messages() {
        let missing = LoadOutcome::Unavailable {
            path: PathBuf::from("nope.txt"),
        };
        assert_eq!(missing.to_string(), "Cannot open file: nope.txt");
        assert_eq!(missing.records(), 0);

        let loaded = LoadOutcome::Loaded {
            path: PathBuf::from("books.txt"),
            records: 2,
        };
        assert_eq!(loaded.to_string(), "Data loaded from file: books.txt");
        assert_eq!(loaded.records(), 2);
    }
}
