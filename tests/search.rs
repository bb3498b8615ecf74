//! Search Integration Tests
//!
//! Tests for exact-title queries and insertion order.

use bookshop::{Book, Catalog};

fn catalog_with_titles(titles: &[&str]) -> Catalog {
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| Book::new(format!("Author {}", i), *title, i as f64))
        .collect()
}

#[test]
fn test_find_by_title_returns_matches_in_order() {
    let catalog = catalog_with_titles(&["A", "B", "A"]);

    let matches: Vec<_> = catalog.find_by_title("A").collect();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].author(), "Author 0");
    assert_eq!(matches[1].author(), "Author 2");

    // No match is not an error, just nothing
    assert_eq!(catalog.find_by_title("C").count(), 0);
}

#[test]
fn test_find_by_title_is_exact() {
    let catalog = catalog_with_titles(&["Pan Tadeusz", "pan tadeusz", "Pan Tadeusz, Księga I"]);

    let matches: Vec<_> = catalog.find_by_title("Pan Tadeusz").collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].author(), "Author 0");

    assert_eq!(catalog.find_by_title("").count(), 0);
}

#[test]
fn test_find_on_empty_catalog() {
    let catalog = Catalog::new();
    assert!(catalog.find_by_title("Anything").next().is_none());
}

#[test]
fn test_query_with_custom_predicate() {
    let catalog = catalog_with_titles(&["A", "B", "C", "D"]);

    let expensive: Vec<_> = catalog
        .query(|book| book.price() >= 2.0)
        .map(Book::title)
        .collect();
    assert_eq!(expensive, vec!["C", "D"]);
}

#[test]
fn test_iteration_preserves_insertion_order() {
    let mut catalog = Catalog::new();
    let r1 = Book::new("Same", "Same", 1.0);
    let r2 = Book::new("Other", "Other", 2.0);
    let r3 = Book::new("Same", "Same", 1.0);

    catalog.add(r1.clone());
    catalog.add(r2.clone());
    catalog.add(r3.clone());

    // Repeated passes visit the same sequence
    for _ in 0..3 {
        let seen: Vec<_> = catalog.iter().cloned().collect();
        assert_eq!(seen, vec![r1.clone(), r2.clone(), r3.clone()]);
    }

    let mut out = Vec::new();
    catalog.write_books(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Book: \"Same\", author: Same, price: 1 $.",
            "Book: \"Other\", author: Other, price: 2 $.",
            "Book: \"Same\", author: Same, price: 1 $.",
        ]
    );
}

#[test]
fn test_catalog_extend_and_borrowed_iteration() {
    let mut catalog = catalog_with_titles(&["A"]);
    catalog.extend(vec![Book::new("X", "B", 1.0), Book::new("Y", "C", 2.0)]);

    let mut titles = Vec::new();
    for book in &catalog {
        titles.push(book.title());
    }
    assert_eq!(titles, vec!["A", "B", "C"]);
}
