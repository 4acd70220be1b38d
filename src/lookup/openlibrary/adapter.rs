//! Adapter layer: Convert Open Library DTOs to domain models
//!
//! This is the ONLY place where Open Library DTO types are converted to
//! domain types.

use super::dto;
use crate::model::ScannedIsbn;

/// Whether an edition response lacks the shape of a real record.
///
/// Open Library has no explicit "not found" field, so a body with neither
/// title nor authors is treated as a miss.
pub fn is_empty_record(book: &dto::BookResponse) -> bool {
    book.title.is_none() && book.authors.is_empty()
}

/// Author key as the API expects it in a path: `/authors/OL1A` -> `authors/OL1A`
pub fn clean_author_key(key: &str) -> &str {
    key.trim_start_matches('/')
}

/// Pick the display name from an author record
pub fn author_name(author: dto::AuthorResponse) -> Option<String> {
    author.name.or(author.personal_name)
}

/// Join resolved author names, skipping ones that could not be resolved
pub fn join_authors(names: Vec<Option<String>>) -> Option<String> {
    let names: Vec<String> = names.into_iter().flatten().collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join(", "))
    }
}

/// Convert an edition plus its resolved author into a [`ScannedIsbn`]
pub fn to_scanned_isbn(
    isbn: &str,
    book: dto::BookResponse,
    author: Option<String>,
    cover_url: String,
) -> ScannedIsbn {
    ScannedIsbn {
        isbn: isbn.to_string(),
        title: book.title,
        author,
        genre: book.subjects.into_iter().next(),
        price: None,
        condition: None,
        cover_url: Some(cover_url),
        publisher: book.publishers.into_iter().next(),
        published_date: book.publish_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_detection() {
        assert!(is_empty_record(&dto::BookResponse::default()));

        let titled = dto::BookResponse {
            title: Some("Title".to_string()),
            ..Default::default()
        };
        assert!(!is_empty_record(&titled));

        let authored = dto::BookResponse {
            authors: vec![dto::AuthorRef {
                key: "/authors/OL1A".to_string(),
            }],
            ..Default::default()
        };
        assert!(!is_empty_record(&authored));
    }

    #[test]
    fn test_clean_author_key() {
        assert_eq!(clean_author_key("/authors/OL34184A"), "authors/OL34184A");
        assert_eq!(clean_author_key("authors/OL34184A"), "authors/OL34184A");
    }

    #[test]
    fn test_author_name_prefers_name() {
        let author = dto::AuthorResponse {
            name: Some("Roald Dahl".to_string()),
            personal_name: Some("Dahl, Roald".to_string()),
        };
        assert_eq!(author_name(author).as_deref(), Some("Roald Dahl"));

        let personal_only = dto::AuthorResponse {
            name: None,
            personal_name: Some("Dahl, Roald".to_string()),
        };
        assert_eq!(author_name(personal_only).as_deref(), Some("Dahl, Roald"));
    }

    #[test]
    fn test_join_authors_skips_unresolved() {
        let joined = join_authors(vec![Some("A".to_string()), None, Some("B".to_string())]);
        assert_eq!(joined.as_deref(), Some("A, B"));
        assert_eq!(join_authors(vec![None, None]), None);
    }

    #[test]
    fn test_first_subject_becomes_genre() {
        let book = dto::BookResponse {
            title: Some("Fantastic Mr. Fox".to_string()),
            subjects: vec!["Animals".to_string(), "Foxes".to_string()],
            publishers: vec!["Puffin".to_string()],
            ..Default::default()
        };

        let scanned = to_scanned_isbn("9780140328721", book, None, "https://c/x.jpg".to_string());

        assert_eq!(scanned.genre.as_deref(), Some("Animals"));
        assert_eq!(scanned.publisher.as_deref(), Some("Puffin"));
        assert_eq!(scanned.cover_url.as_deref(), Some("https://c/x.jpg"));
        assert!(scanned.author.is_none());
    }
}
