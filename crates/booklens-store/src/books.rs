//! Book collection.

use dashmap::DashMap;

use booklens_entity::Book;

/// Collection of books keyed by their source identity.
#[derive(Debug, Default)]
pub struct BookCollection {
    books: DashMap<String, Book>,
}

impl BookCollection {
    /// Insert or replace a book.
    pub fn upsert(&self, book: Book) {
        self.books.insert(book.book_id.clone(), book);
    }

    /// Fetch a book by identity.
    pub fn get(&self, book_id: &str) -> Option<Book> {
        self.books.get(book_id).map(|b| b.clone())
    }

    /// Title registered under an identity, if any. Used by the
    /// identity-collision check at submission.
    pub fn title_of(&self, book_id: &str) -> Option<String> {
        self.books.get(book_id).map(|b| b.book_title.clone())
    }

    /// Remove every book whose identity appears in `book_ids`.
    /// Returns the number removed.
    pub fn remove_many(&self, book_ids: &[String]) -> usize {
        book_ids
            .iter()
            .filter(|id| self.books.remove(id.as_str()).is_some())
            .count()
    }

    /// Number of books.
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str, title: &str) -> Book {
        Book {
            book_id: id.into(),
            book_title: title.into(),
            author: None,
            cover_url: None,
            publisher: None,
            pub_year: None,
            book_url: None,
        }
    }

    #[test]
    fn test_upsert_and_title_lookup() {
        let books = BookCollection::default();
        books.upsert(book("b1", "Dune"));
        assert_eq!(books.title_of("b1").as_deref(), Some("Dune"));
        assert_eq!(books.title_of("b2"), None);
    }

    #[test]
    fn test_remove_many_counts_hits_only() {
        let books = BookCollection::default();
        books.upsert(book("b1", "Dune"));
        books.upsert(book("b2", "Solaris"));
        let removed = books.remove_many(&["b1".into(), "b3".into()]);
        assert_eq!(removed, 1);
        assert_eq!(books.len(), 1);
    }
}
