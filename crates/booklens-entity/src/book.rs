//! Book entity model.

use serde::{Deserialize, Serialize};

/// A book as described by uploaded CSV metadata.
///
/// The identity (`book_id`) is user-supplied, not minted by BookLens, so it
/// stays a plain string. Optional fields mirror the optional CSV columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique book identity from the source data.
    pub book_id: String,
    /// Title.
    pub book_title: String,
    /// Author, if present in the source file.
    pub author: Option<String>,
    /// Cover image URL.
    pub cover_url: Option<String>,
    /// Publisher.
    pub publisher: Option<String>,
    /// Publication year.
    pub pub_year: Option<String>,
    /// Source URL.
    pub book_url: Option<String>,
}
