//! CSV ingest: header validation, row extraction, and identity-collision
//! rewriting for uploaded review batches.

use std::collections::HashMap;

use bytes::Bytes;
use csv::{ReaderBuilder, WriterBuilder};

use booklens_core::{AppError, AppResult};
use booklens_entity::Book;

/// Columns every upload must carry. Validation fails the submission when
/// any of these is absent from the header row.
pub const REQUIRED_COLUMNS: [&str; 4] = ["book_id", "book_title", "comment_id", "content"];

const ALL_COLUMNS: [&str; 11] = [
    "book_id",
    "book_title",
    "comment_id",
    "content",
    "author",
    "cover_url",
    "publisher",
    "pub_year",
    "book_url",
    "user",
    "rating",
];

/// One review row lifted out of an uploaded CSV. Required fields are
/// guaranteed non-empty by [`ParsedBatch::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRow {
    pub book_id: String,
    pub book_title: String,
    pub comment_id: String,
    pub content: String,
    pub author: Option<String>,
    pub cover_url: Option<String>,
    pub publisher: Option<String>,
    pub pub_year: Option<String>,
    pub book_url: Option<String>,
    pub user: Option<String>,
    pub rating: Option<String>,
}

/// A parsed upload batch. Rows keep their file order; rows missing any
/// required value are dropped during parsing rather than failing the batch.
#[derive(Debug, Clone, Default)]
pub struct ParsedBatch {
    pub rows: Vec<CommentRow>,
}

impl ParsedBatch {
    /// Parse raw CSV bytes, validating the header carries every required
    /// column.
    pub fn parse(data: &[u8]) -> AppResult<Self> {
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(data);
        let headers = reader.headers()?.clone();
        let index: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim(), i))
            .collect();

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !index.contains_key(**name))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(AppError::validation(format!(
                "file is missing required columns: {}",
                missing.join(", ")
            )));
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let field = |name: &str| -> Option<String> {
                index
                    .get(name)
                    .and_then(|&i| record.get(i))
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
            };

            let (Some(book_id), Some(book_title), Some(comment_id), Some(content)) = (
                field("book_id"),
                field("book_title"),
                field("comment_id"),
                field("content"),
            ) else {
                continue;
            };

            rows.push(CommentRow {
                book_id,
                book_title,
                comment_id,
                content,
                author: field("author"),
                cover_url: field("cover_url"),
                publisher: field("publisher"),
                pub_year: field("pub_year"),
                book_url: field("book_url"),
                user: field("user"),
                rating: field("rating"),
            });
        }

        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct book identifiers in first-appearance order.
    pub fn book_ids(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut ids = Vec::new();
        for row in &self.rows {
            if seen.insert(row.book_id.clone()) {
                ids.push(row.book_id.clone());
            }
        }
        ids
    }

    /// One [`Book`] per distinct identifier; the first row mentioning a book
    /// supplies its metadata.
    pub fn books(&self) -> Vec<Book> {
        let mut seen = std::collections::HashSet::new();
        let mut books = Vec::new();
        for row in &self.rows {
            if seen.insert(row.book_id.clone()) {
                books.push(Book {
                    book_id: row.book_id.clone(),
                    book_title: row.book_title.clone(),
                    author: row.author.clone(),
                    cover_url: row.cover_url.clone(),
                    publisher: row.publisher.clone(),
                    pub_year: row.pub_year.clone(),
                    book_url: row.book_url.clone(),
                });
            }
        }
        books
    }

    /// Rewrite book identifiers that collide with an already-registered book
    /// of a different title, appending `9` to disambiguate. `title_of` looks
    /// up the stored title for an identifier. Returns the applied renames.
    pub fn rewrite_conflicts<F>(&mut self, title_of: F) -> Vec<(String, String)>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut renames = Vec::new();
        for id in self.book_ids() {
            let incoming_title = self
                .rows
                .iter()
                .find(|row| row.book_id == id)
                .map(|row| row.book_title.clone());
            let Some(incoming_title) = incoming_title else {
                continue;
            };
            if let Some(existing_title) = title_of(&id) {
                if existing_title != incoming_title {
                    let rewritten = format!("{id}9");
                    for row in self.rows.iter_mut().filter(|row| row.book_id == id) {
                        row.book_id = rewritten.clone();
                    }
                    renames.push((id, rewritten));
                }
            }
        }
        renames
    }

    /// Serialize back to CSV with the full column set, so the staged file
    /// reflects any identity rewrites.
    pub fn to_csv_bytes(&self) -> AppResult<Bytes> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        writer.write_record(ALL_COLUMNS)?;
        for row in &self.rows {
            let opt = |value: &Option<String>| value.clone().unwrap_or_default();
            writer.write_record([
                row.book_id.clone(),
                row.book_title.clone(),
                row.comment_id.clone(),
                row.content.clone(),
                opt(&row.author),
                opt(&row.cover_url),
                opt(&row.publisher),
                opt(&row.pub_year),
                opt(&row.book_url),
                opt(&row.user),
                opt(&row.rating),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::internal(format!("failed to flush rewritten batch: {e}")))?;
        Ok(Bytes::from(bytes))
    }
}
