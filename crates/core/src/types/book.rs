//! Book records discovered in an external catalog

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator placed between title and author inside a [`DedupKey`]
///
/// ASCII unit separator; neither catalog titles nor author names contain it.
pub const DEDUP_KEY_SEPARATOR: char = '\u{1F}';

/// A book as reported by the external catalog
///
/// `title` is never blank; `author` may be empty. Both are trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
}

impl BookRecord {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }

    /// Key used to decide whether this book is already in the catalog
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(&self.title, &self.author)
    }
}

impl fmt::Display for BookRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.author.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{} by {}", self.title, self.author)
        }
    }
}

/// Identity of a book for duplicate detection: title and author joined
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey(String);

impl DedupKey {
    /// Builds the key from a title and an author
    ///
    /// Every component that compares books goes through here.
    pub fn new(title: &str, author: &str) -> Self {
        let mut key = String::with_capacity(title.len() + author.len() + 1);
        key.push_str(title);
        key.push(DEDUP_KEY_SEPARATOR);
        key.push_str(author);
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
