//! Parser for the external catalog's text output
//!
//! The stream is a sequence of `title||author` entries, each terminated
//! (or separated) by `;;`:
//!
//! ```text
//! Dune||Frank Herbert;;Emma||Jane Austen;;
//! ```
//!
//! Neither delimiter can be escaped. A title or author that contains
//! `||` or `;;` literally will misparse.

use log::warn;
use mediashelf_core::BookRecord;

/// Separates the title from the author within one entry
pub const FIELD_SEPARATOR: &str = "||";

/// Separates entries
pub const RECORD_SEPARATOR: &str = ";;";

/// Stateless parser for catalog output
pub struct CatalogParser;

impl CatalogParser {
    /// Parses raw catalog output into book records, in input order
    ///
    /// Malformed entries are logged and skipped; they never fail the parse.
    pub fn parse(raw: &str) -> Vec<BookRecord> {
        raw.split(RECORD_SEPARATOR)
            .filter_map(Self::parse_entry)
            .collect()
    }

    /// Parses one entry, returning `None` when it must be skipped
    pub fn parse_entry(entry: &str) -> Option<BookRecord> {
        let fields: Vec<&str> = entry.split(FIELD_SEPARATOR).collect();

        let [title, author] = fields.as_slice() else {
            // Terminal separators and blank lines leave empty chunks behind
            if !entry.trim().is_empty() {
                warn!("Skipping malformed catalog entry: '{}'", entry);
            }
            return None;
        };

        let title = title.trim();
        let author = author.trim();

        if title.is_empty() {
            warn!("Skipping catalog entry with empty title: '{}'", entry);
            return None;
        }

        Some(BookRecord::new(title, author))
    }
}
