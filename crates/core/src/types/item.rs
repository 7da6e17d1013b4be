//! Catalog item domain models

use crate::types::{BookRecord, DedupKey, Timestamp, Validator};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Creates a new random ItemId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an ItemId from a UUID string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Returns the ItemId as a string
    pub fn as_string(&self) -> String {
        self.0.to_string()
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category of a catalog item
///
/// Stored as free text. Values outside the known set survive a round trip
/// through `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    Book,
    Movie,
    Song,
    Podcast,
    Document,
    Other,
    Custom(String),
}

impl MediaType {
    /// The categories offered when adding an item by hand
    pub const KNOWN: [MediaType; 6] = [
        MediaType::Book,
        MediaType::Movie,
        MediaType::Song,
        MediaType::Podcast,
        MediaType::Document,
        MediaType::Other,
    ];

    /// Returns the stored text form
    pub fn as_str(&self) -> &str {
        match self {
            Self::Book => "Book",
            Self::Movie => "Movie",
            Self::Song => "Song",
            Self::Podcast => "Podcast",
            Self::Document => "Document",
            Self::Other => "Other",
            Self::Custom(value) => value,
        }
    }

    /// Returns true for the book category
    pub fn is_book(&self) -> bool {
        matches!(self, Self::Book)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for MediaType {
    fn from(s: &str) -> Self {
        match s {
            "Book" => Self::Book,
            "Movie" => Self::Movie,
            "Song" => Self::Song,
            "Podcast" => Self::Podcast,
            "Document" => Self::Document,
            "Other" => Self::Other,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl FromStr for MediaType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// A persisted catalog entry (book, movie, song, ...)
///
/// For book-typed items `description_text` holds the author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: Option<String>,
    pub description_text: Option<String>,
    pub media_type: Option<MediaType>,
    pub url: Option<String>,
    pub favorite: bool,
    pub is_downloading: bool,
    pub is_on_mac: bool,
    pub is_on_iphone: bool,
    pub is_in_app: bool,
    pub timestamp: Timestamp,
}

impl Item {
    /// Materialises a creation payload into an item with a fresh identity
    pub fn from_new(fields: NewItem) -> Self {
        Self {
            id: ItemId::new(),
            title: fields.title,
            description_text: fields.description_text,
            media_type: fields.media_type,
            url: fields.url,
            favorite: fields.favorite,
            is_downloading: fields.is_downloading,
            is_on_mac: fields.is_on_mac,
            is_on_iphone: fields.is_on_iphone,
            is_in_app: fields.is_in_app,
            timestamp: fields.timestamp,
        }
    }

    /// Returns true if this item belongs to the book category
    pub fn is_book(&self) -> bool {
        self.media_type.as_ref().is_some_and(MediaType::is_book)
    }

    /// Key used to match this item against imported books
    ///
    /// Items without a title or without a description never match anything.
    pub fn dedup_key(&self) -> Option<DedupKey> {
        let title = self.title.as_deref()?;
        let author = self.description_text.as_deref()?;
        Some(DedupKey::new(title, author))
    }

    /// Title for display, falling back to a placeholder
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }
}

impl Validator for Item {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                errors.push("Title cannot be blank".to_string());
            }
        }

        if let Some(MediaType::Custom(value)) = &self.media_type {
            if value.trim().is_empty() {
                errors.push("Media type cannot be blank".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Field values for an item that does not exist yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub title: Option<String>,
    pub description_text: Option<String>,
    pub media_type: Option<MediaType>,
    pub url: Option<String>,
    pub favorite: bool,
    pub is_downloading: bool,
    pub is_on_mac: bool,
    pub is_on_iphone: bool,
    pub is_in_app: bool,
    pub timestamp: Timestamp,
}

impl NewItem {
    /// Starts a payload with a title and a fresh creation timestamp
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Payload for a book discovered in the external catalog
    pub fn from_book(book: &BookRecord) -> Self {
        Self::new(book.title.clone())
            .with_description(book.author.clone())
            .with_media_type(MediaType::Book)
            .with_in_app(true)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description_text = Some(description.into());
        self
    }

    pub fn with_media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = Some(media_type);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }

    pub fn with_in_app(mut self, in_app: bool) -> Self {
        self.is_in_app = in_app;
        self
    }

    /// Returns the dedup key this payload would have once persisted
    pub fn dedup_key(&self) -> Option<DedupKey> {
        let title = self.title.as_deref()?;
        let author = self.description_text.as_deref()?;
        Some(DedupKey::new(title, author))
    }
}

impl Default for NewItem {
    fn default() -> Self {
        Self {
            title: None,
            description_text: None,
            media_type: None,
            url: None,
            favorite: false,
            is_downloading: false,
            is_on_mac: false,
            is_on_iphone: false,
            is_in_app: false,
            timestamp: Timestamp::now(),
        }
    }
}

/// Predicate for selecting persisted items
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ItemFilter {
    #[default]
    All,
    MediaType(MediaType),
    Favorites,
}

impl ItemFilter {
    /// Returns true if the item satisfies this filter
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Self::All => true,
            Self::MediaType(media_type) => item.media_type.as_ref() == Some(media_type),
            Self::Favorites => item.favorite,
        }
    }
}
