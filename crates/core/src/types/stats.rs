//! Catalog statistics

use crate::types::{Item, MediaType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Catalog-wide statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_items: usize,
    pub favorite_count: usize,
    pub in_app_count: usize,
    pub untyped_count: usize,
    /// Item count per media type, keyed by stored text
    pub by_media_type: BTreeMap<String, usize>,
}

impl CatalogStats {
    /// Creates empty statistics
    pub fn empty() -> Self {
        Self::default()
    }

    /// Computes statistics over a set of items
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        let mut stats = Self::empty();
        for item in items {
            stats.total_items += 1;
            if item.favorite {
                stats.favorite_count += 1;
            }
            if item.is_in_app {
                stats.in_app_count += 1;
            }
            match &item.media_type {
                Some(media_type) => {
                    *stats
                        .by_media_type
                        .entry(media_type.as_str().to_string())
                        .or_insert(0) += 1;
                }
                None => stats.untyped_count += 1,
            }
        }
        stats
    }

    /// Returns the number of items of the given type
    pub fn count_of(&self, media_type: &MediaType) -> usize {
        self.by_media_type
            .get(media_type.as_str())
            .copied()
            .unwrap_or(0)
    }

    /// Returns the percentage of favorite items
    pub fn favorite_percentage(&self) -> f64 {
        if self.total_items == 0 {
            return 0.0;
        }
        (self.favorite_count as f64 / self.total_items as f64) * 100.0
    }
}
