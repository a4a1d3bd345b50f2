//! Windowing of ordered result sets.

use serde::Serialize;

use crate::types::{LoadPosition, LoadRange};

/// Skips `range.position` elements and takes at most `range.size`.
pub fn paginate<T, I>(items: I, range: LoadRange) -> Vec<T>
where
    I: IntoIterator<Item = T>,
{
    items
        .into_iter()
        .skip(range.position.value())
        .take(range.size.value())
        .collect()
}

/// A window of an ordered result set, with the size of the whole set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Requested position of the first item.
    pub position: LoadPosition,
    /// Number of elements before slicing.
    pub total_count: usize,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Slices `items` to `range`, remembering the unsliced length.
    pub fn slice(items: Vec<T>, range: LoadRange) -> Self {
        let total_count = items.len();
        Self {
            position: range.position,
            total_count,
            items: paginate(items, range),
        }
    }

    /// True when elements remain after this page.
    pub fn has_more(&self) -> bool {
        self.position.value().saturating_add(self.items.len()) < self.total_count
    }
}
