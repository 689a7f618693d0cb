//! Common types

use serde::{Deserialize, Serialize};

/// List envelope returned by collection endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub count: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>) -> Self {
        let count = items.len();
        Self { items, count }
    }
}

impl<T> From<Vec<T>> for Paginated<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}
