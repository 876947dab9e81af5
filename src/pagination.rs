//! This modules defines the common functionality for incrementally disclosing rows of data.

/// The config for "load more" pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// The number of rows shown after the data is (re)loaded.
    pub initial_page_size: usize,
    /// The number of extra rows revealed by each "load more".
    pub page_increment: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            initial_page_size: 10,
            page_increment: 10,
        }
    }
}

impl PaginationConfig {
    /// The number of rows to reveal after `displayed_count`, capped at `total`.
    pub fn next_count(&self, displayed_count: usize, total: usize) -> usize {
        displayed_count.saturating_add(self.page_increment).min(total)
    }
}
