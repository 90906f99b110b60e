//! Windowed reads: offset/limit row ranges for partial unmarshalling.
//!
//! Large inputs can be decoded in bounded slices by supplying windows. The
//! decoder makes a single linear pass and materializes only rows whose
//! absolute index falls inside at least one window; everything else is
//! tokenized and discarded so stream position stays correct.

/// A row range: starting row index plus an optional row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Absolute index of the first row in the window (0-based, data rows
    /// only - a header row is never counted).
    pub offset: u64,
    /// Number of rows, or `None` for everything from `offset` onwards.
    pub limit: Option<u64>,
}

impl Window {
    /// A bounded window of `limit` rows starting at `offset`.
    pub fn new(offset: u64, limit: u64) -> Self {
        Self {
            offset,
            limit: Some(limit),
        }
    }

    /// An unbounded window from `offset` to the end of input.
    pub fn unbounded(offset: u64) -> Self {
        Self {
            offset,
            limit: None,
        }
    }

    /// True when the row index falls inside this window.
    pub fn contains(&self, row: u64) -> bool {
        if row < self.offset {
            return false;
        }
        match self.limit {
            Some(limit) => row - self.offset < limit,
            None => true,
        }
    }

    /// The last row index covered, `None` when unbounded. A zero-limit
    /// window covers nothing and also yields `None`.
    fn last_row(&self) -> Option<u64> {
        match self.limit {
            Some(0) => None,
            Some(limit) => Some(self.offset.saturating_add(limit - 1)),
            None => None,
        }
    }

    /// True when the window can never match any row.
    fn is_degenerate(&self) -> bool {
        self.limit == Some(0)
    }
}

/// An ordered set of windows. An empty set selects all rows.
#[derive(Debug, Clone, Default)]
pub struct WindowSet {
    windows: Vec<Window>,
}

impl WindowSet {
    /// Build a window set from an ordered list.
    pub fn new(windows: Vec<Window>) -> Self {
        Self { windows }
    }

    /// A set selecting every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// True when every row is selected (no windows supplied).
    pub fn selects_all(&self) -> bool {
        self.windows.is_empty()
    }

    /// True when the row index should be materialized.
    pub fn contains(&self, row: u64) -> bool {
        self.selects_all() || self.windows.iter().any(|w| w.contains(row))
    }

    /// The highest row index any window can match, when that bound exists.
    ///
    /// `None` means no early stop is possible: either all rows are selected
    /// or some window is unbounded.
    pub fn last_row(&self) -> Option<u64> {
        if self.selects_all() {
            return None;
        }
        if self.windows.iter().any(|w| w.limit.is_none()) {
            return None;
        }
        self.windows
            .iter()
            .filter(|w| !w.is_degenerate())
            .filter_map(|w| w.last_row())
            .max()
    }
}

impl From<&[Window]> for WindowSet {
    fn from(windows: &[Window]) -> Self {
        Self::new(windows.to_vec())
    }
}
