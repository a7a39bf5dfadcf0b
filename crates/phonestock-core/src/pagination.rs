//! # Cross-Model Pagination
//!
//! Plans which store pages to fetch so that a global page over several
//! per-model result sets can be assembled without reading any model in full.
//!
//! ## The Problem
//! The document store can only page one `(warehouse, model)` query at a
//! time, with its own fixed page size. A name search matches several
//! models; the caller wants page N of their concatenation.
//!
//! ## Worked Example
//! ```text
//! counts: M1 = 3, M2 = 5        page_size = 4        page = 2
//!
//! global order   M1 M1 M1 M2 M2 M2 M2 M2
//! global index    0  1  2  3  4  5  6  7
//! window                     [4 ........ 8)
//!
//! M1  range [0,3)  no overlap → skipped
//! M2  range [3,8)  local [1,5)
//!       store page 1 = local [0,4)  → skip 1, take 3
//!       store page 2 = local [4,8)  → skip 0, take 1
//! ```
//!
//! ## Guarantees
//! - No model is fetched only to page past it: non-overlapping models
//!   contribute nothing but their count.
//! - A page boundary may split one model across two store pages.
//! - Result order: models in the given order, units in store order.

/// Number of units a single model contributes to the concatenated result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCount {
    pub model_id: String,
    pub count: u64,
}

impl ModelCount {
    pub fn new(model_id: impl Into<String>, count: u64) -> Self {
        ModelCount {
            model_id: model_id.into(),
            count,
        }
    }
}

/// The half-open global range `[start, end)` covered by one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start: u64,
    pub end: u64,
}

impl PageWindow {
    /// Window for a 1-based `page` of `page_size` items.
    pub fn new(page: u32, page_size: u32) -> Self {
        let start = u64::from(page.saturating_sub(1)) * u64::from(page_size);
        PageWindow {
            start,
            end: start + u64::from(page_size),
        }
    }

    /// Store offset of the window's first item.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.start
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One store page fetch and the part of it that belongs to the global page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePageSlice {
    pub model_id: String,
    /// 1-based store page index.
    pub store_page: u64,
    /// Store page size (equal to the requested page size).
    pub page_size: u32,
    /// Items to drop from the front of the fetched page.
    pub skip: usize,
    /// Items to keep after skipping.
    pub take: usize,
}

impl StorePageSlice {
    /// Store offset of the fetched page.
    #[inline]
    pub fn offset(&self) -> u64 {
        (self.store_page - 1) * u64::from(self.page_size)
    }

    /// Applies the slice to a fetched store page.
    pub fn apply<T>(&self, fetched: Vec<T>) -> impl Iterator<Item = T> {
        fetched.into_iter().skip(self.skip).take(self.take)
    }
}

/// Plans the store fetches for `page` over `counts` (concatenated in order).
///
/// ## Algorithm
/// 1. Walk the models with a running `cursor` (global offset of the model's
///    first unit), stopping once `cursor >= end`.
/// 2. Skip models whose `[cursor, cursor + count)` misses the window.
/// 3. For an overlapping model take the local range
///    `[max(0, start - cursor), min(count, end - cursor))`.
/// 4. Cover that local range with store pages
///    `local_start / page_size + 1 ..= (local_end - 1) / page_size + 1`,
///    recording how much of each page lies inside the range.
///
/// Concatenating the slices yields exactly `min(page_size, total - start)`
/// items when the store returns what the counts promised.
pub fn plan_page(counts: &[ModelCount], page: u32, page_size: u32) -> Vec<StorePageSlice> {
    let mut plan = Vec::new();
    if page == 0 || page_size == 0 {
        return plan;
    }

    let window = PageWindow::new(page, page_size);
    let size = u64::from(page_size);
    let mut cursor: u64 = 0;

    for entry in counts {
        if cursor >= window.end {
            break;
        }

        let model_end = cursor + entry.count;
        if model_end <= window.start || entry.count == 0 {
            cursor = model_end;
            continue;
        }

        let local_start = window.start.saturating_sub(cursor);
        let local_end = entry.count.min(window.end - cursor);

        let first_page = local_start / size + 1;
        let last_page = (local_end - 1) / size + 1;

        for store_page in first_page..=last_page {
            let page_start = (store_page - 1) * size;
            let page_end = page_start + size;

            let from = local_start.max(page_start);
            let to = local_end.min(page_end);

            plan.push(StorePageSlice {
                model_id: entry.model_id.clone(),
                store_page,
                page_size,
                skip: (from - page_start) as usize,
                take: (to - from) as usize,
            });
        }

        cursor = model_end;
    }

    plan
}

/// Sum of all model counts.
pub fn total_count(counts: &[ModelCount]) -> u64 {
    counts.iter().map(|entry| entry.count).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================
