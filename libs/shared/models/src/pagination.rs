use serde::{Deserialize, Serialize};

/// Number of pages needed for `total` items, never less than one.
pub fn total_pages(total: u64, per_page: u32) -> u64 {
    let per_page = u64::from(per_page.max(1));
    total.div_ceil(per_page).max(1)
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageParams {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self, default_limit: u32) -> u32 {
        self.limit.unwrap_or(default_limit).clamp(1, 100)
    }

    pub fn offset(&self, default_limit: u32) -> usize {
        (self.page() as usize - 1) * self.limit(default_limit) as usize
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Slices an already sorted result set according to `params`.
    pub fn from_all(all: Vec<T>, params: &PageParams, default_limit: u32) -> Self {
        let total = all.len() as u64;
        let limit = params.limit(default_limit);
        let items = all
            .into_iter()
            .skip(params.offset(default_limit))
            .take(limit as usize)
            .collect();

        Self {
            items,
            page: params.page(),
            limit,
            total,
            total_pages: total_pages(total, limit),
        }
    }
}
