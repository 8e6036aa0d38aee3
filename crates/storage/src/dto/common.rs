use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PaginationParams {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.page < 1 {
            return Err("page must be >= 1".to_string());
        }
        if self.page_size < 1 || self.page_size > 100 {
            return Err("page_size must be between 1 and 100".to_string());
        }
        Ok(())
    }

    pub fn limit(&self) -> usize {
        self.page_size.max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    /// 1-based position of the first visible item, 0 when nothing matches
    pub first_item: usize,
    pub last_item: usize,
}

impl PaginationMeta {
    pub fn new(page: usize, page_size: usize, total_items: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_items.div_ceil(page_size).max(1);
        let page = page.clamp(1, total_pages);
        let start = (page - 1) * page_size;
        let first_item = if total_items == 0 { 0 } else { start + 1 };
        let last_item = (start + page_size).min(total_items);

        Self {
            page,
            page_size,
            total_items,
            total_pages,
            first_item,
            last_item,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    /// Slice an already filtered list. A page past the end snaps to the last page.
    pub fn paginate(items: Vec<T>, params: &PaginationParams) -> Self {
        let meta = PaginationMeta::new(params.page, params.limit(), items.len());
        let offset = (meta.page - 1) * meta.page_size;
        let data = items.into_iter().skip(offset).take(meta.page_size).collect();
        Self {
            data,
            pagination: meta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PageItem {
    Page(usize),
    LeftEllipsis,
    RightEllipsis,
}

/// Page buttons for a pager: every page up to 7, otherwise first, last and the
/// neighbours of the current page with ellipses in between.
pub fn page_items(current_page: usize, total_pages: usize) -> Vec<PageItem> {
    if total_pages <= 7 {
        return (1..=total_pages).map(PageItem::Page).collect();
    }

    let mut items = vec![PageItem::Page(1)];
    if current_page > 3 {
        items.push(PageItem::LeftEllipsis);
    }

    let start = current_page.saturating_sub(1).max(2);
    let end = (current_page + 1).min(total_pages - 1);
    items.extend((start..=end).map(PageItem::Page));

    if current_page + 2 < total_pages {
        items.push(PageItem::RightEllipsis);
    }
    items.push(PageItem::Page(total_pages));
    items
}
