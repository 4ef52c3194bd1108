use serde::{Deserialize, Serialize};

/// Limit/offset window requested by the caller.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.max(1),
            offset: offset.max(0),
        }
    }

    /// 1-based page number, as query strings usually carry it.
    pub fn numbered(page: i64, limit: i64) -> Self {
        let limit = limit.max(1);
        Self::new(limit, (page.max(1) - 1) * limit)
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PageContext<T> {
    pub rows: Vec<T>,
    pub total_rows: i64,
    pub limit: i64,
    pub offset: i64,
    pub next_offset: Option<i64>,
    pub prev_offset: Option<i64>,
}

impl<T> PageContext<T> {
    pub fn from_rows(rows: Vec<T>, total_rows: i64, page: Page) -> Self {
        let next_offset = page.offset + page.limit;
        let next_offset = (next_offset < total_rows).then_some(next_offset);
        let prev_offset = (page.offset > 0).then(|| (page.offset - page.limit).max(0));

        Self {
            rows,
            total_rows,
            limit: page.limit,
            offset: page.offset,
            next_offset,
            prev_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_has_no_previous() {
        let page = PageContext::from_rows(vec![1, 2], 5, Page::new(2, 0));
        assert_eq!(page.next_offset, Some(2));
        assert_eq!(page.prev_offset, None);
    }

    #[test]
    fn last_page_has_no_next() {
        let page = PageContext::from_rows(vec![5], 5, Page::new(2, 4));
        assert_eq!(page.next_offset, None);
        assert_eq!(page.prev_offset, Some(2));
    }

    #[test]
    fn numbered_pages_start_at_one() {
        assert_eq!(Page::numbered(1, 6), Page::new(6, 0));
        assert_eq!(Page::numbered(3, 6), Page::new(6, 12));
        assert_eq!(Page::numbered(0, 0), Page::new(1, 0));
    }
}
