use super::errors::DomainError;

/// A validated, 1-based page request. `limit` is already clamped to the
/// configured maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64, max_limit: i64) -> Result<Self, DomainError> {
        if page < 1 {
            return Err(DomainError::InvalidRequest(format!(
                "page must be >= 1, got {}",
                page
            )));
        }
        if limit < 1 {
            return Err(DomainError::InvalidRequest(format!(
                "limit must be >= 1, got {}",
                limit
            )));
        }
        let request = Self {
            page,
            limit: limit.min(max_limit.max(1)),
        };
        request.checked_offset().ok_or_else(|| {
            DomainError::InvalidRequest(format!("page {} is out of range", page))
        })?;
        Ok(request)
    }

    fn checked_offset(&self) -> Option<i64> {
        (self.page - 1).checked_mul(self.limit)
    }

    pub fn offset(&self) -> i64 {
        // Overflow is ruled out by `new`.
        self.checked_offset().unwrap_or(i64::MAX)
    }
}

/// Raw slice returned by a repository: one page of rows plus the total row count.
#[derive(Debug, Clone)]
pub struct ListResult<T> {
    pub items: Vec<T>,
    pub total: i64,
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub limit: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn from_list(request: PageRequest, list: ListResult<T>) -> Self {
        let total_pages = if list.total > 0 {
            (list.total + request.limit - 1) / request.limit
        } else {
            0
        };
        Self {
            items: list.items,
            page: request.page,
            limit: request.limit,
            total_items: list.total,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}
