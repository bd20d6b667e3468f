use super::errors::DomainError;

/// Page size used when the caller omits `limit` or passes zero.
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Upper bound for a single page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Offset/limit window over a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
}

impl PageRequest {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Result<Self, DomainError> {
        let limit = match limit {
            None | Some(0) => DEFAULT_PAGE_SIZE,
            Some(l) if l < 0 => {
                return Err(DomainError::InvalidInput(format!(
                    "limit must not be negative, got {l}"
                )))
            }
            Some(l) => l.min(MAX_PAGE_SIZE),
        };
        let offset = match offset {
            None => 0,
            Some(o) if o < 0 => {
                return Err(DomainError::InvalidInput(format!(
                    "offset must not be negative, got {o}"
                )))
            }
            Some(o) => o,
        };
        Ok(Self { limit, offset })
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// One page of items plus the total number of live rows.
#[derive(Debug, Clone)]
pub struct ListResult<T> {
    pub items: Vec<T>,
    pub total: i64,
}
