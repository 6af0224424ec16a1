//! Pagination types for list endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::errors::{AppError, AppResult};

/// A validated, 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
}

impl Pagination {
    /// Build a page request, rejecting page 0, sizes outside [1, MAX_PAGE_SIZE]
    /// and pages whose offset would not fit a signed 64-bit bind.
    pub fn new(page: u64, page_size: u64) -> AppResult<Self> {
        if page < 1 {
            return Err(AppError::bad_request("page must be at least 1"));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::bad_request(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        let offset = (page - 1)
            .checked_mul(page_size)
            .filter(|offset| *offset <= i64::MAX as u64);
        if offset.is_none() {
            return Err(AppError::bad_request("page is out of range"));
        }
        Ok(Self { page, page_size })
    }

    /// Calculate offset for database query. Cannot overflow, `new` bounds it.
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

/// Pagination query parameters as they arrive over HTTP.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number, starting at 1
    pub page: Option<u64>,
    /// Items per page, 1 to 100
    pub page_size: Option<u64>,
}

impl PaginationParams {
    /// `None` when neither parameter was supplied; missing halves take the defaults.
    pub fn into_pagination(self) -> AppResult<Option<Pagination>> {
        if self.page.is_none() && self.page_size.is_none() {
            return Ok(None);
        }
        Pagination::new(
            self.page.unwrap_or(DEFAULT_PAGE_NUMBER),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_limit() {
        let first = Pagination::new(1, 10).unwrap();
        assert_eq!((first.offset(), first.limit()), (0, 10));

        let third = Pagination::new(3, 25).unwrap();
        assert_eq!((third.offset(), third.limit()), (50, 25));
    }

    #[test]
    fn test_bounds() {
        assert!(Pagination::new(0, 10).is_err());
        assert!(Pagination::new(1, 0).is_err());
        assert!(Pagination::new(1, 101).is_err());
        assert!(Pagination::new(1, 100).is_ok());
    }

    #[test]
    fn test_huge_page_rejected() {
        assert!(matches!(
            Pagination::new(u64::MAX, MAX_PAGE_SIZE),
            Err(AppError::BadRequest(_))
        ));
        assert!(Pagination::new(100_000_000_000_000_000, MAX_PAGE_SIZE).is_err());

        let params = PaginationParams { page: Some(u64::MAX), page_size: Some(100) };
        assert!(params.into_pagination().is_err());

        // Largest offset that still binds
        let last = i64::MAX as u64 / MAX_PAGE_SIZE + 1;
        let page = Pagination::new(last, MAX_PAGE_SIZE).unwrap();
        assert!(page.offset() <= i64::MAX as u64);
        assert!(Pagination::new(last + 1, MAX_PAGE_SIZE).is_err());
    }

    #[test]
    fn test_params_defaults() {
        assert_eq!(PaginationParams::default().into_pagination().unwrap(), None);

        let params = PaginationParams { page: Some(2), page_size: None };
        assert_eq!(
            params.into_pagination().unwrap(),
            Some(Pagination { page: 2, page_size: DEFAULT_PAGE_SIZE })
        );
    }
}
