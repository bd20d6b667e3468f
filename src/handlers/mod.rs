pub mod categories;
pub mod orders;
pub mod products;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::pagination::PageRequest;
use crate::errors::AppError;

/// `?limit=&offset=` on every list endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Page size. Missing or zero means 20; capped at 100.
    pub limit: Option<i64>,
    /// Rows to skip. Defaults to 0.
    pub offset: Option<i64>,
}

impl ListParams {
    pub fn page(&self) -> Result<PageRequest, AppError> {
        Ok(PageRequest::new(self.limit, self.offset)?)
    }
}

pub(crate) fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}
