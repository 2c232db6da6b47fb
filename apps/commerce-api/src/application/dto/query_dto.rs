//! List query parameters.

use serde::Deserialize;

use crate::domain::catalog::{Category, ProductQuery, ProductSort};
use crate::domain::customer::UserSort;
use crate::domain::shared::{Page, ValidationError};

/// Raw `?offset=&limit=&order=&category=` parameters.
///
/// Numbers are kept as strings so a bad value becomes a field error
/// instead of an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQueryDto {
    /// Rows to skip.
    pub offset: Option<String>,
    /// Rows to return.
    pub limit: Option<String>,
    /// Sort key.
    pub order: Option<String>,
    /// Category filter (products only).
    pub category: Option<String>,
}

/// Bounds applied while parsing a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListWindow {
    /// Limit used when none is given.
    pub default_limit: u32,
    /// Largest limit accepted; larger values are clamped.
    pub max_limit: u32,
}

impl ListQueryDto {
    /// Parse the offset/limit window.
    pub fn page(&self, window: ListWindow) -> Result<Page, ValidationError> {
        let offset = parse_u32("offset", self.offset.as_deref())?.unwrap_or(0);
        let limit = parse_u32("limit", self.limit.as_deref())?
            .unwrap_or(window.default_limit)
            .min(window.max_limit);
        Ok(Page::new(offset, limit))
    }

    /// Parse as a user listing.
    pub fn user_listing(&self, window: ListWindow) -> Result<(UserSort, Page), ValidationError> {
        Ok((UserSort::from_query(self.order.as_deref()), self.page(window)?))
    }

    /// Parse as a product listing.
    pub fn product_query(&self, window: ListWindow) -> Result<ProductQuery, ValidationError> {
        let category = self
            .category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()?;
        Ok(ProductQuery {
            category,
            sort: ProductSort::from_query(self.order.as_deref()),
            page: self.page(window)?,
        })
    }
}

fn parse_u32(field: &str, value: Option<&str>) -> Result<Option<u32>, ValidationError> {
    value
        .map(|raw| {
            raw.trim().parse::<u32>().map_err(|_| {
                ValidationError::new(field, format!("must be a non-negative integer, got '{raw}'"))
            })
        })
        .transpose()
}
