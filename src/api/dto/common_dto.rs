//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PaginationParams {
    /// Clamps `per_page` to the allowed maximum of 100.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, 100),
        }
    }

    /// Cuts the requested page out of `items` and describes it.
    #[must_use]
    pub fn paginate<T>(&self, items: Vec<T>) -> (Vec<T>, PaginationMeta) {
        let params = self.clamped();
        let total = u32::try_from(items.len()).unwrap_or(u32::MAX);
        let total_pages = total.div_ceil(params.per_page);
        let start = (params.page - 1).saturating_mul(params.per_page) as usize;

        let data = items
            .into_iter()
            .skip(start)
            .take(params.per_page as usize)
            .collect();
        let meta = PaginationMeta {
            page: params.page,
            per_page: params.per_page,
            total,
            total_pages,
        };
        (data, meta)
    }
}

/// Deserializes a present field (including `null`) as `Some`, so that a
/// missing field stays `None` under `#[serde(default)]`.
///
/// Used for PATCH bodies where `null` clears a value.
///
/// # Errors
///
/// Propagates the inner deserializer's error.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_slices_and_counts() {
        let params = PaginationParams {
            page: 2,
            per_page: 3,
        };
        let (data, meta) = params.paginate((1..=7).collect::<Vec<i32>>());
        assert_eq!(data, [4, 5, 6]);
        assert_eq!(meta.total, 7);
        assert_eq!(meta.total_pages, 3);
    }

    #[test]
    fn paginate_clamps_inputs() {
        let params = PaginationParams {
            page: 0,
            per_page: 1000,
        };
        let (data, meta) = params.paginate(vec![1, 2]);
        assert_eq!(data.len(), 2);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.per_page, 100);
    }

    #[test]
    fn empty_list_has_zero_pages() {
        let (data, meta) = PaginationParams::default().paginate(Vec::<i32>::new());
        assert!(data.is_empty());
        assert_eq!(meta.total_pages, 0);
    }
}
