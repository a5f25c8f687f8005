//! Pagination types.

use serde::{Deserialize, Serialize};

/// Pagination parameters shared across paginated list endpoints.
///
/// - `limit`: 1–20, default 6
/// - `page`: ≥ 1, default 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_limit() -> u32 {
    6
}

fn default_page() -> u32 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            page: default_page(),
        }
    }
}

impl PageRequest {
    /// Clamp `limit` to the valid range 1–20 and `page` to ≥ 1.
    ///
    /// Call after deserializing from query params to enforce bounds.
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, 20),
            page: self.page.max(1),
        }
    }

    /// Row offset of the first item on this page. Computed in u64 since
    /// `page` comes straight from an untrusted query parameter.
    pub fn offset(&self) -> u64 {
        (u64::from(self.page.max(1)) - 1) * u64::from(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_limit_6_page_1() {
        let p = PageRequest::default();
        assert_eq!(p.limit, 6);
        assert_eq!(p.page, 1);
    }

    #[test]
    fn should_deserialize_defaults_when_fields_absent() {
        let p: PageRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(p.limit, 6);
        assert_eq!(p.page, 1);
    }

    #[test]
    fn should_clamp_limit_to_1_20() {
        assert_eq!(PageRequest { limit: 0, page: 1 }.clamped().limit, 1);
        assert_eq!(PageRequest { limit: 50, page: 1 }.clamped().limit, 20);
        assert_eq!(PageRequest { limit: 10, page: 1 }.clamped().limit, 10);
    }

    #[test]
    fn should_clamp_page_to_minimum_1() {
        assert_eq!(PageRequest { limit: 6, page: 0 }.clamped().page, 1);
        assert_eq!(PageRequest { limit: 6, page: 4 }.clamped().page, 4);
    }

    #[test]
    fn should_compute_offset_from_page_and_limit() {
        assert_eq!(PageRequest { limit: 6, page: 1 }.offset(), 0);
        assert_eq!(PageRequest { limit: 6, page: 3 }.offset(), 12);
    }

    #[test]
    fn should_not_overflow_offset_on_huge_page_number() {
        let p = PageRequest {
            limit: 20,
            page: u32::MAX,
        }
        .clamped();
        assert_eq!(p.offset(), (u64::from(u32::MAX) - 1) * 20);
    }
}
