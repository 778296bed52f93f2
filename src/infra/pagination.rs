use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

/// Offset/limit pagination parameters.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, IntoParams)]
pub struct PaginationParams {
    /// The number of elements to skip.
    offset: Option<i64>,
    /// The maximum number of elements to return.
    limit: Option<i64>,
}

impl PaginationParams {
    pub fn new(offset: Option<i64>, limit: Option<i64>) -> Self {
        Self { offset, limit }
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(100).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::PaginationParams;

    #[test]
    fn defaults_are_first_hundred() {
        let params = PaginationParams::default();
        assert_eq!(0, params.offset());
        assert_eq!(100, params.limit());
    }

    #[test]
    fn negative_values_are_clamped() {
        let params = PaginationParams::new(Some(-1), Some(-5));
        assert_eq!(0, params.offset());
        assert_eq!(0, params.limit());
    }
}
