//! Success envelope shared by every JSON endpoint.

use serde::{Deserialize, Serialize};

/// `{ "success": true, "data": ... }`, plus `count` for list results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    /// Number of items, only present on list responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> ApiResponse<T> {
    /// Wrap a single record.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            count: None,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Wrap a list, recording its length.
    pub fn list(items: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(items.len()),
            data: items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_record_has_no_count() {
        let json = serde_json::to_value(ApiResponse::ok("laptop")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "laptop");
        assert!(json.get("count").is_none());
    }

    #[test]
    fn test_list_records_count() {
        let json = serde_json::to_value(ApiResponse::list(vec![1, 2, 3])).unwrap();
        assert_eq!(json["count"], 3);
        assert_eq!(json["data"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_empty_list() {
        let json = serde_json::to_value(ApiResponse::list(Vec::<u8>::new())).unwrap();
        assert_eq!(json["count"], 0);
        assert_eq!(json["data"], serde_json::json!([]));
    }
}
