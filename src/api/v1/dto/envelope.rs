/*
 * Responsibility
 * - 成功レスポンスの共通形 `{ "status": "success", "results"?: n, "data": {...} }`
 * - 失敗時の形は error::ErrorResponse (ここでは扱わない)
 */
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Success<T> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<usize>,
    data: T,
}

impl<T> Success<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: "success",
            results: None,
            data,
        }
    }

    pub fn with_results(results: usize, data: T) -> Self {
        Self {
            status: "success",
            results: Some(results),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn single_payload_has_no_results_field() {
        let body = serde_json::to_value(Success::new(json!({"booking": 1}))).unwrap();
        assert_eq!(body, json!({"status": "success", "data": {"booking": 1}}));
    }

    #[test]
    fn list_payload_counts_results() {
        let body = serde_json::to_value(Success::with_results(2, json!({"bookings": [1, 2]}))).unwrap();
        assert_eq!(body["results"], 2);
        assert_eq!(body["status"], "success");
    }
}
