use serde::Deserialize;
use thiserror::Error;

/// An operator-supplied tier name that is not CD, DVD or BLURAY.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown disc tier: {0:?} (expected CD, DVD or BLURAY)")]
pub struct ParseTierError(pub String);

/// Error body returned by the backend on non-2xx responses: `{ "detail": "…" }`.
///
/// `detail` is usually a string, but validation failures carry a list of
/// objects; both are kept as raw JSON and flattened by [`ErrorDetail::message`].
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub detail: serde_json::Value,
}

impl ErrorDetail {
    /// Parse a response body, returning `None` when it carries no detail.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str::<Self>(body)
            .ok()
            .filter(|d| !d.detail.is_null())
    }

    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| {
                    item["msg"]
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| item.to_string())
                })
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail() {
        let d = ErrorDetail::parse(r#"{"detail":"Drive not found"}"#).unwrap();
        assert_eq!(d.message(), "Drive not found");
    }

    #[test]
    fn validation_detail_list() {
        let d = ErrorDetail::parse(
            r#"{"detail":[{"loc":["body","path"],"msg":"field required"},{"msg":"bad"}]}"#,
        )
        .unwrap();
        assert_eq!(d.message(), "field required; bad");
    }

    #[test]
    fn non_json_body_has_no_detail() {
        assert!(ErrorDetail::parse("Internal Server Error").is_none());
        assert!(ErrorDetail::parse(r#"{"status":"ok"}"#).is_none());
    }
}
