//! API 错误类型
//!
//! 客户端只区分两类失败：
//! - 网络/服务端错误 (`ApiError`)，转换为一次性的提示消息
//! - 本地校验错误，由各表单状态自行持有，不经过这里

use serde_json::Value;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 请求构建失败
    #[error("request could not be built: {0}")]
    Request(String),
    /// 网络请求失败
    #[error("network error: {0}")]
    Network(String),
    /// 服务端返回非 2xx 状态
    #[error("server responded with status {status}")]
    Server {
        status: u16,
        /// 服务端响应体中可读的错误信息
        message: Option<String>,
    },
    /// 响应解析失败
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// 根据非 2xx 响应构建错误，尽量提取服务端给出的错误信息
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::Server {
            status,
            message: extract_server_message(body),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// 用于提示框的消息：优先使用服务端消息，否则使用调用方给出的默认文案
    pub fn message_or(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

/// 依次尝试 `detail`、`message`、`error`、`non_field_errors`，
/// 最后取第一个字段校验错误
fn extract_server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match &value {
        Value::Object(map) => {
            for key in ["detail", "message", "error", "non_field_errors"] {
                if let Some(text) = map.get(key).and_then(text_of) {
                    return Some(text);
                }
            }
            map.iter()
                .find_map(|(field, v)| text_of(v).map(|text| format!("{}: {}", field, text)))
        }
        other => text_of(other),
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) => items.iter().find_map(text_of),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_wins() {
        let err = ApiError::from_response(400, r#"{"detail": "Insufficient stock available."}"#);
        assert_eq!(err.server_message(), Some("Insufficient stock available."));
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn field_errors_are_flattened() {
        let err = ApiError::from_response(400, r#"{"ProductCode": ["ProductCode must be unique."]}"#);
        assert_eq!(
            err.server_message(),
            Some("ProductCode: ProductCode must be unique.")
        );
    }

    #[test]
    fn non_field_errors_are_used_without_prefix() {
        let err = ApiError::from_response(400, r#"{"non_field_errors": ["Quantity must be greater than zero."]}"#);
        assert_eq!(
            err.server_message(),
            Some("Quantity must be greater than zero.")
        );
    }

    #[test]
    fn html_error_page_falls_back() {
        let err = ApiError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.server_message(), None);
        assert_eq!(err.message_or("Failed to add stock"), "Failed to add stock");
    }

    #[test]
    fn network_errors_never_carry_server_text() {
        let err = ApiError::Network("TypeError: Failed to fetch".to_string());
        assert_eq!(err.message_or("Failed to load"), "Failed to load");
        assert_eq!(err.status(), None);
    }
}
