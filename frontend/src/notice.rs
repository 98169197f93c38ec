//! 提示消息模型
//!
//! 所有页面共用的短暂提示（成功/失败），由 `components::notice` 负责渲染与自动关闭。

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// 服务端消息优先，否则使用默认文案
    pub fn from_api_error(err: &ApiError, fallback: &str) -> Self {
        Self::error(err.message_or(fallback))
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn alert_class(&self) -> &'static str {
        match self.severity {
            Severity::Success => "alert alert-success shadow-lg",
            Severity::Error => "alert alert-error shadow-lg",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_notice_prefers_server_text() {
        let err = ApiError::from_response(400, r#"{"detail": "Product is required"}"#);
        let notice = Notice::from_api_error(&err, "Failed to create variant");
        assert!(notice.is_error());
        assert_eq!(notice.message, "Product is required");
    }
}
