//! 日期类型模块
//!
//! 提供库存报表使用的日期区间：
//! - `ReportPeriod`: 可选的起止日期，负责校验与查询参数生成
//! - `format_timestamp`: 服务端时间戳的统一展示格式

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 服务端接受的日期格式 (YYYY-MM-DD)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =========================================================
// ReportPeriod - 报表日期区间
// =========================================================

/// 报表日期区间，两端均可为空（即不限制）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// 区间校验错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodError {
    /// 结束日期早于开始日期
    EndBeforeStart,
}

impl std::fmt::Display for PeriodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodError::EndBeforeStart => write!(f, "End date must not be before start date"),
        }
    }
}

impl std::error::Error for PeriodError {}

impl ReportPeriod {
    /// 创建区间并校验先后顺序
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, PeriodError> {
        if let (Some(s), Some(e)) = (start, end) {
            if e < s {
                return Err(PeriodError::EndBeforeStart);
            }
        }
        Ok(Self { start, end })
    }

    /// 是否没有任何限制
    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// 转换为查询参数 (`start_date` / `end_date`)
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(start) = self.start {
            params.push(("start_date", start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = self.end {
            params.push(("end_date", end.format(DATE_FORMAT).to_string()));
        }
        params
    }
}

/// 解析 `<input type="date">` 的值
///
/// 空字符串或无法解析时返回 None
pub fn parse_date_input(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// 将日期转换为 `<input type="date">` 可用的值
pub fn date_input_value(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// 时间戳展示格式
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_end_before_start() {
        let err = ReportPeriod::new(Some(day(2024, 5, 2)), Some(day(2024, 5, 1))).unwrap_err();
        assert_eq!(err, PeriodError::EndBeforeStart);
        assert!(ReportPeriod::new(Some(day(2024, 5, 1)), Some(day(2024, 5, 1))).is_ok());
    }

    #[test]
    fn query_only_includes_given_bounds() {
        assert!(ReportPeriod::default().query().is_empty());
        assert!(ReportPeriod::default().is_unbounded());

        let period = ReportPeriod::new(None, Some(day(2024, 1, 31))).unwrap();
        assert_eq!(period.query(), vec![("end_date", "2024-01-31".to_string())]);
    }

    #[test]
    fn date_input_round_trip() {
        assert_eq!(parse_date_input("2024-02-29"), Some(day(2024, 2, 29)));
        assert_eq!(parse_date_input("  "), None);
        assert_eq!(parse_date_input("29/02/2024"), None);
        assert_eq!(date_input_value(Some(day(2024, 2, 29))), "2024-02-29");
        assert_eq!(date_input_value(None), "");
    }

    #[test]
    fn timestamps_render_to_minutes() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 59).unwrap();
        assert_eq!(format_timestamp(&ts), "2024-03-01 09:05");
    }
}
