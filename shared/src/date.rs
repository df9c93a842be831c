//! 时间工具模块
//!
//! 服务端时间均为 UTC（RFC 3339）；展示时转换为浏览器本地时区。
//! 日期输入框使用 `YYYY-MM-DD`。

use chrono::{DateTime, Local, NaiveDate, Utc};

const INPUT_FORMAT: &str = "%Y-%m-%d";

/// 本地时区的今天
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `<input type="date">` 的取值
pub fn to_input_value(date: NaiveDate) -> String {
    date.format(INPUT_FORMAT).to_string()
}

/// 解析日期输入框的值，空字符串或格式错误返回 None
pub fn parse_input_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), INPUT_FORMAT).ok()
}

/// 如 `Mar 1, 2024`
pub fn format_date(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%b %-d, %Y").to_string()
}

/// 如 `Mar 1, 2024 14:05`
pub fn format_date_time(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%b %-d, %Y %H:%M").to_string()
}

pub fn format_time(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%H:%M").to_string()
}

/// 报表标题中的日期，如 `March 1, 2024`
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(to_input_value(date), "2024-03-09");
        assert_eq!(parse_input_date(" 2024-03-09 "), Some(date));
    }

    #[test]
    fn test_invalid_input_dates() {
        assert_eq!(parse_input_date(""), None);
        assert_eq!(parse_input_date("2024-13-01"), None);
        assert_eq!(parse_input_date("09/03/2024"), None);
    }

    #[test]
    fn test_long_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(format_long_date(date), "March 1, 2024");
    }

    #[test]
    fn test_local_formats_contain_year() {
        let time: DateTime<Utc> = "2024-06-15T12:00:00Z".parse().unwrap();
        assert!(format_date(&time).ends_with("2024"));
        assert_eq!(format_time(&time).len(), 5);
    }
}
