// ==========================================
// 炼钢生产计划 - 领域类型定义
// ==========================================
// 职责: 质量组 / 上传文件类型 / 年月值类型
// ==========================================

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 质量组 (Quality Group)
// ==========================================
// 顺序: 声明顺序即输出顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityGroup {
    Rebar, // 螺纹钢
    Sbq,   // 特殊棒材
    Mbq,   // 商品棒材
    Chq,   // 冷镦钢
}

impl QualityGroup {
    pub const ALL: [QualityGroup; 4] = [
        QualityGroup::Rebar,
        QualityGroup::Sbq,
        QualityGroup::Mbq,
        QualityGroup::Chq,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityGroup::Rebar => "REBAR",
            QualityGroup::Sbq => "SBQ",
            QualityGroup::Mbq => "MBQ",
            QualityGroup::Chq => "CHQ",
        }
    }
}

impl fmt::Display for QualityGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QualityGroup {
    type Err = String;

    /// 大小写不敏感（表格中常见 "Rebar" / "rebar"）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "REBAR" => Ok(QualityGroup::Rebar),
            "SBQ" => Ok(QualityGroup::Sbq),
            "MBQ" => Ok(QualityGroup::Mbq),
            "CHQ" => Ok(QualityGroup::Chq),
            other => Err(format!("未知质量组: {}", other)),
        }
    }
}

// ==========================================
// 上传文件类型 (Upload File Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadFileType {
    MonthlySteelGradeProduction, // 月度钢种产量
    DailyChargeSchedule,         // 日装炉计划
    MonthlyOrderForecast,        // 月度质量组订单预测
}

impl UploadFileType {
    pub const ALL: [UploadFileType; 3] = [
        UploadFileType::MonthlySteelGradeProduction,
        UploadFileType::DailyChargeSchedule,
        UploadFileType::MonthlyOrderForecast,
    ];

    /// 文件类型键（即约定的上传文件名）
    pub fn file_name(&self) -> &'static str {
        match self {
            UploadFileType::MonthlySteelGradeProduction => "steel_grade_production.xlsx",
            UploadFileType::DailyChargeSchedule => "daily_charge_schedule.xlsx",
            UploadFileType::MonthlyOrderForecast => "product_groups_monthly.xlsx",
        }
    }
}

impl fmt::Display for UploadFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

impl FromStr for UploadFileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        UploadFileType::ALL
            .into_iter()
            .find(|t| t.file_name() == key)
            .ok_or_else(|| format!("未知文件类型: {}", key))
    }
}

impl Serialize for UploadFileType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.file_name())
    }
}

impl<'de> Deserialize<'de> for UploadFileType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ==========================================
// 年月 (Year Month)
// ==========================================
// 序列化格式: "YYYY-MM"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// 构造年月（月份越界返回 None）
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// 当月第一天（入库格式）
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// 严格解析查询参数: 仅接受 YYYY-MM
    pub fn parse_strict(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        let bytes = trimmed.as_bytes();
        if bytes.len() != 7
            || bytes[4] != b'-'
            || !bytes[..4].iter().chain(&bytes[5..]).all(u8::is_ascii_digit)
        {
            return None;
        }
        NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d")
            .ok()
            .map(Self::from_date)
    }

    /// 宽松解析入库/表头日期
    ///
    /// 支持: YYYY-MM / YYYY-MM-DD / YYYY-MM-DD HH:MM:SS / YYYY/MM/DD / "June 2024" / "Jun 2024"
    pub fn parse_lenient(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(ym) = Self::parse_strict(trimmed) {
            return Some(ym);
        }
        for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
            if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
                return Some(Self::from_date(d));
            }
        }
        for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                return Some(Self::from_date(dt.date()));
            }
        }
        for fmt in ["%d %B %Y", "%d %b %Y"] {
            if let Ok(d) = NaiveDate::parse_from_str(&format!("1 {}", trimmed), fmt) {
                return Some(Self::from_date(d));
            }
        }
        None
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_strict(s).ok_or_else(|| format!("月份格式错误（期望 YYYY-MM）: {}", s))
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_group_parse_case_insensitive() {
        assert_eq!("rebar".parse::<QualityGroup>().unwrap(), QualityGroup::Rebar);
        assert_eq!(" Sbq ".parse::<QualityGroup>().unwrap(), QualityGroup::Sbq);
        assert!("XYZ".parse::<QualityGroup>().is_err());
    }

    #[test]
    fn test_quality_group_order_and_serde() {
        assert!(QualityGroup::Rebar < QualityGroup::Chq);
        assert_eq!(serde_json::to_string(&QualityGroup::Mbq).unwrap(), "\"MBQ\"");
    }

    #[test]
    fn test_upload_file_type_roundtrip_key() {
        for t in UploadFileType::ALL {
            assert_eq!(t.file_name().parse::<UploadFileType>().unwrap(), t);
        }
        assert!("other.xlsx".parse::<UploadFileType>().is_err());
    }

    #[test]
    fn test_year_month_strict() {
        let ym: YearMonth = "2024-09".parse().unwrap();
        assert_eq!(ym.year(), 2024);
        assert_eq!(ym.month(), 9);
        assert_eq!(ym.to_string(), "2024-09");

        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("2024-9".parse::<YearMonth>().is_err());
        assert!("2024/09".parse::<YearMonth>().is_err());
        assert!("".parse::<YearMonth>().is_err());
        assert!("-999-09".parse::<YearMonth>().is_err());
        assert!("+999-09".parse::<YearMonth>().is_err());
        assert!("2024-+9".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_year_month_lenient() {
        let expected = YearMonth::new(2024, 6).unwrap();
        assert_eq!(YearMonth::parse_lenient("2024-06-01"), Some(expected));
        assert_eq!(YearMonth::parse_lenient("2024-06-01 00:00:00"), Some(expected));
        assert_eq!(YearMonth::parse_lenient("June 2024"), Some(expected));
        assert_eq!(YearMonth::parse_lenient("Jun 2024"), Some(expected));
        assert_eq!(YearMonth::parse_lenient("not a month"), None);
    }

    #[test]
    fn test_year_month_ordering() {
        let a = YearMonth::new(2023, 12).unwrap();
        let b = YearMonth::new(2024, 1).unwrap();
        assert!(a < b);
        assert_eq!(b.first_day(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }
}
