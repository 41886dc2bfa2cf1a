//! Chart periods and their time windows.

use std::str::FromStr;

use chrono::{DateTime, Datelike, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// Granularity of the sales chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// One bucket per day over the last 30 days
    #[default]
    Daily,
    /// One bucket per ISO week over the last 90 days
    Weekly,
    /// One bucket per month over the last 365 days
    Monthly,
}

impl Period {
    /// Query-string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Trailing window covered by the chart.
    #[must_use]
    pub fn window(&self) -> TimeDelta {
        match self {
            Self::Daily => TimeDelta::days(30),
            Self::Weekly => TimeDelta::days(90),
            Self::Monthly => TimeDelta::days(365),
        }
    }

    /// How many orders to fetch for the chart.
    #[must_use]
    pub const fn fetch_limit(&self) -> u32 {
        match self {
            Self::Monthly => 200,
            Self::Daily | Self::Weekly => 100,
        }
    }

    /// Bucket label for a timestamp: `YYYY-MM-DD`, `YYYY-Www` or `YYYY-MM`.
    #[must_use]
    pub fn bucket_key(&self, at: DateTime<Utc>) -> String {
        match self {
            Self::Daily => at.format("%Y-%m-%d").to_string(),
            Self::Weekly => {
                let week = at.iso_week();
                format!("{:04}-W{:02}", week.year(), week.week())
            }
            Self::Monthly => at.format("%Y-%m").to_string(),
        }
    }
}

impl FromStr for Period {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(DashboardError::UnknownPeriod(other.to_string())),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_known_periods() {
        assert_eq!("daily".parse::<Period>().unwrap(), Period::Daily);
        assert_eq!("weekly".parse::<Period>().unwrap(), Period::Weekly);
        assert_eq!("monthly".parse::<Period>().unwrap(), Period::Monthly);
        assert!("hourly".parse::<Period>().is_err());
    }

    #[test]
    fn bucket_keys() {
        let at = Utc.with_ymd_and_hms(2025, 1, 5, 13, 0, 0).unwrap();
        assert_eq!(Period::Daily.bucket_key(at), "2025-01-05");
        assert_eq!(Period::Weekly.bucket_key(at), "2025-W01");
        assert_eq!(Period::Monthly.bucket_key(at), "2025-01");
    }

    #[test]
    fn iso_week_belongs_to_iso_year() {
        // 2024-12-30 is a Monday in ISO week 1 of 2025
        let at = Utc.with_ymd_and_hms(2024, 12, 30, 0, 0, 0).unwrap();
        assert_eq!(Period::Weekly.bucket_key(at), "2025-W01");
    }

    #[test]
    fn windows_and_limits() {
        assert_eq!(Period::Daily.window(), TimeDelta::days(30));
        assert_eq!(Period::Weekly.window(), TimeDelta::days(90));
        assert_eq!(Period::Monthly.window(), TimeDelta::days(365));
        assert_eq!(Period::Monthly.fetch_limit(), 200);
        assert_eq!(Period::Weekly.fetch_limit(), 100);
    }
}
