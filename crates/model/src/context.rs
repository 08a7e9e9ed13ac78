//! Planning context: the year / horizon / period / brand / segment a plan
//! is viewed under. Tables are only shown once a context validates.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ContextError;

pub const YEAR_RANGE: RangeInclusive<i32> = 2020..=2030;
pub const DEFAULT_YEAR: i32 = 2025;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Horizon {
    #[default]
    Quarterly,
    HalfYearly,
    Annual,
}

impl Horizon {
    pub fn periods(&self) -> &'static [&'static str] {
        match self {
            Self::Quarterly => &["Q1", "Q2", "Q3", "Q4"],
            Self::HalfYearly => &["H1", "H2"],
            Self::Annual => &["Full year"],
        }
    }

    pub fn default_period(&self) -> &'static str {
        self.periods()[0]
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quarterly => write!(f, "Quarterly"),
            Self::HalfYearly => write!(f, "Half-yearly"),
            Self::Annual => write!(f, "Annual"),
        }
    }
}

impl FromStr for Horizon {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quarterly" => Ok(Self::Quarterly),
            "half-yearly" | "half_yearly" | "halfyearly" => Ok(Self::HalfYearly),
            "annual" => Ok(Self::Annual),
            _ => Err(ContextError::UnknownHorizon(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanningContext {
    pub year: i32,
    pub horizon: Horizon,
    pub period: String,
    pub brand: String,
    pub segment: String,
}

impl PlanningContext {
    /// Validate raw selections against the configured brand and segment lists.
    /// A missing period falls back to the horizon's first period.
    pub fn select(
        year: i32,
        horizon: Horizon,
        period: Option<&str>,
        brand: Option<&str>,
        segment: Option<&str>,
        brands: &[String],
        segments: &[String],
    ) -> Result<Self, ContextError> {
        if !YEAR_RANGE.contains(&year) {
            return Err(ContextError::YearOutOfRange { year });
        }

        let period = period.unwrap_or_else(|| horizon.default_period());
        if !horizon.periods().contains(&period) {
            return Err(ContextError::InvalidPeriod {
                horizon: horizon.to_string(),
                period: period.to_string(),
            });
        }

        let brand = match brand.map(str::trim) {
            None | Some("") => return Err(ContextError::BrandNotSelected),
            Some(b) if !brands.iter().any(|x| x == b) => {
                return Err(ContextError::UnknownBrand(b.to_string()))
            }
            Some(b) => b,
        };

        let segment = match segment.map(str::trim) {
            None | Some("") => return Err(ContextError::SegmentNotSelected),
            Some(s) if !segments.iter().any(|x| x == s) => {
                return Err(ContextError::UnknownSegment(s.to_string()))
            }
            Some(s) => s,
        };

        Ok(Self {
            year,
            horizon,
            period: period.to_string(),
            brand: brand.to_string(),
            segment: segment.to_string(),
        })
    }
}

impl fmt::Display for PlanningContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Year: {} | Period: {} | Horizon: {} | Segment: {} | Brand: {}",
            self.year, self.period, self.horizon, self.segment, self.brand
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists() -> (Vec<String>, Vec<String>) {
        (
            vec!["Brand A".into(), "Brand B".into()],
            vec!["Bath".into(), "LDS".into()],
        )
    }

    #[test]
    fn period_options() {
        assert_eq!(Horizon::Quarterly.periods(), ["Q1", "Q2", "Q3", "Q4"]);
        assert_eq!(Horizon::HalfYearly.periods(), ["H1", "H2"]);
        assert_eq!(Horizon::Annual.periods(), ["Full year"]);
    }

    #[test]
    fn parse_horizon() {
        assert_eq!("Half-yearly".parse::<Horizon>(), Ok(Horizon::HalfYearly));
        assert_eq!("ANNUAL".parse::<Horizon>(), Ok(Horizon::Annual));
        assert!("monthly".parse::<Horizon>().is_err());
    }

    #[test]
    fn select_defaults_period() {
        let (b, s) = lists();
        let ctx = PlanningContext::select(
            2025,
            Horizon::HalfYearly,
            None,
            Some("Brand A"),
            Some("Bath"),
            &b,
            &s,
        )
        .unwrap();
        assert_eq!(ctx.period, "H1");
        assert_eq!(
            ctx.to_string(),
            "Year: 2025 | Period: H1 | Horizon: Half-yearly | Segment: Bath | Brand: Brand A"
        );
    }

    #[test]
    fn select_requires_brand_then_segment() {
        let (b, s) = lists();
        assert_eq!(
            PlanningContext::select(2025, Horizon::Annual, None, None, None, &b, &s),
            Err(ContextError::BrandNotSelected)
        );
        assert_eq!(
            PlanningContext::select(
                2025,
                Horizon::Annual,
                None,
                Some("Brand B"),
                Some("  "),
                &b,
                &s
            ),
            Err(ContextError::SegmentNotSelected)
        );
        assert_eq!(
            PlanningContext::select(
                2025,
                Horizon::Annual,
                None,
                Some("Brand Z"),
                Some("Bath"),
                &b,
                &s
            ),
            Err(ContextError::UnknownBrand("Brand Z".into()))
        );
    }

    #[test]
    fn select_rejects_bad_year_and_period() {
        let (b, s) = lists();
        assert_eq!(
            PlanningContext::select(
                2031,
                Horizon::Annual,
                None,
                Some("Brand A"),
                Some("Bath"),
                &b,
                &s
            ),
            Err(ContextError::YearOutOfRange { year: 2031 })
        );
        assert!(matches!(
            PlanningContext::select(
                2025,
                Horizon::Annual,
                Some("Q1"),
                Some("Brand A"),
                Some("Bath"),
                &b,
                &s
            ),
            Err(ContextError::InvalidPeriod { .. })
        ));
    }
}
