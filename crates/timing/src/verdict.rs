//! Leakage verdict derived from timing variation

use core::fmt;

use kemscope_api::{error::ConfigResult, Error};
use serde::{Deserialize, Serialize};

/// Coarse classification of timing variation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeakageLevel {
    /// Low timing variation
    Low,
    /// Moderate timing variation, worth a review
    Moderate,
    /// High timing variation, potential vulnerability
    High,
    /// No coefficient of variation could be computed
    Undetermined,
}

impl fmt::Display for LeakageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Undetermined => "undetermined",
        })
    }
}

/// Thresholds on the maximum coefficient of variation, in percent.
///
/// `cv < low` is [`LeakageLevel::Low`], `cv < moderate` is
/// [`LeakageLevel::Moderate`], anything else [`LeakageLevel::High`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerdictPolicy {
    pub low_cv_percent: f64,
    pub moderate_cv_percent: f64,
}

impl Default for VerdictPolicy {
    fn default() -> Self {
        Self::new(5.0, 10.0)
    }
}

impl VerdictPolicy {
    pub fn new(low_cv_percent: f64, moderate_cv_percent: f64) -> Self {
        Self {
            low_cv_percent,
            moderate_cv_percent,
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let ordered = self.low_cv_percent > 0.0
            && self.low_cv_percent <= self.moderate_cv_percent
            && self.moderate_cv_percent.is_finite();
        if !ordered {
            return Err(Error::config(format!(
                "verdict thresholds must satisfy 0 < low <= moderate, got {} and {}",
                self.low_cv_percent, self.moderate_cv_percent
            )));
        }
        Ok(())
    }

    /// Classify the largest of `cvs`, ignoring missing values
    pub fn classify<I>(&self, cvs: I) -> Verdict
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let max_cv_percent = cvs.into_iter().flatten().fold(None, |acc: Option<f64>, cv| {
            Some(acc.map_or(cv, |m| m.max(cv)))
        });

        let level = match max_cv_percent {
            None => LeakageLevel::Undetermined,
            Some(cv) if cv < self.low_cv_percent => LeakageLevel::Low,
            Some(cv) if cv < self.moderate_cv_percent => LeakageLevel::Moderate,
            Some(_) => LeakageLevel::High,
        };

        Verdict {
            max_cv_percent,
            level,
        }
    }
}

/// Outcome of [`VerdictPolicy::classify`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Largest coefficient of variation considered
    pub max_cv_percent: Option<f64>,
    /// Classification of `max_cv_percent`
    pub level: LeakageLevel,
}

impl Verdict {
    /// One-line description used in reports
    pub fn summary(&self) -> &'static str {
        match self.level {
            LeakageLevel::Low => "Low timing variation - Good side-channel resistance",
            LeakageLevel::Moderate => "Moderate timing variation - Review implementation",
            LeakageLevel::High => "High timing variation - Potential vulnerability",
            LeakageLevel::Undetermined => "Timing variation could not be determined",
        }
    }
}
