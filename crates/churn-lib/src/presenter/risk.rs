//! Risk tier bucketing of churn probability

use serde::{Deserialize, Serialize};
use std::fmt;

/// Probabilities strictly above this are high risk
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;

/// Probabilities strictly above this (and not high) are medium risk
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Bucket a churn probability; the thresholds themselves fall to the lower tier
    pub fn from_probability(probability: f64) -> Self {
        if probability > HIGH_RISK_THRESHOLD {
            RiskTier::High
        } else if probability > MEDIUM_RISK_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }

    /// Operator guidance shown next to the tier
    pub fn advisory(&self) -> &'static str {
        match self {
            RiskTier::High => {
                "High churn risk: contact this customer right away with a retention offer."
            }
            RiskTier::Medium => {
                "Medium churn risk: monitor this customer and follow up on open complaints."
            }
            RiskTier::Low => "Low churn risk: keep up the current level of service.",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_strict() {
        assert_eq!(RiskTier::from_probability(0.71), RiskTier::High);
        assert_eq!(RiskTier::from_probability(0.7), RiskTier::Medium);
        assert_eq!(RiskTier::from_probability(0.41), RiskTier::Medium);
        assert_eq!(RiskTier::from_probability(0.4), RiskTier::Low);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(RiskTier::from_probability(0.0), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(1.0), RiskTier::High);
    }

    #[test]
    fn test_total_over_unit_interval() {
        let mut previous = RiskTier::Low;
        for step in 0..=1000 {
            let tier = RiskTier::from_probability(step as f64 / 1000.0);
            // tiers never step back down as probability rises
            assert!(tier as u8 >= previous as u8);
            previous = tier;
        }
        assert_eq!(previous, RiskTier::High);
    }

    #[test]
    fn test_each_tier_has_distinct_advisory() {
        let advisories = [
            RiskTier::Low.advisory(),
            RiskTier::Medium.advisory(),
            RiskTier::High.advisory(),
        ];
        assert_ne!(advisories[0], advisories[1]);
        assert_ne!(advisories[1], advisories[2]);
        assert_ne!(advisories[0], advisories[2]);
    }
}
