//! Risk level classification derived from a predicted probability.

use serde::{Deserialize, Serialize};

/// Four-level risk category with fixed probability thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// [0.0, 0.3)
    Low,
    /// [0.3, 0.6)
    Moderate,
    /// [0.6, 0.8)
    High,
    /// [0.8, 1.0]
    VeryHigh,
}

impl RiskLevel {
    /// Bucket a probability into its risk level.
    pub fn from_probability(probability: f64) -> Self {
        if probability < 0.3 {
            Self::Low
        } else if probability < 0.6 {
            Self::Moderate
        } else if probability < 0.8 {
            Self::High
        } else {
            Self::VeryHigh
        }
    }

    /// Human-readable guidance shown on the result page.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "No significant indicators",
            Self::Moderate => "Follow-up recommended",
            Self::High => "Consultation advised",
            Self::VeryHigh => "Immediate consultation advised",
        }
    }

    /// CSS color used by the result page.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "#10b981",
            Self::Moderate => "#fbbf24",
            Self::High => "#f97316",
            Self::VeryHigh => "#f43f5e",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low Risk"),
            Self::Moderate => write!(f, "Moderate Risk"),
            Self::High => write!(f, "High Risk"),
            Self::VeryHigh => write!(f, "Very High Risk"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(RiskLevel::from_probability(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.2999), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.3), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_probability(0.5999), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_probability(0.6), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(0.7999), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(0.8), RiskLevel::VeryHigh);
        assert_eq!(RiskLevel::from_probability(1.0), RiskLevel::VeryHigh);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(RiskLevel::Low.to_string(), "Low Risk");
        assert_eq!(RiskLevel::Moderate.to_string(), "Moderate Risk");
        assert_eq!(RiskLevel::High.to_string(), "High Risk");
        assert_eq!(RiskLevel::VeryHigh.to_string(), "Very High Risk");
    }
}
