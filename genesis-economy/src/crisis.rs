//! Crisis evaluator: classifies an economy snapshot into a world condition.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFLATION_SEVERITY, DEFLATION_THRESHOLD, FORCED_PANIC_SEVERITY, HYPER_INFLATION_SEVERITY,
    HYPER_INFLATION_THRESHOLD, MAX_SEVERITY, QUEST_SEVERITY_THRESHOLD,
};
use crate::economy::EconomySnapshot;
use crate::error::ConfigError;

/// World condition named in quest requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrisisCondition {
    Stable,
    HyperInflation,
    DeflationarySpiral,
    /// Only reachable through a forced crisis.
    ResourceFamine,
    /// Only reachable through a forced crisis.
    TradeWar,
}

impl CrisisCondition {
    /// Conditions a game master may force.
    pub const FORCEABLE: [Self; 4] = [
        Self::HyperInflation,
        Self::DeflationarySpiral,
        Self::ResourceFamine,
        Self::TradeWar,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stable => "Stable",
            Self::HyperInflation => "Hyper-Inflation",
            Self::DeflationarySpiral => "Deflationary Spiral",
            Self::ResourceFamine => "Resource Famine",
            Self::TradeWar => "Trade War",
        }
    }

    /// Whether the remedy should pull gold out of circulation.
    #[must_use]
    pub const fn calls_for_gold_sink(self) -> bool {
        !matches!(self, Self::DeflationarySpiral)
    }
}

impl fmt::Display for CrisisCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CrisisCondition {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "stable" => Ok(Self::Stable),
            "hyperinflation" => Ok(Self::HyperInflation),
            "deflationaryspiral" | "deflation" => Ok(Self::DeflationarySpiral),
            "resourcefamine" | "famine" => Ok(Self::ResourceFamine),
            "tradewar" => Ok(Self::TradeWar),
            _ => Err(ConfigError::UnknownCondition {
                name: s.to_string(),
            }),
        }
    }
}

/// Player mood attached to an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Happy,
    Concern,
    Panic,
    Depression,
}

impl Sentiment {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Happy => "Happy",
            Self::Concern => "Concern",
            Self::Panic => "Panic",
            Self::Depression => "Depression",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisAssessment {
    pub condition: CrisisCondition,
    /// 0 to 10.
    pub severity: u8,
    pub sentiment: Sentiment,
}

impl CrisisAssessment {
    pub const STABLE: Self = Self {
        condition: CrisisCondition::Stable,
        severity: 0,
        sentiment: Sentiment::Happy,
    };

    /// Game-master override with a hand-picked severity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SeverityRange`] when `severity` exceeds the
    /// maximum of 10.
    pub const fn forced(condition: CrisisCondition, severity: u8) -> Result<Self, ConfigError> {
        if severity > MAX_SEVERITY {
            return Err(ConfigError::SeverityRange {
                value: severity,
                max: MAX_SEVERITY,
            });
        }
        let sentiment = if severity > FORCED_PANIC_SEVERITY {
            Sentiment::Panic
        } else {
            Sentiment::Concern
        };
        Ok(Self {
            condition,
            severity,
            sentiment,
        })
    }

    /// Severity high enough to wake the narrative generator.
    #[must_use]
    pub const fn requires_intervention(&self) -> bool {
        self.severity > QUEST_SEVERITY_THRESHOLD
    }
}

/// Maps inflation bands to a condition. Pure.
#[must_use]
pub fn classify(snapshot: &EconomySnapshot) -> CrisisAssessment {
    let inflation = snapshot.inflation_rate;
    if inflation > HYPER_INFLATION_THRESHOLD {
        CrisisAssessment {
            condition: CrisisCondition::HyperInflation,
            severity: HYPER_INFLATION_SEVERITY,
            sentiment: Sentiment::Panic,
        }
    } else if inflation < DEFLATION_THRESHOLD {
        CrisisAssessment {
            condition: CrisisCondition::DeflationarySpiral,
            severity: DEFLATION_SEVERITY,
            sentiment: Sentiment::Depression,
        }
    } else {
        CrisisAssessment::STABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(inflation_rate: f64) -> EconomySnapshot {
        EconomySnapshot {
            money_supply: 1_000.0,
            inflation_rate,
            tax_rate: 0.05,
        }
    }

    #[test]
    fn classifies_inflation_bands() {
        let hot = classify(&snapshot(12.0));
        assert_eq!(hot.condition, CrisisCondition::HyperInflation);
        assert_eq!(hot.severity, 8);
        assert_eq!(hot.sentiment, Sentiment::Panic);

        let cold = classify(&snapshot(-3.0));
        assert_eq!(cold.condition, CrisisCondition::DeflationarySpiral);
        assert_eq!(cold.severity, 7);
        assert_eq!(cold.sentiment, Sentiment::Depression);

        assert_eq!(classify(&snapshot(1.0)), CrisisAssessment::STABLE);
    }

    #[test]
    fn six_percent_inflation_is_hyper_inflation() {
        let expected = CrisisAssessment {
            condition: CrisisCondition::HyperInflation,
            severity: 8,
            sentiment: Sentiment::Panic,
        };
        assert_eq!(classify(&snapshot(6.0)), expected);
        assert_eq!(classify(&snapshot(5.0001)), expected);
        assert_eq!(classify(&snapshot(-2.0001)).condition, CrisisCondition::DeflationarySpiral);
    }

    #[test]
    fn band_edges_are_stable() {
        assert_eq!(classify(&snapshot(5.0)), CrisisAssessment::STABLE);
        assert_eq!(classify(&snapshot(-2.0)), CrisisAssessment::STABLE);
    }

    #[test]
    fn intervention_threshold() {
        assert!(classify(&snapshot(12.0)).requires_intervention());
        assert!(classify(&snapshot(-3.0)).requires_intervention());
        assert!(!CrisisAssessment::STABLE.requires_intervention());
        assert!(
            !CrisisAssessment::forced(CrisisCondition::TradeWar, 3)
                .unwrap()
                .requires_intervention()
        );
        assert!(
            CrisisAssessment::forced(CrisisCondition::TradeWar, 4)
                .unwrap()
                .requires_intervention()
        );
    }

    #[test]
    fn forced_sentiment_follows_severity() {
        let calm = CrisisAssessment::forced(CrisisCondition::ResourceFamine, 7).unwrap();
        assert_eq!(calm.sentiment, Sentiment::Concern);
        let panic = CrisisAssessment::forced(CrisisCondition::ResourceFamine, 8).unwrap();
        assert_eq!(panic.sentiment, Sentiment::Panic);
        assert_eq!(
            CrisisAssessment::forced(CrisisCondition::HyperInflation, 11),
            Err(ConfigError::SeverityRange { value: 11, max: 10 })
        );
    }

    #[test]
    fn conditions_parse_from_labels() {
        for condition in CrisisCondition::FORCEABLE {
            assert_eq!(condition.label().parse::<CrisisCondition>(), Ok(condition));
        }
        assert_eq!(
            "trade_war".parse::<CrisisCondition>(),
            Ok(CrisisCondition::TradeWar)
        );
        assert!(matches!(
            "Plague".parse::<CrisisCondition>(),
            Err(ConfigError::UnknownCondition { .. })
        ));
    }

    #[test]
    fn only_deflation_calls_for_stimulus() {
        assert!(CrisisCondition::HyperInflation.calls_for_gold_sink());
        assert!(CrisisCondition::TradeWar.calls_for_gold_sink());
        assert!(!CrisisCondition::DeflationarySpiral.calls_for_gold_sink());
    }
}
