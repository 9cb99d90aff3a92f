use briefing_core::{
    AlertReason, ClassificationResult, IndicatorRoles, IndicatorSpec, IndicatorUnit,
    MetricReading, MetricSnapshot, ReasonCode, RiskLevel, RiskThresholds,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const METRICS_UNAVAILABLE: &str = "metrics unavailable";

/// Risk rules, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskRule {
    /// Volatility index against panic and caution thresholds
    Volatility,

    /// Daily percent change of the crypto reference price
    CryptoCrash,

    /// Long-duration bond yield level (informational only)
    BondYield,
}

/// Reason codes appear in this order regardless of which rules fire.
pub const RULE_ORDER: [RiskRule; 3] = [RiskRule::Volatility, RiskRule::CryptoCrash, RiskRule::BondYield];

/// What a fired rule contributes to the running classification
#[derive(Debug, Clone, PartialEq)]
pub struct RuleFiring {
    /// Level the rule asks for; `None` leaves the level alone
    pub proposed: Option<RiskLevel>,
    pub reason: AlertReason,
}

impl RiskRule {
    /// Evaluate against the snapshot. `None` when the rule does not fire or
    /// its indicator is missing.
    pub fn evaluate(
        &self,
        snapshot: &MetricSnapshot,
        roles: &IndicatorRoles,
        thresholds: &RiskThresholds,
    ) -> Option<RuleFiring> {
        match self {
            RiskRule::Volatility => {
                let vix = snapshot.get(&roles.volatility)?.current()?;
                if vix > thresholds.volatility_panic {
                    Some(RuleFiring {
                        proposed: Some(RiskLevel::Panic),
                        reason: AlertReason {
                            code: ReasonCode::VolatilityPanic,
                            message: format!(
                                "Volatility index exceeds panic threshold ({:.2} > {}). Brace for panic selling.",
                                vix, thresholds.volatility_panic
                            ),
                        },
                    })
                } else if vix > thresholds.volatility_caution {
                    Some(RuleFiring {
                        proposed: Some(RiskLevel::Caution),
                        reason: AlertReason {
                            code: ReasonCode::VolatilityElevated,
                            message: format!(
                                "Volatility index elevated ({:.2} > {}). Price swings are widening.",
                                vix, thresholds.volatility_caution
                            ),
                        },
                    })
                } else {
                    None
                }
            }
            RiskRule::CryptoCrash => {
                let change = snapshot.get(&roles.crypto)?.change_percent()?;
                if change > thresholds.crypto_crash_percent {
                    return None;
                }
                // Same tier as caution; an earlier caution keeps its label
                Some(RuleFiring {
                    proposed: Some(RiskLevel::RiskOff),
                    reason: AlertReason {
                        code: ReasonCode::CryptoCrash,
                        message: format!(
                            "Crypto reference price is crashing ({:+.1}%), a leading risk-off indicator.",
                            change
                        ),
                    },
                })
            }
            RiskRule::BondYield => {
                let yield_pct = snapshot.get(&roles.bond_yield)?.current()?;
                if yield_pct <= thresholds.yield_warning {
                    return None;
                }
                Some(RuleFiring {
                    proposed: None,
                    reason: AlertReason {
                        code: ReasonCode::YieldHigh,
                        message: format!(
                            "Long-term yield is high ({:.2}%). Headwind for growth assets.",
                            yield_pct
                        ),
                    },
                })
            }
        }
    }
}

/// Rule-based market risk classifier
#[derive(Debug, Clone, Default)]
pub struct RiskClassifier {
    thresholds: RiskThresholds,
    roles: IndicatorRoles,
}

impl RiskClassifier {
    pub fn new(thresholds: RiskThresholds, roles: IndicatorRoles) -> Self {
        Self { thresholds, roles }
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// Classify a snapshot.
    ///
    /// Pure: the same snapshot always yields the same result. Each firing
    /// rule can only raise the level by severity, never lower it.
    pub fn classify(&self, snapshot: &MetricSnapshot) -> ClassificationResult {
        let (level, reasons) = RULE_ORDER.iter().fold(
            (RiskLevel::Stable, Vec::new()),
            |(level, mut reasons), rule| {
                match rule.evaluate(snapshot, &self.roles, &self.thresholds) {
                    Some(firing) => {
                        debug!("Rule {:?} fired: {}", rule, firing.reason.message);
                        reasons.push(firing.reason);
                        (firing.proposed.map_or(level, |p| level.raised_to(p)), reasons)
                    }
                    None => (level, reasons),
                }
            },
        );

        ClassificationResult {
            level,
            color: level.color(),
            title: level.title().to_string(),
            reasons,
            metrics_text: metrics_text(snapshot),
        }
    }
}

/// One display line per indicator with a current value
fn metrics_text(snapshot: &MetricSnapshot) -> Vec<String> {
    let lines: Vec<String> = snapshot
        .iter()
        .filter_map(|(spec, reading)| format_metric(spec, reading))
        .collect();

    if lines.is_empty() {
        vec![METRICS_UNAVAILABLE.to_string()]
    } else {
        lines
    }
}

fn format_metric(spec: &IndicatorSpec, reading: &MetricReading) -> Option<String> {
    let current = reading.current()?;
    let value = match spec.unit {
        IndicatorUnit::Points => format!("{:.2}", current),
        IndicatorUnit::Usd => format!("{:.2} USD", current),
        IndicatorUnit::Percent => format!("{:.2}%", current),
    };
    let line = match reading.change_percent() {
        Some(change) => format!("**{}**: {} ({:+.2}%)", spec.label, value, change),
        None => format!("**{}**: {}", spec.label, value),
    };
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use briefing_core::AlertColor;

    fn snapshot(vix: f64, btc: (f64, f64), tnx: f64) -> MetricSnapshot {
        let specs = IndicatorRoles::default().indicators(&[]);
        MetricSnapshot::new()
            .with_reading(specs[0].clone(), MetricReading::new(vix, vix))
            .with_reading(specs[1].clone(), MetricReading::new(btc.1, btc.0))
            .with_reading(specs[2].clone(), MetricReading::new(tnx, tnx))
    }

    fn codes(result: &ClassificationResult) -> Vec<ReasonCode> {
        result.reasons.iter().map(|r| r.code).collect()
    }

    #[test]
    fn test_panic_volatility() {
        let result = RiskClassifier::default().classify(&snapshot(35.0, (100.0, 101.0), 4.0));

        assert_eq!(result.level, RiskLevel::Panic);
        assert_eq!(result.color, AlertColor::Red);
        assert_eq!(result.title, "MARKET PANIC ALERT");
        assert!(result.reasons[0].message.contains("exceeds panic threshold"));
        assert_eq!(codes(&result), vec![ReasonCode::VolatilityPanic]);
    }

    #[test]
    fn test_elevated_volatility_with_crypto_crash() {
        let result = RiskClassifier::default().classify(&snapshot(25.0, (100.0, 94.0), 4.0));

        assert_eq!(result.level, RiskLevel::Caution);
        assert_eq!(result.title, "Market Caution");
        assert_eq!(
            codes(&result),
            vec![ReasonCode::VolatilityElevated, ReasonCode::CryptoCrash]
        );
        assert!(result.reasons[1].message.contains("-6.0%"));
    }

    #[test]
    fn test_high_yield_is_informational() {
        let result = RiskClassifier::default().classify(&snapshot(10.0, (100.0, 102.0), 5.0));

        assert_eq!(result.level, RiskLevel::Stable);
        assert_eq!(result.color, AlertColor::Green);
        assert_eq!(codes(&result), vec![ReasonCode::YieldHigh]);
    }

    #[test]
    fn test_crash_alone_is_risk_off() {
        let result = RiskClassifier::default().classify(&snapshot(15.0, (100.0, 93.0), 4.0));

        assert_eq!(result.level, RiskLevel::RiskOff);
        assert_eq!(result.color, AlertColor::Yellow);
        assert_eq!(result.title, "Risk-Off Signal");
    }

    #[test]
    fn test_crash_alone_is_not_above_elevated_volatility_with_crash() {
        let classifier = RiskClassifier::default();
        let crash_only = classifier.classify(&snapshot(15.0, (100.0, 93.0), 4.0));
        let elevated_and_crash = classifier.classify(&snapshot(25.0, (100.0, 93.0), 4.0));

        assert_eq!(crash_only.level, RiskLevel::RiskOff);
        assert_eq!(elevated_and_crash.level, RiskLevel::Caution);
        assert_eq!(crash_only.level.severity(), elevated_and_crash.level.severity());
        assert_eq!(crash_only.color, elevated_and_crash.color);
    }

    #[test]
    fn test_volatility_thresholds_are_strict() {
        let classifier = RiskClassifier::default();

        let at_panic = classifier.classify(&snapshot(30.0, (100.0, 100.0), 4.0));
        assert_eq!(at_panic.level, RiskLevel::Caution);
        assert_eq!(codes(&at_panic), vec![ReasonCode::VolatilityElevated]);

        let at_caution = classifier.classify(&snapshot(20.0, (100.0, 100.0), 4.0));
        assert_eq!(at_caution.level, RiskLevel::Stable);
        assert!(at_caution.reasons.is_empty());

        let above_panic = classifier.classify(&snapshot(30.01, (100.0, 100.0), 4.0));
        assert_eq!(above_panic.level, RiskLevel::Panic);
    }

    #[test]
    fn test_crash_threshold_is_inclusive() {
        let classifier = RiskClassifier::default();

        let at_threshold = classifier.classify(&snapshot(15.0, (100.0, 95.0), 4.0));
        assert_eq!(codes(&at_threshold), vec![ReasonCode::CryptoCrash]);
        assert_eq!(at_threshold.level, RiskLevel::RiskOff);

        let just_above = classifier.classify(&snapshot(15.0, (100.0, 95.5), 4.0));
        assert!(just_above.reasons.is_empty());
        assert_eq!(just_above.level, RiskLevel::Stable);
    }

    #[test]
    fn test_yield_at_warning_level_adds_no_note() {
        let classifier = RiskClassifier::default();

        let at_warning = classifier.classify(&snapshot(15.0, (100.0, 100.0), 4.5));
        assert!(at_warning.reasons.is_empty());

        let above_warning = classifier.classify(&snapshot(15.0, (100.0, 100.0), 4.51));
        assert_eq!(codes(&above_warning), vec![ReasonCode::YieldHigh]);
        assert_eq!(above_warning.level, RiskLevel::Stable);
    }

    #[test]
    fn test_crash_never_lowers_panic() {
        let result = RiskClassifier::default().classify(&snapshot(40.0, (100.0, 80.0), 4.8));

        assert_eq!(result.level, RiskLevel::Panic);
        assert_eq!(
            codes(&result),
            vec![ReasonCode::VolatilityPanic, ReasonCode::CryptoCrash, ReasonCode::YieldHigh]
        );
    }

    #[test]
    fn test_nominal_market_is_stable() {
        let result = RiskClassifier::default().classify(&snapshot(12.0, (100.0, 99.0), 4.0));

        assert_eq!(result.level, RiskLevel::Stable);
        assert!(result.reasons.is_empty());
        assert_eq!(result.title, "Market is Stable");
    }

    #[test]
    fn test_missing_indicator_skips_only_its_rule() {
        let specs = IndicatorRoles::default().indicators(&[]);
        let snap = MetricSnapshot::new()
            .with_reading(
                specs[0].clone(),
                MetricReading {
                    current: Some(f64::NAN),
                    previous: None,
                },
            )
            .with_reading(specs[1].clone(), MetricReading::new(90.0, 100.0));

        let result = RiskClassifier::default().classify(&snap);

        assert_eq!(codes(&result), vec![ReasonCode::CryptoCrash]);
        assert_eq!(result.level, RiskLevel::RiskOff);
        assert_eq!(result.metrics_text, vec!["**BTC**: 90.00 USD (-10.00%)"]);
    }

    #[test]
    fn test_empty_snapshot_reports_unavailable_metrics() {
        let result = RiskClassifier::default().classify(&MetricSnapshot::new());

        assert_eq!(result.level, RiskLevel::Stable);
        assert!(result.reasons.is_empty());
        assert_eq!(result.metrics_text, vec![METRICS_UNAVAILABLE.to_string()]);
    }

    #[test]
    fn test_metrics_text_lines() {
        let specs = IndicatorRoles::default().indicators(&["^IXIC".to_string()]);
        let snap = MetricSnapshot::new()
            .with_reading(specs[0].clone(), MetricReading::new(22.0, 20.0))
            .with_reading(specs[1].clone(), MetricReading::new(64000.0, 64000.0))
            .with_reading(specs[2].clone(), MetricReading::new(4.5, 4.0))
            .with_reading(
                specs[3].clone(),
                MetricReading {
                    current: Some(17000.0),
                    previous: None,
                },
            );

        let result = RiskClassifier::default().classify(&snap);

        assert_eq!(
            result.metrics_text,
            vec![
                "**VIX**: 22.00 (+10.00%)",
                "**BTC**: 64000.00 USD (+0.00%)",
                "**US10Y**: 4.50% (+12.50%)",
                "**NASDAQ**: 17000.00",
            ]
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = RiskThresholds {
            volatility_caution: 10.0,
            ..RiskThresholds::default()
        };
        let classifier = RiskClassifier::new(thresholds, IndicatorRoles::default());

        let result = classifier.classify(&snapshot(12.0, (100.0, 99.0), 4.0));

        assert_eq!(result.level, RiskLevel::Caution);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = RiskClassifier::default();
        let snap = snapshot(25.0, (100.0, 94.0), 5.0);
        assert_eq!(classifier.classify(&snap), classifier.classify(&snap));
    }
}
