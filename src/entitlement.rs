// ⚖️ Entitlement Calculator - rice/cash conversion and unit inference
//
// Entitlements are conventionally expressed in kg of rice and converted to
// rupiah at the configured exchange rate. Legacy rows store only the number,
// so display has to infer which unit it is in. Inference lives behind
// `resolve_unit`: once a record carries an explicit unit it is never used.

use crate::config::ZakatConfig;
use crate::entities::{Category, PaymentKind};
use crate::format::{format_currency, format_weight};
use serde::{Deserialize, Serialize};

// ============================================================================
// UNIT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Kilograms of rice
    #[serde(rename = "beras")]
    Weight,

    /// Rupiah
    #[serde(rename = "uang")]
    Cash,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Weight => "beras",
            Unit::Cash => "uang",
        }
    }

    /// Parse the form value ("beras"/"uang"), also accepting English names
    pub fn parse(s: &str) -> Option<Unit> {
        match s.trim().to_lowercase().as_str() {
            "beras" | "weight" | "kg" => Some(Unit::Weight),
            "uang" | "cash" | "rp" => Some(Unit::Cash),
            _ => None,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CONVERSION
// ============================================================================

/// Weight → `base` unchanged; Cash → `base × exchange_rate`
pub fn compute_entitlement(base_entitlement: f64, unit: Unit, exchange_rate: f64) -> f64 {
    match unit {
        Unit::Weight => base_entitlement,
        Unit::Cash => base_entitlement * exchange_rate,
    }
}

// ============================================================================
// UNIT INFERENCE (legacy rows without a unit tag)
// ============================================================================

/// Which step of the inference decided the unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceRule {
    /// Category carries an explicit unit tag
    CategoryTag,
    /// Value equals the category entitlement converted to cash
    MatchesCash,
    /// Value equals the category entitlement as-is
    MatchesWeight,
    /// Value differs from the category entitlement and is ≥ threshold
    AboveThreshold,
    /// Category known, nothing matched
    CategoryFallback,
    /// No category: threshold alone decided
    ThresholdOnly,
}

/// Best-guess unit for a stored value. Never fails.
///
/// Known limitation: with no category, or when the value matches nothing the
/// category predicts, any value ≥ `cash_threshold` is read as rupiah, so a
/// genuine weight of 1000 kg or more is misclassified.
pub fn infer_unit(stored_value: f64, category: Option<&Category>, config: &ZakatConfig) -> Unit {
    infer_unit_with_rule(stored_value, category, config).0
}

/// `infer_unit`, also reporting the rule that fired
pub fn infer_unit_with_rule(
    stored_value: f64,
    category: Option<&Category>,
    config: &ZakatConfig,
) -> (Unit, InferenceRule) {
    let above_threshold = stored_value >= config.cash_threshold;

    let Some(category) = category else {
        let unit = if above_threshold { Unit::Cash } else { Unit::Weight };
        return (unit, InferenceRule::ThresholdOnly);
    };

    if let Some(unit) = category.unit {
        return (unit, InferenceRule::CategoryTag);
    }

    let as_weight = category.base_entitlement;
    let as_cash = category.base_entitlement * config.exchange_rate;

    if same_value(stored_value, as_cash) && !same_value(as_cash, as_weight) {
        (Unit::Cash, InferenceRule::MatchesCash)
    } else if same_value(stored_value, as_weight) {
        (Unit::Weight, InferenceRule::MatchesWeight)
    } else if above_threshold {
        (Unit::Cash, InferenceRule::AboveThreshold)
    } else {
        (Unit::Weight, InferenceRule::CategoryFallback)
    }
}

/// Explicit unit on the record wins; otherwise fall back to inference
pub fn resolve_unit(
    explicit: Option<Unit>,
    stored_value: f64,
    category: Option<&Category>,
    config: &ZakatConfig,
) -> Unit {
    if let Some(unit) = explicit {
        return unit;
    }

    let (unit, rule) = infer_unit_with_rule(stored_value, category, config);
    tracing::debug!(
        value = stored_value,
        category = category.map(|c| c.name.as_str()).unwrap_or("-"),
        ?unit,
        ?rule,
        "inferred entitlement unit"
    );
    unit
}

// Stored values come back from the store as the same f64 that was computed,
// but CSV/JSON round trips may perturb the last bits.
fn same_value(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= scale * 1e-9
}

// ============================================================================
// DISPLAY
// ============================================================================

/// Weight → "2.5 kg"; Cash → "Rp 37.500"
pub fn format_entitlement(value: f64, unit: Unit) -> String {
    match unit {
        Unit::Weight => format_weight(value),
        Unit::Cash => format_currency(value),
    }
}

/// Resolve the unit of a stored entitlement and format it
pub fn display_entitlement(
    stored_value: f64,
    explicit: Option<Unit>,
    category: Option<&Category>,
    config: &ZakatConfig,
) -> String {
    let unit = resolve_unit(explicit, stored_value, category, config);
    format_entitlement(stored_value, unit)
}

// ============================================================================
// PAYMENT SPLIT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentSplit {
    pub grain_amount: Option<f64>,
    pub cash_amount: Option<f64>,
}

/// Amount owed for `dependents_paid_for` heads, on the side matching `kind`
/// only. The other side is always `None`.
pub fn apply_payment_split(
    kind: PaymentKind,
    grain_per_head: f64,
    cash_per_head: f64,
    dependents_paid_for: u32,
) -> PaymentSplit {
    let heads = f64::from(dependents_paid_for);

    match kind {
        PaymentKind::Grain => PaymentSplit {
            grain_amount: Some(grain_per_head * heads),
            cash_amount: None,
        },
        PaymentKind::Cash => PaymentSplit {
            grain_amount: None,
            cash_amount: Some(cash_per_head * heads),
        },
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fakir() -> Category {
        Category::new("Fakir".to_string(), 2.5)
    }

    #[test]
    fn test_compute_entitlement() {
        assert_eq!(compute_entitlement(2.5, Unit::Weight, 15_000.0), 2.5);
        assert_eq!(compute_entitlement(2.5, Unit::Cash, 15_000.0), 37_500.0);
        assert_eq!(compute_entitlement(0.0, Unit::Cash, 15_000.0), 0.0);
    }

    #[test]
    fn test_compute_entitlement_over_range() {
        for rate in [1.0, 12_500.0, 15_000.0, 17_250.5] {
            for base in [0.0, 0.5, 2.5, 3.0, 10.0, 250.0] {
                assert_eq!(compute_entitlement(base, Unit::Weight, rate), base);
                assert_eq!(compute_entitlement(base, Unit::Cash, rate), base * rate);
            }
        }
    }

    #[test]
    fn test_infer_cash_from_category() {
        let config = ZakatConfig::default();

        assert_eq!(infer_unit(37_500.0, Some(&fakir()), &config), Unit::Cash);
        assert_eq!(
            infer_unit_with_rule(37_500.0, Some(&fakir()), &config).1,
            InferenceRule::MatchesCash
        );
    }

    #[test]
    fn test_infer_weight_from_category() {
        let config = ZakatConfig::default();

        assert_eq!(infer_unit(2.5, Some(&fakir()), &config), Unit::Weight);
        assert_eq!(
            infer_unit_with_rule(2.5, Some(&fakir()), &config).1,
            InferenceRule::MatchesWeight
        );
    }

    #[test]
    fn test_infer_without_category_uses_threshold() {
        let config = ZakatConfig::default();

        assert_eq!(infer_unit(5_000.0, None, &config), Unit::Cash);
        assert_eq!(infer_unit(1_000.0, None, &config), Unit::Cash);
        assert_eq!(infer_unit(999.9, None, &config), Unit::Weight);
        assert_eq!(infer_unit(2.5, None, &config), Unit::Weight);
    }

    #[test]
    fn test_threshold_comes_from_config() {
        let low = ZakatConfig {
            cash_threshold: 500.0,
            ..ZakatConfig::default()
        };
        let high = ZakatConfig {
            cash_threshold: 50_000.0,
            ..ZakatConfig::default()
        };

        assert_eq!(infer_unit(600.0, None, &low), Unit::Cash);
        assert_eq!(infer_unit(500.0, None, &low), Unit::Cash);
        assert_eq!(infer_unit(499.9, None, &low), Unit::Weight);

        assert_eq!(infer_unit(5_000.0, None, &high), Unit::Weight);
        assert_eq!(infer_unit(49_999.0, None, &high), Unit::Weight);
        assert_eq!(infer_unit(50_000.0, None, &high), Unit::Cash);
    }

    #[test]
    fn test_above_threshold_rule_uses_config() {
        let low = ZakatConfig {
            cash_threshold: 500.0,
            ..ZakatConfig::default()
        };
        let high = ZakatConfig {
            cash_threshold: 50_000.0,
            ..ZakatConfig::default()
        };

        assert_eq!(
            infer_unit_with_rule(500.0, Some(&fakir()), &low),
            (Unit::Cash, InferenceRule::AboveThreshold)
        );
        assert_eq!(
            infer_unit_with_rule(499.0, Some(&fakir()), &low),
            (Unit::Weight, InferenceRule::CategoryFallback)
        );
        assert_eq!(
            infer_unit_with_rule(40_000.0, Some(&fakir()), &high),
            (Unit::Weight, InferenceRule::CategoryFallback)
        );
        assert_eq!(
            infer_unit_with_rule(50_000.0, Some(&fakir()), &high),
            (Unit::Cash, InferenceRule::AboveThreshold)
        );
        // The exact cash match still wins below a high threshold
        assert_eq!(
            infer_unit_with_rule(37_500.0, Some(&fakir()), &high),
            (Unit::Cash, InferenceRule::MatchesCash)
        );
    }

    #[test]
    fn test_category_tag_wins() {
        let config = ZakatConfig::default();
        let tagged = Category::with_unit("Amil".to_string(), 2.5, Unit::Weight);

        // 37500 would otherwise match the cash conversion
        assert_eq!(
            infer_unit_with_rule(37_500.0, Some(&tagged), &config),
            (Unit::Weight, InferenceRule::CategoryTag)
        );
    }

    #[test]
    fn test_manual_override_values() {
        let config = ZakatConfig::default();

        // Edited by hand after creation: matches nothing the category predicts
        assert_eq!(
            infer_unit_with_rule(50_000.0, Some(&fakir()), &config),
            (Unit::Cash, InferenceRule::AboveThreshold)
        );
        assert_eq!(
            infer_unit_with_rule(3.0, Some(&fakir()), &config),
            (Unit::Weight, InferenceRule::CategoryFallback)
        );
    }

    #[test]
    fn test_zero_base_reads_as_weight() {
        let config = ZakatConfig::default();
        let empty = Category::new("Kosong".to_string(), 0.0);

        // as_cash == as_weight, so the cash branch is skipped
        assert_eq!(infer_unit(0.0, Some(&empty), &config), Unit::Weight);
    }

    #[test]
    fn test_known_misclassification_of_large_weights() {
        let config = ZakatConfig::default();

        // 1200 kg recorded without category context looks like rupiah
        assert_eq!(infer_unit(1_200.0, None, &config), Unit::Cash);
    }

    #[test]
    fn test_round_trip_cash_inference() {
        for rate in [2.0, 12_500.0, 15_000.0] {
            let config = ZakatConfig {
                exchange_rate: rate,
                ..ZakatConfig::default()
            };
            for base in [0.5, 1.0, 2.5, 3.5, 7.0] {
                let category = Category::new("K".to_string(), base);
                let stored = compute_entitlement(base, Unit::Cash, rate);

                assert_eq!(infer_unit(stored, Some(&category), &config), Unit::Cash);
                assert_eq!(
                    infer_unit(
                        compute_entitlement(base, Unit::Weight, rate),
                        Some(&category),
                        &config
                    ),
                    Unit::Weight
                );
            }
        }
    }

    #[test]
    fn test_resolve_prefers_explicit_unit() {
        let config = ZakatConfig::default();

        assert_eq!(resolve_unit(Some(Unit::Weight), 5_000.0, None, &config), Unit::Weight);
        assert_eq!(resolve_unit(None, 5_000.0, None, &config), Unit::Cash);
    }

    #[test]
    fn test_format_entitlement() {
        assert_eq!(format_entitlement(2.5, Unit::Weight), "2.5 kg");
        assert_eq!(format_entitlement(2.0, Unit::Weight), "2 kg");
        assert_eq!(format_entitlement(37_500.0, Unit::Cash), "Rp 37.500");
    }

    #[test]
    fn test_display_entitlement() {
        let config = ZakatConfig::default();

        assert_eq!(display_entitlement(37_500.0, None, Some(&fakir()), &config), "Rp 37.500");
        assert_eq!(display_entitlement(2.5, None, Some(&fakir()), &config), "2.5 kg");
        assert_eq!(display_entitlement(2_000.0, Some(Unit::Weight), None, &config), "2000 kg");
    }

    #[test]
    fn test_payment_split_grain() {
        let split = apply_payment_split(PaymentKind::Grain, 2.5, 45_000.0, 4);

        assert_eq!(split.grain_amount, Some(10.0));
        assert_eq!(split.cash_amount, None);
    }

    #[test]
    fn test_payment_split_cash() {
        let split = apply_payment_split(PaymentKind::Cash, 2.5, 45_000.0, 3);

        assert_eq!(split.grain_amount, None);
        assert_eq!(split.cash_amount, Some(135_000.0));
    }

    #[test]
    fn test_payment_split_always_exclusive() {
        for kind in [PaymentKind::Grain, PaymentKind::Cash] {
            for heads in [0, 1, 7, 250] {
                let split = apply_payment_split(kind, 2.5, 45_000.0, heads);
                assert!(split.grain_amount.is_some() != split.cash_amount.is_some());
                assert_eq!(split.grain_amount.is_some(), kind == PaymentKind::Grain);
            }
        }
    }

    #[test]
    fn test_payment_split_tolerates_bad_rates() {
        // Validation belongs to the form layer; the split must just not panic
        let split = apply_payment_split(PaymentKind::Grain, -2.5, f64::NAN, 2);
        assert_eq!(split.grain_amount, Some(-5.0));
        assert_eq!(split.cash_amount, None);

        let split = apply_payment_split(PaymentKind::Cash, 2.5, f64::NAN, 2);
        assert!(split.cash_amount.map(f64::is_nan).unwrap_or(false));
    }

    #[test]
    fn test_unit_parse() {
        assert_eq!(Unit::parse("beras"), Some(Unit::Weight));
        assert_eq!(Unit::parse(" Uang "), Some(Unit::Cash));
        assert_eq!(Unit::parse("kg"), Some(Unit::Weight));
        assert_eq!(Unit::parse("emas"), None);
    }
}
