// ✅ Record Validation - the entry form's rules, applied to values
//
// The calculators accept whatever they are given. These checks are for the
// caller to run before saving, and for auditing rows already in the store.

use crate::config::ZakatConfig;
use crate::entities::{Category, CategoryRegistry, Donor, Payment, PaymentKind, Recipient};
use crate::entitlement::apply_payment_split;
use serde::{Deserialize, Serialize};

// ============================================================================
// VALIDATION ISSUE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical, // Record must not be saved as-is
    Warning,  // Saved, but worth a second look
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn critical(field: &str, message: impl Into<String>) -> Self {
        ValidationIssue {
            severity: Severity::Critical,
            field: field.to_string(),
            message: message.into(),
        }
    }

    fn warning(field: &str, message: impl Into<String>) -> Self {
        ValidationIssue {
            severity: Severity::Warning,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// ============================================================================
// VALIDATION REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub record_id: String,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn new(record_id: &str) -> Self {
        ValidationReport {
            record_id: record_id.to_string(),
            issues: Vec::new(),
        }
    }

    /// No critical issues
    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(|i| i.severity == Severity::Critical)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field == field)
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: {} issues ({} critical)",
            self.record_id,
            self.issues.len(),
            self.issues
                .iter()
                .filter(|i| i.severity == Severity::Critical)
                .count()
        )
    }

    fn require_name(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.issues.push(ValidationIssue::critical(field, "must not be empty"));
        }
    }

    fn require_non_negative(&mut self, field: &str, value: f64) {
        if !value.is_finite() {
            self.issues.push(ValidationIssue::critical(field, "must be a number"));
        } else if value < 0.0 {
            self.issues.push(ValidationIssue::critical(
                field,
                format!("must not be negative, got {}", value),
            ));
        }
    }
}

// ============================================================================
// VALIDATORS
// ============================================================================

pub fn validate_donor(donor: &Donor) -> ValidationReport {
    let mut report = ValidationReport::new(&donor.id);
    report.require_name("nama_muzakki", &donor.name);
    report
}

pub fn validate_category(category: &Category) -> ValidationReport {
    let mut report = ValidationReport::new(&category.id);
    report.require_name("nama_kategori", &category.name);
    report.require_non_negative("jumlah_hak", category.base_entitlement);
    report
}

/// Checks a payment against the form rules. An amount that differs from
/// the per-head rate is only a warning: the form lets the amount be edited.
pub fn validate_payment(payment: &Payment, config: &ZakatConfig) -> ValidationReport {
    let mut report = ValidationReport::new(&payment.id);
    report.require_name("nama_kk", &payment.head_of_household);

    if payment.dependents_paid_for > payment.total_dependents {
        report.issues.push(ValidationIssue::critical(
            "jumlah_tanggunganyang_dibayar",
            format!(
                "paid for {} dependents but household has {}",
                payment.dependents_paid_for, payment.total_dependents
            ),
        ));
    }

    let (field, amount, other_field, other) = match payment.kind {
        PaymentKind::Grain => ("bayar_beras", payment.grain_amount, "bayar_uang", payment.cash_amount),
        PaymentKind::Cash => ("bayar_uang", payment.cash_amount, "bayar_beras", payment.grain_amount),
    };

    match amount {
        None => report.issues.push(ValidationIssue::critical(
            field,
            format!("required for jenis_bayar = {}", payment.kind),
        )),
        Some(value) => {
            report.require_non_negative(field, value);

            let expected = apply_payment_split(
                payment.kind,
                config.grain_per_head,
                config.cash_per_head,
                payment.dependents_paid_for,
            );
            let expected = expected.grain_amount.or(expected.cash_amount).unwrap_or(0.0);
            if value.is_finite() && (value - expected).abs() > 1e-9 {
                report.issues.push(ValidationIssue::warning(
                    field,
                    format!("expected {} for {} dependents", expected, payment.dependents_paid_for),
                ));
            }
        }
    }

    if other.is_some() {
        report.issues.push(ValidationIssue::critical(
            other_field,
            format!("must be empty for jenis_bayar = {}", payment.kind),
        ));
    }

    report
}

/// Checks a recipient; an unresolved category name is a warning since the
/// store does not enforce the reference either.
pub fn validate_recipient(recipient: &Recipient, registry: &CategoryRegistry) -> ValidationReport {
    let mut report = ValidationReport::new(&recipient.id);
    report.require_name("nama", &recipient.name);
    report.require_name("kategori", &recipient.category);
    report.require_non_negative("hak", recipient.entitlement);

    if !recipient.category.trim().is_empty() && registry.find_by_name(&recipient.category).is_none() {
        report.issues.push(ValidationIssue::warning(
            "kategori",
            format!("unknown category '{}'", recipient.category),
        ));
    }

    report
}

// ============================================================================
// TESTS
// ============================================================================
