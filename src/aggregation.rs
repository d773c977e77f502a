// 📊 Aggregation Reducer - dashboard totals and chart series
//
// Folds already-fetched records into the series the dashboard charts draw:
// per-day collection totals (bar chart) and category entitlements (pie).

use crate::config::ZakatConfig;
use crate::entities::{Category, Donor, Payment, PaymentKind, Recipient, RecipientGroup};
use crate::entitlement::{display_entitlement, Unit};
use crate::format::{format_currency, format_day_month, format_long_date};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cash totals in the collection chart are shown in millions of rupiah
pub const CASH_CHART_SCALE: f64 = 1_000_000.0;

// ============================================================================
// COLLECTION BY DATE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionPoint {
    /// "dd MMM" label, no year
    pub date: String,

    /// kg of rice
    pub grain_total: f64,

    /// Millions of rupiah
    pub cash_total: f64,
}

/// Bucket payments by calendar day of `created_at`.
///
/// Labels carry no year, so the same day in different years merges into one
/// bucket. Output follows first-seen order; callers pass payments sorted by
/// `created_at` ascending and the reducer never re-sorts.
pub fn aggregate_collections_by_date(
    payments: &[Payment],
    config: &ZakatConfig,
) -> Vec<CollectionPoint> {
    let offset = config.display_offset();
    let mut points: Vec<CollectionPoint> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for payment in payments {
        let date = format_day_month(&payment.created_at, offset);
        let slot = *index.entry(date.clone()).or_insert_with(|| {
            points.push(CollectionPoint {
                date,
                grain_total: 0.0,
                cash_total: 0.0,
            });
            points.len() - 1
        });

        match payment.kind {
            PaymentKind::Grain => points[slot].grain_total += payment.grain_amount.unwrap_or(0.0),
            PaymentKind::Cash => points[slot].cash_total += payment.cash_amount.unwrap_or(0.0),
        }
    }

    for point in &mut points {
        point.cash_total /= CASH_CHART_SCALE;
    }

    points
}

// ============================================================================
// DISTRIBUTION BY CATEGORY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSlice {
    pub name: String,
    pub value: f64,
}

impl DistributionSlice {
    /// Display label for the slice value. The value is the category's own
    /// base entitlement, so only an explicit unit or the cash threshold decides.
    pub fn label(&self, unit: Option<Unit>, config: &ZakatConfig) -> String {
        display_entitlement(self.value, unit, None, config)
    }
}

/// One slice per category, in input order. No dedup, no sorting.
pub fn aggregate_distribution_by_category(categories: &[Category]) -> Vec<DistributionSlice> {
    categories
        .iter()
        .map(|c| DistributionSlice {
            name: c.name.clone(),
            value: c.base_entitlement,
        })
        .collect()
}

// ============================================================================
// DASHBOARD STATS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_donors: usize,
    pub total_recipients: usize,
    pub residents: usize,
    pub others: usize,

    /// Sum of every `grain_amount`, kg
    pub total_grain: f64,

    /// Sum of every `cash_amount`, rupiah
    pub total_cash: f64,
}

impl DashboardStats {
    pub fn compute(donors: &[Donor], recipients: &[Recipient], payments: &[Payment]) -> Self {
        let residents = recipients
            .iter()
            .filter(|r| r.group == RecipientGroup::Warga)
            .count();

        DashboardStats {
            total_donors: donors.len(),
            total_recipients: recipients.len(),
            residents,
            others: recipients.len() - residents,
            total_grain: payments.iter().filter_map(|p| p.grain_amount).sum(),
            total_cash: payments.iter().filter_map(|p| p.cash_amount).sum(),
        }
    }

    /// Card label for collected rice, always one decimal
    pub fn grain_label(&self) -> String {
        format!("{:.1} kg", self.total_grain)
    }

    pub fn cash_label(&self) -> String {
        format_currency(self.total_cash)
    }

    pub fn summary(&self) -> String {
        format!(
            "Muzakki: {}, Mustahik: {} ({} warga, {} lainnya), Beras: {}, Uang: {}",
            self.total_donors,
            self.total_recipients,
            self.residents,
            self.others,
            self.grain_label(),
            self.cash_label()
        )
    }
}

// ============================================================================
// DASHBOARD REPORT
// ============================================================================

/// Everything the dashboard page and its printed report show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    /// "dd MMMM yyyy" of generation
    pub period: String,
    pub stats: DashboardStats,
    pub collection: Vec<CollectionPoint>,
    pub distribution: Vec<DistributionSlice>,
}

impl DashboardReport {
    pub fn build(
        donors: &[Donor],
        recipients: &[Recipient],
        payments: &[Payment],
        categories: &[Category],
        config: &ZakatConfig,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let report = DashboardReport {
            period: format_long_date(&generated_at, config.display_offset()),
            stats: DashboardStats::compute(donors, recipients, payments),
            collection: aggregate_collections_by_date(payments, config),
            distribution: aggregate_distribution_by_category(categories),
        };

        tracing::debug!(
            payments = payments.len(),
            days = report.collection.len(),
            slices = report.distribution.len(),
            "built dashboard report"
        );

        report
    }
}

// ============================================================================
// TESTS
// ============================================================================
