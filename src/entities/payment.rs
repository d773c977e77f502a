// 💰 Payment Entity - bayar zakat
//
// A recorded zakat payment, either in rice (beras) or in cash (uang).
// Exactly one of `grain_amount` / `cash_amount` is set, matching `kind`.

use crate::config::ZakatConfig;
use crate::entitlement::apply_payment_split;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// PAYMENT KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentKind {
    /// Paid in rice, amount in kg
    #[serde(rename = "beras")]
    Grain,

    /// Paid in cash, amount in rupiah
    #[serde(rename = "uang")]
    Cash,
}

impl PaymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Grain => "beras",
            PaymentKind::Cash => "uang",
        }
    }
}

impl std::fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PAYMENT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "id_zakat", default = "crate::entities::new_id")]
    pub id: String,

    /// Head of household (nama KK)
    #[serde(rename = "nama_kk")]
    pub head_of_household: String,

    #[serde(rename = "jumlah_tanggungan")]
    pub total_dependents: u32,

    #[serde(rename = "jenis_bayar")]
    pub kind: PaymentKind,

    /// Dependents covered by this payment; never more than `total_dependents`
    #[serde(rename = "jumlah_tanggunganyang_dibayar")]
    pub dependents_paid_for: u32,

    #[serde(rename = "bayar_beras", default)]
    pub grain_amount: Option<f64>,

    #[serde(rename = "bayar_uang", default)]
    pub cash_amount: Option<f64>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Create a payment whose amount is the configured per-head rate times
    /// the dependents paid for
    pub fn new(
        head_of_household: String,
        total_dependents: u32,
        kind: PaymentKind,
        dependents_paid_for: u32,
        config: &ZakatConfig,
    ) -> Self {
        let split = apply_payment_split(
            kind,
            config.grain_per_head,
            config.cash_per_head,
            dependents_paid_for,
        );

        Payment {
            id: crate::entities::new_id(),
            head_of_household,
            total_dependents,
            kind,
            dependents_paid_for,
            grain_amount: split.grain_amount,
            cash_amount: split.cash_amount,
            created_at: Utc::now(),
        }
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Amount on the side matching `kind`, absent treated as zero
    pub fn paid_amount(&self) -> f64 {
        match self.kind {
            PaymentKind::Grain => self.grain_amount.unwrap_or(0.0),
            PaymentKind::Cash => self.cash_amount.unwrap_or(0.0),
        }
    }

    /// True when exactly the side matching `kind` is set
    pub fn is_exclusive(&self) -> bool {
        match self.kind {
            PaymentKind::Grain => self.grain_amount.is_some() && self.cash_amount.is_none(),
            PaymentKind::Cash => self.cash_amount.is_some() && self.grain_amount.is_none(),
        }
    }

    /// Clear whichever amount does not match `kind`, as the entry form does
    /// before saving
    pub fn normalize_amounts(&mut self) {
        match self.kind {
            PaymentKind::Grain => self.cash_amount = None,
            PaymentKind::Cash => self.grain_amount = None,
        }
    }
}
