// 🎁 Recipient Entity - mustahik
//
// Residents (mustahik_warga) and others (mustahik_lainnya) share one shape,
// so they share one type tagged with the group they were loaded from.

use crate::config::ZakatConfig;
use crate::entities::category::Category;
use crate::entitlement::{compute_entitlement, Unit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientGroup {
    /// mustahik_warga
    #[default]
    Warga,

    /// mustahik_lainnya
    Lainnya,
}

impl RecipientGroup {
    /// Table the group is stored in
    pub fn table_name(&self) -> &'static str {
        match self {
            RecipientGroup::Warga => "mustahik_warga",
            RecipientGroup::Lainnya => "mustahik_lainnya",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    #[serde(
        alias = "id_mustahikwarga",
        alias = "id_mustahiklainnnya",
        default = "crate::entities::new_id"
    )]
    pub id: String,

    #[serde(rename = "nama")]
    pub name: String,

    /// Category NAME (free text, not a foreign key)
    #[serde(rename = "kategori")]
    pub category: String,

    /// Entitlement value (hak); unit unknown unless `unit` is set
    #[serde(rename = "hak")]
    pub entitlement: f64,

    #[serde(rename = "hak_type", default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,

    #[serde(default)]
    pub group: RecipientGroup,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Recipient {
    /// Create a recipient from a raw entitlement value (legacy, untagged)
    pub fn new(name: String, category: String, entitlement: f64, group: RecipientGroup) -> Self {
        Recipient {
            id: crate::entities::new_id(),
            name,
            category,
            entitlement,
            unit: None,
            group,
            created_at: Utc::now(),
        }
    }

    /// Create a recipient whose entitlement is derived from its category in
    /// the chosen unit. The unit is recorded so display never has to guess.
    pub fn from_category(
        name: String,
        category: &Category,
        unit: Unit,
        group: RecipientGroup,
        config: &ZakatConfig,
    ) -> Self {
        let mut recipient = Self::new(
            name,
            category.name.clone(),
            compute_entitlement(category.base_entitlement, unit, config.exchange_rate),
            group,
        );
        recipient.unit = Some(unit);
        recipient
    }
}
