// 🏷️ Category Entity - kategori mustahik
//
// A category names a class of recipient (Fakir, Miskin, Amil, ...) and the
// entitlement each recipient in it is due. Recipients reference categories
// by NAME, not by id: renaming a category silently orphans its recipients.

use crate::entitlement::Unit;
use crate::entities::recipient::Recipient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// CATEGORY ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "id_kategori", default = "crate::entities::new_id")]
    pub id: String,

    /// Category name (e.g., "Fakir", "Fisabilillah")
    #[serde(rename = "nama_kategori")]
    pub name: String,

    /// Entitlement per recipient. Conventionally kg of rice, but legacy rows
    /// carry no unit so it may also be rupiah.
    #[serde(rename = "jumlah_hak")]
    pub base_entitlement: f64,

    #[serde(rename = "keterangan", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Explicit unit of `base_entitlement`. Absent on legacy rows.
    #[serde(rename = "jumlah_hak_type", default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create new category with a fresh UUID and no unit tag
    pub fn new(name: String, base_entitlement: f64) -> Self {
        Category {
            id: crate::entities::new_id(),
            name,
            base_entitlement,
            note: None,
            unit: None,
            created_at: Utc::now(),
        }
    }

    /// Create category whose entitlement unit is recorded explicitly
    pub fn with_unit(name: String, base_entitlement: f64, unit: Unit) -> Self {
        let mut category = Self::new(name, base_entitlement);
        category.unit = Some(unit);
        category
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

// ============================================================================
// CATEGORY REGISTRY
// ============================================================================

/// Name-keyed lookup over the categories fetched from the record store
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        CategoryRegistry {
            categories: Vec::new(),
        }
    }

    pub fn from_categories(categories: Vec<Category>) -> Self {
        CategoryRegistry { categories }
    }

    /// Register a category. A later category with the same name shadows
    /// nothing: lookups return the first match, like the store's name filter.
    pub fn register(&mut self, category: Category) {
        self.categories.push(category);
    }

    /// Exact, case-sensitive name match
    pub fn find_by_name(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn all_categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn count(&self) -> usize {
        self.categories.len()
    }

    /// Recipients whose category name no longer matches any category
    pub fn orphaned_recipients<'a>(&self, recipients: &'a [Recipient]) -> Vec<&'a Recipient> {
        let orphans: Vec<&Recipient> = recipients
            .iter()
            .filter(|r| self.find_by_name(&r.category).is_none())
            .collect();

        for orphan in &orphans {
            tracing::warn!(
                recipient = %orphan.name,
                category = %orphan.category,
                "recipient references unknown category"
            );
        }

        orphans
    }
}

// ============================================================================
// TESTS
// ============================================================================
