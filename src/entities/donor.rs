// 🤲 Donor Entity - muzakki
//
// A head of household who pays zakat on behalf of their dependents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donor {
    #[serde(rename = "id_muzakki", default = "crate::entities::new_id")]
    pub id: String,

    #[serde(rename = "nama_muzakki")]
    pub name: String,

    /// Number of dependents (tanggungan), the donor included
    #[serde(rename = "jumlah_tanggungan")]
    pub dependents: u32,

    #[serde(rename = "keterangan", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Donor {
    pub fn new(name: String, dependents: u32) -> Self {
        Donor {
            id: crate::entities::new_id(),
            name,
            dependents,
            note: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
