// 🗄️ Record Store - interface to the external store, plus table-export loaders
//
// Persistence lives outside this crate. `RecordStore` is the shape callers
// implement over their backend; `MemoryStore` backs tests and the CLI.

use crate::entities::{Category, Donor, Payment, Recipient, RecipientGroup};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// RECORD TRAIT
// ============================================================================

/// What the store needs to know about any entity
pub trait Record: Clone {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
}

impl Record for Donor {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for Category {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for Payment {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.head_of_household
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for Recipient {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// ============================================================================
// STORE INTERFACE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    CreatedAsc,
    CreatedDesc,
    NameAsc,
}

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("record already exists: {0}")]
    DuplicateId(String),
}

pub trait RecordStore<T: Record> {
    fn list(&self, order: OrderBy) -> Vec<T>;
    fn insert(&mut self, record: T) -> Result<T, StoreError>;
    fn update<F: FnOnce(&mut T)>(&mut self, id: &str, update_fn: F) -> Result<T, StoreError>;
    fn delete(&mut self, id: &str) -> Result<(), StoreError>;
}

/// In-memory store, insertion order preserved
#[derive(Debug, Clone)]
pub struct MemoryStore<T> {
    records: Vec<T>,
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        MemoryStore {
            records: Vec::new(),
        }
    }

    pub fn from_records(records: Vec<T>) -> Self {
        MemoryStore { records }
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }
}

impl<T: Record> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> RecordStore<T> for MemoryStore<T> {
    fn list(&self, order: OrderBy) -> Vec<T> {
        let mut records = self.records.clone();
        match order {
            OrderBy::CreatedAsc => records.sort_by_key(|r| r.created_at()),
            OrderBy::CreatedDesc => records.sort_by(|a, b| b.created_at().cmp(&a.created_at())),
            OrderBy::NameAsc => records.sort_by(|a, b| a.name().cmp(b.name())),
        }
        records
    }

    fn insert(&mut self, record: T) -> Result<T, StoreError> {
        if self.records.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::DuplicateId(record.id().to_string()));
        }
        self.records.push(record.clone());
        Ok(record)
    }

    fn update<F: FnOnce(&mut T)>(&mut self, id: &str, update_fn: F) -> Result<T, StoreError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        update_fn(record);
        Ok(record.clone())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);

        if self.records.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// TABLE EXPORT LOADERS
// ============================================================================

/// Load a CSV export of one table
pub fn load_csv<T: DeserializeOwned>(csv_path: &Path) -> Result<Vec<T>> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file: {:?}", csv_path))?;

    let mut records = Vec::new();
    for (line, result) in rdr.deserialize().enumerate() {
        let record: T =
            result.with_context(|| format!("Failed to deserialize row {} of {:?}", line + 1, csv_path))?;
        records.push(record);
    }

    tracing::info!(path = ?csv_path, rows = records.len(), "loaded CSV export");
    Ok(records)
}

/// Load a JSON array export of one table
pub fn load_json<T: DeserializeOwned>(json_path: &Path) -> Result<Vec<T>> {
    let content = fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read JSON file: {:?}", json_path))?;

    let records: Vec<T> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON export: {:?}", json_path))?;

    tracing::info!(path = ?json_path, rows = records.len(), "loaded JSON export");
    Ok(records)
}

/// Load by extension: `.json` as JSON, anything else as CSV
pub fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_csv(path),
    }
}

/// Load a recipient table export, tagging every row with its group
pub fn load_recipients(path: &Path, group: RecipientGroup) -> Result<Vec<Recipient>> {
    let mut recipients: Vec<Recipient> = load_records(path)?;
    for recipient in &mut recipients {
        recipient.group = group;
    }
    Ok(recipients)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZakatConfig;
    use crate::entities::PaymentKind;
    use chrono::TimeZone;
    use std::io::Write;

    #[test]
    fn test_memory_store_crud() {
        let mut store: MemoryStore<Donor> = MemoryStore::new();
        let donor = store.insert(Donor::new("Pak Hasan".to_string(), 3)).unwrap();

        let updated = store.update(&donor.id, |d| d.dependents = 4).unwrap();
        assert_eq!(updated.dependents, 4);

        assert_eq!(
            store.insert(donor.clone()),
            Err(StoreError::DuplicateId(donor.id.clone()))
        );

        store.delete(&donor.id).unwrap();
        assert_eq!(store.count(), 0);
        assert_eq!(store.delete(&donor.id), Err(StoreError::NotFound(donor.id)));
    }

    #[test]
    fn test_list_ordering() {
        let config = ZakatConfig::default();
        let early = Payment::new("Zaid".to_string(), 1, PaymentKind::Grain, 1, &config)
            .at(Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap());
        let late = Payment::new("Amir".to_string(), 1, PaymentKind::Cash, 1, &config)
            .at(Utc.with_ymd_and_hms(2024, 4, 2, 8, 0, 0).unwrap());
        let store = MemoryStore::from_records(vec![late.clone(), early.clone()]);

        let asc: Vec<String> = store.list(OrderBy::CreatedAsc).into_iter().map(|p| p.id).collect();
        assert_eq!(asc, vec![early.id.clone(), late.id.clone()]);

        let desc: Vec<String> = store.list(OrderBy::CreatedDesc).into_iter().map(|p| p.id).collect();
        assert_eq!(desc, vec![late.id.clone(), early.id.clone()]);

        let by_name: Vec<String> = store
            .list(OrderBy::NameAsc)
            .into_iter()
            .map(|p| p.head_of_household)
            .collect();
        assert_eq!(by_name, vec!["Amir", "Zaid"]);
    }

    #[test]
    fn test_load_payments_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(
            file,
            "id_zakat,nama_kk,jumlah_tanggungan,jenis_bayar,jumlah_tanggunganyang_dibayar,bayar_beras,bayar_uang,created_at"
        )
        .unwrap();
        writeln!(file, "z-1,Pak Hasan,4,beras,4,10,,2024-04-01T08:00:00Z").unwrap();
        writeln!(file, "z-2,Bu Sari,2,uang,2,,90000,2024-04-01T09:00:00Z").unwrap();

        let payments: Vec<Payment> = load_records(file.path()).unwrap();

        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].grain_amount, Some(10.0));
        assert_eq!(payments[0].cash_amount, None);
        assert_eq!(payments[1].kind, PaymentKind::Cash);
        assert_eq!(payments[1].cash_amount, Some(90_000.0));
    }

    #[test]
    fn test_load_recipients_json_sets_group() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"id_mustahiklainnnya": "l-1", "nama": "Budi", "kategori": "Amil", "hak": 37500}}]"#
        )
        .unwrap();

        let recipients = load_recipients(file.path(), RecipientGroup::Lainnya).unwrap();

        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients[0].id, "l-1");
        assert_eq!(recipients[0].group, RecipientGroup::Lainnya);
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = load_csv::<Donor>(Path::new("/nonexistent/muzakki.csv")).unwrap_err();
        assert!(err.to_string().contains("Failed to open CSV file"));
    }
}
