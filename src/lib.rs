// Zakat Ledger - Core Library
// Entitlement conversion, unit inference and dashboard aggregation for
// zakat collection and distribution records.

pub mod config;
pub mod format;
pub mod entities;
pub mod entitlement;
pub mod aggregation;
pub mod validation;
pub mod store;

// Re-export commonly used types
pub use config::{ConfigError, ZakatConfig};
pub use entities::{
    Category, CategoryRegistry, Donor, Payment, PaymentKind, Recipient, RecipientGroup,
};
pub use entitlement::{
    apply_payment_split, compute_entitlement, display_entitlement, format_entitlement,
    infer_unit, infer_unit_with_rule, resolve_unit, InferenceRule, PaymentSplit, Unit,
};
pub use aggregation::{
    aggregate_collections_by_date, aggregate_distribution_by_category, CollectionPoint,
    DashboardReport, DashboardStats, DistributionSlice,
};
pub use validation::{
    validate_category, validate_donor, validate_payment, validate_recipient, Severity,
    ValidationIssue, ValidationReport,
};
pub use store::{
    load_csv, load_json, load_records, load_recipients, MemoryStore, OrderBy, Record,
    RecordStore, StoreError,
};
pub use format::{format_currency, format_long_date, format_weight};
