// Entity Models
//
// Plain values mirroring the store's tables. Field names serialize to the
// table's column names so exported rows load directly.

pub mod category;
pub mod donor;
pub mod payment;
pub mod recipient;

pub use category::{Category, CategoryRegistry};
pub use donor::Donor;
pub use payment::{Payment, PaymentKind};
pub use recipient::{Recipient, RecipientGroup};

/// Fresh v4 UUID for records created locally
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
