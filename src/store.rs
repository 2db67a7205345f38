//! Records and read seams for the external document store.
//!
//! The job only reads products and reads/deletes device registrations; the
//! store owns the data. The traits here are the seams the driver and
//! dispatcher depend on, so tests can substitute in-memory collaborators.
//! The production implementation is `crate::firebase::firestore`.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::AlertResult;

/// A product record as read from the inventory.
#[derive(Debug, Clone)]
pub struct Product {
    /// Inventory status. The query only returns "ACTIVE" products.
    pub status: String,
    /// Expiry date in `YYYY-MM-DD` form. Records with a missing or malformed
    /// date are excluded from every bucket downstream.
    pub expiry_date: Option<String>,
}

/// A registered device token paired with a deletable reference.
#[derive(Debug, Clone)]
pub struct DeviceRegistration {
    /// Opaque delivery destination
    pub token: String,
    /// Full document path of the registration record, usable for deletion
    pub doc_path: String,
}

/// Read access to the product inventory.
#[async_trait]
pub trait ProductStore {
    /// All products with `status == "ACTIVE"` whose expiry date falls on or
    /// before `today + horizon_days`. Unordered; no pagination is imposed.
    async fn expiring_products(
        &self,
        today: NaiveDate,
        horizon_days: u32,
    ) -> AlertResult<Vec<Product>>;
}

/// Read and prune access to the device token registry.
///
/// Registrations live under per-user scopes but are read flatly across all
/// users. Duplicate tokens are NOT deduplicated here; the dispatcher
/// tolerates them.
#[async_trait]
pub trait TokenRegistry {
    /// Every registration across all users, each with its deletable path.
    async fn all_registrations(&self) -> AlertResult<Vec<DeviceRegistration>>;

    /// Delete one registration record. Used to prune tokens the delivery
    /// service reported as invalid.
    async fn delete_registration(&self, doc_path: &str) -> AlertResult<()>;
}
