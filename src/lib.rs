//! Shelfwatch - scheduled expiry alerts for a product inventory.
//!
//! One run scans the inventory for active products whose expiry date falls
//! within the alerting horizon, summarizes them into three day-offset
//! buckets, and pushes the summary to every registered device, pruning
//! registrations the delivery service reports as invalid.
//!
//! The job is meant to be triggered by an external scheduler (cron, CI);
//! exit code 0 signals success, non-zero signals failure.
//!
//! # Example
//!
//! ```rust,ignore
//! use shelfwatch::config::AlertConfig;
//! use shelfwatch::firebase::{FirestoreClient, MessagingClient, ServiceAccountKey};
//! use shelfwatch::job::run_expiry_alert_job;
//!
//! let config = AlertConfig::load()?;
//! let key = ServiceAccountKey::from_env()?;
//! // ... mint a token, build the clients ...
//! let summary = run_expiry_alert_job(&config, &firestore, &firestore, &messaging).await?;
//! ```

pub mod buckets;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod firebase;
pub mod job;
pub mod notify;
pub mod store;
