//! Firebase-backed collaborators: credentials, OAuth2 token minting, the
//! Firestore document store, and FCM push delivery.

pub mod auth;
pub mod credentials;
pub mod firestore;
pub mod messaging;

pub use credentials::ServiceAccountKey;
pub use firestore::FirestoreClient;
pub use messaging::MessagingClient;
