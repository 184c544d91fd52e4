//! Nearby-veterinarian lookup against an external places-search provider.
//!
//! [`VetLookupService`] builds the provider query, classifies transport
//! outcomes into [`LookupError`] and normalizes the untrusted provider records
//! into the stable [`VetPublic`] contract.

pub mod client;
pub mod error;
pub mod normalize;
pub mod service;
pub mod transport;
pub mod types;

pub use client::{HttpPlacesTransport, DEFAULT_MAX_BODY_BYTES};
pub use error::{LookupError, TransportError};
pub use normalize::{normalize_place, normalize_results, VetPublic};
pub use service::{SearchPolicy, VetLookupService, DEFAULT_SEARCH_KEYWORD, DEFAULT_SEARCH_RADIUS_METERS};
pub use transport::{PlacesTransport, ProviderResponse};
