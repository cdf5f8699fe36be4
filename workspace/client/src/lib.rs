//! Remote data access for the money-note backend: an async HTTP facade, its
//! normalized error type and a query cache with explicit invalidation.

pub mod api_client;
pub mod cache;
pub mod error;
pub mod queries;
pub mod settings;

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod tests;

pub use api_client::ApiClient;
pub use cache::{QueryCache, Resource};
pub use error::{ApiError, ErrorBody, Result};
pub use queries::QueryClient;
pub use settings::ClientSettings;
