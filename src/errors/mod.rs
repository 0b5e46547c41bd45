//! Centralized error handling for the M3U loader
//!
//! # Error Categories
//!
//! - **Fetch Errors**: invalid sources, upstream HTTP failures, transport failures
//! - **Validation Errors**: bad request parameters outside the fetch path
//! - **Configuration Errors**: invalid settings detected at startup
//!
//! # Usage
//!
//! ```rust
//! use m3u_loader::errors::{AppResult, FetchError};
//!
//! fn example() -> AppResult<()> {
//!     Err(FetchError::Upstream { status: 404 }.into())
//! }
//! assert!(example().is_err());
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for fetcher Results
pub type FetchResult<T> = Result<T, FetchError>;
