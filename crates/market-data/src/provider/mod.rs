//! Quote provider abstractions and implementations.
//!
//! This module contains:
//! - The `QuoteProvider` trait that all providers implement
//! - Rate limiting configuration
//! - Concrete provider implementations (Dhan)
//!
//! Providers are optional at runtime: a provider whose credentials are not
//! configured is never constructed, and the core layer treats its absence
//! as a permanent "unavailable" state.

mod capabilities;
mod traits;

pub mod dhan;

pub use capabilities::RateLimit;
pub use traits::QuoteProvider;
