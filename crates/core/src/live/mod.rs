//! Live quote cache and bulk refresh.
//!
//! # Cache states
//!
//! ```text
//! EMPTY ──refresh──► FRESH ──ttl elapses / force_stale──► STALE
//!                      ▲                                    │
//!                      └────────────refresh─────────────────┘
//! ```
//!
//! - **Cache** (`cache.rs`) - the process-wide quote snapshot and its freshness
//! - **Fetcher** (`fetcher.rs`) - batched provider calls with per-batch failure isolation
//! - **Pacer** (`pacer.rs`) - injectable inter-batch delay

pub mod cache;
pub mod fetcher;
pub mod model;
pub mod pacer;


pub use cache::LiveQuoteCache;
pub use fetcher::BulkQuoteFetcher;
pub use model::{CacheState, CacheStatus, RefreshOutcome, RefreshReport, SkipReason};
pub use pacer::{NoopPacer, Pacer, TokioPacer};
