//! Symbol -> instrument mapping.
//!
//! - **Model** (`model.rs`) - `InstrumentRecord` and the immutable `InstrumentMapping` snapshot
//! - **Parser** (`parser.rs`) - CSV validation and row coercion
//! - **Resolver** (`resolver.rs`) - lazy cached loading, sample seeding, symbol lookup

pub mod errors;
pub mod model;
pub mod parser;
pub mod resolver;

#[cfg(test)]
mod resolver_tests;

pub use errors::MappingError;
pub use model::{InstrumentMapping, InstrumentRecord};
pub use parser::{parse_mapping, REQUIRED_COLUMNS};
pub use resolver::MappingResolver;
