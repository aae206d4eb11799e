pub mod clock;
pub mod sync;

pub use clock::{Clock, SystemClock};
