/// Classification for how a bulk refresh reacts to a failed provider call.
///
/// # Behavior Summary
///
/// | Class | Remaining batches? | Batch result |
/// |-------|--------------------|--------------|
/// | `SkipBatch` | Continue | Dropped from this cycle |
/// | `Abort` | Stop | Dropped from this cycle |
///
/// Batches that already succeeded in the cycle are kept in both cases.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Transient failure scoped to one request (timeout, rate limit,
    /// malformed payload). The next batch may well succeed.
    SkipBatch,

    /// Permanent failure (bad credentials, provider not configured).
    /// Every further request in the cycle would fail the same way.
    Abort,
}
