//! Recurring instance lifecycle: generation, completion, the periodic sweep
//! and administrative bulk operations over future instances.

pub mod bulk;
pub mod clock;
pub mod completion;
pub mod generator;
pub mod sweep;

#[cfg(test)]
pub(crate) mod fixtures;

pub use bulk::{BulkAction, BulkOutcome};
pub use clock::{Clock, FixedClock, SystemClock};
pub use completion::{complete_instance, Completion};
pub use generator::{create_instance, generate_next_fixed};
pub use sweep::{run_sweep, SweepReport};
