//! Pipeline stages.
//!
//! Data flows strictly downward: the top split feeds the active branch,
//! which feeds the claimed/unclaimed branches, which feed the created and
//! update stages. Each stage fully drains its queue before the next begins,
//! and no stage re-enters an earlier stage's queue.

pub mod active;
pub mod claimed;
pub mod created;
pub mod inactive;
pub mod top;
pub mod unclaimed;
pub mod update;

pub use active::ActiveProcess;
pub use claimed::ClaimedProcess;
pub use created::CreatedProcess;
pub use inactive::InactiveProcess;
pub use top::TopProcess;
pub use unclaimed::{PendingClaim, UnclaimedProcess};
pub use update::UpdateProcess;
