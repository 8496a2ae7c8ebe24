//! # claimsync Pipeline
//!
//! Batch reconciliation of a hosted platform's user accounts and
//! project-access grants against an organizational directory snapshot and an
//! external identity-claim registry.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐      ┌──────────────┐      ┌───────────────┐
//! │  Directory   │─────►│  TopProcess  │─────►│ InactiveProc. │
//! │  snapshot    │      │ (act./inact.)│      │  (log only)   │
//! └──────────────┘      └──────┬───────┘      └───────────────┘
//!                              │ active
//!                       ┌──────▼───────┐      ┌───────────────┐
//!                       │ ActiveProc.  │─────►│ UnclaimedProc.│
//!                       │ (registry    │      │ (reminder)    │
//!                       │  resolution) │      └───────────────┘
//!                       └──────┬───────┘
//!                              │ claimed
//!                       ┌──────▼───────┐      ┌───────────────┐
//!                       │ ClaimedProc. │─────►│ CreatedProc.  │
//!                       │ (account     │      │ (announce)    │
//!                       │  existence)  │      └───────────────┘
//!                       └──────┬───────┘
//!                              │ always
//!                       ┌──────▼───────┐
//!                       │ UpdateProc.  │
//!                       │ (email+roles)│
//!                       └──────────────┘
//! ```
//!
//! Each stage fully drains its queue before the next begins. One malformed
//! entry or failed external call never aborts the batch: entry-scoped errors
//! are logged at the queue apply boundary and the run continues, while
//! user-actionable anomalies are classified into exactly one [`Event`] for
//! the end-of-run report.
//!
//! ## Example
//!
//! ```ignore
//! use claimsync_pipeline::{DirectoryReconciler, PipelineEnv, ReconcileReport};
//!
//! let env = PipelineEnv { registry: &registry, platform: &platform, notifier: &notifier };
//! let events = DirectoryReconciler::new(env).run(snapshot)?;
//! let report = ReconcileReport::from_collector(&events);
//! println!("{}", report.summary());
//! ```

pub mod analyzer;
pub mod config;
pub mod error;
pub mod events;
pub mod pipeline;
pub mod process;
pub mod queue;
pub mod report;
pub mod traits;

// Re-exports for convenience
pub use analyzer::{FailureAnalyzer, Finding};
pub use config::{ReconcileConfig, DEFAULT_TRUSTED_ISSUER};
pub use error::{PipelineError, PipelineResult};
pub use events::{Event, EventCategory, EventCollector, EventUser};
pub use pipeline::DirectoryReconciler;
pub use process::{
    ActiveProcess, ClaimedProcess, CreatedProcess, InactiveProcess, PendingClaim, TopProcess,
    UnclaimedProcess, UpdateProcess,
};
pub use queue::{EntryProcess, Queue};
pub use report::ReconcileReport;
pub use traits::{
    Center, IdentityRegistry, NotificationClient, PipelineEnv, PlatformClient, PlatformUser,
};
