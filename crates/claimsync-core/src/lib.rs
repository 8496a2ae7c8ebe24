//! claimsync Core Library
//!
//! Shared identifiers and domain types for claimsync.
//!
//! # Modules
//!
//! - [`ids`] - Strongly typed identifiers (`EventId`, `RegistryId`, `Adcid`)
//! - [`directory`] - Directory snapshot records and their promotion chain
//! - [`registry`] - Identity-registry records and the claimed predicate
//! - [`error`] - Standardized error types (`CoreError`)
//!
//! # Example
//!
//! ```
//! use claimsync_core::{Adcid, PersonName, StudyAuthorizations, UserEntry};
//!
//! let entry = UserEntry {
//!     name: PersonName::new("Ada", "Lovelace"),
//!     email: "ada@example.org".to_string(),
//!     active: true,
//!     organization: "Analytical Engines".to_string(),
//!     adcid: Adcid::new(7),
//!     authorizations: StudyAuthorizations::new(),
//! };
//! assert_eq!(entry.full_name(), "Ada Lovelace");
//! ```

pub mod directory;
pub mod error;
pub mod ids;
pub mod registry;

// Re-export main types for convenient access
pub use directory::{
    AccessLevel, ActiveUserEntry, DirectoryRecord, PersonName, RegisteredUserEntry,
    StudyAuthorizations, UserEntry,
};
pub use error::{CoreError, Result};
pub use ids::{Adcid, EventId, ParseIdError, RegistryId};
pub use registry::{ExternalIdentity, IdentityStatus, RegistryEmail, RegistryPerson};
