//! Domain model for users and the student application workflow.
//!
//! Only students move through the status machine; supervisors and admins are
//! always [`UserStatus::Approved`]. All infrastructure concerns stay outside
//! the domain boundary.

mod credential;
mod documents;
mod error;
mod ids;
mod role;
mod status;
mod summary;
mod user;

pub use credential::CredentialHash;
pub use documents::{
    ApplicationDocuments, CompletionDocuments, RequiredDocument, require_documents,
};
pub use error::{ParseRoleError, ParseUserStatusError, UserAction, UserDomainError};
pub use ids::{EmailAddress, StudentNumber, UserId};
pub use role::Role;
pub use status::UserStatus;
pub use summary::UserSummary;
pub use user::{
    NewSupervisor, PersistedUserData, StudentProfile, StudentRegistration, SupervisorChanges,
    User,
};
