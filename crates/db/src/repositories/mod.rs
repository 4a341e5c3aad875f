//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod assignment;
pub mod caller;
pub mod contract;
pub mod property;
pub mod tenant;
pub mod termination;
pub mod user;

pub use assignment::AssignmentRepository;
pub use caller::CallerRepository;
pub use contract::{ContractError, ContractRepository, CreateContractInput};
pub use property::PropertyRepository;
pub use tenant::{CreateTenantInput, TenantRepository};
pub use termination::{
    ContractSummary, PropertySummary, TenantSummary, TerminationDetail, TerminationFilter,
    TerminationRepository, UnitSummary,
};
pub use user::{CreateUserInput, UserRepository, public_user};
