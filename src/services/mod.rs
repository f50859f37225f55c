//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod container;
mod user_workflow;

// Service Container
pub use container::Services;

// Service traits and implementations
pub use user_workflow::{UserManager, UserWorkflow, WorkflowError, WorkflowResult};

#[cfg(any(test, feature = "test-utils"))]
pub use user_workflow::MockUserWorkflow;
