//! # Kompello Operations
//!
//! Commands in kompello are plain structs whose fields are the command's
//! parameters. The `#[operation]` attribute gives each one a verb/noun identity,
//! and an `Execute` impl binds it to the context it runs against.
//!
//! ## Example
//!
//! ```ignore
//! use kompello_operations::*;
//!
//! #[operation(verb = "add", noun = "field", description = "Define a custom field")]
//! #[derive(Debug, Deserialize, Serialize)]
//! pub struct AddField {
//!     pub key: String,
//!     pub name: String,
//! }
//!
//! #[async_trait]
//! impl Execute<BillingContext, BillingError> for AddField {
//!     async fn execute(&self, ctx: &BillingContext) -> ExecutionResult<Value, BillingError> {
//!         // mutations return ExecutionResult::Logged, reads return Unlogged
//!     }
//! }
//! ```

mod execution_result;
mod log;
mod operation;
mod processor;

pub use execution_result::ExecutionResult;
pub use log::LogEntry;
pub use operation::{Execute, Operation};
pub use processor::OperationProcessor;

pub use kompello_operations_macros::operation;

pub use async_trait::async_trait;
pub use serde_json::Value;
