//! Kompello billing engine
//!
//! Tenant-scoped billing data (companies, items) with tenant-defined custom
//! fields, stored in SQLite.
//!
//! # Architecture
//!
//! - **Context = storage primitives**: [`BillingContext`] owns the connection,
//!   the acting [`Actor`] and the transaction boundaries
//! - **Commands do the work**: each operation is a struct with an
//!   [`Execute`] impl, grouped by noun (`company`, `field`, `item`)
//! - **Custom fields by composition**: host entity commands call
//!   [`reconcile_custom_fields`] inside their own write transaction and
//!   [`render_custom_fields`] when reading
//!
//! ```ignore
//! use kompello_billing::item::AddItem;
//! use kompello_billing::{BillingContext, BillingOperationProcessor, OperationProcessor};
//!
//! let ctx = BillingContext::open_in_memory()?;
//! let processor = BillingOperationProcessor::new();
//! let item = processor.process(&AddItem::new(company, "Consulting", 120.0), &ctx).await?;
//! ```

pub mod company;
pub mod config;
pub mod context;
pub mod custom_fields;
pub mod error;
pub mod field;
pub mod item;
pub mod processor;
mod schema;
pub mod types;

pub use config::{BillingConfig, DatabaseConfig};
pub use context::{BillingContext, Db};
pub use custom_fields::{
    reconcile_custom_fields, render_custom_fields, CustomFieldInput, Registry, ValueStore,
    WriteMode,
};
pub use error::{BillingError, ErrorKind, Result};
pub use processor::BillingOperationProcessor;
pub use types::*;

pub use kompello_fields::{FieldDataType, FieldMap, FieldValue, HostEntityType};
pub use kompello_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, Operation, OperationProcessor,
};
