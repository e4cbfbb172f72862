//! Tenant-defined custom fields: definition registry, value store and the
//! reconciliation host entities go through

mod facade;
mod registry;
mod values;

pub use facade::{reconcile_custom_fields, render_custom_fields, CustomFieldInput, WriteMode};
pub use registry::Registry;
pub use values::ValueStore;

pub(crate) use facade::with_custom_fields;
