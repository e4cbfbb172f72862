//! Core types for the billing engine

mod actor;
mod company;
mod field;
mod host;
mod ids;
mod item;

pub use actor::Actor;
pub use company::Company;
pub use field::{FieldDefinition, FieldDefinitionPatch, NewFieldDefinition};
pub use host::HostRef;
pub use ids::{CompanyId, FieldId, ItemId, UserId};
pub use item::Item;
