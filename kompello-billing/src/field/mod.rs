//! Custom field definition operations

mod add;
mod delete;
mod get;
mod list;
mod metadata;
mod update;

pub use add::AddField;
pub use delete::DeleteField;
pub use get::GetField;
pub use list::ListFields;
pub use metadata::GetFieldMetadata;
pub use update::UpdateField;
