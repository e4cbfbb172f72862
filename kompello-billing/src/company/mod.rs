//! Company operations

mod add;
mod add_member;
mod get;
mod update;

pub use add::AddCompany;
pub use add_member::AddMember;
pub use get::GetCompany;
pub use update::UpdateCompany;

use kompello_fields::FieldMap;
use serde_json::Value;

use crate::custom_fields::with_custom_fields;
use crate::error::Result;
use crate::types::Company;

/// Company representation with its custom fields embedded
fn company_json(company: &Company, fields: FieldMap) -> Result<Value> {
    with_custom_fields(serde_json::to_value(company)?, fields)
}
