//! Generic pointer to a host entity instance

use kompello_fields::HostEntityType;

use super::ids::{CompanyId, ItemId};

/// One concrete host entity that custom field values can attach to.
///
/// Each variant pairs a host kind with that kind's typed id, so a value can
/// never point at an item using a company id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostRef {
    Company(CompanyId),
    Item(ItemId),
}

impl HostRef {
    pub fn entity_type(&self) -> HostEntityType {
        match self {
            Self::Company(_) => HostEntityType::Company,
            Self::Item(_) => HostEntityType::Item,
        }
    }

    /// Instance id as stored in the value table.
    pub fn instance_key(&self) -> String {
        match self {
            Self::Company(id) => id.to_string(),
            Self::Item(id) => id.to_string(),
        }
    }
}

impl std::fmt::Display for HostRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.entity_type(), self.instance_key())
    }
}
