use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use tallyworks_core::UserId;

use crate::Group;

/// An authenticated user together with the feature groups granted to it.
///
/// Membership is resolved by the platform before an operation runs; domain
/// code only queries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    groups: BTreeSet<Group>,
}

impl User {
    pub fn new(id: UserId, groups: impl IntoIterator<Item = Group>) -> Self {
        Self {
            id,
            groups: groups.into_iter().collect(),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    pub fn has_group(&self, group: &Group) -> bool {
        self.groups.contains(group)
    }

    pub fn has_any_group<'a>(&self, groups: impl IntoIterator<Item = &'a Group>) -> bool {
        groups.into_iter().any(|g| self.has_group(g))
    }
}
