use serde::{Deserialize, Serialize};

use simplerest_core::{Entity, SequenceId};

/// Basic employee details.
///
/// The `id` is assigned by the server when the employee is created and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: SequenceId,
    pub firstname: String,
    pub surname: String,
    pub department: String,
}

impl Entity for Employee {
    type Key = SequenceId;

    const KIND: &'static str = "employee";

    fn key(&self) -> &SequenceId {
        &self.id
    }
}

/// Employee details submitted for creation, before an id exists.
///
/// Any `id` field present in the submitted body is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewEmployee {
    pub firstname: String,
    pub surname: String,
    pub department: String,
}

impl NewEmployee {
    pub fn new(
        firstname: impl Into<String>,
        surname: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            firstname: firstname.into(),
            surname: surname.into(),
            department: department.into(),
        }
    }

    /// Attach the id allocated by the store.
    pub fn with_id(self, id: SequenceId) -> Employee {
        Employee {
            id,
            firstname: self.firstname,
            surname: self.surname,
            department: self.department,
        }
    }
}

/// Employees present when a store is seeded, in id order.
pub fn seed() -> Vec<NewEmployee> {
    vec![
        NewEmployee::new("Bruce", "Springsteen", "Bosses"),
        NewEmployee::new("Com", "Truise", "Audio"),
        NewEmployee::new("Iggy", "Pop", "Pharmaceuticals"),
    ]
}
