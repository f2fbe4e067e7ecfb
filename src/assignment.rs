use crate::catalog::{self, RoleDefinition};
use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// One row of the team structure: how many people of a role, for how many hours each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub hours: u32,
}

impl RoleAssignment {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            role: None,
            count: 0,
            hours: 0,
        }
    }

    pub fn with_role(id: u32, role: impl Into<String>, count: u32, hours: u32) -> Self {
        Self {
            id,
            role: Some(role.into()),
            count,
            hours,
        }
    }

    /// Catalog entry for the selected role. Unknown or blank names count as unselected.
    pub fn role_definition(&self) -> Option<&'static RoleDefinition> {
        self.role.as_deref().and_then(catalog::lookup)
    }

    pub fn is_selected(&self) -> bool {
        self.role_definition().is_some()
    }
}

/// Ordered rows of role assignments. Row ids are never reused, so removing a row does
/// not re-key the ones after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RoleAssignment>", into = "Vec<RoleAssignment>")]
pub struct TeamStructure {
    rows: Vec<RoleAssignment>,
    next_id: u32,
}

impl TryFrom<Vec<RoleAssignment>> for TeamStructure {
    type Error = ValidationError;

    fn try_from(rows: Vec<RoleAssignment>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<TeamStructure> for Vec<RoleAssignment> {
    fn from(team: TeamStructure) -> Self {
        team.rows
    }
}

impl Default for TeamStructure {
    fn default() -> Self {
        Self::new()
    }
}

impl TeamStructure {
    /// A team with a single empty row.
    pub fn new() -> Self {
        Self {
            rows: vec![RoleAssignment::new(1)],
            next_id: 2,
        }
    }

    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }

    /// Builds a team from existing rows, keeping their ids. Role names are trimmed and
    /// blank ones become unselected. Fails when an id leaves no room for another row.
    pub fn from_rows(mut rows: Vec<RoleAssignment>) -> Result<Self, ValidationError> {
        for row in &mut rows {
            row.role = row
                .role
                .take()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty());
        }
        let next_id = match rows.iter().map(|row| row.id).max() {
            Some(max) => max
                .checked_add(1)
                .ok_or(ValidationError::IdOutOfRange(max))?,
            None => 1,
        };
        Ok(Self { rows, next_id })
    }

    pub fn rows(&self) -> &[RoleAssignment] {
        &self.rows
    }

    pub fn find_row(&self, id: u32) -> Option<&RoleAssignment> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn selected_roles(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().filter_map(|row| row.role.as_deref())
    }

    pub fn has_selected_role(&self) -> bool {
        self.rows.iter().any(RoleAssignment::is_selected)
    }

    /// Roles the given row may still pick: everything not taken by another row.
    pub fn available_roles_for(&self, row_id: u32) -> Vec<&'static RoleDefinition> {
        catalog::available_roles(
            self.rows
                .iter()
                .filter(|row| row.id != row_id)
                .filter_map(|row| row.role.as_deref()),
        )
    }

    /// Appends an empty row. Refused once every catalog role is taken.
    pub fn add_row(&mut self) -> Result<u32, ValidationError> {
        if catalog::available_roles(self.selected_roles()).is_empty() {
            return Err(ValidationError::NoRolesAvailable);
        }
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or(ValidationError::IdOutOfRange(id))?;
        self.rows.push(RoleAssignment::new(id));
        Ok(id)
    }

    pub fn remove_row(&mut self, id: u32) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        self.rows.len() != before
    }

    /// Selects (or clears, with `None`) the role of a row.
    pub fn set_role(&mut self, id: u32, role: Option<&str>) -> Result<(), ValidationError> {
        let role = role.map(str::trim).filter(|name| !name.is_empty());
        if let Some(name) = role {
            if catalog::lookup(name).is_none() {
                return Err(ValidationError::UnknownRole(name.to_string()));
            }
            let taken = self
                .rows
                .iter()
                .any(|row| row.id != id && row.role.as_deref() == Some(name));
            if taken {
                return Err(ValidationError::DuplicateRole(name.to_string()));
            }
        }
        let row = self.row_mut(id)?;
        row.role = role.map(ToOwned::to_owned);
        Ok(())
    }

    pub fn set_count(&mut self, id: u32, count: u32) -> Result<(), ValidationError> {
        self.row_mut(id)?.count = count;
        Ok(())
    }

    pub fn set_hours(&mut self, id: u32, hours: u32) -> Result<(), ValidationError> {
        self.row_mut(id)?.hours = hours;
        Ok(())
    }

    fn row_mut(&mut self, id: u32) -> Result<&mut RoleAssignment, ValidationError> {
        self.rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(ValidationError::RowNotFound(id))
    }
}
