use serde::Serialize;

/// A role that can be staffed on a project, with its annual base compensation in the
/// domestic currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleDefinition {
    pub name: &'static str,
    pub base_compensation: f64,
}

impl RoleDefinition {
    const fn new(name: &'static str, base_compensation: f64) -> Self {
        Self {
            name,
            base_compensation,
        }
    }
}

const ROLE_CATALOG: [RoleDefinition; 13] = [
    RoleDefinition::new("Data Engineer", 1_200_000.0),
    RoleDefinition::new("Senior Data Engineer", 2_000_000.0),
    RoleDefinition::new("Lead Data Engineer", 2_600_000.0),
    RoleDefinition::new("Software Developer", 1_200_000.0),
    RoleDefinition::new("Senior Software Developer", 2_000_000.0),
    RoleDefinition::new("Lead Software Developer", 2_600_000.0),
    RoleDefinition::new("Frontend Developer", 1_200_000.0),
    RoleDefinition::new("Senior Frontend Developer", 2_000_000.0),
    RoleDefinition::new("Lead Frontend Developer", 2_600_000.0),
    RoleDefinition::new("DevOps Engineer", 2_000_000.0),
    RoleDefinition::new("Data Scientist", 1_200_000.0),
    RoleDefinition::new("OR Scientist", 1_200_000.0),
    RoleDefinition::new("Project Manager", 2_600_000.0),
];

/// All catalog roles in their display order.
pub fn roles() -> &'static [RoleDefinition] {
    &ROLE_CATALOG
}

pub fn lookup(name: &str) -> Option<&'static RoleDefinition> {
    ROLE_CATALOG.iter().find(|role| role.name == name)
}

/// Catalog roles that are not already part of `selected`, preserving catalog order.
pub fn available_roles<'a, I>(selected: I) -> Vec<&'static RoleDefinition>
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: Vec<&str> = selected.into_iter().collect();
    ROLE_CATALOG
        .iter()
        .filter(|role| !taken.contains(&role.name))
        .collect()
}
