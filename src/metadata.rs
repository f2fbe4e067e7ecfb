use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetails {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl ProjectDetails {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Opaque references to supporting documents. Carried into the reports as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRefs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_requirement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functional_requirement: Option<String>,
}
