use crate::validation::{self, ValidationError};
use serde::{Deserialize, Serialize};

/// A named payment milestone taking `percent` of the final quotation amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub percent: f64,
}

impl Milestone {
    pub fn new(id: u32, name: impl Into<String>, percent: f64) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            percent,
        }
    }
}

/// Where the milestone percentages stand relative to 100%.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MilestoneStatus {
    /// No milestones configured; nothing to reconcile.
    Unconfigured,
    Complete,
    Incomplete { total_percent: f64 },
    Overallocated { total_percent: f64 },
}

impl MilestoneStatus {
    /// Whether the milestone section allows export.
    pub fn allows_export(&self) -> bool {
        matches!(
            self,
            MilestoneStatus::Unconfigured | MilestoneStatus::Complete
        )
    }
}

/// Ordered milestones. An empty plan means milestones are not configured at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Milestone>", into = "Vec<Milestone>")]
pub struct MilestonePlan {
    milestones: Vec<Milestone>,
    next_id: u32,
}

impl TryFrom<Vec<Milestone>> for MilestonePlan {
    type Error = ValidationError;

    fn try_from(milestones: Vec<Milestone>) -> Result<Self, Self::Error> {
        let next_id = match milestones.iter().map(|m| m.id).max() {
            Some(max) => max
                .checked_add(1)
                .ok_or(ValidationError::IdOutOfRange(max))?,
            None => 1,
        };
        Ok(Self {
            milestones,
            next_id,
        })
    }
}

impl From<MilestonePlan> for Vec<Milestone> {
    fn from(plan: MilestonePlan) -> Self {
        plan.milestones
    }
}

impl Default for MilestonePlan {
    fn default() -> Self {
        Self::new()
    }
}

impl MilestonePlan {
    pub fn new() -> Self {
        Self {
            milestones: Vec::new(),
            next_id: 1,
        }
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    pub fn is_configured(&self) -> bool {
        !self.milestones.is_empty()
    }

    pub fn find(&self, id: u32) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == id)
    }

    /// Starts a milestone breakdown with a single "Milestone 1" at 0%.
    /// Does nothing when milestones already exist.
    pub fn create(&mut self) -> Result<(), ValidationError> {
        if self.milestones.is_empty() {
            self.add()?;
        }
        Ok(())
    }

    /// Appends "Milestone N" at 0%, where N is the new length of the plan. Refused once
    /// the percentages already reach 100%.
    pub fn add(&mut self) -> Result<u32, ValidationError> {
        if self.total_percent() >= 100.0 - validation::EPSILON {
            return Err(ValidationError::MilestonesFullyAllocated);
        }
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or(ValidationError::IdOutOfRange(id))?;
        let name = format!("Milestone {}", self.milestones.len() + 1);
        self.milestones.push(Milestone::new(id, name, 0.0));
        Ok(id)
    }

    /// Removes a milestone. Removing the only remaining one clears the plan back to
    /// unconfigured.
    pub fn remove(&mut self, id: u32) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        if self.milestones.len() > 1 {
            self.milestones.retain(|m| m.id != id);
        } else {
            self.clear();
        }
        true
    }

    pub fn clear(&mut self) {
        self.milestones.clear();
        self.next_id = 1;
    }

    pub fn set_name(&mut self, id: u32, name: impl Into<String>) -> Result<(), ValidationError> {
        self.milestone_mut(id)?.name = name.into();
        Ok(())
    }

    pub fn set_description(
        &mut self,
        id: u32,
        description: impl Into<String>,
    ) -> Result<(), ValidationError> {
        self.milestone_mut(id)?.description = description.into();
        Ok(())
    }

    pub fn set_percent(&mut self, id: u32, percent: f64) -> Result<(), ValidationError> {
        validation::validate_milestone_percent(id, percent)?;
        self.milestone_mut(id)?.percent = percent;
        Ok(())
    }

    pub fn total_percent(&self) -> f64 {
        self.milestones.iter().map(|m| m.percent).sum()
    }

    pub fn status(&self) -> MilestoneStatus {
        if self.milestones.is_empty() {
            return MilestoneStatus::Unconfigured;
        }
        let total_percent = self.total_percent();
        if validation::approx_equal(total_percent, 100.0) {
            MilestoneStatus::Complete
        } else if total_percent < 100.0 {
            MilestoneStatus::Incomplete { total_percent }
        } else {
            MilestoneStatus::Overallocated { total_percent }
        }
    }

    fn milestone_mut(&mut self, id: u32) -> Result<&mut Milestone, ValidationError> {
        self.milestones
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(ValidationError::MilestoneNotFound(id))
    }
}
