//! Eisenhower matrix quadrant model.
//!
//! Quadrants are always derived from `(task, now)` and never stored.

use crate::model::task::{ParseEnumError, Task};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One cell of the urgency/importance matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    /// Q1: do first.
    UrgentImportant,
    /// Q2: schedule.
    NotUrgentImportant,
    /// Q3: delegate.
    UrgentNotImportant,
    /// Q4: eliminate.
    NotUrgentNotImportant,
}

impl Quadrant {
    /// Matrix order, Q1 through Q4.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::UrgentImportant,
        Quadrant::NotUrgentImportant,
        Quadrant::UrgentNotImportant,
        Quadrant::NotUrgentNotImportant,
    ];

    /// Position in [`Quadrant::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::UrgentImportant => 0,
            Self::NotUrgentImportant => 1,
            Self::UrgentNotImportant => 2,
            Self::NotUrgentNotImportant => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UrgentImportant => "UrgentImportant",
            Self::NotUrgentImportant => "NotUrgentImportant",
            Self::UrgentNotImportant => "UrgentNotImportant",
            Self::NotUrgentNotImportant => "NotUrgentNotImportant",
        }
    }

    /// Short action label shown on matrix headers.
    pub fn label(self) -> &'static str {
        match self {
            Self::UrgentImportant => "Do First",
            Self::NotUrgentImportant => "Schedule",
            Self::UrgentNotImportant => "Delegate",
            Self::NotUrgentNotImportant => "Eliminate",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::UrgentImportant => "Critical tasks that require immediate attention",
            Self::NotUrgentImportant => "Important tasks to plan and schedule for later",
            Self::UrgentNotImportant => "Tasks that are time-sensitive but less critical",
            Self::NotUrgentNotImportant => "Low priority tasks to consider eliminating",
        }
    }
}

impl Display for Quadrant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quadrant {
    type Err = ParseEnumError;

    /// Accepts variant names, action labels, and `q1`..`q4`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value
            .trim()
            .to_ascii_lowercase()
            .replace(['-', '_', ' '], "");
        match normalized.as_str() {
            "urgentimportant" | "dofirst" | "q1" => Ok(Self::UrgentImportant),
            "noturgentimportant" | "schedule" | "q2" => Ok(Self::NotUrgentImportant),
            "urgentnotimportant" | "delegate" | "q3" => Ok(Self::UrgentNotImportant),
            "noturgentnotimportant" | "eliminate" | "q4" => Ok(Self::NotUrgentNotImportant),
            _ => Err(ParseEnumError::new("quadrant", value)),
        }
    }
}

/// Task enriched with its classification at one instant. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedTask {
    pub task: Task,
    pub quadrant: Quadrant,
    pub is_urgent: bool,
    pub is_important: bool,
}

#[cfg(test)]
mod tests {
    use super::Quadrant;

    #[test]
    fn index_matches_matrix_order() {
        for (position, quadrant) in Quadrant::ALL.iter().enumerate() {
            assert_eq!(quadrant.index(), position);
        }
    }

    #[test]
    fn parses_names_labels_and_shorthand() {
        assert_eq!(
            "UrgentImportant".parse::<Quadrant>().unwrap(),
            Quadrant::UrgentImportant
        );
        assert_eq!(
            "do-first".parse::<Quadrant>().unwrap(),
            Quadrant::UrgentImportant
        );
        assert_eq!("Q4".parse::<Quadrant>().unwrap(), Quadrant::NotUrgentNotImportant);
        assert!("q5".parse::<Quadrant>().is_err());
    }
}
