//! Stand (one round of shooting) model.
//!
//! # Invariants
//! - `shots` is append-only and kept in chronological order.
//! - `selected_equipment` holds distinct refs, at most
//!   `MAX_SELECTED_EQUIPMENT` of them, in selection order.

use crate::model::equipment::EquipmentRef;
use crate::model::shot::Shot;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Hard cap on equipment selected for one stand.
pub const MAX_SELECTED_EQUIPMENT: usize = 4;

/// Result of toggling one equipment ref on a stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Ref was absent and has been added.
    Selected,
    /// Ref was present and has been removed.
    Deselected,
    /// Ref was absent but the selection is full; nothing changed.
    CapReached,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StandValidationError {
    TooManyEquipment(usize),
    DuplicateEquipment(EquipmentRef),
}

impl Display for StandValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooManyEquipment(count) => write!(
                f,
                "stand selects {count} equipment items; at most {MAX_SELECTED_EQUIPMENT} allowed"
            ),
            Self::DuplicateEquipment(equipment) => {
                write!(f, "equipment {equipment} selected more than once")
            }
        }
    }
}

impl Error for StandValidationError {}

/// One discrete round: ordered shots plus the equipment used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StandWire")]
pub struct Stand {
    shots: Vec<Shot>,
    /// Serialized as `selectedTools` to match the stored document.
    #[serde(rename = "selectedTools")]
    selected_equipment: Vec<EquipmentRef>,
}

#[derive(Deserialize)]
struct StandWire {
    #[serde(default)]
    shots: Vec<Shot>,
    #[serde(default, rename = "selectedTools")]
    selected_tools: Vec<EquipmentRef>,
}

impl TryFrom<StandWire> for Stand {
    type Error = StandValidationError;

    fn try_from(value: StandWire) -> Result<Self, Self::Error> {
        Self::from_parts(value.shots, value.selected_tools)
    }
}

impl Stand {
    /// Creates an empty stand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a stand from existing parts, enforcing selection rules.
    pub fn from_parts(
        shots: Vec<Shot>,
        selected_equipment: Vec<EquipmentRef>,
    ) -> Result<Self, StandValidationError> {
        if selected_equipment.len() > MAX_SELECTED_EQUIPMENT {
            return Err(StandValidationError::TooManyEquipment(
                selected_equipment.len(),
            ));
        }
        for (position, equipment) in selected_equipment.iter().enumerate() {
            if selected_equipment[..position].contains(equipment) {
                return Err(StandValidationError::DuplicateEquipment(*equipment));
            }
        }

        Ok(Self {
            shots,
            selected_equipment,
        })
    }

    /// Assembles a stand, keeping the first occurrence of each ref and at
    /// most `MAX_SELECTED_EQUIPMENT` refs.
    pub fn from_parts_repaired(shots: Vec<Shot>, selected_equipment: Vec<EquipmentRef>) -> Self {
        let mut kept = Vec::with_capacity(MAX_SELECTED_EQUIPMENT);
        for equipment in selected_equipment {
            if kept.len() == MAX_SELECTED_EQUIPMENT {
                break;
            }
            if !kept.contains(&equipment) {
                kept.push(equipment);
            }
        }

        Self {
            shots,
            selected_equipment: kept,
        }
    }

    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    pub fn selected_equipment(&self) -> &[EquipmentRef] {
        &self.selected_equipment
    }

    pub fn is_selected(&self, equipment: EquipmentRef) -> bool {
        self.selected_equipment.contains(&equipment)
    }

    pub fn shot_count(&self) -> usize {
        self.shots.len()
    }

    /// Sum of all shot scores in this stand.
    pub fn total_score(&self) -> u32 {
        self.shots.iter().map(Shot::score).sum()
    }

    pub fn push_shot(&mut self, shot: Shot) {
        self.shots.push(shot);
    }

    /// Toggles `equipment` with the standard cap.
    pub fn toggle_equipment(&mut self, equipment: EquipmentRef) -> ToggleOutcome {
        self.toggle_equipment_capped(equipment, MAX_SELECTED_EQUIPMENT)
    }

    /// Toggles `equipment`, treating `cap` as the selection limit.
    ///
    /// `cap` is clamped to `MAX_SELECTED_EQUIPMENT`. A full selection makes
    /// adding a silent no-op reported as `CapReached`.
    pub fn toggle_equipment_capped(
        &mut self,
        equipment: EquipmentRef,
        cap: usize,
    ) -> ToggleOutcome {
        if let Some(position) = self
            .selected_equipment
            .iter()
            .position(|selected| *selected == equipment)
        {
            self.selected_equipment.remove(position);
            return ToggleOutcome::Deselected;
        }

        if self.selected_equipment.len() >= cap.min(MAX_SELECTED_EQUIPMENT) {
            return ToggleOutcome::CapReached;
        }

        self.selected_equipment.push(equipment);
        ToggleOutcome::Selected
    }
}
