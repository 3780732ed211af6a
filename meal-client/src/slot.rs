//! Meal slot gating
//!
//! A slot is `Locked` whenever the server has locked it, regardless of its
//! active flag. Otherwise it is `Active` or `Upcoming`. Orders may only be
//! submitted against an `Active` slot.

use std::fmt;

use shared::models::MealSlot;

use crate::error::{ClientError, ClientResult};

/// Derived state of a meal slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotState {
    Locked,
    Upcoming,
    Active,
}

impl SlotState {
    pub fn from_flags(locked: bool, active: bool) -> Self {
        if locked {
            Self::Locked
        } else if active {
            Self::Active
        } else {
            Self::Upcoming
        }
    }

    pub fn of(slot: &MealSlot) -> Self {
        Self::from_flags(slot.locked, slot.active)
    }

    pub fn is_submittable(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Locked => "Locked",
            Self::Upcoming => "Upcoming",
            Self::Active => "Active",
        }
    }
}

impl fmt::Display for SlotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Gate over one slot of the current catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealSlotGate {
    pub slot_id: String,
    pub slot_name: String,
    pub state: SlotState,
}

impl MealSlotGate {
    pub fn new(slot: &MealSlot) -> Self {
        Self {
            slot_id: slot.id.clone(),
            slot_name: slot.name.clone(),
            state: SlotState::of(slot),
        }
    }

    pub fn is_submittable(&self) -> bool {
        self.state.is_submittable()
    }

    /// `SlotUnavailable` unless the slot is active
    pub fn ensure_submittable(&self) -> ClientResult<()> {
        if self.is_submittable() {
            Ok(())
        } else {
            Err(ClientError::SlotUnavailable(format!(
                "{} is {}",
                self.slot_name,
                self.state.label().to_lowercase()
            )))
        }
    }
}

/// The passenger's slot choice
///
/// Locked and unknown slots are refused here, before anything reaches the
/// network. Upcoming slots may be selected; submission re-checks the gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotSelection {
    selected: Option<String>,
}

impl SlotSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `slot_id` from `slots`
    pub fn select(&mut self, slot_id: &str, slots: &[MealSlot]) -> ClientResult<SlotState> {
        let slot = slots
            .iter()
            .find(|s| s.id == slot_id)
            .ok_or_else(|| ClientError::SlotUnavailable(format!("unknown meal slot {slot_id}")))?;

        let gate = MealSlotGate::new(slot);
        if gate.state == SlotState::Locked {
            return Err(ClientError::SlotUnavailable(format!("{} is locked", slot.name)));
        }

        self.selected = Some(slot.id.clone());
        Ok(gate.state)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}
