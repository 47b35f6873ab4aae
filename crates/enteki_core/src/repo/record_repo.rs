//! In-memory record store keyed by `(mode, date)`.
//!
//! # Responsibility
//! - Hold every stand of every session in one flat table.
//! - Provide the append/replace/mutate contract used by the session layer.
//!
//! # Invariants
//! - An absent `(mode, date)` entry is equivalent to an empty stand list;
//!   the table never stores empty lists.
//! - Stands are only appended; a stand's index is its append position.
//! - A rejected mutation leaves the table unchanged.

use crate::model::equipment::EquipmentRef;
use crate::model::record_key::{DateKey, Mode};
use crate::model::shot::Shot;
use crate::model::stand::{Stand, ToggleOutcome, MAX_SELECTED_EQUIPMENT};
use crate::scoring::ScoreTable;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RecordResult<T> = Result<T, RecordError>;

/// Record store mutation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Stand index does not name a stand in the current list for the key.
    IndexOutOfRange {
        mode: Mode,
        date: DateKey,
        index: usize,
        len: usize,
    },
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange {
                mode,
                date,
                index,
                len,
            } => write!(
                f,
                "stand index {index} out of range for {mode} {date} ({len} stands)"
            ),
        }
    }
}

impl Error for RecordError {}

/// Read access to one mode's stands by date.
///
/// Implemented by the store's per-mode view and by plain maps so the
/// calendar can be built from either.
pub trait DayRecords {
    /// Stands recorded on `date`, empty when none.
    fn stands_on(&self, date: &DateKey) -> &[Stand];

    /// Sum of every shot score recorded on `date`.
    fn day_total(&self, date: &DateKey) -> u32 {
        self.stands_on(date).iter().map(Stand::total_score).sum()
    }
}

impl DayRecords for BTreeMap<DateKey, Vec<Stand>> {
    fn stands_on(&self, date: &DateKey) -> &[Stand] {
        self.get(date).map_or(&[], Vec::as_slice)
    }
}

/// Flat `(mode, date) -> stands` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    days: BTreeMap<(Mode, DateKey), Vec<Stand>>,
}

/// Borrowed view of one mode's records.
#[derive(Debug, Clone, Copy)]
pub struct ModeRecords<'store> {
    store: &'store RecordStore,
    mode: Mode,
}

impl ModeRecords<'_> {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Dates in this mode that have at least one stand, ascending.
    pub fn dates(&self) -> impl Iterator<Item = &DateKey> + '_ {
        let mode = self.mode;
        self.store
            .days
            .keys()
            .filter(move |(entry_mode, _)| *entry_mode == mode)
            .map(|(_, date)| date)
    }
}

impl DayRecords for ModeRecords<'_> {
    fn stands_on(&self, date: &DateKey) -> &[Stand] {
        self.store.stands(self.mode, date)
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from loaded day lists; empty lists are dropped.
    pub fn from_days(days: impl IntoIterator<Item = (Mode, DateKey, Vec<Stand>)>) -> Self {
        let days = days
            .into_iter()
            .filter(|(_, _, stands)| !stands.is_empty())
            .map(|(mode, date, stands)| ((mode, date), stands))
            .collect();
        Self { days }
    }

    /// Stands for `(mode, date)` in append order; empty when absent.
    pub fn stands(&self, mode: Mode, date: &DateKey) -> &[Stand] {
        self.days
            .get(&(mode, date.clone()))
            .map_or(&[], Vec::as_slice)
    }

    /// One stand by position.
    pub fn stand(&self, mode: Mode, date: &DateKey, index: usize) -> RecordResult<&Stand> {
        let stands = self.stands(mode, date);
        stands
            .get(index)
            .ok_or_else(|| out_of_range(mode, date, index, stands.len()))
    }

    /// Per-mode read view for aggregation.
    pub fn for_mode(&self, mode: Mode) -> ModeRecords<'_> {
        ModeRecords { store: self, mode }
    }

    /// All non-empty days as `(mode, date, stands)`, ordered by mode then date.
    pub fn days(&self) -> impl Iterator<Item = (Mode, &DateKey, &[Stand])> + '_ {
        self.days
            .iter()
            .map(|((mode, date), stands)| (*mode, date, stands.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Appends an empty stand and returns its index.
    pub fn add_stand(&mut self, mode: Mode, date: &DateKey) -> usize {
        let stands = self.days.entry((mode, date.clone())).or_default();
        stands.push(Stand::new());
        stands.len() - 1
    }

    /// Replaces the stand at `index`.
    ///
    /// # Errors
    /// - `IndexOutOfRange` when `index` is not a current position; the list
    ///   is left untouched.
    pub fn update_stand(
        &mut self,
        mode: Mode,
        date: &DateKey,
        index: usize,
        stand: Stand,
    ) -> RecordResult<()> {
        *self.stand_mut(mode, date, index)? = stand;
        Ok(())
    }

    /// Scores `(x, y)` with `table` and appends the shot to a stand.
    pub fn add_shot(
        &mut self,
        mode: Mode,
        date: &DateKey,
        stand_index: usize,
        x: f64,
        y: f64,
        table: &ScoreTable,
    ) -> RecordResult<Shot> {
        let stand = self.stand_mut(mode, date, stand_index)?;
        let shot = Shot::new(x, y, table);
        stand.push_shot(shot);
        Ok(shot)
    }

    /// Toggles an equipment ref on a stand under the standard cap.
    pub fn toggle_equipment(
        &mut self,
        mode: Mode,
        date: &DateKey,
        stand_index: usize,
        equipment: EquipmentRef,
    ) -> RecordResult<ToggleOutcome> {
        self.toggle_equipment_capped(mode, date, stand_index, equipment, MAX_SELECTED_EQUIPMENT)
    }

    /// Toggles an equipment ref on a stand, with `cap` clamped to the
    /// standard maximum.
    pub fn toggle_equipment_capped(
        &mut self,
        mode: Mode,
        date: &DateKey,
        stand_index: usize,
        equipment: EquipmentRef,
        cap: usize,
    ) -> RecordResult<ToggleOutcome> {
        let stand = self.stand_mut(mode, date, stand_index)?;
        Ok(stand.toggle_equipment_capped(equipment, cap))
    }

    /// Replaces a whole day list; an empty list removes the entry.
    pub(crate) fn restore_day(&mut self, mode: Mode, date: &DateKey, stands: Vec<Stand>) {
        if stands.is_empty() {
            self.days.remove(&(mode, date.clone()));
        } else {
            self.days.insert((mode, date.clone()), stands);
        }
    }

    fn stand_mut(&mut self, mode: Mode, date: &DateKey, index: usize) -> RecordResult<&mut Stand> {
        let len = self.stands(mode, date).len();
        self.days
            .get_mut(&(mode, date.clone()))
            .and_then(|stands| stands.get_mut(index))
            .ok_or_else(|| out_of_range(mode, date, index, len))
    }
}

fn out_of_range(mode: Mode, date: &DateKey, index: usize, len: usize) -> RecordError {
    RecordError::IndexOutOfRange {
        mode,
        date: date.clone(),
        index,
        len,
    }
}
