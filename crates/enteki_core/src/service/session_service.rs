//! Session use-case service.
//!
//! # Responsibility
//! - Hold the current selection (mode, date, calendar month).
//! - Route user mutations into the record store and equipment registry.
//! - Write the affected document through to the key-value store after every
//!   committed mutation.
//! - Project state into view models for the rendering layer.
//!
//! # Invariants
//! - A mutation is complete only after its flush succeeds. On flush failure
//!   the in-memory change is rolled back and the error is returned.
//! - Shot placement and equipment toggling are silent no-ops while the
//!   session is read-only.
//! - Startup never fails on corrupt persisted state.

use crate::calendar::{build_grid, CalendarCell, CalendarGrid, MonthCursor};
use crate::model::equipment::{EquipmentItem, EquipmentRef, EquipmentValidationError};
use crate::model::record_key::{DateKey, Mode};
use crate::model::shot::Shot;
use crate::model::stand::{Stand, ToggleOutcome, MAX_SELECTED_EQUIPMENT};
use crate::repo::equipment_repo::EquipmentRegistry;
use crate::repo::record_repo::{DayRecords, RecordError, RecordStore};
use crate::scoring::ScoreTable;
use crate::storage::snapshot::{encode_records, encode_tools, load_records, load_tools};
use crate::storage::{KeyValueStore, StoreError, RECORDS_KEY, TOOLS_KEY};
use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SessionResult<T> = Result<T, SessionError>;

/// Errors surfaced to session callers.
#[derive(Debug)]
pub enum SessionError {
    /// Equipment registration input rejected; nothing was stored.
    Validation(EquipmentValidationError),
    /// Stale or invalid stand index; the day list is unchanged.
    Record(RecordError),
    /// Toggle tried to select equipment that is not registered.
    UnknownEquipment(EquipmentRef),
    /// Shot coordinates were NaN or infinite.
    NonFiniteCoordinate,
    /// Document could not be serialized for flushing.
    Encode(serde_json::Error),
    /// Key-value store rejected the flush.
    Store(StoreError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Record(err) => write!(f, "{err}"),
            Self::UnknownEquipment(equipment) => {
                write!(f, "equipment {equipment} is not registered")
            }
            Self::NonFiniteCoordinate => write!(f, "shot coordinates must be finite"),
            Self::Encode(err) => write!(f, "failed to encode session state: {err}"),
            Self::Store(err) => write!(f, "failed to persist session state: {err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Record(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::UnknownEquipment(_) | Self::NonFiniteCoordinate => None,
        }
    }
}

impl From<EquipmentValidationError> for SessionError {
    fn from(value: EquipmentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RecordError> for SessionError {
    fn from(value: RecordError) -> Self {
        Self::Record(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Session tuning knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Zone table used to score new shots.
    pub score_table: ScoreTable,
    /// Whether shot placement and equipment toggling are accepted.
    pub editable: bool,
    /// Per-stand selection limit, clamped to `MAX_SELECTED_EQUIPMENT`.
    pub max_selected_equipment: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            score_table: ScoreTable::canonical(),
            editable: true,
            max_selected_equipment: MAX_SELECTED_EQUIPMENT,
        }
    }
}

impl SessionConfig {
    fn selection_cap(&self) -> usize {
        self.max_selected_equipment.min(MAX_SELECTED_EQUIPMENT)
    }
}

/// Calendar month plus the current date selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarView {
    pub mode: Mode,
    pub grid: CalendarGrid,
    pub selected_date: DateKey,
}

impl CalendarView {
    pub fn is_selected(&self, cell: &CalendarCell) -> bool {
        cell.date.as_ref() == Some(&self.selected_date)
    }
}

/// One stand projected for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandView<'a> {
    pub index: usize,
    pub stand: &'a Stand,
    pub total_score: u32,
    pub shot_count: usize,
}

/// One registered equipment item with its selection state on a stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquipmentView<'a> {
    pub equipment: EquipmentRef,
    pub item: &'a EquipmentItem,
    pub selected: bool,
}

/// Application-state object for one user session.
pub struct SessionController<S: KeyValueStore> {
    store: S,
    config: SessionConfig,
    records: RecordStore,
    equipment: EquipmentRegistry,
    mode: Mode,
    selected_date: DateKey,
    month: MonthCursor,
}

impl<S: KeyValueStore> SessionController<S> {
    /// Opens a session selecting today's local date.
    pub fn open(store: S, config: SessionConfig) -> Self {
        Self::with_today(store, config, Local::now().date_naive())
    }

    /// Opens a session selecting `today`.
    ///
    /// Persisted documents are loaded from `store`; missing or corrupt
    /// documents start empty.
    pub fn with_today(store: S, config: SessionConfig, today: NaiveDate) -> Self {
        let equipment = load_tools(&store).into_value();
        let records = load_records(&store).into_value();
        info!(
            "event=session_open module=session status=ok equipment_count={} day_count={} editable={}",
            equipment.len(),
            records.days().count(),
            config.editable
        );

        Self {
            store,
            config,
            records,
            equipment,
            mode: Mode::default(),
            selected_date: DateKey::from_date_clamped(today),
            month: MonthCursor::containing(today),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn selected_date(&self) -> &DateKey {
        &self.selected_date
    }

    /// Selects a day; the displayed month is left as is.
    pub fn select_date(&mut self, date: DateKey) {
        self.selected_date = date;
    }

    pub fn month(&self) -> MonthCursor {
        self.month
    }

    pub fn set_month(&mut self, month: MonthCursor) {
        self.month = month;
    }

    pub fn prev_month(&mut self) -> MonthCursor {
        self.month = self.month.prev();
        self.month
    }

    pub fn next_month(&mut self) -> MonthCursor {
        self.month = self.month.next();
        self.month
    }

    pub fn is_editable(&self) -> bool {
        self.config.editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.config.editable = editable;
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn equipment(&self) -> &EquipmentRegistry {
        &self.equipment
    }

    /// Underlying key-value store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Releases the key-value store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Stands for the current mode and date.
    pub fn stands(&self) -> &[Stand] {
        self.records.stands(self.mode, &self.selected_date)
    }

    /// Total score for the current mode and date.
    pub fn day_total(&self) -> u32 {
        self.records
            .for_mode(self.mode)
            .day_total(&self.selected_date)
    }

    /// Appends an empty stand to the current day and returns its index.
    pub fn add_stand(&mut self) -> SessionResult<usize> {
        let index = self.commit_day(|records, mode, date| Ok(records.add_stand(mode, date)))?;
        info!(
            "event=stand_add module=session status=ok mode={} date={} index={index}",
            self.mode, self.selected_date
        );
        Ok(index)
    }

    /// Replaces a stand of the current day.
    pub fn update_stand(&mut self, index: usize, stand: Stand) -> SessionResult<()> {
        self.commit_day(|records, mode, date| {
            records.update_stand(mode, date, index, stand)?;
            Ok(())
        })?;
        debug!(
            "event=stand_update module=session status=ok mode={} date={} index={index}",
            self.mode, self.selected_date
        );
        Ok(())
    }

    /// Scores and appends a shot to a stand of the current day.
    ///
    /// Returns `Ok(None)` without touching state when the session is
    /// read-only.
    pub fn add_shot(&mut self, stand_index: usize, x: f64, y: f64) -> SessionResult<Option<Shot>> {
        if !self.config.editable {
            return Ok(None);
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(SessionError::NonFiniteCoordinate);
        }

        let table = self.config.score_table.clone();
        let shot = self.commit_day(|records, mode, date| {
            Ok(records.add_shot(mode, date, stand_index, x, y, &table)?)
        })?;
        debug!(
            "event=shot_add module=session status=ok mode={} date={} stand={stand_index} score={}",
            self.mode,
            self.selected_date,
            shot.score()
        );
        Ok(Some(shot))
    }

    /// Toggles equipment on a stand of the current day.
    ///
    /// Returns `Ok(None)` when read-only. A full selection yields
    /// `Some(ToggleOutcome::CapReached)` and nothing is written.
    ///
    /// Only selecting requires `equipment` to be registered; a selected ref
    /// can always be deselected.
    pub fn toggle_equipment(
        &mut self,
        stand_index: usize,
        equipment: EquipmentRef,
    ) -> SessionResult<Option<ToggleOutcome>> {
        if !self.config.editable {
            return Ok(None);
        }

        let cap = self.config.selection_cap();
        let current = self
            .records
            .stand(self.mode, &self.selected_date, stand_index)?;
        if !current.is_selected(equipment) {
            if self.equipment.get(equipment).is_none() {
                return Err(SessionError::UnknownEquipment(equipment));
            }
            if current.selected_equipment().len() >= cap {
                debug!(
                    "event=equipment_toggle module=session status=capped mode={} date={} stand={stand_index}",
                    self.mode, self.selected_date
                );
                return Ok(Some(ToggleOutcome::CapReached));
            }
        }

        let outcome = self.commit_day(|records, mode, date| {
            Ok(records.toggle_equipment_capped(mode, date, stand_index, equipment, cap)?)
        })?;
        debug!(
            "event=equipment_toggle module=session status=ok mode={} date={} stand={stand_index} outcome={outcome:?}",
            self.mode, self.selected_date
        );
        Ok(Some(outcome))
    }

    /// Registers equipment from raw form input and returns its ref.
    ///
    /// Duplicate names are accepted.
    pub fn register_equipment(&mut self, name: &str, kind: &str) -> SessionResult<EquipmentRef> {
        let previous_len = self.equipment.len();
        let equipment = match self.equipment.register(name, kind) {
            Ok(equipment) => equipment,
            Err(err) => {
                info!("event=equipment_register module=session status=rejected error={err}");
                return Err(err.into());
            }
        };

        if let Err(err) = self.flush_tools() {
            self.equipment.truncate(previous_len);
            return Err(err);
        }
        info!(
            "event=equipment_register module=session status=ok equipment={equipment} count={}",
            self.equipment.len()
        );
        Ok(equipment)
    }

    /// Month grid for the current mode with the selected date.
    pub fn calendar_view(&self) -> CalendarView {
        CalendarView {
            mode: self.mode,
            grid: build_grid(self.month, &self.records.for_mode(self.mode)),
            selected_date: self.selected_date.clone(),
        }
    }

    /// Stands of the current day with per-stand totals.
    pub fn stand_views(&self) -> Vec<StandView<'_>> {
        self.stands()
            .iter()
            .enumerate()
            .map(|(index, stand)| StandView {
                index,
                stand,
                total_score: stand.total_score(),
                shot_count: stand.shot_count(),
            })
            .collect()
    }

    /// Registered equipment with selection state for one stand.
    pub fn equipment_views(&self, stand_index: usize) -> SessionResult<Vec<EquipmentView<'_>>> {
        let stand = self
            .records
            .stand(self.mode, &self.selected_date, stand_index)?;
        Ok(self
            .equipment
            .items()
            .iter()
            .enumerate()
            .map(|(equipment, item)| EquipmentView {
                equipment,
                item,
                selected: stand.is_selected(equipment),
            })
            .collect())
    }

    /// Runs one mutation on the current day and flushes the record tree.
    ///
    /// The day list is restored when either the mutation or the flush fails.
    fn commit_day<T>(
        &mut self,
        mutate: impl FnOnce(&mut RecordStore, Mode, &DateKey) -> SessionResult<T>,
    ) -> SessionResult<T> {
        let mode = self.mode;
        let date = self.selected_date.clone();
        let before = self.records.stands(mode, &date).to_vec();

        let result = mutate(&mut self.records, mode, &date).and_then(|value| {
            self.flush_records()?;
            Ok(value)
        });
        if result.is_err() {
            self.records.restore_day(mode, &date, before);
        }
        result
    }

    fn flush_records(&mut self) -> SessionResult<()> {
        let encoded = encode_records(&self.records)?;
        self.write(RECORDS_KEY, &encoded)
    }

    fn flush_tools(&mut self) -> SessionResult<()> {
        let encoded = encode_tools(&self.equipment)?;
        self.write(TOOLS_KEY, &encoded)
    }

    fn write(&mut self, key: &str, encoded: &str) -> SessionResult<()> {
        match self.store.set(key, encoded) {
            Ok(()) => {
                debug!(
                    "event=flush module=session status=ok key={key} bytes={}",
                    encoded.len()
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=flush module=session status=error key={key} error_code=store_write_failed error={err}"
                );
                Err(err.into())
            }
        }
    }
}
