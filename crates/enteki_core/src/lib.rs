//! Core domain logic for the enteki score recorder.
//! This crate is the single source of truth for scoring and record invariants.

pub mod calendar;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod scoring;
pub mod service;
pub mod storage;

pub use calendar::{build_grid, CalendarCell, CalendarError, CalendarGrid, MonthCursor};
pub use logging::{
    default_log_level, init_logging, init_logging_with, logging_status, LogConfig, LoggingError,
};
pub use model::equipment::{EquipmentItem, EquipmentRef, EquipmentType, EquipmentValidationError};
pub use model::record_key::{DateKey, DateKeyError, Mode, MAX_YEAR, MIN_YEAR};
pub use model::shot::Shot;
pub use model::stand::{Stand, StandValidationError, ToggleOutcome, MAX_SELECTED_EQUIPMENT};
pub use repo::equipment_repo::EquipmentRegistry;
pub use repo::record_repo::{DayRecords, ModeRecords, RecordError, RecordResult, RecordStore};
pub use scoring::{ScoreTable, ScoreTableError, ScoreZone};
pub use service::session_service::{
    CalendarView, EquipmentView, SessionConfig, SessionController, SessionError, SessionResult,
    StandView,
};
pub use storage::{
    KeyValueStore, MemoryStore, SqliteKeyValueStore, StoreError, StoreResult, RECORDS_KEY,
    TOOLS_KEY,
};
