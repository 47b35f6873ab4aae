use chrono::NaiveDate;
use enteki_core::storage::snapshot::{load_records, load_tools};
use enteki_core::{
    DateKey, EquipmentValidationError, KeyValueStore, MemoryStore, Mode, MonthCursor,
    RecordError, SessionConfig, SessionController, SessionError, StoreError, StoreResult,
    ToggleOutcome, RECORDS_KEY, TOOLS_KEY,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
}

fn open(store: MemoryStore) -> SessionController<MemoryStore> {
    SessionController::with_today(store, SessionConfig::default(), today())
}

/// Store that accepts reads and rejects every write.
#[derive(Default)]
struct ReadOnlyDisk {
    inner: MemoryStore,
}

impl KeyValueStore for ReadOnlyDisk {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::Backend("disk is read-only".to_string()))
    }
}

#[test]
fn register_add_stand_and_shoot_bullseye() {
    let mut session = open(MemoryStore::new());

    let bow = session.register_equipment("弓A", "bow").unwrap();
    let stand = session.add_stand().unwrap();
    let shot = session.add_shot(stand, 0.0, 0.0).unwrap().unwrap();

    assert_eq!(bow, 0);
    assert_eq!(shot.score(), 10);
    assert_eq!(session.stands()[stand].shots(), &[shot]);

    let calendar = session.calendar_view();
    let cell = calendar.grid.cell_for(session.selected_date()).unwrap();
    assert!(cell.has_records);
    assert_eq!(cell.total_score, 10);
    assert!(calendar.is_selected(cell));
    assert_eq!(session.day_total(), 10);
}

#[test]
fn every_mutation_is_flushed() {
    let mut session = open(MemoryStore::new());
    session.register_equipment("弦1", "string").unwrap();
    let stand = session.add_stand().unwrap();
    session.add_shot(stand, 12.0, 0.0).unwrap();
    session.toggle_equipment(stand, 0).unwrap();

    let store = session.into_store();
    let tools = load_tools(&store).into_value();
    let records = load_records(&store).into_value();
    assert_eq!(tools.len(), 1);

    let date = DateKey::from_date(today()).unwrap();
    let stands = records.stands(Mode::Practice, &date);
    assert_eq!(stands.len(), 1);
    assert_eq!(stands[0].total_score(), 9);
    assert_eq!(stands[0].selected_equipment(), &[0]);
}

#[test]
fn reopening_restores_previous_session() {
    let mut session = open(MemoryStore::new());
    session.set_mode(Mode::Competition);
    let stand = session.add_stand().unwrap();
    session.add_shot(stand, 0.0, 45.0).unwrap();

    let mut reopened = open(session.into_store());
    assert!(reopened.stands().is_empty());
    reopened.set_mode(Mode::Competition);
    assert_eq!(reopened.stands()[0].total_score(), 3);
}

#[test]
fn corrupt_storage_opens_empty() {
    let store = MemoryStore::with_entries([(TOOLS_KEY, "nope"), (RECORDS_KEY, "{")]);
    let session = open(store);
    assert!(session.equipment().is_empty());
    assert!(session.records().is_empty());
}

#[test]
fn blank_registration_is_rejected_without_flush() {
    let mut session = open(MemoryStore::new());
    let err = session.register_equipment("  ", "bow").unwrap_err();
    assert!(matches!(
        err,
        SessionError::Validation(EquipmentValidationError::EmptyName)
    ));
    let err = session.register_equipment("弓A", "").unwrap_err();
    assert!(matches!(
        err,
        SessionError::Validation(EquipmentValidationError::EmptyType)
    ));
    assert!(session.store().is_empty());
}

#[test]
fn duplicate_names_are_allowed() {
    let mut session = open(MemoryStore::new());
    session.register_equipment("矢", "arrow").unwrap();
    assert_eq!(session.register_equipment("矢", "arrow").unwrap(), 1);
}

#[test]
fn stale_stand_index_is_rejected() {
    let mut session = open(MemoryStore::new());
    session.add_stand().unwrap();

    let err = session.add_shot(3, 0.0, 0.0).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Record(RecordError::IndexOutOfRange { index: 3, len: 1, .. })
    ));
    assert!(session.stands()[0].shots().is_empty());

    let err = session
        .update_stand(1, enteki_core::Stand::new())
        .unwrap_err();
    assert!(matches!(err, SessionError::Record(_)));
}

#[test]
fn read_only_session_ignores_shots_and_toggles() {
    let mut session = open(MemoryStore::new());
    session.register_equipment("弓A", "bow").unwrap();
    let stand = session.add_stand().unwrap();
    session.set_editable(false);

    assert_eq!(session.add_shot(stand, 0.0, 0.0).unwrap(), None);
    assert_eq!(session.toggle_equipment(stand, 0).unwrap(), None);
    assert!(session.stands()[stand].shots().is_empty());
    assert!(session.stands()[stand].selected_equipment().is_empty());
}

#[test]
fn toggle_caps_at_four_and_reports_views() {
    let mut session = open(MemoryStore::new());
    for name in ["弓A", "かけ", "弦", "矢", "予備弓"] {
        session.register_equipment(name, "bow").unwrap();
    }
    let stand = session.add_stand().unwrap();

    for equipment in 0..4 {
        assert_eq!(
            session.toggle_equipment(stand, equipment).unwrap(),
            Some(ToggleOutcome::Selected)
        );
    }
    assert_eq!(
        session.toggle_equipment(stand, 4).unwrap(),
        Some(ToggleOutcome::CapReached)
    );

    let views = session.equipment_views(stand).unwrap();
    let selected: Vec<bool> = views.iter().map(|view| view.selected).collect();
    assert_eq!(selected, vec![true, true, true, true, false]);

    let err = session.toggle_equipment(stand, 9).unwrap_err();
    assert!(matches!(err, SessionError::UnknownEquipment(9)));
}

#[test]
fn stale_selection_can_be_cleared_without_tools() {
    let store = MemoryStore::with_entries([(
        RECORDS_KEY,
        r#"{"practice":{"2024-03-09":[{"shots":[],"selectedTools":[0,1,2,3]}]},"competition":{}}"#,
    )]);
    let mut session = open(store);
    assert!(session.equipment().is_empty());

    assert_eq!(
        session.toggle_equipment(0, 0).unwrap(),
        Some(ToggleOutcome::Deselected)
    );
    assert_eq!(session.stands()[0].selected_equipment(), &[1, 2, 3]);

    let err = session.toggle_equipment(0, 0).unwrap_err();
    assert!(matches!(err, SessionError::UnknownEquipment(0)));

    let records = load_records(session.store()).into_value();
    let date = DateKey::parse("2024-03-09").unwrap();
    assert_eq!(
        records.stands(Mode::Practice, &date)[0].selected_equipment(),
        &[1, 2, 3]
    );
}

#[test]
fn oversized_stored_selection_keeps_other_days_after_a_write() {
    let store = MemoryStore::with_entries([(
        RECORDS_KEY,
        r#"{"practice":{
            "2024-01-01":[{"shots":[{"x":0,"y":0,"score":10}],"selectedTools":[]}],
            "2024-01-02":[{"shots":[],"selectedTools":[0,1,2,3,4]}]
        },"competition":{}}"#,
    )]);
    let mut session = open(store);
    session.add_stand().unwrap();

    let records = load_records(&session.into_store()).into_value();
    let intact = DateKey::parse("2024-01-01").unwrap();
    let repaired = DateKey::parse("2024-01-02").unwrap();
    assert_eq!(records.stands(Mode::Practice, &intact).len(), 1);
    assert_eq!(records.stands(Mode::Practice, &intact)[0].total_score(), 10);
    assert_eq!(
        records.stands(Mode::Practice, &repaired)[0].selected_equipment(),
        &[0, 1, 2, 3]
    );
    assert_eq!(
        records
            .stands(Mode::Practice, &DateKey::from_date(today()).unwrap())
            .len(),
        1
    );
}

#[test]
fn far_future_today_is_pinned_to_a_reloadable_key() {
    let far_future = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
    let mut session =
        SessionController::with_today(MemoryStore::new(), SessionConfig::default(), far_future);
    assert_eq!(session.selected_date().as_str(), "9999-12-31");
    assert_eq!(session.month(), MonthCursor::new(9999, 11).unwrap());
    assert_eq!(session.next_month(), MonthCursor::new(9999, 11).unwrap());

    session.add_stand().unwrap();
    let reopened = open(session.into_store());
    let date = DateKey::parse("9999-12-31").unwrap();
    assert_eq!(reopened.records().stands(Mode::Practice, &date).len(), 1);
}

#[test]
fn configured_cap_is_clamped() {
    let config = SessionConfig {
        max_selected_equipment: 2,
        ..SessionConfig::default()
    };
    let mut session = SessionController::with_today(MemoryStore::new(), config, today());
    for name in ["a", "b", "c"] {
        session.register_equipment(name, "arrow").unwrap();
    }
    let stand = session.add_stand().unwrap();
    session.toggle_equipment(stand, 0).unwrap();
    session.toggle_equipment(stand, 1).unwrap();
    assert_eq!(
        session.toggle_equipment(stand, 2).unwrap(),
        Some(ToggleOutcome::CapReached)
    );
}

#[test]
fn non_finite_coordinates_are_rejected() {
    let mut session = open(MemoryStore::new());
    let stand = session.add_stand().unwrap();
    let err = session.add_shot(stand, f64::NAN, 0.0).unwrap_err();
    assert!(matches!(err, SessionError::NonFiniteCoordinate));
}

#[test]
fn failed_flush_rolls_back_in_memory_state() {
    let mut session =
        SessionController::with_today(ReadOnlyDisk::default(), SessionConfig::default(), today());

    let err = session.add_stand().unwrap_err();
    assert!(matches!(err, SessionError::Store(_)));
    assert!(session.stands().is_empty());
    assert!(session.records().is_empty());

    let err = session.register_equipment("弓A", "bow").unwrap_err();
    assert!(matches!(err, SessionError::Store(_)));
    assert!(session.equipment().is_empty());
}

#[test]
fn stand_views_report_totals() {
    let mut session = open(MemoryStore::new());
    let first = session.add_stand().unwrap();
    let second = session.add_stand().unwrap();
    session.add_shot(first, 0.0, 0.0).unwrap();
    session.add_shot(first, 0.0, 19.0).unwrap();
    session.add_shot(second, 29.0, 0.0).unwrap();

    let views = session.stand_views();
    assert_eq!(views.len(), 2);
    assert_eq!((views[0].index, views[0].total_score, views[0].shot_count), (0, 19, 2));
    assert_eq!((views[1].index, views[1].total_score, views[1].shot_count), (1, 7, 1));
    assert_eq!(session.day_total(), 26);
}

#[test]
fn modes_and_dates_partition_records() {
    let mut session = open(MemoryStore::new());
    session.add_stand().unwrap();

    session.set_mode(Mode::Competition);
    assert!(session.stands().is_empty());

    session.set_mode(Mode::Practice);
    session.select_date(DateKey::parse("2024-03-10").unwrap());
    assert!(session.stands().is_empty());
}

#[test]
fn month_navigation_updates_calendar() {
    let mut session = open(MemoryStore::new());
    session.set_month(MonthCursor::new(2024, 0).unwrap());

    let previous = session.prev_month();
    assert_eq!((previous.year(), previous.month0()), (2023, 11));
    assert_eq!(session.calendar_view().grid.month(), previous);

    session.set_month(MonthCursor::new(2024, 11).unwrap());
    let next = session.next_month();
    assert_eq!((next.year(), next.month0()), (2025, 0));
}

#[test]
fn session_starts_on_today() {
    let session = open(MemoryStore::new());
    assert_eq!(session.selected_date().as_str(), "2024-03-09");
    assert_eq!(session.month(), MonthCursor::new(2024, 2).unwrap());
    assert_eq!(session.mode(), Mode::Practice);
    assert!(session.is_editable());
}
