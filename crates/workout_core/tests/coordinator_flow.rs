use chrono::{Datelike, Local};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use workout_core::{
    Activity, ActivityKind, ActivityListSurface, ActivityRepository, ActivityService,
    ActivityView, Coordinates, EntryFormSurface, FormSubmission, GeolocationError,
    GeolocationSource, MapSurface, MemorySlotRepository, NewActivity, Notifier, PanOptions,
    PresentationCoordinator, RepoError, RepoResult, ServiceError, SlotRepository, SubmitError,
    Surfaces, ViewSettings, MONTH_NAMES, SAVE_ALERT,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    MapInit(Coordinates, u8),
    Marker(String, String),
    SetView(Coordinates, u8, PanOptions),
    ListEntry(String),
    FormShow,
    FormClearHide,
    FormKind(ActivityKind),
    Alert(String),
}

#[derive(Clone, Default)]
struct Recorder {
    calls: Rc<RefCell<Vec<Call>>>,
}

impl Recorder {
    fn push(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    fn surfaces(&self) -> Surfaces {
        Surfaces {
            map: Box::new(self.clone()),
            list: Box::new(self.clone()),
            form: Box::new(self.clone()),
            notifier: Box::new(self.clone()),
        }
    }
}

impl MapSurface for Recorder {
    fn initialize(&mut self, center: Coordinates, zoom_level: u8) {
        self.push(Call::MapInit(center, zoom_level));
    }

    fn add_marker(&mut self, activity: &ActivityView) {
        self.push(Call::Marker(activity.id.to_string(), activity.style_class()));
    }

    fn set_view(&mut self, center: Coordinates, zoom_level: u8, pan: PanOptions) {
        self.push(Call::SetView(center, zoom_level, pan));
    }
}

impl ActivityListSurface for Recorder {
    fn add_entry(&mut self, activity: &ActivityView) {
        self.push(Call::ListEntry(activity.id.to_string()));
    }
}

impl EntryFormSurface for Recorder {
    fn show(&mut self) {
        self.push(Call::FormShow);
    }

    fn clear_and_hide(&mut self) {
        self.push(Call::FormClearHide);
    }

    fn show_kind_fields(&mut self, kind: ActivityKind) {
        self.push(Call::FormKind(kind));
    }
}

impl Notifier for Recorder {
    fn alert(&mut self, message: &str) {
        self.push(Call::Alert(message.to_string()));
    }
}

struct FixedPosition(Result<Coordinates, GeolocationError>);

impl GeolocationSource for FixedPosition {
    fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.0.clone()
    }
}

/// Slot storage that records every write.
#[derive(Default)]
struct CountingSlots {
    inner: MemorySlotRepository,
    writes: RefCell<Vec<String>>,
}

impl SlotRepository for CountingSlots {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        self.inner.read_slot(key)
    }

    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        self.writes.borrow_mut().push(value.to_string());
        self.inner.write_slot(key, value)
    }

    fn remove_slot(&self, key: &str) -> RepoResult<bool> {
        self.inner.remove_slot(key)
    }
}

/// Slot storage whose writes fail while `failing` is set.
#[derive(Default)]
struct FlakySlots {
    inner: MemorySlotRepository,
    failing: Cell<bool>,
}

impl FlakySlots {
    fn failing() -> Self {
        let slots = Self::default();
        slots.failing.set(true);
        slots
    }
}

impl SlotRepository for FlakySlots {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        self.inner.read_slot(key)
    }

    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        if self.failing.get() {
            return Err(RepoError::InvalidData("storage is read-only".to_string()));
        }
        self.inner.write_slot(key, value)
    }

    fn remove_slot(&self, key: &str) -> RepoResult<bool> {
        self.inner.remove_slot(key)
    }
}

fn home() -> Coordinates {
    Coordinates::new(38.72, -9.14)
}

fn located() -> FixedPosition {
    FixedPosition(Ok(home()))
}

fn denied() -> FixedPosition {
    FixedPosition(Err(GeolocationError::PermissionDenied))
}

fn paced_form(distance: &str, duration: &str, cadence: &str) -> FormSubmission {
    FormSubmission {
        kind: "paced".to_string(),
        distance: distance.to_string(),
        duration: duration.to_string(),
        cadence: cadence.to_string(),
        elevation_gain: String::new(),
    }
}

fn coordinator<S: SlotRepository>(
    slots: S,
    recorder: &Recorder,
) -> PresentationCoordinator<S> {
    PresentationCoordinator::new(
        ActivityService::new(ActivityRepository::new(slots)),
        recorder.surfaces(),
        ViewSettings::default(),
    )
}

#[test]
fn end_to_end_paced_submission() {
    let slots = CountingSlots::default();
    let recorder = Recorder::default();
    let mut app = coordinator(&slots, &recorder);

    let summary = app.start(&located());
    assert!(summary.map_ready);
    assert_eq!(summary.restored, 0);
    assert_eq!(recorder.take(), vec![Call::MapInit(home(), 13)]);

    app.on_map_click(Coordinates::new(39.0, -12.0));
    let id = app
        .on_form_submitted(&paced_form("5.2", "24", "178"))
        .unwrap();

    let activity = app.service().find_by_id(id.as_str()).unwrap();
    assert!((activity.pace_min_per_km().unwrap() - 4.615).abs() < 1e-3);
    assert_eq!(activity.coordinates(), Coordinates::new(39.0, -12.0));
    let today = Local::now();
    let expected = format!(
        "Paced on {} {}",
        MONTH_NAMES[today.month0() as usize],
        today.day()
    );
    assert_eq!(activity.label(), expected);
    assert_eq!(app.service().len(), 1);

    let writes = slots.writes.borrow();
    assert_eq!(writes.len(), 1);
    let payload: serde_json::Value = serde_json::from_str(&writes[0]).unwrap();
    assert_eq!(payload.as_array().unwrap().len(), 1);

    assert_eq!(
        recorder.take(),
        vec![
            Call::FormShow,
            Call::Marker(id.to_string(), "paced-popup".to_string()),
            Call::ListEntry(id.to_string()),
            Call::FormClearHide,
        ]
    );
}

#[test]
fn startup_renders_restored_activities_in_order() {
    let slots = MemorySlotRepository::new();
    let stored = vec![
        Activity::paced(Coordinates::new(1.0, 1.0), 5.0, 25.0, 170.0).unwrap(),
        Activity::elevation(Coordinates::new(2.0, 2.0), 20.0, 60.0, 300.0).unwrap(),
    ];
    ActivityRepository::new(&slots).save(&stored).unwrap();
    let ids: Vec<String> = stored.iter().map(|a| a.id().to_string()).collect();

    let recorder = Recorder::default();
    let mut app = coordinator(&slots, &recorder);
    let summary = app.start(&located());

    assert_eq!(summary.restored, 2);
    assert!(!summary.load_failed);
    assert_eq!(
        recorder.take(),
        vec![
            Call::MapInit(home(), 13),
            Call::Marker(ids[0].clone(), "paced-popup".to_string()),
            Call::ListEntry(ids[0].clone()),
            Call::Marker(ids[1].clone(), "elevation-popup".to_string()),
            Call::ListEntry(ids[1].clone()),
        ]
    );
}

#[test]
fn geolocation_failure_alerts_and_blocks_creation() {
    let slots = MemorySlotRepository::new();
    ActivityRepository::new(&slots)
        .save(&[Activity::paced(Coordinates::new(1.0, 1.0), 5.0, 25.0, 170.0).unwrap()])
        .unwrap();

    let recorder = Recorder::default();
    let mut app = coordinator(&slots, &recorder);
    let summary = app.start(&denied());

    assert!(!summary.map_ready);
    let calls = recorder.take();
    assert_eq!(calls[0], Call::Alert("Could not get your position".to_string()));
    assert!(matches!(calls[1], Call::ListEntry(_)));
    assert_eq!(calls.len(), 2);

    app.on_map_click(Coordinates::new(39.0, -12.0));
    let err = app
        .on_form_submitted(&paced_form("5", "20", "170"))
        .unwrap_err();
    assert!(matches!(err, SubmitError::CreationBlocked));
    assert_eq!(app.service().len(), 1);
    assert!(recorder.take().is_empty());
}

#[test]
fn retry_geolocation_renders_markers_for_existing_activities() {
    let slots = MemorySlotRepository::new();
    let stored = Activity::paced(Coordinates::new(1.0, 1.0), 5.0, 25.0, 170.0).unwrap();
    ActivityRepository::new(&slots)
        .save(std::slice::from_ref(&stored))
        .unwrap();

    let recorder = Recorder::default();
    let mut app = coordinator(&slots, &recorder);
    app.start(&denied());
    recorder.take();

    assert!(app.retry_geolocation(&located()));
    assert_eq!(
        recorder.take(),
        vec![
            Call::MapInit(home(), 13),
            Call::Marker(stored.id().to_string(), "paced-popup".to_string()),
        ]
    );
    assert!(app.retry_geolocation(&located()));
    assert!(recorder.take().is_empty());
}

#[test]
fn invalid_submission_alerts_and_changes_nothing() {
    let slots = CountingSlots::default();
    let recorder = Recorder::default();
    let mut app = coordinator(&slots, &recorder);
    app.start(&located());
    app.on_map_click(home());
    recorder.take();

    for form in [
        paced_form("0", "24", "178"),
        paced_form("abc", "24", "178"),
        paced_form("5", "", "178"),
        paced_form("5", "24", "-3"),
    ] {
        let err = app.on_form_submitted(&form).unwrap_err();
        assert!(matches!(err, SubmitError::Validation(_)));
    }

    assert_eq!(app.service().len(), 0);
    assert!(slots.writes.borrow().is_empty());
    let alerts = recorder.take();
    assert_eq!(alerts.len(), 4);
    assert!(alerts
        .iter()
        .all(|call| *call == Call::Alert("Inputs have to be positive numbers!".to_string())));
}

#[test]
fn elevation_submission_accepts_negative_gain() {
    let recorder = Recorder::default();
    let mut app = coordinator(MemorySlotRepository::new(), &recorder);
    app.start(&located());
    app.on_map_click(home());

    let submission = FormSubmission {
        kind: "elevation".to_string(),
        distance: "10".to_string(),
        duration: "30".to_string(),
        cadence: String::new(),
        elevation_gain: "-25".to_string(),
    };
    let id = app.on_form_submitted(&submission).unwrap();

    let activity = app.service().find_by_id(id.as_str()).unwrap();
    assert_eq!(activity.kind(), ActivityKind::Elevation);
    assert_eq!(activity.speed_km_per_h(), Some(20.0));
}

#[test]
fn submit_consumes_the_map_click() {
    let recorder = Recorder::default();
    let mut app = coordinator(MemorySlotRepository::new(), &recorder);
    app.start(&located());
    app.on_map_click(home());
    app.on_form_submitted(&paced_form("5", "25", "170")).unwrap();

    let err = app
        .on_form_submitted(&paced_form("5", "25", "170"))
        .unwrap_err();
    assert!(matches!(err, SubmitError::CreationBlocked));
    assert_eq!(app.service().len(), 1);
}

#[test]
fn list_selection_recenters_and_counts_interactions() {
    let recorder = Recorder::default();
    let mut app = coordinator(MemorySlotRepository::new(), &recorder);
    app.start(&located());
    let spot = Coordinates::new(39.0, -12.0);
    app.on_map_click(spot);
    let id = app
        .on_form_submitted(&paced_form("5", "25", "170"))
        .unwrap();
    recorder.take();

    assert!(app.on_list_item_selected(id.as_str()));
    assert_eq!(
        recorder.take(),
        vec![Call::SetView(
            spot,
            13,
            PanOptions {
                animate: true,
                duration_secs: 1.0,
            },
        )]
    );
    assert_eq!(
        app.service().find_by_id(id.as_str()).unwrap().interaction_count(),
        1
    );

    assert!(!app.on_list_item_selected("stale-id"));
    assert!(recorder.take().is_empty());
}

#[test]
fn list_selection_before_map_ready_is_dropped() {
    let slots = MemorySlotRepository::new();
    let stored = Activity::paced(Coordinates::new(1.0, 1.0), 5.0, 25.0, 170.0).unwrap();
    ActivityRepository::new(&slots)
        .save(std::slice::from_ref(&stored))
        .unwrap();

    let recorder = Recorder::default();
    let mut app = coordinator(&slots, &recorder);
    app.start(&denied());
    recorder.take();

    assert!(!app.on_list_item_selected(stored.id().as_str()));
    assert!(recorder.take().is_empty());
    assert_eq!(
        app.service()
            .find_by_id(stored.id().as_str())
            .unwrap()
            .interaction_count(),
        0
    );
}

#[test]
fn kind_toggle_is_forwarded_to_the_form() {
    let recorder = Recorder::default();
    let mut app = coordinator(MemorySlotRepository::new(), &recorder);

    app.on_kind_toggled(ActivityKind::Elevation);
    app.on_kind_toggled(ActivityKind::Paced);

    assert_eq!(
        recorder.take(),
        vec![
            Call::FormKind(ActivityKind::Elevation),
            Call::FormKind(ActivityKind::Paced),
        ]
    );
}

#[test]
fn unreadable_stored_data_starts_an_empty_session() {
    let slots = MemorySlotRepository::new();
    slots.write_slot("workouts", "not json").unwrap();

    let recorder = Recorder::default();
    let mut app = coordinator(&slots, &recorder);
    let summary = app.start(&located());

    assert!(summary.load_failed);
    assert_eq!(summary.restored, 0);
    assert_eq!(
        slots.read_slot("workouts").unwrap().as_deref(),
        Some("not json")
    );
}

#[test]
fn reset_all_clears_memory_and_storage() {
    let slots = MemorySlotRepository::new();
    let recorder = Recorder::default();
    let mut app = coordinator(&slots, &recorder);
    app.start(&located());
    app.on_map_click(home());
    app.on_form_submitted(&paced_form("5", "25", "170")).unwrap();

    app.reset_all().unwrap();

    assert!(app.service().is_empty());
    assert_eq!(slots.read_slot("workouts").unwrap(), None);
}

#[test]
fn service_create_rolls_back_when_save_fails() {
    let slots = FlakySlots::default();
    let mut service = ActivityService::new(ActivityRepository::new(&slots));
    service
        .create(NewActivity::paced(home(), 5.0, 25.0, 170.0))
        .unwrap();

    slots.failing.set(true);
    let err = service
        .create(NewActivity::elevation(home(), 20.0, 60.0, 300.0))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Persistence(_)));
    assert_eq!(service.len(), 1);
    assert_eq!(service.activities()[0].kind(), ActivityKind::Paced);
    assert_eq!(service.repository().load().unwrap().len(), 1);
}

#[test]
fn failed_save_alerts_and_keeps_the_map_click() {
    let slots = FlakySlots::failing();
    let recorder = Recorder::default();
    let mut app = coordinator(&slots, &recorder);
    app.start(&located());
    app.on_map_click(Coordinates::new(39.0, -12.0));
    recorder.take();

    let err = app
        .on_form_submitted(&paced_form("5.2", "24", "178"))
        .unwrap_err();
    assert!(matches!(err, SubmitError::Persistence(_)));
    assert_eq!(app.service().len(), 0);
    assert_eq!(app.pending_click(), Some(Coordinates::new(39.0, -12.0)));
    assert_eq!(recorder.take(), vec![Call::Alert(SAVE_ALERT.to_string())]);

    slots.failing.set(false);
    let id = app
        .on_form_submitted(&paced_form("5.2", "24", "178"))
        .unwrap();
    assert_eq!(app.service().len(), 1);
    assert_eq!(app.pending_click(), None);
    assert_eq!(
        recorder.take(),
        vec![
            Call::Marker(id.to_string(), "paced-popup".to_string()),
            Call::ListEntry(id.to_string()),
            Call::FormClearHide,
        ]
    );
}
