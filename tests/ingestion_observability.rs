use std::sync::{Arc, Mutex};

use tabular_explorer::ingestion::{
    Artifact, Dispatcher, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    ParserOptions,
};
use tabular_explorer::IngestionError;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<IngestionStats>>,
    failures: Mutex<Vec<IngestionSeverity>>,
    alerts: Mutex<Vec<IngestionSeverity>>,
}

impl IngestionObserver for RecordingObserver {
    fn on_success(&self, _ctx: &IngestionContext, stats: IngestionStats) {
        self.successes.lock().unwrap().push(stats);
    }

    fn on_failure(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &IngestionError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &IngestionError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn observed(threshold: IngestionSeverity) -> (Arc<RecordingObserver>, Dispatcher) {
    let obs = Arc::new(RecordingObserver::default());
    let dispatcher = Dispatcher::default()
        .with_observer(obs.clone())
        .with_alert_threshold(threshold);
    (obs, dispatcher)
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let (obs, dispatcher) = observed(IngestionSeverity::Critical);

    let out = dispatcher.load(
        &Artifact::path("tests/fixtures/does_not_exist.csv"),
        &ParserOptions::new(),
    );
    assert!(out.is_none());

    assert_eq!(*obs.failures.lock().unwrap(), vec![IngestionSeverity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![IngestionSeverity::Critical]);
}

#[test]
fn unsupported_extension_is_a_warning_below_default_threshold() {
    let (obs, dispatcher) = observed(IngestionSeverity::Critical);

    assert!(dispatcher
        .load(&Artifact::path("tests/fixtures/notes.txt"), &ParserOptions::new())
        .is_none());

    assert_eq!(*obs.failures.lock().unwrap(), vec![IngestionSeverity::Warning]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn invalid_argument_is_an_error_and_alerts_at_lower_threshold() {
    let (obs, dispatcher) = observed(IngestionSeverity::Error);

    let opts = ParserOptions::new().set("bogus", true);
    assert!(dispatcher
        .load(&Artifact::path("tests/fixtures/sales.csv"), &opts)
        .is_none());

    assert_eq!(*obs.failures.lock().unwrap(), vec![IngestionSeverity::Error]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![IngestionSeverity::Error]);
}

#[test]
fn success_reports_table_and_row_counts() {
    let (obs, dispatcher) = observed(IngestionSeverity::Critical);

    dispatcher
        .load(&Artifact::path("tests/fixtures/sales.csv"), &ParserOptions::new())
        .unwrap();

    assert_eq!(
        *obs.successes.lock().unwrap(),
        vec![IngestionStats { tables: 1, rows: 10 }]
    );
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn file_observer_appends_one_line_per_outcome() {
    let log = std::env::temp_dir().join(format!(
        "tabular-explorer-observer-{}.log",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&log);

    let dispatcher = Dispatcher::default().with_observer(Arc::new(FileObserver::new(&log)));
    dispatcher.load(&Artifact::path("tests/fixtures/sales.csv"), &ParserOptions::new());
    dispatcher.load(&Artifact::path("tests/fixtures/notes.txt"), &ParserOptions::new());

    let text = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains(" ok format=csv"));
    assert!(lines[1].contains("fail severity=Warning"));

    let _ = std::fs::remove_file(log);
}
