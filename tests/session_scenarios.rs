use std::time::{Duration, Instant};

use keyexam::certificate::{CertificateRequest, check_eligibility};
use keyexam::engine::highlight::{CharStatus, highlight};
use keyexam::engine::metrics::{self, MetricsInput, QualificationCriteria};
use keyexam::engine::scan::Tally;
use keyexam::passage::builtin::BuiltinPassages;
use keyexam::passage::{Passage, PassageSource, load_passages};
use keyexam::session::presets::find_test;
use keyexam::session::state::{SessionState, TestSession};
use keyexam::session::test_config::TestConfiguration;
use keyexam::store::json_store::JsonStore;
use tempfile::TempDir;

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn session_for(text: &str, time_limit: u32) -> TestSession {
    let config = TestConfiguration::new("Scenario", time_limit, "general").with_criteria(25, 85);
    TestSession::new(config, vec![Passage::new("s", "Scenario", text)])
}

#[test]
fn exact_passage_scores_full_marks() {
    let t0 = Instant::now();
    let mut session = session_for("the quick fox", 300).with_auto_submit(false);
    session.start(t0);
    session.on_input("the quick fox ", t0 + secs(60));

    let tally = session.counters().tally;
    assert_eq!(tally.correct_chars, 14);
    let stats = session.stats();
    assert_eq!(stats.accuracy, 100);
    assert_eq!(stats.total_words, 3);
    assert_eq!(stats.correct_words, 3);
    assert_eq!(stats.gross_speed, stats.net_speed);
    assert_eq!(stats.gross_speed, 3);
}

#[test]
fn substitution_is_marked_in_place() {
    let marks = highlight("cat", "cot");
    let statuses: Vec<CharStatus> = marks.iter().map(|m| m.status).collect();
    assert_eq!(statuses, [CharStatus::Correct, CharStatus::Wrong, CharStatus::Correct]);
    let chars: String = marks.iter().map(|m| m.ch).collect();
    assert_eq!(chars, "cat");

    let t0 = Instant::now();
    let mut session = session_for("cat", 60);
    session.start(t0);
    session.on_input("cot", t0 + secs(2));
    assert_eq!(session.stats().accuracy, 67);
}

#[test]
fn under_a_minute_never_qualifies() {
    let criteria = QualificationCriteria {
        min_wpm: 25,
        min_accuracy: 85,
    };
    let input = MetricsInput {
        tally: Tally {
            total_chars: 164,
            correct_chars: 148,
            normal_mistakes: 16,
            ..Tally::default()
        },
        backspaces: 0,
        elapsed: secs(59),
    };
    let stats = metrics::compute(&input, Some(&criteria));
    assert_eq!(stats.gross_speed, 30);
    assert_eq!(stats.accuracy, 90);
    assert!(!stats.is_qualified);
}

#[test]
fn expiry_submits_exactly_once() {
    let t0 = Instant::now();
    let mut session = session_for("alpha beta gamma delta", 5);
    session.start(t0);
    session.on_input("alpha be", t0 + secs(1));

    for s in 1..=5 {
        session.pump(t0 + secs(s));
    }
    assert_eq!(session.state(), SessionState::Finished);
    assert_eq!(session.remaining_secs(), 0);

    let first = session.take_result().expect("result after expiry");
    assert!(first.timed_out);

    session.on_timer_tick(t0 + secs(6));
    session.pump(t0 + secs(30));
    assert!(session.take_result().is_none());
    assert_eq!(session.submissions(), 1);
}

#[test]
fn paused_session_ignores_input() {
    let t0 = Instant::now();
    let mut session = session_for("stay still please", 60);
    session.start(t0);
    session.on_input("stay st", t0 + secs(2));
    session.pause(t0 + secs(3));

    let counters = session.counters().clone();
    let stats = session.stats().clone();
    session.on_input("stay still please", t0 + secs(4));
    session.pump(t0 + secs(20));

    assert_eq!(session.counters(), &counters);
    assert_eq!(session.stats(), &stats);
    assert_eq!(session.state(), SessionState::Paused);
}

#[test]
fn restart_returns_to_fresh_idle() {
    let t0 = Instant::now();
    let mut session = session_for("one two three", 60);
    let reference = session.reference_words().to_vec();
    session.start(t0);
    session.on_input("one tw", t0 + secs(3));
    session.restart();

    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.counters().tally, Tally::default());
    assert_eq!(session.counters().backspace_count, 0);
    assert_eq!(session.counters().idle_seconds, 0);
    assert_eq!(session.reference_words(), reference.as_slice());
    assert!(session.typed_text().is_empty());
}

#[test]
fn builtin_passages_drive_a_preset_to_history_and_certificate() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let config = find_test("one minute sprint", &[]).unwrap();
    let passages = load_passages(&config, &[&BuiltinPassages]);
    assert!(!passages.is_empty());

    let mut last = None;
    for run in 0..3 {
        let t0 = Instant::now();
        let mut session = TestSession::new(config.clone(), passages.clone());
        session.start(t0);
        let text = session.reference_words().join(" ");
        session.on_input(&format!("{text} "), t0 + secs(20));
        // Finishing the passage early leaves submission to the typist.
        assert_eq!(session.state(), SessionState::Running);
        session.submit(t0 + secs(60));
        assert_eq!(session.state(), SessionState::Finished);
        let result = session.take_result().expect("finished session yields a result");
        let history = store.record(result.clone(), 100).unwrap();
        assert_eq!(history.completed_tests(), run + 1);
        last = Some(result);
    }

    let history = store.load_history();
    assert!(check_eligibility(&history).is_eligible());

    let result = last.unwrap();
    assert!(result.is_qualified());
    let request = CertificateRequest::from_result(&result, "Asha", "u-42").unwrap();
    assert_eq!(request.test_name, "One Minute Sprint");
}

#[test]
fn unknown_category_has_no_builtin_passages() {
    assert!(BuiltinPassages.fetch("astronomy").is_err());
    let config = TestConfiguration::new("Custom", 60, "astronomy");
    let mut session = TestSession::new(config.clone(), load_passages(&config, &[&BuiltinPassages]));
    session.start(Instant::now());
    assert_eq!(session.state(), SessionState::Idle);
}
