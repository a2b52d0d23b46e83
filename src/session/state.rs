use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::debug;

use crate::engine::highlight::{WordView, passage_view};
use crate::engine::metrics::{self, MIN_TEST_SECONDS, MetricsInput, TypingStats};
use crate::engine::normalize::normalize;
use crate::engine::scan::{self, Tally};
use crate::engine::words::split_words;
use crate::passage::Passage;
use crate::session::result::TestResult;
use crate::session::test_config::TestConfiguration;
use crate::session::timer::Interval;

/// Time without a keypress after which each idle check counts a second.
pub const IDLE_THRESHOLD: Duration = Duration::from_secs(10);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Mutable per-run bookkeeping. Zeroed on every start and restart.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Counters {
    pub tally: Tally,
    pub backspace_count: usize,
    pub idle_seconds: u32,
    pub last_keypress: Option<Instant>,
    pub started_at: Option<Instant>,
    pub remaining_secs: u32,
}

/// One typing test: passage selection, countdown, idle tracking and live
/// scoring.
///
/// All operations take the current instant from the caller. Operations
/// called in the wrong state are ignored.
pub struct TestSession {
    config: TestConfiguration,
    passages: Vec<Passage>,
    selected: usize,
    reference: Vec<String>,
    state: SessionState,
    typed: String,
    counters: Counters,
    stats: TypingStats,
    countdown: Interval,
    idle_check: Interval,
    paused_at: Option<Instant>,
    paused_total: Duration,
    finished_at: Option<Instant>,
    timed_out: bool,
    idle_threshold: Duration,
    auto_submit: bool,
    pending_result: Option<TestResult>,
    submissions: u32,
}

impl TestSession {
    pub fn new(config: TestConfiguration, passages: Vec<Passage>) -> Self {
        let passages = match config.custom_passage.as_deref() {
            Some(text) if config.has_custom_passage() => vec![Passage::custom(text)],
            _ => passages,
        };

        let mut session = Self {
            config,
            passages,
            selected: 0,
            reference: Vec::new(),
            state: SessionState::Idle,
            typed: String::new(),
            counters: Counters::default(),
            stats: TypingStats::default(),
            countdown: Interval::every_second(),
            idle_check: Interval::every_second(),
            paused_at: None,
            paused_total: Duration::ZERO,
            finished_at: None,
            timed_out: false,
            idle_threshold: IDLE_THRESHOLD,
            auto_submit: false,
            pending_result: None,
            submissions: 0,
        };
        session.reset();
        session
    }

    pub fn with_idle_threshold(mut self, threshold: Duration) -> Self {
        self.idle_threshold = threshold;
        self
    }

    /// Submit once the final passage word is typed, but never before the
    /// minimum qualifying duration has run.
    pub fn with_auto_submit(mut self, enabled: bool) -> Self {
        self.auto_submit = enabled;
        self
    }

    pub fn config(&self) -> &TestConfiguration {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn passage(&self) -> Option<&Passage> {
        self.passages.get(self.selected)
    }

    pub fn reference_words(&self) -> &[String] {
        &self.reference
    }

    pub fn typed_text(&self) -> &str {
        &self.typed
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn stats(&self) -> &TypingStats {
        &self.stats
    }

    pub fn remaining_secs(&self) -> u32 {
        self.counters.remaining_secs
    }

    /// Number of times this session has been submitted.
    pub fn submissions(&self) -> u32 {
        self.submissions
    }

    /// Frozen stats, only once the session has finished.
    pub fn final_stats(&self) -> Option<&TypingStats> {
        (self.state == SessionState::Finished).then_some(&self.stats)
    }

    pub fn is_qualified(&self) -> Option<bool> {
        self.final_stats().map(|s| s.is_qualified)
    }

    pub fn can_start(&self) -> bool {
        self.state == SessionState::Idle && !self.reference.is_empty()
    }

    /// Renderable highlight model of the passage against the typed text.
    pub fn view(&self) -> Vec<WordView> {
        passage_view(&self.reference, &self.typed)
    }

    /// Replace the candidate passages, e.g. once a fetch completes. Ignored
    /// mid-test and when the test uses a custom passage.
    pub fn set_passages(&mut self, passages: Vec<Passage>) {
        if self.in_progress() || self.config.has_custom_passage() {
            return;
        }
        self.passages = passages;
        self.selected = 0;
        self.reset();
    }

    /// Change the selected passage. Only allowed before a test starts or
    /// after it finished; resets the session to Idle.
    pub fn select_passage(&mut self, idx: usize) -> bool {
        if self.in_progress() || idx >= self.passages.len() {
            return false;
        }
        self.selected = idx;
        self.reset();
        true
    }

    pub fn next_passage(&mut self) -> bool {
        if self.passages.is_empty() {
            return false;
        }
        self.select_passage((self.selected + 1) % self.passages.len())
    }

    pub fn start(&mut self, now: Instant) {
        if !self.can_start() {
            return;
        }
        self.clear_run();
        self.counters.started_at = Some(now);
        self.counters.last_keypress = Some(now);
        self.counters.remaining_secs = self.config.time_limit;
        self.countdown.arm(now);
        self.idle_check.arm(now);
        self.state = SessionState::Running;
        self.refresh_stats(now);
        debug!(test = %self.config.test_name, words = self.reference.len(), "test started");
    }

    pub fn pause(&mut self, now: Instant) {
        if self.state != SessionState::Running {
            return;
        }
        self.cancel_timers();
        self.paused_at = Some(now);
        self.state = SessionState::Paused;
        debug!(remaining = self.counters.remaining_secs, "test paused");
    }

    pub fn resume(&mut self, now: Instant) {
        if self.state != SessionState::Paused {
            return;
        }
        if let Some(paused_at) = self.paused_at.take() {
            let paused_for = now.saturating_duration_since(paused_at);
            self.paused_total += paused_for;
            // Paused time must not count towards idle time.
            self.counters.last_keypress = self.counters.last_keypress.map(|t| t + paused_for);
        }
        self.countdown.arm(now);
        self.idle_check.arm(now);
        self.state = SessionState::Running;
        debug!(remaining = self.counters.remaining_secs, "test resumed");
    }

    pub fn toggle_pause(&mut self, now: Instant) {
        match self.state {
            SessionState::Running => self.pause(now),
            SessionState::Paused => self.resume(now),
            _ => {}
        }
    }

    /// Back to Idle from any state with a fresh copy of the selected passage.
    pub fn restart(&mut self) {
        self.reset();
        debug!(test = %self.config.test_name, "test restarted");
    }

    /// Freeze the stats and finish. Returns false unless Running.
    pub fn submit(&mut self, now: Instant) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        self.cancel_timers();
        self.finished_at = Some(now);

        self.counters.tally = scan::scan(&self.reference, &self.typed, true);
        let input = self.metrics_input(now);
        self.stats = metrics::compute(&input, Some(&self.config.qualification_criteria));
        self.state = SessionState::Finished;
        self.submissions += 1;

        let result = TestResult {
            test_name: self.config.test_name.clone(),
            passage_title: self.passage().map(|p| p.title.clone()).unwrap_or_default(),
            stats: self.stats.clone(),
            criteria: self.config.qualification_criteria,
            time_limit: self.config.time_limit,
            idle_secs: self.counters.idle_seconds,
            timed_out: self.timed_out,
            finished_at: Utc::now(),
        };
        debug!(summary = %result.summary(), "test submitted");
        self.pending_result = Some(result);
        true
    }

    /// The frozen result of the last submission, yielded once.
    pub fn take_result(&mut self) -> Option<TestResult> {
        self.pending_result.take()
    }

    /// Replace the typed text and rescore it in full.
    pub fn on_input(&mut self, raw_text: &str, now: Instant) {
        if self.state != SessionState::Running {
            return;
        }
        let text = normalize(raw_text);
        if text.chars().count() < self.typed.chars().count() {
            self.counters.backspace_count += 1;
        }
        self.typed = text;
        self.counters.tally = scan::scan(&self.reference, &self.typed, false);
        self.counters.last_keypress = Some(now);
        self.refresh_stats(now);

        self.maybe_auto_submit(now);
    }

    pub fn type_char(&mut self, ch: char, now: Instant) {
        if self.state != SessionState::Running {
            return;
        }
        let mut text = self.typed.clone();
        text.push(ch);
        self.on_input(&text, now);
    }

    pub fn backspace(&mut self, now: Instant) {
        if self.state != SessionState::Running || self.typed.is_empty() {
            return;
        }
        let mut text = self.typed.clone();
        text.pop();
        self.on_input(&text, now);
    }

    /// One countdown second. Submits when the clock reaches zero.
    pub fn on_timer_tick(&mut self, now: Instant) {
        if self.state != SessionState::Running {
            return;
        }
        self.counters.remaining_secs = self.counters.remaining_secs.saturating_sub(1);
        self.refresh_stats(now);
        if self.counters.remaining_secs == 0 {
            self.timed_out = true;
            self.submit(now);
        } else {
            self.maybe_auto_submit(now);
        }
    }

    /// One idle-check second. Only feeds the idle counter.
    pub fn on_idle_check(&mut self, now: Instant) {
        if self.state != SessionState::Running {
            return;
        }
        let idle = self
            .counters
            .last_keypress
            .is_some_and(|last| now.saturating_duration_since(last) > self.idle_threshold);
        if idle {
            self.counters.idle_seconds += 1;
        }
    }

    /// Fire every due countdown and idle-check period in due order, each at
    /// the instant it was due. On a tie the idle check goes first.
    pub fn pump(&mut self, now: Instant) {
        loop {
            let countdown = self.countdown.next_due().filter(|due| *due <= now);
            let idle = self.idle_check.next_due().filter(|due| *due <= now);
            match (countdown, idle) {
                (Some(tick), Some(check)) if check <= tick => {
                    self.idle_check.poll(now);
                    self.on_idle_check(check);
                }
                (Some(tick), _) => {
                    self.countdown.poll(now);
                    self.on_timer_tick(tick);
                }
                (None, Some(check)) => {
                    self.idle_check.poll(now);
                    self.on_idle_check(check);
                }
                (None, None) => break,
            }
        }
    }

    /// Active test time, excluding pauses.
    pub fn elapsed(&self, now: Instant) -> Duration {
        let Some(started) = self.counters.started_at else {
            return Duration::ZERO;
        };
        let end = self.finished_at.or(self.paused_at).unwrap_or(now);
        end.saturating_duration_since(started)
            .saturating_sub(self.paused_total)
    }

    /// Fraction of reference words committed so far.
    pub fn progress(&self) -> f64 {
        if self.reference.is_empty() {
            return 0.0;
        }
        (self.counters.tally.completed_words() as f64 / self.reference.len() as f64).min(1.0)
    }

    fn in_progress(&self) -> bool {
        matches!(self.state, SessionState::Running | SessionState::Paused)
    }

    fn passage_complete(&self) -> bool {
        let Some(last_expected) = self.reference.last() else {
            return false;
        };
        let typed = split_words(&self.typed);
        match typed.len().cmp(&self.reference.len()) {
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Equal => {
                self.typed.ends_with(char::is_whitespace)
                    || typed.last() == Some(&last_expected.as_str())
            }
        }
    }

    fn maybe_auto_submit(&mut self, now: Instant) {
        let long_enough = self.elapsed(now).as_secs_f64() >= MIN_TEST_SECONDS;
        if self.auto_submit && long_enough && self.passage_complete() {
            self.submit(now);
        }
    }

    fn metrics_input(&self, now: Instant) -> MetricsInput {
        MetricsInput {
            tally: self.counters.tally,
            backspaces: self.counters.backspace_count,
            elapsed: self.elapsed(now),
        }
    }

    fn refresh_stats(&mut self, now: Instant) {
        self.stats = metrics::compute(&self.metrics_input(now), None);
    }

    fn cancel_timers(&mut self) {
        self.countdown.cancel();
        self.idle_check.cancel();
    }

    fn clear_run(&mut self) {
        self.cancel_timers();
        self.typed.clear();
        self.counters = Counters {
            remaining_secs: self.config.time_limit,
            ..Counters::default()
        };
        self.stats = TypingStats::default();
        self.paused_at = None;
        self.paused_total = Duration::ZERO;
        self.finished_at = None;
        self.timed_out = false;
        self.pending_result = None;
    }

    fn reset(&mut self) {
        self.clear_run();
        self.reference = self
            .passage()
            .map(|p| {
                split_words(&normalize(&p.content))
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        self.state = SessionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn session(text: &str, time_limit: u32) -> TestSession {
        let config = TestConfiguration::new("Unit", time_limit, "general").with_criteria(25, 85);
        TestSession::new(config, vec![Passage::new("1", "P", text)])
    }

    #[test]
    fn test_new_session_is_idle() {
        let s = session("the quick fox", 60);
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.reference_words(), ["the", "quick", "fox"]);
        assert_eq!(s.remaining_secs(), 60);
        assert!(s.typed_text().is_empty());
    }

    #[test]
    fn test_start_without_passage_is_ignored() {
        let config = TestConfiguration::new("Unit", 60, "general");
        let mut s = TestSession::new(config, Vec::new());
        s.start(Instant::now());
        assert_eq!(s.state(), SessionState::Idle);

        let config = TestConfiguration::new("Unit", 60, "general");
        let mut s = TestSession::new(config, vec![Passage::new("1", "Blank", "  \n ")]);
        s.start(Instant::now());
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn test_input_before_start_is_ignored() {
        let mut s = session("abc", 60);
        s.on_input("abc", Instant::now());
        assert!(s.typed_text().is_empty());
        assert_eq!(s.counters(), &Counters { remaining_secs: 60, ..Counters::default() });
    }

    #[test]
    fn test_start_twice_keeps_first_start() {
        let t0 = Instant::now();
        let mut s = session("abc", 60);
        s.start(t0);
        s.on_input("ab", t0 + secs(1));
        s.start(t0 + secs(2));
        assert_eq!(s.typed_text(), "ab");
        assert_eq!(s.counters().started_at, Some(t0));
    }

    #[test]
    fn test_exact_passage_after_a_minute() {
        let t0 = Instant::now();
        let mut s = session("the quick fox", 120).with_auto_submit(false);
        s.start(t0);
        s.on_input("the quick fox ", t0 + secs(60));
        let stats = s.stats();
        assert_eq!(s.counters().tally.correct_chars, 14);
        assert_eq!(stats.accuracy, 100);
        assert_eq!(stats.total_words, 3);
        assert_eq!(stats.correct_words, 3);
        assert_eq!(stats.gross_speed, 3);
        assert_eq!(stats.net_speed, 3);
    }

    #[test]
    fn test_substitution_accuracy() {
        let t0 = Instant::now();
        let mut s = session("cat", 60);
        s.start(t0);
        s.on_input("cot", t0 + secs(5));
        assert_eq!(s.stats().accuracy, 67);
        assert_eq!(s.state(), SessionState::Running);
    }

    #[test]
    fn test_curly_quotes_match_straight_input() {
        let t0 = Instant::now();
        let mut s = session("it\u{2019}s \u{201C}ok\u{201D}", 60).with_auto_submit(false);
        s.start(t0);
        s.on_input("it's \"ok\" ", t0 + secs(3));
        assert_eq!(s.stats().accuracy, 100);
        assert_eq!(s.stats().correct_words, 2);
    }

    #[test]
    fn test_backspace_counted_and_rescored() {
        let t0 = Instant::now();
        let mut s = session("abc def", 60);
        s.start(t0);
        s.type_char('a', t0);
        s.type_char('x', t0);
        assert_eq!(s.counters().tally.normal_mistakes, 1);
        s.backspace(t0);
        s.type_char('b', t0);
        assert_eq!(s.counters().backspace_count, 1);
        assert_eq!(s.counters().tally.normal_mistakes, 0);
        assert_eq!(s.stats().backspaces, 1);
    }

    #[test]
    fn test_countdown_expiry_submits_once() {
        let t0 = Instant::now();
        let mut s = session("some words to type here", 3);
        s.start(t0);
        s.on_input("some wor", t0 + secs(1));
        s.pump(t0 + secs(3));
        assert_eq!(s.state(), SessionState::Finished);
        assert_eq!(s.remaining_secs(), 0);
        assert_eq!(s.submissions(), 1);

        let result = s.take_result().unwrap();
        assert!(result.timed_out);
        assert!(s.take_result().is_none());

        s.on_timer_tick(t0 + secs(4));
        s.pump(t0 + secs(10));
        assert_eq!(s.submissions(), 1);
        assert_eq!(s.remaining_secs(), 0);
    }

    #[test]
    fn test_remaining_only_decreases_while_running() {
        let t0 = Instant::now();
        let mut s = session("a b c", 10);
        s.start(t0);
        let mut last = s.remaining_secs();
        for i in 1..=5 {
            s.pump(t0 + secs(i));
            assert!(s.remaining_secs() <= last);
            last = s.remaining_secs();
        }
        assert_eq!(last, 5);
    }

    #[test]
    fn test_paused_input_rejected() {
        let t0 = Instant::now();
        let mut s = session("hello world", 60);
        s.start(t0);
        s.on_input("hel", t0 + secs(1));
        s.pause(t0 + secs(2));
        let counters = s.counters().clone();
        let stats = s.stats().clone();

        s.on_input("hello wor", t0 + secs(3));
        s.type_char('x', t0 + secs(3));
        s.backspace(t0 + secs(3));

        assert_eq!(s.counters(), &counters);
        assert_eq!(s.stats(), &stats);
        assert_eq!(s.typed_text(), "hel");
    }

    #[test]
    fn test_pause_suspends_countdown_and_elapsed() {
        let t0 = Instant::now();
        let mut s = session("a b c", 30);
        s.start(t0);
        s.pump(t0 + secs(2));
        assert_eq!(s.remaining_secs(), 28);

        s.pause(t0 + secs(2));
        s.pump(t0 + secs(20));
        assert_eq!(s.remaining_secs(), 28);

        s.resume(t0 + secs(20));
        assert_eq!(s.elapsed(t0 + secs(21)), secs(3));
        s.pump(t0 + secs(21));
        assert_eq!(s.remaining_secs(), 27);
    }

    #[test]
    fn test_idle_seconds_accumulate_after_threshold() {
        let t0 = Instant::now();
        let mut s = session("a b c", 60);
        s.start(t0);
        for i in 1..=13 {
            s.pump(t0 + secs(i));
        }
        // Seconds 11, 12 and 13 exceed the 10 s threshold.
        assert_eq!(s.counters().idle_seconds, 3);
        // Idle time does not pause the countdown.
        assert_eq!(s.remaining_secs(), 47);
    }

    #[test]
    fn test_keypress_resets_idle_window() {
        let t0 = Instant::now();
        let mut s = session("a b c", 60);
        s.start(t0);
        s.pump(t0 + secs(9));
        s.on_input("a", t0 + secs(9));
        s.pump(t0 + secs(15));
        assert_eq!(s.counters().idle_seconds, 0);
    }

    #[test]
    fn test_pause_does_not_count_as_idle() {
        let t0 = Instant::now();
        let mut s = session("a b c", 60);
        s.start(t0);
        s.pause(t0 + secs(5));
        s.resume(t0 + secs(100));
        s.pump(t0 + secs(101));
        assert_eq!(s.counters().idle_seconds, 0);
    }

    #[test]
    fn test_restart_law() {
        let t0 = Instant::now();
        let mut s = session("the quick fox", 60);
        let reference = s.reference_words().to_vec();
        s.start(t0);
        s.on_input("teh quick", t0 + secs(4));
        s.pump(t0 + secs(15));
        assert_eq!(s.counters().idle_seconds, 1);
        s.restart();

        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.counters(), &Counters { remaining_secs: 60, ..Counters::default() });
        assert_eq!(s.stats(), &TypingStats::default());
        assert_eq!(s.reference_words(), reference.as_slice());
        assert!(s.typed_text().is_empty());

        s.pump(t0 + secs(30));
        assert_eq!(s.remaining_secs(), 60);
    }

    #[test]
    fn test_restart_from_finished_allows_new_start() {
        let t0 = Instant::now();
        let mut s = session("ab", 60);
        s.start(t0);
        assert!(s.submit(t0 + secs(1)));
        s.start(t0 + secs(2));
        assert_eq!(s.state(), SessionState::Finished);
        s.restart();
        s.start(t0 + secs(3));
        assert_eq!(s.state(), SessionState::Running);
    }

    #[test]
    fn test_submit_only_from_running() {
        let t0 = Instant::now();
        let mut s = session("ab", 60);
        assert!(!s.submit(t0));
        s.start(t0);
        s.pause(t0);
        assert!(!s.submit(t0));
        s.resume(t0);
        assert!(s.submit(t0));
        assert!(!s.submit(t0));
        assert_eq!(s.submissions(), 1);
    }

    #[test]
    fn test_submit_commits_trailing_word() {
        let t0 = Instant::now();
        let mut s = session("one two three", 60).with_auto_submit(false);
        s.start(t0);
        s.on_input("one two", t0 + secs(2));
        assert_eq!(s.stats().correct_words, 1);
        s.submit(t0 + secs(3));
        assert_eq!(s.final_stats().unwrap().correct_words, 2);
    }

    #[test]
    fn test_qualification_needs_full_minute() {
        let t0 = Instant::now();
        let text = "aaaa ".repeat(60);
        let mut s = session(&text, 300).with_auto_submit(false);
        s.start(t0);
        s.on_input(&"aaaa ".repeat(38), t0 + secs(59));
        assert!(!s.stats().is_qualified);
        assert_eq!(s.is_qualified(), None);
        s.submit(t0 + secs(59));
        assert_eq!(s.is_qualified(), Some(false));

        let mut s = session(&text, 300).with_auto_submit(false);
        s.start(t0);
        s.on_input(&"aaaa ".repeat(38), t0 + secs(60));
        s.submit(t0 + secs(60));
        assert_eq!(s.is_qualified(), Some(true));
    }

    #[test]
    fn test_auto_submit_on_last_word() {
        let t0 = Instant::now();
        let mut s = session("go now", 300).with_auto_submit(true);
        s.start(t0);
        s.on_input("go no", t0 + secs(61));
        assert_eq!(s.state(), SessionState::Running);
        s.on_input("go now", t0 + secs(62));
        assert_eq!(s.state(), SessionState::Finished);
        assert!(!s.take_result().unwrap().timed_out);
    }

    #[test]
    fn test_manual_submit_by_default() {
        let t0 = Instant::now();
        let mut s = session("go now", 300);
        s.start(t0);
        s.on_input("go now ", t0 + secs(90));
        assert_eq!(s.state(), SessionState::Running);
        s.pump(t0 + secs(120));
        assert_eq!(s.state(), SessionState::Running);
    }

    #[test]
    fn test_early_finish_waits_for_a_full_minute() {
        let t0 = Instant::now();
        let text = "aaaa ".repeat(60);
        let mut s = session(&text, 300).with_auto_submit(true);
        s.start(t0);
        s.on_input(&text, t0 + secs(30));
        assert_eq!(s.state(), SessionState::Running);

        for i in 1..=60 {
            s.pump(t0 + secs(i));
        }
        assert_eq!(s.state(), SessionState::Finished);
        let result = s.take_result().unwrap();
        assert!(!result.timed_out);
        assert!(result.is_qualified());
    }

    #[test]
    fn test_late_pump_keeps_idle_seconds_before_expiry() {
        let t0 = Instant::now();
        let mut s = session("a b c", 15);
        s.start(t0);
        s.pump(t0 + secs(40));
        assert_eq!(s.state(), SessionState::Finished);
        // Checks at 11..=15 s were due before the countdown reached zero.
        assert_eq!(s.counters().idle_seconds, 5);
    }

    #[test]
    fn test_select_passage_only_when_not_in_progress() {
        let t0 = Instant::now();
        let config = TestConfiguration::new("Unit", 60, "general");
        let mut s = TestSession::new(
            config,
            vec![Passage::new("1", "A", "alpha"), Passage::new("2", "B", "beta gamma")],
        );
        assert!(s.next_passage());
        assert_eq!(s.reference_words(), ["beta", "gamma"]);

        s.start(t0);
        assert!(!s.select_passage(0));
        assert_eq!(s.passage().unwrap().id, "2");
    }

    #[test]
    fn test_custom_passage_replaces_candidates() {
        let config = TestConfiguration::new("Unit", 60, "general").with_custom_passage("mine only");
        let mut s = TestSession::new(config, vec![Passage::new("1", "A", "alpha")]);
        assert_eq!(s.passages().len(), 1);
        assert_eq!(s.reference_words(), ["mine", "only"]);
        s.set_passages(vec![Passage::new("9", "Z", "zeta")]);
        assert_eq!(s.reference_words(), ["mine", "only"]);
    }

    #[test]
    fn test_word_counts_never_exceed_reference() {
        let t0 = Instant::now();
        let mut s = session("a b c", 60).with_auto_submit(false);
        s.start(t0);
        let typed = "a b c d e ";
        for end in 1..=typed.len() {
            s.on_input(&typed[..end], t0 + secs(1));
            let stats = s.stats();
            let typed_words = split_words(&typed[..end]).len();
            assert!(stats.correct_words + stats.incorrect_words <= typed_words);
        }
    }

    #[test]
    fn test_progress_tracks_completed_words() {
        let t0 = Instant::now();
        let mut s = session("a b c d", 60);
        s.start(t0);
        s.on_input("a b ", t0);
        assert!((s.progress() - 0.5).abs() < 1e-9);
    }
}
