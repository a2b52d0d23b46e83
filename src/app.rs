use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use tracing::{info, warn};

use crate::certificate::client::{request_certificate, save_certificate};
use crate::certificate::{
    Certificate, CertificateClient, Eligibility, HttpCertificateClient, check_eligibility,
};
use crate::config::Config;
use crate::passage::builtin::BuiltinPassages;
use crate::passage::cache::DiskCache;
use crate::passage::remote::HttpPassageSource;
use crate::passage::{Passage, PassageSource, load_passages};
use crate::session::result::TestResult;
use crate::session::state::{SessionState, TestSession};
use crate::session::test_config::TestConfiguration;
use crate::store::json_store::JsonStore;
use crate::store::schema::HistoryData;
use crate::ui::components::menu::Menu;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Test,
    Result,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Warning,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

/// Where downloaded certificates are written unless a path is given.
pub fn default_certificate_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::data_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("keyexam-certificates")
}

/// Command-line overrides applied to whichever preset is started.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub time_limit: Option<u32>,
    pub passage_text: Option<String>,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub tests: Vec<TestConfiguration>,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub session: Option<TestSession>,
    pub history: HistoryData,
    pub last_result: Option<TestResult>,
    pub last_certificate: Option<Certificate>,
    pub status: Option<StatusMessage>,
    pub overrides: Overrides,
    pub should_quit: bool,
    store: Option<JsonStore>,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, theme: Theme, store: Option<JsonStore>) -> Self {
        let theme: &'static Theme = Box::leak(Box::new(theme));
        let tests = config.all_tests();
        let mut menu = Menu::new(&tests, theme);
        if let Some(idx) = tests
            .iter()
            .position(|t| t.test_name.eq_ignore_ascii_case(&config.default_test))
        {
            menu.select(idx);
        }

        let history = store.as_ref().map(JsonStore::load_history).unwrap_or_default();

        Self {
            screen: AppScreen::Menu,
            config,
            tests,
            menu,
            theme,
            session: None,
            history,
            last_result: None,
            last_certificate: None,
            status: None,
            overrides: Overrides::default(),
            should_quit: false,
            store,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn eligibility(&self) -> Eligibility {
        check_eligibility(&self.history)
    }

    fn test_config(&self, idx: usize) -> Option<TestConfiguration> {
        let mut config = self.tests.get(idx)?.clone();
        if let Some(secs) = self.overrides.time_limit {
            config = config.with_time_limit(secs);
        }
        if let Some(text) = &self.overrides.passage_text {
            config = config.with_custom_passage(text);
        }
        Some(config)
    }

    fn fetch_passages(&self, config: &TestConfiguration) -> Vec<Passage> {
        let disk_cache = DiskCache::new("passages");
        let remote = (!self.config.offline).then(|| {
            let source = HttpPassageSource::new(&self.config.api_base_url);
            match disk_cache.clone() {
                Some(cache) => source.with_cache(cache),
                None => source,
            }
        });

        let mut sources: Vec<&dyn PassageSource> = Vec::new();
        if let Some(remote) = &remote {
            sources.push(remote);
        }
        if let Some(cache) = &disk_cache {
            sources.push(cache);
        }
        sources.push(&BuiltinPassages);

        load_passages(config, &sources)
    }

    /// Prepare the selected preset in Idle, ready for Enter.
    pub fn open_test(&mut self, idx: usize) {
        let Some(config) = self.test_config(idx) else {
            return;
        };
        let mut passages = self.fetch_passages(&config);
        passages.shuffle(&mut self.rng);

        let session = TestSession::new(config, passages)
            .with_idle_threshold(self.config.idle_threshold())
            .with_auto_submit(self.config.auto_submit_on_completion);

        self.status = if session.can_start() {
            None
        } else {
            Some(StatusMessage::error(
                "No passage available for this test. Check the connection or add a custom passage.",
            ))
        };
        info!(
            test = %session.config().test_name,
            passages = session.passages().len(),
            "test opened"
        );
        self.session = Some(session);
        self.menu.select(idx);
        self.screen = AppScreen::Test;
    }

    pub fn open_selected_test(&mut self) {
        self.open_test(self.menu.selected);
    }

    pub fn start(&mut self, now: Instant) {
        if let Some(session) = self.session.as_mut() {
            session.start(now);
            if session.state() == SessionState::Running {
                self.status = None;
            }
        }
    }

    pub fn type_char(&mut self, ch: char, now: Instant) {
        if let Some(session) = self.session.as_mut() {
            session.type_char(ch, now);
        }
        self.collect_result();
    }

    pub fn backspace(&mut self, now: Instant) {
        if let Some(session) = self.session.as_mut() {
            session.backspace(now);
        }
    }

    pub fn toggle_pause(&mut self, now: Instant) {
        if let Some(session) = self.session.as_mut() {
            session.toggle_pause(now);
        }
    }

    pub fn restart(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.restart();
        }
        self.status = None;
        self.screen = AppScreen::Test;
    }

    pub fn submit(&mut self, now: Instant) {
        if let Some(session) = self.session.as_mut() {
            session.submit(now);
        }
        self.collect_result();
    }

    pub fn next_passage(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.next_passage();
        }
    }

    pub fn tick(&mut self, now: Instant) {
        if let Some(session) = self.session.as_mut() {
            session.pump(now);
        }
        self.collect_result();
    }

    /// Persist a freshly finished result and show the result screen.
    fn collect_result(&mut self) {
        let Some(result) = self.session.as_mut().and_then(TestSession::take_result) else {
            return;
        };
        info!(summary = %result.summary(), "test finished");

        match &self.store {
            Some(store) => match store.record(result.clone(), self.config.history_limit) {
                Ok(history) => self.history = history,
                Err(err) => {
                    warn!(error = %err, "could not save result");
                    self.history.push(result.clone(), self.config.history_limit);
                    self.status = Some(StatusMessage::warning(format!("Result not saved: {err}")));
                }
            },
            None => self.history.push(result.clone(), self.config.history_limit),
        }

        self.last_result = Some(result);
        self.last_certificate = None;
        self.screen = AppScreen::Result;
    }

    pub fn request_certificate(&mut self) {
        let Some(result) = self.last_result.as_ref() else {
            return;
        };
        if self.config.offline {
            self.status = Some(StatusMessage::warning("Certificates need network access"));
            return;
        }
        let client = HttpCertificateClient::new(&self.config.api_base_url);
        let issued = request_certificate(
            &client,
            result,
            &self.history,
            &self.config.user_name,
            &self.config.user_id,
        );
        self.status = Some(match issued {
            Ok(cert) => {
                let message = format!(
                    "Certificate issued. Verification code: {}  [d] Download",
                    cert.verification_code
                );
                self.last_certificate = Some(cert);
                StatusMessage::info(message)
            }
            Err(err) => {
                warn!(error = %err, "certificate request failed");
                StatusMessage::error(format!("Certificate unavailable: {err}"))
            }
        });
    }

    /// Save the document of the certificate issued for the last result.
    pub fn download_certificate(&mut self) {
        let client = HttpCertificateClient::new(&self.config.api_base_url);
        self.download_certificate_with(&client, &default_certificate_dir());
    }

    fn download_certificate_with(&mut self, client: &dyn CertificateClient, dir: &Path) {
        let Some(cert) = self.last_certificate.as_ref() else {
            self.status = Some(StatusMessage::warning("Request a certificate first"));
            return;
        };
        self.status = Some(match save_certificate(client, &cert.id, dir) {
            Ok(path) => StatusMessage::info(format!("Certificate saved to {}", path.display())),
            Err(err) => {
                warn!(error = %err, "certificate download failed");
                StatusMessage::error(format!("Download failed: {err}"))
            }
        });
    }

    pub fn go_to_menu(&mut self) {
        self.session = None;
        self.status = None;
        self.screen = AppScreen::Menu;
    }
}
