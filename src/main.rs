use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use keyexam::app::{App, AppScreen, Overrides, StatusKind, default_certificate_dir};
use keyexam::certificate::client::save_certificate;
use keyexam::certificate::{CertificateClient, HttpCertificateClient};
use keyexam::config::Config;
use keyexam::event::{AppEvent, EventHandler};
use keyexam::session::state::SessionState;
use keyexam::store::json_store::JsonStore;
use keyexam::ui::components::dashboard::Dashboard;
use keyexam::ui::components::progress_bar::ProgressBar;
use keyexam::ui::components::stats_sidebar::{StatsSidebar, format_clock};
use keyexam::ui::components::typing_area::TypingArea;
use keyexam::ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use keyexam::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "keyexam", version, about = "Timed typing tests for exam practice")]
struct Cli {
    #[arg(short, long, help = "Open this test directly (see --list-tests)")]
    test: Option<String>,

    #[arg(long, value_name = "SECONDS", help = "Override the test time limit")]
    time: Option<u32>,

    #[arg(
        long,
        value_name = "PATH",
        help = "Type the contents of this file instead of fetched passages"
    )]
    passage_file: Option<PathBuf>,

    #[arg(long, help = "List available tests and exit")]
    list_tests: bool,

    #[arg(long, value_name = "CODE", help = "Verify a certificate code and exit")]
    verify: Option<String>,

    #[arg(long, value_name = "ID", help = "Download an issued certificate and exit")]
    download: Option<String>,

    #[arg(long, value_name = "DIR", requires = "download", help = "Directory for --download")]
    out: Option<PathBuf>,

    #[arg(long, value_name = "NAME", help = "Save the name printed on certificates")]
    user_name: Option<String>,

    #[arg(long, value_name = "ID", help = "Save the account id sent with certificate requests")]
    user_id: Option<String>,

    #[arg(long, help = "Never contact the passage or certificate service")]
    offline: bool,

    #[arg(long, help = "Theme name")]
    theme: Option<String>,
}

/// The terminal belongs to the TUI, so logs go to a file.
fn init_logging(filter: &str) -> Option<WorkerGuard> {
    let log_dir = dirs::data_dir()?.join("keyexam");
    fs::create_dir_all(&log_dir).ok()?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "keyexam.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|err| {
        eprintln!("Ignoring unreadable config ({err}); using defaults");
        Config::default()
    });
    config.validate();
    if cli.user_name.is_some() || cli.user_id.is_some() {
        if let Some(name) = &cli.user_name {
            config.user_name = name.trim().to_string();
        }
        if let Some(id) = &cli.user_id {
            config.user_id = id.trim().to_string();
        }
        config.save().context("saving user details")?;
        println!("Saved user details to {}", Config::config_path().display());
    }
    if cli.offline {
        config.offline = true;
    }
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }

    let _log_guard = init_logging(&config.log_filter);
    info!(version = env!("CARGO_PKG_VERSION"), offline = config.offline, "keyexam starting");

    if cli.list_tests {
        for test in config.all_tests() {
            let c = &test.qualification_criteria;
            println!(
                "{:<24} {:>5}s  {:<12} {} wpm / {}%",
                test.test_name, test.time_limit, test.passage_category, c.min_wpm, c.min_accuracy
            );
        }
        return Ok(());
    }

    if let Some(code) = &cli.verify {
        return verify_certificate(&config, code);
    }
    if let Some(id) = &cli.download {
        let dir = cli.out.clone().unwrap_or_else(default_certificate_dir);
        return download_certificate(&config, id, &dir);
    }

    let passage_text = match &cli.passage_file {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("reading passage file {}", path.display()))?,
        ),
        None => None,
    };
    if cli.time == Some(0) {
        bail!("--time must be at least 1 second");
    }

    let start_test = match &cli.test {
        Some(name) => {
            let Some(found) = config
                .all_tests()
                .iter()
                .position(|t| t.test_name.eq_ignore_ascii_case(name))
            else {
                bail!("unknown test `{name}`; try --list-tests");
            };
            Some(found)
        }
        None => None,
    };

    let theme = Theme::load(&config.theme).unwrap_or_default();
    let store = JsonStore::new()
        .inspect_err(|err| error!(error = %err, "history store unavailable"))
        .ok();

    let mut app = App::new(config, theme, store).with_overrides(Overrides {
        time_limit: cli.time,
        passage_text,
    });
    if let Some(idx) = start_test {
        app.open_test(idx);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(error = ?err, "terminal loop failed");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn verify_certificate(config: &Config, code: &str) -> Result<()> {
    if config.offline {
        bail!("certificate verification needs network access");
    }
    let client = HttpCertificateClient::new(&config.api_base_url);
    let verification = client.verify(code)?;
    if verification.valid {
        println!(
            "Valid certificate: {} - {} ({} wpm, {}% accuracy)",
            verification.user_name.as_deref().unwrap_or("unknown"),
            verification.test_name.as_deref().unwrap_or("unknown test"),
            verification.net_speed.unwrap_or_default(),
            verification.accuracy.unwrap_or_default(),
        );
    } else {
        println!("Certificate {code} is not valid");
    }
    Ok(())
}

fn download_certificate(config: &Config, id: &str, dir: &Path) -> Result<()> {
    if config.offline {
        bail!("certificate download needs network access");
    }
    let client = HttpCertificateClient::new(&config.api_base_url);
    let path = save_certificate(&client, id, dir)?;
    println!("Saved certificate {id} to {}", path.display());
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick | AppEvent::Resize => {}
        }
        // Continuous typing starves ticks, so the clock is pumped every turn.
        app.tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Test => handle_test_key(app, key, ctrl),
        AppScreen::Result => handle_result_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => app.open_selected_test(),
        KeyCode::Char(ch) => {
            if let Some(idx) = ch.to_digit(10).and_then(|d| (d as usize).checked_sub(1)) {
                if idx < app.tests.len() {
                    app.open_test(idx);
                }
            }
        }
        _ => {}
    }
}

fn handle_test_key(app: &mut App, key: KeyEvent, ctrl: bool) {
    let now = Instant::now();
    let state = app.session.as_ref().map(|s| s.state());

    if ctrl {
        match key.code {
            KeyCode::Char('p') => app.toggle_pause(now),
            KeyCode::Char('r') => app.restart(),
            KeyCode::Char('s') => app.submit(now),
            _ => {}
        }
        return;
    }

    match (key.code, state) {
        (KeyCode::Esc, _) => app.go_to_menu(),
        (KeyCode::Enter, Some(SessionState::Idle)) => app.start(now),
        (KeyCode::Tab, Some(SessionState::Idle)) => app.next_passage(),
        (KeyCode::Backspace, Some(SessionState::Running)) => app.backspace(now),
        (KeyCode::Enter, Some(SessionState::Running)) => app.type_char(' ', now),
        (KeyCode::Char(ch), Some(SessionState::Running)) => app.type_char(ch, now),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.restart(),
        KeyCode::Char('c') => app.request_certificate(),
        KeyCode::Char('d') => app.download_certificate(),
        KeyCode::Char('q') | KeyCode::Esc => app.go_to_menu(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Test => render_test(frame, app),
        AppScreen::Result => render_result(frame, app),
    }
}

fn render_status(app: &App) -> Option<Line<'static>> {
    let colors = &app.theme.colors;
    let status = app.status.as_ref()?;
    let color = match status.kind {
        StatusKind::Info => colors.success(),
        StatusKind::Warning => colors.warning(),
        StatusKind::Error => colors.error(),
    };
    Some(Line::from(Span::styled(
        format!(" {}", status.text),
        Style::default().fg(color),
    )))
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let eligibility = app.eligibility();
    let user = if app.config.user_name.is_empty() {
        "guest".to_string()
    } else {
        app.config.user_name.clone()
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " keyexam ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                " {user} | {} tests | best {} wpm | {}",
                app.history.completed_tests(),
                app.history.best_net_speed().unwrap_or(0),
                eligibility.message()
            ),
            Style::default().fg(colors.text_pending()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout[0]);

    let menu_area = centered_rect(60, 85, layout[1]);
    frame.render_widget(&app.menu, menu_area);

    let footer = render_status(app).unwrap_or_else(|| {
        Line::from(Span::styled(
            " [1-9/Enter] Open test  [j/k] Move  [q] Quit ",
            Style::default().fg(colors.text_pending()),
        ))
    });
    frame.render_widget(Paragraph::new(footer), layout[2]);
}

fn render_test(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let Some(session) = app.session.as_ref() else {
        return;
    };

    let app_layout = AppLayout::new(area);
    let stats = session.stats();
    let test_name = &session.config().test_name;

    let state_label = match session.state() {
        SessionState::Idle => "ready",
        SessionState::Running => "running",
        SessionState::Paused => "PAUSED",
        SessionState::Finished => "finished",
    };
    let header_text = if app_layout.tier.show_sidebar() {
        format!(" {test_name} | {state_label}")
    } else {
        format!(
            " {test_name} | {} | {} wpm | {}% | {state_label}",
            format_clock(session.remaining_secs()),
            stats.net_speed,
            stats.accuracy
        )
    };
    let header = Paragraph::new(Line::from(Span::styled(
        header_text,
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )))
    .block(Block::bordered().border_style(Style::default().fg(colors.border())))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, app_layout.header);

    let show_progress = app_layout.tier.show_progress_bar(area.height);
    let mut constraints = vec![Constraint::Min(5)];
    if show_progress {
        constraints.push(Constraint::Length(3));
    }
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(app_layout.main);

    let view = session.view();
    let title = session.passage().map(|p| p.title.as_str()).unwrap_or("No passage");
    let typing = TypingArea::new(&view, title, app.theme)
        .dimmed(session.state() == SessionState::Paused);
    frame.render_widget(typing, main_layout[0]);

    if show_progress {
        let done = session.counters().tally.completed_words();
        let progress = ProgressBar::new("Passage", session.progress(), app.theme)
            .caption(format!("{done}/{} words", session.reference_words().len()));
        frame.render_widget(progress, main_layout[1]);
    }

    if let Some(sidebar_area) = app_layout.sidebar {
        let sidebar = StatsSidebar::new(
            stats,
            &session.config().qualification_criteria,
            session.remaining_secs(),
            session.counters().idle_seconds,
            app.theme,
        )
        .last_result(app.last_result.as_ref());
        frame.render_widget(sidebar, sidebar_area);
    }

    let footer = match render_status(app) {
        Some(line) => vec![line],
        None => {
            let hints: &[&str] = match session.state() {
                SessionState::Idle => &["[Enter] Start", "[Tab] Next passage", "[Esc] Menu"],
                SessionState::Running => &[
                    "[Ctrl-P] Pause",
                    "[Ctrl-S] Submit",
                    "[Ctrl-R] Restart",
                    "[Esc] Menu",
                ],
                SessionState::Paused => &["[Ctrl-P] Resume", "[Ctrl-R] Restart", "[Esc] Menu"],
                SessionState::Finished => &["[Ctrl-R] Restart", "[Esc] Menu"],
            };
            pack_hint_lines(hints, app_layout.footer.width as usize)
                .into_iter()
                .map(|line| {
                    Line::from(Span::styled(line, Style::default().fg(colors.text_pending())))
                })
                .collect()
        }
    };
    frame.render_widget(Paragraph::new(footer), app_layout.footer);
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    if let Some(result) = app.last_result.as_ref() {
        let centered = centered_rect(60, 70, layout[0]);
        let dashboard = Dashboard::new(result, &app.history, app.eligibility(), app.theme)
            .has_certificate(app.last_certificate.is_some());
        frame.render_widget(dashboard, centered);
    }

    if let Some(line) = render_status(app) {
        frame.render_widget(Paragraph::new(line), layout[1]);
    }
}
