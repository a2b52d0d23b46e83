use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::certificate::Eligibility;
use crate::session::result::TestResult;
use crate::store::schema::HistoryData;
use crate::ui::theme::Theme;

/// Final result screen.
pub struct Dashboard<'a> {
    pub result: &'a TestResult,
    pub completed_tests: usize,
    pub qualified_tests: usize,
    pub eligibility: Eligibility,
    pub has_certificate: bool,
    pub theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        result: &'a TestResult,
        history: &HistoryData,
        eligibility: Eligibility,
        theme: &'a Theme,
    ) -> Self {
        Self {
            result,
            completed_tests: history.completed_tests(),
            qualified_tests: history.qualified_tests(),
            eligibility,
            has_certificate: false,
            theme,
        }
    }

    pub fn has_certificate(mut self, issued: bool) -> Self {
        self.has_certificate = issued;
        self
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let stats = &self.result.stats;
        let criteria = &self.result.criteria;

        let block = Block::bordered()
            .title(format!(" {} ", self.result.test_name))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(9),
                Constraint::Length(2),
                Constraint::Length(2),
            ])
            .split(inner);

        let (verdict, verdict_color) = if self.result.is_qualified() {
            ("QUALIFIED", colors.success())
        } else {
            ("NOT QUALIFIED", colors.error())
        };
        let title = Paragraph::new(Line::from(Span::styled(
            verdict,
            Style::default()
                .fg(verdict_color)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        let label = Style::default().fg(colors.fg());
        let value = Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD);
        let dim = Style::default().fg(colors.text_pending());

        let ended = if self.result.timed_out {
            "time up"
        } else {
            "submitted"
        };
        let rows = vec![
            Line::from(vec![
                Span::styled("  Gross speed:   ", label),
                Span::styled(format!("{} wpm", stats.gross_speed), value),
                Span::styled(format!("  (needs {})", criteria.min_wpm), dim),
            ]),
            Line::from(vec![
                Span::styled("  Net speed:     ", label),
                Span::styled(format!("{} wpm", stats.net_speed), value),
            ]),
            Line::from(vec![
                Span::styled("  Accuracy:      ", label),
                Span::styled(format!("{}%", stats.accuracy), value),
                Span::styled(format!("  (needs {}%)", criteria.min_accuracy), dim),
            ]),
            Line::from(vec![
                Span::styled("  Mistakes:      ", label),
                Span::styled(stats.mistakes.to_string(), value),
                Span::styled(format!("  ({}% of chars)", stats.mistake_rate), dim),
            ]),
            Line::from(vec![
                Span::styled("  Words:         ", label),
                Span::styled(
                    format!("{} correct, {} wrong", stats.correct_words, stats.incorrect_words),
                    value,
                ),
            ]),
            Line::from(vec![
                Span::styled("  Time:          ", label),
                Span::styled(format!("{}s", stats.time_taken_secs), value),
                Span::styled(format!("  ({ended}, {} per word)", stats.time_per_word), dim),
            ]),
            Line::from(vec![
                Span::styled("  Backspaces:    ", label),
                Span::styled(stats.backspaces.to_string(), value),
                Span::styled(format!("  idle {}s", self.result.idle_secs), dim),
            ]),
        ];
        Paragraph::new(rows).render(layout[1], buf);

        let cert_color = if self.eligibility.is_eligible() {
            colors.success()
        } else {
            colors.warning()
        };
        let footer_info = Paragraph::new(Line::from(vec![
            Span::styled(
                format!(
                    "  Tests completed: {} ({} qualified)   ",
                    self.completed_tests, self.qualified_tests
                ),
                dim,
            ),
            Span::styled(self.eligibility.message(), Style::default().fg(cert_color)),
        ]));
        footer_info.render(layout[2], buf);

        let mut hints = vec![
            Span::styled("  [r] Retry  ", Style::default().fg(colors.accent())),
            Span::styled("[Esc] Menu  ", Style::default().fg(colors.accent())),
        ];
        if self.has_certificate {
            hints.push(Span::styled(
                "[d] Download certificate",
                Style::default().fg(colors.accent()),
            ));
        } else if self.result.is_qualified() && self.eligibility.is_eligible() {
            hints.push(Span::styled(
                "[c] Request certificate",
                Style::default().fg(colors.accent()),
            ));
        }
        Paragraph::new(Line::from(hints)).render(layout[3], buf);
    }
}
