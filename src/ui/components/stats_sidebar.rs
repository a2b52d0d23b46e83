use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::metrics::{QualificationCriteria, TypingStats};
use crate::session::result::TestResult;
use crate::ui::theme::{Theme, ThemeColors};

pub struct StatsSidebar<'a> {
    stats: &'a TypingStats,
    criteria: &'a QualificationCriteria,
    remaining_secs: u32,
    idle_secs: u32,
    last_result: Option<&'a TestResult>,
    theme: &'a Theme,
}

impl<'a> StatsSidebar<'a> {
    pub fn new(
        stats: &'a TypingStats,
        criteria: &'a QualificationCriteria,
        remaining_secs: u32,
        idle_secs: u32,
        theme: &'a Theme,
    ) -> Self {
        Self {
            stats,
            criteria,
            remaining_secs,
            idle_secs,
            last_result: None,
            theme,
        }
    }

    pub fn last_result(mut self, result: Option<&'a TestResult>) -> Self {
        self.last_result = result;
        self
    }
}

pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Green at or above the threshold, amber within 10 points, red below.
fn threshold_color(value: u32, threshold: u32, colors: &ThemeColors) -> Color {
    if value >= threshold {
        colors.success()
    } else if value + 10 >= threshold {
        colors.warning()
    } else {
        colors.error()
    }
}

fn row<'a>(label: &'a str, value: String, color: Color, colors: &ThemeColors) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(colors.fg())),
        Span::styled(value, Style::default().fg(color)),
    ])
}

impl Widget for StatsSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let stats = self.stats;

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints(if self.last_result.is_some() {
                [Constraint::Min(14), Constraint::Length(7)]
            } else {
                [Constraint::Min(14), Constraint::Length(0)]
            })
            .split(area);

        let time_color = if self.remaining_secs <= 10 {
            colors.error()
        } else {
            colors.accent()
        };

        let lines = vec![
            Line::from(Span::styled(
                format_clock(self.remaining_secs),
                Style::default().fg(time_color).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            row(
                "Gross:    ",
                format!("{} wpm", stats.gross_speed),
                threshold_color(stats.gross_speed, self.criteria.min_wpm, colors),
                colors,
            ),
            row("Net:      ", format!("{} wpm", stats.net_speed), colors.accent(), colors),
            row(
                "Accuracy: ",
                format!("{}%", stats.accuracy),
                threshold_color(stats.accuracy, self.criteria.min_accuracy, colors),
                colors,
            ),
            Line::from(""),
            row("Mistakes: ", stats.mistakes.to_string(), colors.error(), colors),
            row(
                "Words:    ",
                format!("{}/{}", stats.correct_words, stats.correct_words + stats.incorrect_words),
                colors.fg(),
                colors,
            ),
            row("Backsp.:  ", stats.backspaces.to_string(), colors.fg(), colors),
            row("Idle:     ", format!("{}s", self.idle_secs), colors.text_pending(), colors),
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "Target {} wpm / {}%",
                    self.criteria.min_wpm, self.criteria.min_accuracy
                ),
                Style::default().fg(colors.text_pending()),
            )),
        ];

        let block = Block::bordered()
            .title(" Live ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        Paragraph::new(lines).block(block).render(sections[0], buf);

        if let Some(last) = self.last_result {
            let verdict = if last.is_qualified() {
                Span::styled("qualified", Style::default().fg(colors.success()))
            } else {
                Span::styled("not qualified", Style::default().fg(colors.error()))
            };
            let lines = vec![
                Line::from(Span::styled(
                    last.test_name.as_str(),
                    Style::default().fg(colors.fg()),
                )),
                row("Net:      ", format!("{} wpm", last.stats.net_speed), colors.accent(), colors),
                row("Accuracy: ", format!("{}%", last.stats.accuracy), colors.fg(), colors),
                Line::from(verdict),
            ];
            let block = Block::bordered()
                .title(" Last Test ")
                .border_style(Style::default().fg(colors.border()))
                .style(Style::default().bg(colors.bg()));
            Paragraph::new(lines).block(block).render(sections[1], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(75), "01:15");
        assert_eq!(format_clock(900), "15:00");
    }

    #[test]
    fn test_threshold_color_bands() {
        let colors = ThemeColors::default();
        assert_eq!(threshold_color(30, 25, &colors), colors.success());
        assert_eq!(threshold_color(20, 25, &colors), colors.warning());
        assert_eq!(threshold_color(5, 25, &colors), colors.error());
    }
}
