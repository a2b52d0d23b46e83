use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::highlight::{Cell, CellStatus, WordState, WordView};
use crate::ui::theme::{Theme, ThemeColors};

pub struct TypingArea<'a> {
    words: &'a [WordView],
    theme: &'a Theme,
    title: &'a str,
    dimmed: bool,
}

impl<'a> TypingArea<'a> {
    pub fn new(words: &'a [WordView], title: &'a str, theme: &'a Theme) -> Self {
        Self {
            words,
            theme,
            title,
            dimmed: false,
        }
    }

    /// Render everything in the pending color, e.g. while paused.
    pub fn dimmed(mut self, dimmed: bool) -> Self {
        self.dimmed = dimmed;
        self
    }
}

fn cell_style(cell: &Cell, word: WordState, colors: &ThemeColors) -> Style {
    let base = match cell.status {
        CellStatus::Correct => Style::default().fg(colors.text_correct()),
        CellStatus::Wrong => Style::default()
            .fg(colors.text_incorrect())
            .bg(colors.text_incorrect_bg()),
        CellStatus::Pending if word == WordState::Current => {
            Style::default().fg(colors.text_current())
        }
        CellStatus::Pending => Style::default().fg(colors.text_pending()),
    };
    let base = if cell.overflow {
        base.add_modifier(Modifier::CROSSED_OUT)
    } else {
        base
    };
    if word == WordState::Incorrect {
        base.add_modifier(Modifier::UNDERLINED)
    } else {
        base
    }
}

/// Flatten the word views into styled spans, one per cell plus separators.
/// The first pending cell of the current word carries the cursor; a fully
/// typed current word puts it on the following separator.
fn build_spans<'a>(words: &[WordView], colors: &ThemeColors, dimmed: bool) -> Vec<Span<'a>> {
    let cursor = Style::default()
        .fg(colors.text_cursor_fg())
        .bg(colors.text_cursor_bg());
    let pending = Style::default().fg(colors.text_pending());
    let mut spans = Vec::new();
    let mut separator_taken = false;

    for (i, word) in words.iter().enumerate() {
        if i > 0 && !separator_taken {
            spans.push(Span::raw(" "));
        }
        separator_taken = false;
        let mut cursor_placed = false;
        for cell in &word.cells {
            let style = if dimmed {
                pending
            } else if word.state == WordState::Current
                && cell.status == CellStatus::Pending
                && !cursor_placed
            {
                cursor_placed = true;
                cursor
            } else {
                cell_style(cell, word.state, colors)
            };
            spans.push(Span::styled(cell.ch.to_string(), style));
        }
        if word.state == WordState::Current && !cursor_placed && !dimmed {
            spans.push(Span::styled(" ", cursor));
            separator_taken = true;
        }
    }
    spans
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let spans = build_spans(self.words, colors, self.dimmed);

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        let paragraph = Paragraph::new(Line::from(spans))
            .block(block)
            .wrap(Wrap { trim: false });

        paragraph.render(area, buf);
    }
}
