use crate::engine::words::{is_word_complete, split_words};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharStatus {
    Correct,
    Wrong,
}

/// One aligned position. `ch` is the expected character, or the typed
/// character for overflow entries past the end of the expected word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HighlightedChar {
    pub ch: char,
    pub status: CharStatus,
    pub overflow: bool,
}

impl HighlightedChar {
    fn correct(ch: char) -> Self {
        Self {
            ch,
            status: CharStatus::Correct,
            overflow: false,
        }
    }

    fn wrong(ch: char) -> Self {
        Self {
            ch,
            status: CharStatus::Wrong,
            overflow: false,
        }
    }

    fn extra(ch: char) -> Self {
        Self {
            ch,
            status: CharStatus::Wrong,
            overflow: true,
        }
    }

    /// The expected character at this position, if any.
    pub fn expected(&self) -> Option<char> {
        if self.overflow { None } else { Some(self.ch) }
    }
}

/// Align a committed word against its expected text.
pub fn highlight(expected: &str, typed: &str) -> Vec<HighlightedChar> {
    let expected: Vec<char> = expected.chars().collect();
    let typed: Vec<char> = typed.chars().collect();
    align(&expected, &typed, true)
}

/// Align the word still being typed. Expected positions after the typed
/// input runs out are left out rather than marked wrong.
pub fn highlight_partial(expected: &str, typed: &str) -> Vec<HighlightedChar> {
    let expected: Vec<char> = expected.chars().collect();
    let typed: Vec<char> = typed.chars().collect();
    align(&expected, &typed, false)
}

pub(crate) fn align(expected: &[char], typed: &[char], committed: bool) -> Vec<HighlightedChar> {
    let mut out = Vec::with_capacity(expected.len().max(typed.len()));
    let mut cursor = 0usize;

    for (i, &exp) in expected.iter().enumerate() {
        let Some(&got) = typed.get(cursor) else {
            if !committed {
                return out;
            }
            out.push(HighlightedChar::wrong(exp));
            continue;
        };

        if got == exp {
            out.push(HighlightedChar::correct(exp));
            cursor += 1;
        } else if expected.get(i + 1) == Some(&got) {
            // Typed char belongs to the next position; hold the cursor.
            out.push(HighlightedChar::wrong(exp));
        } else {
            out.push(HighlightedChar::wrong(exp));
            cursor += 1;
        }
    }

    out.extend(typed[cursor..].iter().map(|&c| HighlightedChar::extra(c)));
    out
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordState {
    Pending,
    Current,
    Correct,
    Incorrect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellStatus {
    Correct,
    Wrong,
    Pending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub status: CellStatus,
    pub overflow: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordView {
    pub state: WordState,
    pub cells: Vec<Cell>,
}

impl WordView {
    fn pending(word: &str, state: WordState) -> Self {
        Self {
            state,
            cells: word
                .chars()
                .map(|ch| Cell {
                    ch,
                    status: CellStatus::Pending,
                    overflow: false,
                })
                .collect(),
        }
    }
}

fn to_cell(mark: &HighlightedChar) -> Cell {
    Cell {
        ch: mark.ch,
        status: match mark.status {
            CharStatus::Correct => CellStatus::Correct,
            CharStatus::Wrong => CellStatus::Wrong,
        },
        overflow: mark.overflow,
    }
}

/// Renderable highlight model for the whole passage.
///
/// Pure function of the reference words and the (normalized) typed text.
/// Typed words beyond the end of the reference are appended as incorrect
/// words made entirely of overflow cells.
pub fn passage_view(reference: &[String], typed_text: &str) -> Vec<WordView> {
    let typed = split_words(typed_text);
    let trailing_space = typed_text.is_empty() || typed_text.ends_with(char::is_whitespace);
    let current_idx = if trailing_space {
        typed.len()
    } else {
        typed.len().saturating_sub(1)
    };

    let mut views = Vec::with_capacity(reference.len().max(typed.len()));

    for (i, expected) in reference.iter().enumerate() {
        let Some(word) = typed.get(i) else {
            let state = if i == current_idx {
                WordState::Current
            } else {
                WordState::Pending
            };
            views.push(WordView::pending(expected, state));
            continue;
        };

        if is_word_complete(typed_text, i, &typed) {
            let state = if word == expected {
                WordState::Correct
            } else {
                WordState::Incorrect
            };
            views.push(WordView {
                state,
                cells: highlight(expected, word).iter().map(to_cell).collect(),
            });
        } else {
            let marks = highlight_partial(expected, word);
            let scored_expected = marks.iter().filter(|m| !m.overflow).count();
            let mut cells: Vec<Cell> = marks.iter().map(to_cell).collect();
            cells.extend(expected.chars().skip(scored_expected).map(|ch| Cell {
                ch,
                status: CellStatus::Pending,
                overflow: false,
            }));
            views.push(WordView {
                state: WordState::Current,
                cells,
            });
        }
    }

    for word in typed.iter().skip(reference.len()) {
        views.push(WordView {
            state: WordState::Incorrect,
            cells: word
                .chars()
                .map(|ch| Cell {
                    ch,
                    status: CellStatus::Wrong,
                    overflow: true,
                })
                .collect(),
        });
    }

    views
}
