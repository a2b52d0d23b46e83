/// Map typographic quotes to their ASCII forms.
///
/// Applied to both the passage and the typed text before any comparison, so
/// a user typing `'` matches a passage containing `’`. Nothing else about the
/// text changes.
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            other => other,
        })
        .collect()
}
