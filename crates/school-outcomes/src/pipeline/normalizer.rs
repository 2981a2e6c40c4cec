/// Canonical form for header cells and region names. Survey sheets pad short
/// names with (often full-width) spaces for alignment, so all whitespace is
/// dropped along with invisible marks.
pub(crate) fn normalize_label(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '\u{feff}' | '\u{200b}'))
        .collect()
}
