//! Equality filters rendered as Airtable formulas.

/// Renders `{Field}='value'` terms joined with `AND(...)`.
///
/// A single term is rendered bare; an empty filter matches every record.
///
/// ```
/// use reviewsync_store::formula::equality;
///
/// assert_eq!(
///     equality(&[("Name_Creator", "Asha"), ("business_name", "Joe's")]),
///     r"AND({Name_Creator}='Asha',{business_name}='Joe\'s')"
/// );
/// ```
#[must_use]
pub fn equality(filter: &[(&str, &str)]) -> String {
    let terms: Vec<String> = filter
        .iter()
        .map(|(field, value)| format!("{{{field}}}='{}'", escape(value)))
        .collect();

    match terms.as_slice() {
        [] => "TRUE()".to_string(),
        [single] => single.clone(),
        _ => format!("AND({})", terms.join(",")),
    }
}

/// Escapes a value for a single-quoted formula string literal.
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
