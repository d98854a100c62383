//! Rewrites extracted text into canonical engine syntax

/// Canonical form of an extracted expression
///
/// Applied in order:
/// 1. `^` becomes `**`
/// 2. `²` becomes `**2`
/// 3. `*` is inserted between a digit and a letter that directly follows it
///
/// Nothing else is touched, so the result is a fixed point:
/// `normalize(&normalize(s)) == normalize(s)`.
///
/// ```
/// use mathly::normalize;
///
/// assert_eq!(normalize("3x^2 + 2x"), "3*x**2 + 2*x");
/// assert_eq!(normalize("x² - 4"), "x**2 - 4");
/// ```
pub fn normalize(raw: &str) -> String {
    let powered = raw.replace('^', "**").replace('²', "**2");

    let mut out = String::with_capacity(powered.len() + 8);
    let mut prev: Option<char> = None;
    for c in powered.chars() {
        if prev.is_some_and(|p| p.is_ascii_digit()) && c.is_ascii_alphabetic() {
            out.push('*');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}
