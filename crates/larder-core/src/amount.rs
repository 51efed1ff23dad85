//! Best-effort numeric extraction from free-text ingredient fields.
//!
//! Amounts look like `"150g"` or `"2.5 kg"` and notes like `"Quantity: 3"`.
//! Nothing here fails: unparsable input degrades to `0.0` for weights and
//! `1` for quantities.

/// Marker the client writes in front of an ingredient's quantity.
pub const QUANTITY_MARKER: &str = "Quantity:";

/// Parse the leading decimal magnitude of an amount string.
///
/// Leading whitespace is skipped, then digits and at most one decimal point
/// are accumulated until the first other character. Returns `0.0` if no
/// digit was seen.
pub fn parse_weight(amount: &str) -> f64 {
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_point = false;
    let trimmed = amount.trim_start();

    for (idx, ch) in trimmed.char_indices() {
        match ch {
            '0'..='9' => seen_digit = true,
            '.' if !seen_point => seen_point = true,
            _ => break,
        }
        end = idx + ch.len_utf8();
    }

    if !seen_digit {
        return 0.0;
    }
    trimmed[..end].parse().unwrap_or(0.0)
}

/// Parse the quantity recorded in an ingredient's notes.
///
/// When the notes contain [`QUANTITY_MARKER`] only the text after it is
/// considered; otherwise the whole string is. The first run of digits wins.
/// Defaults to `1`.
pub fn parse_quantity(notes: &str) -> u32 {
    let haystack = match notes.split_once(QUANTITY_MARKER) {
        Some((_, rest)) => rest,
        None => notes,
    };
    leading_digit_run(haystack)
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(1)
}

fn leading_digit_run(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..len])
}
