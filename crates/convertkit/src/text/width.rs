//! Full-width (SBC) and half-width (DBC) character conversion.

/// Offset between printable ASCII and the full-width forms block.
const WIDTH_OFFSET: u32 = 65248;

const IDEOGRAPHIC_SPACE: char = '\u{3000}';

/// Half-width to full-width.
///
/// Printable ASCII shifts into the U+FF01..U+FF5E block and a space becomes
/// the ideographic space. Control characters and anything outside ASCII are
/// left alone, as is every character in `skip`.
///
/// ```rust
/// use convertkit::text::to_sbc;
///
/// assert_eq!(to_sbc("Hi 1!", &[]), "Ｈｉ　１！");
/// ```
pub fn to_sbc(input: &str, skip: &[char]) -> String {
    input
        .chars()
        .map(|c| {
            if skip.contains(&c) {
                c
            } else if c == ' ' {
                IDEOGRAPHIC_SPACE
            } else if ('!'..='~').contains(&c) {
                char::from_u32(c as u32 + WIDTH_OFFSET).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// Full-width to half-width.
///
/// The ideographic space and the no-break spaces (U+00A0, U+2007, U+202F)
/// become a plain space; U+FF01..U+FF5E shift back to ASCII. Characters in
/// `skip` are left alone.
pub fn to_dbc(input: &str, skip: &[char]) -> String {
    input
        .chars()
        .map(|c| {
            if skip.contains(&c) {
                return c;
            }
            match c {
                IDEOGRAPHIC_SPACE | '\u{00A0}' | '\u{2007}' | '\u{202F}' => ' ',
                '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - WIDTH_OFFSET).unwrap_or(c),
                _ => c,
            }
        })
        .collect()
}
