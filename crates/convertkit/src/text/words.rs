//! English amount words and short-scale abbreviations.
//!
//! Amounts are spelled the way cheques and invoices print them:
//! `ONE HUNDRED AND CENTS TWENTY THREE ONLY`.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{ConvertError, Result};

const ONES: [&str; 10] = [
    "", "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE",
];

const TEENS: [&str; 10] = [
    "TEN",
    "ELEVEN",
    "TWELVE",
    "THIRTEEN",
    "FOURTEEN",
    "FIFTEEN",
    "SIXTEEN",
    "SEVENTEEN",
    "EIGHTEEN",
    "NINETEEN",
];

const TENS: [&str; 10] = [
    "", "TEN", "TWENTY", "THIRTY", "FORTY", "FIFTY", "SIXTY", "SEVENTY", "EIGHTY", "NINETY",
];

const SCALES: [&str; 6] = ["", "THOUSAND", "MILLION", "BILLION", "TRILLION", "QUADRILLION"];

const SIMPLE_UNITS: [&str; 4] = ["k", "m", "b", "t"];

/// Spell a finite number in English amount words.
pub fn number_to_words(number: f64) -> Result<String> {
    if !number.is_finite() {
        return Err(ConvertError::invalid(format!(
            "Cannot spell non-finite number {}",
            number
        )));
    }
    format_words(&number.to_string())
}

/// Spell a decimal number given as text.
///
/// The integer part may have at most 18 digits; only the first two
/// fraction digits are spelled, as cents.
pub fn format_words(text: &str) -> Result<String> {
    let text = text.trim();
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part)
    {
        return Err(ConvertError::invalid(format!("Not a decimal number: '{}'", text)));
    }

    let int_part = int_part.trim_start_matches('0');
    if int_part.len() > SCALES.len() * 3 {
        return Err(ConvertError::invalid(format!(
            "Number too large to spell: '{}'",
            text
        )));
    }

    let cents: usize = frac_part
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(2)
        .fold(0, |acc, b| acc * 10 + usize::from(b - b'0'));

    let mut words = spell_integer(int_part);
    if words.is_empty() {
        words.push_str("ZERO");
    }
    if cents != 0 {
        words.push_str(" AND CENTS ");
        words.push_str(&two(cents));
    }

    let sign = if negative && (!int_part.is_empty() || cents != 0) {
        "MINUS "
    } else {
        ""
    };
    Ok(format!("{}{} ONLY", sign, words))
}

/// Abbreviate an integer with `k`, `m`, `b` or `t` and at most two decimals.
///
/// `1200` becomes `1.2k` and `-4_535_000` becomes `-4.54m`. Values below
/// one thousand are printed as they are.
pub fn number_to_simple(number: i64) -> String {
    if number.unsigned_abs() < 1000 {
        return number.to_string();
    }

    let thousand = Decimal::from(1000);
    let mut scaled = Decimal::from(number);
    let mut unit = 0;
    loop {
        scaled /= thousand;
        let rounded = scaled.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if rounded.abs() < thousand || unit + 1 == SIMPLE_UNITS.len() {
            return format!("{}{}", rounded.normalize(), SIMPLE_UNITS[unit]);
        }
        unit += 1;
    }
}

fn spell_integer(digits: &str) -> String {
    let mut groups: Vec<usize> = Vec::new();
    let mut end = digits.len();
    while end > 0 {
        let start = end.saturating_sub(3);
        groups.push(digits[start..end].bytes().fold(0, |acc, b| acc * 10 + usize::from(b - b'0')));
        end = start;
    }

    groups
        .into_iter()
        .enumerate()
        .rev()
        .filter(|&(_, group)| group != 0)
        .map(|(scale, group)| {
            if scale == 0 {
                three(group)
            } else {
                format!("{} {}", three(group), SCALES[scale])
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn three(n: usize) -> String {
    let (hundreds, rest) = (n / 100, n % 100);
    match (hundreds, rest) {
        (0, _) => two(rest),
        (_, 0) => format!("{} HUNDRED", ONES[hundreds]),
        _ => format!("{} HUNDRED AND {}", ONES[hundreds], two(rest)),
    }
}

fn two(n: usize) -> String {
    let (tens, ones) = (n / 10, n % 10);
    match (tens, ones) {
        (0, _) => ONES[ones].to_string(),
        (1, _) => TEENS[ones].to_string(),
        (_, 0) => TENS[tens].to_string(),
        _ => format!("{} {}", TENS[tens], ONES[ones]),
    }
}
