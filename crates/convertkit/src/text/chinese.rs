//! Chinese numerals, plain and financial.
//!
//! Formatting groups digits into sections of four (万, 亿, 万亿) and inserts
//! 零 wherever a section or digit gap would otherwise be silent. Parsing
//! accepts the colloquial forms people actually write (`两万二`, `十二`,
//! `百二`).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{ConvertError, Result};

/// Lower-case digits, indexed by value.
const DIGITS: [char; 10] = ['零', '一', '二', '三', '四', '五', '六', '七', '八', '九'];

/// Financial (anti-forgery) digits, indexed by value.
const TRADITIONAL_DIGITS: [char; 10] = ['零', '壹', '贰', '叁', '肆', '伍', '陆', '柒', '捌', '玖'];

const UNITS: [&str; 4] = ["", "十", "百", "千"];
const TRADITIONAL_UNITS: [&str; 4] = ["", "拾", "佰", "仟"];

/// Largest magnitude `format` accepts.
pub const MAX_AMOUNT: f64 = 99_9999_9999_9999.99;

const MAX_INTEGER: i64 = 99_9999_9999_9999;

/// A multiplier character recognised by the parser.
#[derive(Debug, Clone, Copy)]
struct ChineseUnit {
    value: i64,
    /// 万 and 亿 close a section; 十 百 千 only scale the digit before them.
    section: bool,
}

// ============================================================================
// Formatting
// ============================================================================

/// Format a number, rounding the fraction to two places.
///
/// In money mode the integer part ends in 元, the fraction is spelled as
/// 角 and 分, and a whole amount ends in 整. Outside money mode the fraction
/// follows 点.
///
/// ```rust
/// use convertkit::text::chinese::format;
///
/// assert_eq!(format(10889.72356, false, false).unwrap(), "一万零八百八十九点七二");
/// assert_eq!(format(67556.32, true, true).unwrap(), "陆万柒仟伍佰伍拾陆元叁角贰分");
/// ```
pub fn format(amount: f64, traditional: bool, money: bool) -> Result<String> {
    if !amount.is_finite() || amount.abs() > MAX_AMOUNT {
        return Err(ConvertError::invalid(format!(
            "Number support only: (-{max} ~ {max}), got {}",
            amount,
            max = MAX_AMOUNT
        )));
    }

    let mut yuan = (amount.abs() * 100.0).round() as i64;
    if yuan == 0 {
        return Ok(if money { "零元整" } else { "零" }.to_string());
    }

    let mut out = String::new();
    if amount < 0.0 {
        out.push('负');
    }

    let fen = yuan % 10;
    yuan /= 10;
    let jiao = yuan % 10;
    yuan /= 10;

    if !money || yuan != 0 {
        out.push_str(&long_to_chinese(yuan, traditional));
        if money {
            out.push('元');
        }
    }

    if jiao == 0 && fen == 0 {
        if money {
            out.push('整');
        }
        return Ok(out);
    }

    if !money {
        out.push('点');
    }

    if yuan == 0 && jiao == 0 {
        if !money {
            out.push('零');
        }
    } else {
        out.push(digit_char(jiao, traditional));
        if money && jiao != 0 {
            out.push('角');
        }
    }

    if fen != 0 {
        out.push(digit_char(fen, traditional));
        if money {
            out.push('分');
        }
    }

    Ok(out)
}

/// Format a whole number with no fraction.
pub fn format_long(amount: i64, traditional: bool) -> Result<String> {
    if amount == 0 {
        return Ok("零".to_string());
    }
    if !(-MAX_INTEGER..=MAX_INTEGER).contains(&amount) {
        return Err(ConvertError::invalid(format!(
            "Number support only: (-{max} ~ {max}), got {}",
            amount,
            max = MAX_INTEGER
        )));
    }

    let words = long_to_chinese(amount.abs(), traditional);
    Ok(if amount < 0 { format!("负{}", words) } else { words })
}

/// Format a number between -999 and 999.
///
/// Ten through nineteen drop the leading 一 (`十一` rather than `一十一`).
pub fn format_thousand(amount: i32, traditional: bool) -> Result<String> {
    if !(-999..=999).contains(&amount) {
        return Err(ConvertError::invalid(format!(
            "Number support only: (-999 ~ 999), got {}",
            amount
        )));
    }

    let magnitude = amount.abs();
    let mut words = thousand_to_chinese(magnitude, traditional);
    if (10..20).contains(&magnitude) {
        words.remove(0);
    }
    Ok(if amount < 0 { format!("负{}", words) } else { words })
}

/// Abbreviate with 万, 亿 or 万亿 and two decimals, e.g. `-5.56万`.
pub fn format_simple(amount: i64) -> String {
    const WAN: i64 = 1_0000;
    const YI: i64 = 1_0000_0000;
    const WAN_YI: i64 = 1_0000_0000_0000;

    let magnitude = amount.unsigned_abs();
    let (divisor, unit) = if magnitude < WAN as u64 {
        return amount.to_string();
    } else if magnitude < YI as u64 {
        (WAN, "万")
    } else if magnitude < WAN_YI as u64 {
        (YI, "亿")
    } else {
        (WAN_YI, "万亿")
    };

    let scaled = (Decimal::from(amount) / Decimal::from(divisor))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}{}", scaled, unit)
}

/// Map an ASCII digit to its Chinese numeral; other characters pass through.
pub fn number_char_to_chinese(c: char, traditional: bool) -> String {
    match c.to_digit(10) {
        Some(d) => digit_char(i64::from(d), traditional).to_string(),
        _ => c.to_string(),
    }
}

fn digit_char(digit: i64, traditional: bool) -> char {
    let table = if traditional { &TRADITIONAL_DIGITS } else { &DIGITS };
    table[digit as usize % 10]
}

/// Spell a non-negative integer below 10^16.
fn long_to_chinese(mut amount: i64, traditional: bool) -> String {
    if amount == 0 {
        return "零".to_string();
    }

    let mut parts = [0i32; 4];
    for part in parts.iter_mut() {
        if amount == 0 {
            break;
        }
        *part = (amount % 1_0000) as i32;
        amount /= 1_0000;
    }

    let mut out = String::new();

    if parts[0] > 0 {
        out.insert_str(0, &thousand_to_chinese(parts[0], traditional));
        if parts[0] < 1000 {
            add_leading_zero(&mut out);
        }
    }

    for (index, unit) in [(1usize, "万"), (2, "亿")] {
        let value = parts[index];
        if value > 0 {
            if value % 10 == 0 && parts[index - 1] > 0 {
                add_leading_zero(&mut out);
            }
            out.insert_str(0, unit);
            out.insert_str(0, &thousand_to_chinese(value, traditional));
            if value < 1000 {
                add_leading_zero(&mut out);
            }
        } else {
            add_leading_zero(&mut out);
        }
    }

    if parts[3] > 0 {
        if parts[2] == 0 {
            out.insert(0, '亿');
        }
        out.insert(0, '万');
        out.insert_str(0, &thousand_to_chinese(parts[3], traditional));
    }

    if out.starts_with('零') {
        out.remove(0);
    }
    out
}

/// Spell 0..=9999 with 零 between non-adjacent digits.
fn thousand_to_chinese(amount: i32, traditional: bool) -> String {
    if amount == 0 {
        return "零".to_string();
    }

    let units = if traditional { &TRADITIONAL_UNITS } else { &UNITS };
    let mut out = String::new();
    let mut last_is_zero = true;
    let mut rest = amount;
    let mut position = 0;
    while rest > 0 {
        let digit = rest % 10;
        if digit == 0 {
            if !last_is_zero {
                out.insert(0, '零');
            }
            last_is_zero = true;
        } else {
            out.insert_str(0, units[position]);
            out.insert(0, digit_char(i64::from(digit), traditional));
            last_is_zero = false;
        }
        rest /= 10;
        position += 1;
    }
    out
}

fn add_leading_zero(out: &mut String) {
    if !out.is_empty() && !out.starts_with('零') {
        out.insert(0, '零');
    }
}

// ============================================================================
// Parsing
// ============================================================================

fn chinese_digit(c: char) -> Option<i64> {
    if c == '两' {
        return Some(2);
    }
    DIGITS
        .iter()
        .position(|&d| d == c)
        .or_else(|| TRADITIONAL_DIGITS.iter().position(|&d| d == c))
        .map(|d| d as i64)
}

fn chinese_unit(c: char) -> Option<ChineseUnit> {
    let (value, section) = match c {
        '十' | '拾' => (10, false),
        '百' | '佰' => (100, false),
        '千' | '仟' => (1000, false),
        '万' => (1_0000, true),
        '亿' => (1_0000_0000, true),
        _ => return None,
    };
    Some(ChineseUnit { value, section })
}

fn overflow(text: &str) -> ConvertError {
    ConvertError::invalid(format!("Chinese number out of range: '{}'", text))
}

/// Parse a Chinese numeral into an integer.
///
/// 两 reads as 二, a leading 十/百/千 implies 一, and a trailing bare digit
/// takes one tenth of the preceding unit (`一千二` is 1200). 零 closes the
/// current unit. Two digits in a row, or any unrecognised character, is an
/// error.
pub fn chinese_to_number(text: &str) -> Result<i64> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ConvertError::invalid("Chinese number is blank"));
    }

    let mut result: i64 = 0;
    let mut section: i64 = 0;
    let mut number: i64 = 0;
    let mut unit: Option<ChineseUnit> = None;
    let mut previous: Option<char> = None;

    for (index, c) in text.chars().enumerate() {
        if let Some(digit) = chinese_digit(c) {
            if digit == 0 {
                if let (true, Some(u)) = (number > 0, unit) {
                    section = number
                        .checked_mul(u.value / 10)
                        .and_then(|n| section.checked_add(n))
                        .ok_or_else(|| overflow(text))?;
                }
                unit = None;
            } else if number > 0 {
                return Err(ConvertError::invalid(format!(
                    "Bad number '{}{}' at: {}",
                    previous.unwrap_or_default(),
                    c,
                    index
                )));
            }
            number = digit;
        } else {
            let parsed = chinese_unit(c).ok_or_else(|| {
                ConvertError::invalid(format!("Unknown unit '{}' at: {}", c, index))
            })?;
            if parsed.section {
                section = section
                    .checked_add(number)
                    .and_then(|s| s.checked_mul(parsed.value))
                    .ok_or_else(|| overflow(text))?;
                result = result.checked_add(section).ok_or_else(|| overflow(text))?;
                section = 0;
            } else {
                let multiplier = if number == 0 && index == 0 { 1 } else { number };
                section = multiplier
                    .checked_mul(parsed.value)
                    .and_then(|n| section.checked_add(n))
                    .ok_or_else(|| overflow(text))?;
            }
            unit = Some(parsed);
            number = 0;
        }
        previous = Some(c);
    }

    if let (true, Some(u)) = (number > 0, unit) {
        number = number.checked_mul(u.value / 10).ok_or_else(|| overflow(text))?;
    }

    result
        .checked_add(section)
        .and_then(|n| n.checked_add(number))
        .ok_or_else(|| overflow(text))
}

/// Parse a Chinese money amount such as `陆万柒仟伍佰伍拾陆元叁角贰分`.
///
/// The part before 元 (or 圆) is parsed with [`chinese_to_number`]; 角 and 分
/// each take the digit written right before them. A trailing 整 is ignored.
pub fn chinese_money_to_number(text: &str) -> Result<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ConvertError::invalid("Chinese money amount is blank"));
    }
    let text = text.strip_suffix('整').unwrap_or(text);

    let (yuan, rest) = match text.char_indices().find(|&(_, c)| c == '元' || c == '圆') {
        Some((at, c)) => {
            let head = &text[..at];
            let yuan = if head.is_empty() {
                0
            } else {
                chinese_to_number(head)?
            };
            (yuan, &text[at + c.len_utf8()..])
        }
        None => (0, text),
    };

    let jiao = fraction_digit(rest, '角')?;
    let fen = fraction_digit(rest, '分')?;

    let amount = Decimal::from(yuan) + Decimal::new(jiao, 1) + Decimal::new(fen, 2);
    Ok(amount.normalize())
}

/// The digit written immediately before `unit`, or 0 when `unit` is absent.
fn fraction_digit(text: &str, unit: char) -> Result<i64> {
    let Some(at) = text.find(unit) else {
        return Ok(0);
    };
    let digit = text[..at]
        .chars()
        .next_back()
        .and_then(chinese_digit)
        .ok_or_else(|| {
            ConvertError::invalid(format!("Missing digit before '{}' in '{}'", unit, text))
        })?;
    Ok(digit)
}

/// Round to cents the way `format` does, for callers holding a `Decimal`.
pub fn format_decimal(amount: Decimal, traditional: bool, money: bool) -> Result<String> {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let as_f64 = rounded
        .to_f64()
        .ok_or_else(|| ConvertError::invalid(format!("Amount out of range: {}", amount)))?;
    format(as_f64, traditional, money)
}
