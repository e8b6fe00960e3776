// Colombian number format handling for price fields: "1.234,56" <-> 1234.56
use crate::error::PriceError;

pub const THOUSANDS_SEPARATOR: char = '.';
pub const DECIMAL_SEPARATOR: char = ',';

/// Rendered for any value that does not coerce to a number.
pub const ZERO_PRICE: &str = "0,00";

// Digits kept after the last separator by the input filter.
const DIGITS_AFTER_DOT: usize = 3;
const DIGITS_AFTER_COMMA: usize = 2;

/// Converts user text in Colombian format into a number.
///
/// `None` and `""` give `0.0`. Every `.` is dropped, the first `,` becomes the
/// decimal point and the leading numeral of what remains is converted, so
/// trailing garbage is ignored. Text with no leading numeral gives `NaN`,
/// which callers are expected to handle (see [`format_price`]).
pub fn parse_price<'a>(value: impl Into<Option<&'a str>>) -> f64 {
    match value.into() {
        None | Some("") => 0.0,
        Some(text) => leading_decimal(&normalize_separators(text)),
    }
}

/// Strict variant of [`parse_price`]: the whole text must be a finite numeral.
pub fn try_parse_price(text: &str) -> Result<f64, PriceError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PriceError::Empty);
    }

    let normalized = normalize_separators(trimmed);
    if !is_plain_decimal(&normalized) {
        return Err(PriceError::Invalid(text.to_string()));
    }
    normalized
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| PriceError::Invalid(text.to_string()))
}

/// Renders a number as a Colombian price with exactly two decimals.
///
/// Strings are coerced with a plain leading-decimal scan, not with
/// [`parse_price`]. Anything that coerces to `NaN` renders as `"0,00"`.
pub fn format_price(value: impl PriceNumber) -> String {
    let number = value.to_price_number();
    if number.is_nan() {
        return ZERO_PRICE.to_string();
    }
    if number.is_infinite() {
        let sign = if number.is_sign_negative() { "-" } else { "" };
        return format!("{}∞", sign);
    }

    let fixed = format!("{:.2}", number.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut out = String::with_capacity(fixed.len() + integer.len() / 3 + 1);
    if number.is_sign_negative() {
        out.push('-');
    }
    out.push_str(&group_thousands(integer));
    out.push(DECIMAL_SEPARATOR);
    out.push_str(fraction);
    out
}

/// Sanitizes the raw text of a price field after an edit.
///
/// Keeps only digits, `.` and `,`. Whichever separator occurs last decides
/// the cut: up to 3 characters survive after a final `.`, up to 2 after a
/// final `,`. Earlier duplicate separators are left in place.
pub fn validate_price_input(raw: &str) -> String {
    let mut value: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == THOUSANDS_SEPARATOR || *c == DECIMAL_SEPARATOR)
        .collect();

    let last_dot = value.rfind(THOUSANDS_SEPARATOR);
    let last_comma = value.rfind(DECIMAL_SEPARATOR);

    // None orders before Some, so a missing separator never wins.
    let end = match (last_dot, last_comma) {
        (Some(dot), _) if last_dot > last_comma => Some(dot + 1 + DIGITS_AFTER_DOT),
        (_, Some(comma)) if last_comma > last_dot => Some(comma + 1 + DIGITS_AFTER_COMMA),
        _ => None,
    };
    if let Some(end) = end {
        value.truncate(end.min(value.len()));
    }
    value
}

/// Snaps whatever the field holds to its canonical price text.
pub fn format_price_on_blur(value: &str) -> String {
    format_price(parse_price(value))
}

/// Anything a price can be formatted from.
pub trait PriceNumber {
    fn to_price_number(&self) -> f64;
}

impl PriceNumber for f64 {
    fn to_price_number(&self) -> f64 {
        *self
    }
}

impl PriceNumber for f32 {
    fn to_price_number(&self) -> f64 {
        f64::from(*self)
    }
}

macro_rules! impl_price_number_for_int {
    ($($t:ty),*) => {
        $(impl PriceNumber for $t {
            fn to_price_number(&self) -> f64 {
                *self as f64
            }
        })*
    };
}

impl_price_number_for_int!(i32, i64, u32, u64, usize);

impl PriceNumber for str {
    fn to_price_number(&self) -> f64 {
        leading_decimal(self)
    }
}

impl PriceNumber for String {
    fn to_price_number(&self) -> f64 {
        leading_decimal(self)
    }
}

impl<T: PriceNumber + ?Sized> PriceNumber for &T {
    fn to_price_number(&self) -> f64 {
        (**self).to_price_number()
    }
}

impl<T: PriceNumber> PriceNumber for Option<T> {
    fn to_price_number(&self) -> f64 {
        self.as_ref().map_or(f64::NAN, PriceNumber::to_price_number)
    }
}

fn normalize_separators(text: &str) -> String {
    text.replace(THOUSANDS_SEPARATOR, "")
        .replacen(DECIMAL_SEPARATOR, ".", 1)
}

// Converts the longest leading decimal numeral, ignoring whatever follows.
fn leading_decimal(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_digits = count_digits(&bytes[(end + 1 + sign).min(bytes.len())..]);
        if exp_digits > 0 {
            end += 1 + sign + exp_digits;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

// Optional sign, digits with at most one '.', at least one digit.
fn is_plain_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let mut parts = unsigned.splitn(2, '.');
    let integer = parts.next().unwrap_or("");
    let fraction = parts.next().unwrap_or("");
    (!integer.is_empty() || !fraction.is_empty())
        && integer.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(THOUSANDS_SEPARATOR);
        }
        grouped.push(ch);
    }
    grouped
}
