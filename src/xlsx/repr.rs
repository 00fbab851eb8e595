//! Text rendering of worksheet rows for hashing.
//!
//! Each row is rendered as a tuple literal, e.g. `('Name', 3, None, True)`,
//! and the bytes of that text are what gets hashed. Digests stored by
//! earlier runs were produced from this exact form, so every rule below is
//! part of the hash format.

use std::fmt::{self, Write};

use calamine::{Data, ExcelDateTime, Range};
use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};
use unicode_general_category::{GeneralCategory, get_general_category};

/// Largest float that is still rendered as an integer.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Render every row of `range` as the rows a reader starting at `A1` sees.
///
/// Rows above and columns left of the first used cell are filled with
/// `None`; an empty range gives no rows.
pub fn render_rows(range: &Range<Data>) -> impl Iterator<Item = String> + '_ {
    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    let width = first_col as usize + range.width();
    let leading_rows = if range.is_empty() { 0 } else { first_row as usize };

    let blank_rows =
        (0..leading_rows).map(move |_| render_row(std::iter::repeat_n(&Data::Empty, width)));
    let data_rows = range.rows().map(move |row| {
        render_row(std::iter::repeat_n(&Data::Empty, first_col as usize).chain(row.iter()))
    });
    blank_rows.chain(data_rows)
}

/// Render one row of cells as a tuple literal.
pub fn render_row<'a>(cells: impl IntoIterator<Item = &'a Data>) -> String {
    let mut out = String::from("(");
    let mut count = 0usize;
    for cell in cells {
        if count > 0 {
            out.push_str(", ");
        }
        // Writing into a String cannot fail.
        let _ = write!(out, "{}", CellRepr(cell));
        count += 1;
    }
    if count == 1 {
        out.push(',');
    }
    out.push(')');
    out
}

/// Literal form of a single cell value.
pub struct CellRepr<'a>(pub &'a Data);

impl fmt::Display for CellRepr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Data::Empty => f.write_str("None"),
            Data::Bool(true) => f.write_str("True"),
            Data::Bool(false) => f.write_str("False"),
            Data::Int(i) => write!(f, "{i}"),
            Data::Float(v) => write_number(f, *v),
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                write_str_literal(f, s)
            }
            Data::Error(e) => write_str_literal(f, &e.to_string()),
            Data::DateTime(dt) => write_excel_datetime(f, dt),
        }
    }
}

/// Numbers stored without a fractional part read back as integers.
///
/// The workbook reader hands every numeric cell over as a float and drops
/// its stored text, so `<v>3.0</v>` and `<v>1E3</v>` render as `3` and
/// `1000`. Digests recorded for such cells as `3.0` and `1000.0` will not
/// match.
fn write_number(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < MAX_EXACT_INT {
        return write!(f, "{}", v as i64);
    }
    f.write_str(&float_literal(v))
}

/// Shortest round-trip float text, switching to exponent form outside
/// `[1e-4, 1e16)`.
pub fn float_literal(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = v.abs();
    if magnitude == 0.0 || (1e-4..1e16).contains(&magnitude) {
        let text = v.to_string();
        if text.contains('.') {
            return text;
        }
        return format!("{text}.0");
    }

    // `{:e}` gives e.g. "1.5e-5"; the exponent needs a sign and two digits.
    let text = format!("{v:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text,
    }
}

/// Quoted string literal.
///
/// Single quotes are used unless the text contains a single quote and no
/// double quote. Backslash, the chosen quote and non-printable characters
/// are escaped.
pub fn write_str_literal(f: &mut impl Write, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };

    f.write_char(quote)?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\t' => f.write_str("\\t")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            c if c == quote => write!(f, "\\{c}")?,
            c if !is_printable(c) => {
                let code = c as u32;
                if code <= 0xff {
                    write!(f, "\\x{code:02x}")?;
                } else if code <= 0xffff {
                    write!(f, "\\u{code:04x}")?;
                } else {
                    write!(f, "\\U{code:08x}")?;
                }
            }
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

/// Separators other than the ASCII space, and control, format, surrogate,
/// private-use and unassigned code points are escaped.
fn is_printable(c: char) -> bool {
    use GeneralCategory::*;

    c == ' '
        || !matches!(
            get_general_category(c),
            Control
                | Format
                | Surrogate
                | PrivateUse
                | Unassigned
                | LineSeparator
                | ParagraphSeparator
                | SpaceSeparator
        )
}

fn write_excel_datetime(f: &mut fmt::Formatter<'_>, dt: &ExcelDateTime) -> fmt::Result {
    if dt.is_duration() {
        if let Some(micros) = dt.as_duration().and_then(|d| d.num_microseconds()) {
            return f.write_str(&timedelta_literal(micros));
        }
    } else {
        let serial = dt.as_f64();
        if serial > 0.0 && serial < 1.0 {
            if let Some(t) = dt.as_datetime() {
                return f.write_str(&time_literal(t.time()));
            }
        }
        if let Some(t) = dt.as_datetime() {
            return f.write_str(&datetime_literal(&t));
        }
    }
    // Out of the representable range: keep the raw serial.
    f.write_str(&float_literal(dt.as_f64()))
}

/// `datetime.datetime(Y, M, D, H, MI[, S[, US]])`
pub fn datetime_literal(t: &NaiveDateTime) -> String {
    format!(
        "datetime.datetime({}, {}, {}, {})",
        t.year(),
        t.month(),
        t.day(),
        clock_fields(t.time())
    )
}

/// `datetime.time(H, MI[, S[, US]])`
pub fn time_literal(t: NaiveTime) -> String {
    format!("datetime.time({})", clock_fields(t))
}

fn clock_fields(t: NaiveTime) -> String {
    let micros = t.nanosecond() / 1_000;
    let mut out = format!("{}, {}", t.hour(), t.minute());
    if t.second() != 0 || micros != 0 {
        let _ = write!(out, ", {}", t.second());
    }
    if micros != 0 {
        let _ = write!(out, ", {micros}");
    }
    out
}

/// `datetime.timedelta(days=.., seconds=.., microseconds=..)` with zero
/// fields left out; days carry the sign.
pub fn timedelta_literal(total_micros: i64) -> String {
    const MICROS_PER_DAY: i64 = 86_400_000_000;

    let days = total_micros.div_euclid(MICROS_PER_DAY);
    let rest = total_micros.rem_euclid(MICROS_PER_DAY);
    let seconds = rest / 1_000_000;
    let micros = rest % 1_000_000;

    let mut fields = Vec::new();
    if days != 0 {
        fields.push(format!("days={days}"));
    }
    if seconds != 0 {
        fields.push(format!("seconds={seconds}"));
    }
    if micros != 0 {
        fields.push(format!("microseconds={micros}"));
    }
    if fields.is_empty() {
        return "datetime.timedelta(0)".to_string();
    }
    format!("datetime.timedelta({})", fields.join(", "))
}
