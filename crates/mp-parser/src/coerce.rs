//! Best-effort numeric coercion for recommendation fields.

use mp_protocol::{NumericField, Weather};

/// Strip a trailing unit token ("Ton", "tons", ...) and thousands separators.
///
/// The unit is only stripped when it follows a number, so purely textual
/// values survive intact for [`NumericField::Unparsed`].
pub fn clean_numeric(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_unit = trimmed
        .trim_end_matches(|c: char| c.is_alphabetic())
        .trim_end();
    let candidate = if without_unit.ends_with(|c: char| c.is_ascii_digit()) {
        without_unit
    } else {
        trimmed
    };
    candidate.replace(',', "")
}

fn parse_finite(cleaned: &str) -> Option<f64> {
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse as decimal and truncate toward zero.
pub fn coerce_integer(raw: &str) -> NumericField<i64> {
    let cleaned = clean_numeric(raw);
    match parse_finite(&cleaned) {
        Some(v) => NumericField::Parsed(v.trunc() as i64),
        None => NumericField::Unparsed(cleaned),
    }
}

pub fn coerce_float(raw: &str) -> NumericField<f64> {
    let cleaned = clean_numeric(raw);
    match parse_finite(&cleaned) {
        Some(v) => NumericField::Parsed(v),
        None => NumericField::Unparsed(cleaned),
    }
}

/// Weather accepts a numeric code or one of the known labels ("Cloudy").
pub fn coerce_weather(raw: &str) -> NumericField<i64> {
    match coerce_integer(raw) {
        parsed @ NumericField::Parsed(_) => parsed,
        NumericField::Unparsed(cleaned) => match Weather::from_label(&cleaned) {
            Some(w) => NumericField::Parsed(i64::from(w.code())),
            None => NumericField::Unparsed(cleaned),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_unit_and_thousands_separator() {
        assert_eq!(clean_numeric(" 1,250.5 Ton "), "1250.5");
        assert_eq!(clean_numeric("79.8ton"), "79.8");
        assert_eq!(clean_numeric("42"), "42");
    }

    #[test]
    fn textual_value_kept_verbatim() {
        assert_eq!(clean_numeric("  banyak "), "banyak");
        assert_eq!(
            coerce_integer("empat belas"),
            NumericField::Unparsed("empat belas".into())
        );
    }

    #[test]
    fn integers_truncate() {
        assert_eq!(coerce_integer("14"), NumericField::Parsed(14));
        assert_eq!(coerce_integer("14.9"), NumericField::Parsed(14));
        assert_eq!(coerce_integer("2,000 unit"), NumericField::Parsed(2000));
    }

    #[test]
    fn floats_parse_with_units() {
        assert_eq!(coerce_float("79.80 Ton"), NumericField::Parsed(79.8));
        assert_eq!(coerce_float("0.20"), NumericField::Parsed(0.2));
        assert_eq!(coerce_float("~80"), NumericField::Unparsed("~80".into()));
    }

    #[test]
    fn non_finite_values_are_unparsed() {
        assert!(coerce_float("NaN").parsed().is_none());
        assert!(coerce_float("inf").parsed().is_none());
        assert!(coerce_integer("infinity").parsed().is_none());
    }

    #[test]
    fn weather_accepts_code_or_label() {
        assert_eq!(coerce_weather("2"), NumericField::Parsed(2));
        assert_eq!(coerce_weather("Cloudy"), NumericField::Parsed(1));
        assert_eq!(coerce_weather("light rain"), NumericField::Parsed(0));
        assert_eq!(coerce_weather("Badai"), NumericField::Unparsed("Badai".into()));
    }
}
