use crate::error::{Error, Result};

use aws_sdk_dynamodb::{primitives::Blob, types};
use chrono::{DateTime, Datelike, Timelike, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_dynamo::to_attribute_value;
use std::collections;
use uuid::Uuid;

/// Fixed decimals used by `F` when no precision follows it.
const DEFAULT_FIXED_DECIMALS: u32 = 2;

/// Largest scale a `Decimal` can carry, also the cap for `F<n>` on floats.
const MAX_DECIMAL_SCALE: u32 = 28;

/// A typed value bound to an expression attribute value placeholder.
///
/// Nullable variants wrap an `Option`. Whether a `None` is skipped or written
/// depends on how it is registered, see
/// [`AttributeValues::add`](crate::common::values::AttributeValues::add).
///
/// ```rust
/// use dynamodb_fluent::common::value::Value;
///
/// let name = Value::from("Jane");
/// let age = Value::from(42);
/// let missing = Value::from(None::<String>);
/// assert!(missing.is_null());
/// # let _ = (name, age);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Text, written as `S`.
    String(Option<String>),
    /// Boolean, written as `BOOL`.
    Bool(Option<bool>),
    /// Exact decimal number, written as `N`.
    Number(Option<Decimal>),
    /// Binary floating point number, written as `N`.
    Float(Option<f64>),
    /// UTC timestamp, written as `S`.
    DateTime(Option<DateTime<Utc>>),
    /// UUID, written as `S`.
    Uuid(Option<Uuid>),
    /// Symbolic name of an enumeration member, written as `S`.
    Enum(Option<String>),
    /// Raw bytes, written as `B`.
    Binary(Option<Vec<u8>>),
    /// String set, written as `SS`.
    StringSet(Option<Vec<String>>),
    /// Number set, written as `NS`.
    NumberSet(Option<Vec<Decimal>>),
    /// Heterogeneous list, written as `L`.
    List(Option<Vec<Value>>),
    /// Map of strings, written as `M` with `S` members.
    StringMap(Option<collections::HashMap<String, String>>),
    /// Map of wire values, written as `M` unchanged.
    AttributeMap(Option<collections::HashMap<String, types::AttributeValue>>),
    /// Wire value passed through unchanged.
    Attribute(types::AttributeValue),
    /// Absent object reference.
    Null,
}

impl Value {
    /// Build an enumeration value from its symbolic name.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Enum(Some(name.into()))
    }

    /// Build a value from anything `serde` can serialize.
    ///
    /// Unit enum variants serialize to their symbolic name.
    pub fn serialized<T: Serialize>(value: &T) -> Result<Self> {
        let value: types::AttributeValue = to_attribute_value(value)?;
        Ok(Self::Attribute(value))
    }

    /// Whether this value is an absent one.
    pub fn is_null(&self) -> bool {
        match self {
            Self::String(value) | Self::Enum(value) => value.is_none(),
            Self::Bool(value) => value.is_none(),
            Self::Number(value) => value.is_none(),
            Self::Float(value) => value.is_none(),
            Self::DateTime(value) => value.is_none(),
            Self::Uuid(value) => value.is_none(),
            Self::Binary(value) => value.is_none(),
            Self::StringSet(value) => value.is_none(),
            Self::NumberSet(value) => value.is_none(),
            Self::List(value) => value.is_none(),
            Self::StringMap(value) => value.is_none(),
            Self::AttributeMap(value) => value.is_none(),
            Self::Attribute(_) => false,
            Self::Null => true,
        }
    }

    /// Convert into a wire value, rendering it with a positional format spec.
    ///
    /// Specs apply to numbers (`F2`, `G`, `R`), timestamps (`o`, `s`, `u` or a
    /// custom `yyyy-MM-dd` style pattern) and UUIDs (`D`, `N`, `B`, `P`). They are
    /// ignored for every other kind of value.
    pub fn encode_with(self, spec: &str) -> Result<types::AttributeValue> {
        if spec.is_empty() {
            return self.try_into();
        }
        let value = match self {
            Self::Number(Some(number)) => types::AttributeValue::N(format_decimal(number, spec)?),
            Self::Float(Some(number)) => types::AttributeValue::N(format_float(number, spec)?),
            Self::DateTime(Some(date)) => types::AttributeValue::S(format_date(&date, spec)?),
            Self::Uuid(Some(uuid)) => types::AttributeValue::S(format_uuid(&uuid, spec)?),
            other => other.try_into()?,
        };
        Ok(value)
    }
}

/// Wire encoding of a value. Only NaN and infinite floats are rejected.
impl TryFrom<Value> for types::AttributeValue {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        let value = match value {
            Value::String(Some(text)) | Value::Enum(Some(text)) => Self::S(text),
            Value::Bool(Some(flag)) => Self::Bool(flag),
            Value::Number(Some(number)) => Self::N(number.normalize().to_string()),
            Value::Float(Some(number)) => Self::N(finite(number)?.to_string()),
            Value::DateTime(Some(date)) => Self::S(round_trip_date(&date)),
            Value::Uuid(Some(uuid)) => Self::S(uuid.hyphenated().to_string()),
            Value::Binary(Some(bytes)) => Self::B(Blob::new(bytes)),
            Value::StringSet(Some(strings)) => Self::Ss(strings),
            Value::NumberSet(Some(numbers)) => Self::Ns(
                numbers
                    .into_iter()
                    .map(|number| number.normalize().to_string())
                    .collect(),
            ),
            Value::List(Some(values)) => Self::L(
                values
                    .into_iter()
                    .map(Self::try_from)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::StringMap(Some(map)) => Self::M(
                map.into_iter()
                    .map(|(key, value)| (key, Self::S(value)))
                    .collect(),
            ),
            Value::AttributeMap(Some(map)) => Self::M(map),
            Value::Attribute(value) => value,
            // numeric and boolean nulls keep their historical "unset" markers
            Value::Number(None) | Value::Float(None) => Self::N(String::new()),
            Value::Bool(None) => Self::Null(false),
            Value::String(None)
            | Value::Enum(None)
            | Value::DateTime(None)
            | Value::Uuid(None)
            | Value::Binary(None)
            | Value::StringSet(None)
            | Value::NumberSet(None)
            | Value::List(None)
            | Value::StringMap(None)
            | Value::AttributeMap(None)
            | Value::Null => Self::Null(true),
        };
        Ok(value)
    }
}

macro_rules! impl_from_source {
    ($variant:ident: $($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Self::$variant(Some(value.into()))
                }
            }

            impl From<Option<$source>> for Value {
                fn from(value: Option<$source>) -> Self {
                    Self::$variant(value.map(Into::into))
                }
            }
        )+
    };
}

impl_from_source!(String: String, &str);
impl_from_source!(Bool: bool);
impl_from_source!(Number: Decimal, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_from_source!(Float: f64);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(Some(widen(value)))
    }
}

impl From<Option<f32>> for Value {
    fn from(value: Option<f32>) -> Self {
        Self::Float(value.map(widen))
    }
}

/// Widen through the shortest `f32` text so `0.1_f32` stays `0.1`.
fn widen(value: f32) -> f64 {
    value
        .to_string()
        .parse()
        .unwrap_or_else(|_| f64::from(value))
}
impl_from_source!(DateTime: DateTime<Utc>);
impl_from_source!(Uuid: Uuid);
impl_from_source!(Binary: Vec<u8>);
impl_from_source!(StringSet: Vec<String>);
impl_from_source!(NumberSet: Vec<Decimal>);
impl_from_source!(List: Vec<Value>);
impl_from_source!(StringMap: collections::HashMap<String, String>);
impl_from_source!(AttributeMap: collections::HashMap<String, types::AttributeValue>);

impl From<types::AttributeValue> for Value {
    fn from(value: types::AttributeValue) -> Self {
        Self::Attribute(value)
    }
}

/// Build a `Vec<Value>` of format arguments from values of mixed types.
///
/// ```rust
/// use dynamodb_fluent::values;
///
/// let args = values!["USER#1", 42, true];
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! values {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::common::value::Value::from($value)),*]
    };
}

fn unsupported(spec: &str, kind: &'static str) -> Error {
    Error::UnsupportedFormat {
        spec: spec.to_string(),
        kind,
    }
}

/// Parse `F<n>` into its number of decimals.
fn fixed_decimals(spec: &str) -> Option<u32> {
    let digits = spec.strip_prefix(['F', 'f'])?;
    if digits.is_empty() {
        return Some(DEFAULT_FIXED_DECIMALS);
    }
    digits.parse().ok()
}

fn format_decimal(number: Decimal, spec: &str) -> Result<String> {
    if matches!(spec, "G" | "g" | "R" | "r") {
        return Ok(number.normalize().to_string());
    }
    match fixed_decimals(spec) {
        Some(scale) if scale <= MAX_DECIMAL_SCALE => {
            let mut number = number;
            number.rescale(scale);
            Ok(number.to_string())
        }
        _ => Err(unsupported(spec, "number")),
    }
}

fn finite(number: f64) -> Result<f64> {
    if number.is_finite() {
        Ok(number)
    } else {
        Err(Error::NonFiniteNumber { value: number })
    }
}

fn format_float(number: f64, spec: &str) -> Result<String> {
    if matches!(spec, "G" | "g" | "R" | "r") {
        return Ok(finite(number)?.to_string());
    }
    match fixed_decimals(spec) {
        Some(scale) if scale <= MAX_DECIMAL_SCALE => {
            Ok(format!("{:.*}", scale as usize, finite(number)?))
        }
        _ => Err(unsupported(spec, "number")),
    }
}

fn format_uuid(uuid: &Uuid, spec: &str) -> Result<String> {
    let text = match spec {
        "D" | "d" => uuid.hyphenated().to_string(),
        "N" | "n" => uuid.simple().to_string(),
        "B" | "b" => uuid.braced().to_string(),
        "P" | "p" => format!("({})", uuid.hyphenated()),
        _ => return Err(unsupported(spec, "uuid")),
    };
    Ok(text)
}

/// `yyyy-MM-ddTHH:mm:ss.fffffffZ`
fn round_trip_date(date: &DateTime<Utc>) -> String {
    format!(
        "{}.{:07}Z",
        date.format("%Y-%m-%dT%H:%M:%S"),
        date.nanosecond() % 1_000_000_000 / 100
    )
}

fn format_date(date: &DateTime<Utc>, spec: &str) -> Result<String> {
    match spec {
        "o" | "O" => Ok(round_trip_date(date)),
        "s" => Ok(date.format("%Y-%m-%dT%H:%M:%S").to_string()),
        "u" => Ok(date.format("%Y-%m-%d %H:%M:%SZ").to_string()),
        _ if spec.chars().count() == 1 => Err(unsupported(spec, "date")),
        _ => format_custom_date(date, spec),
    }
}

/// Render a custom pattern built from `yyyy`, `yy`, `MM`, `M`, `dd`, `d`, `HH`, `H`,
/// `mm`, `m`, `ss`, `s` and one to seven `f`. Quoted text is copied verbatim, as is
/// any character that is not an ASCII letter, plus the letters `T` and `Z`.
fn format_custom_date(date: &DateTime<Utc>, spec: &str) -> Result<String> {
    let chars: Vec<char> = spec.chars().collect();
    let mut output = String::with_capacity(spec.len() + 8);
    let mut position = 0;
    while position < chars.len() {
        let current = chars[position];
        if current == '\'' {
            let closing = chars[position + 1..]
                .iter()
                .position(|c| *c == '\'')
                .ok_or_else(|| unsupported(spec, "date"))?;
            output.extend(&chars[position + 1..position + 1 + closing]);
            position += closing + 2;
            continue;
        }
        let run = chars[position..]
            .iter()
            .take_while(|c| **c == current)
            .count();
        match (current, run) {
            ('y', 4) => output.push_str(&format!("{:04}", date.year())),
            ('y', 2) => output.push_str(&format!("{:02}", date.year().rem_euclid(100))),
            ('M', 1 | 2) => push_padded(&mut output, date.month(), run),
            ('d', 1 | 2) => push_padded(&mut output, date.day(), run),
            ('H', 1 | 2) => push_padded(&mut output, date.hour(), run),
            ('m', 1 | 2) => push_padded(&mut output, date.minute(), run),
            ('s', 1 | 2) => push_padded(&mut output, date.second(), run),
            ('f', 1..=7) => {
                let ticks = date.nanosecond() % 1_000_000_000 / 100;
                let fraction = format!("{ticks:07}");
                output.push_str(&fraction[..run]);
            }
            ('T' | 'Z', _) => output.extend(&chars[position..position + run]),
            (letter, _) if letter.is_ascii_alphabetic() => {
                return Err(unsupported(spec, "date"));
            }
            _ => output.extend(&chars[position..position + run]),
        }
        position += run;
    }
    Ok(output)
}

fn push_padded(output: &mut String, value: u32, width: usize) {
    output.push_str(&format!("{value:0width$}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use rstest::rstest;
    use std::str::FromStr;

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 5, 9, 7, 3).unwrap()
            + chrono::Duration::nanoseconds(123_456_700)
    }

    fn uuid() -> Uuid {
        Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap()
    }

    #[rstest]
    #[case::string(
        Value::from("a"),
        types::AttributeValue::S("a".to_string())
    )]
    #[case::bool(
        Value::from(true),
        types::AttributeValue::Bool(true)
    )]
    #[case::integer(
        Value::from(42),
        types::AttributeValue::N("42".to_string())
    )]
    #[case::decimal(
        Value::from(Decimal::from_str("99.99").unwrap()),
        types::AttributeValue::N("99.99".to_string())
    )]
    #[case::decimal_trailing_zeros(
        Value::from(Decimal::from_str("1.500").unwrap()),
        types::AttributeValue::N("1.5".to_string())
    )]
    #[case::float(
        Value::from(0.1_f64),
        types::AttributeValue::N("0.1".to_string())
    )]
    #[case::float_f32(
        Value::from(0.1_f32),
        types::AttributeValue::N("0.1".to_string())
    )]
    #[case::float_negative_exponent(
        Value::from(-2.5e-7_f64),
        types::AttributeValue::N("-0.00000025".to_string())
    )]
    #[case::null_float(
        Value::from(None::<f32>),
        types::AttributeValue::N(String::new())
    )]
    #[case::date(
        Value::from(date()),
        types::AttributeValue::S("2024-01-05T09:07:03.1234567Z".to_string())
    )]
    #[case::uuid(
        Value::from(uuid()),
        types::AttributeValue::S("67e55044-10b1-426f-9247-bb680e5fe0c8".to_string())
    )]
    #[case::symbol(
        Value::symbol("Active"),
        types::AttributeValue::S("Active".to_string())
    )]
    #[case::string_map(
        Value::from(
            collections::HashMap::from(
                [("a".to_string(), "b".to_string())]
            )
        ),
        types::AttributeValue::M(
            collections::HashMap::from(
                [("a".to_string(), types::AttributeValue::S("b".to_string()))]
            )
        )
    )]
    #[case::attribute_map(
        Value::from(
            collections::HashMap::from(
                [("a".to_string(), types::AttributeValue::N("1".to_string()))]
            )
        ),
        types::AttributeValue::M(
            collections::HashMap::from(
                [("a".to_string(), types::AttributeValue::N("1".to_string()))]
            )
        )
    )]
    #[case::list(
        Value::from(vec![Value::from("a"), Value::from(1)]),
        types::AttributeValue::L(
            vec![
                types::AttributeValue::S("a".to_string()),
                types::AttributeValue::N("1".to_string()),
            ]
        )
    )]
    #[case::null_string(
        Value::from(None::<String>),
        types::AttributeValue::Null(true)
    )]
    #[case::null_number(
        Value::from(None::<Decimal>),
        types::AttributeValue::N(String::new())
    )]
    #[case::null_bool(
        Value::from(None::<bool>),
        types::AttributeValue::Null(false)
    )]
    #[case::null_reference(
        Value::Null,
        types::AttributeValue::Null(true)
    )]
    fn test_value_to_attribute_value(
        #[case] value: Value,
        #[case] expected: types::AttributeValue,
    ) {
        let actual = types::AttributeValue::try_from(value).unwrap();
        assert_eq!(actual, expected);
    }

    #[rstest]
    #[case::fixed_two(Value::from(Decimal::from_str("99.9").unwrap()), "F2", "99.90")]
    #[case::fixed_default(Value::from(Decimal::from_str("3").unwrap()), "F", "3.00")]
    #[case::fixed_zero(Value::from(Decimal::from_str("2.4").unwrap()), "F0", "2")]
    #[case::general(Value::from(Decimal::from_str("7.000").unwrap()), "G", "7")]
    #[case::float_fixed(Value::from(1.5_f64), "F3", "1.500")]
    #[case::float_fixed_max(Value::from(0.5_f64), "F28", "0.5000000000000000000000000000")]
    #[case::float_general(Value::from(0.1_f32), "R", "0.1")]
    fn test_number_format(#[case] value: Value, #[case] spec: &str, #[case] expected: &str) {
        let actual = value.encode_with(spec).unwrap();
        assert_eq!(actual, types::AttributeValue::N(expected.to_string()));
    }

    #[rstest]
    #[case::round_trip("o", "2024-01-05T09:07:03.1234567Z")]
    #[case::round_trip_upper("O", "2024-01-05T09:07:03.1234567Z")]
    #[case::sortable("s", "2024-01-05T09:07:03")]
    #[case::universal("u", "2024-01-05 09:07:03Z")]
    #[case::date_only("yyyy-MM-dd", "2024-01-05")]
    #[case::unpadded("d/M/yy", "5/1/24")]
    #[case::milliseconds("HH:mm:ss.fff", "09:07:03.123")]
    #[case::quoted("yyyy'-Q'MM", "2024-Q01")]
    fn test_date_format(#[case] spec: &str, #[case] expected: &str) {
        let actual = Value::from(date()).encode_with(spec).unwrap();
        assert_eq!(actual, types::AttributeValue::S(expected.to_string()));
    }

    #[rstest]
    #[case::hyphenated("D", "67e55044-10b1-426f-9247-bb680e5fe0c8")]
    #[case::simple("N", "67e5504410b1426f9247bb680e5fe0c8")]
    #[case::braced("B", "{67e55044-10b1-426f-9247-bb680e5fe0c8}")]
    #[case::parenthesized("P", "(67e55044-10b1-426f-9247-bb680e5fe0c8)")]
    fn test_uuid_format(#[case] spec: &str, #[case] expected: &str) {
        let actual = Value::from(uuid()).encode_with(spec).unwrap();
        assert_eq!(actual, types::AttributeValue::S(expected.to_string()));
    }

    #[rstest]
    #[case::number(Value::from(1), "X4", "number")]
    #[case::decimal_scale_too_large(Value::from(1), "F29", "number")]
    #[case::float_scale_too_large(Value::from(1.5_f64), "F70000", "number")]
    #[case::float_unknown(Value::from(1.5_f64), "X", "number")]
    #[case::date(Value::from(date()), "d", "date")]
    #[case::date_token(Value::from(date()), "yyyy-MM-dd hh", "date")]
    #[case::uuid(Value::from(uuid()), "X", "uuid")]
    fn test_unsupported_format(
        #[case] value: Value,
        #[case] spec: &str,
        #[case] expected_kind: &str,
    ) {
        let error = value.encode_with(spec).unwrap_err();
        assert!(
            matches!(error, Error::UnsupportedFormat { kind, .. } if kind == expected_kind),
            "{error}"
        );
    }

    #[test]
    fn test_spec_ignored_for_strings() {
        let actual = Value::from("abc").encode_with("F2").unwrap();
        assert_eq!(actual, types::AttributeValue::S("abc".to_string()));
    }

    #[test]
    fn test_decimal_round_trip() {
        let original = Decimal::from_str("99.99").unwrap();
        let types::AttributeValue::N(text) =
            types::AttributeValue::try_from(Value::from(original)).unwrap()
        else {
            panic!("expected a number");
        };
        assert_eq!(Decimal::from_str(&text).unwrap(), original);
    }

    #[rstest]
    #[case::tenth(0.1_f64)]
    #[case::third(1.0_f64 / 3.0)]
    #[case::large(1.7976931348623157e308_f64)]
    #[case::tiny(5e-324_f64)]
    #[case::negative(-1234.5678_f64)]
    fn test_float_round_trip(#[case] original: f64) {
        let types::AttributeValue::N(text) =
            types::AttributeValue::try_from(Value::from(original)).unwrap()
        else {
            panic!("expected a number");
        };
        assert_eq!(text.parse::<f64>().unwrap(), original);
    }

    #[rstest]
    #[case::tenth(0.1_f32)]
    #[case::third(1.0_f32 / 3.0)]
    #[case::large(f32::MAX)]
    #[case::negative(-1234.5678_f32)]
    fn test_f32_round_trip(#[case] original: f32) {
        let types::AttributeValue::N(text) =
            types::AttributeValue::try_from(Value::from(original)).unwrap()
        else {
            panic!("expected a number");
        };
        assert_eq!(text, original.to_string());
        assert_eq!(text.parse::<f32>().unwrap(), original);
    }

    #[rstest]
    #[case::nan(Value::from(f64::NAN), "")]
    #[case::infinity(Value::from(f64::INFINITY), "")]
    #[case::negative_infinity(Value::from(f32::NEG_INFINITY), "")]
    #[case::nan_fixed(Value::from(f64::NAN), "F2")]
    #[case::infinity_general(Value::from(f64::INFINITY), "G")]
    #[case::nan_in_list(Value::from(vec![Value::from(1), Value::from(f64::NAN)]), "")]
    fn test_non_finite_float(#[case] value: Value, #[case] spec: &str) {
        let error = value.encode_with(spec).unwrap_err();
        assert!(matches!(error, Error::NonFiniteNumber { .. }), "{error}");
    }

    #[test]
    fn test_serialized_unit_variant() {
        let value = Value::serialized(&serde_json::json!("Pending")).unwrap();
        assert_eq!(
            types::AttributeValue::try_from(value).unwrap(),
            types::AttributeValue::S("Pending".to_string())
        );
    }
}
