use crate::common::{value::Value, values::AttributeValues};
use crate::error::{Error, Result};

use aws_sdk_dynamodb::types;
use indexmap::IndexMap;

/// Prefix of the value placeholders generated for positional markers.
pub const GENERATED_PLACEHOLDER_PREFIX: &str = ":p";

/// An expression whose positional markers were replaced by value placeholders.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormattedExpression {
    /// The rewritten expression.
    pub expression: String,
    /// Generated placeholders and their values, in order of first use.
    pub values: Vec<(String, types::AttributeValue)>,
}

#[derive(Clone, Debug, PartialEq)]
enum Token<'a> {
    Literal(&'a str),
    Marker { index: usize, spec: &'a str },
}

/// Split a template into literal text and `{index[:spec]}` markers.
///
/// `{{` and `}}` stand for literal braces.
fn tokenize(template: &str) -> Result<Vec<Token<'_>>> {
    let bytes = template.as_bytes();
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut position = 0;
    while position < bytes.len() {
        match bytes[position] {
            b'{' | b'}' if bytes.get(position + 1) == Some(&bytes[position]) => {
                // keep one brace of the escaped pair
                tokens.push(Token::Literal(&template[literal_start..=position]));
                position += 2;
                literal_start = position;
            }
            b'{' => {
                let closing = template[position..].find('}').ok_or(Error::InvalidTemplate {
                    position,
                    reason: "unclosed format marker",
                })?;
                let content = &template[position + 1..position + closing];
                let (index, spec) = content.split_once(':').unwrap_or((content, ""));
                if index.is_empty() || !index.bytes().all(|byte| byte.is_ascii_digit()) {
                    return Err(Error::InvalidTemplate {
                        position,
                        reason: "format marker index must be a non-negative integer",
                    });
                }
                let index = index.parse().map_err(|_| Error::InvalidTemplate {
                    position,
                    reason: "format marker index is too large",
                })?;
                if literal_start < position {
                    tokens.push(Token::Literal(&template[literal_start..position]));
                }
                tokens.push(Token::Marker { index, spec });
                position += closing + 1;
                literal_start = position;
            }
            b'}' => {
                return Err(Error::InvalidTemplate {
                    position,
                    reason: "unmatched closing brace",
                });
            }
            _ => position += 1,
        }
    }
    if literal_start < bytes.len() {
        tokens.push(Token::Literal(&template[literal_start..]));
    }
    Ok(tokens)
}

/// Resolve the positional markers of `template` against `args`.
///
/// Each distinct argument index gets the next `:pN` placeholder not already
/// registered in `existing`; repeated markers for the same index share it and the
/// format spec of the first occurrence wins. Nothing is registered here: the
/// caller adds [`FormattedExpression::values`] to its registry.
///
/// ```rust
/// use dynamodb_fluent::common::{format, value::Value, values::AttributeValues};
///
/// let args = [Value::from("USER#123"), Value::from("2024-01-01")];
/// let formatted = format::format_expression(
///     "pk = {0} AND sk > {1}",
///     Some(&args),
///     &AttributeValues::default(),
/// )
/// .unwrap();
/// assert_eq!(formatted.expression, "pk = :p0 AND sk > :p1");
/// ```
pub fn format_expression(
    template: &str,
    args: Option<&[Value]>,
    existing: &AttributeValues,
) -> Result<FormattedExpression> {
    if template.trim().is_empty() {
        return Err(Error::EmptyTemplate);
    }
    let args = args.ok_or(Error::NullArguments)?;
    let tokens = tokenize(template)?;

    let mut placeholders: IndexMap<usize, (String, &str)> = IndexMap::new();
    let mut counter = 0;
    for token in &tokens {
        let Token::Marker { index, spec } = *token else {
            continue;
        };
        if index >= args.len() {
            return Err(Error::IndexOutOfRange {
                index,
                count: args.len(),
            });
        }
        if placeholders.contains_key(&index) {
            continue;
        }
        let placeholder = loop {
            let candidate = format!("{GENERATED_PLACEHOLDER_PREFIX}{counter}");
            counter += 1;
            if !existing.contains(&candidate) {
                break candidate;
            }
        };
        placeholders.insert(index, (placeholder, spec));
    }

    let mut values = Vec::with_capacity(placeholders.len());
    for (index, (placeholder, spec)) in &placeholders {
        let value = args[*index].clone().encode_with(spec)?;
        values.push((placeholder.clone(), value));
    }

    let mut expression = String::with_capacity(template.len());
    for token in tokens {
        match token {
            Token::Literal(text) => expression.push_str(text),
            Token::Marker { index, .. } => {
                if let Some((placeholder, _)) = placeholders.get(&index) {
                    expression.push_str(placeholder);
                }
            }
        }
    }
    #[cfg(feature = "tracing")]
    tracing::trace!(%template, %expression, "formatted expression");
    Ok(FormattedExpression { expression, values })
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[rstest]
    #[case::no_markers(
        "attribute_exists(pk)",
        vec![],
        "attribute_exists(pk)",
        vec![]
    )]
    #[case::single(
        "pk = {0}",
        vec![Value::from("a")],
        "pk = :p0",
        vec![(":p0", types::AttributeValue::S("a".to_string()))]
    )]
    #[case::two_markers(
        "pk = {0} AND sk > {1}",
        vec![Value::from("USER#123"), Value::from("2024-01-01")],
        "pk = :p0 AND sk > :p1",
        vec![
            (":p0", types::AttributeValue::S("USER#123".to_string())),
            (":p1", types::AttributeValue::S("2024-01-01".to_string())),
        ]
    )]
    #[case::repeated_marker(
        "{0} {0}",
        vec![Value::from(1)],
        ":p0 :p0",
        vec![(":p0", types::AttributeValue::N("1".to_string()))]
    )]
    #[case::first_occurrence_order(
        "a = {1} OR b = {0} OR c = {1}",
        vec![Value::from("x"), Value::from("y")],
        "a = :p0 OR b = :p1 OR c = :p0",
        vec![
            (":p0", types::AttributeValue::S("y".to_string())),
            (":p1", types::AttributeValue::S("x".to_string())),
        ]
    )]
    #[case::unused_argument(
        "a = {1}",
        vec![Value::from("x"), Value::from(true)],
        "a = :p0",
        vec![(":p0", types::AttributeValue::Bool(true))]
    )]
    #[case::fixed_decimals(
        "price = {0:F2}",
        vec![Value::from(Decimal::from_str("99.9").unwrap())],
        "price = :p0",
        vec![(":p0", types::AttributeValue::N("99.90".to_string()))]
    )]
    #[case::date_spec(
        "created < {0:yyyy-MM-dd}",
        vec![Value::from(Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap())],
        "created < :p0",
        vec![(":p0", types::AttributeValue::S("2024-03-09".to_string()))]
    )]
    #[case::escaped_braces(
        "{{literal}} = {0}",
        vec![Value::from("a")],
        "{literal} = :p0",
        vec![(":p0", types::AttributeValue::S("a".to_string()))]
    )]
    #[case::null_argument(
        "a = {0}",
        vec![Value::from(None::<String>)],
        "a = :p0",
        vec![(":p0", types::AttributeValue::Null(true))]
    )]
    fn test_format_expression(
        #[case] template: &str,
        #[case] args: Vec<Value>,
        #[case] expected_expression: &str,
        #[case] expected_values: Vec<(&str, types::AttributeValue)>,
    ) {
        let actual =
            format_expression(template, Some(&args), &AttributeValues::default()).unwrap();
        let expected = FormattedExpression {
            expression: expected_expression.to_string(),
            values: expected_values
                .into_iter()
                .map(|(placeholder, value)| (placeholder.to_string(), value))
                .collect(),
        };
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_skips_existing_placeholders() {
        let mut existing = AttributeValues::default();
        existing.add(":p0", "taken", false).unwrap();
        existing.add(":p2", "taken", false).unwrap();
        let args = [Value::from(1), Value::from(2)];
        let actual = format_expression("a = {0} AND b = {1}", Some(&args), &existing).unwrap();
        assert_eq!(actual.expression, "a = :p1 AND b = :p3");
        assert_eq!(actual.values[0].0, ":p1");
        assert_eq!(actual.values[1].0, ":p3");
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank("   ")]
    fn test_empty_template(#[case] template: &str) {
        let args = [Value::from(1)];
        for args in [None, Some(&args[..])] {
            let error = format_expression(template, args, &AttributeValues::default());
            assert!(matches!(error, Err(Error::EmptyTemplate)));
        }
    }

    #[test]
    fn test_null_arguments() {
        let error = format_expression("a = {0}", None, &AttributeValues::default());
        assert!(matches!(error, Err(Error::NullArguments)));
    }

    #[test]
    fn test_empty_arguments_without_markers() {
        let actual = format_expression("a = b", Some(&[]), &AttributeValues::default()).unwrap();
        assert_eq!(actual.expression, "a = b");
        assert!(actual.values.is_empty());
    }

    #[rstest]
    #[case::past_end("a = {0} AND b = {2}", 2, 2)]
    #[case::no_arguments("a = {0}", 0, 0)]
    fn test_index_out_of_range(
        #[case] template: &str,
        #[case] count: usize,
        #[case] expected_index: usize,
    ) {
        let args = vec![Value::from("x"); count];
        let error = format_expression(template, Some(&args), &AttributeValues::default())
            .unwrap_err();
        let message = error.to_string();
        assert!(matches!(
            error,
            Error::IndexOutOfRange { index, count: actual }
                if index == expected_index && actual == count
        ));
        assert!(message.contains(&expected_index.to_string()), "{message}");
        assert!(message.contains(&format!("only {count}")), "{message}");
    }

    #[rstest]
    #[case::unclosed("a = {0")]
    #[case::non_numeric("a = {x}")]
    #[case::empty_marker("a = {}")]
    #[case::negative("a = {-1}")]
    #[case::stray_closing("a = 0}")]
    fn test_invalid_template(#[case] template: &str) {
        let args = [Value::from(1)];
        let error = format_expression(template, Some(&args), &AttributeValues::default());
        assert!(matches!(error, Err(Error::InvalidTemplate { .. })));
    }

    #[test]
    fn test_unsupported_spec() {
        let args = [Value::from(1)];
        let error = format_expression("a = {0:Q}", Some(&args), &AttributeValues::default());
        assert!(matches!(error, Err(Error::UnsupportedFormat { .. })));
    }
}
