use crate::error::{Error, Result};

/// Separator between combined condition fragments.
const AND: &str = " AND ";

/// Condition fragments collected across several calls on one builder.
///
/// A single fragment is used verbatim, several are parenthesized and joined with
/// `AND` in the order they were added.
///
/// ```rust
/// use dynamodb_fluent::common::condition::Conditions;
///
/// let mut conditions = Conditions::default();
/// conditions.add("#status = :p0");
/// conditions.add("attribute_exists(#email)");
/// assert_eq!(
///     conditions.combine().as_deref(),
///     Some("(#status = :p0) AND (attribute_exists(#email))")
/// );
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Conditions {
    fragments: Vec<String>,
}

impl Conditions {
    /// Append an already resolved fragment.
    pub fn add(&mut self, fragment: impl Into<String>) {
        self.fragments.push(fragment.into());
    }

    /// Number of fragments added so far.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether no fragment was added.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// The combined expression, or `None` when nothing was added.
    pub fn combine(&self) -> Option<String> {
        match self.fragments.as_slice() {
            [] => None,
            [single] => Some(single.clone()),
            fragments => {
                let wrapped: Vec<_> = fragments
                    .iter()
                    .map(|fragment| format!("({fragment})"))
                    .collect();
                Some(wrapped.join(AND))
            }
        }
    }

    /// The combined expression of an operation that cannot run without one.
    pub fn require(&self, operation: &'static str) -> Result<String> {
        self.combine().ok_or(Error::MissingCondition { operation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::none(vec![], None)]
    #[case::single(vec!["A"], Some("A"))]
    #[case::two(vec!["A", "B"], Some("(A) AND (B)"))]
    #[case::three(vec!["A", "B", "C"], Some("(A) AND (B) AND (C)"))]
    #[case::compound_fragment(
        vec!["a = :p0 OR b = :p1", "c = :p2"],
        Some("(a = :p0 OR b = :p1) AND (c = :p2)")
    )]
    fn test_combine(#[case] fragments: Vec<&str>, #[case] expected: Option<&str>) {
        let mut conditions = Conditions::default();
        for fragment in fragments {
            conditions.add(fragment);
        }
        assert_eq!(conditions.combine().as_deref(), expected);
        // reading twice yields the same expression
        assert_eq!(conditions.combine().as_deref(), expected);
    }

    #[test]
    fn test_require() {
        let mut conditions = Conditions::default();
        assert!(matches!(
            conditions.require("ConditionCheck"),
            Err(Error::MissingCondition {
                operation: "ConditionCheck"
            })
        ));
        conditions.add("attribute_exists(pk)");
        assert_eq!(
            conditions.require("ConditionCheck").unwrap(),
            "attribute_exists(pk)"
        );
    }
}
