//! Arithmetic evaluator.
//!
//! Computes `lhs OP rhs` from the first two integer literals in a prompt and
//! one binary operator. Nothing is ever handed to a general expression
//! interpreter: the only inputs are two digit runs and an operator token.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Unsigned ASCII digit runs, left to right
static INTEGER_LITERAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Error payload for anything the evaluator cannot compute
pub const INVALID_CALCULATION: &str = "Invalid calculation";

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }

    /// Resolve the operator for `text` under the given notation.
    ///
    /// Case-insensitive substring search; the first group that matches wins,
    /// falling back to addition.
    pub fn resolve(text: &str, notation: Notation) -> Self {
        let t = text.to_lowercase();

        match notation {
            Notation::Symbolic => {
                if t.contains("plus") || t.contains('+') {
                    Self::Add
                } else if t.contains("minus") || t.contains('-') {
                    Self::Subtract
                } else if t.contains("times") || t.contains('*') {
                    Self::Multiply
                } else if t.contains('/') || t.contains("divide") {
                    Self::Divide
                } else {
                    Self::Add
                }
            }
            Notation::Spelled => {
                if t.contains("plus") {
                    Self::Add
                } else if t.contains("minus") {
                    Self::Subtract
                } else if t.contains("times") {
                    Self::Multiply
                } else {
                    Self::Add
                }
            }
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// How the calculation was written in the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notation {
    /// Digits around an operator symbol ("3 * 4"); also honours spelled keywords and "divide"
    Symbolic,
    /// Only spelled keywords ("7 plus 5", "calculate 2 and 3")
    Spelled,
}

/// Numeric result; integers stay integers on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{}", i),
            Self::Real(r) => write!(f, "{:?}", r),
        }
    }
}

/// Calculator tool payload: `{"result": n}` or `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalcOutcome {
    Result { result: Number },
    Error { error: String },
}

impl CalcOutcome {
    pub fn invalid() -> Self {
        Self::Error {
            error: INVALID_CALCULATION.to_string(),
        }
    }

    pub fn result(&self) -> Option<Number> {
        match self {
            Self::Result { result } => Some(*result),
            Self::Error { .. } => None,
        }
    }
}

/// A two-operand calculation extracted from a prompt.
///
/// Operands are kept as the literal digit runs so that out-of-range
/// literals surface as an evaluation failure rather than an extraction one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculation {
    pub lhs: String,
    pub rhs: String,
    pub operator: Operator,
    pub notation: Notation,
}

impl Calculation {
    /// Build from the first two integer literals in `text`.
    ///
    /// Returns `None` when fewer than two literals are present.
    pub fn extract(text: &str, notation: Notation) -> Option<Self> {
        let mut literals = integer_literals(text).into_iter();
        let lhs = literals.next()?;
        let rhs = literals.next()?;

        Some(Self {
            lhs,
            rhs,
            operator: Operator::resolve(text, notation),
            notation,
        })
    }

    /// Compute the result. Never fails; errors degrade to `Invalid calculation`.
    pub fn evaluate(&self) -> CalcOutcome {
        let (Ok(lhs), Ok(rhs)) = (self.lhs.parse::<i64>(), self.rhs.parse::<i64>()) else {
            return CalcOutcome::invalid();
        };

        let value = match self.operator {
            Operator::Add => lhs.checked_add(rhs).map(Number::Integer),
            Operator::Subtract => lhs.checked_sub(rhs).map(Number::Integer),
            Operator::Multiply => lhs.checked_mul(rhs).map(Number::Integer),
            // Zero divisor yields 0 instead of an error or infinity
            Operator::Divide if rhs == 0 => Some(Number::Integer(0)),
            Operator::Divide => Some(Number::Real(lhs as f64 / rhs as f64)),
        };

        match value {
            Some(n) => CalcOutcome::Result {
                result: self.shape(n),
            },
            None => CalcOutcome::invalid(),
        }
    }

    /// Spelled-out calculations report real numbers
    fn shape(&self, n: Number) -> Number {
        match (self.notation, n) {
            (Notation::Spelled, Number::Integer(i)) => Number::Real(i as f64),
            (_, n) => n,
        }
    }
}

impl fmt::Display for Calculation {
    /// Symbolic: normalized operands and the resolved operator ("7 * 2").
    /// Spelled: the literal digit runs joined by "+" ("007 + 2"), whatever the operator.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.notation == Notation::Spelled {
            return write!(f, "{} + {}", self.lhs, self.rhs);
        }

        let lhs = self.lhs.parse::<i64>().map(|n| n.to_string());
        let rhs = self.rhs.parse::<i64>().map(|n| n.to_string());
        write!(
            f,
            "{} {} {}",
            lhs.as_deref().unwrap_or(&self.lhs),
            self.operator,
            rhs.as_deref().unwrap_or(&self.rhs)
        )
    }
}

/// All integer literals in `text`, in order
pub fn integer_literals(text: &str) -> Vec<String> {
    INTEGER_LITERAL
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// True if `text` contains at least one digit
pub fn has_digit(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn calc(text: &str, notation: Notation) -> Calculation {
        Calculation::extract(text, notation).unwrap()
    }

    #[test]
    fn test_extract_first_two_literals() {
        let c = calc("add 12 and 30 then 99", Notation::Symbolic);
        assert_eq!(c.lhs, "12");
        assert_eq!(c.rhs, "30");
    }

    #[test]
    fn test_extract_needs_two_literals() {
        assert!(Calculation::extract("calculate 5", Notation::Spelled).is_none());
        assert!(Calculation::extract("no numbers", Notation::Symbolic).is_none());
    }

    #[test]
    fn test_symbolic_operators() {
        assert_eq!(calc("3 + 4", Notation::Symbolic).evaluate().result(), Some(Number::Integer(7)));
        assert_eq!(calc("10 - 4", Notation::Symbolic).evaluate().result(), Some(Number::Integer(6)));
        assert_eq!(calc("6 * 7", Notation::Symbolic).evaluate().result(), Some(Number::Integer(42)));
        assert_eq!(calc("9 / 2", Notation::Symbolic).evaluate().result(), Some(Number::Real(4.5)));
    }

    #[test]
    fn test_operator_priority_order() {
        // Addition keywords are checked before anything else
        assert_eq!(Operator::resolve("5 * 3 plus", Notation::Symbolic), Operator::Add);
        // Subtraction before multiplication
        assert_eq!(Operator::resolve("2-3*4", Notation::Symbolic), Operator::Subtract);
        assert_eq!(Operator::resolve("8 DIVIDE 2", Notation::Symbolic), Operator::Divide);
        assert_eq!(Operator::resolve("8 over 2", Notation::Symbolic), Operator::Add);
    }

    #[test]
    fn test_spelled_ignores_symbols_and_divide() {
        assert_eq!(Operator::resolve("7 TIMES 5", Notation::Spelled), Operator::Multiply);
        assert_eq!(Operator::resolve("calculate 8 divide 2", Notation::Spelled), Operator::Add);
    }

    #[test]
    fn test_order_sensitivity() {
        let a = calc("10 - 3", Notation::Symbolic).evaluate().result();
        let b = calc("3 - 10", Notation::Symbolic).evaluate().result();
        assert_eq!(a, Some(Number::Integer(7)));
        assert_eq!(b, Some(Number::Integer(-7)));

        let a = calc("4 * 5", Notation::Symbolic).evaluate().result();
        let b = calc("5 * 4", Notation::Symbolic).evaluate().result();
        assert_eq!(a, b);
    }

    #[test]
    fn test_division_by_zero_is_zero() {
        let outcome = calc("8 / 0", Notation::Symbolic).evaluate();
        assert_eq!(outcome.result(), Some(Number::Integer(0)));
        assert_eq!(serde_json::to_value(&outcome).unwrap(), json!({"result": 0}));
    }

    #[test]
    fn test_spelled_results_are_real() {
        let outcome = calc("What is 7 plus 5?", Notation::Spelled).evaluate();
        assert_eq!(outcome.result(), Some(Number::Real(12.0)));
        assert_eq!(serde_json::to_value(&outcome).unwrap(), json!({"result": 12.0}));
    }

    #[test]
    fn test_overflow_is_invalid() {
        let outcome = calc("99999999999999999999 + 1", Notation::Symbolic).evaluate();
        assert_eq!(outcome, CalcOutcome::invalid());
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"error": "Invalid calculation"})
        );

        let outcome = calc("9223372036854775807 * 2", Notation::Symbolic).evaluate();
        assert_eq!(outcome.result(), None);
    }

    #[test]
    fn test_display_symbolic_normalizes_literals() {
        assert_eq!(calc("012/4", Notation::Symbolic).to_string(), "12 / 4");
        assert_eq!(calc("5 - 3", Notation::Symbolic).to_string(), "5 - 3");
    }

    #[test]
    fn test_display_spelled_is_raw_sum() {
        assert_eq!(calc("007 plus 5", Notation::Spelled).to_string(), "007 + 5");
        assert_eq!(calc("9 minus 4", Notation::Spelled).to_string(), "9 + 4");
        assert_eq!(calc("3 times 2", Notation::Spelled).to_string(), "3 + 2");
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Number::Integer(3).to_string(), "3");
        assert_eq!(Number::Real(12.0).to_string(), "12.0");
    }

    #[test]
    fn test_has_digit() {
        assert!(has_digit("calculate 5"));
        assert!(!has_digit("calculate five"));
    }
}
