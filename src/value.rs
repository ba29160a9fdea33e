//! Typed runtime values and the arithmetic / comparison kernels that
//! operate on them.

use std::fmt;

use crate::ast::{ArithOp, RelOp};
use crate::error::{Error, Result};

/// Declared type of a variable or of a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Integer,
    Decimal,
    Text,
}

impl ValueType {
    /// Parse a type name as written in scripts (`int`, `dec`, `text`, …).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "int" | "integer" => Some(Self::Integer),
            "dec" | "decimal" => Some(Self::Decimal),
            "text" | "string" | "str" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Integer => "int",
            Self::Decimal => "dec",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Integer(_) => ValueType::Integer,
            Self::Decimal(_) => ValueType::Decimal,
            Self::Text(_) => ValueType::Text,
        }
    }

    /// Parse a bare numeric literal: Integer without a decimal point,
    /// Decimal with one. Anything else (including `inf`, `1e5`) is `None`.
    pub fn parse_number(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('-').unwrap_or(s);
        if digits.is_empty() || digits.starts_with('.') && digits.len() == 1 {
            return None;
        }
        let mut dots = 0;
        for c in digits.chars() {
            match c {
                '0'..='9' => {}
                '.' => dots += 1,
                _ => return None,
            }
        }
        match dots {
            0 => s.parse().ok().map(Self::Integer),
            1 => s.parse().ok().map(Self::Decimal),
            _ => None,
        }
    }

    /// Convert raw input text into a value of type `ty`.
    pub fn parse_as(text: &str, ty: ValueType) -> Result<Self> {
        let trimmed = text.trim();
        match ty {
            ValueType::Text => Ok(Self::Text(text.to_string())),
            ValueType::Integer | ValueType::Decimal => match Self::parse_number(trimmed) {
                Some(v) if v.value_type() == ty => Ok(v),
                _ => Err(Error::type_mismatch(format!(
                    "'{}' is not a valid {} value",
                    trimmed, ty
                ))),
            },
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Decimal(d) => Some(*d),
            Self::Text(_) => None,
        }
    }

    /// Apply one arithmetic operator.
    ///
    /// Integer `+ - *` stay Integer (overflow is an error); `/` always
    /// produces a Decimal. Any Decimal operand makes the result Decimal.
    pub fn arith(&self, op: ArithOp, rhs: &Value) -> Result<Value> {
        if let (Self::Integer(a), Self::Integer(b)) = (self, rhs) {
            let checked = match op {
                ArithOp::Add => a.checked_add(*b),
                ArithOp::Sub => a.checked_sub(*b),
                ArithOp::Mul => a.checked_mul(*b),
                ArithOp::Div => {
                    if *b == 0 {
                        return Err(Error::Arithmetic("division by zero".into()));
                    }
                    return Ok(Self::Decimal(*a as f64 / *b as f64));
                }
            };
            return checked.map(Self::Integer).ok_or_else(|| {
                Error::Arithmetic(format!("integer overflow in {} {} {}", a, op, b))
            });
        }

        let (a, b) = match (self.as_f64(), rhs.as_f64()) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(Error::type_mismatch(format!(
                    "operator '{}' needs numeric operands, got {} and {}",
                    op,
                    self.value_type(),
                    rhs.value_type()
                )))
            }
        };
        let result = match op {
            ArithOp::Add => a + b,
            ArithOp::Sub => a - b,
            ArithOp::Mul => a * b,
            ArithOp::Div => {
                if b == 0.0 {
                    return Err(Error::Arithmetic("division by zero".into()));
                }
                a / b
            }
        };
        Ok(Self::Decimal(result))
    }

    /// Apply one relational or substring operator.
    pub fn compare(&self, op: RelOp, rhs: &Value) -> Result<bool> {
        match op {
            RelOp::Eq | RelOp::Ne => {
                let equal = match (self, rhs) {
                    (Self::Text(a), Self::Text(b)) => a == b,
                    _ => match (self.as_f64(), rhs.as_f64()) {
                        (Some(a), Some(b)) => a == b,
                        _ => return Err(self.mismatch(op, rhs)),
                    },
                };
                Ok(if op == RelOp::Eq { equal } else { !equal })
            }
            RelOp::Gt | RelOp::Lt | RelOp::Ge | RelOp::Le => {
                let (a, b) = match (self, rhs) {
                    (Self::Integer(a), Self::Integer(b)) => {
                        return Ok(match op {
                            RelOp::Gt => a > b,
                            RelOp::Lt => a < b,
                            RelOp::Ge => a >= b,
                            _ => a <= b,
                        })
                    }
                    _ => match (self.as_f64(), rhs.as_f64()) {
                        (Some(a), Some(b)) => (a, b),
                        _ => return Err(self.mismatch(op, rhs)),
                    },
                };
                Ok(match op {
                    RelOp::Gt => a > b,
                    RelOp::Lt => a < b,
                    RelOp::Ge => a >= b,
                    _ => a <= b,
                })
            }
            RelOp::Contains | RelOp::ContainsIgnoreCase => match (self, rhs) {
                (Self::Text(a), Self::Text(b)) => Ok(if op == RelOp::Contains {
                    a.contains(b.as_str())
                } else {
                    a.to_lowercase().contains(&b.to_lowercase())
                }),
                _ => Err(self.mismatch(op, rhs)),
            },
        }
    }

    fn mismatch(&self, op: RelOp, rhs: &Value) -> Error {
        Error::type_mismatch(format!(
            "operator '{}' cannot compare {} with {}",
            op,
            self.value_type(),
            rhs.value_type()
        ))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{}", i),
            // Keep a visible decimal point on whole decimals: `3.0`, not `3`.
            Self::Decimal(d) if d.fract() == 0.0 && d.is_finite() && d.abs() < 1e15 => {
                write!(f, "{:.1}", d)
            }
            Self::Decimal(d) => write!(f, "{}", d),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_literals_split_on_the_decimal_point() {
        assert_eq!(Value::parse_number("42"), Some(Value::Integer(42)));
        assert_eq!(Value::parse_number("-7"), Some(Value::Integer(-7)));
        assert_eq!(Value::parse_number("2.5"), Some(Value::Decimal(2.5)));
        assert_eq!(Value::parse_number("3."), Some(Value::Decimal(3.0)));
        assert_eq!(Value::parse_number("inf"), None);
        assert_eq!(Value::parse_number("1e5"), None);
        assert_eq!(Value::parse_number("1.2.3"), None);
        assert_eq!(Value::parse_number("-"), None);
        assert_eq!(Value::parse_number("."), None);
    }

    #[test]
    fn division_promotes_to_decimal() {
        let v = Value::Integer(10).arith(ArithOp::Div, &Value::Integer(4)).unwrap();
        assert_eq!(v, Value::Decimal(2.5));
        assert_eq!(v.to_string(), "2.5");
    }

    #[test]
    fn division_by_zero_is_arithmetic_error() {
        let err = Value::Integer(10)
            .arith(ArithOp::Div, &Value::Integer(0))
            .unwrap_err();
        assert!(matches!(err, Error::Arithmetic(_)));
        let err = Value::Decimal(1.5)
            .arith(ArithOp::Div, &Value::Decimal(0.0))
            .unwrap_err();
        assert!(matches!(err, Error::Arithmetic(_)));
    }

    #[test]
    fn integer_ops_stay_integer_and_mixed_ops_become_decimal() {
        assert_eq!(
            Value::Integer(2).arith(ArithOp::Mul, &Value::Integer(3)).unwrap(),
            Value::Integer(6)
        );
        assert_eq!(
            Value::Integer(2).arith(ArithOp::Add, &Value::Decimal(0.5)).unwrap(),
            Value::Decimal(2.5)
        );
        assert!(matches!(
            Value::Integer(i64::MAX).arith(ArithOp::Add, &Value::Integer(1)),
            Err(Error::Arithmetic(_))
        ));
    }

    #[test]
    fn text_rejects_arithmetic() {
        let err = Value::Text("a".into())
            .arith(ArithOp::Add, &Value::Text("b".into()))
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch(_)));
    }

    #[test]
    fn substring_operators() {
        let hay = Value::Text("Hello World".into());
        assert!(hay.compare(RelOp::Contains, &Value::Text("World".into())).unwrap());
        assert!(!hay.compare(RelOp::Contains, &Value::Text("world".into())).unwrap());
        assert!(hay
            .compare(RelOp::ContainsIgnoreCase, &Value::Text("world".into()))
            .unwrap());
        assert!(hay.compare(RelOp::Contains, &Value::Integer(1)).is_err());
    }

    #[test]
    fn relational_operators_are_numeric_only() {
        assert!(Value::Integer(3).compare(RelOp::Lt, &Value::Decimal(3.5)).unwrap());
        assert!(Value::Integer(3).compare(RelOp::Eq, &Value::Decimal(3.0)).unwrap());
        assert!(matches!(
            Value::Text("a".into()).compare(RelOp::Gt, &Value::Text("b".into())),
            Err(Error::TypeMismatch(_))
        ));
        assert!(matches!(
            Value::Text("1".into()).compare(RelOp::Eq, &Value::Integer(1)),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn decimals_display_with_a_point() {
        assert_eq!(Value::Decimal(3.0).to_string(), "3.0");
        assert_eq!(Value::Decimal(-0.25).to_string(), "-0.25");
    }

    #[test]
    fn prompt_text_converts_to_declared_type() {
        assert_eq!(
            Value::parse_as(" 12 ", ValueType::Integer).unwrap(),
            Value::Integer(12)
        );
        assert!(Value::parse_as("12.5", ValueType::Integer).is_err());
        assert!(Value::parse_as("12", ValueType::Decimal).is_err());
        assert_eq!(
            Value::parse_as("hi there", ValueType::Text).unwrap(),
            Value::Text("hi there".into())
        );
    }
}
