use std::cmp::Ordering;

use super::EachValidator;
use crate::errors::ErrorKind;
use crate::value::Value;

/// Value must be a number, optionally an integer, within the given bounds.
///
/// Integers and floats are numbers. Strings count when they parse as one after
/// trimming. Anything else, nil included, is `not_a_number`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Numericality {
    only_integer: bool,
    greater_than: Option<f64>,
    greater_than_or_equal_to: Option<f64>,
    equal_to: Option<f64>,
    less_than: Option<f64>,
    less_than_or_equal_to: Option<f64>,
    other_than: Option<f64>,
    odd: bool,
    even: bool,
}

impl Numericality {
    pub fn only_integer(mut self) -> Self {
        self.only_integer = true;
        self
    }

    pub fn greater_than(mut self, n: f64) -> Self {
        self.greater_than = Some(n);
        self
    }

    pub fn greater_than_or_equal_to(mut self, n: f64) -> Self {
        self.greater_than_or_equal_to = Some(n);
        self
    }

    pub fn equal_to(mut self, n: f64) -> Self {
        self.equal_to = Some(n);
        self
    }

    pub fn less_than(mut self, n: f64) -> Self {
        self.less_than = Some(n);
        self
    }

    pub fn less_than_or_equal_to(mut self, n: f64) -> Self {
        self.less_than_or_equal_to = Some(n);
        self
    }

    pub fn other_than(mut self, n: f64) -> Self {
        self.other_than = Some(n);
        self
    }

    pub fn odd(mut self) -> Self {
        self.odd = true;
        self
    }

    pub fn even(mut self) -> Self {
        self.even = true;
        self
    }

    fn parse(&self, value: &Value) -> Result<Number, ErrorKind> {
        match value {
            Value::Int(n) => Ok(Number::Int(*n)),
            Value::Float(f) => self.float(*f),
            Value::Str(s) => {
                let s = s.trim();
                if let Ok(n) = s.parse::<i64>() {
                    return Ok(Number::Int(n));
                }
                s.parse::<f64>()
                    .map_err(|_| ErrorKind::NotANumber)
                    .and_then(|f| self.float(f))
            }
            _ => Err(ErrorKind::NotANumber),
        }
    }

    fn float(&self, f: f64) -> Result<Number, ErrorKind> {
        if !f.is_finite() {
            Err(ErrorKind::NotANumber)
        } else if self.only_integer && f.fract() != 0.0 {
            Err(ErrorKind::NotAnInteger)
        } else {
            Ok(Number::Float(f))
        }
    }
}

/// A parsed number. Integers keep full `i64` precision.
#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Integers compare exactly against integral bounds in `i64` range.
    fn compare(self, bound: f64) -> Ordering {
        match self {
            Number::Int(n) if bound.fract() == 0.0 && bound.abs() < I64_LIMIT => {
                n.cmp(&(bound as i64))
            }
            Number::Int(n) => (n as f64).total_cmp(&bound),
            Number::Float(f) => f.total_cmp(&bound),
        }
    }

    /// `Some(true)` for odd, `Some(false)` for even, `None` for fractions.
    fn is_odd(self) -> Option<bool> {
        match self {
            Number::Int(n) => Some(n.rem_euclid(2) == 1),
            Number::Float(f) if f.fract() == 0.0 => Some(f.rem_euclid(2.0) == 1.0),
            Number::Float(_) => None,
        }
    }
}

/// 2^63; every integral `f64` below it in magnitude fits an `i64`.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

impl EachValidator for Numericality {
    fn kind(&self) -> &'static str {
        "numericality"
    }

    fn check(&self, value: &Value) -> Vec<ErrorKind> {
        let n = match self.parse(value) {
            Ok(n) => n,
            Err(kind) => return vec![kind],
        };

        let mut kinds = Vec::new();
        if let Some(count) = self.greater_than.filter(|c| n.compare(*c).is_le()) {
            kinds.push(ErrorKind::GreaterThan { count });
        }
        if let Some(count) = self.greater_than_or_equal_to.filter(|c| n.compare(*c).is_lt()) {
            kinds.push(ErrorKind::GreaterThanOrEqualTo { count });
        }
        if let Some(count) = self.equal_to.filter(|c| n.compare(*c).is_ne()) {
            kinds.push(ErrorKind::EqualTo { count });
        }
        if let Some(count) = self.less_than.filter(|c| n.compare(*c).is_ge()) {
            kinds.push(ErrorKind::LessThan { count });
        }
        if let Some(count) = self.less_than_or_equal_to.filter(|c| n.compare(*c).is_gt()) {
            kinds.push(ErrorKind::LessThanOrEqualTo { count });
        }
        if let Some(count) = self.other_than.filter(|c| n.compare(*c).is_eq()) {
            kinds.push(ErrorKind::OtherThan { count });
        }
        if self.odd && n.is_odd() != Some(true) {
            kinds.push(ErrorKind::Odd);
        }
        if self.even && n.is_odd() != Some(false) {
            kinds.push(ErrorKind::Even);
        }
        kinds
    }
}
