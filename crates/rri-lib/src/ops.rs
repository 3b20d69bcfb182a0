//! Operator semantics for [`RRi`].
//!
//! Operators fall in two categories. Arithmetic maps values elementwise and
//! yields a new series on the left operand's time axis. Comparison maps
//! values elementwise to a boolean mask and never yields a series.
//!
//! Arithmetic results are not re-validated, so `&rri - 1000.0` may hold
//! non-positive intervals. Selecting from such a series (slice, mask,
//! time range, split) runs validation again and reports the violation.

use crate::error::{RRiError, Result};
use crate::series::RRi;
use std::ops::{Add, Div, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl ArithOp {
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            ArithOp::Add => lhs + rhs,
            ArithOp::Sub => lhs - rhs,
            ArithOp::Mul => lhs * rhs,
            ArithOp::Div => lhs / rhs,
            ArithOp::Pow => lhs.powf(rhs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CmpOp {
    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CmpOp::Eq => lhs == rhs,
            CmpOp::Ne => lhs != rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Ge => lhs >= rhs,
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
        }
    }
}

/// Right-hand side of an arithmetic operation.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    Scalar(f64),
    Series(&'a RRi),
}

impl From<f64> for Operand<'_> {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}

impl<'a> From<&'a RRi> for Operand<'a> {
    fn from(value: &'a RRi) -> Self {
        Operand::Series(value)
    }
}

impl RRi {
    /// Elementwise arithmetic against a scalar or a series of equal length.
    pub fn arith<'a>(&self, op: ArithOp, rhs: impl Into<Operand<'a>>) -> Result<RRi> {
        let values = match rhs.into() {
            Operand::Scalar(s) => self.values().iter().map(|&v| op.apply(v, s)).collect(),
            Operand::Series(other) => {
                if other.len() != self.len() {
                    return Err(RRiError::LengthMismatch);
                }
                self.values()
                    .iter()
                    .zip(other.values())
                    .map(|(&a, &b)| op.apply(a, b))
                    .collect()
            }
        };
        Ok(self.with_values_unchecked(values))
    }

    fn arith_scalar(&self, op: ArithOp, rhs: f64) -> RRi {
        let values = self.values().iter().map(|&v| op.apply(v, rhs)).collect();
        self.with_values_unchecked(values)
    }

    pub fn powf(&self, exponent: f64) -> RRi {
        self.arith_scalar(ArithOp::Pow, exponent)
    }

    pub fn pow_series(&self, exponents: &RRi) -> Result<RRi> {
        self.arith(ArithOp::Pow, exponents)
    }

    pub fn abs(&self) -> RRi {
        self.with_values_unchecked(self.values().iter().map(|v| v.abs()).collect())
    }

    pub fn compare(&self, op: CmpOp, rhs: f64) -> Vec<bool> {
        self.values().iter().map(|&v| op.apply(v, rhs)).collect()
    }

    pub fn eq_values(&self, rhs: f64) -> Vec<bool> {
        self.compare(CmpOp::Eq, rhs)
    }

    pub fn ne_values(&self, rhs: f64) -> Vec<bool> {
        self.compare(CmpOp::Ne, rhs)
    }

    pub fn gt(&self, rhs: f64) -> Vec<bool> {
        self.compare(CmpOp::Gt, rhs)
    }

    pub fn ge(&self, rhs: f64) -> Vec<bool> {
        self.compare(CmpOp::Ge, rhs)
    }

    pub fn lt(&self, rhs: f64) -> Vec<bool> {
        self.compare(CmpOp::Lt, rhs)
    }

    pub fn le(&self, rhs: f64) -> Vec<bool> {
        self.compare(CmpOp::Le, rhs)
    }
}

macro_rules! impl_arith {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait<f64> for &RRi {
            type Output = RRi;

            fn $method(self, rhs: f64) -> RRi {
                self.arith_scalar($op, rhs)
            }
        }

        impl $trait<f64> for RRi {
            type Output = RRi;

            fn $method(self, rhs: f64) -> RRi {
                self.arith_scalar($op, rhs)
            }
        }

        impl $trait<&RRi> for &RRi {
            type Output = Result<RRi>;

            fn $method(self, rhs: &RRi) -> Result<RRi> {
                self.arith($op, rhs)
            }
        }
    };
}

impl_arith!(Add, add, ArithOp::Add);
impl_arith!(Sub, sub, ArithOp::Sub);
impl_arith!(Mul, mul, ArithOp::Mul);
impl_arith!(Div, div, ArithOp::Div);
