use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decoder::RangeValidator;
use crate::error::InterpolationError;

/// A single point `(x, y)` on the sharing polynomial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Share {
    pub x: i64,
    pub y: BigInt,
}

impl Share {
    pub fn new(x: i64, y: impl Into<BigInt>) -> Self {
        Share { x, y: y.into() }
    }
}

/// How the Lagrange basis products are divided.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Keep every term as an exact fraction and divide once at the end.
    #[default]
    Exact,
    /// Divide after every factor with truncation, in input order.
    Eager,
}

#[derive(Clone, Debug, Default)]
pub struct Interpolator {
    strategy: Strategy,
    validator: RangeValidator,
}

impl Interpolator {
    pub fn new(strategy: Strategy, validator: RangeValidator) -> Self {
        Interpolator {
            strategy,
            validator,
        }
    }

    /// Evaluates the interpolating polynomial at zero and range-checks the
    /// result.
    pub fn interpolate(&self, points: &[Share]) -> Result<BigInt, InterpolationError> {
        let secret = self.constant_term(points)?;
        self.validator.validate(&secret)?;
        Ok(secret)
    }

    /// Same as [`Interpolator::interpolate`] without the range check.
    pub fn constant_term(&self, points: &[Share]) -> Result<BigInt, InterpolationError> {
        match self.strategy {
            Strategy::Exact => lagrange_at_zero_exact(points),
            Strategy::Eager => lagrange_at_zero_eager(points),
        }
    }
}

fn check_points(points: &[Share]) -> Result<(), InterpolationError> {
    if points.is_empty() {
        return Err(InterpolationError::NoPoints);
    }
    for (i, a) in points.iter().enumerate() {
        if points[i + 1..].iter().any(|b| b.x == a.x) {
            return Err(InterpolationError::DivisionByZero(a.x));
        }
    }
    Ok(())
}

/// Performs a Lagrange interpolation over the integers at the origin.
///
/// Term `i` is `y_i * prod(-x_j) / prod(x_i - x_j)`. Terms are added as
/// reduced fractions and the total must divide exactly.
pub fn lagrange_at_zero_exact(points: &[Share]) -> Result<BigInt, InterpolationError> {
    check_points(points)?;

    let mut acc_num = BigInt::zero();
    let mut acc_den = BigInt::one();

    for (i, share) in points.iter().enumerate() {
        let xi = BigInt::from(share.x);
        let mut num = share.y.clone();
        let mut den = BigInt::one();

        for (j, other) in points.iter().enumerate() {
            if i != j {
                let xj = BigInt::from(other.x);
                num *= -&xj;
                den *= &xi - &xj;
            }
        }

        // a/b + c/d = (a*d + c*b) / (b*d)
        acc_num = &acc_num * &den + &num * &acc_den;
        acc_den *= den;
        reduce(&mut acc_num, &mut acc_den);
    }

    let (quotient, remainder) = acc_num.div_rem(&acc_den);
    if !remainder.is_zero() {
        return Err(InterpolationError::InexactDivision {
            numerator: acc_num,
            denominator: acc_den,
        });
    }
    debug!(points = points.len(), secret = %quotient, "exact interpolation done");
    Ok(quotient)
}

/// Lagrange interpolation at the origin that truncates after every factor.
///
/// Matches implementations that compute `term = term * (-x_j) / (x_i - x_j)`
/// in place. The result depends on point order when a partial product is
/// not divisible.
pub fn lagrange_at_zero_eager(points: &[Share]) -> Result<BigInt, InterpolationError> {
    check_points(points)?;

    let mut acc = BigInt::zero();
    for (i, share) in points.iter().enumerate() {
        let xi = BigInt::from(share.x);
        let mut term = share.y.clone();
        for (j, other) in points.iter().enumerate() {
            if i != j {
                let xj = BigInt::from(other.x);
                // BigInt division truncates toward zero.
                term = term * -&xj / (&xi - &xj);
            }
        }
        acc += term;
    }
    debug!(points = points.len(), secret = %acc, "eager interpolation done");
    Ok(acc)
}

fn reduce(num: &mut BigInt, den: &mut BigInt) {
    if den.is_negative() {
        *num = -&*num;
        *den = -&*den;
    }
    let g = num.gcd(den);
    if !g.is_zero() && !g.is_one() {
        *num /= &g;
        *den /= &g;
    }
}
