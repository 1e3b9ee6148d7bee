//! Built-in mathematical functions for expression evaluation.
//!
//! Everything here goes through the `libm` crate so the catalog works in
//! no_std environments. These are the seed entries for the context's
//! function and operator tables; callers may replace or remove any of them
//! at runtime, and a re-parse picks the change up immediately.
//!
//! Out-of-domain inputs follow IEEE 754 semantics (NaN/infinity), never an
//! error: `1/0` is infinity, `sqrt(-1)` and `ln(-1)` are NaN.

use crate::Real;

// Arithmetic used by the `+ - * /` chain nodes.

pub fn add(a: Real, b: Real) -> Real {
    a + b
}

pub fn sub(a: Real, b: Real) -> Real {
    a - b
}

pub fn mul(a: Real, b: Real) -> Real {
    a * b
}

pub fn div(a: Real, b: Real) -> Real {
    a / b
}

// Binary operators.

pub fn pow(a: Real, b: Real) -> Real {
    libm::pow(a, b)
}

/// Relational operators encode truth as exactly `1.0` and falsehood as
/// exactly `0.0`; there is no boolean type in the expression language.
pub fn gt(a: Real, b: Real) -> Real {
    if a > b { 1.0 } else { 0.0 }
}

pub fn lt(a: Real, b: Real) -> Real {
    if a < b { 1.0 } else { 0.0 }
}

pub fn ge(a: Real, b: Real) -> Real {
    if a >= b { 1.0 } else { 0.0 }
}

pub fn le(a: Real, b: Real) -> Real {
    if a <= b { 1.0 } else { 0.0 }
}

/// Tolerance-free equality.
pub fn eq(a: Real, b: Real) -> Real {
    if a == b { 1.0 } else { 0.0 }
}

pub fn ne(a: Real, b: Real) -> Real {
    if a != b { 1.0 } else { 0.0 }
}

/// The scientific-notation operator: `5 e 7` composes `5 * 10^7`.
pub fn sci(a: Real, b: Real) -> Real {
    a * libm::pow(10.0, b)
}

// Binary functions.

pub fn max(a: Real, b: Real) -> Real {
    if a > b { a } else { b }
}

pub fn min(a: Real, b: Real) -> Real {
    if a < b { a } else { b }
}

pub fn hypot(a: Real, b: Real) -> Real {
    libm::hypot(a, b)
}

/// Logarithm of `a` in base `b`.
pub fn log_base(a: Real, b: Real) -> Real {
    libm::log(a) / libm::log(b)
}

// Trigonometric family.

pub fn sin(a: Real) -> Real {
    libm::sin(a)
}

pub fn cos(a: Real) -> Real {
    libm::cos(a)
}

pub fn tg(a: Real) -> Real {
    libm::tan(a)
}

pub fn ctg(a: Real) -> Real {
    1.0 / libm::tan(a)
}

pub fn sec(a: Real) -> Real {
    1.0 / libm::sin(a)
}

pub fn cosec(a: Real) -> Real {
    1.0 / libm::cos(a)
}

pub fn arcsin(a: Real) -> Real {
    libm::asin(a)
}

pub fn arccos(a: Real) -> Real {
    libm::acos(a)
}

pub fn arctg(a: Real) -> Real {
    libm::atan(a)
}

pub fn arcsec(a: Real) -> Real {
    libm::asin(1.0 / a)
}

pub fn arccosec(a: Real) -> Real {
    libm::acos(1.0 / a)
}

pub fn arcctg(a: Real) -> Real {
    libm::atan(1.0 / a)
}

// Hyperbolic family.

pub fn sh(a: Real) -> Real {
    libm::sinh(a)
}

pub fn ch(a: Real) -> Real {
    libm::cosh(a)
}

pub fn th(a: Real) -> Real {
    libm::tanh(a)
}

pub fn cth(a: Real) -> Real {
    1.0 / libm::tanh(a)
}

pub fn sech(a: Real) -> Real {
    1.0 / libm::sinh(a)
}

pub fn cosech(a: Real) -> Real {
    1.0 / libm::cosh(a)
}

pub fn arcsh(a: Real) -> Real {
    libm::asinh(a)
}

pub fn arcch(a: Real) -> Real {
    libm::acosh(a)
}

pub fn arcth(a: Real) -> Real {
    libm::atanh(a)
}

pub fn arcsech(a: Real) -> Real {
    libm::asinh(1.0 / a)
}

pub fn arccosech(a: Real) -> Real {
    libm::acosh(1.0 / a)
}

pub fn arccth(a: Real) -> Real {
    libm::atanh(1.0 / a)
}

// Power and root family.

pub fn sqr(a: Real) -> Real {
    a * a
}

pub fn cube(a: Real) -> Real {
    a * a * a
}

pub fn sqrt(a: Real) -> Real {
    libm::sqrt(a)
}

pub fn cbrt(a: Real) -> Real {
    libm::cbrt(a)
}

// Exponential and logarithm family.

pub fn exp(a: Real) -> Real {
    libm::exp(a)
}

pub fn ln(a: Real) -> Real {
    libm::log(a)
}

pub fn log2(a: Real) -> Real {
    libm::log10(a) / libm::log10(2.0)
}

pub fn log4(a: Real) -> Real {
    libm::log10(a) / libm::log10(4.0)
}

pub fn log8(a: Real) -> Real {
    libm::log10(a) / libm::log10(8.0)
}

pub fn log10(a: Real) -> Real {
    libm::log10(a)
}

pub fn log16(a: Real) -> Real {
    libm::log10(a) / libm::log10(16.0)
}

// Sign, magnitude, rounding.

pub fn signum(a: Real) -> Real {
    if a > 0.0 {
        1.0
    } else if a < 0.0 {
        -1.0
    } else {
        a
    }
}

pub fn abs(a: Real) -> Real {
    libm::fabs(a)
}

pub fn floor(a: Real) -> Real {
    libm::floor(a)
}

pub fn ceil(a: Real) -> Real {
    libm::ceil(a)
}

pub fn round(a: Real) -> Real {
    libm::round(a)
}
