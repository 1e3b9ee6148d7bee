#![cfg_attr(not(test), no_std)]
//! # mathex
//!
//! A minimal, extensible, no_std-friendly recursive-descent parser and
//! evaluator for math expressions.
//!
//! An expression string is compiled once into a reusable [`AstExpr`] tree.
//! Variable references inside the tree are bound by *name*, not by value:
//! every call to [`ExprParser::eval`] re-reads the engine's variable table,
//! so one parsed expression can be re-evaluated cheaply while its inputs
//! change between calls. Function and operator references, by contrast, are
//! bound to the registered implementation at parse time.
//!
//! ## Quick start
//!
//! ```rust
//! use mathex::interp;
//!
//! assert_eq!(interp("2+3*5").unwrap(), 17.0);
//! assert_eq!(interp("2*(5+7)").unwrap(), 24.0);
//! assert_eq!(interp("max((2+3),(2+2))").unwrap(), 5.0);
//! ```
//!
//! ## Re-evaluating with live variables
//!
//! ```rust
//! use mathex::ExprParser;
//!
//! let mut parser = ExprParser::new();
//! parser.add_variable("x", 3.0).unwrap();
//!
//! let expr = parser.parse("x^2").unwrap();
//! assert_eq!(parser.eval(&expr).unwrap(), 9.0);
//!
//! // The tree survives table mutation; evaluation sees the new value.
//! parser.add_variable("x", 5.0).unwrap();
//! assert_eq!(parser.eval(&expr).unwrap(), 25.0);
//! ```
//!
//! ## Extending the catalog
//!
//! ```rust
//! use mathex::ExprParser;
//!
//! let mut parser = ExprParser::new();
//! parser.add_function("twice", |a| 2.0 * a).unwrap();
//! parser.add_binary_operator("%", |a, b| a % b).unwrap();
//!
//! let expr = parser.parse("twice(5)+14%4").unwrap();
//! assert_eq!(parser.eval(&expr).unwrap(), 12.0);
//! ```
//!
//! The built-in catalog (trigonometric, hyperbolic, power, logarithm and
//! rounding families, plus the `^` and relational operators and the `e`
//! scientific-notation operator) is data, not code: any entry can be
//! replaced or removed at runtime, and the next parse picks the change up.
//!
//! One parser instance is single-threaded: the parse cursor and symbol
//! tables are engine state, so concurrent `parse` calls through one
//! instance are not supported. Already-built trees only *read* the tables
//! during evaluation.

extern crate alloc;

pub mod context;
pub mod engine;
pub mod error;
pub mod eval;
pub mod functions;
pub mod types;

pub use context::EvalContext;
pub use engine::{ExprParser, interp};
pub use error::{ExprError, Result};
pub use eval::eval_ast;
pub use types::*;

/// Numeric type used throughout the engine. All evaluation is IEEE 754
/// double precision.
pub type Real = f64;

pub mod constants {
    use super::Real;

    pub const PI: Real = core::f64::consts::PI;
    pub const E: Real = core::f64::consts::E;
    pub const TEST_PRECISION: Real = 1e-10;
}

/// Utility macro to check that two floating point values are approximately
/// equal within an epsilon (default [`constants::TEST_PRECISION`]).
/// NaN compares equal to NaN here, unlike `==`.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr $(,)?) => {
        $crate::assert_approx_eq!($left, $right, $crate::constants::TEST_PRECISION)
    };
    ($left:expr, $right:expr, $epsilon:expr $(,)?) => {{
        let left_val: $crate::Real = $left;
        let right_val: $crate::Real = $right;
        let eps = $epsilon;

        if left_val.is_nan() && right_val.is_nan() {
            // NaN == NaN for our purposes
        } else if left_val.is_infinite()
            && right_val.is_infinite()
            && left_val.signum() == right_val.signum()
        {
            // Same-signed infinities are equal
        } else {
            assert!(
                (left_val - right_val).abs() < eps,
                "assertion failed: `(left ≈ right)` (left: `{}`, right: `{}`, epsilon: `{}`)",
                left_val,
                right_val,
                eps
            );
        }
    }};
}
