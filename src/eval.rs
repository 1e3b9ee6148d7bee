//! Recursive tree interpreter.
//!
//! Evaluation takes the context as an explicit read-only parameter. The
//! tree holds variable names and captured function handles, never table
//! references, which keeps the contract visible at the call site: function
//! bindings are whatever was registered at parse time, variable values are
//! whatever the table holds right now.

use crate::context::EvalContext;
use crate::error::{ExprError, Result};
use crate::types::AstExpr;
use crate::Real;

/// Evaluates a parsed tree against the given context's variable table.
///
/// Numeric edge cases follow IEEE 754: division by zero yields a signed
/// infinity or NaN rather than an error. The only failure is a variable
/// name that is no longer in the table.
pub fn eval_ast(expr: &AstExpr, ctx: &EvalContext) -> Result<Real> {
    match expr {
        AstExpr::Constant(value) => Ok(*value),
        AstExpr::Variable(name) => {
            ctx.lookup_variable(name)
                .ok_or_else(|| ExprError::UnknownVariable { name: name.clone() })
        }
        AstExpr::Neg(inner) => Ok(-eval_ast(inner, ctx)?),
        AstExpr::UnaryFn { func, arg, .. } => {
            let value = eval_ast(arg, ctx)?;
            Ok(func(value))
        }
        AstExpr::BinaryFn {
            func, left, right, ..
        }
        | AstExpr::BinaryOp {
            func, left, right, ..
        } => {
            let a = eval_ast(left, ctx)?;
            let b = eval_ast(right, ctx)?;
            Ok(func(a, b))
        }
    }
}
