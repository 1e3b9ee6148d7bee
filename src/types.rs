//! Core data structures: the expression tree, registered-function handles,
//! and the bounded symbol-table types.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use core::fmt;

use crate::Real;
use crate::error::{ExprError, Result};

/// Maximum number of entries per symbol table. `heapless` index maps
/// require a power-of-two capacity.
pub const MAX_VARIABLES: usize = 64;
pub const MAX_UNARY_FUNCTIONS: usize = 64;
pub const MAX_BINARY_FUNCTIONS: usize = 16;
pub const MAX_OPERATORS: usize = 16;

/// Maximum length in bytes of a variable, function, or operator name.
pub const MAX_NAME_LENGTH: usize = 32;

/// Fixed-capacity string used as a symbol-table key.
pub type HString = heapless::String<MAX_NAME_LENGTH>;

pub type VariableMap = heapless::FnvIndexMap<HString, Real, MAX_VARIABLES>;
pub type UnaryFunctionMap = heapless::FnvIndexMap<HString, UnaryFunction, MAX_UNARY_FUNCTIONS>;
pub type BinaryFunctionMap = heapless::FnvIndexMap<HString, BinaryFunction, MAX_BINARY_FUNCTIONS>;
pub type OperatorMap = heapless::FnvIndexMap<HString, BinaryFunction, MAX_OPERATORS>;

/// Fallible conversion into a fixed-capacity key string.
pub trait TryIntoHeaplessString {
    fn try_into_heapless(&self) -> Result<HString>;
}

impl TryIntoHeaplessString for str {
    fn try_into_heapless(&self) -> Result<HString> {
        HString::try_from(self).map_err(|_| ExprError::StringTooLong)
    }
}

/// A registered one-argument function.
///
/// The implementation is reference-counted so that expression trees built
/// from it stay callable after the catalog entry is replaced or removed:
/// function bindings are resolved at parse time.
#[derive(Clone)]
pub struct UnaryFunction {
    /// Name under which the function was registered.
    pub name: HString,
    /// The implementation as a Rust closure.
    pub implementation: Rc<dyn Fn(Real) -> Real>,
}

/// A registered two-argument function or infix operator.
#[derive(Clone)]
pub struct BinaryFunction {
    pub name: HString,
    pub implementation: Rc<dyn Fn(Real, Real) -> Real>,
}

impl fmt::Debug for UnaryFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnaryFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for BinaryFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A parsed expression tree.
///
/// Trees are logically immutable once built and hold no reference to the
/// parse cursor, only variable *names* and captured function handles, so a
/// tree from an earlier parse stays evaluable after the engine's tables are
/// mutated or the engine parses something else.
#[derive(Clone)]
pub enum AstExpr {
    /// A literal numeric value.
    Constant(Real),

    /// A named variable reference, looked up in the live variable table at
    /// every evaluation.
    Variable(String),

    /// Unary minus. (Unary plus never produces a node.)
    Neg(Box<AstExpr>),

    /// A one-argument function application, e.g. `sin(x)`.
    UnaryFn {
        name: String,
        func: Rc<dyn Fn(Real) -> Real>,
        arg: Box<AstExpr>,
    },

    /// A two-argument prefix function, e.g. `max(a, b)`.
    BinaryFn {
        name: String,
        func: Rc<dyn Fn(Real, Real) -> Real>,
        left: Box<AstExpr>,
        right: Box<AstExpr>,
    },

    /// An infix operator application, e.g. `a ^ b` or `5 e 7`.
    ///
    /// Also used for the `+ - * /` chain steps, where `left` is a constant
    /// frozen from the parse-time value of the accumulated left operand.
    BinaryOp {
        symbol: String,
        func: Rc<dyn Fn(Real, Real) -> Real>,
        left: Box<AstExpr>,
        right: Box<AstExpr>,
    },
}

impl fmt::Debug for AstExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstExpr::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            AstExpr::Variable(name) => f.debug_tuple("Variable").field(name).finish(),
            AstExpr::Neg(inner) => f.debug_tuple("Neg").field(inner).finish(),
            AstExpr::UnaryFn { name, arg, .. } => f
                .debug_struct("UnaryFn")
                .field("name", name)
                .field("arg", arg)
                .finish_non_exhaustive(),
            AstExpr::BinaryFn {
                name, left, right, ..
            } => f
                .debug_struct("BinaryFn")
                .field("name", name)
                .field("left", left)
                .field("right", right)
                .finish_non_exhaustive(),
            AstExpr::BinaryOp {
                symbol,
                left,
                right,
                ..
            } => f
                .debug_struct("BinaryOp")
                .field("symbol", symbol)
                .field("left", left)
                .field("right", right)
                .finish_non_exhaustive(),
        }
    }
}
