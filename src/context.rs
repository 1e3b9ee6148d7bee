//! Evaluation context: the engine's symbol tables.
//!
//! An [`EvalContext`] owns four bounded tables: variables, unary functions,
//! binary functions, and binary operators. The tables are mutated over the
//! engine's lifetime through the add/remove operations here; parsing reads
//! them to resolve identifiers and evaluation reads the variable table on
//! every call.
//!
//! A name may exist both as a variable and as a function. Identifier
//! resolution tries the variable table first, so the variable shadows the
//! function; this precedence is part of the grammar contract.

use alloc::rc::Rc;

use crate::error::{ExprError, Result};
use crate::types::{
    BinaryFunction, BinaryFunctionMap, OperatorMap, TryIntoHeaplessString, UnaryFunction,
    UnaryFunctionMap, VariableMap,
};
use crate::{Real, constants, functions};

/// Symbol tables for one parser instance.
///
/// Created seeded with the mathematical constants `E` and `Pi` and the
/// built-in function and operator catalogs. Not safe for concurrent
/// mutation; evaluation only reads.
///
/// # Examples
///
/// ```
/// use mathex::EvalContext;
///
/// let mut ctx = EvalContext::new();
/// ctx.set_variable("x", 2.0).unwrap();
/// assert_eq!(ctx.variables().len(), 3); // E, Pi, x
///
/// ctx.register_function("double", |a| 2.0 * a).unwrap();
/// assert!(ctx.remove_function("double"));
/// ```
#[derive(Clone)]
pub struct EvalContext {
    variables: VariableMap,
    functions: UnaryFunctionMap,
    binary_functions: BinaryFunctionMap,
    operators: OperatorMap,
}

impl EvalContext {
    /// Creates a context seeded with constants and the built-in catalogs.
    pub fn new() -> Self {
        let mut ctx = Self {
            variables: VariableMap::new(),
            functions: UnaryFunctionMap::new(),
            binary_functions: BinaryFunctionMap::new(),
            operators: OperatorMap::new(),
        };
        ctx.seed_constants();
        ctx.seed_unary_catalog();
        ctx.seed_binary_catalog();
        ctx.seed_operator_catalog();
        ctx
    }

    /// Adds or updates a variable, returning the previous value if any.
    pub fn set_variable(&mut self, name: &str, value: Real) -> Result<Option<Real>> {
        let key = name.try_into_heapless()?;
        self.variables
            .insert(key, value)
            .map_err(|_| ExprError::CapacityExceeded("variables"))
    }

    /// Merges a set of bindings into the variable table, overwriting
    /// same-named entries.
    pub fn set_variables(&mut self, bindings: &[(&str, Real)]) -> Result<()> {
        for (name, value) in bindings {
            self.set_variable(name, *value)?;
        }
        Ok(())
    }

    /// Removes a variable, returning its value if it was present.
    pub fn remove_variable(&mut self, name: &str) -> Option<Real> {
        let key = name.try_into_heapless().ok()?;
        self.variables.remove(&key)
    }

    /// Read-only view of the current variable table.
    pub fn variables(&self) -> &VariableMap {
        &self.variables
    }

    /// Registers a unary function, replacing any same-named entry.
    ///
    /// Expressions already built against the old entry keep the old
    /// implementation; the next parse resolves the new one.
    pub fn register_function<F>(&mut self, name: &str, implementation: F) -> Result<()>
    where
        F: Fn(Real) -> Real + 'static,
    {
        let key = name.try_into_heapless()?;
        let function = UnaryFunction {
            name: key.clone(),
            implementation: Rc::new(implementation),
        };
        self.functions
            .insert(key, function)
            .map(|_| ())
            .map_err(|_| ExprError::CapacityExceeded("functions"))
    }

    /// Removes a unary function by name. Returns whether it existed.
    pub fn remove_function(&mut self, name: &str) -> bool {
        let Ok(key) = name.try_into_heapless() else {
            return false;
        };
        self.functions.remove(&key).is_some()
    }

    /// Read-only view of the unary function catalog.
    pub fn functions(&self) -> &UnaryFunctionMap {
        &self.functions
    }

    /// Registers a two-argument prefix function, e.g. `max`.
    pub fn register_binary_function<F>(&mut self, name: &str, implementation: F) -> Result<()>
    where
        F: Fn(Real, Real) -> Real + 'static,
    {
        let key = name.try_into_heapless()?;
        let function = BinaryFunction {
            name: key.clone(),
            implementation: Rc::new(implementation),
        };
        self.binary_functions
            .insert(key, function)
            .map(|_| ())
            .map_err(|_| ExprError::CapacityExceeded("binary_functions"))
    }

    /// Removes a binary function by name. Returns whether it existed.
    pub fn remove_binary_function(&mut self, name: &str) -> bool {
        let Ok(key) = name.try_into_heapless() else {
            return false;
        };
        self.binary_functions.remove(&key).is_some()
    }

    /// Read-only view of the binary function catalog.
    pub fn binary_functions(&self) -> &BinaryFunctionMap {
        &self.binary_functions
    }

    /// Registers an infix operator under a one- or two-character ASCII
    /// symbol, e.g. `"%"` or `">="`.
    ///
    /// Operator candidates are scanned as the longest run of characters
    /// appearing in any registered symbol, so a symbol sharing characters
    /// with an existing one (like `>` and `>=`) resolves by exact match of
    /// that run, never by registration order.
    pub fn register_operator<F>(&mut self, symbol: &str, implementation: F) -> Result<()>
    where
        F: Fn(Real, Real) -> Real + 'static,
    {
        let key = symbol.try_into_heapless()?;
        let function = BinaryFunction {
            name: key.clone(),
            implementation: Rc::new(implementation),
        };
        self.operators
            .insert(key, function)
            .map(|_| ())
            .map_err(|_| ExprError::CapacityExceeded("operators"))
    }

    /// Removes an operator by symbol. Returns whether it existed.
    pub fn remove_operator(&mut self, symbol: &str) -> bool {
        let Ok(key) = symbol.try_into_heapless() else {
            return false;
        };
        self.operators.remove(&key).is_some()
    }

    /// Read-only view of the operator catalog.
    pub fn operators(&self) -> &OperatorMap {
        &self.operators
    }

    pub(crate) fn lookup_variable(&self, name: &str) -> Option<Real> {
        let key = name.try_into_heapless().ok()?;
        self.variables.get(&key).copied()
    }

    pub(crate) fn lookup_function(&self, name: &str) -> Option<&UnaryFunction> {
        let key = name.try_into_heapless().ok()?;
        self.functions.get(&key)
    }

    pub(crate) fn lookup_binary_function(&self, name: &str) -> Option<&BinaryFunction> {
        let key = name.try_into_heapless().ok()?;
        self.binary_functions.get(&key)
    }

    pub(crate) fn lookup_operator(&self, symbol: &str) -> Option<&BinaryFunction> {
        let key = symbol.try_into_heapless().ok()?;
        self.operators.get(&key)
    }

    /// Whether `c` appears in any registered operator symbol. Drives the
    /// trailing-operator run scan in the parser.
    pub(crate) fn is_operator_char(&self, c: u8) -> bool {
        self.operators.keys().any(|k| k.as_bytes().contains(&c))
    }

    fn seed_constants(&mut self) {
        let _ = self.set_variable("E", constants::E);
        let _ = self.set_variable("Pi", constants::PI);
    }

    // Seed entries use static names that fit the key buffer and counts
    // that fit the table capacities, so the Results are not surfaced.
    fn put_unary(&mut self, name: &'static str, f: fn(Real) -> Real) {
        let _ = self.register_function(name, f);
    }

    fn put_binary(&mut self, name: &'static str, f: fn(Real, Real) -> Real) {
        let _ = self.register_binary_function(name, f);
    }

    fn put_operator(&mut self, symbol: &'static str, f: fn(Real, Real) -> Real) {
        let _ = self.register_operator(symbol, f);
    }

    fn seed_unary_catalog(&mut self) {
        self.put_unary("sin", functions::sin);
        self.put_unary("cos", functions::cos);
        self.put_unary("tg", functions::tg);
        self.put_unary("ctg", functions::ctg);
        self.put_unary("sec", functions::sec);
        self.put_unary("cosec", functions::cosec);
        self.put_unary("arcsin", functions::arcsin);
        self.put_unary("arccos", functions::arccos);
        self.put_unary("arctg", functions::arctg);
        self.put_unary("arcsec", functions::arcsec);
        self.put_unary("arccosec", functions::arccosec);
        self.put_unary("arcctg", functions::arcctg);
        self.put_unary("sh", functions::sh);
        self.put_unary("ch", functions::ch);
        self.put_unary("th", functions::th);
        self.put_unary("cth", functions::cth);
        self.put_unary("sech", functions::sech);
        self.put_unary("cosech", functions::cosech);
        self.put_unary("arcsh", functions::arcsh);
        self.put_unary("arcch", functions::arcch);
        self.put_unary("arcth", functions::arcth);
        self.put_unary("arcsech", functions::arcsech);
        self.put_unary("arccosech", functions::arccosech);
        self.put_unary("arccth", functions::arccth);
        self.put_unary("sqr", functions::sqr);
        self.put_unary("cube", functions::cube);
        self.put_unary("sqrt", functions::sqrt);
        self.put_unary("cbrt", functions::cbrt);
        self.put_unary("signum", functions::signum);
        self.put_unary("abs", functions::abs);
        self.put_unary("exp", functions::exp);
        self.put_unary("ln", functions::ln);
        self.put_unary("log2", functions::log2);
        self.put_unary("log4", functions::log4);
        self.put_unary("log8", functions::log8);
        self.put_unary("log10", functions::log10);
        self.put_unary("log16", functions::log16);
        self.put_unary("floor", functions::floor);
        self.put_unary("ceil", functions::ceil);
        self.put_unary("round", functions::round);
    }

    fn seed_binary_catalog(&mut self) {
        self.put_binary("max", functions::max);
        self.put_binary("min", functions::min);
        self.put_binary("hypot", functions::hypot);
        self.put_binary("log", functions::log_base);
    }

    fn seed_operator_catalog(&mut self) {
        self.put_operator("^", functions::pow);
        self.put_operator(">=", functions::ge);
        self.put_operator("<=", functions::le);
        self.put_operator(">", functions::gt);
        self.put_operator("<", functions::lt);
        self.put_operator("==", functions::eq);
        self.put_operator("!=", functions::ne);
        self.put_operator("e", functions::sci);
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}
