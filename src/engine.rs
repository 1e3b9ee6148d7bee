//! The expression engine: a recursive-descent parser over a single-byte
//! lookahead cursor, plus the evaluation entry points.
//!
//! There is no token stream. The grammar is walked directly over the input
//! characters, three precedence levels deep:
//!
//! ```text
//! expression := term (('+' | '-') term)*
//! term       := token (('*' | '/') token)*
//! token      := ('+' | '-') token
//!             | '(' expression ')'
//!             | number
//!             | identifier
//!             (operator token)?
//! ```
//!
//! Spaces are skipped only where a specific expected character is consumed,
//! never globally, so `10 <= 100` and `10<=100` differ: the operator run
//! scan after a token does not skip spaces and a spaced-out operator is
//! rejected as trailing input.
//!
//! At the `+ - * /` chain levels the accumulated left side is evaluated the
//! moment the operator is consumed and its numeric value is frozen into the
//! new node as a constant; only the right side stays lazy. A re-evaluated
//! chain therefore reflects variable changes through its rightmost operand
//! only. Trailing operators (`^`, `>=`, the scientific `e`, ...) keep both
//! sides lazy.

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::{String, ToString};

use crate::context::EvalContext;
use crate::error::{ExprError, Result};
use crate::eval::eval_ast;
use crate::functions;
use crate::types::{AstExpr, BinaryFunctionMap, OperatorMap, UnaryFunctionMap, VariableMap};
use crate::Real;

/// Maximum token-nesting depth before a parse is aborted.
pub const MAX_RECURSION_DEPTH: usize = 256;

/// A recursive-descent math expression parser with mutable symbol tables.
///
/// The parser owns an [`EvalContext`] and a parse cursor. The cursor is
/// engine state, valid only during an active `parse` call and reset at the
/// start of the next one, so one instance must not be parsed through
/// concurrently. Parsed [`AstExpr`] trees are independent of the cursor and
/// stay evaluable across later parses and table mutations.
///
/// # Examples
///
/// ```
/// use mathex::ExprParser;
///
/// let mut parser = ExprParser::new();
/// let expr = parser.parse_with_variables("x/y", &[("x", 10.0), ("y", 4.0)]).unwrap();
/// assert_eq!(parser.eval(&expr).unwrap(), 2.5);
/// ```
pub struct ExprParser {
    context: EvalContext,
    input: String,
    pos: usize,
    current: Option<u8>,
    depth: usize,
}

impl ExprParser {
    /// Creates a parser with the default seeded context.
    pub fn new() -> Self {
        Self::with_context(EvalContext::new())
    }

    /// Creates a parser around an existing context, e.g. one pre-loaded
    /// with application variables.
    pub fn with_context(context: EvalContext) -> Self {
        ExprParser {
            context,
            input: String::new(),
            pos: 0,
            current: None,
            depth: 0,
        }
    }

    /// Parses an expression string into a reusable tree.
    ///
    /// Fails if any grammar rule fails or if unconsumed characters remain
    /// after a complete top-level expression.
    pub fn parse(&mut self, expression: &str) -> Result<AstExpr> {
        self.reset_cursor(expression);
        let expr = self.parse_expression()?;
        if let Some(found) = self.current_char() {
            return Err(ExprError::TrailingInput {
                position: self.pos,
                found,
            });
        }
        Ok(expr)
    }

    /// Merges the given bindings into the variable table, overwriting
    /// same-named entries, then parses.
    pub fn parse_with_variables(
        &mut self,
        expression: &str,
        bindings: &[(&str, Real)],
    ) -> Result<AstExpr> {
        self.context.set_variables(bindings)?;
        self.parse(expression)
    }

    /// Evaluates a parsed tree against the current variable table.
    pub fn eval(&self, expr: &AstExpr) -> Result<Real> {
        eval_ast(expr, &self.context)
    }

    /// Adds or updates a variable, returning the previous value if any.
    pub fn add_variable(&mut self, name: &str, value: Real) -> Result<Option<Real>> {
        self.context.set_variable(name, value)
    }

    /// Merges a set of variable bindings into the table.
    pub fn add_variables(&mut self, bindings: &[(&str, Real)]) -> Result<()> {
        self.context.set_variables(bindings)
    }

    /// Removes a variable. Trees referencing it keep parsing as built but
    /// fail with an unknown-variable error at their next evaluation.
    pub fn remove_variable(&mut self, name: &str) -> Option<Real> {
        self.context.remove_variable(name)
    }

    /// Registers a unary function under `name`, replacing any existing
    /// entry. The next parse resolves the new implementation.
    pub fn add_function<F>(&mut self, name: &str, implementation: F) -> Result<()>
    where
        F: Fn(Real) -> Real + 'static,
    {
        self.context.register_function(name, implementation)
    }

    /// Removes a unary function by name. Returns whether it existed.
    pub fn remove_function(&mut self, name: &str) -> bool {
        self.context.remove_function(name)
    }

    /// Registers a two-argument prefix function, e.g. `max`.
    pub fn add_binary_function<F>(&mut self, name: &str, implementation: F) -> Result<()>
    where
        F: Fn(Real, Real) -> Real + 'static,
    {
        self.context.register_binary_function(name, implementation)
    }

    /// Removes a binary function by name. Returns whether it existed.
    pub fn remove_binary_function(&mut self, name: &str) -> bool {
        self.context.remove_binary_function(name)
    }

    /// Registers an infix operator under a one- or two-character symbol.
    pub fn add_binary_operator<F>(&mut self, symbol: &str, implementation: F) -> Result<()>
    where
        F: Fn(Real, Real) -> Real + 'static,
    {
        self.context.register_operator(symbol, implementation)
    }

    /// Removes an operator by symbol. Returns whether it existed.
    pub fn remove_binary_operator(&mut self, symbol: &str) -> bool {
        self.context.remove_operator(symbol)
    }

    /// Read-only view of the current variable table.
    pub fn variables(&self) -> &VariableMap {
        self.context.variables()
    }

    /// Read-only view of the unary function catalog.
    pub fn functions(&self) -> &UnaryFunctionMap {
        self.context.functions()
    }

    /// Read-only view of the binary function catalog.
    pub fn binary_functions(&self) -> &BinaryFunctionMap {
        self.context.binary_functions()
    }

    /// Read-only view of the operator catalog.
    pub fn operators(&self) -> &OperatorMap {
        self.context.operators()
    }

    /// The underlying context.
    pub fn context(&self) -> &EvalContext {
        &self.context
    }

    /// Mutable access to the underlying context.
    pub fn context_mut(&mut self) -> &mut EvalContext {
        &mut self.context
    }

    // Cursor primitives.

    fn reset_cursor(&mut self, expression: &str) {
        self.input.clear();
        self.input.push_str(expression);
        self.pos = 0;
        self.current = self.input.as_bytes().first().copied();
        self.depth = 0;
    }

    fn advance(&mut self) {
        self.pos += 1;
        self.current = self.input.as_bytes().get(self.pos).copied();
    }

    /// Skips spaces, then consumes `expected` if it is the next character.
    /// A failed match still leaves the skipped spaces behind.
    fn consume(&mut self, expected: u8) -> bool {
        while self.current == Some(b' ') {
            self.advance();
        }
        if self.current == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// The character under the cursor, for error reporting. The cursor only
    /// ever stops on ASCII boundaries, so slicing here is safe.
    fn current_char(&self) -> Option<char> {
        self.input.get(self.pos..).and_then(|rest| rest.chars().next())
    }

    /// Digit class: decimal digits and `.`. Malformed literals like `1..2`
    /// pass the scan and fail at numeric conversion.
    fn is_digit(c: u8) -> bool {
        c.is_ascii_digit() || c == b'.'
    }

    /// Symbol class: ASCII letters plus the digit class, so names start
    /// with a letter but may contain digits (`log2`).
    fn is_symbol(c: u8) -> bool {
        c.is_ascii_alphabetic() || Self::is_digit(c)
    }

    // Grammar.

    fn parse_expression(&mut self) -> Result<AstExpr> {
        let mut expr = self.parse_term()?;
        loop {
            if self.consume(b'+') {
                let frozen = eval_ast(&expr, &self.context)?;
                let right = self.parse_term()?;
                expr = Self::chain_step("+", functions::add, frozen, right);
            } else if self.consume(b'-') {
                let frozen = eval_ast(&expr, &self.context)?;
                let right = self.parse_term()?;
                expr = Self::chain_step("-", functions::sub, frozen, right);
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_term(&mut self) -> Result<AstExpr> {
        let mut expr = self.parse_token()?;
        loop {
            if self.consume(b'*') {
                let frozen = eval_ast(&expr, &self.context)?;
                let right = self.parse_token()?;
                expr = Self::chain_step("*", functions::mul, frozen, right);
            } else if self.consume(b'/') {
                let frozen = eval_ast(&expr, &self.context)?;
                let right = self.parse_token()?;
                expr = Self::chain_step("/", functions::div, frozen, right);
            } else {
                return Ok(expr);
            }
        }
    }

    /// Builds one `+ - * /` chain step. The left side is the already
    /// computed value of everything parsed so far at this level; the right
    /// side stays a live sub-tree.
    fn chain_step(symbol: &str, func: fn(Real, Real) -> Real, left: Real, right: AstExpr) -> AstExpr {
        AstExpr::BinaryOp {
            symbol: symbol.to_string(),
            func: Rc::new(func),
            left: Box::new(AstExpr::Constant(left)),
            right: Box::new(right),
        }
    }

    /// Depth-guarded wrapper around the token production. Tokens are the
    /// grammar's only recursion point, so the guard lives here.
    fn parse_token(&mut self) -> Result<AstExpr> {
        if self.depth >= MAX_RECURSION_DEPTH {
            return Err(ExprError::RecursionLimit(format!(
                "nesting deeper than {} tokens",
                MAX_RECURSION_DEPTH
            )));
        }
        self.depth += 1;
        let result = self.parse_token_inner();
        self.depth -= 1;
        result
    }

    fn parse_token_inner(&mut self) -> Result<AstExpr> {
        // Unary prefix signs recurse, so `--4` and `+++4` are valid.
        if self.consume(b'+') {
            return self.parse_token();
        }
        if self.consume(b'-') {
            return Ok(AstExpr::Neg(Box::new(self.parse_token()?)));
        }

        let mut start = self.pos;
        let mut expr;
        if self.consume(b'(') || self.consume(b',') {
            // `,` opens a sub-expression exactly like `(`; finding another
            // `,` afterwards returns early so a binary function's argument
            // list can be walked comma by comma.
            expr = self.parse_expression()?;
            if self.consume(b',') {
                return Ok(expr);
            }
            if !self.consume(b')') {
                return Err(ExprError::UnbalancedParenthesis { position: self.pos });
            }
        } else if self.current.is_some_and(Self::is_digit) {
            while self.current.is_some_and(Self::is_digit) {
                self.advance();
            }
            let literal = &self.input[start..self.pos];
            expr = AstExpr::Constant(literal.parse::<Real>()?);
        } else if self.current.is_some_and(Self::is_symbol) {
            while self.current.is_some_and(Self::is_symbol) {
                self.advance();
            }
            let name = self.input[start..self.pos].to_string();
            expr = self.resolve_identifier(name)?;
        } else {
            return Err(ExprError::UnexpectedCharacter {
                position: self.pos,
                found: self.current_char(),
            });
        }

        // Trailing operator: the longest run of characters appearing in any
        // registered operator symbol, matched exactly against the table.
        // `5e7` is the literal 5, the operator `e`, the operand 7.
        start = self.pos;
        while self
            .current
            .is_some_and(|c| self.context.is_operator_char(c))
        {
            self.advance();
        }
        if start != self.pos {
            let symbol = self.input[start..self.pos].to_string();
            let Some(func) = self
                .context
                .lookup_operator(&symbol)
                .map(|op| op.implementation.clone())
            else {
                return Err(ExprError::UnknownOperator { symbol });
            };
            let right = self.parse_token()?;
            expr = AstExpr::BinaryOp {
                symbol,
                func,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    /// Resolution order is load-bearing: variable first (shadowing any
    /// same-named function), then unary function, then binary function.
    /// The operand token is parsed before the function tables are checked,
    /// mirroring how the grammar consumes input.
    fn resolve_identifier(&mut self, name: String) -> Result<AstExpr> {
        if self.context.lookup_variable(&name).is_some() {
            return Ok(AstExpr::Variable(name));
        }
        let operand = self.parse_token()?;
        if let Some(func) = self
            .context
            .lookup_function(&name)
            .map(|f| f.implementation.clone())
        {
            return Ok(AstExpr::UnaryFn {
                name,
                func,
                arg: Box::new(operand),
            });
        }
        if let Some(func) = self
            .context
            .lookup_binary_function(&name)
            .map(|f| f.implementation.clone())
        {
            // The operand token already consumed the separating comma, so
            // the second argument parses as a bare expression here.
            let second = self.parse_expression()?;
            if !self.consume(b')') {
                return Err(ExprError::UnbalancedParenthesis { position: self.pos });
            }
            return Ok(AstExpr::BinaryFn {
                name,
                func,
                left: Box::new(operand),
                right: Box::new(second),
            });
        }
        Err(ExprError::UnknownIdentifier { name })
    }
}

impl Default for ExprParser {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot convenience: parse and evaluate with a fresh default parser.
///
/// ```
/// assert_eq!(mathex::interp("2+3*5").unwrap(), 17.0);
/// ```
pub fn interp(expression: &str) -> Result<Real> {
    let mut parser = ExprParser::new();
    let expr = parser.parse(expression)?;
    parser.eval(&expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    #[test]
    fn test_literals_and_precedence() {
        assert_eq!(interp("42").unwrap(), 42.0);
        assert_eq!(interp("3.25").unwrap(), 3.25);
        assert_eq!(interp("2+3*5").unwrap(), 17.0);
        assert_eq!(interp("2*(5+7)").unwrap(), 24.0);
    }

    #[test]
    fn test_unary_sign_chains() {
        assert_eq!(interp("--4").unwrap(), 4.0);
        assert_eq!(interp("---4").unwrap(), -4.0);
        assert_eq!(interp("+++4").unwrap(), 4.0);
        assert_eq!(interp("-(2+3)").unwrap(), -5.0);
    }

    #[test]
    fn test_spaces_skip_only_at_consumed_characters() {
        assert_eq!(interp("  2 + 3 ").unwrap(), 5.0);
        assert_eq!(interp("2 * ( 5 + 7 )").unwrap(), 24.0);
        // The operator run scan does not skip spaces.
        assert!(matches!(
            interp("2 ^ 3"),
            Err(ExprError::TrailingInput { found: '^', .. })
        ));
    }

    #[test]
    fn test_trailing_input_is_rejected() {
        let err = interp("2+3)").unwrap_err();
        assert_eq!(
            err,
            ExprError::TrailingInput {
                position: 3,
                found: ')'
            }
        );
    }

    #[test]
    fn test_empty_input_is_unexpected_end() {
        assert_eq!(
            interp("").unwrap_err(),
            ExprError::UnexpectedCharacter {
                position: 0,
                found: None
            }
        );
    }

    #[test]
    fn test_malformed_literal_fails_numeric_conversion() {
        assert!(matches!(interp("1..2"), Err(ExprError::Parse(_))));
        assert!(matches!(interp("."), Err(ExprError::Parse(_))));
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert!(matches!(
            interp("2*(5+7"),
            Err(ExprError::UnbalancedParenthesis { .. })
        ));
    }

    #[test]
    fn test_scientific_notation_operator() {
        assert_eq!(interp("5e7").unwrap(), 5e7);
        assert_approx_eq!(interp("5e-7").unwrap(), 5e-7, 1e-20);
        assert_eq!(interp("1.5e3").unwrap(), 1500.0);
    }

    #[test]
    fn test_multi_character_operators_resolve_by_longest_run() {
        assert_eq!(interp("10<=100").unwrap(), 1.0);
        assert_eq!(interp("10>=100").unwrap(), 0.0);
        assert_eq!(interp("5!=7").unwrap(), 1.0);
        assert_eq!(interp("5==5").unwrap(), 1.0);
    }

    #[test]
    fn test_unknown_operator_run() {
        // '=' and '<' each appear in registered symbols but '=<' is not one.
        assert_eq!(
            interp("5=<7").unwrap_err(),
            ExprError::UnknownOperator {
                symbol: "=<".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_identifier() {
        assert_eq!(
            interp("nope(2)").unwrap_err(),
            ExprError::UnknownIdentifier {
                name: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_recursion_limit_trips_on_deep_nesting() {
        let deep = "(".repeat(MAX_RECURSION_DEPTH + 1) + "1";
        assert!(matches!(
            interp(&deep),
            Err(ExprError::RecursionLimit(_))
        ));
    }

    #[test]
    fn test_variable_shadows_function() {
        let mut parser = ExprParser::new();
        parser.add_variable("sin", 4.0).unwrap();
        let expr = parser.parse("sin*2").unwrap();
        assert_eq!(parser.eval(&expr).unwrap(), 8.0);
    }

    #[test]
    fn test_parse_resets_cursor_after_failure() {
        let mut parser = ExprParser::new();
        assert!(parser.parse("2+*3").is_err());
        let expr = parser.parse("2+3").unwrap();
        assert_eq!(parser.eval(&expr).unwrap(), 5.0);
    }

    #[test]
    fn test_custom_operator_registration() {
        let mut parser = ExprParser::new();
        parser.add_binary_operator("%", |a, b| a % b).unwrap();
        let expr = parser.parse("14%4").unwrap();
        assert_eq!(parser.eval(&expr).unwrap(), 2.0);
        assert!(parser.remove_binary_operator("%"));
        assert!(matches!(
            parser.parse("14%4"),
            Err(ExprError::TrailingInput { found: '%', .. })
        ));
    }
}
