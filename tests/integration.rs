//! Integration tests for the mathex library.
//! These tests exercise the engine the way a caller would, from one-shot
//! evaluation up to catalog mutation and re-evaluable expression trees.

use mathex::engine::interp;
use mathex::error::ExprError;
use mathex::{assert_approx_eq, constants, ExprParser};

/// Level 1: one-shot arithmetic through `interp`.
#[test]
fn test_basic_arithmetic() {
    assert_eq!(interp("2+3").unwrap(), 5.0);
    assert_eq!(interp("2+3*5").unwrap(), 17.0);
    assert_eq!(interp("2*(5+7)").unwrap(), 24.0);
    assert_eq!(interp("--4").unwrap(), 4.0);
    assert_eq!(interp("+++4").unwrap(), 4.0);
    assert_eq!(interp("10/4").unwrap(), 2.5);
}

/// Level 1b: the acceptance expressions the engine was originally built
/// against.
#[test]
fn test_acceptance_expressions() {
    assert_approx_eq!(interp("2+3*5-38/2").unwrap(), -2.0);
    assert_approx_eq!(interp("3.14*100+12^2*2").unwrap(), 602.0);
    assert_approx_eq!(interp("sin(Pi/6)*2").unwrap(), 1.0);
    assert_approx_eq!(interp("tg(Pi/4)").unwrap(), 1.0);
    assert_approx_eq!(interp("180*arcsin(0.5)/Pi").unwrap(), 30.0);
    assert_eq!(interp("E^Pi>Pi^E").unwrap(), 1.0);
    assert_eq!(interp("(5!=7)*8+(9<14)*100").unwrap(), 108.0);
}

/// Level 2: built-in function and operator catalog.
#[test]
fn test_builtin_catalog() {
    assert_approx_eq!(interp("cos(0)").unwrap(), 1.0);
    assert_approx_eq!(interp("ctg(Pi/4)").unwrap(), 1.0);
    assert_approx_eq!(interp("sh(1)-(E-1/E)/2").unwrap(), 0.0);
    assert_approx_eq!(interp("sqr(3)+cube(2)").unwrap(), 17.0);
    assert_approx_eq!(interp("sqrt(2)*sqrt(2)").unwrap(), 2.0);
    assert_approx_eq!(interp("ln(E)").unwrap(), 1.0);
    assert_approx_eq!(interp("log10(1000)").unwrap(), 3.0);
    assert_eq!(interp("abs(0-7)").unwrap(), 7.0);
    assert_eq!(interp("signum(0-3)").unwrap(), -1.0);
    assert_eq!(interp("floor(2.7)+ceil(2.2)").unwrap(), 5.0);
}

#[test]
fn test_binary_functions() {
    assert_eq!(interp("max(2,3)").unwrap(), 3.0);
    assert_eq!(interp("min(2,3)").unwrap(), 2.0);
    assert_eq!(interp("max((2+3),(2+2))").unwrap(), 5.0);
    assert_eq!(interp("hypot(3,4)").unwrap(), 5.0);
    assert_approx_eq!(interp("log(8,2)").unwrap(), 3.0);
    // Arguments are full expressions, nesting included.
    assert_eq!(interp("max(min(10,20),5)").unwrap(), 10.0);
}

#[test]
fn test_relational_operators_return_exact_booleans() {
    assert_eq!(interp("10<=100").unwrap(), 1.0);
    assert_eq!(interp("10>=100").unwrap(), 0.0);
    assert_eq!(interp("2<1").unwrap(), 0.0);
    assert_eq!(interp("2>1").unwrap(), 1.0);
    assert_eq!(interp("3==3").unwrap(), 1.0);
    assert_eq!(interp("3!=3").unwrap(), 0.0);
    // Tolerance-free comparison; the sum is grouped because trailing
    // operators bind tighter than the additive chain.
    assert_eq!(interp("(0.1+0.2)==0.3").unwrap(), 0.0);
    assert_eq!(interp("(0.1+0.2)!=0.3").unwrap(), 1.0);
}

#[test]
fn test_scientific_notation() {
    assert_eq!(interp("5e7").unwrap(), 5e7);
    assert_approx_eq!(interp("5e-7").unwrap(), 5e-7, 1e-20);
    assert_eq!(interp("2.5e2").unwrap(), 250.0);
    assert_eq!(interp("1e0").unwrap(), 1.0);
}

/// Level 3: variables and late binding.
#[test]
fn test_variable_late_binding() {
    let mut parser = ExprParser::new();
    parser.add_variable("x", 3.0).unwrap();
    let expr = parser.parse("x^2").unwrap();
    assert_eq!(parser.eval(&expr).unwrap(), 9.0);

    for v in [0.5, 2.0, 10.0, -4.0] {
        parser.add_variable("x", v).unwrap();
        assert_approx_eq!(parser.eval(&expr).unwrap(), v * v);
    }
}

#[test]
fn test_parse_with_variables_merges_bindings() {
    let mut parser = ExprParser::new();
    parser.add_variable("a", 1.0).unwrap();
    let expr = parser
        .parse_with_variables("a+b^1", &[("a", 2.0), ("b", 3.0)])
        .unwrap();
    // "a" was overwritten before the parse, so the frozen left side is 2.
    assert_eq!(parser.eval(&expr).unwrap(), 5.0);
    assert_eq!(parser.variables().len(), 4); // E, Pi, a, b
}

#[test]
fn test_removed_variable_fails_at_evaluation_not_parse() {
    let mut parser = ExprParser::new();
    parser.add_variable("x", 2.0).unwrap();
    let expr = parser.parse("x^3").unwrap();
    assert_eq!(parser.eval(&expr).unwrap(), 8.0);

    parser.remove_variable("x");
    assert_eq!(
        parser.eval(&expr).unwrap_err(),
        ExprError::UnknownVariable {
            name: "x".to_string()
        }
    );
}

/// Level 3b: the chain asymmetry. `+ - * /` freeze their accumulated left
/// side at parse time; only the rightmost operand tracks later variable
/// changes. Trailing operators track on both sides.
#[test]
fn test_chain_left_operand_is_frozen_at_parse_time() {
    let mut parser = ExprParser::new();
    parser.add_variable("x", 10.0).unwrap();

    let left_chain = parser.parse("x+1").unwrap();
    let right_chain = parser.parse("1+x").unwrap();
    let both_sides = parser.parse("x-x").unwrap();
    assert_eq!(parser.eval(&left_chain).unwrap(), 11.0);
    assert_eq!(parser.eval(&right_chain).unwrap(), 11.0);
    assert_eq!(parser.eval(&both_sides).unwrap(), 0.0);

    parser.add_variable("x", 100.0).unwrap();
    // x sat on the left: its value 10 was frozen into the node.
    assert_eq!(parser.eval(&left_chain).unwrap(), 11.0);
    // x sits on the right: re-evaluated fresh.
    assert_eq!(parser.eval(&right_chain).unwrap(), 101.0);
    // Frozen 10 minus live 100.
    assert_eq!(parser.eval(&both_sides).unwrap(), -90.0);
}

#[test]
fn test_trailing_operator_tracks_variables_on_both_sides() {
    let mut parser = ExprParser::new();
    parser.add_variable("x", 2.0).unwrap();
    let expr = parser.parse("x^x").unwrap();
    assert_eq!(parser.eval(&expr).unwrap(), 4.0);
    parser.add_variable("x", 3.0).unwrap();
    assert_eq!(parser.eval(&expr).unwrap(), 27.0);
}

/// Level 4: catalog mutation.
#[test]
fn test_function_registration_and_removal() {
    let mut parser = ExprParser::new();
    parser.add_function("inv", |a| 1.0 / a).unwrap();
    let expr = parser.parse("inv(4)").unwrap();
    assert_eq!(parser.eval(&expr).unwrap(), 0.25);

    assert!(parser.remove_function("inv"));
    // The built tree keeps its captured handle.
    assert_eq!(parser.eval(&expr).unwrap(), 0.25);
    // A re-parse no longer resolves the name.
    assert_eq!(
        parser.parse("inv(4)").unwrap_err(),
        ExprError::UnknownIdentifier {
            name: "inv".to_string()
        }
    );
}

#[test]
fn test_builtin_removal_round_trip() {
    let mut parser = ExprParser::new();
    assert!(parser.remove_function("sin"));
    assert!(matches!(
        parser.parse("sin(1)"),
        Err(ExprError::UnknownIdentifier { .. })
    ));
    parser.add_function("sin", libm::sin).unwrap();
    let expr = parser.parse("sin(0)").unwrap();
    assert_eq!(parser.eval(&expr).unwrap(), 0.0);
}

#[test]
fn test_function_replacement_rebinds_on_next_parse() {
    let mut parser = ExprParser::new();
    parser.add_function("f", |a| a + 1.0).unwrap();
    let old = parser.parse("f(1)").unwrap();
    parser.add_function("f", |a| a * 10.0).unwrap();
    let new = parser.parse("f(1)").unwrap();
    // Function bindings are parse-time: the old tree keeps the old body.
    assert_eq!(parser.eval(&old).unwrap(), 2.0);
    assert_eq!(parser.eval(&new).unwrap(), 10.0);
}

#[test]
fn test_binary_function_and_operator_registration() {
    let mut parser = ExprParser::new();
    parser
        .add_binary_function("avg", |a, b| (a + b) / 2.0)
        .unwrap();
    let expr = parser.parse("avg(2,4)").unwrap();
    assert_eq!(parser.eval(&expr).unwrap(), 3.0);
    assert!(parser.remove_binary_function("avg"));

    parser.add_binary_operator("%", |a, b| a % b).unwrap();
    let expr = parser.parse("14%4").unwrap();
    assert_eq!(parser.eval(&expr).unwrap(), 2.0);
    assert!(parser.remove_binary_operator("%"));
}

#[test]
fn test_catalog_accessors() {
    let parser = ExprParser::new();
    assert_eq!(parser.variables().len(), 2); // E, Pi
    assert!(parser.functions().len() >= 40);
    assert_eq!(parser.binary_functions().len(), 4);
    assert_eq!(parser.operators().len(), 8);
    let key: mathex::HString = "E".try_into().unwrap();
    assert_approx_eq!(*parser.variables().get(&key).unwrap(), constants::E);
}

/// Level 5: one tree, many evaluations. A variable sweep over an
/// already-parsed expression, the way a plotting driver would use it.
/// Binary-function arguments stay lazy, so the identity holds at every
/// sweep point.
#[test]
fn test_variable_sweep_over_one_parsed_tree() {
    let mut parser = ExprParser::new();
    parser.add_variable("x", 0.0).unwrap();
    let expr = parser.parse("hypot(sin(x),cos(x))").unwrap();
    let mut x = -3.0;
    while x <= 3.0 {
        parser.add_variable("x", x).unwrap();
        assert_approx_eq!(parser.eval(&expr).unwrap(), 1.0);
        x += 0.25;
    }
}
