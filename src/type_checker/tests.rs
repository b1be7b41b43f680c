//! Unit tests for the type checker.

use crate::{
    ast::{
        ast::{Node, NodeKind},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl, ErrorKind},
    parser::parser::{parse, parse_expression},
    Position,
};

use super::{
    scope::{Binding, Scope},
    type_checker::{type_check, type_check_with_globals, ResolutionContext},
};

fn check(source: &str) -> Result<Node<'_>, Error> {
    let mut ast = parse(source, "test.ds").expect("test source should parse");
    type_check(&mut ast)?;
    Ok(ast)
}

fn check_expr(source: &str) -> Result<Type, Error> {
    let mut ast = parse_expression(source, "test.ds").expect("test source should parse");
    type_check(&mut ast)?;
    Ok(ast.ty.expect("checked node has a type"))
}

fn statements<'a, 'src>(root: &'a Node<'src>) -> &'a [Node<'src>] {
    &root.as_block().expect("root is a block").body
}

fn instantiated_type(node: &Node) -> Option<Type> {
    match &node.kind {
        NodeKind::VariableInstantiation(inst) => inst.name.ty,
        _ => None,
    }
}

fn position() -> Position {
    Position::new(1, 1, "test.ds".into())
}

#[test]
fn test_literal_widths() {
    assert_eq!(check_expr("5").unwrap(), Type::Integer(1));
    assert_eq!(check_expr("200").unwrap(), Type::Integer(2));
    assert_eq!(check_expr("-129").unwrap(), Type::Integer(2));
    assert_eq!(check_expr("70000").unwrap(), Type::Integer(4));
    assert_eq!(check_expr("5000000000").unwrap(), Type::Integer(8));
    assert_eq!(check_expr("1.5").unwrap(), Type::Float(8));
}

#[test]
fn test_literal_types() {
    assert_eq!(check_expr("null").unwrap(), Type::Null);
    assert_eq!(check_expr("false").unwrap(), Type::Boolean);
    assert_eq!(check_expr("'a'").unwrap(), Type::Character);
    assert_eq!(check_expr("\"text\"").unwrap(), Type::String);
}

#[test]
fn test_arithmetic_takes_wider_operand() {
    assert_eq!(check_expr("1 + 200").unwrap(), Type::Integer(2));
    assert_eq!(check_expr("70000 * 2").unwrap(), Type::Integer(4));
    assert_eq!(check_expr("1.5 / 2.5").unwrap(), Type::Float(8));
    assert_eq!(check_expr("-(1 - 2)").unwrap(), Type::Integer(1));
}

#[test]
fn test_boolean_operators() {
    assert_eq!(check_expr("true && !false").unwrap(), Type::Boolean);
    assert_eq!(check_expr("1 == 300").unwrap(), Type::Boolean);
    assert_eq!(check_expr("'a' != 'b' || false").unwrap(), Type::Boolean);
}

#[test]
fn test_operand_type_error_points_at_operand() {
    let error = check_expr("true + 1").unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Type);
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::OperandTypeError { operator, .. } if operator == "+"
    ));
    assert_eq!(error.get_position().line, 1);
    assert_eq!(error.get_position().column, 1);

    let error = check_expr("1 + true").unwrap_err();
    assert_eq!(error.get_position().column, 5);
}

#[test]
fn test_operand_kind_mismatch() {
    let error = check_expr("1 + 1.5").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::TypeMatchError { .. }
    ));

    let error = check_expr("1 == 'a'").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::TypeMatchError { .. }
    ));
}

#[test]
fn test_unary_operand_errors() {
    let error = check_expr("!1").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::OperandTypeError { operator, expected, .. } if operator == "!" && expected == "bool"
    ));

    let error = check_expr("-true").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::OperandTypeError { operator, .. } if operator == "-"
    ));

    let error = check_expr("1 && true").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::OperandTypeError { operator, .. } if operator == "&&"
    ));
}

#[test]
fn test_end_to_end_instantiations() {
    let root = check("a := 1\nb := a + 2\n").unwrap();
    let body = statements(&root);

    assert_eq!(body.len(), 2);
    assert!(body
        .iter()
        .all(|node| matches!(node.kind, NodeKind::VariableInstantiation(_))));
    assert_eq!(instantiated_type(&body[0]), Some(Type::Integer(1)));
    assert_eq!(instantiated_type(&body[1]), Some(Type::Integer(1)));
    assert_eq!(body[0].ty, Some(Type::None));
    assert_eq!(root.ty, Some(Type::None));
}

#[test]
fn test_every_node_is_typed() {
    fn assert_typed(node: &Node) {
        assert!(node.ty.is_some(), "untyped node at {}", node.span.start);
        match &node.kind {
            NodeKind::Binary(binary) => {
                assert_typed(&binary.left);
                assert_typed(&binary.right);
            }
            NodeKind::Unary(unary) => assert_typed(&unary.operand),
            NodeKind::Block(block) => block.iter().for_each(assert_typed),
            NodeKind::VariableInstantiation(inst) => {
                assert_typed(&inst.name);
                assert_typed(&inst.value);
            }
            NodeKind::If(stmt) => {
                assert_typed(&stmt.condition);
                assert_typed(&stmt.then_body);
                if let Some(else_body) = &stmt.else_body {
                    assert_typed(else_body);
                }
            }
            _ => {}
        }
    }

    let root = check("x := 1\nif x == 2 { x = 3; } else { y := !true; }\nwhile false { }\n").unwrap();
    assert_typed(&root);
}

#[test]
fn test_scope_shadowing() {
    assert!(check("{ x := 1; { x := 2; } }").is_ok());
}

#[test]
fn test_redefinition_in_same_scope() {
    let error = check("{ x := 1; x := 2; }").unwrap_err();

    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::VariableAlreadyDeclared { variable } if variable == "x"
    ));
    assert_eq!(error.get_position().column, 11);
}

#[test]
fn test_top_level_redefinition() {
    let error = check("x := 1\nx := true\n").unwrap_err();
    assert_eq!(error.get_position().line, 2);
}

#[test]
fn test_inner_binding_is_dropped_with_its_block() {
    let error = check("{ y := 1; }\nz := y\n").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::VariableNotDeclared { variable } if variable == "y"
    ));
}

#[test]
fn test_shadowed_type_is_used() {
    let root = check("x := 1\n{ x := true; y := !x; }\n").unwrap();
    assert!(root.ty.is_some());
}

#[test]
fn test_initializer_cannot_see_its_own_name() {
    let error = check("x := x\n").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::VariableNotDeclared { .. }
    ));
}

#[test]
fn test_type_name_is_not_a_value() {
    let error = check("x := i32\n").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::ExpectedValue { name } if name == "i32"
    ));
}

#[test]
fn test_assignment() {
    assert!(check("x := 1\nx = 300\n").is_ok());

    let error = check("x := 1\nx = true\n").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::TypeMatchError { .. }
    ));

    let error = check("x := 1\n(x + 1) = 2\n").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::InvalidAssignmentTarget
    ));

    let error = check("y = 1\n").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::VariableNotDeclared { .. }
    ));
}

#[test]
fn test_conditions_must_be_bool() {
    assert!(check("if true { } else if false { }").is_ok());

    let error = check("if 1 { }").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::ConditionTypeError { received } if received == "i8"
    ));

    let error = check("while 'c' { }").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::ConditionTypeError { .. }
    ));
}

#[test]
fn test_unsupported_forms() {
    for source in [
        "x :: 1\n",
        "x : i32 = 1\n",
        "f :: fn(a: i32) { }\n",
        "{ f := fn() { }; }",
    ] {
        let error = check(source).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unsupported, "{source}: {error}");
    }
}

#[test]
fn test_first_error_aborts() {
    let error = check("a := true + 1\nb := c\n").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::OperandTypeError { .. }
    ));
}

#[test]
fn test_custom_globals() {
    let mut globals = Scope::new();
    globals
        .declare("answer", Binding::Variable(Type::Integer(1)), position())
        .unwrap();
    globals
        .declare("main", Binding::Function { id: 0, ty: Type::None }, position())
        .unwrap();
    globals.declare("io", Binding::Module, position()).unwrap();

    let mut ast = parse("x := answer + 1\n", "test.ds").unwrap();
    assert!(type_check_with_globals(&mut ast, &globals).is_ok());

    let mut ast = parse("x := io\n", "test.ds").unwrap();
    let error = type_check_with_globals(&mut ast, &globals).unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::ExpectedValue { .. }
    ));

    // The builtin types are not part of a custom global scope
    let mut ast = parse("x := i32\n", "test.ds").unwrap();
    let error = type_check_with_globals(&mut ast, &globals).unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::VariableNotDeclared { .. }
    ));
}

#[test]
fn test_scope_declare_rejects_duplicates() {
    let mut scope = Scope::builtin();
    assert_eq!(scope.len(), 8);

    let error = scope
        .declare("bool", Binding::Type(Type::Boolean), position())
        .unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::VariableAlreadyDeclared { .. }
    ));
}

#[test]
fn test_resolution_order() {
    let global = Scope::builtin();
    let mut context = ResolutionContext::new(&global);

    context.bind("x", Binding::Variable(Type::Boolean), position()).unwrap();
    context.push_scope();
    context.bind("x", Binding::Variable(Type::Character), position()).unwrap();
    assert_eq!(context.resolve("x"), Some(Binding::Variable(Type::Character)));

    context.pop_scope();
    assert_eq!(context.resolve("x"), Some(Binding::Variable(Type::Boolean)));
    assert_eq!(context.resolve("i16"), Some(Binding::Type(Type::Integer(2))));
    assert_eq!(context.resolve("missing"), None);
}

#[test]
fn test_local_binding_shadows_global() {
    let global = Scope::builtin();
    let mut context = ResolutionContext::new(&global);

    context.bind("i32", Binding::Variable(Type::String), position()).unwrap();
    assert_eq!(context.resolve("i32"), Some(Binding::Variable(Type::String)));
}

#[test]
fn test_parent_chain_skips_variables() {
    let global = Scope::builtin();
    let mut parent = ResolutionContext::new(&global);

    parent.bind("count", Binding::Variable(Type::Integer(4)), position()).unwrap();
    parent
        .bind("helper", Binding::Function { id: 1, ty: Type::Boolean }, position())
        .unwrap();
    parent.bind("Meters", Binding::Type(Type::Float(8)), position()).unwrap();
    parent.push_scope();
    parent.bind("helper", Binding::Variable(Type::Null), position()).unwrap();

    let mut child = ResolutionContext::with_parent(&parent);

    assert_eq!(child.resolve("count"), None);
    assert_eq!(
        child.resolve("helper"),
        Some(Binding::Function { id: 1, ty: Type::Boolean })
    );
    assert_eq!(child.resolve("Meters"), Some(Binding::Type(Type::Float(8))));
    assert_eq!(child.resolve("bool"), Some(Binding::Type(Type::Boolean)));

    child.bind("count", Binding::Variable(Type::Character), position()).unwrap();
    assert_eq!(child.resolve("count"), Some(Binding::Variable(Type::Character)));
}

#[test]
fn test_nested_context_checks_against_parent() {
    let global = Scope::builtin();
    let mut parent = ResolutionContext::new(&global);
    parent
        .bind("flag", Binding::Function { id: 7, ty: Type::Boolean }, position())
        .unwrap();
    parent.bind("outer", Binding::Variable(Type::Boolean), position()).unwrap();

    let mut child = ResolutionContext::with_parent(&parent);

    let mut ast = parse_expression("!flag", "test.ds").unwrap();
    assert_eq!(child.check(&mut ast).unwrap(), Type::Boolean);

    let mut ast = parse_expression("!outer", "test.ds").unwrap();
    let error = child.check(&mut ast).unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::VariableNotDeclared { variable } if variable == "outer"
    ));
}

#[test]
fn test_scopes_are_balanced_after_error() {
    let global = Scope::builtin();
    let mut context = ResolutionContext::new(&global);
    let depth = context.depth();

    let mut ast = parse("{ { a := true + 1; } }", "test.ds").unwrap();
    assert!(context.check(&mut ast).is_err());
    assert_eq!(context.depth(), depth);
}

#[test]
#[should_panic(expected = "type checked twice")]
fn test_double_check_is_an_invariant_violation() {
    let mut ast = parse_expression("1", "test.ds").unwrap();
    type_check(&mut ast).unwrap();
    let _ = type_check(&mut ast);
}
