use super::*;
use crate::{DurationUnit, StringInterner};
use pretty_assertions::assert_eq;

fn int(n: i64) -> Expr {
    Expr::new(ExprKind::Literal(Literal::Int(n)), Span::DUMMY)
}

#[test]
fn required_params_skip_defaults_and_collectors() {
    let interner = StringInterner::new();
    let def = FunctionDef {
        name: Some(interner.intern("f")),
        params: vec![
            Param {
                name: interner.intern("a"),
                kind: ParamKind::Positional,
            },
            Param {
                name: interner.intern("b"),
                kind: ParamKind::Default(int(2)),
            },
            Param {
                name: interner.intern("rest"),
                kind: ParamKind::VarArgs,
            },
        ],
        body: FunctionBody::Expr(int(0)),
        span: Span::DUMMY,
    };
    assert_eq!(def.required_params(), 1);
}

#[test]
fn assignable_targets() {
    let interner = StringInterner::new();
    let ident = Expr::new(ExprKind::Ident(interner.intern("x")), Span::DUMMY);
    assert!(ident.is_assignable());
    let member = Expr::new(
        ExprKind::Member {
            object: Box::new(ident.clone()),
            name: interner.intern("y"),
        },
        Span::DUMMY,
    );
    assert!(member.is_assignable());
    assert!(!int(1).is_assignable());
}

#[test]
fn compound_assignment_maps_to_binary_op() {
    assert_eq!(AssignOp::Add.binary(), Some(BinaryOp::Add));
    assert_eq!(AssignOp::Assign.binary(), None);
}

#[test]
fn multiplicative_binds_tighter_than_additive() {
    assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
    assert!(BinaryOp::And.precedence() > BinaryOp::Or.precedence());
    assert!(BinaryOp::Lt.precedence() > BinaryOp::Eq.precedence());
}

#[test]
fn script_resolves_locations() {
    let script = Script::new("t", "x = 1\ny = @1d", Vec::new());
    assert_eq!(script.location(Span::new(6, 7)).line, 2);
    let lit = Literal::Duration {
        amount: 1,
        unit: DurationUnit::Days,
    };
    assert_eq!(
        lit,
        Literal::Duration {
            amount: 1,
            unit: DurationUnit::Days
        }
    );
}
