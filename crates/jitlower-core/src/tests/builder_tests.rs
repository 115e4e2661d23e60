use crate::builder::{InsertionPoint, OpBuilder};
use crate::location::Location;
use crate::operations::{ElementwiseUnary, Op, TanhOp, UnaryKind};
use crate::types::{ElementType, TensorType};
use crate::values::ValueId;
use crate::IrError;
use pretty_assertions::assert_eq;

fn builder_with_input() -> (OpBuilder, ValueId) {
    let mut builder = OpBuilder::new("main");
    let arg = builder.add_argument(TensorType::ranked(&[2, 3], ElementType::F32));
    (builder, arg)
}

#[test]
fn test_unary_keeps_operand_type() {
    let (mut builder, arg) = builder_with_input();
    let result = builder
        .unary(Location::named("aten::tanh"), UnaryKind::Tanh, arg)
        .unwrap();

    assert_eq!(result, ValueId(1));
    assert_eq!(builder.value_type(result).unwrap(), builder.value_type(arg).unwrap());
    assert_eq!(builder.operation_count(), 1);
}

#[test]
fn test_marker_selects_kind() {
    assert_eq!(TanhOp::KIND, UnaryKind::Tanh);
    assert_eq!(TanhOp::KIND.mnemonic(), "tanh");
}

#[test]
fn test_clamp_with_constant_like_bounds() {
    let (mut builder, arg) = builder_with_input();
    let loc = Location::named("aten::hardtanh");
    let lo = builder.constant_like(loc.clone(), -1.0, arg).unwrap();
    let hi = builder.constant_like(loc.clone(), 1.0, arg).unwrap();
    let clamped = builder.clamp(loc, lo, arg, hi).unwrap();

    let function = builder.finish(vec![clamped]).unwrap();
    assert_eq!(function.operation_count(), 3);
    assert_eq!(
        function.body.operations[2].op,
        Op::Clamp {
            result: clamped,
            min: lo,
            operand: arg,
            max: hi,
        }
    );
    assert_eq!(
        function.result_types(),
        vec![TensorType::ranked(&[2, 3], ElementType::F32)]
    );
}

#[test]
fn test_clamp_rejects_mismatched_bound() {
    let mut builder = OpBuilder::new("main");
    let arg = builder.add_argument(TensorType::ranked(&[2], ElementType::F32));
    let other = builder.add_argument(TensorType::ranked(&[2], ElementType::I32));

    let err = builder
        .clamp(Location::Unknown, other, arg, other)
        .unwrap_err();
    assert!(matches!(err, IrError::TypeError(_)));
    assert_eq!(builder.operation_count(), 0);
}

#[test]
fn test_convert_changes_element_only() {
    let (mut builder, arg) = builder_with_input();
    let converted = builder
        .convert(Location::Unknown, arg, ElementType::F16)
        .unwrap();

    assert_eq!(
        builder.value_type(converted).unwrap(),
        &TensorType::ranked(&[2, 3], ElementType::F16)
    );
}

#[test]
fn test_unknown_operand_is_rejected() {
    let (mut builder, _) = builder_with_input();
    let err = builder
        .unary(Location::Unknown, UnaryKind::Neg, ValueId(42))
        .unwrap_err();
    assert_eq!(err, IrError::UnknownValue(ValueId(42)));
    assert_eq!(builder.operation_count(), 0);
}

#[test]
fn test_insertion_point_before() {
    let (mut builder, arg) = builder_with_input();
    let first = builder.unary(Location::Unknown, UnaryKind::Exp, arg).unwrap();

    builder.set_insertion_point(InsertionPoint::Before(0));
    let second = builder.unary(Location::Unknown, UnaryKind::Neg, arg).unwrap();
    assert_eq!(builder.insertion_point(), InsertionPoint::Before(1));

    let third = builder.unary(Location::Unknown, UnaryKind::Abs, arg).unwrap();

    let function = builder.finish(vec![first]).unwrap();
    let order: Vec<ValueId> = function
        .body
        .operations
        .iter()
        .flat_map(|op| op.results())
        .collect();
    assert_eq!(order, vec![second, third, first]);
}

#[test]
fn test_insertion_point_out_of_range() {
    let (mut builder, arg) = builder_with_input();
    builder.set_insertion_point(InsertionPoint::After(3));
    let err = builder
        .unary(Location::Unknown, UnaryKind::Exp, arg)
        .unwrap_err();
    assert_eq!(err, IrError::InvalidInsertionPoint { index: 3, len: 0 });
    assert_eq!(builder.function().value_types.len(), 1);
    assert_eq!(builder.operation_count(), 0);
}

#[test]
fn test_finish_requires_known_results() {
    let (builder, _) = builder_with_input();
    assert!(builder.finish(vec![ValueId(9)]).is_err());
}
