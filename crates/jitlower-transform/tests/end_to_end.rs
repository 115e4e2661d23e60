use jitlower_core::{ElementType, Op, TensorType, UnaryKind};
use jitlower_transform::converters::{convert_hardtanh, convert_identity, convert_unary};
use jitlower_transform::graph::SourceType;
use jitlower_transform::{
    lower_graph, read_graph, ConversionContext, Converter, IValue, LoweringConfig, OperatorTable,
    PatternRegistry, SkipReason, TransformError, UnsupportedPolicy,
};
use jitlower_core::operations::{NegOp, TanhOp};
use pretty_assertions::assert_eq;

fn builtin() -> (PatternRegistry, OperatorTable) {
    (
        PatternRegistry::with_builtins().unwrap(),
        OperatorTable::builtin().unwrap(),
    )
}

fn skip_config() -> LoweringConfig {
    LoweringConfig {
        on_unsupported: UnsupportedPolicy::Skip,
        ..LoweringConfig::default()
    }
}

#[test]
fn test_clamp_tanh_neg_chain() {
    let mut registry = PatternRegistry::new();
    registry
        .register("aten::hardtanh(Tensor self) -> Tensor", Converter::new("hardtanh", convert_hardtanh))
        .unwrap()
        .register("aten::tanh(Tensor self) -> Tensor", Converter::new("tanh", convert_unary::<TanhOp>))
        .unwrap()
        .register("aten::neg(Tensor self) -> Tensor", Converter::new("neg", convert_unary::<NegOp>))
        .unwrap();
    let table = OperatorTable::builtin().unwrap();

    let mut graph = read_graph(
        r#"
graph(%x : Float(2, 3)):
  %a : Float(2, 3) = aten::hardtanh(%x)
  %b : Float(2, 3) = aten::tanh(%a)
  %c : Float(2, 3) = aten::neg(%b)
  return (%c)
"#,
    )
    .unwrap();
    let lowered = lower_graph(&mut graph, &registry, &table, &LoweringConfig::default()).unwrap();
    let function = &lowered.function;

    assert_eq!(lowered.report.converted, 3);
    let arg = function.arguments[0].value;

    // Bound constants aside, the chain is exactly three operations in program order.
    let chain: Vec<&Op> = function
        .body
        .operations
        .iter()
        .map(|op| &op.op)
        .filter(|op| !matches!(op, Op::ConstantLike { .. }))
        .collect();
    assert_eq!(chain.len(), 3);

    let clamp_result = match chain[0] {
        Op::Clamp { result, operand, .. } => {
            assert_eq!(*operand, arg);
            *result
        }
        other => panic!("expected clamp, got {:?}", other),
    };
    let tanh_result = match chain[1] {
        Op::Unary {
            kind: UnaryKind::Tanh,
            result,
            operand,
        } => {
            assert_eq!(*operand, clamp_result);
            *result
        }
        other => panic!("expected tanh, got {:?}", other),
    };
    let neg_result = match chain[2] {
        Op::Unary {
            kind: UnaryKind::Neg,
            result,
            operand,
        } => {
            assert_eq!(*operand, tanh_result);
            *result
        }
        other => panic!("expected neg, got {:?}", other),
    };
    assert_eq!(function.body.terminator.operands(), &[neg_result]);
    assert_eq!(
        function.result_types(),
        vec![TensorType::ranked(&[2, 3], ElementType::F32)]
    );
}

#[test]
fn test_value_table_gains_one_entry_per_output() {
    let mut graph = read_graph(
        r#"
graph(%x : Float(4)):
  %a : Float(4) = aten::tanh(%x)
  %b : Float(4) = aten::neg(%a)
  %c : Float(4) = aten::exp(%b)
  return (%c)
"#,
    )
    .unwrap();
    let (registry, table) = builtin();
    graph.resolve_schemas(&table);

    let mut ctx = ConversionContext::new("main");
    let x = graph.inputs[0];
    let arg = ctx
        .builder_mut()
        .add_argument(TensorType::ranked(&[4], ElementType::F32));
    ctx.set_value(x, arg);

    for node in &graph.nodes {
        let view = graph.view(node);
        let before = ctx.mapped_count();
        let converter = registry.lookup(view.schema().unwrap()).unwrap();
        assert!(converter.call(&mut ctx, &view).unwrap());
        assert_eq!(ctx.mapped_count(), before + 1);
        assert!(ctx.is_mapped(node.outputs[0]));
    }
    assert_eq!(ctx.lookup(x), Some(arg));
    assert_eq!(ctx.mapped_count(), 4);
    assert_eq!(ctx.builder().operation_count(), 3);
}

const TO_DYNAMIC_DTYPE: &str = r#"
graph(%x : Float(2, 3),
      %dtype : int):
  %false : bool = prim::Constant[value=0]()
  %none : NoneType = prim::Constant()
  %y : Tensor = aten::to(%x, %dtype, %false, %false, %none) # model.py:9:8
  return (%y)
"#;

#[test]
fn test_dynamic_dtype_cast_is_declined() {
    let (registry, table) = builtin();
    let mut graph = read_graph(TO_DYNAMIC_DTYPE).unwrap();

    let err = lower_graph(&mut graph, &registry, &table, &LoweringConfig::default()).unwrap_err();
    assert_eq!(
        err,
        TransformError::ConversionFailed {
            converter: "to_dtype".to_string(),
            kind: "aten::to".to_string()
        }
    );

    let mut graph = read_graph(TO_DYNAMIC_DTYPE).unwrap();
    let lowered = lower_graph(&mut graph, &registry, &table, &skip_config()).unwrap();
    assert_eq!(lowered.report.skipped.len(), 1);
    assert_eq!(
        lowered.report.skipped[0].reason,
        SkipReason::Declined("to_dtype".to_string())
    );
    assert_eq!(lowered.report.dropped_outputs, vec!["%y".to_string()]);
    assert_eq!(lowered.function.operation_count(), 0);
}

#[test]
fn test_static_dtype_cast() {
    let (registry, table) = builtin();
    let mut graph = read_graph(
        r#"
graph(%x : Float(2, 3)):
  %dtype : int = prim::Constant[value=5]()
  %false : bool = prim::Constant[value=0]()
  %none : NoneType = prim::Constant()
  %y : Half(2, 3) = aten::to(%x, %dtype, %false, %false, %none)
  return (%y)
"#,
    )
    .unwrap();
    let lowered = lower_graph(&mut graph, &registry, &table, &LoweringConfig::default()).unwrap();
    assert_eq!(
        lowered.function.result_types(),
        vec![TensorType::ranked(&[2, 3], ElementType::F16)]
    );
}

#[test]
fn test_passthrough_preserves_identity() {
    let (registry, table) = builtin();
    let mut graph = read_graph(
        r#"
graph(%x : Float(8)):
  %none : NoneType = prim::Constant()
  %a : Float(8) = aten::cuda(%x)
  %b : Float(8) = aten::detach(%a)
  %c : Float(8) = aten::clone(%b, %none)
  %d : Float(8) = aten::cpu(%c)
  return (%d)
"#,
    )
    .unwrap();
    let lowered = lower_graph(&mut graph, &registry, &table, &LoweringConfig::default()).unwrap();
    let function = &lowered.function;

    assert_eq!(lowered.report.converted, 4);
    assert_eq!(function.operation_count(), 0);
    assert_eq!(
        function.body.terminator.operands(),
        &[function.arguments[0].value]
    );
}

#[test]
fn test_clamp_with_operand_bounds() {
    let (registry, table) = builtin();
    let mut graph = read_graph(
        r#"
graph(%x : Int(3)):
  %lo : int = prim::Constant[value=0]()
  %none : NoneType = prim::Constant()
  %y : Int(3) = aten::clamp(%x, %lo, %none)
  return (%y)
"#,
    )
    .unwrap();
    let lowered = lower_graph(&mut graph, &registry, &table, &LoweringConfig::default()).unwrap();
    let ops = &lowered.function.body.operations;
    assert_eq!(ops.len(), 3);
    assert_eq!(
        ops[1].op,
        Op::ConstantLike {
            result: jitlower_core::ValueId(2),
            value: i32::MAX as f64,
            like: jitlower_core::ValueId(0)
        }
    );
    assert_eq!(
        lowered.function.result_types(),
        vec![TensorType::ranked(&[3], ElementType::I32)]
    );
}

#[test]
fn test_unregistered_schema() {
    let (registry, table) = builtin();
    let source = r#"
graph(%x : Float(2)):
  %y : Float(2) = aten::relu(%x)
  %z : Float(2) = aten::tanh(%y)
  return (%z)
"#;

    let mut graph = read_graph(source).unwrap();
    let err = lower_graph(&mut graph, &registry, &table, &LoweringConfig::default()).unwrap_err();
    assert_eq!(
        err,
        TransformError::UnregisteredSchema {
            kind: "aten::relu".to_string(),
            schema: "aten::relu(Tensor self) -> Tensor".to_string()
        }
    );

    let mut graph = read_graph(source).unwrap();
    let lowered = lower_graph(&mut graph, &registry, &table, &skip_config()).unwrap();
    let reasons: Vec<_> = lowered.report.skipped.iter().map(|s| s.reason.clone()).collect();
    assert_eq!(
        reasons,
        vec![
            SkipReason::Unregistered("aten::relu(Tensor self) -> Tensor".to_string()),
            SkipReason::UnmappedOperand("%y".to_string()),
        ]
    );
    assert!(!lowered.report.is_complete());
}

#[test]
fn test_default_token_changes_dispatch() {
    let (registry, table) = builtin();
    // The three-argument hardtanh overload is a different schema than the fixed-bound one.
    let mut graph = read_graph(
        r#"
graph(%x : Float(2)):
  %lo : float = prim::Constant[value=-2.]()
  %hi : float = prim::Constant[value=2.]()
  %y : Float(2) = aten::hardtanh(%x, %lo, %hi)
  return (%y)
"#,
    )
    .unwrap();
    let err = lower_graph(&mut graph, &registry, &table, &LoweringConfig::default()).unwrap_err();
    assert!(matches!(err, TransformError::UnregisteredSchema { .. }));
}

#[test]
fn test_unknown_operator() {
    let (registry, table) = builtin();
    let mut graph = read_graph(
        r#"
graph(%x : Float(2)):
  %y : Float(2) = custom::frobnicate(%x)
  return (%y)
"#,
    )
    .unwrap();
    let err = lower_graph(&mut graph, &registry, &table, &LoweringConfig::default()).unwrap_err();
    assert_eq!(
        err,
        TransformError::UnresolvedSchema("custom::frobnicate".to_string())
    );
}

#[test]
fn test_incomplete_conversion_is_detected() {
    fn forgetful(
        _ctx: &mut ConversionContext,
        _node: &jitlower_transform::NodeView<'_>,
    ) -> jitlower_transform::Result<bool> {
        Ok(true)
    }

    let mut registry = PatternRegistry::new();
    registry
        .register("aten::tanh(Tensor self) -> Tensor", Converter::new("forgetful", forgetful))
        .unwrap();
    let table = OperatorTable::builtin().unwrap();
    let mut graph = read_graph(
        r#"
graph(%x : Float(2)):
  %y : Float(2) = aten::tanh(%x)
  return (%y)
"#,
    )
    .unwrap();
    let err = lower_graph(&mut graph, &registry, &table, &LoweringConfig::default()).unwrap_err();
    assert_eq!(
        err,
        TransformError::IncompleteConversion {
            converter: "forgetful".to_string(),
            kind: "aten::tanh".to_string(),
            output: "%y".to_string()
        }
    );
}

#[test]
fn test_scalar_and_untyped_inputs() {
    let (registry, table) = builtin();
    let mut graph = read_graph(
        r#"
graph(%x : Tensor,
      %n : int):
  return (%n)
"#,
    )
    .unwrap();
    let err = lower_graph(&mut graph, &registry, &table, &LoweringConfig::default()).unwrap_err();
    assert!(matches!(err, TransformError::UnsupportedInput { ref name, .. } if name == "%x"));

    let mut graph = read_graph(
        r#"
graph(%x : Float(*, 4),
      %n : int):
  return (%x, %n)
"#,
    )
    .unwrap();
    let lowered = lower_graph(&mut graph, &registry, &table, &LoweringConfig::default()).unwrap();
    let types: Vec<String> = lowered
        .function
        .arguments
        .iter()
        .map(|a| a.ty.to_string())
        .collect();
    assert_eq!(types, vec!["tensor<?x4xf32>", "tensor<i64>"]);
}

#[test]
fn test_locations_follow_source_comments() {
    let (registry, table) = builtin();
    let mut graph = read_graph(
        r#"
graph(%x : Float(2)):
  %y : Float(2) = aten::erf(%x) # /src/model.py:42:15
  return (%y)
"#,
    )
    .unwrap();
    let lowered = lower_graph(&mut graph, &registry, &table, &LoweringConfig::default()).unwrap();
    assert_eq!(
        lowered.function.body.operations[0].location.to_string(),
        "\"aten::erf\"(\"/src/model.py\":42:15)"
    );
}

#[test]
fn test_registry_is_shared_across_threads() {
    let registry = PatternRegistry::with_builtins().unwrap();
    let table = OperatorTable::builtin().unwrap();
    let source = r#"
graph(%x : Float(16)):
  %a : Float(16) = aten::sigmoid(%x)
  %b : Float(16) = aten::contiguous(%a)
  return (%b)
"#;

    let (registry, table) = (&registry, &table);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(move || {
                    let mut graph = read_graph(source).unwrap();
                    lower_graph(&mut graph, registry, table, &LoweringConfig::default())
                        .unwrap()
                        .function
                })
            })
            .collect();
        let functions: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for function in &functions {
            assert_eq!(function, &functions[0]);
        }
    });
}

#[test]
fn test_constant_resolution() {
    let mut graph = read_graph(
        r#"
graph(%x : Float(2)):
  %i : int = prim::Constant[value=3]()
  %f : float = prim::Constant[value=0.5]()
  %s : str = prim::Constant[value="cpu"]()
  %l : int[] = prim::Constant[value=[1, 2]]()
  %n : NoneType = prim::Constant()
  %y : Float(2) = aten::tanh(%x)
  return (%y)
"#,
    )
    .unwrap();
    let (_, table) = builtin();
    graph.resolve_schemas(&table);

    let values: Vec<Option<IValue>> = graph
        .values
        .iter()
        .map(|v| graph.to_ivalue(v.id))
        .collect();
    assert_eq!(
        values,
        vec![
            None,
            Some(IValue::Int(3)),
            Some(IValue::Double(0.5)),
            Some(IValue::Str("cpu".to_string())),
            Some(IValue::IntList(vec![1, 2])),
            Some(IValue::None),
            None,
        ]
    );
    assert_eq!(graph.values[4].ty, SourceType::IntList);
}

#[test]
fn test_redefinition_is_rejected() {
    let err = read_graph(
        r#"
graph(%x : Float(2)):
  %x : Float(2) = aten::tanh(%x)
  return (%x)
"#,
    )
    .unwrap_err();
    assert_eq!(err, TransformError::RedefinedValue("%x".to_string()));
}

#[test]
fn test_identity_converter_is_reusable() {
    let mut registry = PatternRegistry::new();
    let identity = Converter::new("identity", convert_identity);
    registry
        .register("aten::cuda(Tensor(a) self) -> (Tensor(b|a))", identity)
        .unwrap()
        .register("aten::cpu(Tensor(a) self) -> (Tensor(b|a))", identity)
        .unwrap();
    assert_eq!(registry.schemas().len(), 2);
}

#[test]
fn test_constant_tensor_operand_is_skipped() {
    let (registry, table) = builtin();
    let source = r#"
graph(%x : Float(2)):
  %c : Tensor = prim::Constant[value=1]()
  %a : Tensor = aten::tanh(%c)
  %b : Float(2) = aten::neg(%x)
  return (%b)
"#;

    let mut graph = read_graph(source).unwrap();
    let lowered = lower_graph(&mut graph, &registry, &table, &skip_config()).unwrap();
    assert_eq!(lowered.report.converted, 1);
    assert_eq!(lowered.report.skipped.len(), 1);
    assert_eq!(lowered.report.skipped[0].kind, "aten::tanh");
    assert_eq!(
        lowered.report.skipped[0].reason,
        SkipReason::UnmappedOperand("%c".to_string())
    );
    assert_eq!(lowered.function.operation_count(), 1);

    let mut graph = read_graph(source).unwrap();
    let err = lower_graph(&mut graph, &registry, &table, &LoweringConfig::default()).unwrap_err();
    assert_eq!(err, TransformError::UnmappedValue("%c".to_string()));
}

#[test]
fn test_module_self_input_is_left_unbound() {
    let (registry, table) = builtin();
    let mut graph = read_graph(
        r#"
graph(%self : __torch__.Model,
      %x : Float(2)):
  %y : Float(2) = aten::neg(%x)
  return (%y)
"#,
    )
    .unwrap();
    let this = graph.inputs[0];
    assert_eq!(
        graph.value(this).map(|v| v.ty.clone()),
        Some(SourceType::Other("__torch__.Model".to_string()))
    );

    let lowered = lower_graph(&mut graph, &registry, &table, &LoweringConfig::default()).unwrap();
    assert_eq!(lowered.function.arguments.len(), 1);
    assert_eq!(
        lowered.function.arguments[0].ty,
        TensorType::ranked(&[2], ElementType::F32)
    );
    assert!(lowered.report.is_complete());
}
