use crate::location::Location;
use crate::values::ValueId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryKind {
    Tanh,
    Neg,
    Exp,
    Rsqrt,
    Erf,
    Log,
    Sqrt,
    Abs,
    Sin,
    Cos,
    Floor,
    Ceil,
    Logistic,
}

impl UnaryKind {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            UnaryKind::Tanh => "tanh",
            UnaryKind::Neg => "negate",
            UnaryKind::Exp => "exponential",
            UnaryKind::Rsqrt => "rsqrt",
            UnaryKind::Erf => "erf",
            UnaryKind::Log => "log",
            UnaryKind::Sqrt => "sqrt",
            UnaryKind::Abs => "abs",
            UnaryKind::Sin => "sine",
            UnaryKind::Cos => "cosine",
            UnaryKind::Floor => "floor",
            UnaryKind::Ceil => "ceil",
            UnaryKind::Logistic => "logistic",
        }
    }
}

impl fmt::Display for UnaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Compile-time selector for an elementwise unary operation.
///
/// Converters are written once, generic over this trait, and instantiated per operator.
pub trait ElementwiseUnary {
    const KIND: UnaryKind;
}

macro_rules! unary_markers {
    ($($marker:ident => $kind:ident),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $marker;

            impl ElementwiseUnary for $marker {
                const KIND: UnaryKind = UnaryKind::$kind;
            }
        )*
    };
}

unary_markers! {
    TanhOp => Tanh,
    NegOp => Neg,
    ExpOp => Exp,
    RsqrtOp => Rsqrt,
    ErfOp => Erf,
    LogOp => Log,
    SqrtOp => Sqrt,
    AbsOp => Abs,
    SinOp => Sin,
    CosOp => Cos,
    FloorOp => Floor,
    CeilOp => Ceil,
    LogisticOp => Logistic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Op {
    Unary {
        kind: UnaryKind,
        result: ValueId,
        operand: ValueId,
    },
    /// Scalar splatted to the type of `like`.
    ConstantLike {
        result: ValueId,
        value: f64,
        like: ValueId,
    },
    Clamp {
        result: ValueId,
        min: ValueId,
        operand: ValueId,
        max: ValueId,
    },
    /// Elementwise conversion; the target element type lives in the result's type.
    Convert {
        result: ValueId,
        operand: ValueId,
    },
}

impl Op {
    pub fn results(&self) -> Vec<ValueId> {
        match self {
            Op::Unary { result, .. }
            | Op::ConstantLike { result, .. }
            | Op::Clamp { result, .. }
            | Op::Convert { result, .. } => vec![*result],
        }
    }

    pub fn operands(&self) -> Vec<ValueId> {
        match self {
            Op::Unary { operand, .. } | Op::Convert { operand, .. } => vec![*operand],
            Op::ConstantLike { like, .. } => vec![*like],
            Op::Clamp {
                min, operand, max, ..
            } => vec![*min, *operand, *max],
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Op::Unary { kind, .. } => kind.mnemonic(),
            Op::ConstantLike { .. } => "constant_like",
            Op::Clamp { .. } => "clamp",
            Op::Convert { .. } => "convert",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub op: Op,
    pub location: Location,
}

impl Operation {
    pub fn new(op: Op, location: Location) -> Self {
        Self { op, location }
    }

    pub fn results(&self) -> Vec<ValueId> {
        self.op.results()
    }

    pub fn operands(&self) -> Vec<ValueId> {
        self.op.operands()
    }

    pub fn mnemonic(&self) -> &'static str {
        self.op.mnemonic()
    }
}
