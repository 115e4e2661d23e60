use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    I1,
    I8,
    I16,
    I32,
    I64,
    UI8,
    F16,
    BF16,
    F32,
    F64,
    Complex64,
    Complex128,
}

impl ElementType {
    /// Smallest and largest representable values, as used for open clamp bounds.
    pub fn limits(&self) -> (f64, f64) {
        match self {
            ElementType::I1 => (0.0, 1.0),
            ElementType::UI8 => (0.0, u8::MAX as f64),
            ElementType::I8 => (i8::MIN as f64, i8::MAX as f64),
            ElementType::I16 => (i16::MIN as f64, i16::MAX as f64),
            ElementType::I32 => (i32::MIN as f64, i32::MAX as f64),
            ElementType::I64 => (i64::MIN as f64, i64::MAX as f64),
            _ => (f64::NEG_INFINITY, f64::INFINITY),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::I1 => write!(f, "i1"),
            ElementType::I8 => write!(f, "i8"),
            ElementType::I16 => write!(f, "i16"),
            ElementType::I32 => write!(f, "i32"),
            ElementType::I64 => write!(f, "i64"),
            ElementType::UI8 => write!(f, "ui8"),
            ElementType::F16 => write!(f, "f16"),
            ElementType::BF16 => write!(f, "bf16"),
            ElementType::F32 => write!(f, "f32"),
            ElementType::F64 => write!(f, "f64"),
            ElementType::Complex64 => write!(f, "complex<f32>"),
            ElementType::Complex128 => write!(f, "complex<f64>"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dim {
    Static(i64),
    Dynamic,
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dim::Static(n) => write!(f, "{}", n),
            Dim::Dynamic => write!(f, "?"),
        }
    }
}

/// Ranked tensor type. A rank-0 tensor has an empty shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TensorType {
    pub shape: Vec<Dim>,
    pub element: ElementType,
}

impl TensorType {
    pub fn new(shape: Vec<Dim>, element: ElementType) -> Self {
        Self { shape, element }
    }

    pub fn ranked(dims: &[i64], element: ElementType) -> Self {
        Self {
            shape: dims.iter().map(|d| Dim::Static(*d)).collect(),
            element,
        }
    }

    pub fn scalar(element: ElementType) -> Self {
        Self {
            shape: Vec::new(),
            element,
        }
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn is_static(&self) -> bool {
        self.shape.iter().all(|d| matches!(d, Dim::Static(_)))
    }

    pub fn with_element(&self, element: ElementType) -> Self {
        Self {
            shape: self.shape.clone(),
            element,
        }
    }
}

impl fmt::Display for TensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tensor<")?;
        for dim in &self.shape {
            write!(f, "{}x", dim)?;
        }
        write!(f, "{}>", self.element)
    }
}
