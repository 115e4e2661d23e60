use crate::errors::{Result, TransformError};
use crate::graph::SourceType;
use crate::scalar_type::ScalarType;
use jitlower_core::{Dim, ElementType, TensorType};

/// Translates source scalar-type tags and value types into target IR types.
pub struct TypeBridge;

impl TypeBridge {
    /// Maps a scalar tag to its element type. Tags without a target counterpart are rejected
    /// rather than approximated.
    pub fn build_element_type(scalar: ScalarType) -> Result<ElementType> {
        match scalar {
            ScalarType::Byte => Ok(ElementType::UI8),
            ScalarType::Char => Ok(ElementType::I8),
            ScalarType::Short => Ok(ElementType::I16),
            ScalarType::Int => Ok(ElementType::I32),
            ScalarType::Long => Ok(ElementType::I64),
            ScalarType::Half => Ok(ElementType::F16),
            ScalarType::Float => Ok(ElementType::F32),
            ScalarType::Double => Ok(ElementType::F64),
            ScalarType::ComplexFloat => Ok(ElementType::Complex64),
            ScalarType::ComplexDouble => Ok(ElementType::Complex128),
            ScalarType::Bool => Ok(ElementType::I1),
            ScalarType::BFloat16 => Ok(ElementType::BF16),
            ScalarType::ComplexHalf
            | ScalarType::QInt8
            | ScalarType::QUInt8
            | ScalarType::QInt32 => Err(TransformError::UnsupportedScalarTag(scalar.code())),
        }
    }

    /// Same as `build_element_type`, starting from the raw integral code of a constant operand.
    pub fn build_element_type_from_code(code: i64) -> Result<ElementType> {
        Self::build_element_type(ScalarType::try_from(code)?)
    }

    /// Type of a graph input once it becomes a function argument.
    ///
    /// Tensors without a dtype fall back to `default_dtype`; unknown ranks are rejected since the
    /// target IR only has ranked tensors. `int`, `float` and `bool` become rank-0 tensors.
    pub fn build_tensor_type(ty: &SourceType, default_dtype: ScalarType) -> Result<TensorType> {
        match ty {
            SourceType::Tensor { dtype, sizes } => {
                let element = Self::build_element_type(dtype.unwrap_or(default_dtype))?;
                let sizes = sizes.as_ref().ok_or_else(|| TransformError::UnsupportedType {
                    ty: ty.to_string(),
                    reason: "unknown rank".to_string(),
                })?;
                let shape = sizes
                    .iter()
                    .map(|size| size.map_or(Dim::Dynamic, Dim::Static))
                    .collect();
                Ok(TensorType::new(shape, element))
            }
            SourceType::Int => Ok(TensorType::scalar(ElementType::I64)),
            SourceType::Float => Ok(TensorType::scalar(ElementType::F64)),
            SourceType::Bool => Ok(TensorType::scalar(ElementType::I1)),
            other => Err(TransformError::UnsupportedType {
                ty: other.to_string(),
                reason: "no tensor representation".to_string(),
            }),
        }
    }
}

pub fn build_element_type(scalar: ScalarType) -> Result<ElementType> {
    TypeBridge::build_element_type(scalar)
}
