use crate::errors::TransformError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element kind tag as carried by dtype operands of the source graph.
///
/// The discriminants are the integer codes that appear in constant operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    Byte = 0,
    Char = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Half = 5,
    Float = 6,
    Double = 7,
    ComplexHalf = 8,
    ComplexFloat = 9,
    ComplexDouble = 10,
    Bool = 11,
    QInt8 = 12,
    QUInt8 = 13,
    QInt32 = 14,
    BFloat16 = 15,
}

impl ScalarType {
    pub const ALL: [ScalarType; 16] = [
        ScalarType::Byte,
        ScalarType::Char,
        ScalarType::Short,
        ScalarType::Int,
        ScalarType::Long,
        ScalarType::Half,
        ScalarType::Float,
        ScalarType::Double,
        ScalarType::ComplexHalf,
        ScalarType::ComplexFloat,
        ScalarType::ComplexDouble,
        ScalarType::Bool,
        ScalarType::QInt8,
        ScalarType::QUInt8,
        ScalarType::QInt32,
        ScalarType::BFloat16,
    ];

    pub fn code(self) -> i64 {
        self as i64
    }

    /// Maps the tensor type names used in graph dumps (`Float(2, 3)`, `Long(*)`).
    pub fn from_type_name(name: &str) -> Option<ScalarType> {
        let ty = match name {
            "Byte" => ScalarType::Byte,
            "Char" => ScalarType::Char,
            "Short" => ScalarType::Short,
            "Int" => ScalarType::Int,
            "Long" => ScalarType::Long,
            "Half" => ScalarType::Half,
            "Float" => ScalarType::Float,
            "Double" => ScalarType::Double,
            "ComplexHalf" => ScalarType::ComplexHalf,
            "ComplexFloat" => ScalarType::ComplexFloat,
            "ComplexDouble" => ScalarType::ComplexDouble,
            "Bool" => ScalarType::Bool,
            "QInt8" => ScalarType::QInt8,
            "QUInt8" => ScalarType::QUInt8,
            "QInt32" => ScalarType::QInt32,
            "BFloat16" => ScalarType::BFloat16,
            _ => return None,
        };
        Some(ty)
    }
}

impl TryFrom<i64> for ScalarType {
    type Error = TransformError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        ScalarType::ALL
            .iter()
            .copied()
            .find(|ty| ty.code() == code)
            .ok_or(TransformError::UnsupportedScalarTag(code))
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
