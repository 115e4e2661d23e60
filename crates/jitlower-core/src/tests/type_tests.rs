use crate::location::Location;
use crate::types::{Dim, ElementType, TensorType};
use crate::values::ValueId;

#[test]
fn test_tensor_type_display() {
    let ty = TensorType::ranked(&[2, 3], ElementType::F32);
    assert_eq!(ty.to_string(), "tensor<2x3xf32>");

    let dynamic = TensorType::new(vec![Dim::Dynamic, Dim::Static(4)], ElementType::I64);
    assert_eq!(dynamic.to_string(), "tensor<?x4xi64>");
    assert!(!dynamic.is_static());

    let scalar = TensorType::scalar(ElementType::I1);
    assert_eq!(scalar.to_string(), "tensor<i1>");
    assert_eq!(scalar.rank(), 0);
}

#[test]
fn test_with_element_keeps_shape() {
    let ty = TensorType::ranked(&[8, 1], ElementType::F32);
    let converted = ty.with_element(ElementType::BF16);
    assert_eq!(converted.shape, ty.shape);
    assert_eq!(converted.element, ElementType::BF16);
}

#[test]
fn test_element_type_limits() {
    assert_eq!(ElementType::Complex128.to_string(), "complex<f64>");
    assert_eq!(ElementType::UI8.limits(), (0.0, 255.0));
    assert_eq!(ElementType::I8.limits(), (-128.0, 127.0));
    assert_eq!(
        ElementType::F32.limits(),
        (f64::NEG_INFINITY, f64::INFINITY)
    );
}

#[test]
fn test_location_display() {
    assert_eq!(Location::file("model.py", 3, 8).to_string(), "\"model.py\":3:8");
    let named = Location::named_at("aten::tanh", Location::file("model.py", 3, 8));
    assert_eq!(named.to_string(), "\"aten::tanh\"(\"model.py\":3:8)");
    assert_eq!(
        Location::named_at("aten::neg", Location::Unknown),
        Location::named("aten::neg")
    );
}

#[test]
fn test_value_id_display() {
    assert_eq!(ValueId(7).to_string(), "%7");
}
