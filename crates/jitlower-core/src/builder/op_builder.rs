use super::InsertionPoint;
use crate::{
    block::Terminator,
    function::{Function, FunctionArgument},
    location::Location,
    operations::{Op, Operation, UnaryKind},
    types::{ElementType, TensorType},
    values::ValueId,
    IrError, Result,
};

#[derive(Debug)]
pub struct OpBuilder {
    function: Function,
    position: InsertionPoint,
    next_value: u32,
}

impl OpBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            function: Function::new(name),
            position: InsertionPoint::End,
            next_value: 0,
        }
    }

    pub fn add_argument(&mut self, ty: TensorType) -> ValueId {
        let value = self.fresh_value();
        self.function.value_types.insert(value, ty.clone());
        self.function
            .arguments
            .push(FunctionArgument { value, ty });
        value
    }

    pub fn function(&self) -> &Function {
        &self.function
    }

    pub fn insertion_point(&self) -> InsertionPoint {
        self.position
    }

    pub fn set_insertion_point(&mut self, position: InsertionPoint) {
        self.position = position;
    }

    pub fn value_type(&self, value: ValueId) -> Result<&TensorType> {
        self.function
            .value_types
            .get(&value)
            .ok_or(IrError::UnknownValue(value))
    }

    pub fn operation_count(&self) -> usize {
        self.function.body.len()
    }

    /// Places a fully formed operation at the insertion point.
    ///
    /// Every operand and result must already have a type; the typed helpers below take care of
    /// that and are the normal way in.
    pub fn insert(&mut self, operation: Operation) -> Result<()> {
        for value in operation.operands().into_iter().chain(operation.results()) {
            self.value_type(value)?;
        }
        self.place(operation)
    }

    pub fn unary(&mut self, location: Location, kind: UnaryKind, operand: ValueId) -> Result<ValueId> {
        let ty = self.value_type(operand)?.clone();
        self.emit(location, ty, |result| Op::Unary {
            kind,
            result,
            operand,
        })
    }

    pub fn constant_like(&mut self, location: Location, value: f64, like: ValueId) -> Result<ValueId> {
        let ty = self.value_type(like)?.clone();
        self.emit(location, ty, |result| Op::ConstantLike { result, value, like })
    }

    pub fn clamp(
        &mut self,
        location: Location,
        min: ValueId,
        operand: ValueId,
        max: ValueId,
    ) -> Result<ValueId> {
        let ty = self.value_type(operand)?.clone();
        for bound in [min, max] {
            let bound_ty = self.value_type(bound)?;
            let broadcastable = bound_ty.rank() == 0 || bound_ty == &ty;
            if bound_ty.element != ty.element || !broadcastable {
                return Err(IrError::TypeError(format!(
                    "clamp bound {} of type {} does not broadcast to {}",
                    bound, bound_ty, ty
                )));
            }
        }
        self.emit(location, ty, |result| Op::Clamp {
            result,
            min,
            operand,
            max,
        })
    }

    pub fn convert(&mut self, location: Location, operand: ValueId, element: ElementType) -> Result<ValueId> {
        let ty = self.value_type(operand)?.with_element(element);
        self.emit(location, ty, |result| Op::Convert { result, operand })
    }

    pub fn finish(mut self, results: Vec<ValueId>) -> Result<Function> {
        for value in &results {
            self.value_type(*value)?;
        }
        self.function.body.terminator = Terminator::Return(results);
        Ok(self.function)
    }

    fn fresh_value(&mut self) -> ValueId {
        let value = ValueId(self.next_value);
        self.next_value += 1;
        value
    }

    fn place(&mut self, operation: Operation) -> Result<()> {
        self.position = self.position.insert(&mut self.function.body, operation)?;
        Ok(())
    }

    /// Builds and places an operation with one fresh result. The result is typed only once the
    /// operation is in the block, so a rejected insertion leaves no orphan value behind.
    fn emit(&mut self, location: Location, ty: TensorType, build: impl FnOnce(ValueId) -> Op) -> Result<ValueId> {
        let result = self.fresh_value();
        self.place(Operation::new(build(result), location))?;
        self.function.value_types.insert(result, ty);
        Ok(result)
    }
}
