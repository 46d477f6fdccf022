// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::context::EvaluationContext;
use crate::expression::Expression;
use crate::result::ExpressionResult;
use crate::status::Status;
use crate::Rc;

/// Reads the innermost binding of a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    variable_id: Rc<str>,
}

impl VariableReference {
    pub fn new(variable_id: impl Into<Rc<str>>) -> VariableReference {
        VariableReference {
            variable_id: variable_id.into(),
        }
    }
}

impl Expression for VariableReference {
    fn evaluate(&self, context: &mut EvaluationContext) -> ExpressionResult {
        match context.lookup(&self.variable_id) {
            Ok(value) => ExpressionResult::Ok(value.clone()),
            Err(e) => ExpressionResult::Indeterminate(Status::from(e)),
        }
    }
}
