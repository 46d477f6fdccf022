// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::context::EvaluationContext;
use crate::expression::Expression;
use crate::result::ExpressionResult;
use crate::value::{Bag, Value};

/// A constant scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeValue {
    value: Value,
}

impl AttributeValue {
    pub fn new(value: impl Into<Value>) -> AttributeValue {
        AttributeValue {
            value: value.into(),
        }
    }
}

impl Expression for AttributeValue {
    fn evaluate(&self, _context: &mut EvaluationContext) -> ExpressionResult {
        ExpressionResult::Ok(self.value.clone())
    }
}

/// A constant bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BagValue {
    bag: Bag,
}

impl BagValue {
    pub fn new(bag: Bag) -> BagValue {
        BagValue { bag }
    }
}

impl Expression for BagValue {
    fn evaluate(&self, _context: &mut EvaluationContext) -> ExpressionResult {
        ExpressionResult::OkBag(self.bag.clone())
    }
}
