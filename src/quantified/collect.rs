// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! `Map` and `Select`. Every element contributes to the result, so the first
//! indeterminate element makes the whole expression indeterminate.

use super::{boolean_iterant, returned_bag, IterantError};
use crate::context::EvaluationContext;
use crate::expression::ExprRef;
use crate::result::ExpressionResult;
use crate::status::StatusCode;
use crate::value::Bag;
use crate::Rc;

pub(super) fn map(
    variable_id: &Rc<str>,
    domain: &Bag,
    iterant: &ExprRef,
    context: &mut EvaluationContext,
) -> ExpressionResult {
    let mut values = Bag::default();
    if domain.is_empty() {
        return ExpressionResult::OkBag(values);
    }

    let mut scope = match context.scoped() {
        Ok(scope) => scope,
        Err(e) => return ExpressionResult::Indeterminate(e.into()),
    };
    for element in domain {
        scope.bind(variable_id.clone(), element.clone());
        match iterant.evaluate(&mut scope) {
            ExpressionResult::Ok(value) => {
                if let Err(e) = values.push(value) {
                    return ExpressionResult::error(StatusCode::BagTypeMismatch, e.to_string());
                }
            }
            ExpressionResult::OkBag(_) => return ExpressionResult::Indeterminate(returned_bag()),
            indeterminate => return indeterminate,
        }
    }

    ExpressionResult::OkBag(values)
}

pub(super) fn select(
    variable_id: &Rc<str>,
    domain: &Bag,
    iterant: &ExprRef,
    context: &mut EvaluationContext,
) -> ExpressionResult {
    let mut selected = match domain.data_type() {
        Some(data_type) => Bag::new(data_type),
        None => Bag::default(),
    };
    if domain.is_empty() {
        return ExpressionResult::OkBag(selected);
    }

    let mut scope = match context.scoped() {
        Ok(scope) => scope,
        Err(e) => return ExpressionResult::Indeterminate(e.into()),
    };
    for element in domain {
        scope.bind(variable_id.clone(), element.clone());
        match boolean_iterant(iterant.evaluate(&mut scope)) {
            Ok(true) => {
                if let Err(e) = selected.push(element.clone()) {
                    return ExpressionResult::error(StatusCode::BagTypeMismatch, e.to_string());
                }
            }
            Ok(false) => (),
            Err(IterantError::IllTyped(status) | IterantError::Indeterminate(status)) => {
                return ExpressionResult::Indeterminate(status)
            }
        }
    }

    ExpressionResult::OkBag(selected)
}
