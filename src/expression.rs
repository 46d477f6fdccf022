// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::context::EvaluationContext;
use crate::result::ExpressionResult;
use crate::status::Status;
use crate::Rc;

use core::fmt;

mod literal;
mod variable;

pub use literal::{AttributeValue, BagValue};
pub use variable::VariableReference;

/// A node of a policy expression tree.
///
/// Nodes are immutable once built and may be evaluated concurrently, each
/// evaluation against the context of its own request.
pub trait Expression: fmt::Debug + Send + Sync {
    fn evaluate(&self, context: &mut EvaluationContext) -> ExpressionResult;

    /// Check that the node is complete enough to be evaluated.
    fn validate(&self) -> Result<(), Status> {
        Ok(())
    }
}

pub type ExprRef = Rc<dyn Expression>;
