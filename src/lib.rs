// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Quantified expressions of the XACML 3.0 Related and Nested Entities profile.
//!
//! A [`QuantifiedExpression`] binds a variable to each element of a domain bag and
//! evaluates an iterant expression with that binding in place. `ForAll` and
//! `ForAny` ([`Quantifier::Exists`]) combine the per-element booleans under
//! three-valued logic, `Select` filters the domain and `Map` transforms it.

// Expressions are built once at policy-load time and shared across requests.
pub(crate) use std::sync::Arc as Rc;

mod config;
mod context;
mod expression;
mod quantified;
mod result;
mod status;
mod value;

pub use config::EvaluationConfig;
pub use context::{ContextError, EvaluationContext, ScopeGuard, ScopeHandle};
pub use expression::{AttributeValue, BagValue, ExprRef, Expression, VariableReference};
pub use quantified::{QuantifiedExpression, Quantifier};
pub use result::ExpressionResult;
pub use status::{Status, StatusCode};
pub use value::{Bag, DataType, Value, ValueError};
