// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::status::{Status, StatusCode};
use crate::value::{Bag, Value};

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Outcome of evaluating an expression.
///
/// Indeterminate is ordinary data here: quantifiers inspect it to decide whether a
/// conclusive element outcome supersedes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionResult {
    Ok(Value),
    OkBag(Bag),
    Indeterminate(Status),
}

impl ExpressionResult {
    pub fn error(code: StatusCode, message: impl Into<crate::Rc<str>>) -> ExpressionResult {
        ExpressionResult::Indeterminate(Status::new(code, message))
    }

    pub fn is_ok(&self) -> bool {
        !matches!(self, ExpressionResult::Indeterminate(_))
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            ExpressionResult::Ok(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bag(&self) -> Option<&Bag> {
        match self {
            ExpressionResult::OkBag(b) => Some(b),
            _ => None,
        }
    }

    /// Status of the result. Successful results report [`StatusCode::Ok`].
    pub fn status(&self) -> Status {
        match self {
            ExpressionResult::Indeterminate(s) => s.clone(),
            _ => Status::ok(),
        }
    }
}

impl From<Value> for ExpressionResult {
    fn from(v: Value) -> Self {
        ExpressionResult::Ok(v)
    }
}

impl From<bool> for ExpressionResult {
    fn from(b: bool) -> Self {
        ExpressionResult::Ok(Value::Bool(b))
    }
}

impl From<Bag> for ExpressionResult {
    fn from(b: Bag) -> Self {
        ExpressionResult::OkBag(b)
    }
}

impl From<Status> for ExpressionResult {
    fn from(s: Status) -> Self {
        ExpressionResult::Indeterminate(s)
    }
}

impl Serialize for ExpressionResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            ExpressionResult::Ok(v) => map.serialize_entry("value", v)?,
            ExpressionResult::OkBag(b) => map.serialize_entry("bag", b)?,
            ExpressionResult::Indeterminate(s) => map.serialize_entry("indeterminate", s)?,
        }
        map.end()
    }
}
