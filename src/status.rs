// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::Rc;

use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const XACML_STATUS_OK: &str = "urn:oasis:names:tc:xacml:1.0:status:ok";
const XACML_STATUS_SYNTAX_ERROR: &str = "urn:oasis:names:tc:xacml:1.0:status:syntax-error";
const XACML_STATUS_PROCESSING_ERROR: &str = "urn:oasis:names:tc:xacml:1.0:status:processing-error";

/// Stable status identifiers carried by indeterminate results.
///
/// A status forwarded from a sub-expression keeps its original code; there is
/// no separate "propagated" code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    Ok,
    /// Iterant evaluated to a bag where a scalar was required.
    ReturnedBag,
    /// Iterant evaluated to a scalar that is not a boolean.
    ReturnedNonBoolean,
    /// Domain evaluated to a scalar where a bag was required.
    ReturnedNonBag,
    UnboundVariable,
    /// Map iterant produced values of more than one datatype.
    BagTypeMismatch,
    ScopeLimitExceeded,
    /// Expression was evaluated before its variable, domain or iterant was set.
    MissingExpression,
    ProcessingError,
}

impl StatusCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::ReturnedBag => "RETURNED_BAG",
            StatusCode::ReturnedNonBoolean => "RETURNED_NON_BOOLEAN",
            StatusCode::ReturnedNonBag => "RETURNED_NON_BAG",
            StatusCode::UnboundVariable => "UNBOUND_VARIABLE",
            StatusCode::BagTypeMismatch => "BAG_TYPE_MISMATCH",
            StatusCode::ScopeLimitExceeded => "SCOPE_LIMIT_EXCEEDED",
            StatusCode::MissingExpression => "MISSING_EXPRESSION",
            StatusCode::ProcessingError => "PROCESSING_ERROR",
        }
    }

    /// The XACML status code reported at the decision point boundary.
    pub fn xacml_urn(&self) -> &'static str {
        match self {
            StatusCode::Ok => XACML_STATUS_OK,
            StatusCode::MissingExpression => XACML_STATUS_SYNTAX_ERROR,
            _ => XACML_STATUS_PROCESSING_ERROR,
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status code together with a human readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{code}: {message}")]
pub struct Status {
    code: StatusCode,
    message: Rc<str>,
}

impl Status {
    pub fn new(code: StatusCode, message: impl Into<Rc<str>>) -> Status {
        Status {
            code,
            message: message.into(),
        }
    }

    pub fn ok() -> Status {
        Status::new(StatusCode::Ok, "")
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
