// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::context::EvaluationContext;
use crate::expression::{ExprRef, Expression};
use crate::result::ExpressionResult;
use crate::status::{Status, StatusCode};
use crate::value::{Bag, Value};
use crate::Rc;

use core::fmt;

use log::debug;

mod collect;

/// The quantified expressions of the Related and Nested Entities profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    /// True unless the iterant is false for some element.
    ForAll,
    /// `ForAny` in the profile. False unless the iterant is true for some element.
    Exists,
    /// The bag of iterant values, one per element.
    Map,
    /// The bag of elements for which the iterant is true.
    Select,
}

impl Quantifier {
    /// Boolean outcome that settles the quantifier as soon as one element produces it.
    ///
    /// The opposite value is both the empty-domain result and the result when no
    /// element produced the dominant value.
    fn dominant(self) -> Option<bool> {
        match self {
            Quantifier::ForAll => Some(false),
            Quantifier::Exists => Some(true),
            Quantifier::Map | Quantifier::Select => None,
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Quantifier::ForAll => "ForAll",
            Quantifier::Exists => "ForAny",
            Quantifier::Map => "Map",
            Quantifier::Select => "Select",
        })
    }
}

/// Binds `variable_id` to each element of the bag produced by the domain
/// expression and evaluates the iterant expression under that binding.
///
/// Built once when the policy is loaded, then only evaluated.
#[derive(Debug, Clone)]
pub struct QuantifiedExpression {
    quantifier: Quantifier,
    variable_id: Option<Rc<str>>,
    domain: Option<ExprRef>,
    iterant: Option<ExprRef>,
}

impl QuantifiedExpression {
    pub fn new(quantifier: Quantifier) -> QuantifiedExpression {
        QuantifiedExpression {
            quantifier,
            variable_id: None,
            domain: None,
            iterant: None,
        }
    }

    pub fn for_all() -> QuantifiedExpression {
        Self::new(Quantifier::ForAll)
    }

    pub fn exists() -> QuantifiedExpression {
        Self::new(Quantifier::Exists)
    }

    pub fn map() -> QuantifiedExpression {
        Self::new(Quantifier::Map)
    }

    pub fn select() -> QuantifiedExpression {
        Self::new(Quantifier::Select)
    }

    pub fn quantifier(&self) -> Quantifier {
        self.quantifier
    }

    pub fn variable_id(&self) -> Option<&str> {
        self.variable_id.as_deref()
    }

    pub fn domain_expression(&self) -> Option<&ExprRef> {
        self.domain.as_ref()
    }

    pub fn iterant_expression(&self) -> Option<&ExprRef> {
        self.iterant.as_ref()
    }

    pub fn set_variable_id(&mut self, variable_id: impl Into<Rc<str>>) {
        self.variable_id = Some(variable_id.into());
    }

    pub fn set_domain_expression(&mut self, domain: ExprRef) {
        self.domain = Some(domain);
    }

    pub fn set_iterant_expression(&mut self, iterant: ExprRef) {
        self.iterant = Some(iterant);
    }

    pub fn with_variable_id(mut self, variable_id: impl Into<Rc<str>>) -> Self {
        self.set_variable_id(variable_id);
        self
    }

    pub fn with_domain_expression(mut self, domain: impl Expression + 'static) -> Self {
        self.set_domain_expression(Rc::new(domain));
        self
    }

    pub fn with_iterant_expression(mut self, iterant: impl Expression + 'static) -> Self {
        self.set_iterant_expression(Rc::new(iterant));
        self
    }

    fn parts(&self) -> Result<(&Rc<str>, &ExprRef, &ExprRef), Status> {
        let missing = |what: &str| {
            Status::new(
                StatusCode::MissingExpression,
                format!("{} expression has no {what}", self.quantifier),
            )
        };
        let variable_id = self.variable_id.as_ref().ok_or_else(|| missing("variable id"))?;
        let domain = self.domain.as_ref().ok_or_else(|| missing("domain expression"))?;
        let iterant = self.iterant.as_ref().ok_or_else(|| missing("iterant expression"))?;
        Ok((variable_id, domain, iterant))
    }

    /// Evaluate the iterant for each element until one produces `dominant`.
    fn quantify(
        &self,
        dominant: bool,
        variable_id: &Rc<str>,
        domain: &Bag,
        iterant: &ExprRef,
        context: &mut EvaluationContext,
    ) -> ExpressionResult {
        let completion = !dominant;
        if domain.is_empty() {
            debug!("{} over empty domain is {completion}", self.quantifier);
            return ExpressionResult::from(completion);
        }

        let mut scope = match context.scoped() {
            Ok(scope) => scope,
            Err(e) => return ExpressionResult::Indeterminate(e.into()),
        };

        // First error seen; reported only if no element turns out to be dominant.
        let mut pending: Option<Status> = None;
        for (idx, element) in domain.iter().enumerate() {
            scope.bind(variable_id.clone(), element.clone());
            match boolean_iterant(iterant.evaluate(&mut scope)) {
                Ok(b) if b == dominant => {
                    debug!(
                        "{} settled to {dominant} by element {idx} of {}",
                        self.quantifier,
                        domain.len()
                    );
                    scope.trace(|| {
                        format!(
                            "{} {variable_id}: element {idx} ({element}) is {dominant}",
                            self.quantifier
                        )
                    });
                    return ExpressionResult::from(dominant);
                }
                Ok(_) => (),
                Err(IterantError::IllTyped(status)) => {
                    return ExpressionResult::Indeterminate(status)
                }
                Err(IterantError::Indeterminate(status)) => {
                    if pending.is_none() {
                        scope.trace(|| {
                            format!(
                                "{} {variable_id}: element {idx} ({element}) is indeterminate: \
                                 {status}",
                                self.quantifier
                            )
                        });
                        pending = Some(status);
                    }
                }
            }
        }

        match pending {
            Some(status) => {
                debug!("{} is indeterminate: {status}", self.quantifier);
                ExpressionResult::Indeterminate(status)
            }
            None => ExpressionResult::from(completion),
        }
    }
}

impl Expression for QuantifiedExpression {
    fn evaluate(&self, context: &mut EvaluationContext) -> ExpressionResult {
        let (variable_id, domain, iterant) = match self.parts() {
            Ok(parts) => parts,
            Err(status) => return ExpressionResult::Indeterminate(status),
        };

        let bag = match domain.evaluate(context) {
            ExpressionResult::OkBag(bag) => bag,
            ExpressionResult::Ok(value) => {
                return ExpressionResult::error(
                    StatusCode::ReturnedNonBag,
                    format!(
                        "{} domain returned a {} value instead of a bag",
                        self.quantifier,
                        value.data_type()
                    ),
                )
            }
            indeterminate => return indeterminate,
        };

        match self.quantifier.dominant() {
            Some(dominant) => self.quantify(dominant, variable_id, &bag, iterant, context),
            None if self.quantifier == Quantifier::Map => {
                collect::map(variable_id, &bag, iterant, context)
            }
            None => collect::select(variable_id, &bag, iterant, context),
        }
    }

    fn validate(&self) -> Result<(), Status> {
        let (_, domain, iterant) = self.parts()?;
        domain.validate()?;
        iterant.validate()
    }
}

enum IterantError {
    /// The iterant is ill-typed; no element outcome can override this.
    IllTyped(Status),
    Indeterminate(Status),
}

fn returned_bag() -> Status {
    Status::new(StatusCode::ReturnedBag, "iterant expression returned a bag")
}

fn boolean_iterant(result: ExpressionResult) -> Result<bool, IterantError> {
    match result {
        ExpressionResult::Ok(Value::Bool(b)) => Ok(b),
        ExpressionResult::Ok(v) => Err(IterantError::IllTyped(Status::new(
            StatusCode::ReturnedNonBoolean,
            format!("iterant expression returned a {} value", v.data_type()),
        ))),
        ExpressionResult::OkBag(_) => Err(IterantError::IllTyped(returned_bag())),
        ExpressionResult::Indeterminate(status) => Err(IterantError::Indeterminate(status)),
    }
}
