// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::config::EvaluationConfig;
use crate::status::{Status, StatusCode};
use crate::value::Value;
use crate::Rc;

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use log::warn;
use thiserror::Error;

type Scope = BTreeMap<Rc<str>, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("variable `{0}` is not bound in any scope")]
    UnboundVariable(Rc<str>),
    #[error("scope depth limit of {0} exceeded")]
    ScopeLimitExceeded(usize),
    #[error("scope at depth {depth} is no longer live (current depth {current})")]
    StaleScope { depth: usize, current: usize },
}

impl From<ContextError> for Status {
    fn from(e: ContextError) -> Self {
        let code = match e {
            ContextError::UnboundVariable(_) => StatusCode::UnboundVariable,
            ContextError::ScopeLimitExceeded(_) => StatusCode::ScopeLimitExceeded,
            ContextError::StaleScope { .. } => StatusCode::ProcessingError,
        };
        Status::new(code, e.to_string())
    }
}

/// Identifies a scope opened by [`EvaluationContext::push_scope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a pushed scope must be popped"]
pub struct ScopeHandle {
    depth: usize,
}

/// Variable bindings for one decision request.
///
/// Bindings live in a stack of scopes. The bottom scope belongs to the request
/// and is never popped. Lookups search innermost first so that a nested
/// quantifier may shadow the variable of an enclosing one.
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    scopes: Vec<Scope>,
    max_scope_depth: usize,
    traces: Option<Vec<Rc<str>>>,
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationContext {
    pub fn new() -> EvaluationContext {
        Self::with_config(&EvaluationConfig::default())
    }

    pub fn with_config(config: &EvaluationConfig) -> EvaluationContext {
        let mut context = EvaluationContext {
            scopes: vec![Scope::new()],
            max_scope_depth: config.max_scope_depth.max(1),
            traces: None,
        };
        context.set_traces(config.enable_tracing);
        context
    }

    pub fn set_traces(&mut self, enable_tracing: bool) {
        self.traces = match enable_tracing {
            true => Some(vec![]),
            false => None,
        };
    }

    pub fn traces(&self) -> Option<&[Rc<str>]> {
        self.traces.as_deref()
    }

    pub fn take_traces(&mut self) -> Vec<Rc<str>> {
        self.traces.as_mut().map(std::mem::take).unwrap_or_default()
    }

    /// Record a trace line. The message is only built when tracing is enabled.
    ///
    /// Traces are the one part of the context that evaluation leaves changed;
    /// scopes and bindings are always restored.
    pub fn trace<F: FnOnce() -> String>(&mut self, message: F) {
        if let Some(traces) = &mut self.traces {
            traces.push(message().into());
        }
    }

    /// Number of live scopes, including the request scope.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn push_scope(&mut self) -> Result<ScopeHandle, ContextError> {
        if self.scopes.len() >= self.max_scope_depth {
            return Err(ContextError::ScopeLimitExceeded(self.max_scope_depth));
        }
        self.scopes.push(Scope::new());
        Ok(ScopeHandle {
            depth: self.scopes.len(),
        })
    }

    /// Discard the scope identified by `handle` together with its bindings.
    ///
    /// Scopes opened after `handle` and never popped are discarded as well.
    pub fn pop_scope(&mut self, handle: ScopeHandle) -> Result<(), ContextError> {
        let current = self.scopes.len();
        if handle.depth <= 1 || handle.depth > current {
            return Err(ContextError::StaleScope {
                depth: handle.depth,
                current,
            });
        }
        if handle.depth < current {
            warn!(
                "releasing {} scope(s) left open inside scope at depth {}",
                current - handle.depth,
                handle.depth
            );
        }
        self.scopes.truncate(handle.depth - 1);
        Ok(())
    }

    /// Open a scope that is popped when the returned guard is dropped.
    pub fn scoped(&mut self) -> Result<ScopeGuard<'_>, ContextError> {
        let handle = self.push_scope()?;
        Ok(ScopeGuard {
            context: self,
            handle,
        })
    }

    /// Bind `id` in the innermost scope, replacing any previous binding there.
    pub fn bind(&mut self, id: impl Into<Rc<str>>, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(id.into(), value);
        }
    }

    pub fn lookup(&self, id: &str) -> Result<&Value, ContextError> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(id))
            .ok_or_else(|| ContextError::UnboundVariable(id.into()))
    }
}

/// A scope that is popped on drop, on every exit path.
#[derive(Debug)]
pub struct ScopeGuard<'a> {
    context: &'a mut EvaluationContext,
    handle: ScopeHandle,
}

impl Deref for ScopeGuard<'_> {
    type Target = EvaluationContext;

    fn deref(&self) -> &Self::Target {
        self.context
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.context
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.context.pop_scope(self.handle) {
            warn!("failed to release scope: {e}");
        }
    }
}
