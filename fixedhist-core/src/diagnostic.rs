// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Out-of-band notifications for events that are dropped rather than
//! reported to the caller.

use std::fmt;

use crate::PermutationKey;

/// A notification emitted by a histogram.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Diagnostic {
    /// An event's label combination was not declared, so its observations
    /// were discarded.
    Rejected {
        metric: String,
        key: PermutationKey,
        observations: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected {
                metric,
                key,
                observations,
            } => write!(
                f,
                "{metric}: discarded {observations} observation(s) for undeclared labels {{{key}}}"
            ),
        }
    }
}

/// Receives [`Diagnostic`]s.
///
/// Any `Fn(&Diagnostic) + Send + Sync` closure is a sink, which makes it
/// easy to capture diagnostics in tests.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: &Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic) + Send + Sync,
{
    fn emit(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

/// Forwards diagnostics to `tracing` at warn level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::Rejected {
                metric,
                key,
                observations,
            } => {
                tracing::warn!(
                    metric = %metric,
                    labels = %key,
                    observations = *observations,
                    "rejected observations for undeclared label combination"
                );
            }
        }
    }
}

/// Discards every diagnostic.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _diagnostic: &Diagnostic) {}
}
