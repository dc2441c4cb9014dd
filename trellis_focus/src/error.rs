// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Failures of [`FocusManager::pop_context_named`](crate::FocusManager::pop_context_named).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FocusError {
    /// The top of the context stack has a different name.
    #[error("expected to pop focus context `{expected}`, but the top is `{found}`")]
    ContextMismatch {
        /// Name the caller asked to pop.
        expected: String,
        /// Name actually on top of the stack.
        found: String,
    },
    /// The context stack is empty.
    #[error("expected to pop focus context `{expected}`, but no context is pushed")]
    NoContext {
        /// Name the caller asked to pop.
        expected: String,
    },
}
