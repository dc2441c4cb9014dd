// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

use crate::types::NodeId;

/// Structural mutations the scene refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SceneError {
    /// The id does not refer to a live node.
    #[error("node {0:?} is not alive")]
    StaleNode(NodeId),
    /// `child` is `parent` itself or one of its ancestors.
    #[error("making {child:?} a child of {parent:?} would create a cycle")]
    WouldCycle {
        /// Requested parent.
        parent: NodeId,
        /// Requested child.
        child: NodeId,
    },
}
