use snafu::OptionExt;
use tracing::debug;

use super::error::UnknownNodeSnafu;
use crate::tree::{FolderTree, NodeId, TreeError};

pub(super) const PARENT_TARGET: &str = "..";
pub(super) const SEPARATOR: char = '/';

/// Folders entered so far, most recent last. `..` walks back through it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathStack(Vec<NodeId>);

impl PathStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, folder: NodeId) {
        self.0.push(folder);
    }

    pub fn pop(&mut self) -> Option<NodeId> {
        self.0.pop()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.0
    }
}

/// Where a navigation request ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Moved { to: NodeId },
    /// `..` with nothing left on the path stack.
    AlreadyAtRoot { at: NodeId },
    /// `segment` did not name a subfolder of `at`.
    Stopped { at: NodeId, segment: String },
}

impl Navigation {
    /// The folder that is current after navigating.
    pub fn folder(&self) -> NodeId {
        match self {
            Navigation::Moved { to } => *to,
            Navigation::AlreadyAtRoot { at } | Navigation::Stopped { at, .. } => *at,
        }
    }
}

impl FolderTree {
    /// Resolves `target` relative to `from`.
    ///
    /// A partially resolved path keeps the stack entries pushed for the
    /// segments that did resolve. Only a `from` that is not a live folder
    /// is an error; the stack is left alone then.
    pub fn navigate(
        &self,
        from: NodeId,
        target: &str,
        path_stack: &mut PathStack,
    ) -> Result<Navigation, TreeError> {
        self.get(from)
            .filter(|node| node.kind().is_folder())
            .context(UnknownNodeSnafu { id: from })?;

        if target == PARENT_TARGET {
            return Ok(match path_stack.pop() {
                Some(previous) => Navigation::Moved { to: previous },
                None => Navigation::AlreadyAtRoot { at: from },
            });
        }

        let mut current = from;
        for segment in target.split(SEPARATOR) {
            let next = self
                .lookup(current, segment)?
                .filter(|&child| self.get(child).is_some_and(|node| node.kind().is_folder()));

            match next {
                Some(child) => {
                    path_stack.push(current);
                    current = child;
                }
                None => {
                    debug!("Navigation from {} stopped at segment '{}'", from, segment);
                    return Ok(Navigation::Stopped {
                        at: current,
                        segment: segment.to_string(),
                    });
                }
            }
        }

        Ok(Navigation::Moved { to: current })
    }
}
