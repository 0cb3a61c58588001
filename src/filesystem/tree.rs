use derive_more::Display;
use snafu::{OptionExt, Snafu};

/// Handle of a node inside the [`Tree`] arena that created it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Type discriminant of a node, as selected by `-type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum NodeType {
    #[display("f")]
    File,
    #[display("d")]
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory { children: Vec<NodeId> },
}

/// A single file or directory parsed from the listing.
///
/// The parent link is a plain handle into the owning arena, it never owns
/// anything. Only directories own their ordered child sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    source_line: String,
    parent: Option<NodeId>,
    name: String,
    size: u64,
    kind: NodeKind,
}

impl Node {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// The raw listing line this node was built from
    pub fn source_line(&self) -> &str {
        &self.source_line
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::File => NodeType::File,
            NodeKind::Directory { .. } => NodeType::Directory,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    /// Children in listing order, empty for files
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::File => &[],
            NodeKind::Directory { children } => children,
        }
    }
}

/// Immutable snapshot of a listed directory hierarchy.
///
/// Nodes live in a flat arena and refer to each other by [`NodeId`]. The tree
/// can only grow while the listing parser builds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub(super) fn with_root(source_line: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node {
                source_line: source_line.into(),
                parent: None,
                name: String::new(),
                size: 0,
                kind: NodeKind::Directory {
                    children: Vec::new(),
                },
            }],
        }
    }

    /// Appends a child to a directory. Files cannot take children.
    pub(super) fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        size: u64,
        node_type: NodeType,
        source_line: impl Into<String>,
    ) -> Result<NodeId, PathError> {
        let id = NodeId(self.nodes.len());
        let kind = match node_type {
            NodeType::File => NodeKind::File,
            NodeType::Directory => NodeKind::Directory {
                children: Vec::new(),
            },
        };

        let parent_node = &mut self.nodes[parent.0];
        match &mut parent_node.kind {
            NodeKind::Directory { children } => children.push(id),
            NodeKind::File => {
                return InvalidPathSegmentSnafu {
                    segment: parent_node.name.clone(),
                }
                .fail();
            }
        }

        self.nodes.push(Node {
            source_line: source_line.into(),
            parent: Some(parent),
            name: name.into(),
            size,
            kind,
        });
        Ok(id)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn child_by_name(&self, directory: NodeId, name: &str) -> Option<NodeId> {
        self.node(directory)
            .children()
            .iter()
            .copied()
            .find(|child| self.node(*child).name == name)
    }

    /// Absolute path of a node, the root being `/`
    pub fn path(&self, id: NodeId) -> String {
        let names = self
            .ancestry(id)
            .into_iter()
            .skip(1)
            .map(|ancestor| self.node(ancestor).name.as_str())
            .collect::<Vec<_>>();
        format!("/{}", names.join("/"))
    }

    /// Path of `id` as seen from `base`.
    ///
    /// Returns `.` for the base itself, plain descent when `base` is an
    /// ancestor, and climbs with `..` to the closest common ancestor otherwise.
    pub fn relative_path(&self, id: NodeId, base: NodeId) -> String {
        let target = self.ancestry(id);
        let origin = self.ancestry(base);
        let common = target
            .iter()
            .zip(origin.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let segments = std::iter::repeat_n("..", origin.len() - common)
            .chain(target[common..].iter().map(|n| self.node(*n).name.as_str()))
            .collect::<Vec<_>>();

        if segments.is_empty() {
            ".".to_string()
        } else {
            segments.join("/")
        }
    }

    /// Resolves a `/`-separated path starting at `from`, or at the root when
    /// the path is absolute. `..` at the root stays at the root.
    pub fn resolve(&self, from: NodeId, path: &str) -> Result<NodeId, PathError> {
        let mut current = if path.starts_with('/') {
            self.root()
        } else {
            from
        };

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let node = self.node(current);
            if !node.is_directory() {
                return InvalidPathSegmentSnafu {
                    segment: node.name.clone(),
                }
                .fail();
            }

            current = match segment {
                "." => current,
                ".." => node.parent.unwrap_or(current),
                name => self
                    .child_by_name(current, name)
                    .context(UnknownDirectoryEntrySnafu { segment: name })?,
            };
        }

        Ok(current)
    }

    /// Like [`Tree::resolve`], but the target itself must be a directory
    pub fn resolve_directory(&self, from: NodeId, path: &str) -> Result<NodeId, PathError> {
        let target = self.resolve(from, path)?;
        if !self.node(target).is_directory() {
            return NotADirectorySnafu { path }.fail();
        }
        Ok(target)
    }

    /// Nodes from the root down to `id`, both included
    fn ancestry(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }
}

#[derive(Debug, Snafu)]
pub enum PathError {
    #[snafu(display("No such file or directory: '{}'", segment))]
    UnknownDirectoryEntry { segment: String },
    #[snafu(display("Cannot descend into '{}': not a directory", segment))]
    InvalidPathSegment { segment: String },
    #[snafu(display("'{}' is not a directory", path))]
    NotADirectory { path: String },
}
