//! Depth-bounded rendering of the downline tree.
//!
//! The tree is walked recursively with an explicit depth and a hard cutoff:
//! a node deeper than `max_depth` produces no row and its subtree is not
//! visited. Expansion is kept per node key in an [`ExpansionState`] owned by
//! the view instance. A key gets its default (`depth < expanded_depth`) the
//! first time it is rendered and keeps whatever value it has from then on,
//! across data refreshes.

use std::collections::{HashMap, HashSet};

use team_protocol::{Member, DEFAULT_EXPANDED_DEPTH, DEFAULT_MAX_DEPTH, INDENT_PER_LEVEL};

/// Stable identity of a tree node: the member id, or the child-index path
/// from the root when the service sent no id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey(String);

impl NodeKey {
    fn for_member(member: &Member, path: &[usize]) -> Self {
        match member.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => Self(format!("id:{id}")),
            None => {
                let path: Vec<String> = path.iter().map(usize::to_string).collect();
                Self(format!("path:{}", path.join("/")))
            }
        }
    }

    /// Key of a member with a known id.
    pub fn from_id(id: &str) -> Self {
        Self(format!("id:{id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Per-view expand/collapse state.
#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    expanded: HashMap<NodeKey, bool>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until the node has been rendered once.
    pub fn is_expanded(&self, key: &NodeKey) -> Option<bool> {
        self.expanded.get(key).copied()
    }

    /// Flip one node. Returns the new value, or `None` for a node that has
    /// never been rendered.
    pub fn toggle(&mut self, key: &NodeKey) -> Option<bool> {
        let expanded = self.expanded.get_mut(key)?;
        *expanded = !*expanded;
        Some(*expanded)
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    fn resolve(&mut self, key: &NodeKey, depth: usize, expanded_depth: usize) -> bool {
        *self.expanded.entry(key.clone()).or_insert(depth < expanded_depth)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    /// Deepest depth that still renders; the root is depth 0.
    pub max_depth: usize,
    /// Nodes shallower than this start expanded.
    pub expanded_depth: usize,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH, expanded_depth: DEFAULT_EXPANDED_DEPTH }
    }
}

/// Expand control shown in front of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Expanded,
    Collapsed,
    /// No children, so no control; only a placeholder.
    Leaf,
}

/// One rendered node.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    pub key: NodeKey,
    pub depth: usize,
    /// Leading columns, proportional to depth.
    pub indent: usize,
    pub toggle: Toggle,
    pub name: String,
    pub email: String,
    pub level: u32,
    pub direct_count: u64,
    pub total_downline: u64,
    /// Present only for strictly positive earnings.
    pub earnings: Option<String>,
}

impl TreeRow {
    pub fn direct_label(&self) -> String {
        format!("{} Direct", self.direct_count)
    }

    pub fn total_label(&self) -> String {
        format!("{} Total", self.total_downline)
    }

    pub fn has_children(&self) -> bool {
        self.toggle != Toggle::Leaf
    }
}

struct Walk<'a> {
    expansion: &'a mut ExpansionState,
    options: TreeOptions,
    visited: HashSet<NodeKey>,
    path: Vec<usize>,
    rows: Vec<TreeRow>,
}

/// Render the visible rows of `root`, in display order.
pub fn render_tree(root: &Member, expansion: &mut ExpansionState, options: &TreeOptions) -> Vec<TreeRow> {
    let mut walk = Walk {
        expansion,
        options: *options,
        visited: HashSet::new(),
        path: Vec::new(),
        rows: Vec::new(),
    };
    render_node(root, 0, &mut walk);
    walk.rows
}

fn render_node(member: &Member, depth: usize, walk: &mut Walk<'_>) {
    if depth > walk.options.max_depth {
        return;
    }

    let key = NodeKey::for_member(member, &walk.path);
    if !walk.visited.insert(key.clone()) {
        tracing::warn!(node = key.as_str(), depth, "Member appears twice in hierarchy, skipping repeat");
        return;
    }

    let expanded = walk.expansion.resolve(&key, depth, walk.options.expanded_depth);
    let toggle = match (member.has_children(), expanded) {
        (false, _) => Toggle::Leaf,
        (true, true) => Toggle::Expanded,
        (true, false) => Toggle::Collapsed,
    };

    walk.rows.push(TreeRow {
        key,
        depth,
        indent: depth * INDENT_PER_LEVEL,
        toggle,
        name: member.display_name().to_string(),
        email: member.display_email().to_string(),
        level: member.level(),
        direct_count: member.direct_count(),
        total_downline: member.total_downline(),
        earnings: member.earnings_label(),
    });

    if toggle != Toggle::Expanded {
        return;
    }
    for (index, child) in member.children.iter().enumerate() {
        walk.path.push(index);
        render_node(child, depth + 1, walk);
        walk.path.pop();
    }
}
