//! Structural operations on a layout tree.
//!
//! Resize, tab switching, removal, and drag/drop docking all go through
//! [`LayoutOp::apply_to`]. Operations run against a working copy and only
//! replace the caller's tree once the result validates, so a failed
//! operation leaves the tree untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

use deck_core::geometry::SplitAxis;

use crate::model::{
    ComponentLayoutItem, ContainerLayoutItem, LayoutItem, LayoutModelError, NodeId, SIZE_EPSILON,
    StackLayoutItem,
};

/// Where a dragged node lands relative to the drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropPlacement {
    Left,
    Right,
    Top,
    Bottom,
    /// Join the target as a tab.
    Tab,
}

impl DropPlacement {
    /// Split axis for edge placements.
    #[must_use]
    pub const fn axis(self) -> Option<SplitAxis> {
        match self {
            Self::Left | Self::Right => Some(SplitAxis::Horizontal),
            Self::Top | Self::Bottom => Some(SplitAxis::Vertical),
            Self::Tab => None,
        }
    }

    /// Whether the dropped node goes before the target.
    #[must_use]
    pub const fn is_leading(self) -> bool {
        matches!(self, Self::Left | Self::Top)
    }
}

/// Supported layout mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LayoutOp {
    /// Replace a container's split percentages.
    Resize { container: NodeId, sizes: Vec<f64> },
    /// Switch a stack's active tab.
    ActivateTab { stack: NodeId, index: usize },
    /// Remove a non-root node; its share goes to its siblings.
    Remove { node: NodeId },
    /// Detach a node and re-insert it next to (or as a tab of) a target.
    Dock {
        node: NodeId,
        target: NodeId,
        placement: DropPlacement,
    },
}

impl LayoutOp {
    /// Apply this operation to `root`.
    ///
    /// On error `root` is left exactly as it was.
    pub fn apply_to(&self, root: &mut LayoutItem) -> Result<(), LayoutOpError> {
        let mut working = root.clone();
        match self {
            Self::Resize { container, sizes } => resize(&mut working, container, sizes)?,
            Self::ActivateTab { stack, index } => activate_tab(&mut working, stack, *index)?,
            Self::Remove { node } => remove(&mut working, node)?,
            Self::Dock {
                node,
                target,
                placement,
            } => dock(&mut working, node, target, *placement)?,
        }
        working.validate().map_err(LayoutOpError::Validation)?;
        *root = working;
        Ok(())
    }
}

fn resize(root: &mut LayoutItem, container: &NodeId, sizes: &[f64]) -> Result<(), LayoutOpError> {
    let Some(node) = root.find_mut(container) else {
        return Err(LayoutOpError::NodeNotFound {
            node_id: container.clone(),
        });
    };
    let LayoutItem::Container(c) = node else {
        return Err(LayoutOpError::NotAContainer {
            node_id: container.clone(),
        });
    };
    let invalid = |reason| LayoutOpError::InvalidSizes {
        container: container.clone(),
        reason,
    };
    if sizes.len() != c.children.len() {
        return Err(invalid("size count does not match child count"));
    }
    if sizes.iter().any(|s| !s.is_finite() || *s < 0.0) {
        return Err(invalid("sizes must be finite and non-negative"));
    }
    let sum: f64 = sizes.iter().sum();
    if !sizes.is_empty() && (sum - 100.0).abs() > SIZE_EPSILON {
        return Err(invalid("sizes must sum to 100"));
    }
    c.sizes = sizes.to_vec();
    Ok(())
}

fn activate_tab(root: &mut LayoutItem, stack: &NodeId, index: usize) -> Result<(), LayoutOpError> {
    let Some(node) = root.find_mut(stack) else {
        return Err(LayoutOpError::NodeNotFound {
            node_id: stack.clone(),
        });
    };
    let LayoutItem::Stack(s) = node else {
        return Err(LayoutOpError::NotAStack {
            node_id: stack.clone(),
        });
    };
    if index >= s.children.len() {
        return Err(LayoutOpError::TabIndexOutOfRange {
            stack: stack.clone(),
            index,
            len: s.children.len(),
        });
    }
    s.active_item_index = index;
    Ok(())
}

/// A node taken out of the tree.
enum Detached {
    Item(LayoutItem),
    Tab(ComponentLayoutItem),
}

impl Detached {
    fn into_item(self) -> LayoutItem {
        match self {
            Self::Item(item) => item,
            Self::Tab(tab) => LayoutItem::Component(tab),
        }
    }

    fn into_tab(self) -> Option<ComponentLayoutItem> {
        match self {
            Self::Item(LayoutItem::Component(c)) | Self::Tab(c) => Some(c),
            Self::Item(_) => None,
        }
    }
}

fn remove(root: &mut LayoutItem, node: &NodeId) -> Result<(), LayoutOpError> {
    if root.id() == node {
        return Err(LayoutOpError::CannotRemoveRoot {
            node_id: node.clone(),
        });
    }
    detach_from_root(root, node, None)
        .map(|_| ())
        .ok_or_else(|| LayoutOpError::NodeNotFound {
            node_id: node.clone(),
        })
}

/// Detach `id` from the tree rooted at `root`, collapsing a root stack that
/// lost its last tab into an empty container.
///
/// Nested containers left empty are removed; nested containers left with a
/// single child are replaced by that child, unless they are `keep`.
fn detach_from_root(
    root: &mut LayoutItem,
    id: &NodeId,
    keep: Option<&NodeId>,
) -> Option<Detached> {
    let detached = detach(root, id, keep)?;
    if let LayoutItem::Stack(s) = root
        && s.children.is_empty()
    {
        let mut empty = ContainerLayoutItem::new(SplitAxis::Horizontal, Vec::new());
        empty.id = s.id.clone();
        *root = empty.into();
    }
    Some(detached)
}

fn detach(item: &mut LayoutItem, id: &NodeId, keep: Option<&NodeId>) -> Option<Detached> {
    match item {
        LayoutItem::Container(c) => {
            if let Some(pos) = c.children.iter().position(|child| child.id() == id) {
                let removed = remove_child(c, pos);
                return Some(Detached::Item(removed));
            }
            for pos in 0..c.children.len() {
                if let Some(detached) = detach(&mut c.children[pos], id, keep) {
                    prune_child(c, pos, keep);
                    return Some(detached);
                }
            }
            None
        }
        LayoutItem::Stack(s) => {
            let pos = s.children.iter().position(|tab| &tab.id == id)?;
            let tab = s.children.remove(pos);
            if s.active_item_index > pos || s.active_item_index >= s.children.len() {
                s.active_item_index = s.active_item_index.saturating_sub(1);
            }
            Some(Detached::Tab(tab))
        }
        LayoutItem::Component(_) => None,
    }
}

/// Tidy child `pos` after something was detached below it.
fn prune_child(c: &mut ContainerLayoutItem, pos: usize, keep: Option<&NodeId>) {
    let child = &mut c.children[pos];
    match child {
        LayoutItem::Stack(s) if s.children.is_empty() => {
            remove_child(c, pos);
        }
        LayoutItem::Container(inner) if inner.children.is_empty() => {
            tracing::debug!(container = %inner.id, "removing emptied container");
            remove_child(c, pos);
        }
        LayoutItem::Container(inner)
            if inner.children.len() == 1 && keep != Some(&inner.id) =>
        {
            tracing::debug!(container = %inner.id, "hoisting only child of container");
            if let Some(only) = inner.children.pop() {
                *child = only;
            }
        }
        _ => {}
    }
}

/// Remove child `pos` and hand its share to the remaining siblings.
fn remove_child(c: &mut ContainerLayoutItem, pos: usize) -> LayoutItem {
    let removed = c.children.remove(pos);
    if c.sizes.len() > pos {
        c.sizes.remove(pos);
    }
    c.normalize_own_sizes();
    removed
}

fn parent_of_mut<'a>(
    item: &'a mut LayoutItem,
    id: &NodeId,
) -> Option<&'a mut ContainerLayoutItem> {
    let LayoutItem::Container(c) = item else {
        return None;
    };
    if c.children.iter().any(|child| child.id() == id) {
        return Some(c);
    }
    c.children
        .iter_mut()
        .find_map(|child| parent_of_mut(child, id))
}

fn dock(
    root: &mut LayoutItem,
    node: &NodeId,
    target: &NodeId,
    placement: DropPlacement,
) -> Result<(), LayoutOpError> {
    if node == target {
        return Err(LayoutOpError::CannotDockIntoSelf {
            node: node.clone(),
            target: target.clone(),
        });
    }
    if root.id() == node {
        return Err(LayoutOpError::CannotRemoveRoot {
            node_id: node.clone(),
        });
    }
    if !root.contains(node) {
        return Err(LayoutOpError::NodeNotFound {
            node_id: node.clone(),
        });
    }
    let Some(target_item) = root.find(target) else {
        return Err(LayoutOpError::NodeNotFound {
            node_id: target.clone(),
        });
    };
    if let Some(subtree) = root.find(node)
        && subtree.contains(target)
    {
        return Err(LayoutOpError::CannotDockIntoSelf {
            node: node.clone(),
            target: target.clone(),
        });
    }
    if placement == DropPlacement::Tab {
        let tabbable_target =
            matches!(target_item, LayoutItem::Component(_) | LayoutItem::Stack(_));
        if !tabbable_target {
            return Err(LayoutOpError::NotTabbable {
                node_id: target.clone(),
            });
        }
        if root.find_component(node).is_none() {
            return Err(LayoutOpError::NotTabbable {
                node_id: node.clone(),
            });
        }
    }

    let detached =
        detach_from_root(root, node, Some(target)).ok_or_else(|| LayoutOpError::NodeNotFound {
            node_id: node.clone(),
        })?;
    if root.find(target).is_none() {
        return Err(LayoutOpError::TargetRemovedByDetach {
            target: target.clone(),
        });
    }

    match placement.axis() {
        None => {
            let tab = detached.into_tab().ok_or_else(|| LayoutOpError::NotTabbable {
                node_id: node.clone(),
            })?;
            insert_as_tab(root, target, tab)
        }
        Some(axis) => {
            insert_beside(root, target, detached.into_item(), axis, placement.is_leading());
            Ok(())
        }
    }
}

fn insert_as_tab(
    root: &mut LayoutItem,
    target: &NodeId,
    tab: ComponentLayoutItem,
) -> Result<(), LayoutOpError> {
    let Some(slot) = root.find_mut(target) else {
        return Err(LayoutOpError::NodeNotFound {
            node_id: target.clone(),
        });
    };
    match slot {
        LayoutItem::Stack(s) => {
            s.children.push(tab);
            s.active_item_index = s.children.len() - 1;
            Ok(())
        }
        LayoutItem::Component(existing) => {
            let min_size = existing.min_size;
            let mut stack = StackLayoutItem::new(vec![existing.clone(), tab]).with_active(1);
            stack.min_size = min_size;
            *slot = stack.into();
            Ok(())
        }
        LayoutItem::Container(_) => Err(LayoutOpError::NotTabbable {
            node_id: target.clone(),
        }),
    }
}

fn insert_beside(
    root: &mut LayoutItem,
    target: &NodeId,
    item: LayoutItem,
    axis: SplitAxis,
    leading: bool,
) {
    if let Some(parent) = parent_of_mut(root, target)
        && parent.direction == axis
    {
        parent.normalize_own_sizes();
        let pos = parent
            .children
            .iter()
            .position(|child| child.id() == target)
            .unwrap_or(0);
        let half = parent.sizes.get(pos).copied().unwrap_or(0.0) / 2.0;
        if let Some(size) = parent.sizes.get_mut(pos) {
            *size = half;
        }
        let at = if leading { pos } else { pos + 1 };
        parent.children.insert(at, item);
        parent.sizes.insert(at, half);
        return;
    }

    let Some(slot) = root.find_mut(target) else {
        return;
    };
    let placeholder = LayoutItem::empty();
    let existing = std::mem::replace(slot, placeholder);
    let min_size = match &existing {
        LayoutItem::Container(c) => c.min_size,
        LayoutItem::Component(c) => c.min_size,
        LayoutItem::Stack(s) => s.min_size,
    };
    let children = if leading {
        vec![item, existing]
    } else {
        vec![existing, item]
    };
    let mut wrapper = ContainerLayoutItem::new(axis, children);
    wrapper.min_size = min_size;
    *slot = wrapper.into();
}

/// Failures of [`LayoutOp::apply_to`].
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutOpError {
    NodeNotFound {
        node_id: NodeId,
    },
    NotAContainer {
        node_id: NodeId,
    },
    NotAStack {
        node_id: NodeId,
    },
    CannotRemoveRoot {
        node_id: NodeId,
    },
    InvalidSizes {
        container: NodeId,
        reason: &'static str,
    },
    TabIndexOutOfRange {
        stack: NodeId,
        index: usize,
        len: usize,
    },
    CannotDockIntoSelf {
        node: NodeId,
        target: NodeId,
    },
    NotTabbable {
        node_id: NodeId,
    },
    TargetRemovedByDetach {
        target: NodeId,
    },
    Validation(LayoutModelError),
}

impl fmt::Display for LayoutOpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound { node_id } => write!(f, "node {node_id} not found"),
            Self::NotAContainer { node_id } => write!(f, "node {node_id} is not a container"),
            Self::NotAStack { node_id } => write!(f, "node {node_id} is not a stack"),
            Self::CannotRemoveRoot { node_id } => {
                write!(f, "node {node_id} is the layout root and cannot be detached")
            }
            Self::InvalidSizes { container, reason } => {
                write!(f, "invalid sizes for container {container}: {reason}")
            }
            Self::TabIndexOutOfRange { stack, index, len } => {
                write!(f, "tab {index} out of range for stack {stack} with {len} tabs")
            }
            Self::CannotDockIntoSelf { node, target } => {
                write!(f, "cannot dock node {node} into {target}, which it contains")
            }
            Self::NotTabbable { node_id } => {
                write!(f, "node {node_id} cannot take part in a tab drop")
            }
            Self::TargetRemovedByDetach { target } => {
                write!(f, "drop target {target} disappeared when the node was detached")
            }
            Self::Validation(err) => write!(f, "resulting layout is invalid: {err}"),
        }
    }
}

impl std::error::Error for LayoutOpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> NodeId {
        NodeId::new(raw)
    }

    /// root(h): [chart 60 | stack(book, trades) 40]
    fn sample() -> LayoutItem {
        ContainerLayoutItem::new(
            SplitAxis::Horizontal,
            vec![
                ComponentLayoutItem::new("chart").with_id("chart").into(),
                StackLayoutItem::new(vec![
                    ComponentLayoutItem::new("orderbook").with_id("book"),
                    ComponentLayoutItem::new("trades").with_id("trades"),
                ])
                .with_id("stack")
                .into(),
            ],
        )
        .with_id("root")
        .with_sizes(vec![60.0, 40.0])
        .into()
    }

    fn container<'a>(root: &'a LayoutItem, raw: &str) -> &'a ContainerLayoutItem {
        match root.find(&id(raw)) {
            Some(LayoutItem::Container(c)) => c,
            other => panic!("expected container {raw}, got {other:?}"),
        }
    }

    fn stack<'a>(root: &'a LayoutItem, raw: &str) -> &'a StackLayoutItem {
        match root.find(&id(raw)) {
            Some(LayoutItem::Stack(s)) => s,
            other => panic!("expected stack {raw}, got {other:?}"),
        }
    }

    #[test]
    fn resize_replaces_sizes() {
        let mut root = sample();
        LayoutOp::Resize {
            container: id("root"),
            sizes: vec![25.0, 75.0],
        }
        .apply_to(&mut root)
        .expect("resize");
        assert_eq!(container(&root, "root").sizes, vec![25.0, 75.0]);
    }

    #[test]
    fn resize_rejects_bad_sums_and_leaves_tree_untouched() {
        let mut root = sample();
        let before = root.clone();
        let err = LayoutOp::Resize {
            container: id("root"),
            sizes: vec![50.0, 40.0],
        }
        .apply_to(&mut root)
        .expect_err("bad sum");
        assert!(matches!(err, LayoutOpError::InvalidSizes { .. }));
        assert_eq!(root, before);

        let err = LayoutOp::Resize {
            container: id("chart"),
            sizes: vec![],
        }
        .apply_to(&mut root)
        .expect_err("not a container");
        assert_eq!(err, LayoutOpError::NotAContainer { node_id: id("chart") });
    }

    #[test]
    fn activate_tab_checks_range() {
        let mut root = sample();
        LayoutOp::ActivateTab {
            stack: id("stack"),
            index: 1,
        }
        .apply_to(&mut root)
        .expect("activate");
        assert_eq!(stack(&root, "stack").active_item_index, 1);

        let err = LayoutOp::ActivateTab {
            stack: id("stack"),
            index: 2,
        }
        .apply_to(&mut root)
        .expect_err("out of range");
        assert_eq!(
            err,
            LayoutOpError::TabIndexOutOfRange {
                stack: id("stack"),
                index: 2,
                len: 2
            }
        );
    }

    #[test]
    fn remove_redistributes_share_to_siblings() {
        let mut root: LayoutItem = ContainerLayoutItem::new(
            SplitAxis::Vertical,
            vec![
                ComponentLayoutItem::new("a").with_id("a").into(),
                ComponentLayoutItem::new("b").with_id("b").into(),
                ComponentLayoutItem::new("c").with_id("c").into(),
            ],
        )
        .with_id("root")
        .with_sizes(vec![20.0, 50.0, 30.0])
        .into();
        LayoutOp::Remove { node: id("b") }
            .apply_to(&mut root)
            .expect("remove");
        let sizes = &container(&root, "root").sizes;
        assert_eq!(sizes.len(), 2);
        assert!((sizes[0] - 40.0).abs() < 1e-9);
        assert!((sizes[1] - 60.0).abs() < 1e-9);
    }

    #[test]
    fn removing_last_tab_removes_stack() {
        let mut root = sample();
        LayoutOp::Remove { node: id("book") }
            .apply_to(&mut root)
            .expect("remove book");
        assert_eq!(stack(&root, "stack").children.len(), 1);
        LayoutOp::Remove { node: id("trades") }
            .apply_to(&mut root)
            .expect("remove trades");
        assert!(!root.contains(&id("stack")));
        let sizes = &container(&root, "root").sizes;
        assert_eq!(sizes.len(), 1);
        assert!((sizes[0] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn removing_active_last_tab_moves_active_back() {
        let mut root = sample();
        LayoutOp::ActivateTab {
            stack: id("stack"),
            index: 1,
        }
        .apply_to(&mut root)
        .expect("activate");
        LayoutOp::Remove { node: id("trades") }
            .apply_to(&mut root)
            .expect("remove");
        assert_eq!(stack(&root, "stack").active_item_index, 0);
    }

    #[test]
    fn root_cannot_be_removed() {
        let mut root = sample();
        assert_eq!(
            LayoutOp::Remove { node: id("root") }.apply_to(&mut root),
            Err(LayoutOpError::CannotRemoveRoot { node_id: id("root") })
        );
    }

    #[test]
    fn dock_edge_with_matching_axis_splits_target_share() {
        let mut root = sample();
        LayoutOp::Dock {
            node: id("trades"),
            target: id("chart"),
            placement: DropPlacement::Right,
        }
        .apply_to(&mut root)
        .expect("dock");
        let c = container(&root, "root");
        let ids: Vec<_> = c.children.iter().map(|child| child.id().clone()).collect();
        assert_eq!(ids, vec![id("chart"), id("trades"), id("stack")]);
        assert_eq!(c.sizes, vec![30.0, 30.0, 40.0]);
    }

    #[test]
    fn dock_edge_with_cross_axis_wraps_target() {
        let mut root = sample();
        LayoutOp::Dock {
            node: id("book"),
            target: id("chart"),
            placement: DropPlacement::Top,
        }
        .apply_to(&mut root)
        .expect("dock");
        let c = container(&root, "root");
        assert_eq!(c.sizes, vec![60.0, 40.0]);
        let LayoutItem::Container(wrapper) = &c.children[0] else {
            panic!("expected wrapper container");
        };
        assert_eq!(wrapper.direction, SplitAxis::Vertical);
        assert_eq!(wrapper.children[0].id(), &id("book"));
        assert_eq!(wrapper.children[1].id(), &id("chart"));
        assert_eq!(wrapper.sizes, vec![50.0, 50.0]);
    }

    #[test]
    fn dock_as_tab_onto_component_creates_stack() {
        let mut root = sample();
        LayoutOp::Dock {
            node: id("trades"),
            target: id("chart"),
            placement: DropPlacement::Tab,
        }
        .apply_to(&mut root)
        .expect("dock");
        let c = container(&root, "root");
        let LayoutItem::Stack(s) = &c.children[0] else {
            panic!("expected new stack");
        };
        assert_eq!(s.children.len(), 2);
        assert_eq!(s.active_item_index, 1);
        assert_eq!(s.children[1].id, id("trades"));
        assert_eq!(stack(&root, "stack").children.len(), 1);
    }

    #[test]
    fn dock_rejects_self_and_descendants() {
        let mut root = sample();
        assert!(matches!(
            LayoutOp::Dock {
                node: id("chart"),
                target: id("chart"),
                placement: DropPlacement::Left,
            }
            .apply_to(&mut root),
            Err(LayoutOpError::CannotDockIntoSelf { .. })
        ));
        assert!(matches!(
            LayoutOp::Dock {
                node: id("stack"),
                target: id("chart"),
                placement: DropPlacement::Tab,
            }
            .apply_to(&mut root),
            Err(LayoutOpError::NotTabbable { .. })
        ));
    }

    #[test]
    fn dock_only_tab_back_onto_its_stack_fails_cleanly() {
        let mut root: LayoutItem = ContainerLayoutItem::new(
            SplitAxis::Horizontal,
            vec![
                ComponentLayoutItem::new("chart").with_id("chart").into(),
                StackLayoutItem::new(vec![ComponentLayoutItem::new("book").with_id("book")])
                    .with_id("stack")
                    .into(),
            ],
        )
        .into();
        let before = root.clone();
        let err = LayoutOp::Dock {
            node: id("book"),
            target: id("stack"),
            placement: DropPlacement::Left,
        }
        .apply_to(&mut root)
        .expect_err("target vanishes");
        assert_eq!(err, LayoutOpError::TargetRemovedByDetach { target: id("stack") });
        assert_eq!(root, before);
    }

    /// root(h): [a 50 | col(v): [b, c?] 50]
    fn nested(with_c: bool) -> LayoutItem {
        let mut col = vec![ComponentLayoutItem::new("b").with_id("b").into()];
        if with_c {
            col.push(ComponentLayoutItem::new("c").with_id("c").into());
        }
        ContainerLayoutItem::new(
            SplitAxis::Horizontal,
            vec![
                ComponentLayoutItem::new("a").with_id("a").into(),
                ContainerLayoutItem::new(SplitAxis::Vertical, col)
                    .with_id("col")
                    .into(),
            ],
        )
        .with_id("root")
        .into()
    }

    #[test]
    fn docking_last_child_away_removes_its_container() {
        let mut root = nested(false);
        LayoutOp::Dock {
            node: id("b"),
            target: id("a"),
            placement: DropPlacement::Tab,
        }
        .apply_to(&mut root)
        .expect("dock");
        assert!(!root.contains(&id("col")));
        let c = container(&root, "root");
        assert_eq!(c.children.len(), 1);
        assert_eq!(c.sizes, vec![100.0]);
        let LayoutItem::Stack(s) = &c.children[0] else {
            panic!("expected stack");
        };
        assert_eq!(s.children.len(), 2);
    }

    #[test]
    fn removing_last_child_removes_its_container() {
        let mut root = nested(false);
        LayoutOp::Remove { node: id("b") }
            .apply_to(&mut root)
            .expect("remove");
        assert!(!root.contains(&id("col")));
        assert_eq!(container(&root, "root").children.len(), 1);
    }

    #[test]
    fn container_left_with_one_child_is_replaced_by_it() {
        let mut root = nested(true);
        LayoutOp::Remove { node: id("c") }
            .apply_to(&mut root)
            .expect("remove");
        let c = container(&root, "root");
        assert!(!root.contains(&id("col")));
        assert_eq!(c.children[1].id(), &id("b"));
        assert_eq!(c.sizes, vec![50.0, 50.0]);
        root.validate().expect("valid");
    }

    #[test]
    fn dock_target_container_is_not_hoisted_away() {
        let mut root = nested(true);
        LayoutOp::Dock {
            node: id("c"),
            target: id("col"),
            placement: DropPlacement::Right,
        }
        .apply_to(&mut root)
        .expect("dock beside own parent");
        let c = container(&root, "root");
        let ids: Vec<_> = c.children.iter().map(|child| child.id().clone()).collect();
        assert_eq!(ids, vec![id("a"), id("col"), id("c")]);
        assert_eq!(container(&root, "col").children.len(), 1);
    }

    #[test]
    fn ops_round_trip_through_json() {
        let op = LayoutOp::Dock {
            node: id("a"),
            target: id("b"),
            placement: DropPlacement::Bottom,
        };
        let json = serde_json::to_value(&op).expect("serialize");
        assert_eq!(json["op"], "dock");
        assert_eq!(json["placement"], "bottom");
        let back: LayoutOp = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, op);
    }
}
