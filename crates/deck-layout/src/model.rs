//! Workspace layout tree.
//!
//! A layout is a tree of three node kinds:
//!
//! - **Container** splits its region between children along one axis, with
//!   percentage `sizes` (one per child, summing to 100).
//! - **Component** is a leaf bound to a registered widget by `componentId`.
//! - **Stack** groups component leaves behind tabs; one is active at a time.
//!
//! The serialized form is the persisted/exported wire format, so field names
//! are camelCase and the node kind is carried in a `type` tag:
//!
//! ```json
//! { "type": "container", "id": "…", "direction": "horizontal",
//!   "sizes": [70.0, 30.0], "children": [ … ] }
//! ```

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use deck_core::geometry::SplitAxis;

/// Minimum share (percent of the parent's extent) used when a node does not
/// declare its own.
pub const DEFAULT_MIN_SIZE: f64 = 10.0;

/// Tolerance when checking that sizes sum to 100.
pub const SIZE_EPSILON: f64 = 0.01;

/// Stable identifier of a layout node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap an existing identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Generate a new random identifier.
    #[must_use]
    pub fn fresh() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Equal split of 100 across `count` children.
///
/// The last entry absorbs rounding so the sum is exactly 100.
#[must_use]
pub fn equal_sizes(count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let share = 100.0 / count as f64;
    let mut sizes = vec![share; count];
    let head: f64 = sizes[..count - 1].iter().sum();
    sizes[count - 1] = 100.0 - head;
    sizes
}

/// A node of the layout tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayoutItem {
    Container(ContainerLayoutItem),
    Component(ComponentLayoutItem),
    Stack(StackLayoutItem),
}

/// Split region holding zero or more children along one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerLayoutItem {
    pub id: NodeId,
    pub direction: SplitAxis,
    #[serde(default)]
    pub children: Vec<LayoutItem>,
    /// Percentage per child. Missing sizes are filled with an equal split by
    /// [`LayoutItem::normalize_sizes`].
    #[serde(default)]
    pub sizes: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<f64>,
}

/// Leaf bound to a registered component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentLayoutItem {
    pub id: NodeId,
    pub component_id: String,
    #[serde(default)]
    pub component_state: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<f64>,
}

/// Tabbed group of component leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackLayoutItem {
    pub id: NodeId,
    pub children: Vec<ComponentLayoutItem>,
    #[serde(default)]
    pub active_item_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<f64>,
}

impl ContainerLayoutItem {
    /// Container with an equal split across `children`.
    pub fn new(direction: SplitAxis, children: Vec<LayoutItem>) -> Self {
        let sizes = equal_sizes(children.len());
        Self {
            id: NodeId::fresh(),
            direction,
            children,
            sizes,
            min_size: None,
        }
    }

    /// Replace the split percentages.
    #[must_use]
    pub fn with_sizes(mut self, sizes: Vec<f64>) -> Self {
        self.sizes = sizes;
        self
    }

    #[must_use]
    pub fn with_min_size(mut self, min_size: f64) -> Self {
        self.min_size = Some(min_size);
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<NodeId>) -> Self {
        self.id = id.into();
        self
    }

    /// Declared minimum of each child along this container's axis.
    #[must_use]
    pub fn child_min_sizes(&self) -> Vec<f64> {
        self.children.iter().map(LayoutItem::min_size).collect()
    }

    /// Fix up `sizes` for this container only.
    pub(crate) fn normalize_own_sizes(&mut self) {
        let count = self.children.len();
        let well_formed = self.sizes.len() == count
            && self.sizes.iter().all(|s| s.is_finite() && *s >= 0.0);
        if !well_formed {
            self.sizes = equal_sizes(count);
            return;
        }
        let sum: f64 = self.sizes.iter().sum();
        if count == 0 || (sum - 100.0).abs() <= SIZE_EPSILON {
            return;
        }
        if sum <= 0.0 {
            self.sizes = equal_sizes(count);
            return;
        }
        let scale = 100.0 / sum;
        for size in &mut self.sizes {
            *size *= scale;
        }
    }
}

impl ComponentLayoutItem {
    pub fn new(component_id: impl Into<String>) -> Self {
        Self {
            id: NodeId::fresh(),
            component_id: component_id.into(),
            component_state: Map::new(),
            title: None,
            min_size: None,
        }
    }

    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add one entry to the component state map.
    #[must_use]
    pub fn with_state(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.component_state.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_min_size(mut self, min_size: f64) -> Self {
        self.min_size = Some(min_size);
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<NodeId>) -> Self {
        self.id = id.into();
        self
    }

    /// Title shown on tabs and headers; falls back to the component id.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.component_id)
    }
}

impl StackLayoutItem {
    pub fn new(children: Vec<ComponentLayoutItem>) -> Self {
        Self {
            id: NodeId::fresh(),
            children,
            active_item_index: 0,
            title: None,
            min_size: None,
        }
    }

    #[must_use]
    pub fn with_active(mut self, index: usize) -> Self {
        self.active_item_index = index;
        self
    }

    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<NodeId>) -> Self {
        self.id = id.into();
        self
    }

    /// The active tab, if the stack is non-empty.
    #[must_use]
    pub fn active(&self) -> Option<&ComponentLayoutItem> {
        self.children
            .get(self.active_item_index)
            .or_else(|| self.children.last())
    }
}

impl From<ContainerLayoutItem> for LayoutItem {
    fn from(item: ContainerLayoutItem) -> Self {
        Self::Container(item)
    }
}

impl From<ComponentLayoutItem> for LayoutItem {
    fn from(item: ComponentLayoutItem) -> Self {
        Self::Component(item)
    }
}

impl From<StackLayoutItem> for LayoutItem {
    fn from(item: StackLayoutItem) -> Self {
        Self::Stack(item)
    }
}

impl LayoutItem {
    /// Children laid out left to right.
    pub fn row(children: Vec<LayoutItem>) -> Self {
        ContainerLayoutItem::new(SplitAxis::Horizontal, children).into()
    }

    /// Children laid out top to bottom.
    pub fn column(children: Vec<LayoutItem>) -> Self {
        ContainerLayoutItem::new(SplitAxis::Vertical, children).into()
    }

    /// Single component leaf.
    pub fn component(component_id: impl Into<String>) -> Self {
        ComponentLayoutItem::new(component_id).into()
    }

    /// Tabbed stack of component leaves.
    pub fn stack(children: Vec<ComponentLayoutItem>) -> Self {
        StackLayoutItem::new(children).into()
    }

    /// Empty root container, as used for a brand-new workspace.
    pub fn empty() -> Self {
        Self::row(Vec::new())
    }

    #[must_use]
    pub fn id(&self) -> &NodeId {
        match self {
            Self::Container(c) => &c.id,
            Self::Component(c) => &c.id,
            Self::Stack(s) => &s.id,
        }
    }

    /// Kind tag as used in the serialized form.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Container(_) => "container",
            Self::Component(_) => "component",
            Self::Stack(_) => "stack",
        }
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Container(_) => None,
            Self::Component(c) => c.title.as_deref(),
            Self::Stack(s) => s.title.as_deref(),
        }
    }

    /// Minimum share this node needs along its parent's axis.
    #[must_use]
    pub fn min_size(&self) -> f64 {
        let declared = match self {
            Self::Container(c) => c.min_size,
            Self::Component(c) => c.min_size,
            Self::Stack(s) => s.min_size,
        };
        declared
            .filter(|m| m.is_finite() && *m >= 0.0)
            .unwrap_or(DEFAULT_MIN_SIZE)
    }

    /// All node ids in depth-first order, stack tabs included.
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, out: &mut Vec<NodeId>) {
        out.push(self.id().clone());
        match self {
            Self::Container(c) => c.children.iter().for_each(|child| child.collect_ids(out)),
            Self::Component(_) => {}
            Self::Stack(s) => out.extend(s.children.iter().map(|tab| tab.id.clone())),
        }
    }

    /// Whether any node (including stack tabs) carries `id`.
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        if self.id() == id {
            return true;
        }
        match self {
            Self::Container(c) => c.children.iter().any(|child| child.contains(id)),
            Self::Component(_) => false,
            Self::Stack(s) => s.children.iter().any(|tab| &tab.id == id),
        }
    }

    /// Find a tree node by id. Stack tabs are not tree nodes; use
    /// [`find_component`](Self::find_component) for those.
    #[must_use]
    pub fn find(&self, id: &NodeId) -> Option<&LayoutItem> {
        if self.id() == id {
            return Some(self);
        }
        match self {
            Self::Container(c) => c.children.iter().find_map(|child| child.find(id)),
            _ => None,
        }
    }

    pub fn find_mut(&mut self, id: &NodeId) -> Option<&mut LayoutItem> {
        if self.id() == id {
            return Some(self);
        }
        match self {
            Self::Container(c) => c.children.iter_mut().find_map(|child| child.find_mut(id)),
            _ => None,
        }
    }

    /// Find a component leaf by id, whether it sits in a container or a stack.
    #[must_use]
    pub fn find_component(&self, id: &NodeId) -> Option<&ComponentLayoutItem> {
        match self {
            Self::Component(c) => (&c.id == id).then_some(c),
            Self::Stack(s) => s.children.iter().find(|tab| &tab.id == id),
            Self::Container(c) => c.children.iter().find_map(|child| child.find_component(id)),
        }
    }

    /// Number of component leaves, stack tabs included.
    #[must_use]
    pub fn component_count(&self) -> usize {
        match self {
            Self::Container(c) => c.children.iter().map(LayoutItem::component_count).sum(),
            Self::Component(_) => 1,
            Self::Stack(s) => s.children.len(),
        }
    }

    /// Deep copy with a freshly generated id on every node.
    #[must_use]
    pub fn with_fresh_ids(&self) -> LayoutItem {
        let mut copy = self.clone();
        copy.reassign_ids(&mut NodeId::fresh);
        copy
    }

    fn reassign_ids(&mut self, next: &mut impl FnMut() -> NodeId) {
        match self {
            Self::Container(c) => {
                c.id = next();
                c.children
                    .iter_mut()
                    .for_each(|child| child.reassign_ids(next));
            }
            Self::Component(c) => c.id = next(),
            Self::Stack(s) => {
                s.id = next();
                s.children.iter_mut().for_each(|tab| tab.id = next());
            }
        }
    }

    /// Equality of structure and content, ignoring node ids.
    #[must_use]
    pub fn structurally_eq(&self, other: &LayoutItem) -> bool {
        let mut blank = || NodeId::new("");
        let mut left = self.clone();
        let mut right = other.clone();
        left.reassign_ids(&mut blank);
        right.reassign_ids(&mut blank);
        left == right
    }

    /// Repair sizes throughout the tree.
    ///
    /// Missing or malformed size vectors become equal splits, sums other than
    /// 100 are rescaled, and stack active indices are clamped into range.
    pub fn normalize_sizes(&mut self) {
        match self {
            Self::Container(c) => {
                c.normalize_own_sizes();
                c.children.iter_mut().for_each(LayoutItem::normalize_sizes);
            }
            Self::Component(_) => {}
            Self::Stack(s) => {
                if s.active_item_index >= s.children.len() {
                    s.active_item_index = s.children.len().saturating_sub(1);
                }
            }
        }
    }

    /// Check tree invariants.
    pub fn validate(&self) -> Result<(), LayoutModelError> {
        let mut seen = BTreeSet::new();
        self.validate_node(&mut seen)
    }

    fn validate_node(&self, seen: &mut BTreeSet<NodeId>) -> Result<(), LayoutModelError> {
        claim_id(self.id(), seen)?;
        match self {
            Self::Container(c) => {
                check_min_size(&c.id, c.min_size)?;
                if c.sizes.len() != c.children.len() {
                    return Err(LayoutModelError::SizeCountMismatch {
                        container: c.id.clone(),
                        sizes: c.sizes.len(),
                        children: c.children.len(),
                    });
                }
                for (index, value) in c.sizes.iter().enumerate() {
                    if !value.is_finite() || *value < 0.0 {
                        return Err(LayoutModelError::InvalidSize {
                            container: c.id.clone(),
                            index,
                            value: *value,
                        });
                    }
                }
                let sum: f64 = c.sizes.iter().sum();
                if !c.children.is_empty() && (sum - 100.0).abs() > SIZE_EPSILON {
                    return Err(LayoutModelError::SizeSumMismatch {
                        container: c.id.clone(),
                        sum,
                    });
                }
                for child in &c.children {
                    child.validate_node(seen)?;
                }
                Ok(())
            }
            Self::Component(c) => validate_component(c),
            Self::Stack(s) => {
                check_min_size(&s.id, s.min_size)?;
                if s.children.is_empty() {
                    return Err(LayoutModelError::EmptyStack {
                        stack: s.id.clone(),
                    });
                }
                if s.active_item_index >= s.children.len() {
                    return Err(LayoutModelError::ActiveIndexOutOfRange {
                        stack: s.id.clone(),
                        index: s.active_item_index,
                        len: s.children.len(),
                    });
                }
                for tab in &s.children {
                    claim_id(&tab.id, seen)?;
                    validate_component(tab)?;
                }
                Ok(())
            }
        }
    }
}

fn claim_id(id: &NodeId, seen: &mut BTreeSet<NodeId>) -> Result<(), LayoutModelError> {
    if seen.insert(id.clone()) {
        Ok(())
    } else {
        Err(LayoutModelError::DuplicateNodeId {
            node_id: id.clone(),
        })
    }
}

fn check_min_size(node_id: &NodeId, min_size: Option<f64>) -> Result<(), LayoutModelError> {
    match min_size {
        Some(value) if !value.is_finite() || !(0.0..=100.0).contains(&value) => {
            Err(LayoutModelError::InvalidMinSize {
                node_id: node_id.clone(),
                value,
            })
        }
        _ => Ok(()),
    }
}

fn validate_component(c: &ComponentLayoutItem) -> Result<(), LayoutModelError> {
    check_min_size(&c.id, c.min_size)?;
    if c.component_id.trim().is_empty() {
        return Err(LayoutModelError::EmptyComponentId {
            node_id: c.id.clone(),
        });
    }
    Ok(())
}

/// Layout tree invariant violations.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutModelError {
    DuplicateNodeId {
        node_id: NodeId,
    },
    SizeCountMismatch {
        container: NodeId,
        sizes: usize,
        children: usize,
    },
    SizeSumMismatch {
        container: NodeId,
        sum: f64,
    },
    InvalidSize {
        container: NodeId,
        index: usize,
        value: f64,
    },
    InvalidMinSize {
        node_id: NodeId,
        value: f64,
    },
    EmptyStack {
        stack: NodeId,
    },
    ActiveIndexOutOfRange {
        stack: NodeId,
        index: usize,
        len: usize,
    },
    EmptyComponentId {
        node_id: NodeId,
    },
}

impl fmt::Display for LayoutModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNodeId { node_id } => write!(f, "duplicate node id {node_id}"),
            Self::SizeCountMismatch {
                container,
                sizes,
                children,
            } => write!(
                f,
                "container {container} has {sizes} sizes for {children} children"
            ),
            Self::SizeSumMismatch { container, sum } => {
                write!(f, "container {container} sizes sum to {sum}, expected 100")
            }
            Self::InvalidSize {
                container,
                index,
                value,
            } => write!(f, "container {container} size[{index}] = {value} is invalid"),
            Self::InvalidMinSize { node_id, value } => {
                write!(f, "node {node_id} has invalid minimum size {value}")
            }
            Self::EmptyStack { stack } => write!(f, "stack {stack} has no tabs"),
            Self::ActiveIndexOutOfRange { stack, index, len } => write!(
                f,
                "stack {stack} active index {index} out of range for {len} tabs"
            ),
            Self::EmptyComponentId { node_id } => {
                write!(f, "component node {node_id} has an empty component id")
            }
        }
    }
}

impl std::error::Error for LayoutModelError {}
