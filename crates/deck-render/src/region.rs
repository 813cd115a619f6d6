//! Rendered region tree.
//!
//! A [`RegionView`] mirrors the layout tree after solving: every node has a
//! concrete [`Rect`], split regions carry the divider handles used for
//! hit-testing, and component regions carry what their instance drew.

use deck_core::geometry::{Rect, SplitAxis};
use deck_layout::NodeId;

/// Grab handle for the divider between two adjacent children of a split.
#[derive(Debug, Clone, PartialEq)]
pub struct DividerHandle {
    /// The container whose children the divider separates.
    pub container: NodeId,
    /// Divider `index` sits between child `index` and child `index + 1`.
    pub index: usize,
    pub axis: SplitAxis,
    /// One cell thick along `axis`, spanning the container on the cross axis.
    pub area: Rect,
}

/// One entry of a stack's tab strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabView {
    pub node_id: NodeId,
    pub title: String,
    pub active: bool,
}

/// Solved, rendered form of a layout node.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionView {
    /// Container without children.
    Empty { node_id: NodeId, area: Rect },
    Split {
        node_id: NodeId,
        area: Rect,
        axis: SplitAxis,
        children: Vec<RegionView>,
        sizes: Vec<f64>,
        min_sizes: Vec<f64>,
        dividers: Vec<DividerHandle>,
    },
    Component {
        node_id: NodeId,
        component_id: String,
        area: Rect,
        title: String,
        lines: Vec<String>,
    },
    /// Inline placeholder for a component that could not be shown.
    Error {
        node_id: NodeId,
        area: Rect,
        title: String,
        message: String,
    },
    Stack {
        node_id: NodeId,
        area: Rect,
        tabs: Vec<TabView>,
        active: usize,
        body: Box<RegionView>,
    },
}

impl RegionView {
    #[must_use]
    pub fn area(&self) -> Rect {
        match self {
            Self::Empty { area, .. }
            | Self::Split { area, .. }
            | Self::Component { area, .. }
            | Self::Error { area, .. }
            | Self::Stack { area, .. } => *area,
        }
    }

    #[must_use]
    pub fn node_id(&self) -> &NodeId {
        match self {
            Self::Empty { node_id, .. }
            | Self::Split { node_id, .. }
            | Self::Component { node_id, .. }
            | Self::Error { node_id, .. }
            | Self::Stack { node_id, .. } => node_id,
        }
    }

    /// Error placeholders anywhere in this region, depth first.
    #[must_use]
    pub fn errors(&self) -> Vec<(&NodeId, &str)> {
        let mut out = Vec::new();
        self.collect_errors(&mut out);
        out
    }

    fn collect_errors<'a>(&'a self, out: &mut Vec<(&'a NodeId, &'a str)>) {
        match self {
            Self::Error {
                node_id, message, ..
            } => out.push((node_id, message)),
            Self::Split { children, .. } => {
                children.iter().for_each(|child| child.collect_errors(out));
            }
            Self::Stack { body, .. } => body.collect_errors(out),
            Self::Empty { .. } | Self::Component { .. } => {}
        }
    }

    /// Divider handle under the given cell, innermost first.
    #[must_use]
    pub fn divider_at(&self, x: u16, y: u16) -> Option<&DividerHandle> {
        match self {
            Self::Split {
                children, dividers, ..
            } => children
                .iter()
                .find_map(|child| child.divider_at(x, y))
                .or_else(|| dividers.iter().find(|d| d.area.contains(x, y))),
            Self::Stack { body, .. } => body.divider_at(x, y),
            _ => None,
        }
    }

    /// Find the region rendered for `id`.
    #[must_use]
    pub fn find(&self, id: &NodeId) -> Option<&RegionView> {
        if self.node_id() == id {
            return Some(self);
        }
        match self {
            Self::Split { children, .. } => children.iter().find_map(|child| child.find(id)),
            Self::Stack { body, .. } => body.find(id),
            _ => None,
        }
    }

    /// Indented one-line-per-region outline, for logs and the demo.
    #[must_use]
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(0, &mut out);
        out
    }

    fn write_outline(&self, depth: usize, out: &mut String) {
        let pad = "  ".repeat(depth);
        let a = self.area();
        let geom = format!("{}x{}@{},{}", a.width, a.height, a.x, a.y);
        match self {
            Self::Empty { .. } => out.push_str(&format!("{pad}(empty) {geom}\n")),
            Self::Split {
                axis,
                children,
                sizes,
                ..
            } => {
                let sizes: Vec<String> = sizes.iter().map(|s| format!("{s:.1}")).collect();
                out.push_str(&format!(
                    "{pad}split {axis:?} [{}] {geom}\n",
                    sizes.join(", ")
                ));
                for child in children {
                    child.write_outline(depth + 1, out);
                }
            }
            Self::Component {
                title, lines, ..
            } => {
                out.push_str(&format!("{pad}{title} {geom}\n"));
                for line in lines {
                    out.push_str(&format!("{pad}  | {line}\n"));
                }
            }
            Self::Error { title, message, .. } => {
                out.push_str(&format!("{pad}!! {title}: {message} {geom}\n"));
            }
            Self::Stack { tabs, body, .. } => {
                let strip: Vec<String> = tabs
                    .iter()
                    .map(|t| {
                        if t.active {
                            format!("[{}]", t.title)
                        } else {
                            t.title.clone()
                        }
                    })
                    .collect();
                out.push_str(&format!("{pad}tabs {} {geom}\n", strip.join(" ")));
                body.write_outline(depth + 1, out);
            }
        }
    }
}
