#![forbid(unsafe_code)]

//! Global pointer style (cursor icon and text selection) with scoped overrides.
//!
//! A drag temporarily changes process-wide presentation state: the cursor
//! becomes a resize cursor and text selection is suppressed. The host owns
//! that state behind [`PointerStyleHost`]; callers change it only through a
//! [`PointerStyleOverride`] guard, which restores the previous style when it
//! is dropped. Every way a drag can end (release, capture loss, the owner
//! going away) therefore restores the style.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::geometry::SplitAxis;

/// Cursor icon requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorIcon {
    #[default]
    Default,
    /// Resize cursor for a divider between side-by-side panes.
    ColResize,
    /// Resize cursor for a divider between stacked panes.
    RowResize,
}

impl CursorIcon {
    /// Resize cursor for dragging a divider of a split along `axis`.
    #[must_use]
    pub const fn resize_for(axis: SplitAxis) -> Self {
        match axis {
            SplitAxis::Horizontal => Self::ColResize,
            SplitAxis::Vertical => Self::RowResize,
        }
    }
}

/// Process-wide pointer presentation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerStyle {
    pub cursor: CursorIcon,
    pub text_selection: bool,
}

impl Default for PointerStyle {
    fn default() -> Self {
        Self {
            cursor: CursorIcon::Default,
            text_selection: true,
        }
    }
}

impl PointerStyle {
    /// Style applied while dragging a divider.
    #[must_use]
    pub const fn dragging(axis: SplitAxis) -> Self {
        Self {
            cursor: CursorIcon::resize_for(axis),
            text_selection: false,
        }
    }
}

/// Host-side owner of the pointer style.
///
/// Methods take `&self`; hosts use interior mutability since the style is
/// shared by every splitter in the window.
pub trait PointerStyleHost {
    fn pointer_style(&self) -> PointerStyle;
    fn set_pointer_style(&self, style: PointerStyle);
}

/// Headless host backed by a shared cell.
///
/// Used by tests and by hosts that read the style back once per frame.
#[derive(Clone, Default)]
pub struct SharedPointerStyle {
    style: Rc<Cell<PointerStyle>>,
}

impl SharedPointerStyle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current style.
    #[must_use]
    pub fn get(&self) -> PointerStyle {
        self.style.get()
    }
}

impl PointerStyleHost for SharedPointerStyle {
    fn pointer_style(&self) -> PointerStyle {
        self.style.get()
    }

    fn set_pointer_style(&self, style: PointerStyle) {
        self.style.set(style);
    }
}

impl fmt::Debug for SharedPointerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedPointerStyle")
            .field("style", &self.style.get())
            .finish()
    }
}

/// Scoped override of the host pointer style.
///
/// The previous style is captured on construction and written back on drop.
#[must_use = "the override is reverted as soon as the guard is dropped"]
pub struct PointerStyleOverride {
    host: Rc<dyn PointerStyleHost>,
    previous: PointerStyle,
}

impl PointerStyleOverride {
    /// Apply `style` to `host` until the returned guard is dropped.
    pub fn apply(host: Rc<dyn PointerStyleHost>, style: PointerStyle) -> Self {
        let previous = host.pointer_style();
        host.set_pointer_style(style);
        Self { host, previous }
    }

    /// Style that will be restored on drop.
    #[must_use]
    pub const fn previous(&self) -> PointerStyle {
        self.previous
    }
}

impl Drop for PointerStyleOverride {
    fn drop(&mut self) {
        self.host.set_pointer_style(self.previous);
    }
}

impl fmt::Debug for PointerStyleOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerStyleOverride")
            .field("previous", &self.previous)
            .finish()
    }
}
