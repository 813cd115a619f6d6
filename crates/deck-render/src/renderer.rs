//! Layout renderer.
//!
//! Walks a layout tree once per frame and produces a [`RegionView`]. Component
//! instances live in a mount table keyed by node id: they are created the
//! first time their node is shown, reused while the node keeps the same
//! `componentId`, and disposed once the node leaves the tree. Inactive stack
//! tabs keep their instances mounted.
//!
//! Component renders run inside a panic boundary. A panicking component is
//! replaced by an error placeholder and stays failed until its node is
//! removed or rebound; siblings are unaffected.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use deck_core::geometry::{Rect, SplitAxis};
use deck_layout::{
    ComponentLayoutItem, ContainerLayoutItem, LayoutItem, NodeId, StackLayoutItem, equal_sizes,
    split_rect,
};

use crate::config::RendererConfig;
use crate::region::{DividerHandle, RegionView, TabView};
use crate::registry::{Component, ComponentRegistry, Mount};

struct Mounted {
    instance: Box<dyn Component>,
    mount: Mount,
    failure: Option<String>,
}

/// Renderer-local tab selection for one stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TabSelection {
    /// `activeItemIndex` last seen on the model.
    model_index: usize,
    selected: usize,
    len: usize,
}

/// Renders layout trees and owns the mounted component instances.
pub struct LayoutRenderer {
    registry: Rc<ComponentRegistry>,
    config: RendererConfig,
    mounts: BTreeMap<NodeId, Mounted>,
    tabs: BTreeMap<NodeId, TabSelection>,
}

impl LayoutRenderer {
    #[must_use]
    pub fn new(registry: Rc<ComponentRegistry>) -> Self {
        Self {
            registry,
            config: RendererConfig::default(),
            mounts: BTreeMap::new(),
            tabs: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: RendererConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &Rc<ComponentRegistry> {
        &self.registry
    }

    /// Render `node` into `area`.
    ///
    /// Instances whose nodes no longer appear in `node` are disposed before
    /// returning.
    pub fn render(&mut self, node: &LayoutItem, area: Rect) -> RegionView {
        let view = self.render_node(node, area);
        self.sweep(node);
        view
    }

    /// Switch the tab shown by `stack` without touching the model.
    ///
    /// Returns `false` if the stack was not part of the last render or the
    /// index is out of range.
    pub fn select_tab(&mut self, stack: &NodeId, index: usize) -> bool {
        match self.tabs.get_mut(stack) {
            Some(selection) if index < selection.len => {
                selection.selected = index;
                true
            }
            _ => false,
        }
    }

    /// Tab currently shown by `stack`.
    #[must_use]
    pub fn selected_tab(&self, stack: &NodeId) -> Option<usize> {
        self.tabs.get(stack).map(|s| s.selected)
    }

    #[must_use]
    pub fn is_mounted(&self, node: &NodeId) -> bool {
        self.mounts.contains_key(node)
    }

    #[must_use]
    pub fn mounted_count(&self) -> usize {
        self.mounts.len()
    }

    /// Dispose every mounted instance.
    pub fn dispose_all(&mut self) {
        let mounts = std::mem::take(&mut self.mounts);
        for (node_id, mounted) in mounts {
            dispose(&node_id, mounted);
        }
        self.tabs.clear();
    }

    fn render_node(&mut self, node: &LayoutItem, area: Rect) -> RegionView {
        match node {
            LayoutItem::Container(c) => match c.children.as_slice() {
                [] => RegionView::Empty {
                    node_id: c.id.clone(),
                    area,
                },
                [only] => self.render_node(only, area),
                _ => self.render_split(c, area),
            },
            LayoutItem::Component(item) => self.render_component(item, area),
            LayoutItem::Stack(stack) => self.render_stack(stack, area),
        }
    }

    fn render_split(&mut self, c: &ContainerLayoutItem, area: Rect) -> RegionView {
        let sizes = if c.sizes.len() == c.children.len() {
            c.sizes.clone()
        } else {
            equal_sizes(c.children.len())
        };
        let rects = split_rect(area, c.direction, &sizes);
        let children: Vec<RegionView> = c
            .children
            .iter()
            .zip(&rects)
            .map(|(child, rect)| self.render_node(child, *rect))
            .collect();
        let dividers = rects
            .windows(2)
            .enumerate()
            .map(|(index, pair)| DividerHandle {
                container: c.id.clone(),
                index,
                axis: c.direction,
                area: divider_area(area, c.direction, pair[1].start(c.direction)),
            })
            .collect();
        RegionView::Split {
            node_id: c.id.clone(),
            area,
            axis: c.direction,
            children,
            sizes,
            min_sizes: c.child_min_sizes(),
            dividers,
        }
    }

    fn render_stack(&mut self, stack: &StackLayoutItem, area: Rect) -> RegionView {
        let len = stack.children.len();
        if len == 0 {
            return RegionView::Empty {
                node_id: stack.id.clone(),
                area,
            };
        }
        let model_index = stack.active_item_index.min(len - 1);
        let selection = self
            .tabs
            .entry(stack.id.clone())
            .and_modify(|s| {
                if s.model_index != stack.active_item_index {
                    s.model_index = stack.active_item_index;
                    s.selected = model_index;
                }
                s.len = len;
                s.selected = s.selected.min(len - 1);
            })
            .or_insert(TabSelection {
                model_index: stack.active_item_index,
                selected: model_index,
                len,
            });
        let selected = selection.selected;

        let tabs = stack
            .children
            .iter()
            .enumerate()
            .map(|(index, tab)| TabView {
                node_id: tab.id.clone(),
                title: tab.display_title().to_string(),
                active: index == selected,
            })
            .collect();
        let body_area = if area.height > 0 {
            Rect::new(area.x, area.y.saturating_add(1), area.width, area.height - 1)
        } else {
            area
        };
        let body = self.render_component(&stack.children[selected], body_area);
        RegionView::Stack {
            node_id: stack.id.clone(),
            area,
            tabs,
            active: selected,
            body: Box::new(body),
        }
    }

    fn render_component(&mut self, item: &ComponentLayoutItem, area: Rect) -> RegionView {
        let rebound = self
            .mounts
            .get(&item.id)
            .is_some_and(|m| m.mount.component_id() != item.component_id);
        if rebound && let Some(stale) = self.mounts.remove(&item.id) {
            dispose(&item.id, stale);
        }

        if !self.mounts.contains_key(&item.id) {
            let Some(instance) = self.registry.create_instance(&item.component_id) else {
                tracing::warn!(
                    node_id = %item.id,
                    component_id = %item.component_id,
                    "component not registered"
                );
                return error_region(
                    &self.config.error_title,
                    item,
                    area,
                    format!("component '{}' is not registered", item.component_id),
                );
            };
            tracing::debug!(
                node_id = %item.id,
                component_id = %item.component_id,
                "mounting component"
            );
            self.mounts.insert(
                item.id.clone(),
                Mounted {
                    instance,
                    mount: Mount::for_item(item, area),
                    failure: None,
                },
            );
        }

        let Some(Mounted {
            instance,
            mount,
            failure,
        }) = self.mounts.get_mut(&item.id)
        else {
            return error_region(
                &self.config.error_title,
                item,
                area,
                "component mount missing".to_string(),
            );
        };
        if let Some(message) = failure.clone() {
            return error_region(&self.config.error_title, item, area, message);
        }

        mount.sync(item, area);
        let outcome = catch_unwind(AssertUnwindSafe(|| instance.render(mount)));
        match outcome {
            Ok(()) => RegionView::Component {
                node_id: item.id.clone(),
                component_id: item.component_id.clone(),
                area,
                title: mount.title().to_string(),
                lines: mount.lines().to_vec(),
            },
            Err(payload) => {
                let message = format!("component panicked: {}", panic_message(payload.as_ref()));
                tracing::error!(
                    node_id = %item.id,
                    component_id = %item.component_id,
                    error = %message,
                    "component render failed"
                );
                *failure = Some(message.clone());
                error_region(&self.config.error_title, item, area, message)
            }
        }
    }

    /// Dispose instances whose nodes are gone from `root`.
    fn sweep(&mut self, root: &LayoutItem) {
        let live: BTreeSet<NodeId> = root.node_ids().into_iter().collect();
        let gone: Vec<NodeId> = self
            .mounts
            .keys()
            .filter(|id| !live.contains(*id))
            .cloned()
            .collect();
        for node_id in gone {
            if let Some(mounted) = self.mounts.remove(&node_id) {
                dispose(&node_id, mounted);
            }
        }
        self.tabs.retain(|id, _| live.contains(id));
    }
}

impl Drop for LayoutRenderer {
    fn drop(&mut self) {
        self.dispose_all();
    }
}

impl fmt::Debug for LayoutRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutRenderer")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("mounted", &self.mounts.keys().collect::<Vec<_>>())
            .field("tabs", &self.tabs)
            .finish()
    }
}

fn dispose(node_id: &NodeId, mut mounted: Mounted) {
    tracing::debug!(
        node_id = %node_id,
        component_id = mounted.mount.component_id(),
        "disposing component"
    );
    if let Err(payload) = catch_unwind(AssertUnwindSafe(|| mounted.instance.dispose())) {
        tracing::error!(
            node_id = %node_id,
            error = %panic_message(payload.as_ref()),
            "component dispose panicked"
        );
    }
}

fn error_region(
    title: &str,
    item: &ComponentLayoutItem,
    area: Rect,
    message: String,
) -> RegionView {
    RegionView::Error {
        node_id: item.id.clone(),
        area,
        title: title.to_string(),
        message,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// One-cell strip straddling the boundary at `boundary` along `axis`.
fn divider_area(area: Rect, axis: SplitAxis, boundary: u16) -> Rect {
    let at = boundary.saturating_sub(1).max(area.start(axis));
    match axis {
        SplitAxis::Horizontal => Rect::new(at, area.y, 1, area.height),
        SplitAxis::Vertical => Rect::new(area.x, at, area.width, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FnComponent;
    use deck_layout::{ComponentLayoutItem, StackLayoutItem};
    use std::cell::RefCell;

    type Log = Rc<RefCell<Vec<String>>>;

    fn tracked_registry(log: &Log) -> Rc<ComponentRegistry> {
        let mut registry = ComponentRegistry::new();
        for id in ["chart", "orders", "positions"] {
            let log = Rc::clone(log);
            registry.register(id, move || {
                log.borrow_mut().push(format!("create {id}"));
                let render_log = Rc::clone(&log);
                let dispose_log = Rc::clone(&log);
                Box::new(
                    FnComponent::new(move |m: &mut Mount| {
                        render_log.borrow_mut().push(format!("render {id}"));
                        m.push_line(id);
                    })
                    .on_dispose(move || dispose_log.borrow_mut().push(format!("dispose {id}"))),
                ) as Box<dyn Component>
            });
        }
        registry.register_fn("boom", |_| panic!("feed disconnected"));
        Rc::new(registry)
    }

    fn count(log: &Log, entry: &str) -> usize {
        log.borrow().iter().filter(|e| *e == entry).count()
    }

    #[test]
    fn empty_container_renders_placeholder() {
        let mut renderer = LayoutRenderer::new(Rc::new(ComponentRegistry::new()));
        let view = renderer.render(&LayoutItem::empty(), Rect::from_size(10, 5));
        assert!(matches!(view, RegionView::Empty { .. }));
    }

    #[test]
    fn single_child_takes_whole_area() {
        let log = Log::default();
        let mut renderer = LayoutRenderer::new(tracked_registry(&log));
        let tree = LayoutItem::row(vec![ComponentLayoutItem::new("chart").with_id("c").into()]);
        let view = renderer.render(&tree, Rect::from_size(40, 10));
        let RegionView::Component { node_id, area, .. } = view else {
            panic!("expected component region, got {view:?}");
        };
        assert_eq!(node_id.as_str(), "c");
        assert_eq!(area, Rect::from_size(40, 10));
    }

    #[test]
    fn split_produces_dividers_between_children() {
        let log = Log::default();
        let mut renderer = LayoutRenderer::new(tracked_registry(&log));
        let tree: LayoutItem = ContainerLayoutItem::new(
            SplitAxis::Horizontal,
            vec![LayoutItem::component("chart"), LayoutItem::component("orders")],
        )
        .with_sizes(vec![70.0, 30.0])
        .into();
        let view = renderer.render(&tree, Rect::from_size(100, 20));
        let RegionView::Split {
            children,
            dividers,
            min_sizes,
            ..
        } = &view
        else {
            panic!("expected split");
        };
        assert_eq!(children[0].area(), Rect::new(0, 0, 70, 20));
        assert_eq!(children[1].area(), Rect::new(70, 0, 30, 20));
        assert_eq!(min_sizes, &vec![10.0, 10.0]);
        assert_eq!(dividers.len(), 1);
        assert_eq!(dividers[0].area, Rect::new(69, 0, 1, 20));
        assert!(view.divider_at(69, 5).is_some());
    }

    #[test]
    fn instances_are_reused_across_renders() {
        let log = Log::default();
        let mut renderer = LayoutRenderer::new(tracked_registry(&log));
        let tree = LayoutItem::row(vec![
            ComponentLayoutItem::new("chart").with_id("c").into(),
            ComponentLayoutItem::new("orders").with_id("o").into(),
        ]);
        renderer.render(&tree, Rect::from_size(40, 10));
        renderer.render(&tree, Rect::from_size(60, 10));
        assert_eq!(count(&log, "create chart"), 1);
        assert_eq!(count(&log, "render chart"), 2);
        assert_eq!(renderer.mounted_count(), 2);
    }

    #[test]
    fn rebinding_a_node_disposes_the_old_instance() {
        let log = Log::default();
        let mut renderer = LayoutRenderer::new(tracked_registry(&log));
        let before: LayoutItem = ComponentLayoutItem::new("chart").with_id("n").into();
        let after: LayoutItem = ComponentLayoutItem::new("orders").with_id("n").into();
        renderer.render(&before, Rect::from_size(10, 2));
        renderer.render(&after, Rect::from_size(10, 2));
        assert_eq!(count(&log, "dispose chart"), 1);
        assert_eq!(count(&log, "create orders"), 1);
    }

    #[test]
    fn panicking_component_becomes_error_and_siblings_render() {
        let log = Log::default();
        let mut renderer = LayoutRenderer::new(tracked_registry(&log));
        let tree = LayoutItem::row(vec![
            ComponentLayoutItem::new("boom").with_id("b").into(),
            ComponentLayoutItem::new("chart").with_id("c").into(),
        ]);
        let view = renderer.render(&tree, Rect::from_size(40, 10));
        let errors = view.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].1.contains("feed disconnected"), "{:?}", errors[0]);
        assert!(matches!(
            view.find(&NodeId::from("c")),
            Some(RegionView::Component { .. })
        ));

        // Stays failed without re-running the component.
        let view = renderer.render(&tree, Rect::from_size(40, 10));
        assert_eq!(view.errors().len(), 1);
    }

    #[test]
    fn local_tab_selection_keeps_inactive_tabs_mounted() {
        let log = Log::default();
        let mut renderer = LayoutRenderer::new(tracked_registry(&log));
        let stack_id = NodeId::from("s");
        let tree: LayoutItem = StackLayoutItem::new(vec![
            ComponentLayoutItem::new("positions").with_id("p"),
            ComponentLayoutItem::new("orders").with_id("o"),
        ])
        .with_id("s")
        .into();

        let view = renderer.render(&tree, Rect::from_size(30, 8));
        let RegionView::Stack { tabs, body, .. } = &view else {
            panic!("expected stack");
        };
        assert_eq!(tabs.len(), 2);
        assert!(tabs[0].active);
        assert_eq!(body.area(), Rect::new(0, 1, 30, 7));

        assert!(renderer.select_tab(&stack_id, 1));
        assert!(!renderer.select_tab(&stack_id, 2));
        let view = renderer.render(&tree, Rect::from_size(30, 8));
        assert_eq!(
            view.find(&NodeId::from("o")).map(RegionView::area),
            Some(Rect::new(0, 1, 30, 7))
        );
        assert!(renderer.is_mounted(&NodeId::from("p")));
        assert!(renderer.is_mounted(&NodeId::from("o")));
        assert_eq!(count(&log, "dispose positions"), 0);

        assert!(renderer.select_tab(&stack_id, 0));
        renderer.render(&tree, Rect::from_size(30, 8));
        assert_eq!(count(&log, "create positions"), 1);
    }

    #[test]
    fn model_index_change_overrides_local_selection() {
        let log = Log::default();
        let mut renderer = LayoutRenderer::new(tracked_registry(&log));
        let stack = StackLayoutItem::new(vec![
            ComponentLayoutItem::new("positions").with_id("p"),
            ComponentLayoutItem::new("orders").with_id("o"),
            ComponentLayoutItem::new("chart").with_id("c"),
        ])
        .with_id("s");
        renderer.render(&stack.clone().into(), Rect::from_size(30, 8));
        renderer.select_tab(&NodeId::from("s"), 1);
        renderer.render(&stack.clone().with_active(2).into(), Rect::from_size(30, 8));
        assert_eq!(renderer.selected_tab(&NodeId::from("s")), Some(2));
    }

    #[test]
    fn dispose_all_runs_once_per_instance() {
        let log = Log::default();
        {
            let mut renderer = LayoutRenderer::new(tracked_registry(&log));
            let tree = LayoutItem::row(vec![
                LayoutItem::component("chart"),
                LayoutItem::component("orders"),
            ]);
            renderer.render(&tree, Rect::from_size(40, 10));
            renderer.dispose_all();
            assert_eq!(renderer.mounted_count(), 0);
        }
        assert_eq!(count(&log, "dispose chart"), 1);
        assert_eq!(count(&log, "dispose orders"), 1);
    }
}
