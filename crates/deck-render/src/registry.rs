//! Component registry and the mount surface components render into.
//!
//! The registry maps a `componentId` string to a factory. It is built once at
//! application start and handed to the renderer behind an `Rc`; there is no
//! global instance.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use deck_core::geometry::Rect;
use deck_layout::{ComponentLayoutItem, NodeId};
use serde_json::{Map, Value};
use unicode_width::UnicodeWidthChar;

/// Dedicated region a component instance renders into.
///
/// The text surface holds at most `area.height` lines, each clipped to
/// `area.width` display columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Mount {
    node_id: NodeId,
    component_id: String,
    area: Rect,
    title: String,
    state: Map<String, Value>,
    lines: Vec<String>,
}

impl Mount {
    /// Mount for a component leaf, sized to `area`.
    #[must_use]
    pub fn for_item(item: &ComponentLayoutItem, area: Rect) -> Self {
        Self {
            node_id: item.id.clone(),
            component_id: item.component_id.clone(),
            area,
            title: item.display_title().to_string(),
            state: item.component_state.clone(),
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    #[must_use]
    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    #[must_use]
    pub const fn area(&self) -> Rect {
        self.area
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Component state from the layout node.
    #[must_use]
    pub fn state(&self) -> &Map<String, Value> {
        &self.state
    }

    /// Look up a string entry of the component state.
    #[must_use]
    pub fn state_str(&self, key: &str) -> Option<&str> {
        self.state.get(key).and_then(Value::as_str)
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Append a line. Returns `false` once the region is full.
    pub fn push_line(&mut self, text: impl AsRef<str>) -> bool {
        if self.lines.len() >= usize::from(self.area.height) {
            return false;
        }
        let line = clip_to_width(text.as_ref(), usize::from(self.area.width));
        self.lines.push(line);
        true
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Refresh the node-derived fields before a render pass.
    pub(crate) fn sync(&mut self, item: &ComponentLayoutItem, area: Rect) {
        self.area = area;
        if self.title != item.display_title() {
            self.title = item.display_title().to_string();
        }
        if self.state != item.component_state {
            self.state = item.component_state.clone();
        }
        self.lines.clear();
    }
}

fn clip_to_width(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

/// A mounted widget instance.
pub trait Component {
    /// Draw into `mount`. The mount is cleared before each call.
    fn render(&mut self, mount: &mut Mount);

    /// Release resources. Called exactly once, when the owning region is torn
    /// down.
    fn dispose(&mut self) {}
}

type RenderFn = Box<dyn FnMut(&mut Mount)>;
type DisposeFn = Box<dyn FnMut()>;

/// Component built from closures.
pub struct FnComponent {
    render: RenderFn,
    on_dispose: Option<DisposeFn>,
}

impl FnComponent {
    pub fn new(render: impl FnMut(&mut Mount) + 'static) -> Self {
        Self {
            render: Box::new(render),
            on_dispose: None,
        }
    }

    #[must_use]
    pub fn on_dispose(mut self, dispose: impl FnMut() + 'static) -> Self {
        self.on_dispose = Some(Box::new(dispose));
        self
    }
}

impl Component for FnComponent {
    fn render(&mut self, mount: &mut Mount) {
        (self.render)(mount);
    }

    fn dispose(&mut self) {
        if let Some(dispose) = self.on_dispose.as_mut() {
            dispose();
        }
    }
}

impl fmt::Debug for FnComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnComponent")
            .field("has_dispose", &self.on_dispose.is_some())
            .finish()
    }
}

/// Factory producing a fresh component instance.
pub type ComponentFactory = Box<dyn Fn() -> Box<dyn Component>>;

/// Map from component id to factory.
#[derive(Default)]
pub struct ComponentRegistry {
    factories: BTreeMap<String, ComponentFactory>,
}

impl ComponentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `id`, replacing any previous registration.
    pub fn register<F>(&mut self, id: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Component> + 'static,
    {
        let id = id.into();
        if self.factories.insert(id.clone(), Box::new(factory)).is_some() {
            tracing::debug!(component_id = %id, "component registration replaced");
        }
        self
    }

    /// Register a stateless component from a render closure.
    pub fn register_fn<F>(&mut self, id: impl Into<String>, render: F) -> &mut Self
    where
        F: Fn(&mut Mount) + 'static,
    {
        let render = Rc::new(render);
        self.register(id, move || {
            let render = Rc::clone(&render);
            Box::new(FnComponent::new(move |mount: &mut Mount| render(mount))) as Box<dyn Component>
        })
    }

    #[must_use]
    pub fn has_component(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Create a new instance, or `None` if `id` is not registered.
    #[must_use]
    pub fn create_instance(&self, id: &str) -> Option<Box<dyn Component>> {
        self.factories.get(id).map(|factory| factory())
    }

    /// Registered ids in sorted order.
    pub fn component_ids(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("components", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn mount(width: u16, height: u16) -> Mount {
        let item = ComponentLayoutItem::new("quotes")
            .with_id("q")
            .with_state("symbol", "ES");
        Mount::for_item(&item, Rect::from_size(width, height))
    }

    #[test]
    fn unregistered_id_yields_none() {
        let mut registry = ComponentRegistry::new();
        registry.register_fn("chart", |m| {
            m.push_line("chart");
        });
        assert!(registry.has_component("chart"));
        assert!(!registry.has_component("depth"));
        assert!(registry.create_instance("depth").is_none());
        assert!(registry.create_instance("chart").is_some());
    }

    #[test]
    fn component_ids_are_sorted() {
        let mut registry = ComponentRegistry::new();
        registry
            .register_fn("watchlist", |_| {})
            .register_fn("chart", |_| {})
            .register_fn("news", |_| {});
        let ids: Vec<_> = registry.component_ids().collect();
        assert_eq!(ids, ["chart", "news", "watchlist"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn each_instance_is_independent() {
        let mut registry = ComponentRegistry::new();
        registry.register("counter", || {
            let mut renders = 0;
            Box::new(FnComponent::new(move |m: &mut Mount| {
                renders += 1;
                m.push_line(format!("{renders}"));
            })) as Box<dyn Component>
        });
        let mut a = registry.create_instance("counter").expect("registered");
        let mut b = registry.create_instance("counter").expect("registered");
        let mut m = mount(10, 3);
        a.render(&mut m);
        m.clear();
        a.render(&mut m);
        assert_eq!(m.lines(), ["2"]);
        m.clear();
        b.render(&mut m);
        assert_eq!(m.lines(), ["1"]);
    }

    #[test]
    fn fn_component_dispose_hook_runs() {
        let disposed = Rc::new(Cell::new(0));
        let seen = Rc::clone(&disposed);
        let mut c = FnComponent::new(|_| {}).on_dispose(move || seen.set(seen.get() + 1));
        c.dispose();
        assert_eq!(disposed.get(), 1);
    }

    #[test]
    fn mount_clips_lines_to_area() {
        let mut m = mount(4, 2);
        assert_eq!(m.state_str("symbol"), Some("ES"));
        assert!(m.push_line("abcdef"));
        assert!(m.push_line("日本語"));
        assert!(!m.push_line("overflow"));
        assert_eq!(m.lines(), ["abcd", "日本"]);
    }
}
