//! Workspace templates.
//!
//! A template is a named blueprint. Its factory builds a tree whose node ids
//! are fixed and human-readable; instantiation always replaces every id, so
//! two workspaces created from the same template never share a node id.

use std::fmt;

use deck_layout::{
    ComponentLayoutItem, ContainerLayoutItem, LayoutItem, SplitAxis, StackLayoutItem,
};

/// Named blueprint for a new workspace.
#[derive(Clone)]
pub struct WorkspaceTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub root_factory: fn() -> LayoutItem,
}

impl WorkspaceTemplate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        root_factory: fn() -> LayoutItem,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: "custom".to_string(),
            tags: Vec::new(),
            root_factory,
        }
    }

    #[must_use]
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn tagged<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Build the tree with fresh node ids and normalized sizes.
    #[must_use]
    pub fn instantiate(&self) -> LayoutItem {
        let mut root = (self.root_factory)().with_fresh_ids();
        root.normalize_sizes();
        root
    }
}

impl fmt::Debug for WorkspaceTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceTemplate")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("category", &self.category)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

/// Ordered set of templates, unique by id.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: Vec<WorkspaceTemplate>,
}

impl TemplateCatalog {
    /// Catalog without any templates.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in trading desk templates.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        catalog
            .register(
                WorkspaceTemplate::new("trading", "Trading Desk", trading_root)
                    .described(
                        "Chart and order book over the blotter, \
                         with order entry and a watchlist on the side",
                    )
                    .in_category("trading")
                    .tagged(["orders", "positions", "chart"]),
            )
            .register(
                WorkspaceTemplate::new("charting", "Multi-Chart", charting_root)
                    .described("Four charts in a two by two grid")
                    .in_category("analysis")
                    .tagged(["chart", "technical"]),
            )
            .register(
                WorkspaceTemplate::new("market-watch", "Market Watch", market_watch_root)
                    .described("Watchlist and heatmap with news and economic calendar tabs")
                    .in_category("monitoring")
                    .tagged(["watchlist", "news"]),
            )
            .register(
                WorkspaceTemplate::new("blank", "Blank", LayoutItem::empty)
                    .described("Empty workspace")
                    .in_category("general"),
            );
        catalog
    }

    /// Add `template`, replacing one with the same id in place.
    pub fn register(&mut self, template: WorkspaceTemplate) -> &mut Self {
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(slot) => *slot = template,
            None => self.templates.push(template),
        }
        self
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&WorkspaceTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    #[must_use]
    pub fn templates(&self) -> &[WorkspaceTemplate] {
        &self.templates
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn panel(id: &str, component_id: &str, title: &str) -> ComponentLayoutItem {
    ComponentLayoutItem::new(component_id).with_id(id).titled(title)
}

fn trading_root() -> LayoutItem {
    let market = ContainerLayoutItem::new(
        SplitAxis::Horizontal,
        vec![
            panel("trading.chart", "price-chart", "Chart")
                .with_state("symbol", "ES")
                .with_state("interval", "5m")
                .into(),
            panel("trading.book", "order-book", "Order Book")
                .with_min_size(15.0)
                .into(),
        ],
    )
    .with_id("trading.market")
    .with_sizes(vec![70.0, 30.0]);

    let blotter = StackLayoutItem::new(vec![
        panel("trading.positions", "positions", "Positions"),
        panel("trading.orders", "orders", "Orders"),
        panel("trading.fills", "fills", "Fills"),
    ])
    .with_id("trading.blotter");

    let main = ContainerLayoutItem::new(SplitAxis::Vertical, vec![market.into(), blotter.into()])
        .with_id("trading.main")
        .with_sizes(vec![65.0, 35.0]);

    let side = ContainerLayoutItem::new(
        SplitAxis::Vertical,
        vec![
            panel("trading.ticket", "order-entry", "Order Entry")
                .with_min_size(25.0)
                .into(),
            panel("trading.watchlist", "watchlist", "Watchlist").into(),
        ],
    )
    .with_id("trading.side")
    .with_sizes(vec![45.0, 55.0])
    .with_min_size(20.0);

    ContainerLayoutItem::new(SplitAxis::Horizontal, vec![main.into(), side.into()])
        .with_id("trading.root")
        .with_sizes(vec![75.0, 25.0])
        .into()
}

fn charting_root() -> LayoutItem {
    let chart = |n: u8, symbol: &str| -> LayoutItem {
        panel(&format!("charting.chart{n}"), "price-chart", &format!("Chart {n}"))
            .with_state("symbol", symbol)
            .into()
    };
    let row = |id: &str, left: LayoutItem, right: LayoutItem| -> LayoutItem {
        ContainerLayoutItem::new(SplitAxis::Horizontal, vec![left, right])
            .with_id(id)
            .into()
    };
    ContainerLayoutItem::new(
        SplitAxis::Vertical,
        vec![
            row("charting.top", chart(1, "ES"), chart(2, "NQ")),
            row("charting.bottom", chart(3, "CL"), chart(4, "GC")),
        ],
    )
    .with_id("charting.root")
    .into()
}

fn market_watch_root() -> LayoutItem {
    let feeds = StackLayoutItem::new(vec![
        panel("market-watch.news", "news", "News"),
        panel("market-watch.calendar", "economic-calendar", "Calendar"),
    ])
    .with_id("market-watch.feeds")
    .titled("Feeds");

    let left = ContainerLayoutItem::new(
        SplitAxis::Vertical,
        vec![
            panel("market-watch.watchlist", "watchlist", "Watchlist").into(),
            panel("market-watch.heatmap", "heatmap", "Heatmap").into(),
        ],
    )
    .with_id("market-watch.left")
    .with_sizes(vec![60.0, 40.0]);

    ContainerLayoutItem::new(SplitAxis::Horizontal, vec![left.into(), feeds.into()])
        .with_id("market-watch.root")
        .with_sizes(vec![60.0, 40.0])
        .into()
}
