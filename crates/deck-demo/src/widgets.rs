//! Placeholder trading widgets registered by the demo.
//!
//! Each widget writes a few lines describing itself; the order book keeps a
//! render counter so remounts are visible in the output.

use deck::{Component, ComponentRegistry, Mount};

/// Order book ladder with synthetic levels.
#[derive(Debug, Default)]
struct OrderBook {
    renders: u32,
}

impl Component for OrderBook {
    fn render(&mut self, mount: &mut Mount) {
        self.renders += 1;
        mount.push_line(format!("{} (render #{})", mount.title(), self.renders));
        let depth = usize::from(mount.area().height.saturating_sub(1)) / 2;
        for level in (1..=depth.min(5)).rev() {
            let price = 100.0 + level as f64 * 0.25;
            mount.push_line(format!("  ask {price:>8.2}  x{}", level * 3));
        }
        for level in 1..=depth.min(5) {
            let price = 100.0 - level as f64 * 0.25;
            mount.push_line(format!("  bid {price:>8.2}  x{}", level * 2));
        }
    }

    fn dispose(&mut self) {
        tracing::debug!(renders = self.renders, "order book unmounted");
    }
}

/// Registry with every component id the built-in templates reference.
pub fn registry() -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();
    registry
        .register("order-book", || {
            Box::new(OrderBook::default()) as Box<dyn Component>
        })
        .register_fn("price-chart", |mount| {
            let symbol = mount.state_str("symbol").unwrap_or("?").to_string();
            let interval = mount.state_str("interval").unwrap_or("1m").to_string();
            let area = mount.area();
            mount.push_line(format!(
                "{symbol} {interval} chart, {}x{} cells",
                area.width, area.height
            ));
        })
        .register_fn("positions", |mount| {
            mount.push_line("ES  +3  @ 5012.25");
            mount.push_line("NQ  -1  @ 17880.50");
        })
        .register_fn("orders", |mount| {
            mount.push_line("BUY 2 ES LMT 5005.00 working");
        })
        .register_fn("fills", |mount| {
            mount.push_line("no fills today");
        })
        .register_fn("order-entry", |mount| {
            mount.push_line("[ BUY ]  [ SELL ]  qty 1");
        })
        .register_fn("watchlist", |mount| {
            for symbol in ["ES", "NQ", "CL", "GC", "ZN"] {
                if !mount.push_line(format!("{symbol:<4} --")) {
                    break;
                }
            }
        })
        .register_fn("news", |mount| {
            mount.push_line("08:30 CPI m/m 0.3% vs 0.2% exp");
        })
        .register_fn("economic-calendar", |mount| {
            mount.push_line("10:00 ISM services");
        })
        .register_fn("heatmap", |mount| {
            mount.push_line("sector heatmap");
        });
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck::TemplateCatalog;

    #[test]
    fn covers_every_builtin_template_component() {
        let registry = registry();
        for template in TemplateCatalog::builtin().templates() {
            let root = template.instantiate();
            for id in root.node_ids() {
                if let Some(component) = root.find_component(&id) {
                    assert!(
                        registry.has_component(&component.component_id),
                        "{} missing from demo registry",
                        component.component_id
                    );
                }
            }
        }
    }
}
