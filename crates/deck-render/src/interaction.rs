//! Divider drag handling.
//!
//! [`ResizeController`] hit-tests pointer presses against the divider handles
//! of the last rendered [`RegionView`], runs a [`Splitter`] for the grabbed
//! divider, and writes every size change back into the layout tree as a
//! [`LayoutOp::Resize`]. Only the two children adjacent to the divider change.

use std::fmt;
use std::rc::Rc;

use deck_core::event::PointerEvent;
use deck_core::pointer_style::PointerStyleHost;
use deck_layout::{LayoutItem, LayoutOp, NodeId, Splitter, SplitterEffect};

use crate::region::RegionView;

/// Result of feeding one pointer event to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionOutcome {
    /// The event did not concern a divider.
    Ignored,
    /// A drag is in progress; the tree already holds the new sizes.
    Resizing { container: NodeId, sizes: Vec<f64> },
    /// The drag ended; the tree holds the final sizes and should be persisted.
    Committed { container: NodeId, sizes: Vec<f64> },
}

struct ActiveResize {
    container: NodeId,
    divider: usize,
    start_sizes: Vec<f64>,
    extent: u16,
    splitter: Splitter,
}

impl ActiveResize {
    /// Full size vector with the dragged pair substituted.
    fn sizes_with(&self, pair: [f64; 2]) -> Vec<f64> {
        let mut sizes = self.start_sizes.clone();
        sizes[self.divider] = pair[0];
        sizes[self.divider + 1] = pair[1];
        sizes
    }
}

/// Drives divider drags for one rendered layout.
#[derive(Default)]
pub struct ResizeController {
    drag_threshold: u16,
    style_host: Option<Rc<dyn PointerStyleHost>>,
    active: Option<ActiveResize>,
}

impl ResizeController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_drag_threshold(mut self, threshold: u16) -> Self {
        self.drag_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_style_host(mut self, host: Rc<dyn PointerStyleHost>) -> Self {
        self.style_host = Some(host);
        self
    }

    #[must_use]
    pub fn is_resizing(&self) -> bool {
        self.active.is_some()
    }

    /// Container being resized, if a drag is in progress.
    #[must_use]
    pub fn active_container(&self) -> Option<&NodeId> {
        self.active.as_ref().map(|a| &a.container)
    }

    /// Handle `event` against `view` (the last render of `layout`).
    pub fn handle(
        &mut self,
        view: &RegionView,
        layout: &mut LayoutItem,
        event: &PointerEvent,
    ) -> InteractionOutcome {
        match self.active.as_mut() {
            None => {
                if let PointerEvent::Down { .. } = event {
                    self.begin(view, event)
                } else {
                    InteractionOutcome::Ignored
                }
            }
            Some(active) => {
                let effect = active.splitter.handle(event, active.extent);
                match effect {
                    SplitterEffect::Resized { sizes } => {
                        let sizes = active.sizes_with(sizes);
                        let container = active.container.clone();
                        if write_sizes(layout, &container, &sizes) {
                            InteractionOutcome::Resizing { container, sizes }
                        } else {
                            self.active = None;
                            InteractionOutcome::Ignored
                        }
                    }
                    SplitterEffect::Ended { sizes } => {
                        let sizes = active.sizes_with(sizes);
                        let container = active.container.clone();
                        self.active = None;
                        if write_sizes(layout, &container, &sizes) {
                            tracing::debug!(
                                container = %container,
                                ?sizes,
                                "divider drag committed"
                            );
                            InteractionOutcome::Committed { container, sizes }
                        } else {
                            InteractionOutcome::Ignored
                        }
                    }
                    SplitterEffect::Started { .. } | SplitterEffect::Noop { .. } => {
                        InteractionOutcome::Ignored
                    }
                }
            }
        }
    }

    fn begin(&mut self, view: &RegionView, event: &PointerEvent) -> InteractionOutcome {
        let Some(position) = event.position() else {
            return InteractionOutcome::Ignored;
        };
        let (Ok(x), Ok(y)) = (u16::try_from(position.x), u16::try_from(position.y)) else {
            return InteractionOutcome::Ignored;
        };
        let Some(handle) = view.divider_at(x, y) else {
            return InteractionOutcome::Ignored;
        };
        let Some(RegionView::Split {
            area,
            axis,
            sizes,
            min_sizes,
            ..
        }) = view.find(&handle.container)
        else {
            return InteractionOutcome::Ignored;
        };
        let i = handle.index;
        if i + 1 >= sizes.len() || min_sizes.len() != sizes.len() {
            return InteractionOutcome::Ignored;
        }

        let mut splitter = Splitter::new(
            *axis,
            [sizes[i], sizes[i + 1]],
            [min_sizes[i], min_sizes[i + 1]],
        )
        .with_drag_threshold(self.drag_threshold);
        if let Some(host) = &self.style_host {
            splitter = splitter.with_style_host(Rc::clone(host));
        }
        let extent = area.extent(*axis);
        match splitter.handle(event, extent) {
            SplitterEffect::Started { start_sizes } => {
                self.active = Some(ActiveResize {
                    container: handle.container.clone(),
                    divider: i,
                    start_sizes: sizes.clone(),
                    extent,
                    splitter,
                });
                InteractionOutcome::Resizing {
                    container: handle.container.clone(),
                    sizes: {
                        let mut full = sizes.clone();
                        full[i] = start_sizes[0];
                        full[i + 1] = start_sizes[1];
                        full
                    },
                }
            }
            _ => InteractionOutcome::Ignored,
        }
    }
}

fn write_sizes(layout: &mut LayoutItem, container: &NodeId, sizes: &[f64]) -> bool {
    let op = LayoutOp::Resize {
        container: container.clone(),
        sizes: sizes.to_vec(),
    };
    match op.apply_to(layout) {
        Ok(()) => true,
        Err(error) => {
            tracing::warn!(container = %container, %error, "divider drag could not be applied");
            false
        }
    }
}

impl fmt::Debug for ResizeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeController")
            .field("drag_threshold", &self.drag_threshold)
            .field("active_container", &self.active_container())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ComponentRegistry;
    use crate::renderer::LayoutRenderer;
    use deck_core::event::PointerPosition;
    use deck_core::geometry::{Rect, SplitAxis};
    use deck_core::pointer_style::{CursorIcon, PointerStyle, SharedPointerStyle};
    use deck_layout::{ComponentLayoutItem, ContainerLayoutItem};

    fn at(x: i32, y: i32) -> PointerPosition {
        PointerPosition::new(x, y)
    }

    fn three_columns() -> LayoutItem {
        ContainerLayoutItem::new(
            SplitAxis::Horizontal,
            vec![
                ComponentLayoutItem::new("a").with_id("a").into(),
                ComponentLayoutItem::new("b").with_id("b").into(),
                ComponentLayoutItem::new("c").with_id("c").with_min_size(25.0).into(),
            ],
        )
        .with_sizes(vec![20.0, 50.0, 30.0])
        .with_id("root")
        .into()
    }

    fn render(layout: &LayoutItem) -> RegionView {
        let mut registry = ComponentRegistry::new();
        for id in ["a", "b", "c"] {
            registry.register_fn(id, |_| {});
        }
        LayoutRenderer::new(Rc::new(registry)).render(layout, Rect::from_size(100, 10))
    }

    fn sizes_of(layout: &LayoutItem) -> Vec<f64> {
        match layout {
            LayoutItem::Container(c) => c.sizes.clone(),
            other => panic!("expected container, got {other:?}"),
        }
    }

    #[test]
    fn drag_on_second_divider_moves_only_adjacent_children() {
        let mut layout = three_columns();
        let view = render(&layout);
        let mut controller = ResizeController::new();

        // Boundary between b and c sits at x = 70; the handle is x = 69.
        let outcome = controller.handle(
            &view,
            &mut layout,
            &PointerEvent::Down {
                pointer_id: 1,
                position: at(69, 3),
            },
        );
        assert!(matches!(outcome, InteractionOutcome::Resizing { .. }));
        assert!(controller.is_resizing());

        let outcome = controller.handle(
            &view,
            &mut layout,
            &PointerEvent::Move {
                pointer_id: 1,
                position: at(79, 3),
            },
        );
        let InteractionOutcome::Resizing { sizes, .. } = outcome else {
            panic!("expected resizing");
        };
        assert!((sizes[1] - 55.0).abs() < 1e-9);
        assert!((sizes[2] - 25.0).abs() < 1e-9);
        assert_eq!(sizes_of(&layout), sizes);

        let outcome = controller.handle(
            &view,
            &mut layout,
            &PointerEvent::Up {
                pointer_id: 1,
                position: at(60, 3),
            },
        );
        let InteractionOutcome::Committed { container, sizes } = outcome else {
            panic!("expected commit");
        };
        assert_eq!(container.as_str(), "root");
        assert_eq!(sizes[0], 20.0);
        assert!((sizes[1] - 41.0).abs() < 1e-9);
        assert!((sizes[2] - 39.0).abs() < 1e-9);
        assert!(!controller.is_resizing());
        layout.validate().expect("valid after drag");
    }

    #[test]
    fn presses_off_dividers_are_ignored() {
        let mut layout = three_columns();
        let view = render(&layout);
        let mut controller = ResizeController::new();
        for position in [at(5, 5), at(-3, 5), at(69, 40)] {
            let outcome = controller.handle(
                &view,
                &mut layout,
                &PointerEvent::Down {
                    pointer_id: 1,
                    position,
                },
            );
            assert_eq!(outcome, InteractionOutcome::Ignored);
        }
        assert_eq!(sizes_of(&layout), vec![20.0, 50.0, 30.0]);
    }

    #[test]
    fn capture_loss_commits_and_restores_cursor() {
        let host = SharedPointerStyle::new();
        let mut layout = three_columns();
        let view = render(&layout);
        let mut controller = ResizeController::new().with_style_host(Rc::new(host.clone()));

        controller.handle(
            &view,
            &mut layout,
            &PointerEvent::Down {
                pointer_id: 4,
                position: at(19, 0),
            },
        );
        assert_eq!(host.get().cursor, CursorIcon::ColResize);
        controller.handle(
            &view,
            &mut layout,
            &PointerEvent::Move {
                pointer_id: 4,
                position: at(-50, 0),
            },
        );
        let outcome = controller.handle(&view, &mut layout, &PointerEvent::CaptureLost);
        assert!(matches!(outcome, InteractionOutcome::Committed { .. }));
        assert_eq!(host.get(), PointerStyle::default());
        let sizes = sizes_of(&layout);
        assert!((sizes[0] - 10.0).abs() < 1e-9, "{sizes:?}");
        assert!((sizes[1] - 60.0).abs() < 1e-9, "{sizes:?}");
    }
}
