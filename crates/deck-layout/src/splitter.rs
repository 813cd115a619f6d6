//! Two-pane drag-resize primitive.
//!
//! A [`Splitter`] owns the sizes of two adjacent panes (as percentages) and
//! a small lifecycle machine:
//!
//! ```text
//! Idle --down--> Dragging --move--> Dragging --up / capture lost--> Idle
//! ```
//!
//! On pointer-down the splitter captures the pointer coordinate along its
//! axis and the starting size pair. Each move converts the pointer delta to
//! a percentage of the container extent, applies it to the starting pair and
//! clamps against the per-pane minimums via [`resize_pair`]. No snapping.
//!
//! While dragging, the splitter holds a [`PointerStyleOverride`] so the host
//! shows a resize cursor and suppresses text selection. The guard is dropped
//! when the drag ends by any route, including the splitter itself being
//! dropped mid-drag.

use std::fmt;
use std::rc::Rc;

use deck_core::event::PointerEvent;
use deck_core::geometry::SplitAxis;
use deck_core::pointer_style::{PointerStyle, PointerStyleHost, PointerStyleOverride};

/// Shrink minimums that cannot both be honoured within `total`.
///
/// When `mins[0] + mins[1]` exceeds the pair total, both are scaled down
/// proportionally so they sum to exactly `total`. Negative or non-finite
/// minimums count as zero.
#[must_use]
pub fn resolve_minimums(mins: [f64; 2], total: f64) -> [f64; 2] {
    let clean = |m: f64| if m.is_finite() && m > 0.0 { m } else { 0.0 };
    let mins = [clean(mins[0]), clean(mins[1])];
    let sum = mins[0] + mins[1];
    if sum <= total || sum <= 0.0 {
        return mins;
    }
    let scale = total.max(0.0) / sum;
    tracing::debug!(
        first = mins[0],
        second = mins[1],
        total,
        "pane minimums exceed available share, shrinking proportionally"
    );
    [mins[0] * scale, mins[1] * scale]
}

/// Apply `delta` (percentage points) to the first pane of `start`, moving
/// the same amount out of the second pane, then clamp.
///
/// If the first pane would fall below its minimum it is pinned there and the
/// remainder goes to the second pane; symmetrically for the second pane. The
/// pair total is preserved.
#[must_use]
pub fn resize_pair(start: [f64; 2], delta: f64, mins: [f64; 2]) -> [f64; 2] {
    if !delta.is_finite() {
        return start;
    }
    let total = start[0] + start[1];
    let mins = resolve_minimums(mins, total);
    let mut first = start[0] + delta;
    let mut second = total - first;
    if first < mins[0] {
        first = mins[0];
        second = total - first;
    } else if second < mins[1] {
        second = mins[1];
        first = total - second;
    }
    [first, second]
}

/// Resize the two children around `divider` (between child `divider` and
/// `divider + 1`) of an n-ary split.
///
/// `sizes` is overwritten with `start` adjusted at the pair. Returns `false`
/// without touching `sizes` when the divider or slice lengths don't line up.
pub fn resize_adjacent(
    sizes: &mut [f64],
    divider: usize,
    start: &[f64],
    delta: f64,
    mins: &[f64],
) -> bool {
    let next = divider + 1;
    if next >= start.len() || sizes.len() != start.len() || mins.len() != start.len() {
        return false;
    }
    let pair = resize_pair(
        [start[divider], start[next]],
        delta,
        [mins[divider], mins[next]],
    );
    sizes.copy_from_slice(start);
    sizes[divider] = pair[0];
    sizes[next] = pair[1];
    true
}

/// Splitter lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitterState {
    Idle,
    Dragging {
        pointer_id: u32,
        /// Pointer coordinate along the axis at pointer-down.
        origin: i32,
        /// Latest pointer coordinate along the axis.
        current: i32,
        /// Sizes captured at pointer-down.
        start_sizes: [f64; 2],
        /// Container extent along the axis, captured at pointer-down.
        extent: u16,
        /// Whether the pointer has travelled past the drag threshold.
        moved: bool,
    },
}

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitterNoopReason {
    NotDragging,
    AlreadyDragging,
    PointerMismatch,
    ZeroExtent,
    ThresholdNotReached,
}

/// Outcome of feeding one event to a [`Splitter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitterEffect {
    Started { start_sizes: [f64; 2] },
    Resized { sizes: [f64; 2] },
    Ended { sizes: [f64; 2] },
    Noop { reason: SplitterNoopReason },
}

/// Drag-resize state machine for one divider.
pub struct Splitter {
    axis: SplitAxis,
    sizes: [f64; 2],
    min_sizes: [f64; 2],
    drag_threshold: u16,
    state: SplitterState,
    style_host: Option<Rc<dyn PointerStyleHost>>,
    style_guard: Option<PointerStyleOverride>,
}

impl Splitter {
    /// Create an idle splitter.
    ///
    /// `min_sizes` are resolved against the pair total up front, so a
    /// configuration whose minimums cannot both fit is shrunk rather than
    /// left to misbehave mid-drag.
    #[must_use]
    pub fn new(axis: SplitAxis, sizes: [f64; 2], min_sizes: [f64; 2]) -> Self {
        let min_sizes = resolve_minimums(min_sizes, sizes[0] + sizes[1]);
        Self {
            axis,
            sizes,
            min_sizes,
            drag_threshold: 0,
            state: SplitterState::Idle,
            style_host: None,
            style_guard: None,
        }
    }

    /// Host whose pointer style is overridden while dragging.
    #[must_use]
    pub fn with_style_host(mut self, host: Rc<dyn PointerStyleHost>) -> Self {
        self.style_host = Some(host);
        self
    }

    /// Minimum pointer travel (in host units) before sizes start to change.
    #[must_use]
    pub fn with_drag_threshold(mut self, threshold: u16) -> Self {
        self.drag_threshold = threshold;
        self
    }

    #[must_use]
    pub const fn axis(&self) -> SplitAxis {
        self.axis
    }

    #[must_use]
    pub const fn sizes(&self) -> [f64; 2] {
        self.sizes
    }

    #[must_use]
    pub const fn min_sizes(&self) -> [f64; 2] {
        self.min_sizes
    }

    #[must_use]
    pub const fn state(&self) -> SplitterState {
        self.state
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, SplitterState::Dragging { .. })
    }

    /// Feed one pointer event.
    ///
    /// `extent` is the container's size along the split axis; it is only
    /// read on pointer-down; later events reuse the captured value.
    pub fn handle(&mut self, event: &PointerEvent, extent: u16) -> SplitterEffect {
        match (self.state, *event) {
            (SplitterState::Idle, PointerEvent::Down { pointer_id, position }) => {
                if extent == 0 {
                    return noop(SplitterNoopReason::ZeroExtent);
                }
                let origin = position.along(self.axis);
                self.state = SplitterState::Dragging {
                    pointer_id,
                    origin,
                    current: origin,
                    start_sizes: self.sizes,
                    extent,
                    moved: self.drag_threshold == 0,
                };
                self.style_guard = self.style_host.as_ref().map(|host| {
                    PointerStyleOverride::apply(Rc::clone(host), PointerStyle::dragging(self.axis))
                });
                SplitterEffect::Started {
                    start_sizes: self.sizes,
                }
            }
            (SplitterState::Idle, _) => noop(SplitterNoopReason::NotDragging),
            (SplitterState::Dragging { .. }, PointerEvent::Down { .. }) => {
                noop(SplitterNoopReason::AlreadyDragging)
            }
            (SplitterState::Dragging { .. }, PointerEvent::CaptureLost) => self.finish(),
            (
                SplitterState::Dragging {
                    pointer_id: active, ..
                },
                PointerEvent::Move {
                    pointer_id,
                    position,
                },
            ) => {
                if pointer_id != active {
                    return noop(SplitterNoopReason::PointerMismatch);
                }
                if self.track(position.along(self.axis)) {
                    SplitterEffect::Resized { sizes: self.sizes }
                } else {
                    noop(SplitterNoopReason::ThresholdNotReached)
                }
            }
            (
                SplitterState::Dragging {
                    pointer_id: active, ..
                },
                PointerEvent::Up {
                    pointer_id,
                    position,
                },
            ) => {
                if pointer_id != active {
                    return noop(SplitterNoopReason::PointerMismatch);
                }
                self.track(position.along(self.axis));
                self.finish()
            }
        }
    }

    /// Record a new pointer coordinate and recompute sizes.
    ///
    /// Returns whether the sizes were (re)computed.
    fn track(&mut self, coordinate: i32) -> bool {
        let threshold = u32::from(self.drag_threshold);
        let SplitterState::Dragging {
            origin,
            current,
            start_sizes,
            extent,
            moved,
            ..
        } = &mut self.state
        else {
            return false;
        };
        *current = coordinate;
        let travel = coordinate.saturating_sub(*origin);
        *moved = *moved || travel.unsigned_abs() >= threshold;
        if !*moved {
            return false;
        }
        let delta = f64::from(travel) / f64::from(*extent) * 100.0;
        let start = *start_sizes;
        self.sizes = resize_pair(start, delta, self.min_sizes);
        true
    }

    fn finish(&mut self) -> SplitterEffect {
        self.state = SplitterState::Idle;
        self.style_guard = None;
        SplitterEffect::Ended { sizes: self.sizes }
    }
}

fn noop(reason: SplitterNoopReason) -> SplitterEffect {
    SplitterEffect::Noop { reason }
}

impl fmt::Debug for Splitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Splitter")
            .field("axis", &self.axis)
            .field("sizes", &self.sizes)
            .field("min_sizes", &self.min_sizes)
            .field("drag_threshold", &self.drag_threshold)
            .field("state", &self.state)
            .field("style_override", &self.style_guard.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::event::PointerPosition;
    use deck_core::pointer_style::{CursorIcon, SharedPointerStyle};
    use proptest::prelude::*;

    fn down(x: i32) -> PointerEvent {
        PointerEvent::Down {
            pointer_id: 1,
            position: PointerPosition::new(x, 0),
        }
    }

    fn moved(x: i32) -> PointerEvent {
        PointerEvent::Move {
            pointer_id: 1,
            position: PointerPosition::new(x, 0),
        }
    }

    fn up(x: i32) -> PointerEvent {
        PointerEvent::Up {
            pointer_id: 1,
            position: PointerPosition::new(x, 0),
        }
    }

    fn approx(a: [f64; 2], b: [f64; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-9 && (a[1] - b[1]).abs() < 1e-9
    }

    #[test]
    fn first_pane_is_pinned_to_its_minimum() {
        // 70/30 with minimums 20/10; a -55 point drag would leave 15%.
        let sizes = resize_pair([70.0, 30.0], -55.0, [20.0, 10.0]);
        assert!(approx(sizes, [20.0, 80.0]), "{sizes:?}");
    }

    #[test]
    fn second_pane_is_pinned_to_its_minimum() {
        let sizes = resize_pair([70.0, 30.0], 25.0, [20.0, 10.0]);
        assert!(approx(sizes, [90.0, 10.0]), "{sizes:?}");
    }

    #[test]
    fn oversized_minimums_shrink_proportionally() {
        assert_eq!(resolve_minimums([60.0, 60.0], 100.0), [50.0, 50.0]);
        assert_eq!(resolve_minimums([30.0, 10.0], 100.0), [30.0, 10.0]);
        assert_eq!(resolve_minimums([-5.0, f64::NAN], 100.0), [0.0, 0.0]);
        let sizes = resize_pair([50.0, 50.0], 20.0, [75.0, 25.0]);
        assert!(approx(sizes, [75.0, 25.0]), "{sizes:?}");
    }

    #[test]
    fn adjacent_resize_touches_only_the_pair() {
        let start = [20.0, 50.0, 30.0];
        let mut sizes = [0.0; 3];
        assert!(resize_adjacent(&mut sizes, 1, &start, 10.0, &[10.0; 3]));
        assert!((sizes[0] - 20.0).abs() < 1e-9);
        assert!((sizes[1] - 60.0).abs() < 1e-9);
        assert!((sizes[2] - 20.0).abs() < 1e-9);
        assert!(!resize_adjacent(&mut sizes, 2, &start, 10.0, &[10.0; 3]));
    }

    #[test]
    fn drag_scenario_clamps_and_reports() {
        let mut splitter = Splitter::new(SplitAxis::Horizontal, [70.0, 30.0], [20.0, 10.0]);
        assert_eq!(
            splitter.handle(&down(700), 1000),
            SplitterEffect::Started {
                start_sizes: [70.0, 30.0]
            }
        );
        // -550 px of 1000 px = -55 points.
        let SplitterEffect::Resized { sizes } = splitter.handle(&moved(150), 1000) else {
            panic!("expected resize");
        };
        assert!(approx(sizes, [20.0, 80.0]), "{sizes:?}");
        let SplitterEffect::Ended { sizes } = splitter.handle(&up(150), 1000) else {
            panic!("expected end");
        };
        assert!(approx(sizes, [20.0, 80.0]));
        assert_eq!(splitter.state(), SplitterState::Idle);
    }

    #[test]
    fn moves_are_relative_to_drag_start() {
        let mut splitter = Splitter::new(SplitAxis::Vertical, [50.0, 50.0], [10.0, 10.0]);
        let at = |y| PointerEvent::Move {
            pointer_id: 1,
            position: PointerPosition::new(0, y),
        };
        splitter.handle(
            &PointerEvent::Down {
                pointer_id: 1,
                position: PointerPosition::new(0, 100),
            },
            200,
        );
        splitter.handle(&at(120), 200);
        let SplitterEffect::Resized { sizes } = splitter.handle(&at(110), 200) else {
            panic!("expected resize");
        };
        assert!(approx(sizes, [55.0, 45.0]), "{sizes:?}");
    }

    #[test]
    fn events_while_idle_or_from_other_pointers_are_ignored() {
        let mut splitter = Splitter::new(SplitAxis::Horizontal, [50.0, 50.0], [10.0, 10.0]);
        assert_eq!(
            splitter.handle(&moved(10), 100),
            SplitterEffect::Noop {
                reason: SplitterNoopReason::NotDragging
            }
        );
        assert_eq!(
            splitter.handle(&down(10), 0),
            SplitterEffect::Noop {
                reason: SplitterNoopReason::ZeroExtent
            }
        );
        splitter.handle(&down(50), 100);
        let other = PointerEvent::Move {
            pointer_id: 9,
            position: PointerPosition::new(90, 0),
        };
        assert_eq!(
            splitter.handle(&other, 100),
            SplitterEffect::Noop {
                reason: SplitterNoopReason::PointerMismatch
            }
        );
        assert_eq!(
            splitter.handle(&down(50), 100),
            SplitterEffect::Noop {
                reason: SplitterNoopReason::AlreadyDragging
            }
        );
        assert_eq!(splitter.sizes(), [50.0, 50.0]);
    }

    #[test]
    fn threshold_delays_resizing() {
        let mut splitter =
            Splitter::new(SplitAxis::Horizontal, [50.0, 50.0], [10.0, 10.0]).with_drag_threshold(3);
        splitter.handle(&down(50), 100);
        assert_eq!(
            splitter.handle(&moved(52), 100),
            SplitterEffect::Noop {
                reason: SplitterNoopReason::ThresholdNotReached
            }
        );
        let SplitterEffect::Resized { sizes } = splitter.handle(&moved(60), 100) else {
            panic!("expected resize after threshold");
        };
        assert!(approx(sizes, [60.0, 40.0]));
        // Once crossed, coming back near the origin still tracks.
        let SplitterEffect::Resized { sizes } = splitter.handle(&moved(51), 100) else {
            panic!("expected resize");
        };
        assert!(approx(sizes, [51.0, 49.0]));
    }

    #[test]
    fn pointer_style_is_restored_on_release_and_capture_loss() {
        let host = SharedPointerStyle::new();
        let mut splitter = Splitter::new(SplitAxis::Horizontal, [50.0, 50.0], [10.0, 10.0])
            .with_style_host(Rc::new(host.clone()));

        splitter.handle(&down(50), 100);
        assert_eq!(host.get().cursor, CursorIcon::ColResize);
        assert!(!host.get().text_selection);
        splitter.handle(&up(40), 100);
        assert_eq!(host.get(), PointerStyle::default());

        splitter.handle(&down(50), 100);
        splitter.handle(&moved(-400), 100);
        assert!(matches!(
            splitter.handle(&PointerEvent::CaptureLost, 100),
            SplitterEffect::Ended { .. }
        ));
        assert_eq!(host.get(), PointerStyle::default());
        assert!(approx(splitter.sizes(), [10.0, 90.0]));
    }

    #[test]
    fn dropping_mid_drag_restores_pointer_style() {
        let host = SharedPointerStyle::new();
        {
            let mut splitter = Splitter::new(SplitAxis::Vertical, [50.0, 50.0], [10.0, 10.0])
                .with_style_host(Rc::new(host.clone()));
            splitter.handle(&down(0), 100);
            assert_eq!(host.get().cursor, CursorIcon::RowResize);
        }
        assert_eq!(host.get(), PointerStyle::default());
    }

    proptest! {
        #[test]
        fn drag_sequences_preserve_total_and_minimums(
            first in 0.0f64..=100.0,
            min_a in 0.0f64..60.0,
            min_b in 0.0f64..60.0,
            extent in 1u16..2000,
            moves in proptest::collection::vec(-3000i32..3000, 1..20),
        ) {
            let start = [first, 100.0 - first];
            let mut splitter = Splitter::new(SplitAxis::Horizontal, start, [min_a, min_b]);
            let mins = splitter.min_sizes();
            splitter.handle(&down(0), extent);
            for x in moves {
                splitter.handle(&moved(x), extent);
                let sizes = splitter.sizes();
                prop_assert!((sizes[0] + sizes[1] - 100.0).abs() < 1e-9);
                prop_assert!(sizes[0] >= mins[0] - 1e-9);
                prop_assert!(sizes[1] >= mins[1] - 1e-9);
            }
            splitter.handle(&up(0), extent);
            prop_assert!(!splitter.is_dragging());
        }
    }
}
