//! Percentage-to-cell solving.
//!
//! Layout sizes are percentages; rendering happens on an integer grid. The
//! conversion uses largest-remainder rounding so the children always cover
//! the parent exactly, with no gaps or overlap.

use deck_core::geometry::{Rect, SplitAxis};

/// Distribute `extent` cells across `sizes` proportionally.
///
/// The result has one entry per size and sums to `extent`. Sizes that are
/// negative or non-finite count as zero; if nothing positive remains, cells
/// are shared equally. Leftover cells go to the largest fractional parts,
/// earlier children winning ties.
#[must_use]
pub fn distribute(extent: u16, sizes: &[f64]) -> Vec<u16> {
    if sizes.is_empty() {
        return Vec::new();
    }
    let weights: Vec<f64> = sizes
        .iter()
        .map(|&s| if s.is_finite() && s > 0.0 { s } else { 0.0 })
        .collect();
    let total: f64 = weights.iter().sum();
    let weights = if total > 0.0 {
        weights
    } else {
        vec![1.0; sizes.len()]
    };
    let total: f64 = weights.iter().sum();

    let mut cells = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());
    let mut assigned: u32 = 0;
    for (index, weight) in weights.iter().enumerate() {
        let exact = f64::from(extent) * weight / total;
        let floor = exact.floor();
        // `exact <= extent`, so the cast cannot truncate.
        let whole = floor as u16;
        cells.push(whole);
        remainders.push((index, exact - floor));
        assigned += u32::from(whole);
    }

    let mut leftover = u32::from(extent).saturating_sub(assigned);
    remainders.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    for (index, _) in remainders.iter().cycle() {
        if leftover == 0 {
            break;
        }
        cells[*index] += 1;
        leftover -= 1;
    }
    cells
}

/// Slice `area` into one rect per size along `axis`.
#[must_use]
pub fn split_rect(area: Rect, axis: SplitAxis, sizes: &[f64]) -> Vec<Rect> {
    let mut offset = 0u16;
    distribute(area.extent(axis), sizes)
        .into_iter()
        .map(|len| {
            let rect = area.slice(axis, offset, len);
            offset = offset.saturating_add(len);
            rect
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn thirds_round_toward_earlier_children() {
        assert_eq!(distribute(10, &[33.33, 33.33, 33.34]), vec![3, 3, 4]);
        assert_eq!(distribute(100, &[25.0, 75.0]), vec![25, 75]);
        assert_eq!(distribute(0, &[50.0, 50.0]), vec![0, 0]);
        assert!(distribute(10, &[]).is_empty());
    }

    #[test]
    fn degenerate_weights_fall_back_to_equal_shares() {
        assert_eq!(distribute(9, &[0.0, f64::NAN, -3.0]), vec![3, 3, 3]);
    }

    #[test]
    fn split_rect_tiles_horizontally() {
        let area = Rect::new(5, 2, 80, 24);
        let rects = split_rect(area, SplitAxis::Horizontal, &[25.0, 75.0]);
        assert_eq!(rects, vec![Rect::new(5, 2, 20, 24), Rect::new(25, 2, 60, 24)]);
    }

    #[test]
    fn split_rect_tiles_vertically() {
        let area = Rect::new(0, 0, 40, 10);
        let rects = split_rect(area, SplitAxis::Vertical, &[70.0, 30.0]);
        assert_eq!(rects, vec![Rect::new(0, 0, 40, 7), Rect::new(0, 7, 40, 3)]);
    }

    proptest! {
        #[test]
        fn distribution_covers_extent_exactly(
            extent in 0u16..4000,
            sizes in proptest::collection::vec(0.0f64..100.0, 1..12),
        ) {
            let cells = distribute(extent, &sizes);
            prop_assert_eq!(cells.len(), sizes.len());
            let sum: u32 = cells.iter().map(|&c| u32::from(c)).sum();
            prop_assert_eq!(sum, u32::from(extent));
        }
    }
}
