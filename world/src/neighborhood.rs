//! Clipped Moore neighbourhood queries.
//!
//! The ocean has hard edges: positions outside the grid are simply dropped
//! from a neighbourhood rather than wrapped around to the opposite side.

use std::ops::Range;

use wator_core::CellCoord;

/// Enumerates the positions of the Moore neighbourhood around `center`,
/// center included, clipped to a `width` by `height` grid.
///
/// Positions are yielded in row-major order. A center outside the grid
/// yields only the in-bounds positions adjacent to it.
pub fn moore(width: u32, height: u32, center: CellCoord) -> impl Iterator<Item = CellCoord> {
    let columns = span(center.column(), width);
    let rows = span(center.row(), height);

    rows.flat_map(move |row| {
        columns
            .clone()
            .map(move |column| CellCoord::new(column, row))
    })
}

fn span(center: u32, extent: u32) -> Range<u32> {
    center.saturating_sub(1)..center.saturating_add(2).min(extent)
}
