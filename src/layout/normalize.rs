//! Final vertical shift applied once every position is known.

use super::point::Point;

/// Shift all positions vertically so the smallest y equals `top_margin`.
///
/// Returns the adjustment that was added to every y (0 for no positions).
pub fn normalize_positions(positions: &mut [Point], top_margin: f32) -> f32 {
    let min_y = positions
        .iter()
        .map(|p| p.y)
        .fold(f32::INFINITY, f32::min);

    if !min_y.is_finite() {
        return 0.0;
    }

    let adjustment = top_margin - min_y;
    for position in positions.iter_mut() {
        position.y += adjustment;
    }
    adjustment
}
