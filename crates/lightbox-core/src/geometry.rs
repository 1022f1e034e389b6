//! Drag-gesture geometry for photo tags.
//!
//! Converts a pointer drag over the rendered image element into a
//! normalized percentage rectangle. Pure functions: the same point sequence
//! resolves to the same rectangle whether mouse or touch events delivered
//! it. Resolution runs in two stages so each is checkable on its own:
//! [`selection`] produces the clamped, quadrant-normalized pixel rectangle,
//! and [`resolve`] applies the minimum-size rule and converts to
//! percentages.

use serde::{Deserialize, Serialize};

use crate::photo::TagRect;

/// Minimum accepted selection edge, in pixels of the displayed image.
/// Anything smaller is treated as an accidental micro-drag.
pub const MIN_EDGE_PX: f64 = 10.0;

/// A point in the coordinate space of the rendered image element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

/// Displayed size of the image element at gesture time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
  pub width:  f64,
  pub height: f64,
}

/// An axis-aligned pixel-space selection with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
  pub x:      f64,
  pub y:      f64,
  pub width:  f64,
  pub height: f64,
}

fn clamp(p: Point, bounds: Bounds) -> Point {
  Point {
    x: p.x.clamp(0.0, bounds.width),
    y: p.y.clamp(0.0, bounds.height),
  }
}

/// The pixel-space selection spanned by a drag.
///
/// The start point and the final move point are clamped into
/// `[0, width] x [0, height]`; the rectangle spans the two, normalized so
/// `(x, y)` is the top-left corner whichever of the four directions the
/// drag ran. Intermediate points only steer the cursor; the span depends on
/// the final one alone. An empty move sequence yields a zero-size selection
/// at the start point.
pub fn selection(start: Point, moves: &[Point], bounds: Bounds) -> PixelRect {
  let start = clamp(start, bounds);
  let end = moves.last().map_or(start, |p| clamp(*p, bounds));

  PixelRect {
    x:      start.x.min(end.x),
    y:      start.y.min(end.y),
    width:  (end.x - start.x).abs(),
    height: (end.y - start.y).abs(),
  }
}

/// Resolve a whole drag to a normalized tag rectangle.
///
/// Returns `None` when either selection edge is under [`MIN_EDGE_PX`].
/// Degenerate bounds and NaN coordinates also never resolve: no percentage
/// rectangle is derivable from them.
pub fn resolve(start: Point, moves: &[Point], bounds: Bounds) -> Option<TagRect> {
  if !(bounds.width > 0.0 && bounds.height > 0.0) {
    return None;
  }

  let sel = selection(start, moves, bounds);
  if !(sel.width >= MIN_EDGE_PX && sel.height >= MIN_EDGE_PX) {
    return None;
  }

  Some(TagRect {
    x:      100.0 * sel.x / bounds.width,
    y:      100.0 * sel.y / bounds.height,
    width:  100.0 * sel.width / bounds.width,
    height: 100.0 * sel.height / bounds.height,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  const IMG: Bounds = Bounds {
    width:  200.0,
    height: 100.0,
  };

  fn pt(x: f64, y: f64) -> Point {
    Point { x, y }
  }

  #[test]
  fn out_of_bounds_drag_clamps_to_the_element_box() {
    let sel = selection(pt(5.0, 5.0), &[pt(-50.0, -50.0)], IMG);
    assert_eq!(sel.x, 0.0);
    assert_eq!(sel.y, 0.0);
    assert_eq!(sel.width, 5.0);
    assert_eq!(sel.height, 5.0);
  }

  #[test]
  fn micro_drag_produces_no_tag() {
    assert!(resolve(pt(10.0, 10.0), &[pt(12.0, 12.0)], IMG).is_none());
  }

  #[test]
  fn reverse_drag_normalizes_to_the_top_left_corner() {
    let rect = resolve(pt(150.0, 80.0), &[pt(50.0, 20.0)], IMG).unwrap();
    assert_eq!(rect.x, 25.0);
    assert_eq!(rect.y, 20.0);
    assert_eq!(rect.width, 50.0);
    assert_eq!(rect.height, 60.0);
  }

  #[test]
  fn all_four_drag_quadrants_agree() {
    let a = resolve(pt(50.0, 20.0), &[pt(150.0, 80.0)], IMG).unwrap();
    let b = resolve(pt(150.0, 20.0), &[pt(50.0, 80.0)], IMG).unwrap();
    let c = resolve(pt(50.0, 80.0), &[pt(150.0, 20.0)], IMG).unwrap();
    let d = resolve(pt(150.0, 80.0), &[pt(50.0, 20.0)], IMG).unwrap();
    assert_eq!(a, b);
    assert_eq!(b, c);
    assert_eq!(c, d);
  }

  #[test]
  fn only_the_final_point_shapes_the_selection() {
    let wander = [pt(190.0, 95.0), pt(20.0, 10.0), pt(150.0, 80.0)];
    let direct = [pt(150.0, 80.0)];
    assert_eq!(
      resolve(pt(50.0, 20.0), &wander, IMG),
      resolve(pt(50.0, 20.0), &direct, IMG),
    );
  }

  #[test]
  fn empty_move_sequence_is_a_zero_size_selection() {
    let sel = selection(pt(40.0, 40.0), &[], IMG);
    assert_eq!(sel.width, 0.0);
    assert_eq!(sel.height, 0.0);
    assert!(resolve(pt(40.0, 40.0), &[], IMG).is_none());
  }

  #[test]
  fn exact_minimum_selection_is_accepted() {
    let rect = resolve(pt(0.0, 0.0), &[pt(10.0, 10.0)], IMG).unwrap();
    assert_eq!(rect.width, 5.0);
    assert_eq!(rect.height, 10.0);
  }

  #[test]
  fn degenerate_bounds_never_resolve() {
    let flat = Bounds {
      width:  0.0,
      height: 100.0,
    };
    assert!(resolve(pt(0.0, 0.0), &[pt(50.0, 50.0)], flat).is_none());
  }

  #[test]
  fn non_finite_input_never_resolves() {
    assert!(resolve(pt(f64::NAN, 5.0), &[pt(80.0, 80.0)], IMG).is_none());
  }

  #[test]
  fn resolved_rect_is_always_in_bounds() {
    let rect = resolve(pt(-300.0, 250.0), &[pt(400.0, -80.0)], IMG).unwrap();
    assert!(rect.in_bounds());
    assert_eq!(rect.x, 0.0);
    assert_eq!(rect.y, 0.0);
    assert_eq!(rect.width, 100.0);
    assert_eq!(rect.height, 100.0);
  }
}
