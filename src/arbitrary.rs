//! Utilities for fuzz and/or property testing using `arbitrary`.

use arbitrary::Unstructured;

use crate::{Contour, Point, Polygon};

/// Generate an arbitrary float in some range.
pub fn float_in_range(
    start: f64,
    end: f64,
    u: &mut Unstructured<'_>,
) -> Result<f64, arbitrary::Error> {
    let num: u32 = u.arbitrary()?;
    let t = num as f64 / u32::MAX as f64;
    Ok((1.0 - t) * start + t * end)
}

fn coord(u: &mut Unstructured<'_>) -> Result<f64, arbitrary::Error> {
    float_in_range(-1e6, 1e6, u)
}

/// Generate an arbitrary point with coordinates in `[-1e6, 1e6]`.
pub fn point(u: &mut Unstructured<'_>) -> Result<Point, arbitrary::Error> {
    Ok(Point::new(coord(u)?, coord(u)?))
}

/// Generate an axis-aligned rectangle contour with a positive extent.
pub fn rect_contour(u: &mut Unstructured<'_>) -> Result<Contour, arbitrary::Error> {
    let x0 = coord(u)?;
    let y0 = coord(u)?;
    let w = float_in_range(1.0, 1e3, u)?;
    let h = float_in_range(1.0, 1e3, u)?;
    Ok(Contour::from(vec![
        (x0, y0),
        (x0 + w, y0),
        (x0 + w, y0 + h),
        (x0, y0 + h),
    ]))
}

/// Generate a simple convex contour: `n` vertices on a circle.
pub fn convex_contour(u: &mut Unstructured<'_>) -> Result<Contour, arbitrary::Error> {
    let n: u32 = u.int_in_range(3..=16)?;
    let cx = coord(u)?;
    let cy = coord(u)?;
    let radius = float_in_range(1.0, 1e3, u)?;
    let phase = float_in_range(0.0, std::f64::consts::TAU, u)?;
    let points = (0..n)
        .map(|i| {
            let theta = phase + std::f64::consts::TAU * i as f64 / n as f64;
            (cx + radius * theta.cos(), cy + radius * theta.sin())
        })
        .collect();
    Ok(Contour::from(points))
}

/// Generate a polygon of one to four contours, mixing rectangles and
/// convex loops. The contours may overlap each other; the boolean engine
/// is expected to cope.
pub fn polygon(u: &mut Unstructured<'_>) -> Result<Polygon, arbitrary::Error> {
    let n: usize = u.int_in_range(1..=4)?;
    let mut contours = Vec::with_capacity(n);
    for _ in 0..n {
        let c = if u.arbitrary()? {
            rect_contour(u)?
        } else {
            convex_contour(u)?
        };
        contours.push(c);
    }
    Ok(Polygon::new(contours))
}
