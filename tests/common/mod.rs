//! Shared helpers for the integration suites: canonicalization of polygons
//! so results can be compared against expected vertex lists regardless of
//! starting vertex, winding direction, contour order, or benign collinear
//! subdivision points.
#![allow(dead_code)]

use polysweep::Polygon;

/// Signed area (doubled) of the triangle `(a, b, c)`, exact in f64.
fn area2(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    (a.0 - c.0) * (b.1 - c.1) - (b.0 - c.0) * (a.1 - c.1)
}

fn contour_area(points: &[(f64, f64)]) -> f64 {
    let mut area = 0.0;
    for i in 0..points.len() {
        let p = points[i];
        let q = points[(i + 1) % points.len()];
        area += p.0 * q.1 - q.0 * p.1;
    }
    area / 2.0
}

/// Remove vertices that are exactly collinear with their neighbors.
/// Different implementations of the same boolean operation legitimately
/// disagree about which subdivision points survive into the output, so the
/// comparison ignores them. Only *exact* collinearity is erased; a sliver
/// that is merely thin stays put.
fn simplify(mut points: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    loop {
        if points.len() <= 3 {
            return points;
        }
        let n = points.len();
        let redundant = (0..n).find(|&i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            area2(prev, points[i], next) == 0.0
        });
        match redundant {
            Some(i) => {
                points.remove(i);
            }
            None => return points,
        }
    }
}

/// Canonical form: per contour, drop collinear vertices, orient
/// counter-clockwise, rotate so the lexicographically smallest vertex is
/// first; then sort contours by length and lexicographic content.
pub fn normalize(poly: &Polygon) -> Vec<Vec<(f64, f64)>> {
    let mut contours: Vec<Vec<(f64, f64)>> = poly
        .contours
        .iter()
        .filter(|c| !c.points.is_empty())
        .map(|c| {
            let mut pts: Vec<(f64, f64)> = c.points.iter().map(|p| (p.x, p.y)).collect();
            pts = simplify(pts);
            if contour_area(&pts) < 0.0 {
                pts.reverse();
            }
            let min = pts
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
                .map(|(i, _)| i)
                .unwrap_or(0);
            pts.rotate_left(min);
            pts
        })
        .collect();
    contours.sort_by(|a, b| {
        a.len()
            .cmp(&b.len())
            .then_with(|| a.partial_cmp(b).unwrap())
    });
    contours
}

/// Assert that `actual` matches the expected contours, up to
/// normalization, with a per-coordinate tolerance.
pub fn assert_polygons_match(actual: &Polygon, expected: &[Vec<(f64, f64)>], tol: f64) {
    let got = normalize(actual);
    let want = normalize(&Polygon::from(expected.to_vec()));
    assert_eq!(
        got.len(),
        want.len(),
        "contour count mismatch\n  got:  {got:?}\n  want: {want:?}"
    );
    for (ci, (gc, wc)) in got.iter().zip(&want).enumerate() {
        assert_eq!(
            gc.len(),
            wc.len(),
            "contour {ci} length mismatch\n  got:  {gc:?}\n  want: {wc:?}"
        );
        for (pi, (g, w)) in gc.iter().zip(wc).enumerate() {
            assert!(
                (g.0 - w.0).abs() <= tol && (g.1 - w.1).abs() <= tol,
                "contour {ci} point {pi}: got {g:?}, want {w:?}\n  got:  {gc:?}\n  want: {wc:?}"
            );
        }
    }
}

/// Rotate every vertex of a polygon around the origin.
pub fn rotate(poly: &Polygon, radians: f64) -> Polygon {
    let (sin, cos) = radians.sin_cos();
    let contours: Vec<Vec<(f64, f64)>> = poly
        .contours
        .iter()
        .map(|c| {
            c.points
                .iter()
                .map(|p| (p.x * cos - p.y * sin, p.y * cos + p.x * sin))
                .collect()
        })
        .collect();
    Polygon::from(contours)
}
