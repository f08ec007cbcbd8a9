//! Geometric primitives: points, segments, orientation, intersection.

use crate::num::OrdFloat;

/// A two-dimensional point.
///
/// Points are ordered by `x` and then by `y`, for the convenience of our
/// sweep-line algorithm (which moves in increasing `x`). Equality is exact
/// bitwise equality of the coordinates; tolerances only come into play when
/// intersection points are constructed.
#[derive(Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (OrdFloat::from(self.x), OrdFloat::from(self.y))
            .cmp(&(OrdFloat::from(other.x), OrdFloat::from(other.y)))
    }
}

impl PartialOrd for Point {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Point {}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        debug_assert!(x.is_finite());
        debug_assert!(y.is_finite());
        Point { x, y }
    }

    /// The squared euclidean distance to `other`.
    pub(crate) fn sq_dist(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A line segment between two points. Direction is not meaningful here; the
/// sweep machinery keeps track of left/right endpoints itself.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) struct Segment {
    pub a: Point,
    pub b: Point,
}

impl std::fmt::Debug for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} -- {:?}", self.a, self.b)
    }
}

impl Segment {
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }
}

/// Twice the signed area of the triangle `(a, b, c)`.
///
/// Positive when `c` lies to the left of the directed line `a -> b`. The sign
/// of this value is the orientation predicate used by every comparator in the
/// engine; comparators use its exact f64 sign, because a toleranced sign is
/// not transitive and the ordered containers would misbehave.
#[inline]
pub(crate) fn signed_area(a: &Point, b: &Point, c: &Point) -> f64 {
    (a.x - c.x) * (b.y - c.y) - (b.x - c.x) * (a.y - c.y)
}

/// How two segments intersect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum SegmentCrossing {
    /// No intersection at all.
    None,
    /// A single intersection point: transversal, or a touch at an endpoint.
    At(Point),
    /// Collinear segments sharing a non-degenerate sub-segment.
    Overlap(Point, Point),
}

/// Relative threshold (squared) below which two directions count as parallel.
const SQR_EPSILON: f64 = 1e-7;

/// Compute the intersection of two segments.
///
/// Computed intersection points within `snap_eps` of any of the four segment
/// endpoints are snapped onto that endpoint. This is what keeps repeated
/// subdivision from manufacturing infinitesimal segments out of rounding
/// noise: a split point that lands next to an existing event is pulled onto
/// it, and the subdivision code then recognizes the split as degenerate and
/// skips it.
pub(crate) fn intersect(s0: &Segment, s1: &Segment, snap_eps: f64) -> SegmentCrossing {
    let p0 = s0.a;
    let d0x = s0.b.x - p0.x;
    let d0y = s0.b.y - p0.y;
    let p1 = s1.a;
    let d1x = s1.b.x - p1.x;
    let d1y = s1.b.y - p1.y;
    let ex = p1.x - p0.x;
    let ey = p1.y - p0.y;

    let kross = d0x * d1y - d0y * d1x;
    let sqr_len0 = d0x * d0x + d0y * d0y;
    let sqr_len1 = d1x * d1x + d1y * d1y;
    debug_assert!(sqr_len0 > 0.0 && sqr_len1 > 0.0);

    if kross * kross > SQR_EPSILON * sqr_len0 * sqr_len1 {
        // The lines containing the segments cross; check whether the segments
        // themselves do.
        let s = (ex * d1y - ey * d1x) / kross;
        if !(0.0..=1.0).contains(&s) {
            return SegmentCrossing::None;
        }
        let t = (ex * d0y - ey * d0x) / kross;
        if !(0.0..=1.0).contains(&t) {
            return SegmentCrossing::None;
        }
        let p = Point::new(p0.x + s * d0x, p0.y + s * d0y);
        return SegmentCrossing::At(snap_to_endpoint(p, s0, s1, snap_eps));
    }

    // Parallel; check for collinearity.
    let sqr_len_e = ex * ex + ey * ey;
    let kross_e = ex * d0y - ey * d0x;
    if kross_e * kross_e > SQR_EPSILON * sqr_len0 * sqr_len_e {
        return SegmentCrossing::None;
    }

    // Collinear; project `s1`'s endpoints onto `s0`'s parameter space and
    // intersect the parameter spans.
    let sp0 = (d0x * ex + d0y * ey) / sqr_len0;
    let sp1 = sp0 + (d0x * d1x + d0y * d1y) / sqr_len0;
    let smin = sp0.min(sp1);
    let smax = sp0.max(sp1);

    match span_overlap(0.0, 1.0, smin, smax) {
        None => SegmentCrossing::None,
        Some((begin, end)) => {
            let pa = Point::new(p0.x + begin * d0x, p0.y + begin * d0y);
            let pa = snap_to_endpoint(pa, s0, s1, snap_eps);
            if begin == end {
                SegmentCrossing::At(pa)
            } else {
                let pb = Point::new(p0.x + end * d0x, p0.y + end * d0y);
                let pb = snap_to_endpoint(pb, s0, s1, snap_eps);
                SegmentCrossing::Overlap(pa, pb)
            }
        }
    }
}

/// Intersect the spans `[u0, u1]` and `[v0, v1]` (`u0 <= u1`, `v0 <= v1`).
fn span_overlap(u0: f64, u1: f64, v0: f64, v1: f64) -> Option<(f64, f64)> {
    if u1 < v0 || u0 > v1 {
        return None;
    }
    if u1 > v0 {
        if u0 < v1 {
            Some((u0.max(v0), u1.min(v1)))
        } else {
            // u0 == v1
            Some((u0, u0))
        }
    } else {
        // u1 == v0
        Some((u1, u1))
    }
}

/// Round a computed intersection point onto a nearby segment endpoint.
fn snap_to_endpoint(p: Point, s0: &Segment, s1: &Segment, snap_eps: f64) -> Point {
    let sq_eps = snap_eps * snap_eps;
    for endpoint in [&s0.a, &s0.b, &s1.a, &s1.b] {
        if p.sq_dist(endpoint) <= sq_eps {
            return *endpoint;
        }
    }
    p
}

/// Exact-arithmetic mirrors of the predicates above, for verification.
#[cfg(any(test, feature = "slow-asserts"))]
pub(crate) mod exact {
    use super::Point;
    use malachite::Rational;

    fn rat(x: f64) -> Rational {
        // Finite by the API contract, so the conversion cannot fail.
        x.try_into().unwrap()
    }

    /// The exact sign of `signed_area(a, b, c)`.
    pub(crate) fn signed_area_sign(a: &Point, b: &Point, c: &Point) -> std::cmp::Ordering {
        let det = (rat(a.x) - rat(c.x)) * (rat(b.y) - rat(c.y))
            - (rat(b.x) - rat(c.x)) * (rat(a.y) - rat(c.y));
        det.cmp(&Rational::from(0))
    }

    /// Does `p` lie within distance `rel · |r - l| + eps` of the infinite
    /// line through `l` and `r`?
    ///
    /// The relative term admits the overlap classifier's angular slack, the
    /// absolute term admits endpoint snapping. Exact test of the (slightly
    /// loosened) inequality `cross² <= 2·(rel²·len⁴ + eps²·len²)`, which
    /// avoids needing a square root in rational arithmetic.
    pub(crate) fn point_near_line(l: &Point, r: &Point, p: &Point, rel: f64, eps: f64) -> bool {
        let dx = rat(r.x) - rat(l.x);
        let dy = rat(r.y) - rat(l.y);
        let px = rat(p.x) - rat(l.x);
        let py = rat(p.y) - rat(l.y);
        let cross = &dx * &py - &dy * &px;
        let len2 = &dx * &dx + &dy * &dy;
        let rel = rat(rel);
        let eps = rat(eps);
        let bound = (&rel * &rel * &len2 * &len2 + &eps * &eps * &len2) * Rational::from(2);
        &cross * &cross <= bound
    }
}
