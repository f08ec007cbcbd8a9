//! The public polygon model: contours of points, polygons of contours.

use crate::geom::Point;
use crate::Error;

/// A single closed loop of a polygon.
///
/// The closing edge from the last point back to the first is implicit. On
/// input the orientation is not trusted and the hole metadata is ignored; on
/// output, outer contours are counter-clockwise, holes are clockwise, and
/// [`Contour::holes`] lists the holes of each outer contour.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Contour {
    /// The vertices of the loop.
    pub points: Vec<Point>,
    holes: Vec<usize>,
    external: bool,
}

impl Default for Contour {
    fn default() -> Self {
        Contour::new(Vec::new())
    }
}

impl Contour {
    /// Create a contour from a list of vertices.
    pub fn new(points: Vec<Point>) -> Self {
        Contour {
            points,
            holes: Vec::new(),
            external: true,
        }
    }

    /// Indices (within the owning polygon) of the contours that are holes of
    /// this one. Only meaningful on polygons produced by
    /// [`Polygon::construct`].
    pub fn holes(&self) -> &[usize] {
        &self.holes
    }

    /// Is this an outer contour, as opposed to a hole? Only meaningful on
    /// polygons produced by [`Polygon::construct`].
    pub fn is_external(&self) -> bool {
        self.external
    }

    /// The signed area enclosed by the contour: positive for
    /// counter-clockwise loops, negative for clockwise ones.
    pub fn signed_area(&self) -> f64 {
        let mut area = 0.0;
        for (p, q) in cyclic_pairs(&self.points) {
            area += p.x * q.y - q.x * p.y;
        }
        area / 2.0
    }

    /// Is the contour wound counter-clockwise?
    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Reverse the winding direction.
    pub fn reverse_orientation(&mut self) {
        self.points.reverse();
    }

    /// The axis-aligned bounding box, as `(min, max)` corners. `None` for an
    /// empty contour.
    pub fn bounding_box(&self) -> Option<(Point, Point)> {
        bounding_box(self.points.iter())
    }

    /// Iterate over the edges of the contour, including the implicit closing
    /// edge.
    pub(crate) fn edges(&self) -> impl Iterator<Item = (&Point, &Point)> {
        cyclic_pairs(&self.points)
    }

    pub(crate) fn add_hole(&mut self, contour_index: usize) {
        self.holes.push(contour_index);
    }

    pub(crate) fn set_internal(&mut self) {
        self.external = false;
    }
}

impl From<Vec<(f64, f64)>> for Contour {
    fn from(points: Vec<(f64, f64)>) -> Self {
        Contour::new(points.into_iter().map(Point::from).collect())
    }
}

fn cyclic_pairs<T>(xs: &[T]) -> impl Iterator<Item = (&T, &T)> {
    xs.windows(2)
        .map(|pair| (&pair[0], &pair[1]))
        .chain(xs.last().zip(xs.first()))
}

fn bounding_box<'a>(points: impl Iterator<Item = &'a Point>) -> Option<(Point, Point)> {
    let mut ret: Option<(Point, Point)> = None;
    for p in points {
        match &mut ret {
            None => ret = Some((*p, *p)),
            Some((min, max)) => {
                min.x = min.x.min(p.x);
                min.y = min.y.min(p.y);
                max.x = max.x.max(p.x);
                max.y = max.y.max(p.y);
            }
        }
    }
    ret
}

/// A polygon: zero or more closed contours.
///
/// Contours may be outer boundaries or holes, in any orientation, and are
/// allowed to touch themselves, repeat, or self-intersect; the boolean
/// operations resolve all of that. `Clone` produces a deep copy.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Polygon {
    /// The contours making up the polygon.
    pub contours: Vec<Contour>,
}

impl Polygon {
    /// Create a polygon from a list of contours.
    pub fn new(contours: Vec<Contour>) -> Self {
        Polygon { contours }
    }

    /// A polygon with no contours.
    pub fn empty() -> Self {
        Polygon::default()
    }

    /// Does this polygon have no contours at all?
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Append a contour.
    pub fn push(&mut self, contour: Contour) {
        self.contours.push(contour);
    }

    /// The sum of the signed areas of all contours. On output polygons
    /// (outer contours counter-clockwise, holes clockwise) this is the
    /// enclosed area.
    pub fn area(&self) -> f64 {
        self.contours.iter().map(Contour::signed_area).sum()
    }

    /// The axis-aligned bounding box over all contours, as `(min, max)`
    /// corners. `None` for a polygon with no points.
    pub fn bounding_box(&self) -> Option<(Point, Point)> {
        bounding_box(self.contours.iter().flat_map(|c| c.points.iter()))
    }

    /// The total number of vertices, over all contours.
    pub(crate) fn vertex_count(&self) -> usize {
        self.contours.iter().map(|c| c.points.len()).sum()
    }

    /// Validate and clean a polygon before sweeping: reject non-finite
    /// coordinates, drop consecutive duplicate vertices (including the
    /// explicit closing vertex, if present), and drop contours left with
    /// fewer than three points — they enclose nothing and contribute no
    /// segments.
    pub(crate) fn sanitized(&self) -> Result<Polygon, Error> {
        let mut contours = Vec::with_capacity(self.contours.len());
        for contour in &self.contours {
            let mut points: Vec<Point> = Vec::with_capacity(contour.points.len());
            for p in &contour.points {
                if !p.x.is_finite() || !p.y.is_finite() {
                    return Err(Error::DegenerateInput);
                }
                if points.last() != Some(p) {
                    points.push(*p);
                }
            }
            while points.len() > 1 && points.first() == points.last() {
                points.pop();
            }
            if points.len() >= 3 {
                contours.push(Contour::new(points));
            }
        }
        Ok(Polygon { contours })
    }
}

impl From<Vec<Vec<(f64, f64)>>> for Polygon {
    fn from(contours: Vec<Vec<(f64, f64)>>) -> Self {
        Polygon::new(contours.into_iter().map(Contour::from).collect())
    }
}

impl std::ops::Index<usize> for Polygon {
    type Output = Contour;

    fn index(&self, index: usize) -> &Contour {
        &self.contours[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_area_orientation() {
        let ccw = Contour::from(vec![(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 1.0)]);
        assert_eq!(ccw.signed_area(), 2.0);
        assert!(ccw.is_counter_clockwise());

        let mut cw = ccw.clone();
        cw.reverse_orientation();
        assert_eq!(cw.signed_area(), -2.0);
        assert!(!cw.is_counter_clockwise());
    }

    #[test]
    fn bounding_boxes() {
        let poly = Polygon::from(vec![
            vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)],
            vec![(-2.0, 3.0), (4.0, 3.0), (0.0, 5.0)],
        ]);
        let (min, max) = poly.bounding_box().unwrap();
        assert_eq!(min, Point::new(-2.0, 0.0));
        assert_eq!(max, Point::new(4.0, 5.0));
        assert!(Polygon::empty().bounding_box().is_none());
    }

    #[test]
    fn sanitize_dedups_and_drops() {
        let poly = Polygon::from(vec![
            // Duplicate run and an explicit closing vertex.
            vec![(0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)],
            // Too few distinct points to enclose anything.
            vec![(5.0, 5.0), (5.0, 5.0)],
            vec![(7.0, 7.0)],
        ]);
        let clean = poly.sanitized().unwrap();
        assert_eq!(clean.contours.len(), 1);
        assert_eq!(clean.contours[0].points.len(), 3);
    }

    #[test]
    fn sanitize_rejects_nan() {
        let poly = Polygon::from(vec![vec![(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0)]]);
        assert_eq!(poly.sanitized(), Err(Error::DegenerateInput));
    }
}
