#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

mod events;
mod geom;
mod num;
mod polygon;
mod sweep;
mod topology;

#[cfg(feature = "arbitrary")]
pub mod arbitrary;

pub use geom::Point;
pub use polygon::{Contour, Polygon};

/// The boolean operation to perform.
///
/// The discriminants are stable, for use in diagnostics and test
/// fixtures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum Op {
    /// Points inside either polygon.
    Union = 0,
    /// Points inside both polygons.
    Intersection = 1,
    /// Points inside the subject but not the clipping polygon.
    Difference = 2,
    /// Points inside exactly one of the polygons.
    Xor = 3,
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Op::Union => "union",
            Op::Intersection => "intersection",
            Op::Difference => "difference",
            Op::Xor => "xor",
        };
        f.write_str(name)
    }
}

/// The input polygons were unusable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An input coordinate was NaN or infinite.
    #[error("input polygon has a non-finite coordinate")]
    DegenerateInput,
    /// Subdivision blew through its event budget without converging; the
    /// input is numerically pathological.
    #[error("boolean operation did not converge within the event budget")]
    NumericInstability,
}

impl Polygon {
    /// Compute a boolean operation between `self` (the subject) and
    /// `clipping`.
    ///
    /// The inputs are left untouched; contours of the result are oriented
    /// counter-clockwise for outer boundaries, clockwise for holes. An
    /// empty result (for instance the intersection of far-apart polygons)
    /// is an empty polygon, not an error.
    ///
    /// ```
    /// use polysweep::{Op, Polygon};
    ///
    /// let a = Polygon::from(vec![vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]]);
    /// let b = Polygon::from(vec![vec![(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0)]]);
    /// let u = a.construct(Op::Union, &b).unwrap();
    /// assert!((u.area() - 7.0).abs() < 1e-9);
    /// ```
    pub fn construct(&self, op: Op, clipping: &Polygon) -> Result<Polygon, Error> {
        let subject = self.sanitized()?;
        let clipping = clipping.sanitized()?;

        // An empty operand settles every operation without a sweep.
        if subject.is_empty() || clipping.is_empty() {
            return Ok(match op {
                Op::Difference => subject,
                Op::Intersection => Polygon::empty(),
                Op::Union | Op::Xor => {
                    if subject.is_empty() {
                        clipping
                    } else {
                        subject
                    }
                }
            });
        }

        // Both polygons are non-empty, so both bounding boxes exist.
        let Some((smin, smax)) = subject.bounding_box() else {
            return Ok(Polygon::empty());
        };
        let Some((cmin, cmax)) = clipping.bounding_box() else {
            return Ok(Polygon::empty());
        };

        // Strictly separated operands don't interact; touching ones still
        // need the full sweep.
        if smax.x < cmin.x || cmax.x < smin.x || smax.y < cmin.y || cmax.y < smin.y {
            return Ok(match op {
                Op::Difference => subject,
                Op::Intersection => Polygon::empty(),
                Op::Union | Op::Xor => {
                    let mut out = subject;
                    out.contours.extend(clipping.contours);
                    out
                }
            });
        }

        // Tolerance proportional to the coordinate magnitudes in play, so
        // that the same inputs behave the same at any scale.
        let magnitude = [smin, smax, cmin, cmax]
            .iter()
            .flat_map(|p| [p.x.abs(), p.y.abs()])
            .fold(0.0, f64::max);
        let snap_eps = magnitude * 64.0 * f64::EPSILON;

        let (mut events, popped) = sweep::run(&subject, &clipping, op, snap_eps)?;
        let contours = topology::connect_edges(&mut events, &popped);
        Ok(Polygon::new(contours))
    }
}
