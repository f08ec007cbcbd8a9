//! The endpoint-event model: the event arena, the queue order, and the
//! sweep-line order.

use std::cmp::Ordering;

use crate::geom::{signed_area, Point, Segment};
use crate::num::OrdFloat;

/// Which input polygon a segment came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub(crate) enum Operand {
    Subject,
    Clipping,
}

/// How an edge participates in the result, once overlaps are resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EdgeKind {
    /// An ordinary edge; selection is decided by the inside/outside flags.
    Normal,
    /// One half of a collinear overlap; always discarded, its partner edge
    /// stands for both.
    NonContributing,
    /// An overlap whose two edges cross their polygons in the same
    /// direction.
    SameTransition,
    /// An overlap whose two edges cross their polygons in opposite
    /// directions.
    DifferentTransition,
}

/// An index into the event arena.
///
/// Events refer to each other (twin links, `prev_in_result`) through these
/// indices rather than through pointers; the arena lives exactly as long as
/// one boolean operation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub(crate) struct EventIdx(pub usize);

impl std::fmt::Debug for EventIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e_{}", self.0)
    }
}

/// One endpoint of a segment, together with everything the sweep computes
/// about the edge.
///
/// Every segment is represented by exactly two events that point at each
/// other through `other`. The `point` and `left` fields never change after
/// creation; `other` changes only when the segment is subdivided (the left
/// half keeps the original left event, the right half gets two fresh
/// events). The flag fields are only meaningful on left events.
#[derive(Clone, Debug)]
pub(crate) struct SweepEvent {
    /// This endpoint.
    pub point: Point,
    /// True if this is the lexicographically smaller endpoint of its
    /// segment.
    pub left: bool,
    /// The twin event at the opposite endpoint.
    pub other: EventIdx,
    /// Which input polygon the edge belongs to.
    pub operand: Operand,
    /// Overlap classification; `Normal` unless a collinear overlap was
    /// found.
    pub kind: EdgeKind,
    /// Does crossing this edge upward leave the polygon it belongs to?
    pub in_out: bool,
    /// The same transition, for the closest lower edge of the other
    /// polygon. True means the region containing this edge is outside the
    /// other polygon.
    pub other_in_out: bool,
    /// For a non-contributing edge that was suppressed in favor of a
    /// coincident edge of the other polygon: the edge standing for the
    /// pair. If a later coincident edge cancels this one, the partner goes
    /// back to being an ordinary edge.
    pub overlap_partner: Option<EventIdx>,
    /// The nearest lower edge that made it into the result, if any.
    pub prev_in_result: Option<EventIdx>,
    /// Was this edge selected into the result?
    pub in_result: bool,
    /// Position bookkeeping for the contour assembler: index of this
    /// event's twin within the result-event array.
    pub pos: usize,
    /// The output contour this edge was assigned to by the assembler.
    pub contour_id: Option<usize>,
    /// Which way the assembler traversed this edge (true if right-to-left).
    pub result_in_out: bool,
}

/// The event arena for one boolean operation.
#[derive(Debug, Default)]
pub(crate) struct Events {
    evs: Vec<SweepEvent>,
}

impl Events {
    pub fn len(&self) -> usize {
        self.evs.len()
    }

    /// Add both events of the segment `(a, b)`, re-oriented so the left
    /// event is the lexicographically smaller endpoint. Returns the left
    /// event's index; the right event is allocated immediately after it.
    pub fn add_segment(&mut self, a: Point, b: Point, operand: Operand) -> EventIdx {
        debug_assert!(a != b);
        let (l, r) = if a < b { (a, b) } else { (b, a) };
        let left_idx = EventIdx(self.evs.len());
        let right_idx = EventIdx(self.evs.len() + 1);
        self.evs.push(SweepEvent::new(l, true, right_idx, operand));
        self.evs.push(SweepEvent::new(r, false, left_idx, operand));
        left_idx
    }

    /// Allocate a single event; used by subdivision.
    pub fn alloc(&mut self, point: Point, left: bool, other: EventIdx, operand: Operand) -> EventIdx {
        let idx = EventIdx(self.evs.len());
        self.evs.push(SweepEvent::new(point, left, other, operand));
        idx
    }

    /// The full segment of the event at `idx`, as (left point, right point).
    pub fn segment(&self, idx: EventIdx) -> Segment {
        let e = &self[idx];
        let o = &self[e.other];
        if e.left {
            Segment::new(e.point, o.point)
        } else {
            Segment::new(o.point, e.point)
        }
    }

    /// Is the segment of the event at `idx` vertical?
    pub fn is_vertical(&self, idx: EventIdx) -> bool {
        self[idx].point.x == self[self[idx].other].point.x
    }

    /// The ordering key under which the event at `idx` sits in the priority
    /// queue, built from its current state.
    pub fn queue_key(&self, idx: EventIdx) -> QueueKey {
        let e = &self[idx];
        QueueKey {
            point: e.point,
            left: e.left,
            other_point: self[e.other].point,
            operand: e.operand,
            idx,
        }
    }

    /// The ordering key under which the (left) event at `idx` sits in the
    /// sweep-line, built from its current state.
    pub fn sweep_key(&self, idx: EventIdx) -> SweepKey {
        let e = &self[idx];
        debug_assert!(e.left);
        SweepKey {
            left: e.point,
            right: self[e.other].point,
            operand: e.operand,
            idx,
        }
    }
}

impl SweepEvent {
    fn new(point: Point, left: bool, other: EventIdx, operand: Operand) -> Self {
        SweepEvent {
            point,
            left,
            other,
            operand,
            kind: EdgeKind::Normal,
            in_out: false,
            other_in_out: false,
            overlap_partner: None,
            prev_in_result: None,
            in_result: false,
            pos: 0,
            contour_id: None,
            result_in_out: false,
        }
    }
}

impl std::ops::Index<EventIdx> for Events {
    type Output = SweepEvent;

    fn index(&self, index: EventIdx) -> &SweepEvent {
        &self.evs[index.0]
    }
}

impl std::ops::IndexMut<EventIdx> for Events {
    fn index_mut(&mut self, index: EventIdx) -> &mut SweepEvent {
        &mut self.evs[index.0]
    }
}

/// The priority-queue ordering key: an immutable snapshot of the fields
/// that determine an event's processing order.
///
/// Snapshots matter. Subdivision rewires `other` links of events that are
/// already enqueued, and a binary heap whose keys mutate underneath it can
/// violate its own invariant — that is one of the classic ways this family
/// of algorithms loops forever. With snapshot keys the heap stays
/// consistent; a stale `other_point` can at worst perturb a tie-break
/// between events at the same point, which is harmless because the ties
/// are between interchangeable orderings of coincident endpoints.
#[derive(Clone, Debug)]
pub(crate) struct QueueKey {
    pub point: Point,
    pub left: bool,
    pub other_point: Point,
    pub operand: Operand,
    pub idx: EventIdx,
}

/// The sweep-line ordering key for an active (left) event: a snapshot of
/// the segment's endpoints, removed and re-inserted whenever subdivision
/// shortens the segment.
#[derive(Clone, Debug)]
pub(crate) struct SweepKey {
    pub left: Point,
    pub right: Point,
    pub operand: Operand,
    pub idx: EventIdx,
}

impl QueueKey {
    /// The strict total order on events:
    ///
    /// 1. smaller `x` first;
    /// 2. then smaller `y` first;
    /// 3. then right events before left events, so that an edge ending at a
    ///    point is retired before an edge starting there is inserted;
    /// 4. then the event whose segment lies below the other;
    /// 5. then subject before clipping;
    /// 6. then arena order, so distinct events never compare equal.
    fn order(&self, other: &Self) -> Ordering {
        (OrdFloat::from(self.point.x), OrdFloat::from(self.point.y))
            .cmp(&(OrdFloat::from(other.point.x), OrdFloat::from(other.point.y)))
            .then_with(|| self.left.cmp(&other.left))
            .then_with(|| {
                let area = signed_area(&self.point, &self.other_point, &other.other_point);
                if area > 0.0 {
                    Ordering::Less
                } else if area < 0.0 {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .then_with(|| self.operand.cmp(&other.operand))
            .then_with(|| self.idx.cmp(&other.idx))
    }
}

impl PartialEq for QueueKey {
    fn eq(&self, other: &Self) -> bool {
        self.order(other) == Ordering::Equal
    }
}

impl Eq for QueueKey {}

impl PartialOrd for QueueKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.order(other))
    }
}

impl Ord for QueueKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order(other)
    }
}

impl SweepKey {
    fn left_queue_key(&self) -> QueueKey {
        QueueKey {
            point: self.left,
            left: true,
            other_point: self.right,
            operand: self.operand,
            idx: self.idx,
        }
    }

    /// "Segment below segment" at the current sweep position.
    ///
    /// If the segments share their left endpoint, the right endpoints
    /// decide. Otherwise the comparison happens at the later of the two
    /// left endpoints: whichever segment was inserted first is evaluated
    /// against the other's entry point. Collinear segments fall back to a
    /// fixed tie-break (operand, then endpoints, then arena order) that
    /// keeps the order total.
    fn order(&self, other: &Self) -> Ordering {
        if self.idx == other.idx {
            return Ordering::Equal;
        }

        let other_left = signed_area(&self.left, &self.right, &other.left);
        let other_right = signed_area(&self.left, &self.right, &other.right);
        if other_left != 0.0 || other_right != 0.0 {
            if self.left == other.left {
                // Shared left endpoint: sort by where the right endpoints
                // are.
                return if other_right > 0.0 {
                    Ordering::Less
                } else {
                    Ordering::Greater
                };
            }
            if self.left_queue_key().cmp(&other.left_queue_key()) == Ordering::Less {
                // `self` was inserted first; is `other`'s entry point above
                // our segment?
                if other_left > 0.0 {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            } else {
                // `other` was inserted first; is our entry point on or
                // below its segment? The on-the-line case must land on the
                // same side as the mirrored comparison above, or the
                // ordered set stops being an order.
                let self_left = signed_area(&other.left, &other.right, &self.left);
                if self_left <= 0.0 {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
        } else {
            // Collinear segments.
            self.operand
                .cmp(&other.operand)
                .then_with(|| self.left.cmp(&other.left))
                .then_with(|| self.right.cmp(&other.right))
                .then_with(|| self.idx.cmp(&other.idx))
        }
    }
}

impl PartialEq for SweepKey {
    fn eq(&self, other: &Self) -> bool {
        self.idx == other.idx
    }
}

impl Eq for SweepKey {}

impl PartialOrd for SweepKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.order(other))
    }
}

impl Ord for SweepKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order(other)
    }
}
