//! The sweep: ordered event processing, subdivision at intersections, and
//! the inside/outside flag computation that drives edge selection.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};
use std::ops::Bound;

use crate::events::{EdgeKind, EventIdx, Events, Operand, QueueKey, SweepKey};
use crate::geom::{intersect, SegmentCrossing};
use crate::polygon::Polygon;
use crate::{Error, Op};

/// Hard floor for the event budget; subdividing past this (or past eight
/// times the initial event count, whichever is larger) aborts the operation
/// with [`Error::NumericInstability`].
const MIN_EVENT_BUDGET: usize = 1 << 20;

pub(crate) struct Sweep {
    op: Op,
    events: Events,
    queue: BinaryHeap<Reverse<QueueKey>>,
    active: BTreeSet<SweepKey>,
    /// Every event, in the order it was popped from the queue. The contour
    /// assembler consumes this.
    popped: Vec<EventIdx>,
    snap_eps: f64,
    event_budget: usize,
    divisions: usize,
    /// Right edge of the subject's bounding box; a difference cannot
    /// produce anything beyond it.
    subject_max_x: f64,
    /// Right edge of the overlap of the two bounding boxes; an intersection
    /// cannot produce anything beyond it.
    min_max_x: f64,
}

/// Run the sweep over two sanitized polygons.
///
/// Returns the event arena and the pop order; selection flags are already
/// filled in, so all that remains is chaining the selected edges into
/// contours.
pub(crate) fn run(
    subject: &Polygon,
    clipping: &Polygon,
    op: Op,
    snap_eps: f64,
) -> Result<(Events, Vec<EventIdx>), Error> {
    let mut events = Events::default();
    let mut queue = BinaryHeap::with_capacity(2 * (subject.vertex_count() + clipping.vertex_count()));

    for (polygon, operand) in [(subject, Operand::Subject), (clipping, Operand::Clipping)] {
        for contour in &polygon.contours {
            for (a, b) in contour.edges() {
                // Sanitization removed zero-length edges already.
                let left = events.add_segment(*a, *b, operand);
                let right = events[left].other;
                queue.push(Reverse(events.queue_key(left)));
                queue.push(Reverse(events.queue_key(right)));
            }
        }
    }

    log::trace!("sweep start: {} events queued ({op})", events.len());

    let subject_max_x = subject
        .bounding_box()
        .map_or(f64::INFINITY, |(_, max)| max.x);
    let clipping_max_x = clipping
        .bounding_box()
        .map_or(f64::INFINITY, |(_, max)| max.x);

    let event_budget = MIN_EVENT_BUDGET.max(events.len() * 8);
    let mut sweep = Sweep {
        op,
        events,
        queue,
        active: BTreeSet::new(),
        popped: Vec::new(),
        snap_eps,
        event_budget,
        divisions: 0,
        subject_max_x,
        min_max_x: subject_max_x.min(clipping_max_x),
    };
    sweep.run_loop()?;

    log::trace!(
        "sweep done: {} events popped, {} divisions",
        sweep.popped.len(),
        sweep.divisions
    );
    Ok((sweep.events, sweep.popped))
}

impl Sweep {
    fn run_loop(&mut self) -> Result<(), Error> {
        while let Some(Reverse(key)) = self.queue.pop() {
            let idx = key.idx;
            self.popped.push(idx);

            // Nothing to the right of these bounds can contribute.
            match self.op {
                Op::Intersection if key.point.x > self.min_max_x => break,
                Op::Difference if key.point.x > self.subject_max_x => break,
                _ => {}
            }

            if self.events[idx].left {
                self.handle_left(idx)?;
            } else {
                self.handle_right(idx)?;
            }
        }
        Ok(())
    }

    fn handle_left(&mut self, idx: EventIdx) -> Result<(), Error> {
        self.active.insert(self.events.sweep_key(idx));

        let prev = self.predecessor(idx);
        self.compute_fields(idx, prev);

        if let Some(next) = self.successor(idx) {
            if self.possible_intersection(idx, next)? == 2 {
                // The overlap re-classified edge kinds, which can change
                // whether these two edges are selected.
                self.compute_fields(idx, prev);
                self.compute_fields(next, Some(idx));
            }
        }

        // Re-derive the neighbor: the subdivision above may have replaced
        // sweep-line keys.
        let prev = self.predecessor(idx);
        if let Some(prev) = prev {
            if self.possible_intersection(prev, idx)? == 2 {
                let prev_prev = self.predecessor(prev);
                self.compute_fields(prev, prev_prev);
                self.compute_fields(idx, Some(prev));
            }
        }
        Ok(())
    }

    fn handle_right(&mut self, idx: EventIdx) -> Result<(), Error> {
        let left_idx = self.events[idx].other;
        let key = self.events.sweep_key(left_idx);
        if self.active.remove(&key) {
            // The retired edge's neighbors just became adjacent.
            let prev = self.prev_of_key(&key);
            let next = self.next_of_key(&key);
            if let (Some(prev), Some(next)) = (prev, next) {
                self.possible_intersection(prev, next)?;
            }
        }
        Ok(())
    }

    fn predecessor(&self, idx: EventIdx) -> Option<EventIdx> {
        self.prev_of_key(&self.events.sweep_key(idx))
    }

    fn successor(&self, idx: EventIdx) -> Option<EventIdx> {
        self.next_of_key(&self.events.sweep_key(idx))
    }

    fn prev_of_key(&self, key: &SweepKey) -> Option<EventIdx> {
        self.active
            .range((Bound::Unbounded, Bound::Excluded(key.clone())))
            .next_back()
            .map(|k| k.idx)
    }

    fn next_of_key(&self, key: &SweepKey) -> Option<EventIdx> {
        self.active
            .range((Bound::Excluded(key.clone()), Bound::Unbounded))
            .next()
            .map(|k| k.idx)
    }

    /// Fill in the inside/outside flags of a freshly inserted left event
    /// from its sweep-line predecessor, then decide selection.
    fn compute_fields(&mut self, idx: EventIdx, prev: Option<EventIdx>) {
        match prev {
            None => {
                // Nothing below: we are entering both polygons from the
                // outside.
                let e = &mut self.events[idx];
                e.in_out = false;
                e.other_in_out = true;
                e.prev_in_result = None;
            }
            Some(p) => {
                let prev_vertical = self.events.is_vertical(p);
                let (p_in_out, p_other_in_out, p_operand, p_in_result, p_prev_in_result) = {
                    let pe = &self.events[p];
                    (pe.in_out, pe.other_in_out, pe.operand, pe.in_result, pe.prev_in_result)
                };
                let e = &mut self.events[idx];
                if e.operand == p_operand {
                    e.in_out = !p_in_out;
                    e.other_in_out = p_other_in_out;
                } else {
                    e.in_out = !p_other_in_out;
                    e.other_in_out = if prev_vertical { !p_in_out } else { p_in_out };
                }
                e.prev_in_result = if !p_in_result || prev_vertical {
                    p_prev_in_result
                } else {
                    Some(p)
                };
            }
        }
        let selected = self.is_in_result(idx);
        self.events[idx].in_result = selected;
    }

    /// The selection table: should this edge appear in the output?
    fn is_in_result(&self, idx: EventIdx) -> bool {
        let e = &self.events[idx];
        match e.kind {
            EdgeKind::Normal => match self.op {
                Op::Intersection => !e.other_in_out,
                Op::Union => e.other_in_out,
                Op::Difference => match e.operand {
                    Operand::Subject => e.other_in_out,
                    Operand::Clipping => !e.other_in_out,
                },
                Op::Xor => true,
            },
            EdgeKind::SameTransition => matches!(self.op, Op::Intersection | Op::Union),
            EdgeKind::DifferentTransition => self.op == Op::Difference,
            EdgeKind::NonContributing => false,
        }
    }

    /// Check a newly adjacent pair of active edges (`a` below `b`) for an
    /// intersection, subdividing as needed.
    ///
    /// The return value distinguishes the collinear-overlap case (2), after
    /// which the caller must recompute the pair's flags because their edge
    /// kinds changed. Other values mirror the counting in the published
    /// algorithm and are otherwise unused.
    fn possible_intersection(&mut self, a: EventIdx, b: EventIdx) -> Result<u8, Error> {
        let sa = self.events.segment(a);
        let sb = self.events.segment(b);

        match intersect(&sa, &sb, self.snap_eps) {
            SegmentCrossing::None => Ok(0),
            SegmentCrossing::At(p) => {
                if self.events[a].point == self.events[b].point
                    || self.events[self.events[a].other].point
                        == self.events[self.events[b].other].point
                {
                    // A touch at a shared endpoint is not a crossing.
                    return Ok(0);
                }
                if p != sa.a && p != sa.b {
                    self.divide(a, p)?;
                }
                if p != sb.a && p != sb.b {
                    self.divide(b, p)?;
                }
                Ok(1)
            }
            SegmentCrossing::Overlap(_, _) => {
                let left_coincide = self.events[a].point == self.events[b].point;
                let a_right = self.events[a].other;
                let b_right = self.events[b].other;
                let right_coincide = self.events[a_right].point == self.events[b_right].point;

                if !left_coincide {
                    // The overlap starts at the later left endpoint. Split
                    // the earlier edge there; the leftover overlap is found
                    // again once the split halves are adjacent, with the
                    // left endpoints then coinciding.
                    let a_first = self.events.queue_key(a) < self.events.queue_key(b);
                    if a_first {
                        let p = self.events[b].point;
                        self.divide(a, p)?;
                    } else {
                        let p = self.events[a].point;
                        self.divide(b, p)?;
                    }
                    return Ok(3);
                }

                // Shared left endpoint.
                let a_kind = self.events[a].kind;
                if self.events[a].operand == self.events[b].operand {
                    // Two coincident edges of the same polygon cancel under
                    // even-odd counting: together they are no transition at
                    // all. This is how a seam between abutting contours, or
                    // a fully doubled-back contour, disappears.
                    self.events[b].kind = EdgeKind::NonContributing;
                    if a_kind == EdgeKind::NonContributing {
                        // The lower edge was already suppressed. If it was
                        // suppressed in favor of an other-polygon partner,
                        // this cancellation un-merges them: the partner is
                        // an ordinary edge again.
                        if let Some(p) = self.events[a].overlap_partner.take() {
                            self.events[p].kind = EdgeKind::Normal;
                            let restored = self.is_in_result(p);
                            self.events[p].in_result = restored;
                        }
                    } else if a_kind == EdgeKind::Normal {
                        self.events[a].kind = EdgeKind::NonContributing;
                    }
                } else if a_kind == EdgeKind::NonContributing
                    && self.events[a].overlap_partner.is_none()
                {
                    // The edges below are a canceled same-polygon pair;
                    // `b` overlaps nothing that still counts, so it keeps
                    // its own classification.
                } else {
                    // Across polygons, one edge stands for the pair and the
                    // other is marked non-contributing so the overlap is
                    // not counted twice.
                    let same = self.events[a].in_out == self.events[b].in_out;
                    self.events[b].kind = EdgeKind::NonContributing;
                    self.events[b].overlap_partner = Some(a);
                    self.events[a].kind = if same {
                        EdgeKind::SameTransition
                    } else {
                        EdgeKind::DifferentTransition
                    };
                }

                if !right_coincide {
                    // Split the longer edge at the shorter one's right end.
                    let a_ends_first =
                        self.events.queue_key(a_right) < self.events.queue_key(b_right);
                    if a_ends_first {
                        let p = self.events[a_right].point;
                        self.divide(b, p)?;
                    } else {
                        let p = self.events[b_right].point;
                        self.divide(a, p)?;
                    }
                }
                Ok(2)
            }
        }
    }

    /// Split the segment of left event `idx` at `p`, re-enqueueing the two
    /// new events.
    ///
    /// The division is skipped unless `left < p < right` holds in strict
    /// lexicographic order: after snapping, a would-be split at (or past)
    /// an endpoint does not shrink anything and would send the sweep into a
    /// loop on near-degenerate input.
    fn divide(&mut self, idx: EventIdx, p: crate::geom::Point) -> Result<(), Error> {
        let l = self.events[idx].point;
        let right_idx = self.events[idx].other;
        let r = self.events[right_idx].point;
        if !(l < p && p < r) {
            return Ok(());
        }
        if self.events.len() + 2 > self.event_budget {
            return Err(Error::NumericInstability);
        }

        #[cfg(feature = "slow-asserts")]
        debug_assert!(
            crate::geom::exact::point_near_line(&l, &r, &p, 1e-3, self.snap_eps),
            "division point {p:?} is far off segment {l:?} -- {r:?}"
        );

        let operand = self.events[idx].operand;
        // The left half keeps the original pair of endpoints' outer events;
        // the split point gets a fresh right event (twinned with `idx`) and
        // a fresh left event (twinned with the original right event).
        let new_right = self.events.alloc(p, false, idx, operand);
        let new_left = self.events.alloc(p, true, right_idx, operand);

        // The sweep-line key of `idx` embeds its right endpoint, which is
        // about to change.
        let was_active = self.active.remove(&self.events.sweep_key(idx));
        self.events[idx].other = new_right;
        self.events[right_idx].other = new_left;
        if was_active {
            self.active.insert(self.events.sweep_key(idx));
        }

        self.queue.push(Reverse(self.events.queue_key(new_right)));
        self.queue.push(Reverse(self.events.queue_key(new_left)));
        self.divisions += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;

    fn square(x0: f64, y0: f64, size: f64) -> Vec<(f64, f64)> {
        vec![
            (x0, y0),
            (x0 + size, y0),
            (x0 + size, y0 + size),
            (x0, y0 + size),
        ]
    }

    fn run_op(a: Vec<Vec<(f64, f64)>>, b: Vec<Vec<(f64, f64)>>, op: Op) -> (Events, Vec<EventIdx>) {
        let a = Polygon::from(a).sanitized().unwrap();
        let b = Polygon::from(b).sanitized().unwrap();
        run(&a, &b, op, 0.0).unwrap()
    }

    fn selected_segments(events: &Events, popped: &[EventIdx]) -> Vec<(Point, Point)> {
        let mut out = Vec::new();
        for &idx in popped {
            let e = &events[idx];
            if e.left && e.in_result {
                out.push((e.point, events[e.other].point));
            }
        }
        out
    }

    #[test]
    fn union_of_disjoint_squares_selects_everything() {
        let (events, popped) = run_op(
            vec![square(0.0, 0.0, 1.0)],
            vec![square(5.0, 0.0, 1.0)],
            Op::Union,
        );
        assert_eq!(selected_segments(&events, &popped).len(), 8);
    }

    #[test]
    fn intersection_of_disjoint_squares_selects_nothing() {
        let (events, popped) = run_op(
            vec![square(0.0, 0.0, 1.0)],
            vec![square(5.0, 0.0, 1.0)],
            Op::Intersection,
        );
        assert_eq!(selected_segments(&events, &popped).len(), 0);
    }

    #[test]
    fn overlapping_squares_are_subdivided() {
        // Squares overlapping in a unit square; each polygon's boundary is
        // crossed twice, so two edges of each get split.
        let (events, popped) = run_op(
            vec![square(0.0, 0.0, 2.0)],
            vec![square(1.0, 1.0, 2.0)],
            Op::Intersection,
        );
        let segs = selected_segments(&events, &popped);
        // The intersection is the unit square [1,2]x[1,2].
        assert_eq!(segs.len(), 4);
        for (l, r) in segs {
            for p in [l, r] {
                assert!((1.0..=2.0).contains(&p.x) && (1.0..=2.0).contains(&p.y));
            }
        }
    }

    #[test]
    fn identical_squares_union_keeps_one_copy() {
        let (events, popped) = run_op(
            vec![square(0.0, 0.0, 2.0)],
            vec![square(0.0, 0.0, 2.0)],
            Op::Union,
        );
        // Every edge is a full overlap: one side contributes (SameTransition),
        // the other does not.
        assert_eq!(selected_segments(&events, &popped).len(), 4);
    }

    #[test]
    fn identical_squares_difference_is_empty() {
        let (events, popped) = run_op(
            vec![square(0.0, 0.0, 2.0)],
            vec![square(0.0, 0.0, 2.0)],
            Op::Difference,
        );
        assert_eq!(selected_segments(&events, &popped).len(), 0);
    }

    #[test]
    fn no_active_segments_survive_the_sweep() {
        let (_, popped) = run_op(
            vec![square(0.0, 0.0, 2.0)],
            vec![square(1.0, 1.0, 2.0)],
            Op::Union,
        );
        // Each event shows up exactly once in the pop order.
        let mut seen = std::collections::HashSet::new();
        for idx in popped {
            assert!(seen.insert(idx));
        }
    }
}
