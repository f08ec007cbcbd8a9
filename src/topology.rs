//! Chaining selected edges into closed contours, and sorting out which
//! contours are holes of which.

use crate::events::{EventIdx, Events};
use crate::polygon::Contour;

/// Assemble the edges selected by the sweep into closed contours.
///
/// `popped` is the queue order of every event; the selected subset is
/// re-sorted (subdivision can leave the pop order slightly stale with
/// respect to final segment geometry), numbered, and traversed: jump to the
/// twin of the current event, then to the next unprocessed event at the
/// same point. Events at one point are ordered bottom-up by the queue
/// order, so taking the first unprocessed one keeps the winding consistent
/// around the contour.
///
/// Hole classification rides on `prev_in_result`: if the nearest selected
/// edge below a contour's first event was traversed left-to-right, the new
/// contour sits inside it (a hole, or an island inside a hole — the depth
/// count settles which). Odd-depth contours are reversed, so outer rings
/// come out counter-clockwise and holes clockwise.
pub(crate) fn connect_edges(events: &mut Events, popped: &[EventIdx]) -> Vec<Contour> {
    let mut result: Vec<EventIdx> = popped
        .iter()
        .copied()
        .filter(|&idx| {
            let e = &events[idx];
            if e.left {
                e.in_result
            } else {
                events[e.other].in_result
            }
        })
        .collect();
    result.sort_by(|&x, &y| events.queue_key(x).cmp(&events.queue_key(y)));

    // After this, `pos` of each selected event is the index of its twin in
    // `result`, so the traversal below can hop across segments in O(1).
    for (i, &idx) in result.iter().enumerate() {
        events[idx].pos = i;
    }
    for &idx in &result {
        if !events[idx].left {
            let other = events[idx].other;
            let tmp = events[idx].pos;
            events[idx].pos = events[other].pos;
            events[other].pos = tmp;
        }
    }

    let mut processed = vec![false; result.len()];
    let mut contours: Vec<Contour> = Vec::new();
    let mut depth: Vec<usize> = Vec::new();
    let mut hole_of: Vec<Option<usize>> = Vec::new();

    for i in 0..result.len() {
        if processed[i] {
            continue;
        }

        let contour_id = contours.len();
        contours.push(Contour::default());
        depth.push(0);
        hole_of.push(None);

        if let Some(prev) = events[result[i]].prev_in_result {
            if let Some(lower_id) = events[prev].contour_id {
                if !events[prev].result_in_out {
                    // The edge below was traversed left-to-right, so its
                    // interior is above it: we are inside that contour.
                    contours[lower_id].add_hole(contour_id);
                    hole_of[contour_id] = Some(lower_id);
                    depth[contour_id] = depth[lower_id] + 1;
                    contours[contour_id].set_internal();
                } else if !contours[lower_id].is_external() {
                    // The contour below is itself a hole; we are a sibling
                    // island inside the same parent.
                    if let Some(parent) = hole_of[lower_id] {
                        contours[parent].add_hole(contour_id);
                        hole_of[contour_id] = Some(parent);
                    }
                    depth[contour_id] = depth[lower_id];
                    contours[contour_id].set_internal();
                }
            }
        }

        // Walk the chain until it comes back to the starting point.
        let initial = events[result[i]].point;
        contours[contour_id].points.push(initial);
        let mut pos = i;
        let mut steps = 0usize;
        while events[events[result[pos]].other].point != initial {
            steps += 1;
            if steps > result.len() {
                // A chain that fails to close means the selection was
                // topologically inconsistent (pathological input); emit
                // what we have rather than spinning.
                log::debug!("contour {contour_id} failed to close after {steps} steps");
                break;
            }
            processed[pos] = true;
            let idx = result[pos];
            if events[idx].left {
                events[idx].result_in_out = false;
                events[idx].contour_id = Some(contour_id);
            } else {
                let other = events[idx].other;
                events[other].result_in_out = true;
                events[other].contour_id = Some(contour_id);
            }
            pos = events[result[pos]].pos;
            processed[pos] = true;
            contours[contour_id].points.push(events[result[pos]].point);
            pos = next_pos(pos, &result, events, &processed);
        }

        processed[pos] = true;
        processed[events[result[pos]].pos] = true;
        let other = events[result[pos]].other;
        events[other].result_in_out = true;
        events[other].contour_id = Some(contour_id);

        if depth[contour_id] % 2 == 1 {
            contours[contour_id].reverse_orientation();
        }
    }

    contours
}

/// The next unprocessed event to continue a chain from: first scan upward
/// through the events at the same point, then fall back to the nearest
/// unprocessed event below.
fn next_pos(pos: usize, result: &[EventIdx], events: &Events, processed: &[bool]) -> usize {
    let point = events[result[pos]].point;
    let mut new_pos = pos + 1;
    while new_pos < result.len() && events[result[new_pos]].point == point {
        if !processed[new_pos] {
            return new_pos;
        }
        new_pos += 1;
    }
    let mut new_pos = pos;
    while new_pos > 0 {
        new_pos -= 1;
        if !processed[new_pos] {
            return new_pos;
        }
    }
    pos
}
