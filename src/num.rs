//! A thin `Ord` wrapper for `f64`.

/// A wrapper for `f64` that implements `Ord`.
///
/// Unlike the more careful wrappers in the `ordered_float` crate, this one
/// neither orders NaNs nor guards against them on construction; it just
/// treats them as equal to everything. We can get away with that because
/// non-finite coordinates are rejected at the public API boundary, so the
/// comparators in the event queue and the sweep-line never see one, and
/// skipping the per-comparison checks matters in the sweep hot loop.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub(crate) struct OrdFloat(f64);

impl OrdFloat {
    /// Retrieve the inner `f64`.
    #[allow(dead_code)]
    pub fn into_inner(self) -> f64 {
        self.0
    }
}

impl From<f64> for OrdFloat {
    fn from(value: f64) -> Self {
        OrdFloat(value)
    }
}

impl Eq for OrdFloat {}

impl PartialOrd for OrdFloat {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrdFloat {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if self.0 < other.0 {
            std::cmp::Ordering::Less
        } else if self.0 > other.0 {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    }
}
