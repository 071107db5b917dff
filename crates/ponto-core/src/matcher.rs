use crate::types::{Descriptor, Identity};

/// The nearest identity to a probe descriptor, with its distance.
#[derive(Debug, Clone)]
pub struct BestMatch<'a> {
    pub identity: &'a Identity,
    pub distance: f32,
}

/// Strategy for finding the closest enrolled identity to a probe descriptor.
///
/// Whether the distance is close *enough* is the caller's decision; the
/// matcher only reports the minimum.
pub trait Matcher {
    fn find_best<'a>(
        &self,
        probe: &Descriptor,
        candidates: &'a [Identity],
    ) -> Option<BestMatch<'a>>;
}

/// Exact nearest-neighbor matcher: full linear scan, no early termination.
///
/// Candidates whose stored descriptor does not match the probe's length are
/// skipped, not treated as errors. Strict `<` comparison keeps the first
/// candidate at the minimum distance, so ties resolve deterministically in
/// the candidates' read order.
pub struct NearestMatcher;

impl Matcher for NearestMatcher {
    fn find_best<'a>(
        &self,
        probe: &Descriptor,
        candidates: &'a [Identity],
    ) -> Option<BestMatch<'a>> {
        let mut best: Option<BestMatch<'a>> = None;

        for identity in candidates {
            if identity.descriptor.values.len() != probe.values.len() {
                continue;
            }

            let distance = probe.euclidean_distance(&identity.descriptor);
            let is_better = match &best {
                None => true,
                Some(prev) => distance < prev.distance,
            };
            if is_better {
                best = Some(BestMatch { identity, distance });
            }
        }

        best
    }
}
