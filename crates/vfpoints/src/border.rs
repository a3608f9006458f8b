//! Replicate padding of unresolved frames at the ends of a trajectory.

use crate::Sample;

/// Fill the leading and trailing `None` runs with the nearest resolved sample.
///
/// Interior gaps are left alone. A trajectory with no resolved sample at all
/// is returned unchanged.
pub fn fill_border(samples: &[Sample]) -> Vec<Sample> {
    let mut out = samples.to_vec();
    let Some(first) = samples.iter().position(Option::is_some) else {
        return out;
    };
    // `first` exists, so `last` does too.
    let last = samples.iter().rposition(Option::is_some).unwrap_or(first);

    let head = samples[first];
    out[..first].fill(head);
    let tail = samples[last];
    out[last + 1..].fill(tail);
    out
}

/// Number of samples `fill_border` would synthesize.
pub(crate) fn border_len(samples: &[Sample]) -> usize {
    match samples.iter().position(Option::is_some) {
        Some(first) => {
            let last = samples.iter().rposition(Option::is_some).unwrap_or(first);
            first + (samples.len() - 1 - last)
        }
        None => 0,
    }
}
