use std::fmt;

/// Statistics derived from one frame transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub average_brightness: i64,
    pub movement_score: i64,
}

#[derive(Debug, PartialEq, Eq)]
pub enum DeltaError {
    LengthMismatch { new: usize, stored: usize },
}

impl fmt::Display for DeltaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeltaError::LengthMismatch { new, stored } => write!(
                f,
                "frame length changed without a store resize: new {new} bytes, stored {stored}"
            ),
        }
    }
}

impl std::error::Error for DeltaError {}

/// Compare a frame against the previously stored one.
///
/// Both buffers are walked in lock-step over non-overlapping 3-byte
/// triplets. Per triplet the channel distances are averaged, and only the
/// excess of that average over `cutoff` contributes to the movement score,
/// so sub-threshold noise is fully suppressed while stronger motion counts
/// in proportion to its magnitude. Brightness is the mean of the per-triplet
/// sample means. All division is integer division, and a trailing partial
/// triplet is ignored.
///
/// Single-channel intensity frames go through the same triplet stride as
/// RGB; the scores stay comparable with what RGB frames produce.
///
/// # Errors
///
/// Returns `DeltaError::LengthMismatch` when the buffers differ in length.
/// The caller resizes the store before comparing, never after.
pub fn compare(new: &[u8], stored: &[u8], cutoff: i64) -> Result<FrameStats, DeltaError> {
    if new.len() != stored.len() {
        return Err(DeltaError::LengthMismatch {
            new: new.len(),
            stored: stored.len(),
        });
    }

    let mut brightness_sum: i64 = 0;
    let mut movement_score: i64 = 0;
    let mut triplet_count: i64 = 0;

    for (n, o) in new.chunks_exact(3).zip(stored.chunks_exact(3)) {
        let channel_diff = ((i64::from(n[0]) - i64::from(o[0])).abs()
            + (i64::from(n[1]) - i64::from(o[1])).abs()
            + (i64::from(n[2]) - i64::from(o[2])).abs())
            / 3;

        brightness_sum += (i64::from(n[0]) + i64::from(n[1]) + i64::from(n[2])) / 3;

        if channel_diff > cutoff {
            movement_score += channel_diff - cutoff;
        }

        triplet_count += 1;
    }

    Ok(FrameStats {
        average_brightness: average(brightness_sum, triplet_count),
        movement_score,
    })
}

/// Statistics for a frame with no usable predecessor: the first frame ever,
/// or the first after a format change. The comparison is skipped; brightness
/// comes from the frame alone and movement is zero.
pub fn baseline(new: &[u8]) -> FrameStats {
    let mut brightness_sum: i64 = 0;
    let mut triplet_count: i64 = 0;

    for n in new.chunks_exact(3) {
        brightness_sum += (i64::from(n[0]) + i64::from(n[1]) + i64::from(n[2])) / 3;
        triplet_count += 1;
    }

    FrameStats {
        average_brightness: average(brightness_sum, triplet_count),
        movement_score: 0,
    }
}

fn average(sum: i64, count: i64) -> i64 {
    if count == 0 { 0 } else { sum / count }
}
