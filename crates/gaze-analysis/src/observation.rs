//! Per-frame behavioral observation

use serde::Serialize;

/// What one analyzed frame says about the candidate.
///
/// Built only through [`Observation::new`], which pins the invariants:
/// `multiple_faces` tracks `face_count`, and an empty frame can never claim
/// an averted gaze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Observation {
    face_count: usize,
    multiple_faces: bool,
    looking_away: bool,
    timestamp_ms: u64,
}

impl Observation {
    pub fn new(face_count: usize, looking_away: bool, timestamp_ms: u64) -> Self {
        Self {
            face_count,
            multiple_faces: face_count > 1,
            looking_away: looking_away && face_count > 0,
            timestamp_ms,
        }
    }

    /// An observation of an empty frame
    pub fn empty(timestamp_ms: u64) -> Self {
        Self::new(0, false, timestamp_ms)
    }

    pub fn face_count(&self) -> usize {
        self.face_count
    }

    pub fn no_face(&self) -> bool {
        self.face_count == 0
    }

    pub fn multiple_faces(&self) -> bool {
        self.multiple_faces
    }

    pub fn looking_away(&self) -> bool {
        self.looking_away
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_frame_cannot_look_away() {
        let obs = Observation::new(0, true, 42);
        assert!(obs.no_face());
        assert!(!obs.looking_away());
        assert!(!obs.multiple_faces());
    }

    proptest! {
        #[test]
        fn prop_invariants_hold(face_count in 0usize..5, looking_away: bool, ts: u64) {
            let obs = Observation::new(face_count, looking_away, ts);
            prop_assert_eq!(obs.multiple_faces(), face_count > 1);
            prop_assert_eq!(obs.no_face(), face_count == 0);
            if face_count == 0 {
                prop_assert!(!obs.looking_away());
            } else {
                prop_assert_eq!(obs.looking_away(), looking_away);
            }
        }
    }
}
