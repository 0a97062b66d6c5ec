//! Edge-triggered classification
//!
//! The classifier holds one of two states. A flagged condition emits exactly
//! one event; re-arming requires an intervening clear sample. Sampling
//! cadence belongs to the caller.

use gaze_analysis::Observation;
use serde::Serialize;
use tracing::debug;

use crate::{ViolationEvent, ViolationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassifierState {
    Clear,
    Flagged(ViolationKind),
}

/// Per-kind fire totals for diagnostics
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ViolationCounts {
    pub no_face: u32,
    pub multiple_faces: u32,
    pub looking_away: u32,
}

impl ViolationCounts {
    fn record(&mut self, kind: ViolationKind) {
        match kind {
            ViolationKind::NoFace => self.no_face += 1,
            ViolationKind::MultipleFaces => self.multiple_faces += 1,
            ViolationKind::LookingAway => self.looking_away += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.no_face + self.multiple_faces + self.looking_away
    }
}

/// Debouncing state machine over sampled observations
pub struct ViolationClassifier {
    state: ClassifierState,
    counts: ViolationCounts,
}

impl ViolationClassifier {
    pub fn new() -> Self {
        Self {
            state: ClassifierState::Clear,
            counts: ViolationCounts::default(),
        }
    }

    /// Highest-priority condition present in the observation
    fn classify(obs: &Observation) -> Option<ViolationKind> {
        if obs.multiple_faces() {
            Some(ViolationKind::MultipleFaces)
        } else if obs.looking_away() {
            Some(ViolationKind::LookingAway)
        } else if obs.no_face() {
            Some(ViolationKind::NoFace)
        } else {
            None
        }
    }

    /// Sample the latest observation.
    ///
    /// Emits only on the clear-to-flagged edge. Staying flagged emits
    /// nothing even when the condition kind changes, and clearing is silent.
    pub fn sample(&mut self, obs: &Observation) -> Option<ViolationEvent> {
        match (self.state, Self::classify(obs)) {
            (ClassifierState::Clear, Some(kind)) => {
                self.state = ClassifierState::Flagged(kind);
                self.counts.record(kind);
                debug!("violation fired: {:?}", kind);
                Some(ViolationEvent::now(kind))
            }
            (ClassifierState::Flagged(prev), Some(kind)) => {
                if prev != kind {
                    debug!("still flagged, condition now {:?}", kind);
                    self.state = ClassifierState::Flagged(kind);
                }
                None
            }
            (ClassifierState::Flagged(_), None) => {
                debug!("violation cleared");
                self.state = ClassifierState::Clear;
                None
            }
            (ClassifierState::Clear, None) => None,
        }
    }

    pub fn is_flagged(&self) -> bool {
        matches!(self.state, ClassifierState::Flagged(_))
    }

    pub fn counts(&self) -> ViolationCounts {
        self.counts
    }
}

impl Default for ViolationClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear() -> Observation {
        Observation::new(1, false, 0)
    }

    fn away() -> Observation {
        Observation::new(1, true, 0)
    }

    fn crowd() -> Observation {
        Observation::new(2, false, 0)
    }

    fn empty() -> Observation {
        Observation::new(0, false, 0)
    }

    #[test]
    fn test_fires_once_per_episode() {
        let mut classifier = ViolationClassifier::new();

        let event = classifier.sample(&away()).expect("first sample fires");
        assert_eq!(event.kind, ViolationKind::LookingAway);

        // Persisting condition stays silent.
        assert!(classifier.sample(&away()).is_none());
        assert!(classifier.sample(&away()).is_none());
        assert!(classifier.is_flagged());
        assert_eq!(classifier.counts().total(), 1);
    }

    #[test]
    fn test_rearms_only_through_clear() {
        let mut classifier = ViolationClassifier::new();

        assert!(classifier.sample(&away()).is_some());
        assert!(classifier.sample(&away()).is_none());

        // Clearing is silent.
        assert!(classifier.sample(&clear()).is_none());
        assert!(!classifier.is_flagged());

        let second = classifier.sample(&away()).expect("re-armed");
        assert_eq!(second.kind, ViolationKind::LookingAway);
        assert_eq!(classifier.counts().looking_away, 2);
    }

    #[test]
    fn test_kind_change_while_flagged_is_silent() {
        let mut classifier = ViolationClassifier::new();

        assert!(classifier.sample(&away()).is_some());
        // A second face appears before the gaze episode clears.
        assert!(classifier.sample(&crowd()).is_none());
        assert!(classifier.sample(&empty()).is_none());
        assert!(classifier.is_flagged());
        assert_eq!(classifier.counts().total(), 1);
    }

    #[test]
    fn test_multiple_faces_wins_priority() {
        let mut classifier = ViolationClassifier::new();

        // Two faces and an averted gaze at once.
        let both = Observation::new(2, true, 0);
        let event = classifier.sample(&both).unwrap();
        assert_eq!(event.kind, ViolationKind::MultipleFaces);
    }

    #[test]
    fn test_no_face_fires() {
        let mut classifier = ViolationClassifier::new();
        let event = classifier.sample(&empty()).unwrap();
        assert_eq!(event.kind, ViolationKind::NoFace);
        assert_eq!(classifier.counts().no_face, 1);
    }
}
