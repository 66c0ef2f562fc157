//! Property-based tests for the junction's transition table.
//!
//! These feed the state machine arbitrary detector sample sequences and
//! check that the safety properties of the table hold along every path.

use despi_m02_junction::intersection::{Intersection, Phase};
use despi_m02_junction::io::{Detections, Leg};
use proptest::prelude::*;

fn vectors() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..8, 1..128)
}

proptest! {
    #[test]
    fn conflicting_greens_never_show(vectors in vectors()) {
        let mut junction = Intersection::new();

        for vector in vectors {
            junction.advance(Detections::from_vector(vector));

            let lamps = junction.vehicle_lamps();
            prop_assert!(!(lamps.rag(Leg::A).green && lamps.rag(Leg::B).green));
        }
    }

    #[test]
    fn walk_lamp_implies_the_walk_phase(vectors in vectors()) {
        let mut junction = Intersection::new();

        for vector in vectors {
            junction.advance(Detections::from_vector(vector));

            if junction.pedestrian_lamps().crossing().walk {
                prop_assert_eq!(junction.phase(), Phase::Walk);
            }
        }
    }

    #[test]
    fn every_walk_exit_runs_the_full_warning(vectors in vectors()) {
        let mut junction = Intersection::new();
        let mut previous = junction.phase();

        for vector in vectors {
            junction.advance(Detections::from_vector(vector));
            let current = junction.phase();

            // leaving walk means entering the warning, and the warning runs
            // to its end no matter what the detectors say along the way
            match previous {
                Phase::Walk if current != Phase::Walk => {
                    prop_assert_eq!(current, Phase::FlashOn1)
                }
                Phase::FlashOn1 => prop_assert_eq!(current, Phase::FlashOff1),
                Phase::FlashOff1 => prop_assert_eq!(current, Phase::FlashOn2),
                Phase::FlashOn2 => prop_assert_eq!(current, Phase::FlashOff2),
                Phase::FlashOff2 => {
                    prop_assert!(current == Phase::GoA || current == Phase::GoB)
                }
                _ => {}
            }

            previous = current;
        }
    }
}
