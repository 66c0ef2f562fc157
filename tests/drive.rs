/*
 * Drives the state machine through whole cycles with fakes standing in for
 * the board. These tests pin down the cycle discipline: one lamp write, one
 * dwell and one detector sample per cycle, in that order, with the dwell
 * values the table prescribes.
 */

use despi_m02_junction::intersection::{Intersection, Phase};
use despi_m02_junction::io::{CrossingLamps, Detections, Detectors, Dwell, Lamps, VehicleLamps};
use embassy_futures::block_on;

#[derive(Default)]
struct RecordingLamps {
    writes: Vec<(u8, u8)>,
}

impl Lamps for RecordingLamps {
    fn apply(&mut self, vehicle: VehicleLamps, pedestrian: CrossingLamps) {
        self.writes.push((vehicle.bits(), pedestrian.bits()));
    }
}

#[derive(Default)]
struct RecordingDwell {
    holds: Vec<u64>,
}

impl Dwell for RecordingDwell {
    async fn hold_millis(&mut self, millis: u64) {
        self.holds.push(millis);
    }
}

// Plays back a fixed list of detector samples, then reports a quiet
// junction forever.
struct ScriptedDetectors {
    script: Vec<u8>,
    samples: usize,
}

impl ScriptedDetectors {
    fn new(script: &[u8]) -> Self {
        Self {
            script: script.to_vec(),
            samples: 0,
        }
    }
}

impl Detectors for ScriptedDetectors {
    fn sample(&mut self) -> Detections {
        let vector = self.script.get(self.samples).copied().unwrap_or(0);
        self.samples += 1;
        Detections::from_vector(vector)
    }
}

#[test]
fn each_cycle_writes_once_waits_once_and_samples_once() {
    let mut junction = Intersection::new();
    let mut lamps = RecordingLamps::default();
    let mut dwell = RecordingDwell::default();
    let mut detectors = ScriptedDetectors::new(&[2, 0, 1, 4, 0]);

    block_on(async {
        for _ in 0..5 {
            junction.step(&mut lamps, &mut dwell, &mut detectors).await;
        }
    });

    assert_eq!(lamps.writes.len(), 5);
    assert_eq!(dwell.holds.len(), 5);
    assert_eq!(detectors.samples, 5);
}

#[test]
fn pedestrian_service_runs_the_documented_lamp_and_dwell_sequence() {
    let mut junction = Intersection::new();
    let mut lamps = RecordingLamps::default();
    let mut dwell = RecordingDwell::default();

    // the call is latched during go-A and yield-A and gone once walk is
    // granted; a vehicle pulling up on leg B ends the walk phase
    let mut detectors = ScriptedDetectors::new(&[4, 4, 2, 0, 0, 0, 0]);

    block_on(async {
        for _ in 0..7 {
            junction.step(&mut lamps, &mut dwell, &mut detectors).await;
        }
    });

    assert_eq!(
        lamps.writes,
        vec![
            (0x0c, 0x02), // go-A
            (0x14, 0x02), // yield-A
            (0x24, 0x08), // walk
            (0x24, 0x02), // flash-on-1
            (0x24, 0x00), // flash-off-1
            (0x24, 0x02), // flash-on-2
            (0x24, 0x00), // flash-off-2
        ]
    );
    assert_eq!(dwell.holds, vec![3000, 500, 3000, 500, 500, 500, 500]);
    assert_eq!(junction.phase(), Phase::GoA);
}

#[test]
fn an_empty_junction_keeps_leg_a_green_for_good() {
    let mut junction = Intersection::new();
    let mut lamps = RecordingLamps::default();
    let mut dwell = RecordingDwell::default();
    let mut detectors = ScriptedDetectors::new(&[]);

    block_on(async {
        for _ in 0..1000 {
            junction.step(&mut lamps, &mut dwell, &mut detectors).await;
        }
    });

    assert_eq!(junction.phase(), Phase::GoA);
    assert!(lamps.writes.iter().all(|write| *write == (0x0c, 0x02)));
    assert!(dwell.holds.iter().all(|hold| *hold == 3000));
}
