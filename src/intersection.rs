/*
 * The junction's control logic as a table-driven Moore machine.
 *
 * Each phase carries the complete lamp output for both legs and the
 * crossing, how long to hold that output, and the follow-up phase for every
 * possible detector sample. The table below is the entire behaviour of the
 * junction; the drive step never does anything except look it up. That also
 * means the safety properties (never two greens, the walk phase always
 * drains through the full don't-walk warning) are properties of the table,
 * checked by the tests, not enforced at run time.
 */

use enum_ordinalize::Ordinalize;

use crate::io::{CrossingLamps, Detections, Detectors, Dwell, Lamps, VehicleLamps};

#[derive(Ordinalize, Debug, PartialEq, Eq, Copy, Clone)]
#[repr(usize)]
pub enum Phase {
    // Vehicle phases: each leg gets a green, then an amber handover while
    // the controller decides who is served next.
    GoA,
    YieldA,
    GoB,
    YieldB,

    // The pedestrian phases: walk, then the don't-walk lamp flashes twice
    // before traffic resumes. The flash phases run on the timer alone and
    // pay no attention to the detectors.
    Walk,
    FlashOn1,
    FlashOff1,
    FlashOn2,
    FlashOff2,
}

impl Phase {
    pub const fn name(self) -> &'static str {
        match self {
            Phase::GoA => "go-A",
            Phase::YieldA => "yield-A",
            Phase::GoB => "go-B",
            Phase::YieldB => "yield-B",
            Phase::Walk => "walk",
            Phase::FlashOn1 => "flash-on-1",
            Phase::FlashOff1 => "flash-off-1",
            Phase::FlashOn2 => "flash-on-2",
            Phase::FlashOff2 => "flash-off-2",
        }
    }
}

struct Node {
    vehicle: VehicleLamps,
    pedestrian: CrossingLamps,
    dwell_millis: u64,
    // Indexed by `Detections::vector()`: pedestrian call in bit 2, vehicle
    // on leg B in bit 1, vehicle on leg A in bit 0. Eight entries, so every
    // sample has a defined follow-up phase.
    next: [Phase; 8],
}

const fn node(vehicle: u8, pedestrian: u8, dwell_millis: u64, next: [Phase; 8]) -> Node {
    Node {
        vehicle: VehicleLamps::from_bits(vehicle),
        pedestrian: CrossingLamps::from_bits(pedestrian),
        dwell_millis,
        next,
    }
}

/*
 * One row per phase, in ordinal order. The dwell values are tuned for bench
 * demos, not for a real street.
 */
static TABLE: [Node; Phase::VARIANT_COUNT] = {
    use Phase::*;
    [
        // go-A: hold the green until cross traffic or a pedestrian shows up
        node(0x0c, 0x02, 3000, [GoA, GoA, YieldA, YieldA, YieldA, YieldA, YieldA, YieldA]),
        // yield-A: amber on A, then hand over; a pedestrian call wins
        node(0x14, 0x02, 500, [GoB, GoB, GoB, GoB, Walk, Walk, GoB, GoB]),
        // go-B: hold the green until leg A or a pedestrian wants a turn
        node(0x21, 0x02, 3000, [GoB, YieldB, GoB, YieldB, YieldB, YieldB, YieldB, YieldB]),
        // yield-B: amber on B, then hand over; a pedestrian call wins
        node(0x22, 0x02, 500, [GoA, GoA, GoA, GoA, Walk, Walk, Walk, Walk]),
        // walk: both legs held at red, walk lamp on; the phase repeats
        // until a vehicle is waiting, with or without a fresh call
        node(0x24, 0x08, 3000, [Walk, FlashOn1, FlashOn1, FlashOn1, Walk, FlashOn1, FlashOn1, FlashOn1]),
        // the don't-walk warning: two on/off flashes, detectors ignored
        node(0x24, 0x02, 500, [FlashOff1; 8]),
        node(0x24, 0x00, 500, [FlashOn2; 8]),
        node(0x24, 0x02, 500, [FlashOff2; 8]),
        // last flash: traffic resumes on whichever leg is actually waiting
        node(0x24, 0x00, 500, [GoA, GoA, GoB, GoA, GoA, GoA, GoB, GoA]),
    ]
};

#[derive(Debug)]
pub struct Intersection {
    phase: Phase,
}

impl Intersection {
    pub const fn new() -> Self {
        Intersection { phase: Phase::GoA }
    }

    fn node(&self) -> &'static Node {
        &TABLE[self.phase.ordinal()]
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn vehicle_lamps(&self) -> VehicleLamps {
        self.node().vehicle
    }

    pub fn pedestrian_lamps(&self) -> CrossingLamps {
        self.node().pedestrian
    }

    pub fn dwell_millis(&self) -> u64 {
        self.node().dwell_millis
    }

    pub fn advance(&mut self, detections: Detections) {
        self.phase = self.node().next[detections.vector()];
    }

    /*
     * One full cycle: put the current phase's lamps up, hold them for the
     * phase's dwell, take a single detector sample and move to the phase
     * the table names for it. The caller loops this forever; tests call it
     * a bounded number of times.
     */
    pub async fn step(
        &mut self,
        lamps: &mut impl Lamps,
        dwell: &mut impl Dwell,
        detectors: &mut impl Detectors,
    ) {
        let node = self.node();

        lamps.apply(node.vehicle, node.pedestrian);
        dwell.hold_millis(node.dwell_millis).await;
        self.advance(detectors.sample());
    }
}
