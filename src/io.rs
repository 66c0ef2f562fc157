/*
 * Types and contracts for the junction's sense/actuate boundary.
 *
 * The state machine core only ever speaks the types in this module: two
 * bit-packed lamp patterns going out, one three-bit detector sample coming
 * in. The bit layouts match the lamp and detector wiring, so a pattern can
 * be written to the port as-is or unpacked into per-head `Rag` values, and
 * both directions agree.
 *
 * The traits at the bottom are the three collaborators the drive loop needs.
 * On the board they are backed by GPIO and the timer, in the tests by fakes,
 * so nothing in the core ever touches a pin directly.
 */

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Leg {
    A,
    B,
}

/*
 * One red/amber/green lamp head, as plain on/off logic. Active-high or
 * active-low is for the pin driver to sort out.
 */
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct Rag {
    pub red: bool,
    pub amber: bool,
    pub green: bool,
}

impl Rag {
    pub const fn new(red: bool, amber: bool, green: bool) -> Self {
        Self { red, amber, green }
    }
}

/*
 * The walk/don't-walk lamp pair. Both off is a valid intermediate while the
 * don't-walk lamp flashes; both on never happens.
 */
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct Crossing {
    pub walk: bool,
    pub dont_walk: bool,
}

const A_RED: u8 = 0x20;
const A_AMBER: u8 = 0x10;
const A_GREEN: u8 = 0x08;
const B_RED: u8 = 0x04;
const B_AMBER: u8 = 0x02;
const B_GREEN: u8 = 0x01;

/*
 * The six vehicle lamps of both legs, packed the way the lamp port is wired:
 * leg A in bits 5..3, leg B in bits 2..0, red/amber/green from high to low.
 */
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct VehicleLamps(u8);

impl VehicleLamps {
    pub const fn from_bits(bits: u8) -> Self {
        VehicleLamps(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn rag(self, leg: Leg) -> Rag {
        match leg {
            Leg::A => Rag::new(
                self.0 & A_RED != 0,
                self.0 & A_AMBER != 0,
                self.0 & A_GREEN != 0,
            ),
            Leg::B => Rag::new(
                self.0 & B_RED != 0,
                self.0 & B_AMBER != 0,
                self.0 & B_GREEN != 0,
            ),
        }
    }

    pub const fn from_rags(a: Rag, b: Rag) -> Self {
        let mut bits = 0;
        if a.red {
            bits |= A_RED;
        }
        if a.amber {
            bits |= A_AMBER;
        }
        if a.green {
            bits |= A_GREEN;
        }
        if b.red {
            bits |= B_RED;
        }
        if b.amber {
            bits |= B_AMBER;
        }
        if b.green {
            bits |= B_GREEN;
        }
        VehicleLamps(bits)
    }
}

const WALK: u8 = 0x08;
const DONT_WALK: u8 = 0x02;

// The pedestrian lamps, packed the way the crossing port is wired: walk in
// bit 3, don't-walk in bit 1.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct CrossingLamps(u8);

impl CrossingLamps {
    pub const fn from_bits(bits: u8) -> Self {
        CrossingLamps(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn walk(self) -> bool {
        self.0 & WALK != 0
    }

    pub const fn crossing(self) -> Crossing {
        Crossing {
            walk: self.0 & WALK != 0,
            dont_walk: self.0 & DONT_WALK != 0,
        }
    }

    pub const fn from_crossing(crossing: Crossing) -> Self {
        let mut bits = 0;
        if crossing.walk {
            bits |= WALK;
        }
        if crossing.dont_walk {
            bits |= DONT_WALK;
        }
        CrossingLamps(bits)
    }
}

/*
 * One detector sample: the latched pedestrian call plus the two vehicle
 * presence detectors. `vector` packs the sample into the three-bit value
 * that indexes a phase's transition row, call in bit 2, leg B in bit 1,
 * leg A in bit 0. Since the packing is built from three booleans, the
 * vector can never fall outside the row.
 */
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct Detections {
    pub pedestrian_call: bool,
    pub vehicle_b: bool,
    pub vehicle_a: bool,
}

impl Detections {
    pub const fn vector(self) -> usize {
        ((self.pedestrian_call as usize) << 2)
            | ((self.vehicle_b as usize) << 1)
            | (self.vehicle_a as usize)
    }

    pub const fn from_vector(bits: u8) -> Self {
        Detections {
            pedestrian_call: bits & 0x04 != 0,
            vehicle_b: bits & 0x02 != 0,
            vehicle_a: bits & 0x01 != 0,
        }
    }
}

// Writes both lamp patterns out. Must not block and must not fail; writing
// the same patterns twice is harmless.
pub trait Lamps {
    fn apply(&mut self, vehicle: VehicleLamps, pedestrian: CrossingLamps);
}

// Reads the detectors as they are right now. Must not block.
pub trait Detectors {
    fn sample(&mut self) -> Detections;
}

// Holds the calling task for the given number of milliseconds. The drive
// loop does nothing else while this runs.
#[allow(async_fn_in_trait)]
pub trait Dwell {
    async fn hold_millis(&mut self, millis: u64);
}
