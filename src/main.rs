#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

/*
 * Board side of the junction controller. All pin handling lives here, the
 * control logic itself is in the library and never sees a peripheral.
 *
 * Built for the board this wires the lamp heads, the two vehicle presence
 * detectors and the pedestrian call button to the state machine and runs it
 * forever. Built for the host it runs one pedestrian service cycle against
 * scripted detections and prints what the lamps would do, which is handy at
 * the desk when the board is not around.
 */

#[cfg(target_os = "none")]
mod board {
    use despi_m02_junction::intersection::Intersection;
    use despi_m02_junction::io::{
        CrossingLamps, Detections, Detectors, Dwell, Lamps, Leg, Rag, VehicleLamps,
    };
    use embassy_executor::Spawner;
    use embassy_stm32::exti::{Channel, ExtiInput};
    use embassy_stm32::gpio::{Input, Level, Output, Pin, Pull, Speed};
    use embassy_stm32::usart::{Config, Uart};
    use embassy_stm32::{bind_interrupts, peripherals, usart};
    use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
    use embassy_sync::signal::Signal;
    use embassy_time::Timer;
    use panic_halt as _;

    // A button press is over in an instant, but the next detector sample can
    // be a full green phase away. Latch the press here and drop the latch
    // once the walk lamp has actually been granted.
    static PEDESTRIAN_CALL: Signal<ThreadModeRawMutex, ()> = Signal::new();

    const DEBOUNCE_MILLIS: u64 = 50;

    #[embassy_executor::task]
    async fn pedestrian_button_task(mut button: ExtiInput<'static>) -> ! {
        loop {
            button.wait_for_falling_edge().await;
            PEDESTRIAN_CALL.signal(());

            // swallow contact bounce before re-arming the edge detector
            Timer::after_millis(DEBOUNCE_MILLIS).await;
        }
    }

    // Deal with active-high or active-low, so that the state machine can just
    // use easy to understand `true` for on logic.
    fn light(led: &mut Output, on: bool) {
        led.set_level(if on { Level::High } else { Level::Low });
    }

    fn light_head(outputs: &mut [Output; 3], rag: Rag) {
        light(&mut outputs[0], rag.red);
        light(&mut outputs[1], rag.amber);
        light(&mut outputs[2], rag.green);
    }

    struct BoardLamps {
        leg_a: [Output<'static>; 3],
        leg_b: [Output<'static>; 3],
        walk: Output<'static>,
        dont_walk: Output<'static>,
    }

    impl Lamps for BoardLamps {
        fn apply(&mut self, vehicle: VehicleLamps, pedestrian: CrossingLamps) {
            light_head(&mut self.leg_a, vehicle.rag(Leg::A));
            light_head(&mut self.leg_b, vehicle.rag(Leg::B));

            let crossing = pedestrian.crossing();
            light(&mut self.walk, crossing.walk);
            light(&mut self.dont_walk, crossing.dont_walk);

            // granting the walk phase consumes the latched call
            if crossing.walk {
                PEDESTRIAN_CALL.reset();
            }
        }
    }

    struct BoardDetectors {
        vehicle_a: Input<'static>,
        vehicle_b: Input<'static>,
    }

    impl Detectors for BoardDetectors {
        fn sample(&mut self) -> Detections {
            Detections {
                pedestrian_call: PEDESTRIAN_CALL.signaled(),
                vehicle_b: self.vehicle_b.is_high(),
                vehicle_a: self.vehicle_a.is_high(),
            }
        }
    }

    struct BoardDwell;

    impl Dwell for BoardDwell {
        async fn hold_millis(&mut self, millis: u64) {
            Timer::after_millis(millis).await;
        }
    }

    #[embassy_executor::main]
    async fn main(spawner: Spawner) {
        let peripherals = embassy_stm32::init(Default::default());

        bind_interrupts!(struct Irqs {
            USART1 => usart::InterruptHandler<peripherals::USART1>;
        });
        let mut usart = Uart::new(
            peripherals.USART1,
            peripherals.PA10,
            peripherals.PA9,
            Irqs,
            peripherals.DMA1_CH4,
            peripherals.DMA1_CH5,
            Config::default(), // 115200 baud
        )
        .unwrap();

        let mut lamps = BoardLamps {
            leg_a: [
                Output::new(peripherals.PE1.degrade(), Level::High, Speed::Low),
                Output::new(peripherals.PB9.degrade(), Level::Low, Speed::Low),
                Output::new(peripherals.PB7.degrade(), Level::Low, Speed::Low),
            ],
            leg_b: [
                Output::new(peripherals.PB6.degrade(), Level::High, Speed::Low),
                Output::new(peripherals.PB8.degrade(), Level::Low, Speed::Low),
                Output::new(peripherals.PE0.degrade(), Level::Low, Speed::Low),
            ],
            walk: Output::new(peripherals.PE8.degrade(), Level::Low, Speed::Low),
            dont_walk: Output::new(peripherals.PE9.degrade(), Level::High, Speed::Low),
        };

        let mut detectors = BoardDetectors {
            vehicle_a: Input::new(peripherals.PE4.degrade(), Pull::Down),
            vehicle_b: Input::new(peripherals.PE5.degrade(), Pull::Down),
        };

        let button = ExtiInput::new(
            peripherals.PE11.degrade(),
            peripherals.EXTI11.degrade(),
            Pull::Up,
        );
        spawner.spawn(pedestrian_button_task(button)).unwrap();

        let mut dwell = BoardDwell;
        let mut junction = Intersection::new();

        loop {
            usart.write(junction.phase().name().as_bytes()).await.unwrap();
            usart.write(b"\n").await.unwrap();

            junction.step(&mut lamps, &mut dwell, &mut detectors).await;
        }
    }
}

#[cfg(not(target_os = "none"))]
mod desk {
    use despi_m02_junction::intersection::{Intersection, Phase};
    use despi_m02_junction::io::{
        CrossingLamps, Detections, Detectors, Dwell, Lamps, Leg, Rag, VehicleLamps,
    };

    struct PrintedLamps;

    fn head(rag: Rag) -> &'static str {
        match (rag.red, rag.amber, rag.green) {
            (true, false, false) => "red",
            (false, true, false) => "amber",
            (false, false, true) => "green",
            _ => "?",
        }
    }

    impl Lamps for PrintedLamps {
        fn apply(&mut self, vehicle: VehicleLamps, pedestrian: CrossingLamps) {
            let crossing = pedestrian.crossing();
            println!(
                "  A {:5}  B {:5}  walk {:3}  don't-walk {:3}",
                head(vehicle.rag(Leg::A)),
                head(vehicle.rag(Leg::B)),
                if crossing.walk { "on" } else { "off" },
                if crossing.dont_walk { "on" } else { "off" },
            );
        }
    }

    struct PrintedDwell;

    impl Dwell for PrintedDwell {
        async fn hold_millis(&mut self, millis: u64) {
            println!("  ... {} ms", millis);
        }
    }

    // Stands in for the street: the call button is pressed until the walk
    // is granted, then a vehicle waits on leg B. The walk phase only ends
    // once a vehicle is actually waiting, so without that car the demo
    // would sit on the walk lamp forever.
    struct DeskDetectors {
        call: bool,
        vehicle_b: bool,
    }

    impl Detectors for DeskDetectors {
        fn sample(&mut self) -> Detections {
            Detections {
                pedestrian_call: self.call,
                vehicle_b: self.vehicle_b,
                vehicle_a: false,
            }
        }
    }

    pub fn run() {
        let mut junction = Intersection::new();
        let mut lamps = PrintedLamps;
        let mut dwell = PrintedDwell;
        let mut detectors = DeskDetectors {
            call: true,
            vehicle_b: false,
        };

        embassy_futures::block_on(async {
            for _ in 0..8 {
                println!("[{}]", junction.phase().name());
                junction.step(&mut lamps, &mut dwell, &mut detectors).await;

                if junction.phase() == Phase::Walk {
                    detectors.call = false;
                    detectors.vehicle_b = true;
                }
            }
        });
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    desk::run();
}
