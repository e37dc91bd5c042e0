//! Power a simulated MT9V022 on, check its chip id, and power it off.
//!
//! Usage: cargo run --example detect -- [chip-id-hex]

fn main() {
    env_logger::init();

    let raw = std::env::args()
        .nth(1)
        .map(|arg| u16::from_str_radix(arg.trim_start_matches("0x"), 16))
        .unwrap_or(Ok(mt9v022::registers::CHIP_ID_REV3));
    let raw = match raw {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Error: bad chip id: {}", e);
            std::process::exit(2);
        }
    };

    let bus = mt9v022::sim::SimBus::with_chip_id(raw);
    let mut sensor = mt9v022::Sensor::with_config(
        bus,
        mt9v022::sim::SimPower::new(),
        mt9v022::SensorConfig::from_env(),
    );

    match sensor.detect() {
        Ok(chip) => println!("Found {:?} (chip ID 0x{:04x})", chip, chip.raw()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
