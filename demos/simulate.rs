//! Drive a simulated MT9V022 through a worker thread: power on, configure,
//! toggle controls from several threads, then dump READ_MODE and check the
//! init table landed.
//!
//! Usage: RUST_LOG=debug cargo run --example simulate

use mt9v022::sim::{SimBus, SimPower};
use mt9v022::{registers, ControlId, MenuVariant, Sensor, SensorConfig, SensorWorker, WhiteBalance};
use std::sync::Arc;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> mt9v022::Result<()> {
    let bus = SimBus::with_chip_id(registers::CHIP_ID_REV3);
    let power = SimPower::new();
    let sensor = Sensor::with_config(bus.clone(), power.clone(), SensorConfig::from_env());

    let worker = Arc::new(SensorWorker::spawn(sensor)?);
    worker.power(true)?;

    let applied = worker.configure(640, 480)?;
    println!(
        "Requested 640x480, applied {} ({}x{})",
        applied.mode.label, applied.size.width, applied.size.height
    );

    let handles: Vec<_> = [ControlId::FlipX, ControlId::FlipY]
        .into_iter()
        .map(|id| {
            let worker = Arc::clone(&worker);
            std::thread::spawn(move || -> mt9v022::Result<()> {
                for value in [1, 0, 1] {
                    worker.set_control(id.raw(), value)?;
                }
                Ok(())
            })
        })
        .collect();
    for handle in handles {
        match handle.join() {
            Ok(result) => result?,
            Err(_) => eprintln!("control thread panicked"),
        }
    }

    worker.set_control(registers::CID_WHITE_BALANCE, WhiteBalance::Daylight.index() as i64)?;

    let state = worker.state()?;
    println!("Power:    {}", state.power);
    println!("Controls: {:?}", state.controls);
    println!(
        "READ_MODE = 0x{:04x}",
        bus.register(registers::REG_READ_MODE).unwrap_or(0)
    );
    println!("Power events: {:?}", power.events());

    // Power cycle: controls are restored, the applied mode is not.
    worker.power(false)?;
    worker.power(true)?;
    let state = worker.state()?;
    println!("After power cycle: applied={:?} controls={:?}", state.applied.map(|a| a.mode.label), state.controls);

    let worker = match Arc::try_unwrap(worker) {
        Ok(worker) => worker,
        Err(_) => return Ok(()),
    };
    worker.stop();

    let mut direct = Sensor::with_config(bus, SimPower::new(), SensorConfig::immediate());
    direct.power(true)?;
    direct.configure(320, 240)?;
    let mismatches = direct.verify_init()?;
    println!("Init table verified, {} mismatches", mismatches.len());
    Ok(())
}
