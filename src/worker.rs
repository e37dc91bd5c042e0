use crate::bus::RegisterBus;
use crate::error::{ConfigError, ControlError, IdentityError, PowerError};
use crate::power::PowerControl;
use crate::sensor::{AppliedMode, Sensor, SensorState};
use crate::types::{ChipId, FrameFormat};
use crate::{Mt9v022Error, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

type Reply<T> = Sender<T>;

enum Command {
    Power(bool, Reply<std::result::Result<(), PowerError>>),
    Configure(u32, u32, Reply<std::result::Result<AppliedMode, ConfigError>>),
    GetControl(u32, Reply<std::result::Result<i64, ControlError>>),
    SetControl(u32, i64, Reply<std::result::Result<(), ControlError>>),
    ProbeIdentity(Reply<std::result::Result<ChipId, IdentityError>>),
    Format(Reply<FrameFormat>),
    State(Reply<SensorState>),
}

/// A [`Sensor`] owned by a background thread.
///
/// Calls from any number of threads are queued on a bounded channel and
/// executed one at a time, so a control write can never interleave with a
/// configuration. The handle is `Send + Sync`; share it with an `Arc`.
pub struct SensorWorker {
    commands: Sender<Command>,
    stop_flag: Arc<AtomicBool>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl SensorWorker {
    /// Move `sensor` onto a new thread. The queue depth comes from the
    /// sensor's [`SensorConfig`](crate::SensorConfig).
    pub fn spawn<B, P>(sensor: Sensor<B, P>) -> Result<SensorWorker>
    where
        B: RegisterBus + Send + 'static,
        P: PowerControl + Send + 'static,
    {
        let (commands, receiver) = crossbeam_channel::bounded(sensor.config().command_queue.max(1));
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stop_clone = stop_flag.clone();

        let thread = std::thread::Builder::new()
            .name("mt9v022-sensor".into())
            .spawn(move || worker_loop(sensor, receiver, stop_clone))
            .map_err(|e| Mt9v022Error::WorkerSpawn(e.to_string()))?;

        Ok(SensorWorker {
            commands,
            stop_flag,
            thread: Some(thread),
        })
    }

    pub fn power(&self, on: bool) -> Result<()> {
        Ok(self.call(|reply| Command::Power(on, reply))??)
    }

    pub fn configure(&self, width: u32, height: u32) -> Result<AppliedMode> {
        Ok(self.call(|reply| Command::Configure(width, height, reply))??)
    }

    pub fn get_control(&self, id: u32) -> Result<i64> {
        Ok(self.call(|reply| Command::GetControl(id, reply))??)
    }

    pub fn set_control(&self, id: u32, value: i64) -> Result<()> {
        Ok(self.call(|reply| Command::SetControl(id, value, reply))??)
    }

    pub fn probe_identity(&self) -> Result<ChipId> {
        Ok(self.call(Command::ProbeIdentity)??)
    }

    pub fn format(&self) -> Result<FrameFormat> {
        self.call(Command::Format)
    }

    /// Snapshot of the sensor state.
    pub fn state(&self) -> Result<SensorState> {
        self.call(Command::State)
    }

    /// Check if the worker thread is still accepting commands.
    pub fn is_active(&self) -> bool {
        !self.stop_flag.load(Ordering::Relaxed)
    }

    /// Stop the worker and wait for the thread to finish.
    ///
    /// Commands already queued are dropped; their callers get
    /// [`Mt9v022Error::WorkerStopped`].
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn call<T>(&self, command: impl FnOnce(Reply<T>) -> Command) -> Result<T> {
        let (reply, response) = crossbeam_channel::bounded(1);
        self.commands
            .send(command(reply))
            .map_err(|_| Mt9v022Error::WorkerStopped)?;
        response.recv().map_err(|_| Mt9v022Error::WorkerStopped)
    }

    fn shutdown(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for SensorWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop<B: RegisterBus, P: PowerControl>(
    mut sensor: Sensor<B, P>,
    receiver: Receiver<Command>,
    stop_flag: Arc<AtomicBool>,
) {
    log::info!("Sensor worker started");

    loop {
        if stop_flag.load(Ordering::Relaxed) {
            log::info!("Sensor worker stopping (stop flag set)");
            break;
        }

        // 100ms timeout to periodically check the stop flag
        let command = match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(command) => command,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                log::info!("Sensor worker channel closed, stopping");
                break;
            }
        };

        // A caller that gave up waiting has dropped its reply receiver.
        let delivered = match command {
            Command::Power(on, reply) => reply.send(sensor.power(on)).is_ok(),
            Command::Configure(width, height, reply) => {
                reply.send(sensor.configure(width, height)).is_ok()
            }
            Command::GetControl(id, reply) => reply.send(sensor.get_control(id)).is_ok(),
            Command::SetControl(id, value, reply) => {
                reply.send(sensor.set_control(id, value)).is_ok()
            }
            Command::ProbeIdentity(reply) => reply.send(sensor.probe_identity()).is_ok(),
            Command::Format(reply) => reply.send(sensor.format()).is_ok(),
            Command::State(reply) => reply.send(*sensor.state()).is_ok(),
        };
        if !delivered {
            log::trace!("Sensor worker reply dropped");
        }
    }
}
