use embassy_futures::select::{Either3, select3};
use embassy_time::Timer;

use super::{COMMAND_QUEUE, FirmwareDriver, PAUSE_QUEUE};
use crate::signals::{CommandConsumer, FirmwareInstant};
use crate::{status, telemetry};

/// Owns the cycle driver; every state change in the firmware happens here.
#[embassy_executor::task]
pub async fn run(mut driver: FirmwareDriver) -> ! {
    let mut commands = CommandConsumer::new(COMMAND_QUEUE.receiver());
    let pauses = PAUSE_QUEUE.receiver();

    let mut deadline = driver.start(FirmwareInstant::now());
    let mut logged = telemetry::log_records_from(driver.telemetry(), 0);
    status::publish(&driver.status());

    loop {
        let dwell = async move {
            match deadline {
                Some(at) => Timer::at(at.into_embassy()).await,
                None => core::future::pending::<()>().await,
            }
        };

        match select3(dwell, commands.receive(), pauses.receive()).await {
            Either3::First(()) => {
                deadline = driver.poll(FirmwareInstant::now());
            }
            Either3::Second(line) => {
                let now = FirmwareInstant::now();
                // Rejections are logged from telemetry below.
                let _ = driver.submit_line(&line, now);
                if driver.drain_commands(&mut commands, now).is_err() {
                    defmt::warn!("console: command queue disconnected");
                }
            }
            Either3::Third(_) => {
                driver.toggle_pause(FirmwareInstant::now());
                deadline = driver.next_deadline();
            }
        }

        logged = telemetry::log_records_from(driver.telemetry(), logged);
        status::publish(&driver.status());
    }
}
