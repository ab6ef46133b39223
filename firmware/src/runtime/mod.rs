use cortex_m::interrupt;
use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32 as hal;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Level, Output, Pull, Speed};
use embassy_sync::channel::Channel;
use signal_core::driver::CycleDriver;
use signal_core::phases::DwellConfig;

use crate::hw::LedSignalOutput;
use crate::signals::{CommandQueue, FirmwareInstant, PauseQueue};

mod console_task;
mod pause_task;
mod signal_task;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                interrupt::enable();
            }
        }
    }
}

/// Driver type owned by the controller task.
pub(super) type FirmwareDriver = CycleDriver<FirmwareInstant, LedSignalOutput<'static>>;

pub(super) static COMMAND_QUEUE: CommandQueue = Channel::new();
pub(super) static PAUSE_QUEUE: PauseQueue = Channel::new();

#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    let config = hal::Config::default();
    let hal::Peripherals {
        PA0,
        PA4,
        PA5,
        PB0,
        PB1,
        EXTI0,
        USART5,
        ..
    } = hal::init(config);

    let output = LedSignalOutput::new(
        Output::new(PA4, Level::Low, Speed::Low),
        Output::new(PA5, Level::Low, Speed::Low),
    );
    let driver = FirmwareDriver::new(output, DwellConfig::default());
    defmt::info!("signal: lamps initialized (red=PA4 green=PA5)");

    let button = ExtiInput::new(PA0, EXTI0, Pull::Up);
    defmt::info!("signal: pause button initialized (PA0)");

    spawner
        .spawn(signal_task::run(driver))
        .expect("failed to spawn signal controller task");

    spawner
        .spawn(pause_task::run(button))
        .expect("failed to spawn pause button task");

    spawner
        .spawn(console_task::run(USART5, PB0, PB1))
        .expect("failed to spawn console task");

    defmt::info!("signal: controller started; press the button to pause or resume");

    core::future::pending::<()>().await;
}
