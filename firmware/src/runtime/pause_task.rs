use embassy_stm32::exti::ExtiInput;
use embassy_time::Timer;
use signal_core::pause::PAUSE_DEBOUNCE;

use super::PAUSE_QUEUE;
use crate::signals::PauseEdge;

/// Debounces the active-low pause button and forwards one edge per press.
#[embassy_executor::task]
pub async fn run(mut button: ExtiInput<'static>) -> ! {
    let settle = embassy_time::Duration::from_millis(
        u64::try_from(PAUSE_DEBOUNCE.as_millis()).unwrap_or(u64::MAX),
    );
    let sender = PAUSE_QUEUE.sender();

    loop {
        button.wait_for_falling_edge().await;
        Timer::after(settle).await;
        if button.is_high() {
            continue;
        }

        if sender.try_send(PauseEdge).is_err() {
            defmt::warn!("pause: edge dropped, controller busy");
        }

        button.wait_for_high().await;
        Timer::after(settle).await;
    }
}
