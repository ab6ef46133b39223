use embassy_stm32 as hal;
use embassy_stm32::Peri;
use embassy_stm32::usart::{BufferedUart, Config as UartConfig, DataBits, Parity, StopBits};
use embassy_time::{Duration, Timer};
use embedded_io_async::{Read, Write};
use signal_core::console::{CommandQueueProducer, LineAssembler, MAX_LINE_LEN};
use static_cell::StaticCell;

use super::COMMAND_QUEUE;
use crate::signals::CommandProducer;
use crate::signals::console::{ConsoleOutcome, LineVerdict, render_reply, screen};
use crate::{status, telemetry};

const CONSOLE_UART_BAUD: u32 = 115_200;
const CONSOLE_UART_BUFFER_SIZE: usize = MAX_LINE_LEN * 2;

static UART_TX_BUFFER: StaticCell<[u8; CONSOLE_UART_BUFFER_SIZE]> = StaticCell::new();
static UART_RX_BUFFER: StaticCell<[u8; CONSOLE_UART_BUFFER_SIZE]> = StaticCell::new();

embassy_stm32::bind_interrupts!(struct UartIrqs {
    USART3_4_5_6_LPUART1 => embassy_stm32::usart::BufferedInterruptHandler<hal::peripherals::USART5>;
});

/// Reads override lines from USART5 and answers each one on the same port.
#[embassy_executor::task]
pub async fn run(
    usart: Peri<'static, hal::peripherals::USART5>,
    tx_pin: Peri<'static, hal::peripherals::PB0>,
    rx_pin: Peri<'static, hal::peripherals::PB1>,
) -> ! {
    let mut config = UartConfig::default();
    config.baudrate = CONSOLE_UART_BAUD;
    config.data_bits = DataBits::DataBits8;
    config.stop_bits = StopBits::STOP1;
    config.parity = Parity::ParityNone;

    let uart = BufferedUart::new(
        usart,
        rx_pin,
        tx_pin,
        UART_TX_BUFFER.init([0; CONSOLE_UART_BUFFER_SIZE]),
        UART_RX_BUFFER.init([0; CONSOLE_UART_BUFFER_SIZE]),
        UartIrqs,
        config,
    )
    .expect("failed to initialize console UART");

    let (mut uart_tx, mut uart_rx) = uart.split();
    let mut producer = CommandProducer::new(COMMAND_QUEUE.sender());
    let mut assembler = LineAssembler::new();
    let mut ingress = [0u8; MAX_LINE_LEN];

    loop {
        let count = match uart_rx.read(&mut ingress).await {
            Ok(count) => count,
            Err(_) => {
                defmt::warn!("console: UART read error");
                assembler.reset();
                Timer::after(Duration::from_millis(5)).await;
                continue;
            }
        };

        for &byte in &ingress[..count] {
            let reply = match assembler.push(byte) {
                Ok(None) => continue,
                Ok(Some(line)) => match screen(&line) {
                    LineVerdict::Blank => continue,
                    LineVerdict::Rejected(error) => {
                        telemetry::log_rejected_line(&line, error);
                        render_reply(ConsoleOutcome::Rejected(error))
                    }
                    LineVerdict::Forward { steps } => {
                        // Status as of now; the controller task applies the line next.
                        let snapshot = status::snapshot();
                        match producer.try_enqueue(line.clone()) {
                            Ok(()) => render_reply(ConsoleOutcome::Queued {
                                steps,
                                status: &snapshot,
                            }),
                            Err(_) => {
                                telemetry::log_queue_full(&line);
                                render_reply(ConsoleOutcome::Busy)
                            }
                        }
                    }
                },
                Err(error) => {
                    telemetry::log_console_error(error);
                    render_reply(ConsoleOutcome::Framing(error))
                }
            };

            if uart_tx.write_all(reply.as_bytes()).await.is_err() {
                defmt::warn!("console: UART write error");
            }
        }
    }
}
