mod config;
mod driver;
mod output;
mod session;

use std::env;
use std::io::{self, BufRead, Write};
use std::process;

use output::TerminalSignalOutput;
use session::Session;

fn main() -> io::Result<()> {
    let dwell = config::parse_args(env::args().skip(1)).unwrap_or_else(|err| {
        eprintln!("{err}");
        eprintln!("{}", config::USAGE);
        process::exit(2);
    });

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    println!(
        "Signal Controller Emulator ready (auto dwell {:?}, manual dwell {:?}). Type `:help` for commands or `exit` to quit.",
        dwell.auto(),
        dwell.manual()
    );

    let (events, driver_thread) = driver::spawn(TerminalSignalOutput::new(), dwell);
    let mut session = Session::new(events);

    loop {
        line.clear();
        {
            let mut writer = io::stdout().lock();
            write!(writer, "> ")?;
            writer.flush()?;
        }

        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            println!();
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if should_terminate(trimmed) {
            println!("Session closed.");
            break;
        }

        for response in session.handle_command(trimmed)? {
            println!("{response}");
        }
    }

    session.shutdown();
    if driver_thread.join().is_err() {
        eprintln!("signal driver thread panicked");
    }
    Ok(())
}

fn should_terminate(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}
