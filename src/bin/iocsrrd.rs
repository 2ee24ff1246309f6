// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! iocsrrd - read one IOCSR register through the device node
//!
//! ```text
//! iocsrrd 0x420       # 4 bytes at 0x420
//! iocsrrd 0x420 8     # 8 bytes
//! ```

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use iocsr::{format_value, parse_address, probe, Width};
use log::{Level, LevelFilter, Log, Metadata, Record};

#[derive(Parser, Debug)]
#[command(name = "iocsrrd", about = "Read an IOCSR register", version)]
struct Args {
    /// Register address in hex (0x prefix optional)
    #[arg(value_parser = parse_address_arg)]
    address: u32,

    /// Access width in bytes: 1, 2, 4 or 8
    #[arg(default_value = "4")]
    size: Width,

    /// Device node to read through
    #[arg(long, value_name = "PATH", default_value = "/dev/iocsr")]
    device: PathBuf,

    /// Print diagnostics on stderr (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_address_arg(text: &str) -> Result<u32, String> {
    parse_address(text).map_err(|_| format!("'{text}' is not a 32-bit hex address"))
}

/// Diagnostics go to stderr so stdout stays a bare value
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let tag = match record.level() {
                Level::Error => "error",
                Level::Warn => "warning",
                Level::Info => "info",
                Level::Debug => "debug",
                Level::Trace => "trace",
            };
            eprintln!("iocsrrd: {tag}: {}", record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn run(args: &Args) -> Result<String, Box<dyn Error>> {
    let mut dev = File::open(&args.device)
        .map_err(|err| format!("failed to open {}: {err}", args.device.display()))?;
    log::debug!(
        "reading {} bytes at {:#x} from {}",
        args.size.bytes(),
        args.address,
        args.device.display()
    );

    let value = probe(&mut dev, args.address, args.size)
        .map_err(|err| format!("failed to read {:#x}: {err}", args.address))?;
    Ok(format_value(value, args.size))
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
