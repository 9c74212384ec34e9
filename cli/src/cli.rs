use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(about, version, author)]
pub struct Cli {
    /// Minimum log level to print out
    #[clap(long, value_enum, default_value = "info")]
    pub log_level: LevelFilter,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every connected Simple Motor Controller G2
    List,

    /// Open a controller and read its serial number and product id back from it
    Info {
        /// Serial number of the controller, optional if exactly one is connected
        #[clap(long)]
        device: Option<String>,
    },

    /// Print the factory settings for a product as JSON
    Defaults {
        /// USB product id (hex, e.g. 0xa5)
        #[clap(long, value_parser = parse_hex_u16)]
        product_id: u16,

        /// Write the settings here instead of printing them
        #[clap(long)]
        output: Option<PathBuf>,
    },

    /// Convert a JSON settings file into a firmware settings image
    Encode {
        /// USB product id used if the settings file doesn't exist yet
        #[clap(long, value_parser = parse_hex_u16)]
        product_id: u16,

        #[clap(long)]
        input: PathBuf,

        #[clap(long)]
        output: PathBuf,
    },

    /// Convert a firmware settings image into a JSON settings file
    Decode {
        /// USB product id the image was read from (hex, e.g. 0xa5)
        #[clap(long, value_parser = parse_hex_u16)]
        product_id: u16,

        #[clap(long)]
        input: PathBuf,

        /// Write the settings here instead of printing them
        #[clap(long)]
        output: Option<PathBuf>,
    },

    /// Check a JSON settings file for likely mistakes
    Validate {
        #[clap(long, value_parser = parse_hex_u16)]
        product_id: u16,

        #[clap(long)]
        input: PathBuf,
    },
}

fn parse_hex_u16(value: &str) -> Result<u16, String> {
    let digits = value.trim_start_matches("0x").trim_start_matches("0X");
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid hex value '{value}': {e}"))
}

#[repr(usize)]
#[derive(ValueEnum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum LevelFilter {
    /// A level lower than all log levels.
    Off,
    /// Corresponds to the `Error` log level.
    Error,
    /// Corresponds to the `Warn` log level.
    Warn,
    /// Corresponds to the `Info` log level.
    Info,
    /// Corresponds to the `Debug` log level.
    Debug,
    /// Corresponds to the `Trace` log level.
    Trace,
}

impl From<LevelFilter> for log::LevelFilter {
    fn from(level: LevelFilter) -> Self {
        match level {
            LevelFilter::Off => log::LevelFilter::Off,
            LevelFilter::Error => log::LevelFilter::Error,
            LevelFilter::Warn => log::LevelFilter::Warn,
            LevelFilter::Info => log::LevelFilter::Info,
            LevelFilter::Debug => log::LevelFilter::Debug,
            LevelFilter::Trace => log::LevelFilter::Trace,
        }
    }
}
