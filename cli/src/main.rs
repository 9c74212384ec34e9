use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};
use smc_settings::DeviceSettings;
use smc_usb::{find_devices, DeviceDescriptor, DeviceSession};
use std::path::Path;

use crate::cli::{Cli, Command};

mod cli;

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    CombinedLogger::init(vec![TermLogger::new(
        args.log_level.into(),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )])
    .context("Could not configure the logger")?;

    match args.command {
        Command::List => list(),
        Command::Info { device } => device_info(device),
        Command::Defaults { product_id, output } => {
            print_or_write(&DeviceSettings::new(product_id), output.as_deref())
        }
        Command::Encode {
            product_id,
            input,
            output,
        } => {
            let settings = DeviceSettings::read(&input, product_id)?;
            settings.write_image(&output)?;
            info!("Wrote settings image to {}", output.to_string_lossy());
            Ok(())
        }
        Command::Decode {
            product_id,
            input,
            output,
        } => {
            let settings = DeviceSettings::read_image(&input, product_id)?;
            print_or_write(&settings, output.as_deref())
        }
        Command::Validate { product_id, input } => {
            let settings = DeviceSettings::read(&input, product_id)?;
            let issues = settings.validate();
            if issues.is_empty() {
                println!("No problems found.");
            }
            for issue in issues {
                warn!("{}", issue);
            }
            Ok(())
        }
    }
}

fn list() -> Result<()> {
    let devices = find_devices()?;
    if devices.is_empty() {
        println!("No motor controllers found.");
        return Ok(());
    }

    for device in devices {
        let product = device
            .product()
            .map(|product| product.to_string())
            .unwrap_or_else(|| format!("Unknown product {:#06x}", device.product_id()));
        println!("{:<12} {}", device.text(), product);
    }
    Ok(())
}

fn select_device(serial: Option<String>) -> Result<DeviceDescriptor> {
    let mut devices = find_devices()?;
    if let Some(serial) = serial {
        return devices
            .into_iter()
            .find(|device| device.serial_number() == serial)
            .with_context(|| format!("No motor controller with serial number {}", serial));
    }

    match devices.len() {
        0 => bail!("No motor controllers found."),
        1 => Ok(devices.remove(0)),
        _ => bail!("More than one motor controller is connected, please pick one with --device"),
    }
}

fn device_info(serial: Option<String>) -> Result<()> {
    let descriptor = select_device(serial)?;
    let mut session = DeviceSession::open(&descriptor)
        .with_context(|| format!("Unable to open {}", descriptor.text()))?;

    println!("Serial number: {}", session.serial_number()?);
    println!("Product id:    {:#06x}", session.product_id()?);

    session.close();
    Ok(())
}

fn print_or_write(settings: &DeviceSettings, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            settings.write(path)?;
            info!("Wrote settings to {}", path.to_string_lossy());
        }
        None => println!(
            "{}",
            serde_json::to_string_pretty(settings).context("Could not serialise settings")?
        ),
    }
    Ok(())
}
