use crate::codec::{decode, encode};
use crate::settings::DeviceSettings;
use crate::wire::WireSettings;
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs::{create_dir_all, File};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

impl DeviceSettings {
    /// Loads settings saved by [`DeviceSettings::write`]. A missing file gives the
    /// factory settings for `product_id`.
    pub fn read(path: &Path, product_id: u16) -> Result<DeviceSettings> {
        match File::open(path) {
            Ok(reader) => serde_json::from_reader(reader).context(format!(
                "Could not parse settings file at {}",
                path.to_string_lossy()
            )),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(
                    "No settings file at {}, using defaults for product {:#06x}",
                    path.to_string_lossy(),
                    product_id
                );
                Ok(DeviceSettings::new(product_id))
            }
            Err(error) => Err(error).context(format!(
                "Could not open settings file for reading at {}",
                path.to_string_lossy()
            )),
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        create_parent(path)?;
        let writer = File::create(path).context(format!(
            "Could not open settings file for writing at {}",
            path.to_string_lossy()
        ))?;
        serde_json::to_writer_pretty(writer, self).context(format!(
            "Could not write to settings file at {}",
            path.to_string_lossy()
        ))?;

        for issue in self.validate() {
            warn!("Saved settings with a likely mistake: {}", issue);
        }
        Ok(())
    }

    /// Loads a raw firmware settings image from disk.
    pub fn read_image(path: &Path, product_id: u16) -> Result<DeviceSettings> {
        let mut bytes = Vec::new();
        File::open(path)
            .and_then(|mut file| file.read_to_end(&mut bytes))
            .context(format!(
                "Could not read settings image at {}",
                path.to_string_lossy()
            ))?;

        let wire = WireSettings::from_bytes(&bytes).context(format!(
            "Could not parse settings image at {}",
            path.to_string_lossy()
        ))?;
        Ok(decode(product_id, &wire))
    }

    pub fn write_image(&self, path: &Path) -> Result<()> {
        create_parent(path)?;
        let bytes = encode(self).to_bytes()?;
        File::create(path)
            .and_then(|mut file| file.write_all(&bytes))
            .context(format!(
                "Could not write settings image to {}",
                path.to_string_lossy()
            ))?;
        Ok(())
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if let Err(e) = create_dir_all(parent) {
            if e.kind() != ErrorKind::AlreadyExists {
                return Err(e).context(format!(
                    "Could not create settings directory at {}",
                    parent.to_string_lossy()
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use smc_types::{Channel, MixingMode};
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = DeviceSettings::read(&dir.path().join("nope.json"), 0xa5).unwrap();
        assert_eq!(settings, DeviceSettings::new(0xa5));
    }

    #[test]
    fn json_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = DeviceSettings::new(0xa3);
        settings.mixing_mode = MixingMode::Left;
        settings.channels[Channel::Rc2].invert = true;
        settings.write(&path).unwrap();

        assert_eq!(DeviceSettings::read(&path, 0).unwrap(), settings);
    }

    #[test]
    fn garbage_json_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let error = DeviceSettings::read(&path, 0).unwrap_err();
        assert!(error.to_string().starts_with("Could not parse settings file"));
    }

    #[test]
    fn image_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.bin");

        let mut settings = DeviceSettings::new(0xa9);
        settings.coast_when_off = true;
        settings.write_image(&path).unwrap();

        assert_eq!(std::fs::metadata(&path).unwrap().len(), 124);
        assert_eq!(DeviceSettings::read_image(&path, 0xa9).unwrap(), settings);
    }

    #[test]
    fn truncated_image_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.bin");
        std::fs::write(&path, [0u8; 12]).unwrap();

        assert!(DeviceSettings::read_image(&path, 0).is_err());
    }
}
