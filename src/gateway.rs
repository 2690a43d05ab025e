use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::{
    crop::ProfileImagePayload,
    error::{CropError, Result},
};

pub const PROFILE_FILE: &str = "profile-images.json";
pub const TEMP_SUFFIX: &str = ".tmp";

/// Where profile image payloads are stored. Saving is a single opaque call;
/// a failure must leave the caller's edit state untouched.
pub trait PersistenceGateway {
    fn store(&mut self, payload: &ProfileImagePayload) -> Result<()>;
}

/// Stores the payload as JSON in a directory.
pub struct JsonFileGateway {
    dir: PathBuf,
}

impl JsonFileGateway {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(PROFILE_FILE)
    }

    /// `Ok(None)` when nothing has been stored yet.
    pub fn load(&self) -> Result<Option<ProfileImagePayload>> {
        load_payload(&self.path())
    }

    /// The stored JSON as-is, for readers that parse fields leniently.
    pub fn load_raw(&self) -> Result<Option<Value>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&fs::read_to_string(path)?)?))
    }
}

impl PersistenceGateway for JsonFileGateway {
    fn store(&mut self, payload: &ProfileImagePayload) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|err| {
            CropError::gateway(format!("unable to create {}: {err}", self.dir.display()))
        })?;
        let target = self.path();
        let temp = self.dir.join(format!("{PROFILE_FILE}{TEMP_SUFFIX}"));
        {
            let file = fs::File::create(&temp)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, payload)?;
            writer.flush()?;
        }
        fs::rename(&temp, &target).map_err(|err| {
            CropError::gateway(format!(
                "unable to move {} to {}: {err}",
                temp.display(),
                target.display()
            ))
        })?;
        log::info!("stored profile images in {}", target.display());
        Ok(())
    }
}

pub fn load_payload(path: &Path) -> Result<Option<ProfileImagePayload>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&text)?))
}
