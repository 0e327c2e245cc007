//! Desk configuration
//!
//! Categories and staff are reference data owned elsewhere; this crate
//! only needs to resolve them during validation, so the configuration
//! file carries read-only registries of both next to the storage
//! settings. Values load from `inquiry-desk.yaml` layered under
//! `INQUIRY_DESK_*` environment variables.

use std::path::{Path, PathBuf};

use config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::core::{CategoryId, StaffId};
use crate::error::Result;
use crate::lifecycle::{CategoryDirectory, CategoryState, StaffDirectory};

/// Default configuration file name
pub const CONFIG_FILE: &str = "inquiry-desk.yaml";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Inquiry categories customers can file under
    #[serde(default)]
    pub categories: Vec<CategoryEntry>,
    /// Staff users who may be assigned or author replies
    #[serde(default)]
    pub staff: Vec<StaffMember>,
}

/// Where ticket data lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory root
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".inquiry-desk"),
        }
    }
}

/// One category registry entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub id: CategoryId,
    pub name: String,
    /// Inactive categories stay resolvable but reject new tickets
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

/// One staff registry entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
}

impl Config {
    /// Load configuration from an explicit file path
    pub fn load_from(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(Environment::with_prefix("INQUIRY_DESK").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Load `inquiry-desk.yaml` from the current directory, or defaults if
    /// the file does not exist
    pub fn load_or_default() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(File::new(CONFIG_FILE, FileFormat::Yaml).required(false))
            .add_source(Environment::with_prefix("INQUIRY_DESK").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Look a staff member up by ID
    #[must_use]
    pub fn staff_member(&self, id: &StaffId) -> Option<&StaffMember> {
        self.staff.iter().find(|member| member.id == *id)
    }

    /// Look a category up by ID
    #[must_use]
    pub fn category(&self, id: &CategoryId) -> Option<&CategoryEntry> {
        self.categories.iter().find(|entry| entry.id == *id)
    }
}

impl CategoryDirectory for Config {
    fn category_state(&self, id: &CategoryId) -> Result<CategoryState> {
        Ok(match self.category(id) {
            Some(entry) if entry.active => CategoryState::Active,
            Some(_) => CategoryState::Inactive,
            None => CategoryState::NotFound,
        })
    }
}

impl StaffDirectory for Config {
    fn staff_exists(&self, id: &StaffId) -> Result<bool> {
        Ok(self.staff_member(id).is_some())
    }
}
