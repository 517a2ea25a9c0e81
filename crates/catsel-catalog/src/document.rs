//! YAML selection documents: a complete criteria set in one file.
//!
//! Example:
//! ```yaml
//! combine: or
//! cuts:
//!   - { quantity: flux, min: 10.0, max: 50.0, reject_nan: true }
//! strings:
//!   - { quantity: class, values: [AGN, QSO], mode: use_only, caseless: true }
//! region: { ra: 83.6, dec: 22.0, major: 1.5 }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use catsel_core::config::CombineMode;
use catsel_select::Ellipse;

use crate::catalog::Catalog;
use crate::engine::StringListMode;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("selection yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Catalog(#[from] catsel_core::error::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionDocument {
    pub combine: Option<CombineMode>,
    pub cuts: Vec<CutDef>,
    pub strings: Vec<StringListDef>,
    pub region: Option<RegionDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CutDef {
    pub quantity: String,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub reject_nan: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StringListDef {
    pub quantity: String,
    pub values: Vec<String>,
    #[serde(default)]
    pub mode: StringListMode,
    #[serde(default)]
    pub caseless: bool,
}

/// Region in degrees; `minor` defaults to `major`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionDef {
    pub ra: f64,
    pub dec: f64,
    pub major: f64,
    #[serde(default)]
    pub minor: Option<f64>,
    #[serde(default)]
    pub rotation: f64,
}

impl From<RegionDef> for Ellipse {
    fn from(r: RegionDef) -> Self {
        Ellipse {
            center_ra_deg: r.ra,
            center_dec_deg: r.dec,
            major_axis_deg: r.major,
            minor_axis_deg: r.minor.unwrap_or(r.major),
            rotation_deg: r.rotation,
        }
    }
}

impl SelectionDocument {
    pub fn parse_yaml(src: &str) -> Result<Self, DocumentError> {
        Ok(serde_yaml::from_str(src)?)
    }

    pub fn to_yaml(&self) -> Result<String, DocumentError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Apply every entry through the catalog's mutation entry points,
    /// stopping at the first error.
    pub fn apply(&self, catalog: &mut Catalog) -> Result<(), DocumentError> {
        if let Some(mode) = self.combine {
            catalog.set_combine_mode(mode)?;
        }
        for cut in &self.cuts {
            if let Some(reject) = cut.reject_nan {
                catalog.set_reject_nan(&cut.quantity, reject)?;
            }
            if let Some(min) = cut.min {
                catalog.set_lower_cut(&cut.quantity, min)?;
            }
            if let Some(max) = cut.max {
                catalog.set_upper_cut(&cut.quantity, max)?;
            }
        }
        for list in &self.strings {
            catalog.set_string_list(
                &list.quantity,
                list.values.iter().cloned(),
                list.mode,
                list.caseless,
            )?;
        }
        if let Some(region) = self.region {
            catalog.set_region(region.into())?;
        }
        Ok(())
    }
}
