//! Column descriptors (`Quantity`) and the selection state attached to them.
//!
//! Pure data; the selection engine in `catsel-catalog` mutates the criteria
//! and the evaluators in `catsel-select` read them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cut value meaning "no bound". Any cut `>= NO_CUT` (or NaN) is stored as unset.
pub const NO_CUT: f64 = f64::INFINITY;

/// Map a caller-supplied cut to the stored form.
pub fn normalize_cut(value: f64) -> Option<f64> {
    if value.is_nan() || value >= NO_CUT {
        None
    } else {
        Some(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuantityKind {
    Numeric,
    String,
    /// Present in some catalog descriptions; never importable.
    Vector,
}

/// Canonical semantic roles a column may hold. At most one quantity per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenericRole {
    ObjectName,
    Ra,
    Dec,
    PositionError,
    GalacticLon,
    GalacticLat,
}

impl GenericRole {
    /// Table order used by the static registries.
    pub const ALL: [GenericRole; 6] = [
        GenericRole::ObjectName,
        GenericRole::Ra,
        GenericRole::Dec,
        GenericRole::PositionError,
        GenericRole::GalacticLon,
        GenericRole::GalacticLat,
    ];

    pub fn slot(self) -> usize {
        match self {
            GenericRole::ObjectName => 0,
            GenericRole::Ra => 1,
            GenericRole::Dec => 2,
            GenericRole::PositionError => 3,
            GenericRole::GalacticLon => 4,
            GenericRole::GalacticLat => 5,
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, GenericRole::ObjectName)
    }
}

impl fmt::Display for GenericRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GenericRole::ObjectName => "object name",
            GenericRole::Ra => "RA",
            GenericRole::Dec => "Dec",
            GenericRole::PositionError => "position error",
            GenericRole::GalacticLon => "galactic longitude",
            GenericRole::GalacticLat => "galactic latitude",
        };
        f.write_str(s)
    }
}

/// What a producer hands over when defining a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityDescriptor {
    pub name: String,
    pub kind: QuantityKind,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub ucd: String,
    #[serde(default)]
    pub comment: String,
    /// Print/parse hint such as `A12`, `F8.4`, `E10.3`, `I5`.
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub stat_error_name: Option<String>,
    #[serde(default)]
    pub sys_error_name: Option<String>,
}

impl QuantityDescriptor {
    pub fn numeric(name: impl Into<String>) -> Self {
        Self::new(name, QuantityKind::Numeric)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, QuantityKind::String)
    }

    pub fn new(name: impl Into<String>, kind: QuantityKind) -> Self {
        Self {
            name: name.into(),
            kind,
            unit: String::new(),
            ucd: String::new(),
            comment: String::new(),
            format: String::new(),
            stat_error_name: None,
            sys_error_name: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_ucd(mut self, ucd: impl Into<String>) -> Self {
        self.ucd = ucd.into();
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

/// Per-quantity selection configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Criteria {
    pub lower_cut: Option<f64>,
    pub upper_cut: Option<f64>,
    pub reject_nan: bool,
    pub string_list: Vec<String>,
    /// true = "use only" the listed values, false = "exclude" them.
    pub string_inclusive: bool,
    pub string_caseless: bool,
}

impl Criteria {
    /// Whether this quantity participates in the row combination.
    /// `reject_nan` alone never activates a quantity.
    pub fn is_active(&self, kind: QuantityKind) -> bool {
        match kind {
            QuantityKind::Numeric => self.lower_cut.is_some() || self.upper_cut.is_some(),
            QuantityKind::String => !self.string_list.is_empty(),
            QuantityKind::Vector => false,
        }
    }

    /// Drop cuts and lists; `reject_nan` is a policy, not a criterion, and stays.
    pub fn clear(&mut self) {
        self.lower_cut = None;
        self.upper_cut = None;
        self.string_list.clear();
        self.string_inclusive = false;
        self.string_caseless = false;
    }
}

/// One column of a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub name: String,
    pub unit: String,
    pub ucd: String,
    pub comment: String,
    pub format: String,
    pub kind: QuantityKind,
    /// Position inside the numeric or string column bank, per kind.
    pub storage_index: usize,
    pub role: Option<GenericRole>,
    pub stat_error_name: Option<String>,
    pub sys_error_name: Option<String>,
    pub criteria: Criteria,
}

impl Quantity {
    pub fn from_descriptor(desc: QuantityDescriptor, storage_index: usize) -> Self {
        Self {
            name: desc.name,
            unit: desc.unit,
            ucd: desc.ucd,
            comment: desc.comment,
            format: desc.format,
            kind: desc.kind,
            storage_index,
            role: None,
            stat_error_name: desc.stat_error_name.filter(|s| !s.is_empty()),
            sys_error_name: desc.sys_error_name.filter(|s| !s.is_empty()),
            criteria: Criteria::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.criteria.is_active(self.kind)
    }

    /// Character width declared by the format hint (`A12` -> 12, `F8.4` -> 8).
    pub fn format_width(&self) -> Option<usize> {
        let rest = self.format.get(1..)?;
        let width = rest.split('.').next()?;
        width.parse::<usize>().ok().filter(|w| *w > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cut_sentinel_maps_to_unset() {
        assert_eq!(normalize_cut(NO_CUT), None);
        assert_eq!(normalize_cut(f64::NAN), None);
        assert_eq!(normalize_cut(-3.5), Some(-3.5));
    }

    #[test]
    fn reject_nan_alone_is_not_active() {
        let mut c = Criteria {
            reject_nan: true,
            ..Default::default()
        };
        assert!(!c.is_active(QuantityKind::Numeric));
        c.upper_cut = Some(1.0);
        assert!(c.is_active(QuantityKind::Numeric));
        assert!(!c.is_active(QuantityKind::String));
    }

    #[test]
    fn format_width_parses_prefix() {
        let mut q = Quantity::from_descriptor(QuantityDescriptor::numeric("x"), 0);
        q.format = "F8.4".into();
        assert_eq!(q.format_width(), Some(8));
        q.format = "A".into();
        assert_eq!(q.format_width(), None);
    }
}
