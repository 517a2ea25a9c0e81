//! Static tables: known catalogs and their generic columns, the UCD to role
//! map, position-error units, and the VizieR mirror list.
//!
//! Immutable data compiled into the binary; nothing here is mutated at runtime.

use crate::quantity::GenericRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownCatalog {
    /// Short name callers use to request the catalog.
    pub name: &'static str,
    /// VizieR table identifier.
    pub vizier_id: &'static str,
    /// Column holding each generic role, in `GenericRole::ALL` order ("" = none).
    pub role_columns: [&'static str; 6],
}

impl KnownCatalog {
    pub fn column_for(&self, role: GenericRole) -> Option<&'static str> {
        let name = self.role_columns[role.slot()];
        (!name.is_empty()).then_some(name)
    }

    /// Role whose table column is literally `column`, if any.
    pub fn role_of(&self, column: &str) -> Option<GenericRole> {
        GenericRole::ALL
            .into_iter()
            .find(|r| self.column_for(*r) == Some(column))
    }
}

// Sexagesimal catalogs get decimal position columns added by VizieR, hence
// the leading-underscore names.
pub const KNOWN_CATALOGS: [KnownCatalog; 7] = [
    KnownCatalog {
        name: "EGRET3 sources",
        vizier_id: "J/ApJS/123/79/3eg",
        role_columns: ["3EG", "RAJ2000", "DEJ2000", "theta95", "GLON", "GLAT"],
    },
    KnownCatalog {
        name: "EGRET3 fluxes",
        vizier_id: "J/ApJS/123/79/fluxes",
        role_columns: ["3EG", "", "", "", "", ""],
    },
    KnownCatalog {
        name: "EGRET3 periods",
        vizier_id: "J/ApJS/123/79/table1",
        role_columns: ["", "", "", "", "GLON", "GLAT"],
    },
    KnownCatalog {
        name: "ROSAT 1RXS",
        vizier_id: "IX/10A/1rxs",
        role_columns: ["1RXS", "RAJ2000", "DEJ2000", "PosErr", "_Glon", "_Glat"],
    },
    KnownCatalog {
        name: "Veron (11th) quasar",
        vizier_id: "VII/235/table1",
        role_columns: ["Name", "_RAJ2000", "_DEJ2000", "", "_Glon", "_Glat"],
    },
    KnownCatalog {
        name: "Veron (11th) BL Lac",
        vizier_id: "VII/235/table2",
        role_columns: ["Name", "_RAJ2000", "_DEJ2000", "", "_Glon", "_Glat"],
    },
    KnownCatalog {
        name: "Veron (11th) AGN",
        vizier_id: "VII/235/table3",
        role_columns: ["Name", "_RAJ2000", "_DEJ2000", "", "_Glon", "_Glat"],
    },
];

/// Look a catalog up by short name or VizieR identifier.
pub fn known_catalog(code: &str) -> Option<&'static KnownCatalog> {
    let code = code.trim();
    KNOWN_CATALOGS
        .iter()
        .find(|c| c.name == code || c.vizier_id == code)
}

/// UCD (both UCD1 and UCD1+ spellings) to generic role.
pub const UCD_ROLES: [(&str, GenericRole); 10] = [
    ("ID_MAIN", GenericRole::ObjectName),
    ("meta.id;meta.main", GenericRole::ObjectName),
    ("POS_EQ_RA_MAIN", GenericRole::Ra),
    ("pos.eq.ra;meta.main", GenericRole::Ra),
    ("POS_EQ_DEC_MAIN", GenericRole::Dec),
    ("pos.eq.dec;meta.main", GenericRole::Dec),
    ("POS_GAL_LON", GenericRole::GalacticLon),
    ("pos.galactic.lon", GenericRole::GalacticLon),
    ("POS_GAL_LAT", GenericRole::GalacticLat),
    ("pos.galactic.lat", GenericRole::GalacticLat),
];

pub fn role_for_ucd(ucd: &str) -> Option<GenericRole> {
    let ucd = ucd.trim();
    if ucd.is_empty() {
        return None;
    }
    UCD_ROLES
        .iter()
        .find(|(u, _)| u.eq_ignore_ascii_case(ucd))
        .map(|(_, r)| *r)
}

/// Epoch suffix RA/Dec columns must carry to be matched by UCD.
pub const POSITION_EPOCH: &str = "J2000";

/// Column names that hold a position error when not found through a table.
pub const POSITION_ERROR_COLUMNS: [&str; 2] = ["PosErr", "ErrorRad"];

/// UCDs flagging an uncertainty column.
pub fn is_error_ucd(ucd: &str) -> bool {
    let ucd = ucd.trim();
    ucd.eq_ignore_ascii_case("ERROR") || ucd.starts_with("stat.error")
}

/// Divisor that converts a position error in `unit` to degrees.
pub fn position_error_factor(unit: &str) -> Option<f64> {
    match unit.trim().to_ascii_lowercase().as_str() {
        "deg" => Some(1.0),
        "arcsec" => Some(3600.0),
        "arcmin" => Some(60.0),
        "rad" => Some(180.0 / std::f64::consts::PI),
        _ => None,
    }
}

/// Fallback when a position-error unit is missing or unknown.
pub const DEFAULT_POSITION_ERROR_FACTOR: f64 = 3600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorSite {
    pub code: &'static str,
    pub country: &'static str,
    pub host: &'static str,
}

pub const MIRROR_SITES: [MirrorSite; 9] = [
    MirrorSite { code: "cds", country: "fr", host: "vizier.u-strasbg.fr/" },
    MirrorSite { code: "cfa", country: "us", host: "vizier.cfa.harvard.edu/" },
    MirrorSite { code: "cadc", country: "ca", host: "vizier.hia.nrc.ca/" },
    MirrorSite { code: "adac", country: "jp", host: "vizier.nao.ac.jp/" },
    MirrorSite { code: "ukirt", country: "hawaii", host: "www.ukirt.jach.hawaii.edu/" },
    MirrorSite { code: "cambridge", country: "uk", host: "archive.ast.cam.ac.uk/" },
    MirrorSite { code: "iucaa", country: "in", host: "urania.iucaa.ernet.in/" },
    MirrorSite { code: "moscow", country: "ru", host: "www.inasan.rssi.ru/" },
    MirrorSite { code: "bejing", country: "cn", host: "data.bao.ac.cn/" },
];

pub fn mirror_site(code: &str) -> Option<&'static MirrorSite> {
    MIRROR_SITES.iter().find(|m| m.code == code.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name_or_vizier_id() {
        let by_name = known_catalog("ROSAT 1RXS").unwrap();
        let by_id = known_catalog("IX/10A/1rxs").unwrap();
        assert_eq!(by_name, by_id);
        assert_eq!(by_name.column_for(GenericRole::PositionError), Some("PosErr"));
        assert!(known_catalog("unknown").is_none());
    }

    #[test]
    fn blank_table_entries_hold_no_role() {
        let fluxes = known_catalog("EGRET3 fluxes").unwrap();
        assert_eq!(fluxes.column_for(GenericRole::Ra), None);
        assert_eq!(fluxes.role_of("3EG"), Some(GenericRole::ObjectName));
        assert_eq!(fluxes.role_of(""), None);
    }

    #[test]
    fn ucd_lookup_accepts_both_vocabularies() {
        assert_eq!(role_for_ucd("POS_EQ_RA_MAIN"), Some(GenericRole::Ra));
        assert_eq!(role_for_ucd("pos.eq.dec;meta.main"), Some(GenericRole::Dec));
        assert_eq!(role_for_ucd(""), None);
        assert_eq!(role_for_ucd("phot.flux"), None);
    }

    #[test]
    fn position_error_units() {
        assert_eq!(position_error_factor("arcsec"), Some(3600.0));
        assert_eq!(position_error_factor("DEG"), Some(1.0));
        assert_eq!(position_error_factor("arcmin"), Some(60.0));
        let rad = position_error_factor("rad").unwrap();
        assert!((rad - 57.295_779_513).abs() < 1e-6);
        assert_eq!(position_error_factor("furlong"), None);
    }

    #[test]
    fn mirrors_have_unique_codes() {
        for (i, a) in MIRROR_SITES.iter().enumerate() {
            for b in &MIRROR_SITES[i + 1..] {
                assert_ne!(a.code, b.code);
            }
        }
        assert_eq!(mirror_site("cds").unwrap().country, "fr");
    }
}
