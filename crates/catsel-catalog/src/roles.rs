//! Generic-role resolution and the role-based readers.

use tracing::{debug, warn};

use catsel_core::error::{Error, Result};
use catsel_core::quantity::{GenericRole, QuantityKind};
use catsel_core::registry::{
    is_error_ucd, known_catalog, position_error_factor, role_for_ucd,
    DEFAULT_POSITION_ERROR_FACTOR, POSITION_EPOCH, POSITION_ERROR_COLUMNS,
};

use crate::catalog::Catalog;

impl Catalog {
    /// Tag quantities with generic roles and wire `e_<base>` error columns.
    ///
    /// A recognized catalog code uses its static column table; anything else
    /// falls back to the UCD scan. The first quantity matching a role wins.
    pub(crate) fn resolve_generic_roles(&mut self) {
        self.roles = [None; 6];
        self.pos_error_factor = DEFAULT_POSITION_ERROR_FACTOR;
        for q in &mut self.quantities {
            q.role = None;
        }

        let code = self.info.code.trim().to_string();
        let table = known_catalog(&code);
        if table.is_none() && !code.is_empty() {
            warn!(code = %code, "unrecognized catalog identity, resolving roles from UCDs");
        }

        for pos in 0..self.quantities.len() {
            let q = &self.quantities[pos];
            let role = match table {
                Some(t) => t.role_of(&q.name),
                None => role_for_ucd(&q.ucd).filter(|r| match r {
                    GenericRole::Ra | GenericRole::Dec => q.name.ends_with(POSITION_EPOCH),
                    _ => true,
                }),
            };
            if let Some(role) = role {
                self.assign_role(pos, role);
            }
        }

        self.wire_error_columns();

        if let Some(pos) = self.roles[GenericRole::PositionError.slot()] {
            self.pos_error_factor = self.unit_factor(pos);
        }
        debug!(roles = ?self.roles, factor = self.pos_error_factor, "generic roles resolved");
    }

    fn assign_role(&mut self, pos: usize, role: GenericRole) {
        if self.roles[role.slot()].is_some() {
            return;
        }
        let q = &mut self.quantities[pos];
        if role.is_numeric() && q.kind != QuantityKind::Numeric {
            return;
        }
        q.role = Some(role);
        self.roles[role.slot()] = Some(pos);
    }

    // Error columns: `e_<base>` feeds the base's statistical error, and a
    // `PosErr`/`ErrorRad` column becomes the position error when none was
    // found. Only columns without a role and with a blank or error UCD qualify.
    fn wire_error_columns(&mut self) {
        for pos in 0..self.quantities.len() {
            let q = &self.quantities[pos];
            if q.role.is_some() || q.kind != QuantityKind::Numeric {
                continue;
            }
            if !(q.ucd.trim().is_empty() || is_error_ucd(&q.ucd)) {
                continue;
            }
            let name = q.name.clone();
            if let Some(base) = name.strip_prefix("e_") {
                if let Some(b) = self.quantities.iter_mut().find(|b| b.name == base) {
                    if b.stat_error_name.is_none() {
                        b.stat_error_name = Some(name.clone());
                    }
                }
            } else if POSITION_ERROR_COLUMNS.contains(&name.as_str()) {
                self.assign_role(pos, GenericRole::PositionError);
            }
        }
    }

    fn unit_factor(&self, pos: usize) -> f64 {
        let q = &self.quantities[pos];
        if q.unit.trim().is_empty() {
            warn!(
                quantity = %q.name,
                factor = DEFAULT_POSITION_ERROR_FACTOR,
                "generic position error has no unit, assuming arcsec"
            );
            return DEFAULT_POSITION_ERROR_FACTOR;
        }
        position_error_factor(&q.unit).unwrap_or_else(|| {
            warn!(
                quantity = %q.name,
                unit = %q.unit,
                "generic position error has unknown unit, assuming arcsec"
            );
            DEFAULT_POSITION_ERROR_FACTOR
        })
    }

    /// Divisor converting the position-error column to degrees.
    pub fn position_error_factor(&self) -> f64 {
        self.pos_error_factor
    }

    /// Name of the quantity holding `role`.
    pub fn role_quantity(&self, role: GenericRole) -> Result<&str> {
        self.ensure_imported()?;
        self.role_position(role)
            .map(|pos| self.quantities[pos].name.as_str())
            .ok_or_else(|| Error::MissingRole(role.to_string()))
    }

    pub fn object_name(&self, row: usize) -> Result<&str> {
        let name = self.role_quantity(GenericRole::ObjectName)?;
        self.get_string(name, row)
    }

    /// Numeric value of `role` in degrees. The position error is divided by
    /// the unit factor resolved at import.
    pub fn role_value(&self, role: GenericRole, row: usize) -> Result<f64> {
        if !role.is_numeric() {
            return Err(Error::WrongQuantityKind {
                name: role.to_string(),
                expected: QuantityKind::Numeric,
                actual: QuantityKind::String,
            });
        }
        let name = self.role_quantity(role)?;
        let value = self.get_numeric(name, row)?;
        Ok(match role {
            GenericRole::PositionError => value / self.pos_error_factor,
            _ => value,
        })
    }

    pub fn selected_object_name(&self, srow: usize) -> Result<&str> {
        self.role_quantity(GenericRole::ObjectName)?;
        let row = self.selected_to_row(srow)?;
        self.object_name(row)
    }

    pub fn selected_role_value(&self, role: GenericRole, srow: usize) -> Result<f64> {
        self.role_quantity(role)?;
        let row = self.selected_to_row(srow)?;
        self.role_value(role, row)
    }
}

#[cfg(test)]
mod tests {
    use catsel_core::quantity::QuantityDescriptor;

    use super::*;
    use crate::catalog::CatalogInfo;

    fn describe(code: &str, descriptors: Vec<QuantityDescriptor>) -> Catalog {
        let mut cat = Catalog::new();
        cat.begin_import(CatalogInfo::with_code(code), descriptors)
            .unwrap();
        cat
    }

    #[test]
    fn ucd_scan_requires_epoch_suffix() {
        let cat = describe(
            "",
            vec![
                QuantityDescriptor::numeric("RAB1950").with_ucd("POS_EQ_RA_MAIN"),
                QuantityDescriptor::numeric("RAJ2000").with_ucd("POS_EQ_RA_MAIN"),
                QuantityDescriptor::numeric("DEJ2000").with_ucd("pos.eq.dec;meta.main"),
            ],
        );
        assert_eq!(cat.role_quantity(GenericRole::Ra).unwrap(), "RAJ2000");
        assert_eq!(cat.role_quantity(GenericRole::Dec).unwrap(), "DEJ2000");
        assert_eq!(cat.quantity("RAB1950").unwrap().role, None);
    }

    #[test]
    fn string_column_cannot_hold_numeric_role() {
        let cat = describe(
            "",
            vec![QuantityDescriptor::string("RAJ2000").with_ucd("POS_EQ_RA_MAIN")],
        );
        assert!(matches!(
            cat.role_quantity(GenericRole::Ra),
            Err(Error::MissingRole(_))
        ));
    }

    #[test]
    fn known_catalog_table_wins_over_ucds() {
        let cat = describe(
            "IX/10A/1rxs",
            vec![
                QuantityDescriptor::string("1RXS"),
                QuantityDescriptor::numeric("RAJ2000"),
                QuantityDescriptor::numeric("DEJ2000"),
                QuantityDescriptor::numeric("PosErr").with_unit("arcsec"),
                QuantityDescriptor::numeric("other").with_ucd("POS_GAL_LON"),
            ],
        );
        assert_eq!(cat.role_quantity(GenericRole::ObjectName).unwrap(), "1RXS");
        assert_eq!(cat.role_quantity(GenericRole::PositionError).unwrap(), "PosErr");
        assert!(cat.role_quantity(GenericRole::GalacticLon).is_err());
        assert_eq!(cat.position_error_factor(), 3600.0);
    }

    #[test]
    fn error_prefix_links_base_quantity() {
        let cat = describe(
            "",
            vec![
                QuantityDescriptor::numeric("Flux"),
                QuantityDescriptor::numeric("e_Flux").with_ucd("ERROR"),
                QuantityDescriptor::numeric("ErrorRad").with_unit("arcmin"),
            ],
        );
        assert_eq!(cat.stat_error_name("Flux").unwrap(), Some("e_Flux"));
        assert_eq!(cat.role_quantity(GenericRole::PositionError).unwrap(), "ErrorRad");
        assert_eq!(cat.position_error_factor(), 60.0);
    }

    #[test]
    fn unknown_unit_falls_back_to_arcsec() {
        let cat = describe(
            "",
            vec![QuantityDescriptor::numeric("PosErr").with_unit("furlong")],
        );
        assert_eq!(cat.position_error_factor(), DEFAULT_POSITION_ERROR_FACTOR);
    }
}
