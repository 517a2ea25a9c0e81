//! Generic-role resolution and role-based readers.

mod common;

use catsel_catalog::{Catalog, CatalogInfo, Error, GenericRole, QuantityDescriptor};
use common::sky_catalog;

#[test]
fn test_roles_from_ucds() {
    let cat = sky_catalog(&[10.0, 20.0], &[1.0, -1.0]);
    assert_eq!(cat.role_quantity(GenericRole::Ra).unwrap(), "RAJ2000");
    assert_eq!(cat.role_quantity(GenericRole::Dec).unwrap(), "DEJ2000");
    assert_eq!(cat.role_quantity(GenericRole::ObjectName).unwrap(), "Name");
    assert_eq!(cat.role_quantity(GenericRole::PositionError).unwrap(), "PosErr");
    assert!(matches!(
        cat.role_quantity(GenericRole::GalacticLon),
        Err(Error::MissingRole(_))
    ));
}

#[test]
fn test_role_values_in_degrees() {
    let cat = sky_catalog(&[10.0, 20.0], &[1.0, -1.0]);
    assert_eq!(cat.object_name(1).unwrap(), "SRC001");
    assert_eq!(cat.role_value(GenericRole::Ra, 1).unwrap(), 20.0);
    // 7200 arcsec
    assert_eq!(cat.role_value(GenericRole::PositionError, 1).unwrap(), 2.0);
    assert!(matches!(
        cat.role_value(GenericRole::ObjectName, 0),
        Err(Error::WrongQuantityKind { .. })
    ));
}

#[test]
fn test_selected_role_readers() {
    let mut cat = sky_catalog(&[10.0, 20.0, 30.0], &[0.0, 0.0, 0.0]);
    cat.set_lower_cut("RAJ2000", 15.0).unwrap();
    assert_eq!(cat.selected_object_name(0).unwrap(), "SRC001");
    assert_eq!(cat.selected_role_value(GenericRole::Ra, 1).unwrap(), 30.0);
    assert!(cat.selected_role_value(GenericRole::Ra, 2).is_err());
}

#[test]
fn test_stat_error_linkage() {
    let mut cat = sky_catalog(&[10.0, 20.0], &[0.0, 0.0]);
    assert_eq!(cat.stat_error_name("Flux").unwrap(), Some("e_Flux"));
    assert_eq!(cat.stat_error("Flux", 1).unwrap(), 1.5);
    assert!(matches!(
        cat.sys_error("Flux", 0),
        Err(Error::NoErrorQuantity(_))
    ));
    cat.set_lower_cut("Flux", 5.0).unwrap();
    assert_eq!(cat.selected_stat_error("Flux", 0).unwrap(), 1.5);
}

#[test]
fn test_explicit_error_names_are_kept() {
    let mut sys = QuantityDescriptor::numeric("Flux");
    sys.sys_error_name = Some("sys_Flux".into());
    sys.stat_error_name = Some("err".into());
    let cat = Catalog::from_columns(
        CatalogInfo::default(),
        vec![
            sys,
            QuantityDescriptor::numeric("e_Flux"),
            QuantityDescriptor::numeric("err"),
            QuantityDescriptor::numeric("sys_Flux"),
        ],
        vec![vec![1.0], vec![0.1], vec![0.2], vec![0.3]],
        vec![],
    )
    .unwrap();
    assert_eq!(cat.stat_error("Flux", 0).unwrap(), 0.2);
    assert_eq!(cat.sys_error("Flux", 0).unwrap(), 0.3);
}

#[test]
fn test_known_catalog_by_vizier_id() {
    let cat = Catalog::from_columns(
        CatalogInfo::with_code("VII/235/table1"),
        vec![
            QuantityDescriptor::string("Name"),
            QuantityDescriptor::numeric("_RAJ2000"),
            QuantityDescriptor::numeric("_DEJ2000"),
            QuantityDescriptor::numeric("_Glon"),
            QuantityDescriptor::numeric("_Glat"),
        ],
        vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]],
        vec![vec!["Q".into()]],
    )
    .unwrap();
    assert_eq!(cat.role_quantity(GenericRole::Ra).unwrap(), "_RAJ2000");
    assert_eq!(cat.role_value(GenericRole::GalacticLat, 0).unwrap(), 4.0);
    assert!(cat.role_quantity(GenericRole::PositionError).is_err());
}

#[test]
fn test_unknown_code_falls_back_to_ucds() {
    let cat = Catalog::from_columns(
        CatalogInfo::with_code("my private list"),
        vec![
            QuantityDescriptor::numeric("RAJ2000").with_ucd("pos.eq.ra;meta.main"),
            QuantityDescriptor::numeric("DEJ2000").with_ucd("pos.eq.dec;meta.main"),
        ],
        vec![vec![1.0], vec![2.0]],
        vec![],
    )
    .unwrap();
    assert_eq!(cat.role_quantity(GenericRole::Dec).unwrap(), "DEJ2000");
}

#[test]
fn test_registries() {
    assert_eq!(Catalog::known_catalogs().len(), 7);
    assert!(Catalog::mirror_sites().iter().any(|m| m.code == "cds"));
}
