//! Catalog builders shared by the integration tests.

#![allow(dead_code)]

use catsel_catalog::{Catalog, CatalogInfo, QuantityDescriptor};

/// flux = [5, NaN, 25, 60], class = [AGN, QSO, Agn, star].
pub fn flux_catalog() -> Catalog {
    Catalog::from_columns(
        CatalogInfo::with_code("test"),
        vec![
            QuantityDescriptor::string("class").with_format("A6"),
            QuantityDescriptor::numeric("flux").with_unit("mJy").with_format("F6.1"),
            QuantityDescriptor::numeric("index").with_format("F5.2"),
        ],
        vec![
            vec![5.0, f64::NAN, 25.0, 60.0],
            vec![1.0, 2.0, 3.0, 4.0],
        ],
        vec![strings(&["AGN", "QSO", "Agn", "star"])],
    )
    .expect("flux catalog")
}

/// Rows 0..10 with `x = row` and `tag = "r<row>"`.
pub fn ten_rows() -> Catalog {
    let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
    let tags: Vec<String> = (0..10).map(|i| format!("r{}", i)).collect();
    Catalog::from_columns(
        CatalogInfo::default(),
        vec![
            QuantityDescriptor::numeric("x"),
            QuantityDescriptor::string("tag"),
        ],
        vec![x],
        vec![tags],
    )
    .expect("ten rows")
}

/// Positions resolved from UCDs: name, RAJ2000, DEJ2000, PosErr (arcsec), Flux, e_Flux.
pub fn sky_catalog(ra: &[f64], dec: &[f64]) -> Catalog {
    let n = ra.len();
    let names: Vec<String> = (0..n).map(|i| format!("SRC{:03}", i)).collect();
    let pos_err: Vec<f64> = (0..n).map(|i| 3600.0 * (i as f64 + 1.0)).collect();
    let flux: Vec<f64> = (0..n).map(|i| 10.0 * i as f64).collect();
    let e_flux: Vec<f64> = (0..n).map(|i| i as f64 + 0.5).collect();
    Catalog::from_columns(
        CatalogInfo::with_code(""),
        vec![
            QuantityDescriptor::string("Name").with_ucd("ID_MAIN").with_format("A6"),
            QuantityDescriptor::numeric("RAJ2000")
                .with_ucd("POS_EQ_RA_MAIN")
                .with_unit("deg")
                .with_format("F8.4"),
            QuantityDescriptor::numeric("DEJ2000")
                .with_ucd("POS_EQ_DEC_MAIN")
                .with_unit("deg")
                .with_format("F8.4"),
            QuantityDescriptor::numeric("PosErr").with_ucd("ERROR").with_unit("arcsec"),
            QuantityDescriptor::numeric("Flux"),
            QuantityDescriptor::numeric("e_Flux").with_ucd("ERROR"),
        ],
        vec![ra.to_vec(), dec.to_vec(), pos_err, flux, e_flux],
        vec![names],
    )
    .expect("sky catalog")
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

pub fn selected_mask(cat: &Catalog) -> Vec<bool> {
    (0..cat.row_count())
        .map(|r| cat.is_row_selected(r).expect("row in range"))
        .collect()
}
