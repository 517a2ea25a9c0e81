//! Cut, string-list, and combination behavior through the public catalog API.

mod common;

use catsel_catalog::{CombineMode, Error, StringListMode, NO_CUT};
use common::{flux_catalog, selected_mask, strings};

#[test]
fn test_range_cut_nan_passes_without_rejection() {
    let mut cat = flux_catalog();
    cat.set_lower_cut("flux", 10.0).unwrap();
    cat.set_upper_cut("flux", 50.0).unwrap();
    assert_eq!(selected_mask(&cat), vec![false, true, true, false]);
    assert_eq!(cat.selected_row_count(), 2);

    cat.set_reject_nan("flux", true).unwrap();
    assert_eq!(selected_mask(&cat), vec![false, false, true, false]);
    assert_eq!(cat.selected_row_count(), 1);
}

#[test]
fn test_reject_nan_without_bound_keeps_everything() {
    let mut cat = flux_catalog();
    cat.set_reject_nan("flux", true).unwrap();
    assert_eq!(cat.selected_row_count(), 4);
    assert!(!cat.quantity("flux").unwrap().is_active());
}

#[test]
fn test_and_or_combination() {
    let mut cat = flux_catalog();
    // row 0: flux 5 fails, index 1 passes
    cat.set_lower_cut("flux", 10.0).unwrap();
    cat.set_upper_cut("index", 1.5).unwrap();
    assert!(!cat.is_row_selected(0).unwrap());

    cat.set_combine_mode(CombineMode::Or).unwrap();
    assert!(cat.is_row_selected(0).unwrap());
    assert_eq!(cat.combine_mode(), CombineMode::Or);

    cat.set_combine_mode(CombineMode::And).unwrap();
    assert!(!cat.is_row_selected(0).unwrap());
}

#[test]
fn test_or_with_no_active_criteria_selects_all() {
    let mut cat = flux_catalog();
    cat.set_combine_mode(CombineMode::Or).unwrap();
    assert_eq!(cat.selected_row_count(), 4);
}

#[test]
fn test_idempotent_unset_keeps_counts() {
    let mut cat = flux_catalog();
    cat.set_upper_cut("flux", 30.0).unwrap();
    let before = cat.selected_row_count();
    let bits_before = cat.selection_matrix().clone();

    cat.set_lower_cut("flux", NO_CUT).unwrap();
    cat.unset_lower_cut("flux").unwrap();
    assert_eq!(cat.selected_row_count(), before);
    assert_eq!(cat.selection_matrix(), &bits_before);
}

#[test]
fn test_unset_one_of_two_preserves_other_bits() {
    let mut cat = flux_catalog();
    cat.set_lower_cut("flux", 10.0).unwrap();
    cat.set_upper_cut("index", 2.5).unwrap();
    assert_eq!(selected_mask(&cat), vec![false, true, false, false]);

    cat.unset_cuts("index").unwrap();
    assert_eq!(selected_mask(&cat), vec![false, true, true, true]);

    let flux_pos = cat.quantity_index_by_name("flux").unwrap();
    let m = cat.selection_matrix();
    assert!(!m.quantity_passes(0, flux_pos));
    assert!(m.quantity_passes(2, flux_pos));
}

#[test]
fn test_caseless_use_only() {
    let mut cat = flux_catalog();
    cat.set_string_list("class", strings(&["AGN", "QSO"]), StringListMode::UseOnly, true)
        .unwrap();
    assert_eq!(selected_mask(&cat), vec![true, true, true, false]);

    cat.use_only_strings("class", ["AGN", "QSO"], false).unwrap();
    assert_eq!(selected_mask(&cat), vec![true, true, false, false]);
}

#[test]
fn test_exclude_list_and_unset() {
    let mut cat = flux_catalog();
    cat.exclude_strings("class", ["star"], false).unwrap();
    assert_eq!(selected_mask(&cat), vec![true, true, true, false]);
    cat.unset_string_list("class").unwrap();
    assert_eq!(cat.selected_row_count(), 4);
}

#[test]
fn test_unset_all_cuts() {
    let mut cat = flux_catalog();
    cat.set_lower_cut("flux", 100.0).unwrap();
    cat.use_only_strings("class", ["none"], false).unwrap();
    assert_eq!(cat.selected_row_count(), 0);
    cat.unset_all_cuts().unwrap();
    assert_eq!(cat.selected_row_count(), 4);
}

#[test]
fn test_selected_accessors_and_ranges() {
    let mut cat = flux_catalog();
    cat.set_lower_cut("flux", 20.0).unwrap();
    cat.set_reject_nan("flux", true).unwrap();

    assert_eq!(cat.get_selected_numeric("flux", 0).unwrap(), 25.0);
    assert_eq!(cat.get_selected_string("class", 1).unwrap(), "star");
    assert!(matches!(
        cat.get_selected_numeric("flux", 2),
        Err(Error::RowOutOfRange { row: 2, len: 2 })
    ));

    assert_eq!(cat.min_value("flux").unwrap(), Some(5.0));
    assert_eq!(cat.selected_min_value("flux").unwrap(), Some(25.0));
    assert_eq!(cat.selected_max_value("flux").unwrap(), Some(60.0));
    assert_eq!(
        cat.selected_distinct_string_values("class").unwrap(),
        vec!["Agn", "star"]
    );
    assert_eq!(
        cat.distinct_string_values("class").unwrap(),
        vec!["AGN", "QSO", "Agn", "star"]
    );
}

#[test]
fn test_value_access_errors() {
    let cat = flux_catalog();
    assert!(matches!(
        cat.get_value("flux", 4),
        Err(Error::RowOutOfRange { row: 4, len: 4 })
    ));
    assert!(matches!(
        cat.get_numeric("class", 0),
        Err(Error::WrongQuantityKind { .. })
    ));
    assert!(matches!(
        cat.get_value("missing", 0),
        Err(Error::UnknownQuantity(_))
    ));
    assert_eq!(cat.get_value("class", 3).unwrap().as_str(), Some("star"));
}

#[test]
fn test_reimport_rules() {
    let mut cat = flux_catalog();
    let err = cat
        .begin_import(Default::default(), vec![catsel_catalog::QuantityDescriptor::numeric("y")])
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyImported(_)));

    cat.clear_content();
    assert_eq!(cat.row_count(), 0);
    assert!(cat.quantity("flux").is_ok());
    cat.begin_import(Default::default(), vec![catsel_catalog::QuantityDescriptor::numeric("y")])
        .unwrap();
    assert_eq!(cat.quantity_names(), vec!["y"]);
}

#[test]
fn test_criteria_survive_clear_content() {
    let mut cat = flux_catalog();
    cat.set_lower_cut("flux", 10.0).unwrap();
    cat.clear_content();
    assert!(cat.quantity("flux").unwrap().is_active());
    cat.append_column_block(vec![vec![1.0, 11.0], vec![0.0, 0.0]], vec![strings(&["a", "b"])])
        .unwrap();
    assert_eq!(selected_mask(&cat), vec![false, true]);
}
