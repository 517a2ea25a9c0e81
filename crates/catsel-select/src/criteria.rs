//! Per-criterion evaluators and the row combination rule.

use catsel_core::config::CombineMode;
use catsel_core::quantity::Criteria;

/// Range test on one numeric cell.
///
/// NaN only fails a bound when `reject_nan` is set; otherwise it compares
/// false against every bound and passes.
pub fn evaluate_numeric(
    value: f64,
    lower: Option<f64>,
    upper: Option<f64>,
    reject_nan: bool,
) -> bool {
    if let Some(lo) = lower {
        if value.is_nan() && reject_nan {
            return false;
        } else if value < lo {
            return false;
        }
    }
    if let Some(hi) = upper {
        if value.is_nan() && reject_nan {
            return false;
        } else if value > hi {
            return false;
        }
    }
    true
}

/// Membership test on one string cell. `inclusive` = "use only", else "exclude".
pub fn evaluate_string(value: &str, list: &[String], caseless: bool, inclusive: bool) -> bool {
    let member = if caseless {
        list.iter().any(|s| caseless_eq(s, value))
    } else {
        list.iter().any(|s| s == value)
    };
    inclusive == member
}

fn caseless_eq(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Numeric verdict using a quantity's configured criteria.
pub fn numeric_passes(value: f64, criteria: &Criteria) -> bool {
    evaluate_numeric(
        value,
        criteria.lower_cut,
        criteria.upper_cut,
        criteria.reject_nan,
    )
}

/// String verdict using a quantity's configured criteria. An empty list passes.
pub fn string_passes(value: &str, criteria: &Criteria) -> bool {
    if criteria.string_list.is_empty() {
        return true;
    }
    evaluate_string(
        value,
        &criteria.string_list,
        criteria.string_caseless,
        criteria.string_inclusive,
    )
}

/// Combine the verdicts of the active criteria only.
///
/// An empty set of active criteria selects the row in either mode.
pub fn combine<I>(mode: CombineMode, active_verdicts: I) -> bool
where
    I: IntoIterator<Item = bool>,
{
    let mut iter = active_verdicts.into_iter().peekable();
    if iter.peek().is_none() {
        return true;
    }
    match mode {
        CombineMode::And => iter.all(|v| v),
        CombineMode::Or => iter.any(|v| v),
    }
}
