//! Row projection: the two-column `(plot, value)` view of a variable.

use std::collections::HashSet;

use crate::error::{DashError, DashResult};
use crate::plot::PlotId;
use crate::table::{Table, Value};

/// Rows whose identifier is in `plot_ids`, projected to the requested
/// variable, in source row order. Fails with `NoMatchingData` when nothing
/// matches and `UnknownVariable` when the column does not exist; the match
/// check runs first. Missing values are kept — excluding them is the
/// caller's policy.
pub fn project<'t>(
    table: &'t Table,
    plot_ids: &[PlotId],
    variable: &str,
) -> DashResult<Vec<(&'t PlotId, &'t Value)>> {
    let wanted: HashSet<&str> = plot_ids.iter().map(|p| p.as_str()).collect();
    let rows: Vec<_> = table
        .rows()
        .iter()
        .filter(|r| wanted.contains(r.plot.as_str()))
        .collect();
    if rows.is_empty() {
        return Err(DashError::NoMatchingData);
    }
    let col = table
        .column_index(variable)
        .ok_or_else(|| DashError::UnknownVariable {
            name: variable.to_string(),
        })?;
    Ok(rows
        .into_iter()
        .map(|r| (&r.plot, &r.cells[col]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let mut t = Table::new(vec![
            "plot".to_string(),
            "yield".to_string(),
            "protein".to_string(),
        ])
        .unwrap();
        t.push(&["HART_S1_P1_R1", "3.2", "11.5"]).unwrap();
        t.push(&["HART_S1_P1_R2", "NA", "10.8"]).unwrap();
        t.push(&["HART_S2_P1_R1", "2.9", "12.1"]).unwrap();
        t
    }

    fn ids(raw: &[&str]) -> Vec<PlotId> {
        raw.iter().map(|r| PlotId::parse(r).unwrap()).collect()
    }

    #[test]
    fn test_projection_preserves_source_order() {
        let t = sample_table();
        let ids = ids(&["HART_S2_P1_R1", "HART_S1_P1_R1"]);
        let out = project(&t, &ids, "yield").unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].0.as_str(), "HART_S1_P1_R1");
        assert_eq!(out[0].1.as_num(), Some(3.2));
        assert_eq!(out[1].0.as_str(), "HART_S2_P1_R1");
    }

    #[test]
    fn test_missing_values_pass_through() {
        let t = sample_table();
        let ids = ids(&["HART_S1_P1_R2"]);
        let out = project(&t, &ids, "yield").unwrap();
        assert!(out[0].1.is_missing());
    }

    #[test]
    fn test_no_matching_rows() {
        let t = sample_table();
        let ids = ids(&["BROOKSTEAD_S1_P1_R1"]);
        let err = project(&t, &ids, "yield").unwrap_err();
        assert!(matches!(err, DashError::NoMatchingData));
    }

    #[test]
    fn test_empty_id_list_is_no_match() {
        let t = sample_table();
        assert!(matches!(
            project(&t, &[], "yield").unwrap_err(),
            DashError::NoMatchingData
        ));
    }

    #[test]
    fn test_unknown_variable_after_match_check() {
        let t = sample_table();
        // no matching rows wins over the unknown column
        let err = project(&t, &[], "nope").unwrap_err();
        assert!(matches!(err, DashError::NoMatchingData));

        let ids = ids(&["HART_S1_P1_R1"]);
        let err = project(&t, &ids, "nope").unwrap_err();
        assert!(matches!(err, DashError::UnknownVariable { .. }));
    }
}
