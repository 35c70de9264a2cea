//! Table reconstruction.
//!
//! Turns the raw row slices between zone markers into the two tables a
//! record carries: the fixed-column format table and the describer table.

use crate::model::Row;

/// Cells of the format table are padded to this width.
const FORMAT_CELL_WIDTH: usize = 8;

/// Header row of the describer table.
const DESCRIBER_HEADER: [&str; 2] = ["Describer", "Meaning"];

/// Continuation artifact printed in the guide's describer column.
const CONTINUATION_SENTINEL: &str = "v";

/// Build the format table from the rows between the long description and the
/// "Example:" marker.
///
/// Leading single-cell rows are section labels (alternate format headings)
/// and pass through untouched. Data rows get every cell left-padded to the
/// fixed width, and continuation rows (all but the first data row) get an
/// empty leading cell so their fields line up under the parent row's.
pub fn build_format(rows: &[Row]) -> Vec<Row> {
    let labels = rows
        .iter()
        .take_while(|row| row.len() == 1)
        .cloned()
        .collect::<Vec<_>>();

    let mut table = labels;
    for (data_index, row) in rows.iter().skip(table.len()).enumerate() {
        let mut padded: Row = row
            .iter()
            .map(|cell| format!("{cell:<width$}", width = FORMAT_CELL_WIDTH))
            .collect();
        if data_index > 1 {
            padded.insert(0, String::new());
        }
        table.push(padded);
    }
    table
}

/// Build the describer table from the rows between the "Describer" header and
/// the "Remarks:" marker.
///
/// Page breaks inside the table repeat the header row; those repeats are
/// dropped. Wrapped meanings arrive as extra cells and are merged back into
/// one, and the guide's continuation sentinel rows are removed.
pub fn build_describer(rows: &[Row]) -> Vec<Row> {
    rows.iter()
        .enumerate()
        .filter(|(i, row)| *i < 2 || !is_header(row))
        .map(|(_, row)| merge_meaning(row))
        .filter(|row| !is_continuation(row))
        .collect()
}

fn is_header(row: &Row) -> bool {
    row.len() == DESCRIBER_HEADER.len()
        && row.iter().zip(DESCRIBER_HEADER).all(|(cell, h)| cell == h)
}

/// Collapse `[describer, part, part, ...]` into `[describer, meaning]`.
///
/// Parts are concatenated without a separator: wrapped spans carry their own
/// trailing whitespace, so inserting one would double it.
fn merge_meaning(row: &Row) -> Row {
    let head = row.first().cloned().unwrap_or_default();
    let meaning = row.iter().skip(1).map(String::as_str).collect::<String>();
    vec![head, meaning]
}

fn is_continuation(row: &Row) -> bool {
    row.first().is_some_and(|c| c == CONTINUATION_SENTINEL)
        && row
            .get(1)
            .is_some_and(|c| c == CONTINUATION_SENTINEL || c.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_build_format_pads_and_indents() {
        let rows = vec![
            row(&["1", "2", "3"]),
            row(&["CBUSH", "EID", "PID"]),
            row(&["+", "S1", "S2"]),
        ];

        let table = build_format(&rows);
        assert_eq!(table[0], row(&["1       ", "2       ", "3       "]));
        assert_eq!(table[1], row(&["CBUSH   ", "EID     ", "PID     "]));
        // Third data row onward gets the alignment cell.
        assert_eq!(table[2], row(&["", "+       ", "S1      ", "S2      "]));
    }

    #[test]
    fn test_build_format_keeps_leading_labels() {
        let rows = vec![
            row(&["Alternate Format:"]),
            row(&["1", "2"]),
            row(&["CBUSH", "EID"]),
            row(&["+", "S1"]),
        ];

        let table = build_format(&rows);
        assert_eq!(table[0], row(&["Alternate Format:"]));
        assert_eq!(table[1], row(&["1       ", "2       "]));
        // Indexing restarts after the labels.
        assert_eq!(table[3], row(&["", "+       ", "S1      "]));
    }

    #[test]
    fn test_build_format_leaves_wide_cells_alone() {
        let table = build_format(&[row(&["LONGFIELD1"])]);
        // Only single-cell label rows pass through; a 10-char cell in a data
        // row would not be truncated either.
        assert_eq!(table[0], row(&["LONGFIELD1"]));
    }

    #[test]
    fn test_build_describer_cleanup() {
        let rows = vec![
            row(&["Describer", "Meaning"]),
            row(&["A", "x"]),
            row(&["Describer", "Meaning"]),
            row(&["B", "y"]),
            row(&["v", "v"]),
            row(&["v", ""]),
        ];

        let table = build_describer(&rows);
        assert_eq!(
            table,
            vec![
                row(&["Describer", "Meaning"]),
                row(&["A", "x"]),
                row(&["B", "y"]),
            ]
        );
    }

    #[test]
    fn test_build_describer_merges_wrapped_meanings() {
        let rows = vec![
            row(&["Describer", "Meaning"]),
            row(&["EID", "Unique element identification ", "number. (Integer > 0)"]),
        ];

        let table = build_describer(&rows);
        assert_eq!(
            table[1],
            row(&["EID", "Unique element identification number. (Integer > 0)"])
        );
    }

    #[test]
    fn test_merge_adds_no_separator() {
        // Wrapped spans keep their own trailing whitespace; the merge must
        // not insert more.
        let rows = vec![
            row(&["Describer", "Meaning"]),
            row(&["EID", "Unique element ", "identification"]),
        ];

        let table = build_describer(&rows);
        assert_eq!(table[1][1], "Unique element identification");
    }

    #[test]
    fn test_build_describer_keeps_first_two_rows_verbatim() {
        // Only header repeats at index 2 and beyond are page-break artifacts.
        let rows = vec![
            row(&["Describer", "Meaning"]),
            row(&["Describer", "Meaning"]),
            row(&["Describer", "Meaning"]),
        ];

        let table = build_describer(&rows);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_continuation_with_real_meaning_survives() {
        let rows = vec![
            row(&["Describer", "Meaning"]),
            row(&["v", "Vector component."]),
        ];

        let table = build_describer(&rows);
        assert_eq!(table.len(), 2);
        assert_eq!(table[1], row(&["v", "Vector component."]));
    }
}
