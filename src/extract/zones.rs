//! Section zone location.
//!
//! An entry's documentation always runs heading, description, format table,
//! example, describer table, remarks. The three marker lines "Example:",
//! "Describer" and "Remarks:" delimit those zones in the flattened rows; this
//! module finds them and resolves the entry's page range from the table of
//! contents.

use crate::error::{Error, Result};
use crate::model::Row;
use crate::source::TocEntry;

/// Marker closing the format table.
pub const EXAMPLE_MARKER: &str = "Example";

/// Marker opening the describer table.
pub const DESCRIBER_MARKER: &str = "Describer";

/// Marker closing the describer table.
pub const REMARKS_MARKER: &str = "Remarks";

/// Row indices of the three zone markers, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneBounds {
    /// Index of the "Example:" row
    pub example: usize,
    /// Index of the "Describer" header row
    pub describer: usize,
    /// Index of the "Remarks:" row
    pub remarks: usize,
}

/// An entry's page extent, resolved from the table of contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    /// 0-based first page
    pub start: u32,
    /// 0-based exclusive end page
    pub end: u32,
    /// 1-based page for viewer deep links
    pub source_page: u32,
}

/// Locate the three zone markers in the extracted rows.
///
/// Each marker is searched from the previous one forward, so a stray
/// "Example" inside remark prose cannot shadow the real format-table
/// terminator.
pub fn locate(rows: &[Row]) -> Result<ZoneBounds> {
    let example = find_marker(rows, 0, EXAMPLE_MARKER)?;
    let describer = find_marker(rows, example, DESCRIBER_MARKER)?;
    let remarks = find_marker(rows, describer, REMARKS_MARKER)?;
    Ok(ZoneBounds {
        example,
        describer,
        remarks,
    })
}

fn find_marker(rows: &[Row], from: usize, marker: &'static str) -> Result<usize> {
    rows.iter()
        .enumerate()
        .skip(from)
        .find(|(_, row)| row.first().is_some_and(|cell| cell.contains(marker)))
        .map(|(i, _)| i)
        .ok_or(Error::MarkerNotFound(marker))
}

/// Resolve `name`'s page range from the table of contents.
///
/// The section runs from the entry's own page up to the page of the next
/// entry in document order. Entries are documented back to back, so an entry
/// with no successor cannot be bounded and is treated as not found.
pub fn resolve_page_range(toc: &[TocEntry], name: &str) -> Result<PageRange> {
    let pos = toc
        .iter()
        .position(|entry| entry.title == name)
        .ok_or_else(|| Error::SectionNotFound(name.to_string()))?;

    let entry = &toc[pos];
    let next = toc
        .get(pos + 1)
        .ok_or_else(|| Error::SectionNotFound(name.to_string()))?;

    if entry.page == 0 || next.page == 0 {
        return Err(Error::SectionNotFound(name.to_string()));
    }

    Ok(PageRange {
        start: entry.page - 1,
        end: next.page - 1,
        source_page: entry.page,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn rows_with_markers() -> Vec<Row> {
        let mut rows = vec![row(&["CBUSH", "Spring"]); 5];
        rows.push(row(&["Example:"]));
        rows.extend(std::iter::repeat(row(&["data"])).take(6));
        rows.push(row(&["Describer", "Meaning"]));
        rows.extend(std::iter::repeat(row(&["EID", "..."])).take(7));
        rows.push(row(&["Remarks:"]));
        rows
    }

    #[test]
    fn test_locate_markers() {
        let bounds = locate(&rows_with_markers()).unwrap();
        assert_eq!(
            bounds,
            ZoneBounds {
                example: 5,
                describer: 12,
                remarks: 20,
            }
        );
    }

    #[test]
    fn test_marker_matches_on_first_cell_only() {
        let mut rows = rows_with_markers();
        // An "Example" in a later cell must not terminate the format zone.
        rows[2] = row(&["data", "Example usage is shown below."]);
        let bounds = locate(&rows).unwrap();
        assert_eq!(bounds.example, 5);
    }

    #[test]
    fn test_missing_remarks_marker() {
        let mut rows = rows_with_markers();
        rows.pop();
        let result = locate(&rows);
        assert!(matches!(result, Err(Error::MarkerNotFound(REMARKS_MARKER))));
    }

    #[test]
    fn test_markers_found_in_order() {
        // A "Describer" row before "Example:" belongs to a different zone and
        // must not be picked up.
        let mut rows = vec![row(&["Describer", "too early"])];
        rows.extend(rows_with_markers());
        let bounds = locate(&rows).unwrap();
        assert_eq!(bounds.example, 6);
        assert_eq!(bounds.describer, 13);
    }

    #[test]
    fn test_resolve_page_range() {
        let toc = vec![
            TocEntry::new(1, "Bulk Data Entries", 1400),
            TocEntry::new(2, "CBUSH", 1484),
            TocEntry::new(2, "CBUSH1D", 1489),
        ];

        let range = resolve_page_range(&toc, "CBUSH").unwrap();
        assert_eq!(range.start, 1483);
        assert_eq!(range.end, 1488);
        assert_eq!(range.source_page, 1484);
    }

    #[test]
    fn test_absent_entry() {
        let toc = vec![TocEntry::new(2, "CBUSH", 1484)];
        let result = resolve_page_range(&toc, "CELAS1");
        assert!(matches!(result, Err(Error::SectionNotFound(_))));
    }

    #[test]
    fn test_last_entry_cannot_be_bounded() {
        let toc = vec![
            TocEntry::new(2, "CBUSH", 1484),
            TocEntry::new(2, "CBUSH1D", 1489),
        ];
        let result = resolve_page_range(&toc, "CBUSH1D");
        assert!(matches!(result, Err(Error::SectionNotFound(_))));
    }

    #[test]
    fn test_unresolved_destination_page() {
        let toc = vec![
            TocEntry::new(2, "CBUSH", 0),
            TocEntry::new(2, "CBUSH1D", 1489),
        ];
        let result = resolve_page_range(&toc, "CBUSH");
        assert!(matches!(result, Err(Error::SectionNotFound(_))));
    }
}
