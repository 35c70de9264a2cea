//! Raw row reader.
//!
//! Flattens the page blocks of an entry's page range into a single ordered
//! list of rows, one row per block line. Page furniture (the running header
//! and footer) is dropped by position, and span text is conditionally
//! token-split so that format-table lines come back one cell per token while
//! prose stays intact.

use crate::error::{Error, Result};
use crate::model::Row;
use crate::source::DocumentSource;

/// Blocks dropped from the top of each page (the running header).
const HEADER_BLOCKS: usize = 1;

/// Blocks dropped from the bottom of each page (footer and page number).
const FOOTER_BLOCKS: usize = 3;

/// Spans longer than this are split on whitespace while including.
const TOKEN_SPLIT_LEN: usize = 8;

/// Whether spans are currently being token-split.
///
/// The entry name is printed as a vertical watermark on every page of its
/// section, one occurrence per column of text. Each sighting toggles this
/// state, which cheaply distinguishes the format table (split) from the
/// describer prose (kept whole).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipState {
    /// Long spans are split into whitespace tokens.
    Including,
    /// Spans pass through unsplit.
    Excluding,
}

impl SkipState {
    fn toggled(self) -> Self {
        match self {
            SkipState::Including => SkipState::Excluding,
            SkipState::Excluding => SkipState::Including,
        }
    }
}

/// Read the rows of `card_name`'s section.
///
/// `start_page` is the 0-based first page, `end_page` the 0-based exclusive
/// last page. Rows come back in reading order across the whole range.
pub fn read(
    source: &dyn DocumentSource,
    card_name: &str,
    start_page: u32,
    end_page: u32,
) -> Result<Vec<Row>> {
    let pages = source.page_count();
    if start_page > end_page || end_page > pages {
        return Err(Error::PageRange {
            start: start_page,
            end: end_page,
            pages,
        });
    }

    let mut rows: Vec<Row> = Vec::new();
    let mut state = SkipState::Including;

    for page_index in start_page..end_page {
        let mut blocks = source.page_blocks(page_index)?;
        blocks.sort_by(|a, b| {
            a.top
                .partial_cmp(&b.top)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let keep = blocks.len().saturating_sub(HEADER_BLOCKS + FOOTER_BLOCKS);
        if keep == 0 {
            log::warn!(
                "page {} has only {} blocks, skipping",
                page_index + 1,
                blocks.len()
            );
            continue;
        }

        for block in blocks.into_iter().skip(HEADER_BLOCKS).take(keep) {
            for line in block.lines {
                let mut row: Row = Vec::new();
                for span in &line.spans {
                    if span == card_name {
                        state = state.toggled();
                    }
                    if state == SkipState::Including && span.chars().count() > TOKEN_SPLIT_LEN {
                        row.extend(span.split_whitespace().map(str::to_string));
                    } else {
                        row.push(span.clone());
                    }
                }
                rows.push(row);
            }
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{BlockLine, PageBlock, TocEntry};

    struct FakeSource {
        pages: Vec<Vec<PageBlock>>,
    }

    impl DocumentSource for FakeSource {
        fn page_count(&self) -> u32 {
            self.pages.len() as u32
        }

        fn toc(&self) -> Result<Vec<TocEntry>> {
            Ok(vec![])
        }

        fn page_blocks(&self, page_index: u32) -> Result<Vec<PageBlock>> {
            Ok(self.pages[page_index as usize].clone())
        }
    }

    fn block(top: f32, lines: Vec<Vec<&str>>) -> PageBlock {
        PageBlock::new(top, lines.into_iter().map(BlockLine::new).collect())
    }

    fn furniture(top: f32, text: &str) -> PageBlock {
        block(top, vec![vec![text]])
    }

    #[test]
    fn test_drops_header_and_footer_blocks() {
        let source = FakeSource {
            pages: vec![vec![
                furniture(20.0, "Running Header"),
                block(100.0, vec![vec!["kept"]]),
                furniture(700.0, "footer-1"),
                furniture(720.0, "footer-2"),
                furniture(740.0, "page 42"),
            ]],
        };

        let rows = read(&source, "CFOO", 0, 1).unwrap();
        assert_eq!(rows, vec![vec!["kept".to_string()]]);
    }

    #[test]
    fn test_splits_long_spans_while_including() {
        let source = FakeSource {
            pages: vec![vec![
                furniture(20.0, "hdr"),
                block(
                    100.0,
                    vec![vec!["short", "EID PID GA GB", "tiny one"]],
                ),
                furniture(700.0, "f1"),
                furniture(720.0, "f2"),
                furniture(740.0, "f3"),
            ]],
        };

        let rows = read(&source, "CFOO", 0, 1).unwrap();
        // "tiny one" is 8 chars, at the threshold, so it stays whole.
        assert_eq!(
            rows,
            vec![vec![
                "short".to_string(),
                "EID".to_string(),
                "PID".to_string(),
                "GA".to_string(),
                "GB".to_string(),
                "tiny one".to_string(),
            ]]
        );
    }

    #[test]
    fn test_watermark_toggles_splitting() {
        let source = FakeSource {
            pages: vec![vec![
                furniture(20.0, "hdr"),
                block(
                    100.0,
                    vec![
                        vec!["CFOO", "Grid point identification."],
                        vec!["CFOO", "EID PID GA GB"],
                    ],
                ),
                furniture(700.0, "f1"),
                furniture(720.0, "f2"),
                furniture(740.0, "f3"),
            ]],
        };

        let rows = read(&source, "CFOO", 0, 1).unwrap();
        // First sighting flips to Excluding: the long prose span stays whole.
        assert_eq!(
            rows[0],
            vec!["CFOO".to_string(), "Grid point identification.".to_string()]
        );
        // Second sighting flips back: the format line is split.
        assert_eq!(
            rows[1],
            vec![
                "CFOO".to_string(),
                "EID".to_string(),
                "PID".to_string(),
                "GA".to_string(),
                "GB".to_string(),
            ]
        );
    }

    #[test]
    fn test_sparse_page_is_skipped() {
        let source = FakeSource {
            pages: vec![
                vec![furniture(20.0, "hdr"), furniture(700.0, "f1")],
                vec![
                    furniture(20.0, "hdr"),
                    block(100.0, vec![vec!["kept"]]),
                    furniture(700.0, "f1"),
                    furniture(720.0, "f2"),
                    furniture(740.0, "f3"),
                ],
            ],
        };

        let rows = read(&source, "CFOO", 0, 2).unwrap();
        assert_eq!(rows, vec![vec!["kept".to_string()]]);
    }

    #[test]
    fn test_invalid_page_range() {
        let source = FakeSource { pages: vec![] };

        let result = read(&source, "CFOO", 3, 1);
        assert!(matches!(result, Err(Error::PageRange { .. })));

        let result = read(&source, "CFOO", 0, 5);
        assert!(matches!(result, Err(Error::PageRange { .. })));
    }

    #[test]
    fn test_blocks_sorted_by_position_not_emission_order() {
        let source = FakeSource {
            pages: vec![vec![
                furniture(740.0, "f3"),
                block(100.0, vec![vec!["first"]]),
                furniture(20.0, "hdr"),
                furniture(700.0, "f1"),
                block(200.0, vec![vec!["second"]]),
                furniture(720.0, "f2"),
            ]],
        };

        let rows = read(&source, "CFOO", 0, 1).unwrap();
        assert_eq!(
            rows,
            vec![vec!["first".to_string()], vec!["second".to_string()]]
        );
    }
}
