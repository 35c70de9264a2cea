//! Documentation URLs derived from the entry-name partition table.
//!
//! The hosted guide splits the bulk data section into bundles by leading
//! letter; `C` entries are further split at `CO`. The URL is only used for
//! display and linking, it is never fetched.

/// Default base URL of the hosted Quick Reference Guide.
pub const DEFAULT_BASE_URL: &str =
    "https://help.hexagonmi.com/bundle/MSC_Nastran_2022.4/page/Nastran_Combined_Book/qrg/";

/// Bundle path segment for an entry name, per the fixed partition table.
fn bundle_segment(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();
    let first = chars.next()?;

    if first == 'C' {
        return match chars.next()? {
            'A'..='N' => Some("bulkc1"),
            'O'..='Z' => Some("bulkc2"),
            _ => None,
        };
    }

    match first {
        'A' | 'B' => Some("bulkab"),
        'D' | 'E' => Some("bulkde"),
        'F'..='L' => Some("bulkfgil"),
        'M'..='O' => Some("bulkmno"),
        'P' => Some("bulkp"),
        'Q'..='S' => Some("bulkqrs"),
        'T'..='Z' => Some("bulktuv"),
        _ => None,
    }
}

/// Build the documentation URL for an entry.
///
/// Returns `None` for names outside the partition table; the renderer then
/// falls back to the bare name.
pub fn doc_url(base: &str, name: &str) -> Option<String> {
    let segment = bundle_segment(name)?;
    Some(format!("{base}{segment}/TOC.{name}.xhtml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_segments() {
        assert_eq!(bundle_segment("ABINFL"), Some("bulkab"));
        assert_eq!(bundle_segment("CBUSH"), Some("bulkc1"));
        assert_eq!(bundle_segment("CONM2"), Some("bulkc2"));
        assert_eq!(bundle_segment("DMIG"), Some("bulkde"));
        assert_eq!(bundle_segment("GRID"), Some("bulkfgil"));
        assert_eq!(bundle_segment("MAT1"), Some("bulkmno"));
        assert_eq!(bundle_segment("PBUSH"), Some("bulkp"));
        assert_eq!(bundle_segment("RBE2"), Some("bulkqrs"));
        assert_eq!(bundle_segment("TLOAD1"), Some("bulktuv"));
    }

    #[test]
    fn test_names_outside_the_table() {
        assert_eq!(bundle_segment(""), None);
        assert_eq!(bundle_segment("C"), None);
        assert_eq!(bundle_segment("C2"), None);
        assert_eq!(bundle_segment("1D"), None);
    }

    #[test]
    fn test_doc_url() {
        let url = doc_url(DEFAULT_BASE_URL, "CBUSH").unwrap();
        assert_eq!(
            url,
            "https://help.hexagonmi.com/bundle/MSC_Nastran_2022.4/page/\
             Nastran_Combined_Book/qrg/bulkc1/TOC.CBUSH.xhtml"
        );
        assert!(doc_url(DEFAULT_BASE_URL, "9X").is_none());
    }
}
