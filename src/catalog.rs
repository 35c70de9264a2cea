//! Valid entry names from the DataTypes metadata file.
//!
//! The file is a small XML tree: a `groups` element, two wrapper `group`
//! levels, then one `group` per entry category whose `group` and `dataset`
//! children carry the entry names. Parsed once per run, consumed read-only.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::{Error, Result};

/// `group` nesting depth of the entry-category elements below `groups`.
const CATEGORY_DEPTH: usize = 2;

/// Load the set of valid entry names from the DataTypes XML.
pub fn load_cards(path: &Path) -> Result<BTreeSet<String>> {
    let xml = fs::read_to_string(path)?;
    parse_cards(&xml)
}

/// Scan the XML for entry names.
///
/// A full XML parse is not needed for a file this regular; a tag scan with
/// explicit depth tracking is enough to find the entry-category level.
fn parse_cards(xml: &str) -> Result<BTreeSet<String>> {
    let tag = Regex::new(r"<(/?)(groups|group|dataset)\b([^>]*?)(/?)>")
        .map_err(|e| Error::Catalog(e.to_string()))?;
    let name_attr = Regex::new(r#"name\s*=\s*"([^"]*)""#).map_err(|e| Error::Catalog(e.to_string()))?;

    let mut cards = BTreeSet::new();
    let mut in_groups = false;
    let mut depth = 0usize;

    for caps in tag.captures_iter(xml) {
        let closing = &caps[1] == "/";
        let element = &caps[2];
        let attrs = &caps[3];
        let self_closing = &caps[4] == "/";

        match element {
            "groups" => {
                in_groups = !closing;
                depth = 0;
            }
            "group" if in_groups => {
                if closing {
                    depth = depth.saturating_sub(1);
                } else {
                    if depth == CATEGORY_DEPTH + 1 {
                        collect_name(&name_attr, attrs, &mut cards);
                    }
                    if !self_closing {
                        depth += 1;
                    }
                }
            }
            "dataset" if in_groups && !closing && depth == CATEGORY_DEPTH + 1 => {
                collect_name(&name_attr, attrs, &mut cards);
            }
            _ => {}
        }
    }

    if cards.is_empty() {
        return Err(Error::Catalog(
            "no bulk data entries found in DataTypes file".to_string(),
        ));
    }
    Ok(cards)
}

fn collect_name(name_attr: &Regex, attrs: &str, cards: &mut BTreeSet<String>) {
    if let Some(caps) = name_attr.captures(attrs) {
        let name = caps[1].trim();
        if !name.is_empty() {
            cards.insert(name.to_string());
        }
    }
}
