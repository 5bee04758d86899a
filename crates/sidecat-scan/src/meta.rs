//! Meta file parsing.
//!
//! A meta file holds one `key=value` pair per line. Lines are split on the
//! first `=` only, so values may contain `=` themselves. Keys and values
//! are trimmed and title-cased; pairs with an empty side are dropped, as
//! are lines with no `=` at all. Repeated keys accumulate their values in
//! encounter order.

use std::path::Path;

use indexmap::IndexMap;

use sidecat_core::MetaError;

use crate::encoding::decode_text;

/// Category type name → category values, in encounter order.
pub type CategoryMap = IndexMap<String, Vec<String>>;

/// Read and parse a meta file.
///
/// The file is read through a scoped handle, so it is closed on every
/// exit path.
pub fn parse_meta_file(path: &Path) -> Result<CategoryMap, MetaError> {
    let bytes = std::fs::read(path).map_err(|e| MetaError::io(path, e))?;
    Ok(parse_meta_str(&decode_text(&bytes)))
}

/// Parse decoded meta file contents.
pub fn parse_meta_str(text: &str) -> CategoryMap {
    parse_meta_lines(text.lines())
}

/// Parse a stream of meta file lines.
pub fn parse_meta_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> CategoryMap {
    let mut categories = CategoryMap::new();
    for line in lines {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };

        let key = title_case(key.trim());
        let value = title_case(value.trim());
        if key.is_empty() || value.is_empty() {
            continue;
        }

        categories.entry(key).or_default().push(value);
    }
    categories
}

/// Capitalize the first letter of every whitespace-delimited word.
///
/// Other characters, including whitespace runs, are left as they are.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            at_word_start = false;
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}
