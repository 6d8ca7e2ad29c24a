//! Merge options and the drop policy

use crate::{MergeError, Result, types::TableTag};

/// Tables excluded from the merged font unless the caller overrides the
/// drop list. Control programs and gasp assume hinting state that does
/// not survive a merge.
pub const DEFAULT_DROP_TABLES: [&str; 4] = ["fpgm", "prep", "cvt ", "gasp"];

/// Options for font merging
#[derive(Debug, Clone)]
pub struct Options {
    /// Tables to drop from the merged font
    pub drop_tables: Vec<TableTag>,

    /// Whether to enable verbose logging
    pub verbose: bool,

    /// Whether to report timing information
    pub timing: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            drop_tables: DEFAULT_DROP_TABLES.iter().filter_map(|s| TableTag::parse(s)).collect(),
            verbose: false,
            timing: false,
        }
    }
}

enum Op {
    Assign,
    Append,
    Remove,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the drop list (accepts any iterable of string-like values)
    pub fn drop_tables(mut self, tables: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        self.drop_tables =
            tables.into_iter().filter_map(|s| TableTag::parse(s.as_ref())).collect();
        self
    }

    /// Add a single table to drop
    pub fn drop_table(mut self, table: impl AsRef<str>) -> Self {
        if let Some(tag) = TableTag::parse(table.as_ref()) {
            self.drop_tables.push(tag);
        }
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn timing(mut self, timing: bool) -> Self {
        self.timing = timing;
        self
    }

    /// Check if a table should be dropped
    pub fn should_drop(&self, tag: &TableTag) -> bool {
        self.drop_tables.contains(tag)
    }

    /// Applies one textual override of the form `key=value`, `key+=value`
    /// or `key-=value`; a bare key enables a boolean. Hyphens in the key
    /// are interchangeable with underscores. Unknown keys abort unless
    /// listed in `ignorable`.
    pub fn apply(&mut self, option: &str, ignorable: &[&str]) -> Result<()> {
        let (key, op, value) = if let Some((k, v)) = option.split_once("+=") {
            (k, Op::Append, v)
        } else if let Some((k, v)) = option.split_once("-=") {
            (k, Op::Remove, v)
        } else if let Some((k, v)) = option.split_once('=') {
            (k, Op::Assign, v)
        } else {
            (option, Op::Assign, "true")
        };

        let key = key.trim().replace('-', "_");
        match key.as_str() {
            "drop_tables" => {
                let tags = parse_tag_list(&key, value)?;
                match op {
                    Op::Assign => self.drop_tables = tags,
                    Op::Append => self.drop_tables.extend(tags),
                    Op::Remove => self.drop_tables.retain(|t| !tags.contains(t)),
                }
            }
            "verbose" => self.verbose = parse_bool(&key, value, op)?,
            "timing" => self.timing = parse_bool(&key, value, op)?,
            _ if ignorable.contains(&key.as_str()) => {}
            _ => return Err(MergeError::UnknownOption(key)),
        }
        Ok(())
    }
}

fn parse_tag_list(key: &str, value: &str) -> Result<Vec<TableTag>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            TableTag::parse(s).ok_or_else(|| MergeError::InvalidOptionValue {
                key: key.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

fn parse_bool(key: &str, value: &str, op: Op) -> Result<bool> {
    let invalid = || MergeError::InvalidOptionValue {
        key: key.to_string(),
        value: value.to_string(),
    };
    if !matches!(op, Op::Assign) {
        return Err(invalid());
    }
    match value.trim() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(invalid()),
    }
}
