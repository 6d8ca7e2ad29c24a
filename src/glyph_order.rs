//! Glyph identifiers and the unified glyph order
//!
//! Glyphs are identified by name throughout the merge. Unification renames
//! every glyph with a `#<font index>` suffix and concatenates the per-font
//! orders, so the merged sequence is collision-free as long as no original
//! name already carries a matching suffix.

use std::{
    borrow::Borrow,
    collections::HashMap,
    fmt::{Display, Formatter, Result},
    ops::Deref,
};

use crate::types::FontIndex;

/// A glyph name, possibly already renamed for the merged font
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlyphName(String);

impl GlyphName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The name this glyph carries in the merged font: `name#<font index>`
    pub fn renamed(&self, font: FontIndex) -> GlyphName {
        GlyphName(format!("{}#{}", self.0, font.as_usize()))
    }
}

impl Deref for GlyphName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GlyphName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for GlyphName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for GlyphName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for GlyphName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<String> for GlyphName {
    fn eq(&self, other: &String) -> bool {
        self.0 == other.as_str()
    }
}

impl Display for GlyphName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GlyphName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for GlyphName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<GlyphName> for String {
    fn from(GlyphName(name): GlyphName) -> Self {
        name
    }
}

/// An ordered sequence of glyph names with positional lookup
#[derive(Debug, Clone, Default)]
pub struct GlyphOrder {
    names: Vec<GlyphName>,
    index: HashMap<GlyphName, usize>,
}

impl GlyphOrder {
    pub fn new(names: Vec<GlyphName>) -> Self {
        let index = names.iter().enumerate().map(|(i, n)| (n.clone(), i)).collect();
        Self { names, index }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[GlyphName] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &GlyphName> {
        self.names.iter()
    }

    /// Position of a name in this order, if present
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// This order with every name suffixed for the given font index
    pub fn renamed(&self, font: FontIndex) -> GlyphOrder {
        GlyphOrder::new(self.names.iter().map(|n| n.renamed(font)).collect())
    }
}

impl FromIterator<GlyphName> for GlyphOrder {
    fn from_iter<I: IntoIterator<Item = GlyphName>>(iter: I) -> Self {
        GlyphOrder::new(iter.into_iter().collect())
    }
}

/// Unify per-font glyph orders into the merged order.
///
/// Every name in font n becomes `name#n`; the merged sequence is the
/// concatenation of the renamed sequences in font input order. Length
/// equals the sum of the input glyph counts.
pub fn unify_glyph_orders(orders: &[GlyphOrder]) -> GlyphOrder {
    orders
        .iter()
        .enumerate()
        .flat_map(|(n, order)| {
            let font = FontIndex::new(n);
            order.iter().map(move |name| name.renamed(font))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn order(names: &[&str]) -> GlyphOrder {
        names.iter().map(|n| GlyphName::new(*n)).collect()
    }

    #[test]
    fn test_glyph_name_display() {
        let name = GlyphName::new("A");
        assert_eq!(format!("{}", name), "A");
    }

    #[test]
    fn test_glyph_name_renamed() {
        let name = GlyphName::new("A");
        assert_eq!(name.renamed(FontIndex::new(0)), "A#0");
        assert_eq!(name.renamed(FontIndex::new(12)), "A#12");
    }

    #[test]
    fn test_glyph_name_equality() {
        let name = GlyphName::new("test");
        assert_eq!(name, "test");
        assert_eq!(name, String::from("test"));
        assert_eq!(name, GlyphName::new("test"));
    }

    #[test]
    fn test_order_position() {
        let order = order(&[".notdef", "A", "B"]);
        assert_eq!(order.position("A"), Some(1));
        assert_eq!(order.position("missing"), None);
    }

    #[test]
    fn test_unify_concatenates_in_input_order() {
        let a = order(&[".notdef", "A", "B"]);
        let b = order(&[".notdef", "C"]);

        let merged = unify_glyph_orders(&[a, b]);

        let names: Vec<&str> = merged.iter().map(GlyphName::as_str).collect();
        assert_eq!(names, [".notdef#0", "A#0", "B#0", ".notdef#1", "C#1"]);
    }

    #[test]
    fn test_unify_length_is_sum_of_inputs() {
        let a = order(&[".notdef", "A", "B"]);
        let b = order(&[".notdef", "C"]);
        let c = order(&[".notdef"]);

        let merged = unify_glyph_orders(&[a.clone(), b.clone(), c.clone()]);
        assert_eq!(merged.len(), a.len() + b.len() + c.len());
    }

    #[test]
    fn test_unify_names_pairwise_distinct() {
        // The same original names in every font stay distinct after renaming.
        let a = order(&[".notdef", "A"]);
        let b = order(&[".notdef", "A"]);

        let merged = unify_glyph_orders(&[a, b]);
        let unique: HashSet<&GlyphName> = merged.iter().collect();
        assert_eq!(unique.len(), merged.len());
    }

    #[test]
    fn test_unify_single_font_suffixes_zero() {
        let merged = unify_glyph_orders(&[order(&[".notdef", "space"])]);
        let names: Vec<&str> = merged.iter().map(GlyphName::as_str).collect();
        assert_eq!(names, [".notdef#0", "space#0"]);
    }
}
