//! Strategy registration keyed by table tag

use std::collections::HashMap;

use crate::{
    Result,
    tables::{self, Disposition, TableRecord, tags},
    types::TableTag,
};

/// A merge strategy. Receives the per-font records for one tag, in font
/// input order, and decides whether a merged record reaches the output.
pub type MergeFn = fn(&[&TableRecord]) -> Result<Disposition>;

/// Tag-keyed strategy table, populated once before the merge runs.
pub struct StrategyRegistry {
    strategies: HashMap<TableTag, MergeFn>,
}

impl StrategyRegistry {
    pub fn empty() -> Self {
        Self { strategies: HashMap::new() }
    }

    /// The built-in strategy set covering every table the merge knows how
    /// to handle.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(tags::MAXP, tables::maxp::merge);
        registry.register(tags::HEAD, tables::head::merge);
        registry.register(tags::HHEA, tables::hhea::merge);
        registry.register(tags::OS2, tables::os2::merge);
        registry.register(tags::POST, tables::post::merge);
        registry.register(tags::HMTX, tables::metrics::merge_hmtx);
        registry.register(tags::VMTX, tables::metrics::merge_vmtx);
        registry.register(tags::GLYF, tables::glyf::merge);
        registry.register(tags::LOCA, tables::merge_loca);
        registry.register(tags::CMAP, tables::cmap::merge);
        registry.register(tags::PREP, tables::hint::merge);
        registry.register(tags::FPGM, tables::hint::merge);
        registry.register(tags::CVT, tables::hint::merge);
        registry
    }

    pub fn register(&mut self, tag: TableTag, strategy: MergeFn) {
        self.strategies.insert(tag, strategy);
    }

    pub fn get(&self, tag: TableTag) -> Option<MergeFn> {
        self.strategies.get(&tag).copied()
    }

    pub fn contains(&self, tag: TableTag) -> bool {
        self.strategies.contains_key(&tag)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_the_merged_tables() {
        let registry = StrategyRegistry::builtin();
        for tag in [
            tags::MAXP,
            tags::HEAD,
            tags::HHEA,
            tags::OS2,
            tags::POST,
            tags::HMTX,
            tags::VMTX,
            tags::GLYF,
            tags::LOCA,
            tags::CMAP,
            tags::PREP,
            tags::FPGM,
            tags::CVT,
        ] {
            assert!(registry.contains(tag), "no strategy for {tag}");
        }
    }

    #[test]
    fn test_unknown_tags_have_no_strategy() {
        let registry = StrategyRegistry::builtin();
        assert!(!registry.contains(tags::GASP));
        assert!(registry.get(TableTag::new(b"GSUB")).is_none());
    }
}
