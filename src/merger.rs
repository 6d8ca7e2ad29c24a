//! The merge run: glyph-order unification, then per-tag dispatch

use std::time::Instant;

use indexmap::{IndexMap, IndexSet};
use log::{debug, info, warn};

use crate::{
    FontIndex, MergeError, Result,
    glyph_order::{GlyphOrder, unify_glyph_orders},
    options::Options,
    registry::{MergeFn, StrategyRegistry},
    source::{FontSource, read_glyph_order},
    tables::{Disposition, TableRecord},
    types::TableTag,
};

/// The merged output: the unified glyph order plus one record per
/// included tag. Built in a single pass and immutable afterwards; the
/// serializer turns it into font bytes.
#[derive(Debug)]
pub struct MergedFont {
    pub glyph_order: GlyphOrder,
    pub tables: IndexMap<TableTag, TableRecord>,
    /// Non-fatal per-tag diagnostics (dropped, unhandled or omitted tags).
    pub notices: Vec<String>,
}

impl MergedFont {
    pub fn table(&self, tag: TableTag) -> Option<&TableRecord> {
        self.tables.get(&tag)
    }
}

/// Font merger that combines multiple fonts into one
#[derive(Default)]
pub struct Merger {
    options: Options,
    registry: StrategyRegistry,
}

impl Merger {
    /// Create a new Merger with the given options
    pub fn new(options: Options) -> Self {
        Self { options, registry: StrategyRegistry::builtin() }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Register or replace the strategy for one tag.
    pub fn register_strategy(&mut self, tag: TableTag, strategy: MergeFn) {
        self.registry.register(tag, strategy);
    }

    /// Merge multiple font files into one merged font.
    ///
    /// Renaming runs to completion over every input before any table is
    /// decoded; table records only ever see unified identifiers.
    pub fn merge(&self, font_data: &[&[u8]]) -> Result<MergedFont> {
        if font_data.is_empty() {
            return Err(MergeError::NoFonts);
        }

        let start = Instant::now();

        let originals: Vec<GlyphOrder> =
            font_data.iter().map(|data| read_glyph_order(data)).collect::<Result<_>>()?;
        let merged_order = unify_glyph_orders(&originals);

        info!("Merging {} fonts with {} total glyphs", font_data.len(), merged_order.len());

        let mut sources = Vec::with_capacity(font_data.len());
        let mut base = 0usize;
        for (i, data) in font_data.iter().enumerate() {
            let index = FontIndex::new(i);
            let order = originals[i].renamed(index);
            let count = order.len();
            sources.push(FontSource::load(data, index, order, base)?);
            debug!("{index}: {count} glyphs at offset {base}");
            base += count;
        }

        let merged = self.dispatch(&sources, merged_order)?;

        if self.options.timing {
            info!("Merged {} fonts in {:.2}s", font_data.len(), start.elapsed().as_secs_f64());
        }

        Ok(merged)
    }

    /// One pass over the distinct tags, first-seen order across sources.
    fn dispatch(&self, sources: &[FontSource], glyph_order: GlyphOrder) -> Result<MergedFont> {
        let mut tags: IndexSet<TableTag> = IndexSet::new();
        for source in sources {
            tags.extend(source.tags());
        }

        let mut merged =
            MergedFont { glyph_order, tables: IndexMap::new(), notices: Vec::new() };

        for tag in tags {
            if self.options.should_drop(&tag) {
                info!("{tag}: dropped by policy");
                merged.notices.push(format!("{tag}: dropped by policy"));
                continue;
            }

            let Some(strategy) = self.registry.get(tag) else {
                warn!("{tag}: no merge strategy, dropped");
                merged.notices.push(format!("{tag}: no merge strategy, dropped"));
                continue;
            };

            let records: Vec<&TableRecord> = sources
                .iter()
                .map(|s| s.table(tag).ok_or(MergeError::MissingTable(tag, s.index())))
                .collect::<Result<_>>()?;

            debug!("{tag}: merging");
            let tag_start = Instant::now();
            let disposition = strategy(&records)?;
            if self.options.timing {
                debug!("{tag}: {:.2}s", tag_start.elapsed().as_secs_f64());
            }

            match disposition {
                Disposition::Include(record) => {
                    info!("{tag}: merged");
                    merged.tables.insert(tag, record);
                }
                Disposition::Omit => {
                    info!("{tag}: omitted, recomputed automatically or incompatible");
                    merged
                        .notices
                        .push(format!("{tag}: omitted, recomputed automatically or incompatible"));
                }
            }
        }

        Ok(merged)
    }
}
