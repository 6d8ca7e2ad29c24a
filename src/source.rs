//! Loading input fonts into table records

use indexmap::IndexMap;
use read_fonts::{FontRef, TableProvider, tables::post::Post};

use crate::{
    FontIndex, GlyphName, Result,
    glyph_order::GlyphOrder,
    tables::{self, LocaRecord, RawRecord, TableRecord, tags},
    types::TableTag,
};

/// Reads one font's original glyph identifier sequence.
///
/// Names come from the post table when it carries them; glyphs without a
/// stored name get a synthetic `glyphNNNNN` identifier.
pub fn read_glyph_order(data: &[u8]) -> Result<GlyphOrder> {
    let font = FontRef::new(data)?;
    let num_glyphs = font.maxp().map(|m| m.num_glyphs()).unwrap_or_default() as usize;
    let post = font.post().ok();

    Ok((0..num_glyphs)
        .map(|gid| {
            post.as_ref()
                .and_then(|p| glyph_name_from_post(p, gid as u16))
                .map(GlyphName::new)
                .unwrap_or_else(|| GlyphName::new(format!("glyph{gid:05}")))
        })
        .collect())
}

fn glyph_name_from_post(post: &Post, gid: u16) -> Option<String> {
    post.glyph_name(read_fonts::types::GlyphId16::new(gid)).map(|s| s.to_string())
}

/// One input font, fully decoded to records.
///
/// A source is built from a fresh decode of the raw bytes with the
/// renamed glyph order applied at construction, so every glyph-keyed
/// record is born consistent with the merged identifier set and no
/// in-place rename pass ever touches a populated record.
pub struct FontSource {
    index: FontIndex,
    glyph_order: GlyphOrder,
    tables: IndexMap<TableTag, TableRecord>,
}

impl FontSource {
    /// Decodes every table in the font's directory. `order` is this
    /// font's renamed order; `base` is the position of its first glyph in
    /// the merged sequence, used to rebase composite references.
    pub fn load(
        data: &[u8],
        index: FontIndex,
        order: GlyphOrder,
        base: usize,
    ) -> Result<FontSource> {
        let font = FontRef::new(data)?;

        let mut records = IndexMap::new();
        for rec in font.table_directory.table_records() {
            let tag = TableTag::from(rec.tag());
            let record = match tag {
                t if t == tags::MAXP => TableRecord::Maxp(tables::maxp::from_font(&font)?),
                t if t == tags::HEAD => TableRecord::Head(tables::head::from_font(&font)?),
                t if t == tags::HHEA => TableRecord::Hhea(tables::hhea::from_font(&font)?),
                t if t == tags::OS2 => TableRecord::Os2(tables::os2::from_font(&font)?),
                t if t == tags::POST => {
                    TableRecord::Post(tables::post::from_font(&font, &order)?)
                }
                t if t == tags::HMTX => {
                    TableRecord::Hmtx(tables::metrics::horizontal_from_font(&font, &order)?)
                }
                t if t == tags::VMTX => {
                    TableRecord::Vmtx(tables::metrics::vertical_from_font(&font, &order)?)
                }
                t if t == tags::GLYF => {
                    TableRecord::Glyf(tables::glyf::from_font(&font, &order, base)?)
                }
                t if t == tags::LOCA => {
                    let long_offsets =
                        font.head().map(|h| h.index_to_loc_format() == 1).unwrap_or(false);
                    TableRecord::Loca(LocaRecord { long_offsets })
                }
                t if t == tags::CMAP => {
                    TableRecord::Cmap(tables::cmap::from_font(&font, &order)?)
                }
                t if t == tags::PREP || t == tags::FPGM || t == tags::CVT => {
                    TableRecord::ControlProgram(tables::hint::from_font(&font, tag))
                }
                t => {
                    let data =
                        font.table_data(t.tag()).map(|d| d.as_bytes().to_vec()).unwrap_or_default();
                    TableRecord::Raw(RawRecord { tag: t, data })
                }
            };
            records.insert(tag, record);
        }

        Ok(FontSource { index, glyph_order: order, tables: records })
    }

    pub fn index(&self) -> FontIndex {
        self.index
    }

    pub fn glyph_order(&self) -> &GlyphOrder {
        &self.glyph_order
    }

    /// Table tags in font directory order.
    pub fn tags(&self) -> impl Iterator<Item = TableTag> + '_ {
        self.tables.keys().copied()
    }

    pub fn table(&self, tag: TableTag) -> Option<&TableRecord> {
        self.tables.get(&tag)
    }
}
