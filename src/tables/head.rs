//! head: max everywhere except the lower bounding-box edges

use font_types::{Fixed, LongDateTime};
use read_fonts::{FontRef, TableProvider};

use crate::{
    MergeError, Result,
    strategies::{max, min},
    tables::{Disposition, TableRecord, tags},
};

/// The head attribute set. checksumAdjustment and magic constants are not
/// carried; the serializer supplies them.
///
/// flags and macStyle hold the raw bit patterns and merge as plain
/// integers like every other field.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadRecord {
    pub font_revision: Fixed,
    pub flags: u16,
    pub units_per_em: u16,
    pub created: LongDateTime,
    pub modified: LongDateTime,
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
    pub mac_style: u16,
    pub lowest_rec_ppem: u16,
    pub index_to_loc_format: i16,
}

pub(crate) fn from_font(font: &FontRef<'_>) -> Result<HeadRecord> {
    let head = font.head()?;
    Ok(HeadRecord {
        font_revision: head.font_revision(),
        flags: head.flags().bits(),
        units_per_em: head.units_per_em(),
        created: head.created(),
        modified: head.modified(),
        x_min: head.x_min(),
        y_min: head.y_min(),
        x_max: head.x_max(),
        y_max: head.y_max(),
        mac_style: head.mac_style().bits(),
        lowest_rec_ppem: head.lowest_rec_ppem(),
        index_to_loc_format: head.index_to_loc_format(),
    })
}

fn unwrap_records<'a>(records: &[&'a TableRecord]) -> Result<Vec<&'a HeadRecord>> {
    records
        .iter()
        .map(|r| r.as_head().ok_or(MergeError::RecordVariantMismatch(tags::HEAD)))
        .collect()
}

/// xMin and yMin take the minimum so the merged bounding box covers every
/// input; all other fields take the maximum. Timestamps compare by their
/// epoch seconds.
pub fn merge(records: &[&TableRecord]) -> Result<Disposition> {
    let tables = unwrap_records(records)?;
    if tables.is_empty() {
        return Err(MergeError::NoFonts);
    }

    let font_revisions: Vec<i32> = tables.iter().map(|t| t.font_revision.to_bits()).collect();
    let flags: Vec<u16> = tables.iter().map(|t| t.flags).collect();
    let units_per_em: Vec<u16> = tables.iter().map(|t| t.units_per_em).collect();
    let created: Vec<i64> = tables.iter().map(|t| t.created.as_secs()).collect();
    let modified: Vec<i64> = tables.iter().map(|t| t.modified.as_secs()).collect();
    let x_min: Vec<i16> = tables.iter().map(|t| t.x_min).collect();
    let y_min: Vec<i16> = tables.iter().map(|t| t.y_min).collect();
    let x_max: Vec<i16> = tables.iter().map(|t| t.x_max).collect();
    let y_max: Vec<i16> = tables.iter().map(|t| t.y_max).collect();
    let mac_styles: Vec<u16> = tables.iter().map(|t| t.mac_style).collect();
    let lowest_rec_ppem: Vec<u16> = tables.iter().map(|t| t.lowest_rec_ppem).collect();
    let index_to_loc_formats: Vec<i16> = tables.iter().map(|t| t.index_to_loc_format).collect();

    Ok(Disposition::Include(TableRecord::Head(HeadRecord {
        font_revision: Fixed::from_bits(max(&font_revisions)?),
        flags: max(&flags)?,
        units_per_em: max(&units_per_em)?,
        created: LongDateTime::new(max(&created)?),
        modified: LongDateTime::new(max(&modified)?),
        x_min: min(&x_min)?,
        y_min: min(&y_min)?,
        x_max: max(&x_max)?,
        y_max: max(&y_max)?,
        mac_style: max(&mac_styles)?,
        lowest_rec_ppem: max(&lowest_rec_ppem)?,
        index_to_loc_format: max(&index_to_loc_formats)?,
    })))
}
