//! hmtx and vmtx: per-glyph metric unions keyed by renamed identifiers

use indexmap::IndexMap;
use read_fonts::{FontRef, TableProvider};

use crate::{
    GlyphName, MergeError, Result,
    glyph_order::GlyphOrder,
    strategies::union_overwrite,
    tables::{Disposition, TableRecord, tags},
};

/// One glyph's metrics along a single axis: advance plus the leading side
/// bearing (left for horizontal, top for vertical).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphMetrics {
    pub advance: u16,
    pub side_bearing: i16,
}

/// Metrics for every glyph of one axis. The same shape backs hmtx and
/// vmtx; the table tag on the enclosing record tells them apart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetricsRecord {
    pub metrics: IndexMap<GlyphName, GlyphMetrics>,
}

pub(crate) fn horizontal_from_font(font: &FontRef<'_>, order: &GlyphOrder) -> Result<MetricsRecord> {
    let hhea = font.hhea()?;
    let hmtx = font.hmtx()?;
    let num_h_metrics = hhea.number_of_h_metrics() as usize;

    let mut metrics = IndexMap::with_capacity(order.len());
    for (gid, name) in order.iter().enumerate() {
        let (advance, side_bearing) = if gid < num_h_metrics {
            let lm = hmtx.h_metrics().get(gid).unwrap();
            (lm.advance.get(), lm.side_bearing.get())
        } else {
            // Trailing glyphs repeat the last advance and carry their own bearing.
            let last_advance = if num_h_metrics > 0 {
                hmtx.h_metrics().get(num_h_metrics - 1).unwrap().advance.get()
            } else {
                0
            };
            let lsb_idx = gid - num_h_metrics;
            let lsb = hmtx.left_side_bearings().get(lsb_idx).map(|b| b.get()).unwrap_or(0);
            (last_advance, lsb)
        };
        metrics.insert(name.clone(), GlyphMetrics { advance, side_bearing });
    }
    Ok(MetricsRecord { metrics })
}

pub(crate) fn vertical_from_font(font: &FontRef<'_>, order: &GlyphOrder) -> Result<MetricsRecord> {
    let vhea = font.vhea()?;
    let vmtx = font.vmtx()?;
    let num_v_metrics = vhea.number_of_long_ver_metrics() as usize;

    let mut metrics = IndexMap::with_capacity(order.len());
    for (gid, name) in order.iter().enumerate() {
        let (advance, side_bearing) = if gid < num_v_metrics {
            let lm = vmtx.v_metrics().get(gid).unwrap();
            (lm.advance.get(), lm.side_bearing.get())
        } else {
            let last_advance = if num_v_metrics > 0 {
                vmtx.v_metrics().get(num_v_metrics - 1).unwrap().advance.get()
            } else {
                0
            };
            let tsb_idx = gid - num_v_metrics;
            let tsb = vmtx.top_side_bearings().get(tsb_idx).map(|b| b.get()).unwrap_or(0);
            (last_advance, tsb)
        };
        metrics.insert(name.clone(), GlyphMetrics { advance, side_bearing });
    }
    Ok(MetricsRecord { metrics })
}

/// Union across inputs in font order; a later input wins on key
/// collision. Renamed identifiers are disjoint, so collisions only arise
/// when renaming was skipped.
pub fn merge_hmtx(records: &[&TableRecord]) -> Result<Disposition> {
    let merged = union_metrics(records, tags::HMTX, TableRecord::as_hmtx)?;
    Ok(Disposition::Include(TableRecord::Hmtx(merged)))
}

pub fn merge_vmtx(records: &[&TableRecord]) -> Result<Disposition> {
    let merged = union_metrics(records, tags::VMTX, TableRecord::as_vmtx)?;
    Ok(Disposition::Include(TableRecord::Vmtx(merged)))
}

fn union_metrics(
    records: &[&TableRecord],
    tag: crate::TableTag,
    extract: for<'a> fn(&'a TableRecord) -> Option<&'a MetricsRecord>,
) -> Result<MetricsRecord> {
    let tables: Vec<&MetricsRecord> = records
        .iter()
        .map(|r| extract(r).ok_or(MergeError::RecordVariantMismatch(tag)))
        .collect::<Result<_>>()?;
    if tables.is_empty() {
        return Err(MergeError::NoFonts);
    }

    let maps: Vec<&IndexMap<GlyphName, GlyphMetrics>> =
        tables.iter().map(|t| &t.metrics).collect();
    Ok(MetricsRecord { metrics: union_overwrite(&maps) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(entries: &[(&str, u16, i16)]) -> MetricsRecord {
        let metrics = entries
            .iter()
            .map(|(name, advance, sb)| {
                (GlyphName::new(*name), GlyphMetrics { advance: *advance, side_bearing: *sb })
            })
            .collect();
        MetricsRecord { metrics }
    }

    fn merged_hmtx(records: &[MetricsRecord]) -> MetricsRecord {
        let wrapped: Vec<TableRecord> = records.iter().cloned().map(TableRecord::Hmtx).collect();
        let refs: Vec<&TableRecord> = wrapped.iter().collect();
        match merge_hmtx(&refs).unwrap() {
            Disposition::Include(TableRecord::Hmtx(rec)) => rec,
            other => panic!("unexpected disposition: {other:?}"),
        }
    }

    #[test]
    fn test_union_keeps_every_renamed_glyph() {
        let out = merged_hmtx(&[
            record(&[(".notdef#0", 500, 0), ("A#0", 600, 10)]),
            record(&[(".notdef#1", 450, 0), ("C#1", 700, -5)]),
        ]);
        assert_eq!(out.metrics.len(), 4);
        assert_eq!(out.metrics[&GlyphName::new("A#0")], GlyphMetrics {
            advance: 600,
            side_bearing: 10
        });
        assert_eq!(out.metrics[&GlyphName::new("C#1")], GlyphMetrics {
            advance: 700,
            side_bearing: -5
        });
    }

    #[test]
    fn test_collision_later_input_wins() {
        let out = merged_hmtx(&[record(&[("A", 600, 10)]), record(&[("A", 450, 2)])]);
        assert_eq!(out.metrics[&GlyphName::new("A")], GlyphMetrics {
            advance: 450,
            side_bearing: 2
        });
    }

    #[test]
    fn test_union_preserves_font_order() {
        let out = merged_hmtx(&[record(&[("B#0", 1, 0), ("A#0", 2, 0)]), record(&[("A#1", 3, 0)])]);
        let keys: Vec<&str> = out.metrics.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["B#0", "A#0", "A#1"]);
    }

    #[test]
    fn test_vmtx_rejects_horizontal_record() {
        let rec = TableRecord::Hmtx(record(&[("A", 1, 0)]));
        assert!(matches!(
            merge_vmtx(&[&rec]),
            Err(MergeError::RecordVariantMismatch(tag)) if tag == tags::VMTX
        ));
    }
}
