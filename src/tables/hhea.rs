//! hhea: vertical extents max, bearings and descender min

use read_fonts::{FontRef, TableProvider};

use crate::{
    MergeError, Result,
    strategies::{max, min},
    tables::{Disposition, TableRecord, tags},
};

/// The hhea attribute set, stored in plain font units.
///
/// numberOfHMetrics merges like any other field; the serializer replaces
/// it with the merged metric count when the binary is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HheaRecord {
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    pub advance_width_max: u16,
    pub min_left_side_bearing: i16,
    pub min_right_side_bearing: i16,
    pub x_max_extent: i16,
    pub caret_slope_rise: i16,
    pub caret_slope_run: i16,
    pub caret_offset: i16,
    pub number_of_h_metrics: u16,
}

pub(crate) fn from_font(font: &FontRef<'_>) -> Result<HheaRecord> {
    let hhea = font.hhea()?;
    Ok(HheaRecord {
        ascender: hhea.ascender().to_i16(),
        descender: hhea.descender().to_i16(),
        line_gap: hhea.line_gap().to_i16(),
        advance_width_max: hhea.advance_width_max().to_u16(),
        min_left_side_bearing: hhea.min_left_side_bearing().to_i16(),
        min_right_side_bearing: hhea.min_right_side_bearing().to_i16(),
        x_max_extent: hhea.x_max_extent().to_i16(),
        caret_slope_rise: hhea.caret_slope_rise(),
        caret_slope_run: hhea.caret_slope_run(),
        caret_offset: hhea.caret_offset(),
        number_of_h_metrics: hhea.number_of_h_metrics(),
    })
}

fn unwrap_records<'a>(records: &[&'a TableRecord]) -> Result<Vec<&'a HheaRecord>> {
    records
        .iter()
        .map(|r| r.as_hhea().ok_or(MergeError::RecordVariantMismatch(tags::HHEA)))
        .collect()
}

/// descender, minLeftSideBearing and minRightSideBearing take the
/// minimum (they grow downward or leftward); everything else takes the
/// maximum.
pub fn merge(records: &[&TableRecord]) -> Result<Disposition> {
    let tables = unwrap_records(records)?;
    if tables.is_empty() {
        return Err(MergeError::NoFonts);
    }

    let ascenders: Vec<i16> = tables.iter().map(|t| t.ascender).collect();
    let descenders: Vec<i16> = tables.iter().map(|t| t.descender).collect();
    let line_gaps: Vec<i16> = tables.iter().map(|t| t.line_gap).collect();
    let advance_width_maxs: Vec<u16> = tables.iter().map(|t| t.advance_width_max).collect();
    let min_lsbs: Vec<i16> = tables.iter().map(|t| t.min_left_side_bearing).collect();
    let min_rsbs: Vec<i16> = tables.iter().map(|t| t.min_right_side_bearing).collect();
    let x_max_extents: Vec<i16> = tables.iter().map(|t| t.x_max_extent).collect();
    let caret_slope_rises: Vec<i16> = tables.iter().map(|t| t.caret_slope_rise).collect();
    let caret_slope_runs: Vec<i16> = tables.iter().map(|t| t.caret_slope_run).collect();
    let caret_offsets: Vec<i16> = tables.iter().map(|t| t.caret_offset).collect();
    let num_h_metrics: Vec<u16> = tables.iter().map(|t| t.number_of_h_metrics).collect();

    Ok(Disposition::Include(TableRecord::Hhea(HheaRecord {
        ascender: max(&ascenders)?,
        descender: min(&descenders)?,
        line_gap: max(&line_gaps)?,
        advance_width_max: max(&advance_width_maxs)?,
        min_left_side_bearing: min(&min_lsbs)?,
        min_right_side_bearing: min(&min_rsbs)?,
        x_max_extent: max(&x_max_extents)?,
        caret_slope_rise: max(&caret_slope_rises)?,
        caret_slope_run: max(&caret_slope_runs)?,
        caret_offset: max(&caret_offsets)?,
        number_of_h_metrics: max(&num_h_metrics)?,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ascender: i16, descender: i16, min_lsb: i16) -> HheaRecord {
        HheaRecord {
            ascender,
            descender,
            line_gap: 0,
            advance_width_max: 600,
            min_left_side_bearing: min_lsb,
            min_right_side_bearing: 10,
            x_max_extent: 580,
            caret_slope_rise: 1,
            caret_slope_run: 0,
            caret_offset: 0,
            number_of_h_metrics: 2,
        }
    }

    fn merged(records: &[HheaRecord]) -> HheaRecord {
        let wrapped: Vec<TableRecord> = records.iter().cloned().map(TableRecord::Hhea).collect();
        let refs: Vec<&TableRecord> = wrapped.iter().collect();
        match merge(&refs).unwrap() {
            Disposition::Include(TableRecord::Hhea(rec)) => rec,
            other => panic!("unexpected disposition: {other:?}"),
        }
    }

    #[test]
    fn test_extents_widen_to_cover_inputs() {
        let out = merged(&[record(800, -200, -15), record(750, -250, -3)]);
        assert_eq!(out.ascender, 800);
        assert_eq!(out.descender, -250);
        assert_eq!(out.min_left_side_bearing, -15);
    }

    #[test]
    fn test_min_right_side_bearing_takes_min() {
        let mut a = record(800, -200, 0);
        a.min_right_side_bearing = -40;
        let b = record(800, -200, 0);
        assert_eq!(merged(&[a, b]).min_right_side_bearing, -40);
    }

    #[test]
    fn test_caret_fields_take_max() {
        let mut a = record(800, -200, 0);
        a.caret_slope_rise = 1;
        a.caret_slope_run = 0;
        let mut b = record(800, -200, 0);
        b.caret_slope_rise = 20;
        b.caret_slope_run = 3;
        let out = merged(&[a, b]);
        assert_eq!(out.caret_slope_rise, 20);
        assert_eq!(out.caret_slope_run, 3);
    }

    #[test]
    fn test_empty_input_is_fatal() {
        assert!(matches!(merge(&[]), Err(MergeError::NoFonts)));
    }
}
