//! maxp: every field aggregates to the maximum across inputs

use font_types::Version16Dot16;
use read_fonts::{FontRef, TableProvider};

use crate::{
    MergeError, Result,
    strategies::{max, max_defined},
    tables::{Disposition, TableRecord, tags},
};

/// The maxp attribute set. Version 0.5 fonts define only the glyph count;
/// the remaining fields exist from version 1.0 up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxpRecord {
    pub version: Version16Dot16,
    pub num_glyphs: u16,
    pub max_points: Option<u16>,
    pub max_contours: Option<u16>,
    pub max_composite_points: Option<u16>,
    pub max_composite_contours: Option<u16>,
    pub max_zones: Option<u16>,
    pub max_twilight_points: Option<u16>,
    pub max_storage: Option<u16>,
    pub max_function_defs: Option<u16>,
    pub max_instruction_defs: Option<u16>,
    pub max_stack_elements: Option<u16>,
    pub max_size_of_instructions: Option<u16>,
    pub max_component_elements: Option<u16>,
    pub max_component_depth: Option<u16>,
}

pub(crate) fn from_font(font: &FontRef<'_>) -> Result<MaxpRecord> {
    let maxp = font.maxp()?;
    Ok(MaxpRecord {
        version: maxp.version(),
        num_glyphs: maxp.num_glyphs(),
        max_points: maxp.max_points(),
        max_contours: maxp.max_contours(),
        max_composite_points: maxp.max_composite_points(),
        max_composite_contours: maxp.max_composite_contours(),
        max_zones: maxp.max_zones(),
        max_twilight_points: maxp.max_twilight_points(),
        max_storage: maxp.max_storage(),
        max_function_defs: maxp.max_function_defs(),
        max_instruction_defs: maxp.max_instruction_defs(),
        max_stack_elements: maxp.max_stack_elements(),
        max_size_of_instructions: maxp.max_size_of_instructions(),
        max_component_elements: maxp.max_component_elements(),
        max_component_depth: maxp.max_component_depth(),
    })
}

fn unwrap_records<'a>(records: &[&'a TableRecord]) -> Result<Vec<&'a MaxpRecord>> {
    records
        .iter()
        .map(|r| r.as_maxp().ok_or(MergeError::RecordVariantMismatch(tags::MAXP)))
        .collect()
}

/// merged[field] = max over the inputs that define the field.
///
/// numGlyphs follows the same rule, so its merged value is the largest
/// input count, not the merged glyph count. The aggregated value stays in
/// the record; the serializer writes the actual count into the binary.
pub fn merge(records: &[&TableRecord]) -> Result<Disposition> {
    let tables = unwrap_records(records)?;
    if tables.is_empty() {
        return Err(MergeError::NoFonts);
    }

    let versions: Vec<Version16Dot16> = tables.iter().map(|t| t.version).collect();
    let num_glyphs: Vec<u16> = tables.iter().map(|t| t.num_glyphs).collect();
    let max_points: Vec<_> = tables.iter().map(|t| t.max_points).collect();
    let max_contours: Vec<_> = tables.iter().map(|t| t.max_contours).collect();
    let max_composite_points: Vec<_> = tables.iter().map(|t| t.max_composite_points).collect();
    let max_composite_contours: Vec<_> = tables.iter().map(|t| t.max_composite_contours).collect();
    let max_zones: Vec<_> = tables.iter().map(|t| t.max_zones).collect();
    let max_twilight_points: Vec<_> = tables.iter().map(|t| t.max_twilight_points).collect();
    let max_storage: Vec<_> = tables.iter().map(|t| t.max_storage).collect();
    let max_function_defs: Vec<_> = tables.iter().map(|t| t.max_function_defs).collect();
    let max_instruction_defs: Vec<_> = tables.iter().map(|t| t.max_instruction_defs).collect();
    let max_stack_elements: Vec<_> = tables.iter().map(|t| t.max_stack_elements).collect();
    let max_size_of_instructions: Vec<_> =
        tables.iter().map(|t| t.max_size_of_instructions).collect();
    let max_component_elements: Vec<_> = tables.iter().map(|t| t.max_component_elements).collect();
    let max_component_depth: Vec<_> = tables.iter().map(|t| t.max_component_depth).collect();

    Ok(Disposition::Include(TableRecord::Maxp(MaxpRecord {
        version: max(&versions)?,
        num_glyphs: max(&num_glyphs)?,
        max_points: max_defined(&max_points),
        max_contours: max_defined(&max_contours),
        max_composite_points: max_defined(&max_composite_points),
        max_composite_contours: max_defined(&max_composite_contours),
        max_zones: max_defined(&max_zones),
        max_twilight_points: max_defined(&max_twilight_points),
        max_storage: max_defined(&max_storage),
        max_function_defs: max_defined(&max_function_defs),
        max_instruction_defs: max_defined(&max_instruction_defs),
        max_stack_elements: max_defined(&max_stack_elements),
        max_size_of_instructions: max_defined(&max_size_of_instructions),
        max_component_elements: max_defined(&max_component_elements),
        max_component_depth: max_defined(&max_component_depth),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v05_record(num_glyphs: u16) -> MaxpRecord {
        MaxpRecord {
            version: Version16Dot16::new(0, 5),
            num_glyphs,
            max_points: None,
            max_contours: None,
            max_composite_points: None,
            max_composite_contours: None,
            max_zones: None,
            max_twilight_points: None,
            max_storage: None,
            max_function_defs: None,
            max_instruction_defs: None,
            max_stack_elements: None,
            max_size_of_instructions: None,
            max_component_elements: None,
            max_component_depth: None,
        }
    }

    fn v10_record(num_glyphs: u16, max_points: u16, max_contours: u16) -> MaxpRecord {
        MaxpRecord {
            version: Version16Dot16::VERSION_1_0,
            max_points: Some(max_points),
            max_contours: Some(max_contours),
            max_zones: Some(1),
            ..v05_record(num_glyphs)
        }
    }

    fn merged(records: &[MaxpRecord]) -> MaxpRecord {
        let wrapped: Vec<TableRecord> = records.iter().cloned().map(TableRecord::Maxp).collect();
        let refs: Vec<&TableRecord> = wrapped.iter().collect();
        match merge(&refs).unwrap() {
            Disposition::Include(TableRecord::Maxp(rec)) => rec,
            other => panic!("unexpected disposition: {other:?}"),
        }
    }

    #[test]
    fn test_all_fields_take_max() {
        let out = merged(&[v10_record(3, 10, 2), v10_record(2, 25, 1)]);
        assert_eq!(out.max_points, Some(25));
        assert_eq!(out.max_contours, Some(2));
        assert_eq!(out.max_zones, Some(1));
    }

    #[test]
    fn test_num_glyphs_is_max_not_sum() {
        let out = merged(&[v10_record(3, 0, 0), v10_record(2, 0, 0)]);
        assert_eq!(out.num_glyphs, 3);
    }

    #[test]
    fn test_version_gated_fields_max_over_definers() {
        // A 0.5 input contributes nothing to the 1.0-only fields.
        let out = merged(&[v05_record(4), v10_record(2, 7, 3)]);
        assert_eq!(out.version, Version16Dot16::VERSION_1_0);
        assert_eq!(out.num_glyphs, 4);
        assert_eq!(out.max_points, Some(7));
    }

    #[test]
    fn test_single_font_is_identity() {
        let rec = v10_record(9, 40, 6);
        assert_eq!(merged(&[rec.clone()]), rec);
    }

    #[test]
    fn test_wrong_variant_is_fatal() {
        let rec = TableRecord::Loca(crate::tables::LocaRecord { long_offsets: false });
        assert!(matches!(
            merge(&[&rec]),
            Err(MergeError::RecordVariantMismatch(tag)) if tag == tags::MAXP
        ));
    }
}
