//! post: numeric aggregates plus the glyph-name mapping union

use font_types::{Fixed, Version16Dot16};
use indexmap::IndexMap;
use read_fonts::{FontRef, TableProvider};

use crate::{
    GlyphName, MergeError, Result,
    glyph_order::GlyphOrder,
    strategies::{max, min, union_overwrite},
    tables::{Disposition, TableRecord, tags},
};

/// Version 2.0 stores glyph names; version 3.0 stores none.
pub const POST_VERSION_2: Version16Dot16 = Version16Dot16::new(2, 0);

/// The post attribute set. `mapping` relates each glyph name to its
/// position in the owning font's name index and is populated for version
/// 2.0 inputs only; nameless versions carry the numeric fields alone.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub version: Version16Dot16,
    pub italic_angle: Fixed,
    pub underline_position: i16,
    pub underline_thickness: i16,
    pub is_fixed_pitch: u32,
    pub min_mem_type42: u32,
    pub max_mem_type42: u32,
    pub min_mem_type1: u32,
    pub max_mem_type1: u32,
    pub mapping: IndexMap<GlyphName, u32>,
    pub extra_names: Vec<GlyphName>,
}

/// After renaming, no glyph name matches the standard Macintosh set, so a
/// version 2.0 font carries its whole order as extra names.
pub(crate) fn from_font(font: &FontRef<'_>, order: &GlyphOrder) -> Result<PostRecord> {
    let post = font.post()?;
    let version = post.version();

    let (mapping, extra_names) = if version == POST_VERSION_2 {
        let mapping = order
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i as u32))
            .collect();
        (mapping, order.names().to_vec())
    } else {
        (IndexMap::new(), Vec::new())
    };

    Ok(PostRecord {
        version,
        italic_angle: post.italic_angle(),
        underline_position: post.underline_position().to_i16(),
        underline_thickness: post.underline_thickness().to_i16(),
        is_fixed_pitch: post.is_fixed_pitch(),
        min_mem_type42: post.min_mem_type42(),
        max_mem_type42: post.max_mem_type42(),
        min_mem_type1: post.min_mem_type1(),
        max_mem_type1: post.max_mem_type1(),
        mapping,
        extra_names,
    })
}

fn unwrap_records<'a>(records: &[&'a TableRecord]) -> Result<Vec<&'a PostRecord>> {
    records
        .iter()
        .map(|r| r.as_post().ok_or(MergeError::RecordVariantMismatch(tags::POST)))
        .collect()
}

/// underlinePosition and the two minMem fields take the minimum, the
/// remaining numerics the maximum. `mapping` is a union where a later
/// input wins on key collision, and `extra_names` is cleared outright;
/// the serializer regenerates names from the merged order.
pub fn merge(records: &[&TableRecord]) -> Result<Disposition> {
    let tables = unwrap_records(records)?;
    if tables.is_empty() {
        return Err(MergeError::NoFonts);
    }

    let versions: Vec<Version16Dot16> = tables.iter().map(|t| t.version).collect();
    let italic_angles: Vec<i32> = tables.iter().map(|t| t.italic_angle.to_bits()).collect();
    let underline_positions: Vec<i16> = tables.iter().map(|t| t.underline_position).collect();
    let underline_thicknesses: Vec<i16> = tables.iter().map(|t| t.underline_thickness).collect();
    let is_fixed_pitches: Vec<u32> = tables.iter().map(|t| t.is_fixed_pitch).collect();
    let min_mem_type42s: Vec<u32> = tables.iter().map(|t| t.min_mem_type42).collect();
    let max_mem_type42s: Vec<u32> = tables.iter().map(|t| t.max_mem_type42).collect();
    let min_mem_type1s: Vec<u32> = tables.iter().map(|t| t.min_mem_type1).collect();
    let max_mem_type1s: Vec<u32> = tables.iter().map(|t| t.max_mem_type1).collect();
    let mappings: Vec<&IndexMap<GlyphName, u32>> = tables.iter().map(|t| &t.mapping).collect();

    Ok(Disposition::Include(TableRecord::Post(PostRecord {
        version: max(&versions)?,
        italic_angle: Fixed::from_bits(max(&italic_angles)?),
        underline_position: min(&underline_positions)?,
        underline_thickness: max(&underline_thicknesses)?,
        is_fixed_pitch: max(&is_fixed_pitches)?,
        min_mem_type42: min(&min_mem_type42s)?,
        max_mem_type42: max(&max_mem_type42s)?,
        min_mem_type1: min(&min_mem_type1s)?,
        max_mem_type1: max(&max_mem_type1s)?,
        mapping: union_overwrite(&mappings),
        extra_names: Vec::new(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(names: &[&str], underline_position: i16) -> PostRecord {
        let mapping: IndexMap<GlyphName, u32> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (GlyphName::new(*n), i as u32))
            .collect();
        PostRecord {
            version: POST_VERSION_2,
            italic_angle: Fixed::from_f64(0.0),
            underline_position,
            underline_thickness: 50,
            is_fixed_pitch: 0,
            min_mem_type42: 10,
            max_mem_type42: 100,
            min_mem_type1: 20,
            max_mem_type1: 200,
            extra_names: names.iter().map(|n| GlyphName::new(*n)).collect(),
            mapping,
        }
    }

    fn merged(records: &[PostRecord]) -> PostRecord {
        let wrapped: Vec<TableRecord> = records.iter().cloned().map(TableRecord::Post).collect();
        let refs: Vec<&TableRecord> = wrapped.iter().collect();
        match merge(&refs).unwrap() {
            Disposition::Include(TableRecord::Post(rec)) => rec,
            other => panic!("unexpected disposition: {other:?}"),
        }
    }

    #[test]
    fn test_numeric_fields_split_max_and_min() {
        let mut a = record(&[".notdef#0"], -100);
        a.min_mem_type42 = 5;
        a.max_mem_type1 = 300;
        let b = record(&[".notdef#1"], -80);
        let out = merged(&[a, b]);
        assert_eq!(out.underline_position, -100);
        assert_eq!(out.min_mem_type42, 5);
        assert_eq!(out.max_mem_type1, 300);
        assert_eq!(out.underline_thickness, 50);
    }

    #[test]
    fn test_mapping_unions_disjoint_renamed_keys() {
        let a = record(&[".notdef#0", "A#0"], -100);
        let b = record(&[".notdef#1", "C#1"], -100);
        let out = merged(&[a, b]);
        assert_eq!(out.mapping.len(), 4);
        assert_eq!(out.mapping.get("A#0"), Some(&1));
        assert_eq!(out.mapping.get("C#1"), Some(&1));
    }

    #[test]
    fn test_mapping_collision_later_input_wins() {
        let mut a = record(&["A"], -100);
        a.mapping.insert(GlyphName::new("A"), 7);
        let mut b = record(&["A"], -100);
        b.mapping.insert(GlyphName::new("A"), 9);
        assert_eq!(merged(&[a, b]).mapping.get("A"), Some(&9));
    }

    #[test]
    fn test_extra_names_are_cleared() {
        let a = record(&["A#0", "B#0"], -100);
        assert!(!a.extra_names.is_empty());
        assert!(merged(&[a]).extra_names.is_empty());
    }

    #[test]
    fn test_version_takes_max_even_when_nameless_wins() {
        let named = record(&["A#0"], -100);
        let mut nameless = record(&[], -100);
        nameless.version = Version16Dot16::VERSION_3_0;
        nameless.mapping = IndexMap::new();
        let out = merged(&[named, nameless]);
        assert_eq!(out.version, Version16Dot16::VERSION_3_0);
    }
}
