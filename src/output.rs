//! Serialization of a merged font back to binary
//!
//! Derived quantities are recomputed here rather than taken from the
//! aggregated records: glyf and loca come from the merged outlines,
//! head.indexToLocFormat from the loca format the builder chose,
//! maxp.numGlyphs and hhea.numberOfHMetrics from the merged glyph order.

use font_types::{FWord, UfWord, Version16Dot16};
use write_fonts::{
    FontBuilder,
    tables::{
        cmap::{Cmap, Cmap4, Cmap12, CmapSubtable, EncodingRecord, PlatformId, SequentialMapGroup},
        glyf::{Glyf, GlyfLocaBuilder, Glyph},
        head::{Flags, Head, MacStyle},
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        loca::{Loca, LocaFormat},
        maxp::Maxp,
        os2::{Os2, SelectionFlags},
        post::Post,
        vmtx::Vmtx,
    },
};

use crate::{
    Result,
    glyph_order::GlyphOrder,
    merger::MergedFont,
    tables::{
        CmapRecord, GlyfRecord, HeadRecord, HheaRecord, MaxpRecord, MetricsRecord, Os2Record,
        PostRecord, TableRecord, metrics::GlyphMetrics, post::POST_VERSION_2, tags,
    },
};

/// Compile a [`MergedFont`] into font binary.
///
/// Only tags present in the merged record map are written. glyf implies
/// loca, and both are rebuilt from the merged outlines in merged glyph
/// order; raw records pass through byte for byte.
pub fn build_font(merged: &MergedFont) -> Result<Vec<u8>> {
    let order = &merged.glyph_order;
    let mut builder = FontBuilder::new();

    // glyf goes first so head can record the loca format the builder chose
    let mut loca_format = None;
    if let Some(rec) = merged.table(tags::GLYF).and_then(TableRecord::as_glyf) {
        let (glyf, loca, format) = build_glyf_loca(rec, order)?;
        builder.add_table(&glyf)?;
        builder.add_table(&loca)?;
        loca_format = Some(format);
    }

    for record in merged.tables.values() {
        match record {
            // written above; loca offsets always derive from the merged outlines
            TableRecord::Glyf(_) | TableRecord::Loca(_) => {}
            TableRecord::Head(rec) => {
                builder.add_table(&build_head(rec, loca_format))?;
            }
            TableRecord::Hhea(rec) => {
                builder.add_table(&build_hhea(rec, order.len() as u16))?;
            }
            TableRecord::Maxp(rec) => {
                builder.add_table(&build_maxp(rec, order.len() as u16))?;
            }
            TableRecord::Os2(rec) => {
                builder.add_table(&build_os2(rec))?;
            }
            TableRecord::Post(rec) => {
                builder.add_table(&build_post(rec, order))?;
            }
            TableRecord::Hmtx(rec) => {
                builder.add_table(&build_hmtx(rec, order))?;
            }
            TableRecord::Vmtx(rec) => {
                builder.add_table(&build_vmtx(rec, order))?;
            }
            TableRecord::Cmap(rec) => {
                builder.add_table(&build_cmap(rec, order))?;
            }
            TableRecord::ControlProgram(rec) => {
                builder.add_raw(rec.tag.tag(), rec.data.clone());
            }
            TableRecord::Raw(rec) => {
                builder.add_raw(rec.tag.tag(), rec.data.clone());
            }
        }
    }

    Ok(builder.build())
}

fn build_glyf_loca(rec: &GlyfRecord, order: &GlyphOrder) -> Result<(Glyf, Loca, LocaFormat)> {
    let mut builder = GlyfLocaBuilder::new();
    let empty = Glyph::Empty;
    for name in order.iter() {
        builder.add_glyph(rec.outlines.get(name).unwrap_or(&empty))?;
    }
    let (glyf, loca, format) = builder.build();
    Ok((glyf, loca, format))
}

fn build_head(rec: &HeadRecord, loca_format: Option<LocaFormat>) -> Head {
    let index_to_loc_format = match loca_format {
        Some(LocaFormat::Short) => 0,
        Some(LocaFormat::Long) => 1,
        // no glyf in the output, keep the merged value
        None => rec.index_to_loc_format,
    };

    Head::new(
        rec.font_revision,
        0, // checksum adjustment is recomputed on write
        Flags::from_bits_truncate(rec.flags),
        rec.units_per_em,
        rec.created,
        rec.modified,
        rec.x_min,
        rec.y_min,
        rec.x_max,
        rec.y_max,
        MacStyle::from_bits_truncate(rec.mac_style),
        rec.lowest_rec_ppem,
        index_to_loc_format,
    )
}

fn build_hhea(rec: &HheaRecord, metric_count: u16) -> Hhea {
    Hhea {
        ascender: FWord::new(rec.ascender),
        descender: FWord::new(rec.descender),
        line_gap: FWord::new(rec.line_gap),
        advance_width_max: UfWord::new(rec.advance_width_max),
        min_left_side_bearing: FWord::new(rec.min_left_side_bearing),
        min_right_side_bearing: FWord::new(rec.min_right_side_bearing),
        x_max_extent: FWord::new(rec.x_max_extent),
        caret_slope_rise: rec.caret_slope_rise,
        caret_slope_run: rec.caret_slope_run,
        caret_offset: rec.caret_offset,
        number_of_h_metrics: metric_count,
    }
}

fn build_maxp(rec: &MaxpRecord, glyph_count: u16) -> Maxp {
    let v1 = rec.version >= Version16Dot16::VERSION_1_0;
    let field = |value: Option<u16>| if v1 { Some(value.unwrap_or(0)) } else { None };

    Maxp {
        num_glyphs: glyph_count,
        max_points: field(rec.max_points),
        max_contours: field(rec.max_contours),
        max_composite_points: field(rec.max_composite_points),
        max_composite_contours: field(rec.max_composite_contours),
        max_zones: if v1 { Some(rec.max_zones.unwrap_or(1)) } else { None },
        max_twilight_points: field(rec.max_twilight_points),
        max_storage: field(rec.max_storage),
        max_function_defs: field(rec.max_function_defs),
        max_instruction_defs: field(rec.max_instruction_defs),
        max_stack_elements: field(rec.max_stack_elements),
        max_size_of_instructions: field(rec.max_size_of_instructions),
        max_component_elements: field(rec.max_component_elements),
        max_component_depth: field(rec.max_component_depth),
    }
}

fn build_os2(rec: &Os2Record) -> Os2 {
    let v = rec.version;
    Os2 {
        x_avg_char_width: rec.x_avg_char_width,
        us_weight_class: rec.us_weight_class,
        us_width_class: rec.us_width_class,
        fs_type: rec.fs_type,
        y_subscript_x_size: rec.y_subscript_x_size,
        y_subscript_y_size: rec.y_subscript_y_size,
        y_subscript_x_offset: rec.y_subscript_x_offset,
        y_subscript_y_offset: rec.y_subscript_y_offset,
        y_superscript_x_size: rec.y_superscript_x_size,
        y_superscript_y_size: rec.y_superscript_y_size,
        y_superscript_x_offset: rec.y_superscript_x_offset,
        y_superscript_y_offset: rec.y_superscript_y_offset,
        y_strikeout_size: rec.y_strikeout_size,
        y_strikeout_position: rec.y_strikeout_position,
        s_family_class: rec.s_family_class,
        panose_10: rec.panose,
        ul_unicode_range_1: rec.ul_unicode_range_1,
        ul_unicode_range_2: rec.ul_unicode_range_2,
        ul_unicode_range_3: rec.ul_unicode_range_3,
        ul_unicode_range_4: rec.ul_unicode_range_4,
        ach_vend_id: rec.ach_vend_id,
        fs_selection: SelectionFlags::from_bits_truncate(rec.fs_selection),
        us_first_char_index: rec.us_first_char_index,
        us_last_char_index: rec.us_last_char_index,
        s_typo_ascender: rec.s_typo_ascender,
        s_typo_descender: rec.s_typo_descender,
        s_typo_line_gap: rec.s_typo_line_gap,
        us_win_ascent: rec.us_win_ascent,
        us_win_descent: rec.us_win_descent,
        // version 1+ fields
        ul_code_page_range_1: if v >= 1 { rec.ul_code_page_range_1.or(Some(0)) } else { None },
        ul_code_page_range_2: if v >= 1 { rec.ul_code_page_range_2.or(Some(0)) } else { None },
        // version 2+ fields
        sx_height: if v >= 2 { rec.sx_height.or(Some(0)) } else { None },
        s_cap_height: if v >= 2 { rec.s_cap_height.or(Some(0)) } else { None },
        us_default_char: if v >= 2 { rec.us_default_char.or(Some(0)) } else { None },
        us_break_char: if v >= 2 { rec.us_break_char.or(Some(0x20)) } else { None },
        us_max_context: if v >= 2 { rec.us_max_context.or(Some(0)) } else { None },
        // version 5+ fields
        us_lower_optical_point_size: if v >= 5 {
            rec.us_lower_optical_point_size.or(Some(0))
        } else {
            None
        },
        us_upper_optical_point_size: if v >= 5 {
            rec.us_upper_optical_point_size.or(Some(0xFFFF))
        } else {
            None
        },
    }
}

/// A version 2.0 record carries the merged glyph order as its name
/// index; every other version writes the numeric fields alone.
fn build_post(rec: &PostRecord, order: &GlyphOrder) -> Post {
    if rec.version != POST_VERSION_2 {
        let mut post = Post::new(
            rec.italic_angle,
            FWord::new(rec.underline_position),
            FWord::new(rec.underline_thickness),
            rec.is_fixed_pitch,
            rec.min_mem_type42,
            rec.max_mem_type42,
            rec.min_mem_type1,
            rec.max_mem_type1,
        );
        post.version = rec.version;
        return post;
    }

    let glyph_names: Vec<&str> = order.iter().map(|n| n.as_str()).collect();
    let mut post = Post::new_v2(glyph_names);
    post.italic_angle = rec.italic_angle;
    post.underline_position = FWord::new(rec.underline_position);
    post.underline_thickness = FWord::new(rec.underline_thickness);
    post.is_fixed_pitch = rec.is_fixed_pitch;
    post.min_mem_type42 = rec.min_mem_type42;
    post.max_mem_type42 = rec.max_mem_type42;
    post.min_mem_type1 = rec.min_mem_type1;
    post.max_mem_type1 = rec.max_mem_type1;
    post
}

fn build_hmtx(rec: &MetricsRecord, order: &GlyphOrder) -> Hmtx {
    let mut h_metrics = Vec::with_capacity(order.len());
    for name in order.iter() {
        let metrics = rec
            .metrics
            .get(name)
            .copied()
            .unwrap_or(GlyphMetrics { advance: 0, side_bearing: 0 });
        h_metrics.push(LongMetric {
            advance: metrics.advance,
            side_bearing: metrics.side_bearing,
        });
    }
    Hmtx { h_metrics, left_side_bearings: Vec::new() }
}

fn build_vmtx(rec: &MetricsRecord, order: &GlyphOrder) -> Vmtx {
    let mut v_metrics = Vec::with_capacity(order.len());
    for name in order.iter() {
        let metrics = rec
            .metrics
            .get(name)
            .copied()
            .unwrap_or(GlyphMetrics { advance: 0, side_bearing: 0 });
        v_metrics.push(write_fonts::tables::vmtx::LongMetric {
            advance: metrics.advance,
            side_bearing: metrics.side_bearing,
        });
    }
    Vmtx { v_metrics, top_side_bearings: Vec::new() }
}

/// The merge leaves exactly one subtable in the record; each one becomes
/// a Windows-platform encoding record of the format the record names.
fn build_cmap(rec: &CmapRecord, order: &GlyphOrder) -> Cmap {
    let mut encoding_records = Vec::with_capacity(rec.subtables.len());
    for sub in &rec.subtables {
        let mut mappings: Vec<(u32, u32)> = sub
            .mapping
            .iter()
            .filter_map(|(cp, name)| {
                let gid = order.position(name.as_str())?;
                Some((cp.to_u32(), gid as u32))
            })
            .collect();
        mappings.sort_by_key(|(cp, _)| *cp);

        let subtable = if sub.format == 12 {
            let groups = build_sequential_groups(&mappings);
            CmapSubtable::Format12(Cmap12 { language: 0, groups })
        } else {
            CmapSubtable::Format4(build_cmap_format4(&mappings))
        };
        encoding_records.push(EncodingRecord::new(
            PlatformId::Windows,
            sub.encoding_id,
            subtable,
        ));
    }
    Cmap::new(encoding_records)
}

/// Groups consecutive code points that map to consecutive glyph ids.
fn build_sequential_groups(mappings: &[(u32, u32)]) -> Vec<SequentialMapGroup> {
    if mappings.is_empty() {
        return Vec::new();
    }

    let mut groups = Vec::new();
    let mut group_start_cp = mappings[0].0;
    let mut group_start_gid = mappings[0].1;
    let mut prev_cp = group_start_cp;
    let mut prev_gid = group_start_gid;

    for &(cp, gid) in &mappings[1..] {
        if cp == prev_cp + 1 && gid == prev_gid + 1 {
            prev_cp = cp;
            prev_gid = gid;
        } else {
            groups.push(SequentialMapGroup::new(group_start_cp, prev_cp, group_start_gid));
            group_start_cp = cp;
            group_start_gid = gid;
            prev_cp = cp;
            prev_gid = gid;
        }
    }
    groups.push(SequentialMapGroup::new(group_start_cp, prev_cp, group_start_gid));

    groups
}

/// Segments runs of consecutive code points. A run whose glyph ids also
/// ascend by one is encoded with idDelta; anything else goes through
/// glyphIdArray. The mandatory 0xFFFF sentinel segment closes the table,
/// and code point 0xFFFF itself cannot be represented.
fn build_cmap_format4(mappings: &[(u32, u32)]) -> Cmap4 {
    let bmp: Vec<(u16, u16)> = mappings
        .iter()
        .filter(|(cp, _)| *cp < 0xFFFF)
        .map(|&(cp, gid)| (cp as u16, gid as u16))
        .collect();

    let mut runs: Vec<&[(u16, u16)]> = Vec::new();
    let mut run_start = 0usize;
    for i in 1..bmp.len() {
        if bmp[i].0 != bmp[i - 1].0 + 1 {
            runs.push(&bmp[run_start..i]);
            run_start = i;
        }
    }
    if !bmp.is_empty() {
        runs.push(&bmp[run_start..]);
    }

    let seg_count = runs.len() + 1;
    let mut end_code = Vec::with_capacity(seg_count);
    let mut start_code = Vec::with_capacity(seg_count);
    let mut id_delta: Vec<i16> = Vec::with_capacity(seg_count);
    let mut id_range_offsets = Vec::with_capacity(seg_count);
    let mut glyph_id_array: Vec<u16> = Vec::new();

    for (i, run) in runs.iter().enumerate() {
        let start = run[0].0;
        start_code.push(start);
        end_code.push(run[run.len() - 1].0);

        let arithmetic = run.windows(2).all(|w| w[1].1 == w[0].1.wrapping_add(1));
        if arithmetic {
            id_delta.push((run[0].1 as i32 - start as i32) as i16);
            id_range_offsets.push(0);
        } else {
            // offset counts from this segment's slot to its ids in glyphIdArray
            id_delta.push(0);
            id_range_offsets.push((2 * (seg_count - i + glyph_id_array.len())) as u16);
            glyph_id_array.extend(run.iter().map(|(_, gid)| *gid));
        }
    }

    end_code.push(0xFFFF);
    start_code.push(0xFFFF);
    id_delta.push(1);
    id_range_offsets.push(0);

    Cmap4 { language: 0, end_code, start_code, id_delta, id_range_offsets, glyph_id_array }
}

#[cfg(test)]
mod tests {
    use font_types::{Fixed, LongDateTime};

    use super::*;
    use crate::glyph_order::GlyphName;

    #[test]
    fn test_format4_arithmetic_run_uses_id_delta() {
        let cmap4 = build_cmap_format4(&[(0x41, 1), (0x42, 2), (0x43, 3)]);

        assert_eq!(cmap4.start_code, vec![0x41, 0xFFFF]);
        assert_eq!(cmap4.end_code, vec![0x43, 0xFFFF]);
        assert_eq!(cmap4.id_delta, vec![1 - 0x41, 1]);
        assert_eq!(cmap4.id_range_offsets, vec![0, 0]);
        assert!(cmap4.glyph_id_array.is_empty());
    }

    #[test]
    fn test_format4_scattered_ids_use_glyph_id_array() {
        let cmap4 = build_cmap_format4(&[(0x41, 5), (0x42, 9)]);

        assert_eq!(cmap4.start_code, vec![0x41, 0xFFFF]);
        assert_eq!(cmap4.end_code, vec![0x42, 0xFFFF]);
        assert_eq!(cmap4.id_delta, vec![0, 1]);
        // one data segment before the sentinel, ids at the array start
        assert_eq!(cmap4.id_range_offsets, vec![4, 0]);
        assert_eq!(cmap4.glyph_id_array, vec![5, 9]);
    }

    #[test]
    fn test_format4_skips_unrepresentable_code_points() {
        let cmap4 = build_cmap_format4(&[(0x41, 1), (0xFFFF, 2), (0x1F600, 3)]);

        assert_eq!(cmap4.start_code, vec![0x41, 0xFFFF]);
        assert_eq!(cmap4.end_code, vec![0x41, 0xFFFF]);
    }

    #[test]
    fn test_sequential_groups_split_on_gid_jump() {
        let groups = build_sequential_groups(&[(0x41, 1), (0x42, 2), (0x43, 7)]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].start_char_code, 0x41);
        assert_eq!(groups[0].end_char_code, 0x42);
        assert_eq!(groups[0].start_glyph_id, 1);
        assert_eq!(groups[1].start_char_code, 0x43);
        assert_eq!(groups[1].start_glyph_id, 7);
    }

    #[test]
    fn test_maxp_glyph_count_overrides_record() {
        let rec = MaxpRecord {
            version: Version16Dot16::VERSION_1_0,
            num_glyphs: 3,
            max_points: Some(7),
            max_contours: Some(2),
            max_composite_points: Some(0),
            max_composite_contours: Some(0),
            max_zones: Some(1),
            max_twilight_points: Some(0),
            max_storage: Some(0),
            max_function_defs: Some(0),
            max_instruction_defs: Some(0),
            max_stack_elements: Some(0),
            max_size_of_instructions: Some(0),
            max_component_elements: Some(0),
            max_component_depth: Some(0),
        };

        let maxp = build_maxp(&rec, 5);
        assert_eq!(maxp.num_glyphs, 5);
        assert_eq!(maxp.max_points, Some(7));
    }

    #[test]
    fn test_maxp_version_05_writes_no_profile_fields() {
        let rec = MaxpRecord {
            version: Version16Dot16::new(0, 5),
            num_glyphs: 2,
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
        };

        let maxp = build_maxp(&rec, 2);
        assert_eq!(maxp.max_points, None);
        assert_eq!(maxp.max_zones, None);
    }

    #[test]
    fn test_hmtx_fills_missing_glyphs_with_zeros() {
        let mut rec = MetricsRecord::default();
        rec.metrics
            .insert(GlyphName::new("A#0"), GlyphMetrics { advance: 500, side_bearing: 20 });
        let order: GlyphOrder = [GlyphName::new("A#0"), GlyphName::new("B#1")]
            .into_iter()
            .collect();

        let hmtx = build_hmtx(&rec, &order);
        assert_eq!(hmtx.h_metrics.len(), 2);
        assert_eq!(hmtx.h_metrics[0].advance, 500);
        assert_eq!(hmtx.h_metrics[1].advance, 0);
        assert_eq!(hmtx.h_metrics[1].side_bearing, 0);
        assert!(hmtx.left_side_bearings.is_empty());
    }

    #[test]
    fn test_head_keeps_record_loca_format_without_glyf() {
        let rec = HeadRecord {
            font_revision: Fixed::from_f64(1.0),
            flags: 0,
            units_per_em: 1000,
            created: LongDateTime::new(0),
            modified: LongDateTime::new(0),
            x_min: 0,
            y_min: -200,
            x_max: 500,
            y_max: 700,
            mac_style: 0,
            lowest_rec_ppem: 8,
            index_to_loc_format: 1,
        };

        assert_eq!(build_head(&rec, None).index_to_loc_format, 1);
        assert_eq!(build_head(&rec, Some(LocaFormat::Short)).index_to_loc_format, 0);
        assert_eq!(build_head(&rec, Some(LocaFormat::Long)).index_to_loc_format, 1);
    }
}
