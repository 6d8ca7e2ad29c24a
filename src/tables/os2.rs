//! OS/2: one rule for the whole table, every field takes the maximum

use font_types::Tag;
use read_fonts::{FontRef, TableProvider};

use crate::{
    MergeError, Result,
    strategies::{max, max_defined},
    tables::{Disposition, TableRecord, tags},
};

/// The OS/2 attribute set. Fields introduced by later table versions are
/// optional; the stored version is the highest seen among inputs and
/// decides which optional fields the serializer emits.
///
/// fsType, fsSelection and the range bitfields are held as raw integers
/// and compared numerically like everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Os2Record {
    pub version: u16,
    pub x_avg_char_width: i16,
    pub us_weight_class: u16,
    pub us_width_class: u16,
    pub fs_type: u16,
    pub y_subscript_x_size: i16,
    pub y_subscript_y_size: i16,
    pub y_subscript_x_offset: i16,
    pub y_subscript_y_offset: i16,
    pub y_superscript_x_size: i16,
    pub y_superscript_y_size: i16,
    pub y_superscript_x_offset: i16,
    pub y_superscript_y_offset: i16,
    pub y_strikeout_size: i16,
    pub y_strikeout_position: i16,
    pub s_family_class: i16,
    pub panose: [u8; 10],
    pub ul_unicode_range_1: u32,
    pub ul_unicode_range_2: u32,
    pub ul_unicode_range_3: u32,
    pub ul_unicode_range_4: u32,
    pub ach_vend_id: Tag,
    pub fs_selection: u16,
    pub us_first_char_index: u16,
    pub us_last_char_index: u16,
    pub s_typo_ascender: i16,
    pub s_typo_descender: i16,
    pub s_typo_line_gap: i16,
    pub us_win_ascent: u16,
    pub us_win_descent: u16,
    pub ul_code_page_range_1: Option<u32>,
    pub ul_code_page_range_2: Option<u32>,
    pub sx_height: Option<i16>,
    pub s_cap_height: Option<i16>,
    pub us_default_char: Option<u16>,
    pub us_break_char: Option<u16>,
    pub us_max_context: Option<u16>,
    pub us_lower_optical_point_size: Option<u16>,
    pub us_upper_optical_point_size: Option<u16>,
}

pub(crate) fn from_font(font: &FontRef<'_>) -> Result<Os2Record> {
    let os2 = font.os2()?;
    Ok(Os2Record {
        version: os2.version(),
        x_avg_char_width: os2.x_avg_char_width(),
        us_weight_class: os2.us_weight_class(),
        us_width_class: os2.us_width_class(),
        fs_type: os2.fs_type(),
        y_subscript_x_size: os2.y_subscript_x_size(),
        y_subscript_y_size: os2.y_subscript_y_size(),
        y_subscript_x_offset: os2.y_subscript_x_offset(),
        y_subscript_y_offset: os2.y_subscript_y_offset(),
        y_superscript_x_size: os2.y_superscript_x_size(),
        y_superscript_y_size: os2.y_superscript_y_size(),
        y_superscript_x_offset: os2.y_superscript_x_offset(),
        y_superscript_y_offset: os2.y_superscript_y_offset(),
        y_strikeout_size: os2.y_strikeout_size(),
        y_strikeout_position: os2.y_strikeout_position(),
        s_family_class: os2.s_family_class(),
        panose: os2.panose_10().try_into().unwrap_or([0; 10]),
        ul_unicode_range_1: os2.ul_unicode_range_1(),
        ul_unicode_range_2: os2.ul_unicode_range_2(),
        ul_unicode_range_3: os2.ul_unicode_range_3(),
        ul_unicode_range_4: os2.ul_unicode_range_4(),
        ach_vend_id: os2.ach_vend_id(),
        fs_selection: os2.fs_selection().bits(),
        us_first_char_index: os2.us_first_char_index(),
        us_last_char_index: os2.us_last_char_index(),
        s_typo_ascender: os2.s_typo_ascender(),
        s_typo_descender: os2.s_typo_descender(),
        s_typo_line_gap: os2.s_typo_line_gap(),
        us_win_ascent: os2.us_win_ascent(),
        us_win_descent: os2.us_win_descent(),
        ul_code_page_range_1: os2.ul_code_page_range_1(),
        ul_code_page_range_2: os2.ul_code_page_range_2(),
        sx_height: os2.sx_height(),
        s_cap_height: os2.s_cap_height(),
        us_default_char: os2.us_default_char(),
        us_break_char: os2.us_break_char(),
        us_max_context: os2.us_max_context(),
        us_lower_optical_point_size: os2.us_lower_optical_point_size(),
        us_upper_optical_point_size: os2.us_upper_optical_point_size(),
    })
}

fn unwrap_records<'a>(records: &[&'a TableRecord]) -> Result<Vec<&'a Os2Record>> {
    records
        .iter()
        .map(|r| r.as_os2().ok_or(MergeError::RecordVariantMismatch(tags::OS2)))
        .collect()
}

/// merged[field] = max over the inputs that define the field. For fields
/// like usWeightClass or panose the maximum is an arbitrary winner rather
/// than a meaningful aggregate; the rule is applied uniformly regardless.
pub fn merge(records: &[&TableRecord]) -> Result<Disposition> {
    let tables = unwrap_records(records)?;
    if tables.is_empty() {
        return Err(MergeError::NoFonts);
    }

    let versions: Vec<u16> = tables.iter().map(|t| t.version).collect();
    let x_avg_char_widths: Vec<i16> = tables.iter().map(|t| t.x_avg_char_width).collect();
    let us_weight_classes: Vec<u16> = tables.iter().map(|t| t.us_weight_class).collect();
    let us_width_classes: Vec<u16> = tables.iter().map(|t| t.us_width_class).collect();
    let fs_types: Vec<u16> = tables.iter().map(|t| t.fs_type).collect();
    let y_subscript_x_sizes: Vec<i16> = tables.iter().map(|t| t.y_subscript_x_size).collect();
    let y_subscript_y_sizes: Vec<i16> = tables.iter().map(|t| t.y_subscript_y_size).collect();
    let y_subscript_x_offsets: Vec<i16> = tables.iter().map(|t| t.y_subscript_x_offset).collect();
    let y_subscript_y_offsets: Vec<i16> = tables.iter().map(|t| t.y_subscript_y_offset).collect();
    let y_superscript_x_sizes: Vec<i16> = tables.iter().map(|t| t.y_superscript_x_size).collect();
    let y_superscript_y_sizes: Vec<i16> = tables.iter().map(|t| t.y_superscript_y_size).collect();
    let y_superscript_x_offsets: Vec<i16> =
        tables.iter().map(|t| t.y_superscript_x_offset).collect();
    let y_superscript_y_offsets: Vec<i16> =
        tables.iter().map(|t| t.y_superscript_y_offset).collect();
    let y_strikeout_sizes: Vec<i16> = tables.iter().map(|t| t.y_strikeout_size).collect();
    let y_strikeout_positions: Vec<i16> = tables.iter().map(|t| t.y_strikeout_position).collect();
    let s_family_classes: Vec<i16> = tables.iter().map(|t| t.s_family_class).collect();
    let panoses: Vec<[u8; 10]> = tables.iter().map(|t| t.panose).collect();
    let ul_unicode_range_1s: Vec<u32> = tables.iter().map(|t| t.ul_unicode_range_1).collect();
    let ul_unicode_range_2s: Vec<u32> = tables.iter().map(|t| t.ul_unicode_range_2).collect();
    let ul_unicode_range_3s: Vec<u32> = tables.iter().map(|t| t.ul_unicode_range_3).collect();
    let ul_unicode_range_4s: Vec<u32> = tables.iter().map(|t| t.ul_unicode_range_4).collect();
    let ach_vend_ids: Vec<Tag> = tables.iter().map(|t| t.ach_vend_id).collect();
    let fs_selections: Vec<u16> = tables.iter().map(|t| t.fs_selection).collect();
    let us_first_char_indices: Vec<u16> = tables.iter().map(|t| t.us_first_char_index).collect();
    let us_last_char_indices: Vec<u16> = tables.iter().map(|t| t.us_last_char_index).collect();
    let s_typo_ascenders: Vec<i16> = tables.iter().map(|t| t.s_typo_ascender).collect();
    let s_typo_descenders: Vec<i16> = tables.iter().map(|t| t.s_typo_descender).collect();
    let s_typo_line_gaps: Vec<i16> = tables.iter().map(|t| t.s_typo_line_gap).collect();
    let us_win_ascents: Vec<u16> = tables.iter().map(|t| t.us_win_ascent).collect();
    let us_win_descents: Vec<u16> = tables.iter().map(|t| t.us_win_descent).collect();
    let ul_code_page_range_1s: Vec<_> = tables.iter().map(|t| t.ul_code_page_range_1).collect();
    let ul_code_page_range_2s: Vec<_> = tables.iter().map(|t| t.ul_code_page_range_2).collect();
    let sx_heights: Vec<_> = tables.iter().map(|t| t.sx_height).collect();
    let s_cap_heights: Vec<_> = tables.iter().map(|t| t.s_cap_height).collect();
    let us_default_chars: Vec<_> = tables.iter().map(|t| t.us_default_char).collect();
    let us_break_chars: Vec<_> = tables.iter().map(|t| t.us_break_char).collect();
    let us_max_contexts: Vec<_> = tables.iter().map(|t| t.us_max_context).collect();
    let us_lower_optical_point_sizes: Vec<_> =
        tables.iter().map(|t| t.us_lower_optical_point_size).collect();
    let us_upper_optical_point_sizes: Vec<_> =
        tables.iter().map(|t| t.us_upper_optical_point_size).collect();

    Ok(Disposition::Include(TableRecord::Os2(Os2Record {
        version: max(&versions)?,
        x_avg_char_width: max(&x_avg_char_widths)?,
        us_weight_class: max(&us_weight_classes)?,
        us_width_class: max(&us_width_classes)?,
        fs_type: max(&fs_types)?,
        y_subscript_x_size: max(&y_subscript_x_sizes)?,
        y_subscript_y_size: max(&y_subscript_y_sizes)?,
        y_subscript_x_offset: max(&y_subscript_x_offsets)?,
        y_subscript_y_offset: max(&y_subscript_y_offsets)?,
        y_superscript_x_size: max(&y_superscript_x_sizes)?,
        y_superscript_y_size: max(&y_superscript_y_sizes)?,
        y_superscript_x_offset: max(&y_superscript_x_offsets)?,
        y_superscript_y_offset: max(&y_superscript_y_offsets)?,
        y_strikeout_size: max(&y_strikeout_sizes)?,
        y_strikeout_position: max(&y_strikeout_positions)?,
        s_family_class: max(&s_family_classes)?,
        panose: max(&panoses)?,
        ul_unicode_range_1: max(&ul_unicode_range_1s)?,
        ul_unicode_range_2: max(&ul_unicode_range_2s)?,
        ul_unicode_range_3: max(&ul_unicode_range_3s)?,
        ul_unicode_range_4: max(&ul_unicode_range_4s)?,
        ach_vend_id: max(&ach_vend_ids)?,
        fs_selection: max(&fs_selections)?,
        us_first_char_index: max(&us_first_char_indices)?,
        us_last_char_index: max(&us_last_char_indices)?,
        s_typo_ascender: max(&s_typo_ascenders)?,
        s_typo_descender: max(&s_typo_descenders)?,
        s_typo_line_gap: max(&s_typo_line_gaps)?,
        us_win_ascent: max(&us_win_ascents)?,
        us_win_descent: max(&us_win_descents)?,
        ul_code_page_range_1: max_defined(&ul_code_page_range_1s),
        ul_code_page_range_2: max_defined(&ul_code_page_range_2s),
        sx_height: max_defined(&sx_heights),
        s_cap_height: max_defined(&s_cap_heights),
        us_default_char: max_defined(&us_default_chars),
        us_break_char: max_defined(&us_break_chars),
        us_max_context: max_defined(&us_max_contexts),
        us_lower_optical_point_size: max_defined(&us_lower_optical_point_sizes),
        us_upper_optical_point_size: max_defined(&us_upper_optical_point_sizes),
    })))
}
