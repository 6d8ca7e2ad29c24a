//! cmap: candidate selection and the single-subtable union
//!
//! Only Windows-platform Unicode subtables qualify as merge candidates.
//! The merged table carries exactly one subtable even when both a BMP and
//! a full-repertoire candidate exist among the inputs; whichever encoding
//! and format rank highest win.

use indexmap::IndexMap;
use read_fonts::{
    FontRef, TableProvider,
    tables::cmap::{Cmap4, Cmap12, CmapSubtable, PlatformId},
};

use crate::{
    FontIndex, GlyphName, MergeError, Result,
    glyph_order::GlyphOrder,
    types::Codepoint,
    tables::{Disposition, TableRecord, tags},
};

/// Microsoft platform id, the only platform considered for merging.
pub const WINDOWS_PLATFORM: u16 = 3;
/// Unicode BMP encoding on the Windows platform.
pub const UNICODE_BMP_ENCODING: u16 = 1;
/// Unicode full-repertoire encoding on the Windows platform.
pub const UNICODE_FULL_ENCODING: u16 = 10;

/// One decoded subtable. `mapping` stays empty for formats the decoder
/// does not handle; the merge rejects those before any union happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodePointMapSubtable {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub format: u16,
    pub mapping: IndexMap<Codepoint, GlyphName>,
}

/// All candidate subtables of one font, in encoding-record order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CmapRecord {
    pub subtables: Vec<CodePointMapSubtable>,
}

pub(crate) fn from_font(font: &FontRef<'_>, order: &GlyphOrder) -> Result<CmapRecord> {
    let cmap = font.cmap()?;

    let mut subtables = Vec::new();
    for record in cmap.encoding_records() {
        if record.platform_id() != PlatformId::Windows {
            continue;
        }
        let encoding_id = record.encoding_id();
        if encoding_id != UNICODE_BMP_ENCODING && encoding_id != UNICODE_FULL_ENCODING {
            continue;
        }
        let Ok(subtable) = record.subtable(cmap.offset_data()) else {
            continue;
        };
        let (format, mapping) = match &subtable {
            CmapSubtable::Format4(f4) => (4, decode_format4(f4, order)),
            CmapSubtable::Format12(f12) => (12, decode_format12(f12, order)),
            CmapSubtable::Format6(_) => (6, IndexMap::new()),
            _ => (0, IndexMap::new()),
        };
        subtables.push(CodePointMapSubtable {
            platform_id: WINDOWS_PLATFORM,
            encoding_id,
            format,
            mapping,
        });
    }

    Ok(CmapRecord { subtables })
}

fn decode_format4(f4: &Cmap4<'_>, order: &GlyphOrder) -> IndexMap<Codepoint, GlyphName> {
    let mut mapping = IndexMap::new();

    let end_codes = f4.end_code();
    let start_codes = f4.start_code();
    let id_deltas = f4.id_delta();
    let id_range_offsets = f4.id_range_offsets();
    let glyph_id_array = f4.glyph_id_array();

    let seg_count = f4.seg_count_x2() as usize / 2;
    for seg in 0..seg_count {
        let end_code = end_codes.get(seg).map(|v| v.get()).unwrap_or(0xFFFF);
        let start_code = start_codes.get(seg).map(|v| v.get()).unwrap_or(0);
        let id_delta = id_deltas.get(seg).map(|v| v.get()).unwrap_or(0);
        let id_range_offset = id_range_offsets.get(seg).map(|v| v.get()).unwrap_or(0);

        if start_code == 0xFFFF {
            continue;
        }

        for cp in start_code..=end_code {
            let gid = if id_range_offset == 0 {
                ((cp as i32 + id_delta as i32) & 0xFFFF) as u16
            } else {
                let glyph_idx =
                    (id_range_offset as usize / 2) + (cp - start_code) as usize - (seg_count - seg);
                match glyph_id_array.get(glyph_idx) {
                    Some(gid) if gid.get() != 0 => {
                        ((gid.get() as i32 + id_delta as i32) & 0xFFFF) as u16
                    }
                    _ => 0,
                }
            };

            if gid != 0 && let Some(name) = order.names().get(gid as usize) {
                mapping.insert(Codepoint::new(cp as u32), name.clone());
            }
        }
    }

    mapping
}

fn decode_format12(f12: &Cmap12<'_>, order: &GlyphOrder) -> IndexMap<Codepoint, GlyphName> {
    let mut mapping = IndexMap::new();
    for group in f12.groups() {
        let start = group.start_char_code();
        let end = group.end_char_code();
        let mut gid = group.start_glyph_id();
        for cp in start..=end {
            if gid != 0 && let Some(name) = order.names().get(gid as usize) {
                mapping.insert(Codepoint::new(cp), name.clone());
            }
            gid += 1;
        }
    }
    mapping
}

fn unwrap_records<'a>(records: &[&'a TableRecord]) -> Result<Vec<&'a CmapRecord>> {
    records
        .iter()
        .map(|r| r.as_cmap().ok_or(MergeError::RecordVariantMismatch(tags::CMAP)))
        .collect()
}

/// Produces a single Windows subtable whose encoding id and format are
/// the maxima over every candidate (one format-12 candidate anywhere
/// forces a format-12 output). Code points union in font order; a later
/// input wins on collision.
///
/// Every font must contribute at least one candidate, and every candidate
/// must be format 4 or 12; either violation aborts the merge.
pub fn merge(records: &[&TableRecord]) -> Result<Disposition> {
    let tables = unwrap_records(records)?;
    if tables.is_empty() {
        return Err(MergeError::NoFonts);
    }

    let mut encoding_id = 0u16;
    let mut format = 0u16;
    let mut mapping: IndexMap<Codepoint, GlyphName> = IndexMap::new();

    for (i, rec) in tables.iter().enumerate() {
        if rec.subtables.is_empty() {
            return Err(MergeError::NoQualifyingCmapSubtable(FontIndex::new(i)));
        }
        for sub in &rec.subtables {
            if sub.format != 4 && sub.format != 12 {
                return Err(MergeError::UnsupportedCmapFormat {
                    format: sub.format,
                    font: FontIndex::new(i),
                });
            }
            encoding_id = encoding_id.max(sub.encoding_id);
            format = format.max(sub.format);
            for (cp, name) in &sub.mapping {
                mapping.insert(*cp, name.clone());
            }
        }
    }

    Ok(Disposition::Include(TableRecord::Cmap(CmapRecord {
        subtables: vec![CodePointMapSubtable {
            platform_id: WINDOWS_PLATFORM,
            encoding_id,
            format,
            mapping,
        }],
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subtable(encoding_id: u16, format: u16, entries: &[(u32, &str)]) -> CodePointMapSubtable {
        let mapping = entries
            .iter()
            .map(|(cp, name)| (Codepoint::new(*cp), GlyphName::new(*name)))
            .collect();
        CodePointMapSubtable { platform_id: WINDOWS_PLATFORM, encoding_id, format, mapping }
    }

    fn merged(records: Vec<CmapRecord>) -> CodePointMapSubtable {
        let wrapped: Vec<TableRecord> = records.into_iter().map(TableRecord::Cmap).collect();
        let refs: Vec<&TableRecord> = wrapped.iter().collect();
        match merge(&refs).unwrap() {
            Disposition::Include(TableRecord::Cmap(rec)) => {
                assert_eq!(rec.subtables.len(), 1);
                rec.subtables.into_iter().next().unwrap()
            }
            other => panic!("unexpected disposition: {other:?}"),
        }
    }

    #[test]
    fn test_format_selection_is_monotonic() {
        let out = merged(vec![
            CmapRecord { subtables: vec![subtable(1, 4, &[(0x41, "A#0")])] },
            CmapRecord { subtables: vec![subtable(1, 4, &[(0x42, "B#1")])] },
            CmapRecord { subtables: vec![subtable(10, 12, &[(0x1F600, "emoji#2")])] },
        ]);
        assert_eq!(out.format, 12);
        assert_eq!(out.encoding_id, 10);
        assert_eq!(out.platform_id, WINDOWS_PLATFORM);
    }

    #[test]
    fn test_all_format4_inputs_stay_format4() {
        let out = merged(vec![
            CmapRecord { subtables: vec![subtable(1, 4, &[(0x41, "A#0")])] },
            CmapRecord { subtables: vec![subtable(1, 4, &[(0x42, "B#1")])] },
        ]);
        assert_eq!(out.format, 4);
        assert_eq!(out.encoding_id, 1);
    }

    #[test]
    fn test_union_later_input_wins_on_collision() {
        let out = merged(vec![
            CmapRecord { subtables: vec![subtable(1, 4, &[(0x41, "A#0"), (0x42, "B#0")])] },
            CmapRecord { subtables: vec![subtable(1, 4, &[(0x41, "A#1")])] },
        ]);
        assert_eq!(out.mapping.len(), 2);
        assert_eq!(out.mapping[&Codepoint::new(0x41)], GlyphName::new("A#1"));
        assert_eq!(out.mapping[&Codepoint::new(0x42)], GlyphName::new("B#0"));
    }

    #[test]
    fn test_font_without_candidates_is_fatal() {
        let records =
            vec![CmapRecord { subtables: vec![subtable(1, 4, &[])] }, CmapRecord::default()];
        let wrapped: Vec<TableRecord> = records.into_iter().map(TableRecord::Cmap).collect();
        let refs: Vec<&TableRecord> = wrapped.iter().collect();
        assert!(matches!(
            merge(&refs),
            Err(MergeError::NoQualifyingCmapSubtable(font)) if font == FontIndex::new(1)
        ));
    }

    #[test]
    fn test_unsupported_candidate_format_is_fatal() {
        let records = vec![CmapRecord { subtables: vec![subtable(1, 6, &[])] }];
        let wrapped: Vec<TableRecord> = records.into_iter().map(TableRecord::Cmap).collect();
        let refs: Vec<&TableRecord> = wrapped.iter().collect();
        assert!(matches!(
            merge(&refs),
            Err(MergeError::UnsupportedCmapFormat { format: 6, font }) if font == FontIndex::new(0)
        ));
    }

    #[test]
    fn test_two_candidates_in_one_font_both_union() {
        let out = merged(vec![CmapRecord {
            subtables: vec![
                subtable(1, 4, &[(0x41, "A#0")]),
                subtable(10, 12, &[(0x1F600, "emoji#0")]),
            ],
        }]);
        assert_eq!(out.format, 12);
        assert_eq!(out.encoding_id, 10);
        assert_eq!(out.mapping.len(), 2);
    }
}
