//! glyf: outline union with component references remapped into the merged order
//!
//! Per-glyph hinting instructions travel with their outlines unchanged.
//! Control programs (fpgm, prep, cvt) are dropped elsewhere, so preserved
//! instructions may reference functions that no longer exist; stripping
//! them is deliberately not this module's job.

use indexmap::IndexMap;
use read_fonts::{FontRef, TableProvider, tables::glyf::Glyph as ReadGlyph};
use write_fonts::tables::glyf::{
    Anchor, Bbox, Component, ComponentFlags, CompositeGlyph, Contour, Glyph, SimpleGlyph,
    Transform,
};

use crate::{
    GlyphName, MergeError, Result,
    glyph_order::GlyphOrder,
    strategies::union_overwrite,
    tables::{Disposition, TableRecord, tags},
};

/// Outlines keyed by renamed glyph name, in the owning font's order.
#[derive(Debug, Clone, Default)]
pub struct GlyfRecord {
    pub outlines: IndexMap<GlyphName, Glyph>,
}

/// Loads all outlines of one font. `base` is the position of this font's
/// first glyph in the merged order; component glyph ids are rebased by it
/// while loading so the record is already consistent with the merged
/// numbering.
pub(crate) fn from_font(font: &FontRef<'_>, order: &GlyphOrder, base: usize) -> Result<GlyfRecord> {
    let glyf = font.glyf()?;
    let loca = font.loca(None)?;

    let mut outlines = IndexMap::with_capacity(order.len());
    for (gid, name) in order.iter().enumerate() {
        let glyph = match loca.get_glyf(read_fonts::types::GlyphId::new(gid as u32), &glyf) {
            Ok(Some(g)) => convert_glyph(&g, base),
            _ => Glyph::Empty,
        };
        outlines.insert(name.clone(), glyph);
    }
    Ok(GlyfRecord { outlines })
}

fn convert_glyph(glyph: &ReadGlyph, base: usize) -> Glyph {
    match glyph {
        ReadGlyph::Simple(simple) => {
            let mut contours: Vec<Contour> = Vec::new();

            let end_pts = simple.end_pts_of_contours();
            let mut points_iter = simple.points();
            let mut current_point = 0usize;

            for end_pt in end_pts {
                let end = end_pt.get() as usize;
                let mut contour_points = Vec::new();

                while current_point <= end {
                    if let Some(pt) = points_iter.next() {
                        contour_points.push(read_fonts::tables::glyf::CurvePoint {
                            x: pt.x,
                            y: pt.y,
                            on_curve: pt.on_curve,
                        });
                    }
                    current_point += 1;
                }

                contours.push(contour_points.into());
            }

            let bbox = Bbox {
                x_min: simple.x_min(),
                y_min: simple.y_min(),
                x_max: simple.x_max(),
                y_max: simple.y_max(),
            };

            Glyph::Simple(SimpleGlyph {
                bbox,
                contours,
                instructions: simple.instructions().to_vec(),
            })
        }
        ReadGlyph::Composite(composite) => {
            let mut components: Vec<Component> = Vec::new();

            for comp in composite.components() {
                // Concatenated orders make the rebase a plain offset.
                let new_gid = (base + comp.glyph.to_u32() as usize) as u16;

                let anchor = match comp.anchor {
                    read_fonts::tables::glyf::Anchor::Offset { x, y } => Anchor::Offset { x, y },
                    read_fonts::tables::glyf::Anchor::Point { base, component } => {
                        Anchor::Point { base, component }
                    }
                };

                let transform = Transform {
                    xx: comp.transform.xx,
                    yx: comp.transform.yx,
                    xy: comp.transform.xy,
                    yy: comp.transform.yy,
                };

                let flags: ComponentFlags = comp.flags.into();

                components.push(Component {
                    glyph: font_types::GlyphId16::new(new_gid),
                    anchor,
                    transform,
                    flags,
                });
            }

            if components.is_empty() {
                return Glyph::Empty;
            }

            let bbox = Bbox {
                x_min: composite.x_min(),
                y_min: composite.y_min(),
                x_max: composite.x_max(),
                y_max: composite.y_max(),
            };

            let first_component = components.remove(0);
            let mut composite_glyph = CompositeGlyph::new(first_component, bbox);
            for comp in components {
                composite_glyph.add_component(comp, bbox);
            }

            Glyph::Composite(composite_glyph)
        }
    }
}

/// Union across inputs in font order; a later input wins on key
/// collision. Both outlines of a pre-rename duplicate like "A" survive
/// under their distinct renamed keys.
pub fn merge(records: &[&TableRecord]) -> Result<Disposition> {
    let tables: Vec<&GlyfRecord> = records
        .iter()
        .map(|r| r.as_glyf().ok_or(MergeError::RecordVariantMismatch(tags::GLYF)))
        .collect::<Result<_>>()?;
    if tables.is_empty() {
        return Err(MergeError::NoFonts);
    }

    let maps: Vec<&IndexMap<GlyphName, Glyph>> = tables.iter().map(|t| &t.outlines).collect();
    Ok(Disposition::Include(TableRecord::Glyf(GlyfRecord { outlines: union_overwrite(&maps) })))
}
