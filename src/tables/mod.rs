//! Table records and per-table merge strategies
//!
//! Every decoded table is one variant of [`TableRecord`], keyed by its tag.
//! Each submodule owns one table category: the record schema (named, typed
//! fields), the loader that builds a record from a font, and the merge
//! strategy the dispatcher invokes for that tag.

pub mod cmap;
pub mod glyf;
pub mod head;
pub mod hhea;
pub mod hint;
pub mod maxp;
pub mod metrics;
pub mod os2;
pub mod post;

pub use cmap::{CmapRecord, CodePointMapSubtable};
pub use glyf::GlyfRecord;
pub use head::HeadRecord;
pub use hhea::HheaRecord;
pub use hint::ControlProgramRecord;
pub use maxp::MaxpRecord;
pub use metrics::{GlyphMetrics, MetricsRecord};
pub use os2::Os2Record;
pub use post::PostRecord;

use crate::types::TableTag;

/// Well-known table tags
pub mod tags {
    use crate::types::TableTag;

    pub const MAXP: TableTag = TableTag::new(b"maxp");
    pub const HEAD: TableTag = TableTag::new(b"head");
    pub const HHEA: TableTag = TableTag::new(b"hhea");
    pub const OS2: TableTag = TableTag::new(b"OS/2");
    pub const POST: TableTag = TableTag::new(b"post");
    pub const HMTX: TableTag = TableTag::new(b"hmtx");
    pub const VMTX: TableTag = TableTag::new(b"vmtx");
    pub const GLYF: TableTag = TableTag::new(b"glyf");
    pub const LOCA: TableTag = TableTag::new(b"loca");
    pub const CMAP: TableTag = TableTag::new(b"cmap");
    pub const PREP: TableTag = TableTag::new(b"prep");
    pub const FPGM: TableTag = TableTag::new(b"fpgm");
    pub const CVT: TableTag = TableTag::new(b"cvt ");
    pub const GASP: TableTag = TableTag::new(b"gasp");
}

/// One table of one font, decoded to the fields the merge rules read
#[derive(Debug, Clone)]
pub enum TableRecord {
    Maxp(MaxpRecord),
    Head(HeadRecord),
    Hhea(HheaRecord),
    Os2(Os2Record),
    Post(PostRecord),
    Hmtx(MetricsRecord),
    Vmtx(MetricsRecord),
    Glyf(GlyfRecord),
    Loca(LocaRecord),
    Cmap(CmapRecord),
    ControlProgram(ControlProgramRecord),
    Raw(RawRecord),
}

impl TableRecord {
    pub fn tag(&self) -> TableTag {
        match self {
            TableRecord::Maxp(_) => tags::MAXP,
            TableRecord::Head(_) => tags::HEAD,
            TableRecord::Hhea(_) => tags::HHEA,
            TableRecord::Os2(_) => tags::OS2,
            TableRecord::Post(_) => tags::POST,
            TableRecord::Hmtx(_) => tags::HMTX,
            TableRecord::Vmtx(_) => tags::VMTX,
            TableRecord::Glyf(_) => tags::GLYF,
            TableRecord::Loca(_) => tags::LOCA,
            TableRecord::Cmap(_) => tags::CMAP,
            TableRecord::ControlProgram(rec) => rec.tag,
            TableRecord::Raw(rec) => rec.tag,
        }
    }

    pub fn as_maxp(&self) -> Option<&MaxpRecord> {
        match self {
            TableRecord::Maxp(rec) => Some(rec),
            _ => None,
        }
    }

    pub fn as_head(&self) -> Option<&HeadRecord> {
        match self {
            TableRecord::Head(rec) => Some(rec),
            _ => None,
        }
    }

    pub fn as_hhea(&self) -> Option<&HheaRecord> {
        match self {
            TableRecord::Hhea(rec) => Some(rec),
            _ => None,
        }
    }

    pub fn as_os2(&self) -> Option<&Os2Record> {
        match self {
            TableRecord::Os2(rec) => Some(rec),
            _ => None,
        }
    }

    pub fn as_post(&self) -> Option<&PostRecord> {
        match self {
            TableRecord::Post(rec) => Some(rec),
            _ => None,
        }
    }

    pub fn as_hmtx(&self) -> Option<&MetricsRecord> {
        match self {
            TableRecord::Hmtx(rec) => Some(rec),
            _ => None,
        }
    }

    pub fn as_vmtx(&self) -> Option<&MetricsRecord> {
        match self {
            TableRecord::Vmtx(rec) => Some(rec),
            _ => None,
        }
    }

    pub fn as_glyf(&self) -> Option<&GlyfRecord> {
        match self {
            TableRecord::Glyf(rec) => Some(rec),
            _ => None,
        }
    }

    pub fn as_cmap(&self) -> Option<&CmapRecord> {
        match self {
            TableRecord::Cmap(rec) => Some(rec),
            _ => None,
        }
    }
}

/// What a strategy decided for one tag: attach a merged record to the
/// output, or leave the tag out.
#[derive(Debug)]
pub enum Disposition {
    Include(TableRecord),
    Omit,
}

/// loca carries no merge-relevant payload; offsets are recomputed from the
/// merged glyf table at serialization time.
#[derive(Debug, Clone)]
pub struct LocaRecord {
    pub long_offsets: bool,
}

/// Undecoded table bytes for tags the merge has no schema for
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub tag: TableTag,
    pub data: Vec<u8>,
}

/// loca never merges; the serializer derives offsets from glyf.
pub fn merge_loca(_records: &[&TableRecord]) -> crate::Result<Disposition> {
    Ok(Disposition::Omit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tags() {
        let rec = TableRecord::Loca(LocaRecord { long_offsets: false });
        assert_eq!(rec.tag(), tags::LOCA);

        let rec = TableRecord::Raw(RawRecord { tag: tags::GASP, data: vec![0, 0] });
        assert_eq!(rec.tag(), tags::GASP);
    }

    #[test]
    fn test_loca_always_omits() {
        let rec = TableRecord::Loca(LocaRecord { long_offsets: true });
        assert!(matches!(merge_loca(&[&rec]).unwrap(), Disposition::Omit));
    }
}
