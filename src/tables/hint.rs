//! prep, fpgm and cvt: per-font control programs, never merged

use read_fonts::FontRef;

use crate::{
    Result,
    tables::{Disposition, TableRecord},
    types::TableTag,
};

/// Raw bytes of one font's control program (prep, fpgm or cvt).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlProgramRecord {
    pub tag: TableTag,
    pub data: Vec<u8>,
}

pub(crate) fn from_font(font: &FontRef<'_>, tag: TableTag) -> ControlProgramRecord {
    let data = font.table_data(tag.tag()).map(|d| d.as_bytes().to_vec()).unwrap_or_default();
    ControlProgramRecord { tag, data }
}

/// Each program assumes its own function numbers and cvt layout, so the
/// inputs cannot be combined; the tag is left out of the output even when
/// the drop policy does not name it.
pub fn merge(_records: &[&TableRecord]) -> Result<Disposition> {
    Ok(Disposition::Omit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::tags;

    #[test]
    fn test_control_programs_never_reach_the_output() {
        let rec = TableRecord::ControlProgram(ControlProgramRecord {
            tag: tags::PREP,
            data: vec![0xB8, 0x01, 0xFF],
        });
        assert!(matches!(merge(&[&rec]).unwrap(), Disposition::Omit));
    }
}
