use std::{io, result};

use read_fonts::ReadError;
use thiserror::Error;
use write_fonts::{BuilderError, error};

use crate::types::{FontIndex, TableTag};

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("failed to read font: {0}")]
    ReadError(#[from] ReadError),

    #[error("failed to write font: {0}")]
    WriteError(#[from] error::Error),

    #[error("failed to build font: {0}")]
    BuilderError(#[from] BuilderError),

    #[error("no fonts provided for merging")]
    NoFonts,

    #[error("required table '{0}' missing from {1}")]
    MissingTable(TableTag, FontIndex),

    #[error("table '{0}': record variant does not match the registered strategy")]
    RecordVariantMismatch(TableTag),

    #[error("{0} has no qualifying cmap subtable (platform 3, encoding 1 or 10)")]
    NoQualifyingCmapSubtable(FontIndex),

    #[error("unsupported cmap subtable format {format} in {font}")]
    UnsupportedCmapFormat { format: u16, font: FontIndex },

    #[error("unknown option: '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option '{key}'")]
    InvalidOptionValue { key: String, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = result::Result<T, MergeError>;
