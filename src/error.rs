// SPDX-FileCopyrightText: © 2024 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Malformed content in a .gantt file.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("line {line}: '{content}' has wrong number of columns: {found}")]
    ColumnCount {
        line: usize,
        content: String,
        found: usize,
    },

    #[error("line {line}: MTS info '{info}' does not adhere to the standard processingUnit_machine_order")]
    MtsInfo { line: usize, info: String },

    #[error("line {line}: invalid {column} '{value}'")]
    Number {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("line {line}: task ends at {end} before it begins at {begin}")]
    Interval { line: usize, begin: f64, end: f64 },
}

/// Internal invariant violated while consolidating sibling tasks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsistencyError {
    #[error("invalid number of tasks ({found}) on machine {machine} in time slot ({begin}, {end})")]
    SlotTaskCount {
        machine: String,
        begin: f64,
        end: f64,
        found: usize,
    },

    #[error("subtasks do not match main task\n{subtask}\n VS \n{main}")]
    SubtaskMismatch { subtask: String, main: String },
}

/// Two time slots on the same machine overlap.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("found overlapping tasks on machine {machine}: ({first_begin}, {first_end}) and ({second_begin}, {second_end})")]
pub struct OverlapError {
    pub machine: String,
    pub first_begin: f64,
    pub first_end: f64,
    pub second_begin: f64,
    pub second_end: f64,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Consistency(#[from] ConsistencyError),

    #[error(transparent)]
    Overlap(#[from] OverlapError),
}

pub type Result<T> = std::result::Result<T, Error>;
