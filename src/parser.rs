// SPDX-FileCopyrightText: © 2024 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

//! Reader of .gantt files.
//!
//! Each line holds one task as five columns separated by whitespace:
//!
//! ```text
//! Machine   T_begin   T_end     Operation  Batch_size
//! PU0_M0_B  0         0.833333  A          40.2
//! PU2_M3_B  0.833333  1.83333   C          32
//! ```
//!
//! In MTS mode the first column is `ProcessingUnit_Machine_Order`,
//! in SCH mode it is the machine name with no restrictions.

use crate::error::FormatError;
use crate::gantt::Mode;
use crate::task::Task;

const NUM_COLUMNS: usize = 5;

fn parse_number(line: usize, column: &'static str, value: &str) -> Result<f64, FormatError> {
    match value.parse::<f64>() {
        // adding zero turns -0 into 0
        Ok(x) if x.is_finite() => Ok(x + 0.0),
        _ => Err(FormatError::Number {
            line,
            column,
            value: value.to_string(),
        }),
    }
}

/// Parse a single line, numbered from 1.
pub fn parse_line(mode: Mode, line: usize, content: &str) -> Result<Task, FormatError> {
    let words = content.split_whitespace().collect::<Vec<&str>>();
    if words.len() != NUM_COLUMNS {
        return Err(FormatError::ColumnCount {
            line,
            content: content.to_string(),
            found: words.len(),
        });
    }

    let t_begin = parse_number(line, "begin time", words[1])?;
    let t_end = parse_number(line, "end time", words[2])?;
    let batch_size = parse_number(line, "batch size", words[4])?;
    if t_begin > t_end {
        return Err(FormatError::Interval {
            line,
            begin: t_begin,
            end: t_end,
        });
    }
    if batch_size < 0.0 {
        return Err(FormatError::Number {
            line,
            column: "batch size",
            value: words[4].to_string(),
        });
    }

    match mode {
        Mode::Sch => Ok(Task::new(words[0], t_begin, t_end, words[3], batch_size)),
        Mode::Mts => {
            let info = words[0].split('_').collect::<Vec<&str>>();
            if info.len() != 3 {
                return Err(FormatError::MtsInfo {
                    line,
                    info: words[0].to_string(),
                });
            }
            Ok(
                Task::new(info[1], t_begin, t_end, words[3], batch_size)
                    .with_mts_info(info[0], info[2]),
            )
        }
    }
}

/// Parse the content of a .gantt file, one task per line in file order.
pub fn parse_str(mode: Mode, text: &str) -> Result<Vec<Task>, FormatError> {
    text.lines()
        .enumerate()
        .map(|(i, line)| parse_line(mode, i + 1, line))
        .collect()
}

/// Read and parse a .gantt file.
pub fn parse_file(mode: Mode, path: &std::path::Path) -> crate::error::Result<Vec<Task>> {
    let text = std::fs::read_to_string(path).map_err(|source| crate::error::Error::Io {
        path: path.display().to_string(),
        source,
    })?;
    let tasks = parse_str(mode, &text)?;
    log::info!("parsed {} tasks from {}", tasks.len(), path.display());
    Ok(tasks)
}
