// SPDX-FileCopyrightText: © 2024 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

pub mod chart;
pub mod consolidation;
pub mod error;
pub mod gantt;
pub mod output;
pub mod overlap;
pub mod parser;
pub mod task;
