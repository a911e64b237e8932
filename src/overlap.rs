// SPDX-FileCopyrightText: © 2024 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use crate::error::OverlapError;
use crate::task::{distinct_slots, on_machine, Task};

/// Find the first pair of overlapping time slots on any machine.
///
/// In MTS mode it must be called after consolidation, otherwise the
/// sub-tasks of the same main task are compared with one another.
///
/// Since the slots of every machine are sorted by begin time, a slot
/// overlaps some later one iff it overlaps the next one. Touching
/// slots, i.e., one ending exactly when the next begins, do not overlap.
pub fn find_overlap(tasks: &[Task], machines: &[String]) -> Option<OverlapError> {
    for machine in machines {
        let slots = distinct_slots(on_machine(tasks, machine));
        if let Some(pair) = slots.windows(2).find(|pair| pair[0].end > pair[1].begin) {
            log::debug!("machine {} overlap {:?} {:?}", machine, pair[0], pair[1]);
            return Some(OverlapError {
                machine: machine.clone(),
                first_begin: pair[0].begin,
                first_end: pair[0].end,
                second_begin: pair[1].begin,
                second_end: pair[1].end,
            });
        }
    }
    None
}

/// Return true if two time slots overlap on any machine.
pub fn has_overlap(tasks: &[Task], machines: &[String]) -> bool {
    find_overlap(tasks, machines).is_some()
}
