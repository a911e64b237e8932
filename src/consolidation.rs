// SPDX-FileCopyrightText: © 2024 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use crate::error::ConsistencyError;
use crate::task::{distinct_slots, on_machine, remove_duplicates, Slot, Task};

const MAIN_PREFIX: &str = "MAIN_";

/// Group sibling tasks that share machine and time slot under one main task
/// (MTS only).
///
/// Parameters:
/// - `tasks`: the tasks as parsed
/// - `machines`: the machines whose tasks are kept in the result
///
/// Returns one task per machine and slot: either the only task found in
/// the slot or a synthetic main task whose sub-tasks are the distinct
/// concurrent tasks and whose batch size is their total.
pub fn consolidate(tasks: &[Task], machines: &[String]) -> Result<Vec<Task>, ConsistencyError> {
    let mut reduced_tasks = vec![];
    for machine in machines {
        let compatible_tasks = on_machine(tasks, machine).collect::<Vec<&Task>>();
        let slots = distinct_slots(compatible_tasks.iter().copied());
        log::debug!("machine {} slots {:?}", machine, slots);

        for slot in slots {
            let concurrent_tasks = compatible_tasks
                .iter()
                .filter(|t| t.slot() == slot)
                .map(|t| (*t).clone())
                .collect::<Vec<Task>>();
            match concurrent_tasks.len() {
                0 => {
                    return Err(ConsistencyError::SlotTaskCount {
                        machine: machine.clone(),
                        begin: slot.begin,
                        end: slot.end,
                        found: 0,
                    })
                }
                1 => reduced_tasks.extend(concurrent_tasks),
                _ => reduced_tasks.push(main_task(machine, slot, concurrent_tasks)?),
            }
        }
    }
    Ok(reduced_tasks)
}

fn main_task(
    machine: &str,
    slot: Slot,
    concurrent_tasks: Vec<Task>,
) -> Result<Task, ConsistencyError> {
    let first = &concurrent_tasks[0];
    let mut main = Task::new(
        machine,
        slot.begin,
        slot.end,
        format!("{}{}", MAIN_PREFIX, first.operation),
        0.0,
    );
    main.processing_unit = first.processing_unit.clone();

    if let Some(mismatch) = concurrent_tasks.iter().find(|t| {
        t.machine != main.machine
            || t.processing_unit != main.processing_unit
            || t.t_begin != main.t_begin
            || t.t_end != main.t_end
    }) {
        log::error!("subtasks do not match main task {}", main.operation);
        return Err(ConsistencyError::SubtaskMismatch {
            subtask: mismatch.describe(0),
            main: main.describe(0),
        });
    }

    let mut subtasks = remove_duplicates(concurrent_tasks);
    if subtasks.len() == 1 {
        log::warn!(
            "duplicate tasks on machine {} in slot ({}, {}) collapsed into one",
            machine,
            slot.begin,
            slot.end
        );
        return Ok(subtasks.remove(0));
    }

    main.batch_size = subtasks.iter().map(|t| t.batch_size).sum();
    main.subtasks = subtasks;
    log::debug!(
        "main task {} on machine {} holds {} subtasks",
        main.operation,
        machine,
        main.subtasks.len()
    );
    Ok(main)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::machines;

    fn mts(info: (&str, &str, &str), begin: f64, end: f64, op: &str, batch: f64) -> Task {
        Task::new(info.1, begin, end, op, batch).with_mts_info(info.0, info.2)
    }

    #[test]
    fn test_consolidate_siblings() -> anyhow::Result<()> {
        let tasks = vec![
            mts(("PU0", "M0", "B"), 0.0, 0.5, "A", 10.0),
            mts(("PU0", "M0", "C"), 0.0, 0.5, "A", 20.0),
        ];
        let reduced = consolidate(&tasks, &machines(&tasks))?;
        assert_eq!(1, reduced.len());
        let main = &reduced[0];
        assert_eq!("MAIN_A", main.operation);
        assert_eq!("M0", main.machine);
        assert_eq!("PU0", main.processing_unit);
        assert_eq!(30.0, main.batch_size);
        assert_eq!(tasks, main.subtasks);
        Ok(())
    }

    #[test]
    fn test_consolidate_same_order_different_batch() -> anyhow::Result<()> {
        let tasks = vec![
            mts(("PU0", "M0", "B"), 0.0, 0.5, "A", 10.0),
            mts(("PU0", "M0", "B"), 0.0, 0.5, "A", 20.0),
        ];
        let reduced = consolidate(&tasks, &machines(&tasks))?;
        assert_eq!(1, reduced.len());
        assert_eq!("MAIN_A", reduced[0].operation);
        assert_eq!(30.0, reduced[0].batch_size);
        assert_eq!(2, reduced[0].subtasks.len());
        Ok(())
    }

    #[test]
    fn test_consolidate_duplicates_collapse() -> anyhow::Result<()> {
        let task = mts(("PU0", "M0", "B"), 0.0, 0.5, "A", 10.0);
        let tasks = vec![task.clone(), task.clone()];
        let reduced = consolidate(&tasks, &machines(&tasks))?;
        assert_eq!(vec![task], reduced);
        assert!(reduced[0].subtasks.is_empty());
        Ok(())
    }

    #[test]
    fn test_consolidate_invariants() -> anyhow::Result<()> {
        let tasks = vec![
            mts(("PU0", "M0", "B"), 1.0, 2.0, "B", 5.0),
            mts(("PU0", "M0", "A"), 0.0, 1.0, "A", 1.5),
            mts(("PU1", "M1", "A"), 0.0, 1.0, "C", 7.0),
            mts(("PU0", "M0", "C"), 0.0, 1.0, "D", 2.5),
            mts(("PU0", "M0", "D"), 0.0, 1.0, "A", 3.0),
            mts(("PU0", "M0", "C"), 0.0, 1.0, "D", 2.5),
        ];
        let reduced = consolidate(&tasks, &machines(&tasks))?;
        assert_eq!(3, reduced.len());

        // slots in sorted order within each machine
        assert_eq!(("M0", 0.0), (reduced[0].machine.as_str(), reduced[0].t_begin));
        assert_eq!(("M0", 1.0), (reduced[1].machine.as_str(), reduced[1].t_begin));
        assert_eq!(("M1", 0.0), (reduced[2].machine.as_str(), reduced[2].t_begin));

        let main = &reduced[0];
        assert_eq!("MAIN_A", main.operation);
        assert_eq!(3, main.subtasks.len());
        assert_eq!(7.0, main.batch_size);
        assert_eq!(
            main.batch_size,
            main.subtasks.iter().map(|t| t.batch_size).sum::<f64>()
        );
        for sub in &main.subtasks {
            assert_eq!(main.slot(), sub.slot());
            assert_eq!(main.machine, sub.machine);
            assert_eq!(main.processing_unit, sub.processing_unit);
            assert!(sub.subtasks.is_empty());
        }

        assert_eq!(tasks[0], reduced[1]);
        assert_eq!(tasks[2], reduced[2]);
        Ok(())
    }

    #[test]
    fn test_consolidate_mismatched_processing_unit() -> anyhow::Result<()> {
        let tasks = vec![
            mts(("PU0", "M0", "B"), 0.0, 0.5, "A", 10.0),
            mts(("PU1", "M0", "C"), 0.0, 0.5, "A", 20.0),
        ];
        match consolidate(&tasks, &machines(&tasks)) {
            Err(ConsistencyError::SubtaskMismatch { subtask, main }) => {
                assert!(subtask.contains("Part of Processing Unit: PU1"));
                assert!(main.starts_with("Task: MAIN_A"));
            }
            res => panic!("unexpected result: {:?}", res),
        }
        Ok(())
    }

    #[test]
    fn test_consolidate_signed_zero_slot() -> anyhow::Result<()> {
        let tasks = vec![
            mts(("PU0", "M0", "B"), -0.0, 1.0, "A", 10.0),
            mts(("PU0", "M0", "C"), -0.0, 2.0, "A", 20.0),
            mts(("PU0", "M0", "D"), 0.0, 1.0, "A", 30.0),
        ];
        let reduced = consolidate(&tasks, &machines(&tasks))?;
        assert_eq!(2, reduced.len());
        assert_eq!("MAIN_A", reduced[0].operation);
        assert_eq!(2, reduced[0].subtasks.len());
        assert_eq!(40.0, reduced[0].batch_size);
        assert_eq!(tasks[1], reduced[1]);
        Ok(())
    }

    #[test]
    fn test_consolidate_only_listed_machines() -> anyhow::Result<()> {
        let tasks = vec![
            mts(("PU0", "M0", "B"), 0.0, 0.5, "A", 10.0),
            mts(("PU0", "M1", "B"), 0.0, 0.5, "A", 10.0),
        ];
        let reduced = consolidate(&tasks, &["M1".to_string()])?;
        assert_eq!(vec![tasks[1].clone()], reduced);
        assert!(consolidate(&[], &[])?.is_empty());
        Ok(())
    }
}
