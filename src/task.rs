// SPDX-FileCopyrightText: © 2024 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

/// A box in a Gantt chart: one operation occupying a machine in [t_begin, t_end].
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Start time, in hours.
    pub t_begin: f64,
    /// End time, in hours.
    pub t_end: f64,
    /// Label of the work performed.
    pub operation: String,
    /// Quantity processed.
    pub batch_size: f64,
    /// Resource occupied.
    pub machine: String,
    /// Resource group containing the machine, empty in SCH mode.
    pub processing_unit: String,
    /// Originating work order, empty in SCH mode.
    pub order: String,
    /// Concurrent tasks grouped under a synthetic main task.
    pub subtasks: Vec<Task>,
}

impl Task {
    pub fn new(
        machine: impl Into<String>,
        t_begin: f64,
        t_end: f64,
        operation: impl Into<String>,
        batch_size: f64,
    ) -> Self {
        Self {
            t_begin,
            t_end,
            operation: operation.into(),
            batch_size,
            machine: machine.into(),
            processing_unit: String::new(),
            order: String::new(),
            subtasks: vec![],
        }
    }

    /// Set the processing unit and the order (MTS mode).
    pub fn with_mts_info(
        mut self,
        processing_unit: impl Into<String>,
        order: impl Into<String>,
    ) -> Self {
        self.processing_unit = processing_unit.into();
        self.order = order.into();
        self
    }

    pub fn slot(&self) -> Slot {
        Slot {
            begin: self.t_begin,
            end: self.t_end,
        }
    }

    /// True if the two tasks are equal on all identifying fields.
    /// Sub-tasks are not compared.
    pub fn same_record(&self, other: &Task) -> bool {
        self.t_begin == other.t_begin
            && self.t_end == other.t_end
            && self.batch_size == other.batch_size
            && self.order == other.order
            && self.machine == other.machine
            && self.processing_unit == other.processing_unit
            && self.operation == other.operation
    }

    /// Human-readable tree of this task and its sub-tasks, indented by `depth`.
    pub fn describe(&self, depth: usize) -> String {
        let padding = "   ".repeat(depth);
        let mut out = format!(
            "{padding}Task: {}\n\
             {padding}  |\n\
             {padding}  --- Begins at: {}\n\
             {padding}  --- Ends at: {}\n\
             {padding}  --- Belongs to Order: {}\n\
             {padding}  --- Processed in Machine: {}\n\
             {padding}  --- Part of Processing Unit: {}\n\
             {padding}  --- Batch Size: {}\n",
            self.operation,
            self.t_begin,
            self.t_end,
            self.order,
            self.machine,
            self.processing_unit,
            self.batch_size
        );
        if !self.subtasks.is_empty() {
            out.push_str(&format!(
                "{padding}    --- Contains the following subTasks:\n"
            ));
            for sub in &self.subtasks {
                out.push_str(&sub.describe(depth + 1));
            }
            out.push_str(&format!("{padding}-----END OF SUB TASKS ----\n"));
        }
        out
    }
}

/// Time interval occupied by one or more tasks on a machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub begin: f64,
    pub end: f64,
}

impl Slot {
    /// Total order: by begin time, then by end time.
    /// Negative and positive zero are equal, as they are for `==`.
    pub fn total_cmp(&self, other: &Slot) -> std::cmp::Ordering {
        (self.begin + 0.0)
            .total_cmp(&(other.begin + 0.0))
            .then((self.end + 0.0).total_cmp(&(other.end + 0.0)))
    }
}

/// Distinct slots of the tasks, sorted.
pub fn distinct_slots<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<Slot> {
    let mut slots = tasks.into_iter().map(Task::slot).collect::<Vec<Slot>>();
    slots.sort_by(Slot::total_cmp);
    slots.dedup();
    slots
}

/// Tasks processed in a given machine, in input order.
pub fn on_machine<'a>(tasks: &'a [Task], machine: &'a str) -> impl Iterator<Item = &'a Task> {
    tasks.iter().filter(move |t| t.machine == machine)
}

fn unique<'a>(tasks: &'a [Task], field: impl Fn(&'a Task) -> &'a str) -> Vec<String> {
    let mut values: Vec<String> = vec![];
    for task in tasks {
        let value = field(task);
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }
    values
}

/// Machines across tasks, in order of first occurrence.
pub fn machines(tasks: &[Task]) -> Vec<String> {
    unique(tasks, |t| t.machine.as_str())
}

/// Orders across tasks, in order of first occurrence.
pub fn orders(tasks: &[Task]) -> Vec<String> {
    unique(tasks, |t| t.order.as_str())
}

/// Processing units across tasks, in order of first occurrence.
pub fn processing_units(tasks: &[Task]) -> Vec<String> {
    unique(tasks, |t| t.processing_unit.as_str())
}

/// Operations across tasks, in order of first occurrence.
pub fn operations(tasks: &[Task]) -> Vec<String> {
    unique(tasks, |t| t.operation.as_str())
}

pub fn sorted(mut values: Vec<String>) -> Vec<String> {
    values.sort();
    values
}

/// Remove the tasks that repeat an earlier one on all identifying fields.
/// The first occurrence is kept, the relative order is preserved.
pub fn remove_duplicates(tasks: Vec<Task>) -> Vec<Task> {
    let mut unique_tasks: Vec<Task> = Vec::with_capacity(tasks.len());
    for task in tasks {
        if !unique_tasks.iter().any(|t| t.same_record(&task)) {
            unique_tasks.push(task);
        }
    }
    unique_tasks
}

/// Maximum end time across tasks, 0 if there are none.
pub fn makespan(tasks: &[Task]) -> f64 {
    tasks.iter().map(|t| t.t_end).fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mts(info: (&str, &str, &str), begin: f64, end: f64, op: &str, batch: f64) -> Task {
        Task::new(info.1, begin, end, op, batch).with_mts_info(info.0, info.2)
    }

    #[test]
    fn test_remove_duplicates() -> anyhow::Result<()> {
        let tasks = vec![
            mts(("PU0", "M0", "B"), 0.0, 0.5, "A", 10.0),
            mts(("PU0", "M0", "B"), 0.0, 0.5, "A", 20.0),
            mts(("PU0", "M0", "B"), 0.0, 0.5, "A", 10.0),
            mts(("PU0", "M0", "C"), 0.0, 0.5, "A", 10.0),
            mts(("PU0", "M0", "B"), 0.0, 0.5, "A", 20.0),
        ];
        let unique_tasks = remove_duplicates(tasks.clone());
        assert_eq!(
            vec![tasks[0].clone(), tasks[1].clone(), tasks[3].clone()],
            unique_tasks
        );
        for (i, a) in unique_tasks.iter().enumerate() {
            for b in unique_tasks.iter().skip(i + 1) {
                assert!(!a.same_record(b));
            }
        }
        Ok(())
    }

    #[test]
    fn test_remove_duplicates_is_exact() -> anyhow::Result<()> {
        let tasks = vec![
            Task::new("M1", 0.0, 1.0, "A", 10.0),
            Task::new("M1", 0.0, 1.0 + f64::EPSILON, "A", 10.0),
            Task::new("M1", 0.0, 1.0, "A", 10.000001),
        ];
        assert_eq!(3, remove_duplicates(tasks).len());
        assert!(remove_duplicates(vec![]).is_empty());
        Ok(())
    }

    #[test]
    fn test_derived_sets() -> anyhow::Result<()> {
        let tasks = vec![
            mts(("PU2", "M3", "C"), 0.8, 1.8, "C", 32.0),
            mts(("PU0", "M0", "B"), 0.0, 0.8, "A", 40.2),
            mts(("PU0", "M0", "A"), 1.8, 2.6, "B", 80.6),
            mts(("PU2", "M3", "B"), 2.8, 3.8, "B", 50.0),
        ];
        assert_eq!(vec!["M3", "M0"], machines(&tasks));
        assert_eq!(vec!["C", "B", "A"], orders(&tasks));
        assert_eq!(vec!["A", "B", "C"], sorted(orders(&tasks)));
        assert_eq!(vec!["PU2", "PU0"], processing_units(&tasks));
        assert_eq!(vec!["C", "A", "B"], operations(&tasks));
        assert_eq!(3.8, makespan(&tasks));
        assert_eq!(0.0, makespan(&[]));
        Ok(())
    }

    #[test]
    fn test_distinct_slots_signed_zero() -> anyhow::Result<()> {
        let tasks = vec![
            Task::new("M0", -0.0, 1.0, "A", 1.0),
            Task::new("M0", -0.0, 2.0, "A", 1.0),
            Task::new("M0", 0.0, 1.0, "A", 1.0),
        ];
        let slots = distinct_slots(&tasks);
        assert_eq!(2, slots.len());
        assert_eq!(Slot { begin: 0.0, end: 1.0 }, slots[0]);
        assert_eq!(Slot { begin: 0.0, end: 2.0 }, slots[1]);
        Ok(())
    }

    #[test]
    fn test_distinct_slots() -> anyhow::Result<()> {
        let tasks = vec![
            Task::new("M1", 1.0, 2.0, "A", 1.0),
            Task::new("M1", 0.0, 1.0, "B", 1.0),
            Task::new("M2", 0.0, 0.5, "B", 1.0),
            Task::new("M1", 1.0, 2.0, "C", 1.0),
            Task::new("M1", 0.0, 0.5, "D", 1.0),
        ];
        let slots = distinct_slots(on_machine(&tasks, "M1"));
        assert_eq!(
            vec![
                Slot { begin: 0.0, end: 0.5 },
                Slot { begin: 0.0, end: 1.0 },
                Slot { begin: 1.0, end: 2.0 }
            ],
            slots
        );
        Ok(())
    }

    #[test]
    fn test_describe() -> anyhow::Result<()> {
        let mut main = mts(("PU0", "M0", ""), 0.0, 0.5, "MAIN_A", 30.0);
        main.subtasks = vec![
            mts(("PU0", "M0", "B"), 0.0, 0.5, "A", 10.0),
            mts(("PU0", "M0", "C"), 0.0, 0.5, "A", 20.0),
        ];
        let text = main.describe(0);
        assert!(text.starts_with("Task: MAIN_A\n"));
        assert!(text.contains("\n   Task: A\n"));
        assert!(text.contains("   --- Belongs to Order: C\n"));
        assert!(text.ends_with("-----END OF SUB TASKS ----\n"));
        assert!(!main.subtasks[0].describe(0).contains("subTasks"));
        Ok(())
    }
}
