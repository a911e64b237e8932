// SPDX-FileCopyrightText: © 2024 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use anyhow::Context;

use crate::output::{ImageFormat, OutputPaths};
use crate::task::{self, Task};

/// Kind of problem whose result is plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Multitasking: concurrent tasks in a slot are grouped under a main task.
    #[value(name = "MTS")]
    Mts,
    /// Scheduling: one task per slot and machine.
    #[value(name = "SCH")]
    Sch,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mts => write!(f, "MTS"),
            Self::Sch => write!(f, "SCH"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// The kind of input.
    pub mode: Mode,
    /// The .gantt file to plot.
    pub input: std::path::PathBuf,
    /// Print all the tasks after validation.
    pub debug: bool,
    /// Also save the legend in a separate file.
    pub plot_legend: bool,
    /// Size of the batch size labels, in points.
    pub label_size: f64,
    /// Resolution of the images, in dots per inch.
    pub dpi: u32,
    /// Space between a main task and its sub-tasks, in hours.
    pub margin: f64,
    /// The format of the images.
    pub format: ImageFormat,
}

impl Config {
    pub fn new(mode: Mode, input: impl Into<std::path::PathBuf>) -> Self {
        Self {
            mode,
            input: input.into(),
            debug: false,
            plot_legend: true,
            label_size: 7.0,
            dpi: 300,
            margin: 0.02,
            format: ImageFormat::Png,
        }
    }
}

/// Validated tasks ready to be plotted.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub mode: Mode,
    /// One task per machine and slot.
    pub tasks: Vec<Task>,
    /// Sorted machines.
    pub machines: Vec<String>,
    /// Sorted orders, empty strings only in SCH mode.
    pub orders: Vec<String>,
    /// Sorted processing units.
    pub processing_units: Vec<String>,
    /// Sorted operations.
    pub operations: Vec<String>,
}

impl Schedule {
    /// Consolidate (MTS only), remove duplicates, and check for overlaps.
    pub fn build(mode: Mode, tasks: Vec<Task>) -> crate::error::Result<Self> {
        let machines = task::sorted(task::machines(&tasks));
        let orders = task::sorted(task::orders(&tasks));
        let processing_units = task::sorted(task::processing_units(&tasks));
        let operations = task::sorted(task::operations(&tasks));
        log::info!(
            "{} machines, {} orders, {} processing units, {} operations",
            machines.len(),
            orders.len(),
            processing_units.len(),
            operations.len()
        );

        let tasks = match mode {
            Mode::Mts => crate::consolidation::consolidate(&tasks, &machines)?,
            Mode::Sch => tasks,
        };
        let tasks = task::remove_duplicates(tasks);
        if let Some(overlap) = crate::overlap::find_overlap(&tasks, &machines) {
            return Err(overlap.into());
        }

        Ok(Self {
            mode,
            tasks,
            machines,
            orders,
            processing_units,
            operations,
        })
    }

    /// Keys of the colors: operations in SCH mode, orders in MTS mode.
    pub fn color_keys(&self) -> &[String] {
        match self.mode {
            Mode::Sch => &self.operations,
            Mode::Mts => &self.orders,
        }
    }
}

pub struct GanttChart {
    paths: OutputPaths,
    config: Config,
}

impl GanttChart {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        anyhow::ensure!(config.dpi > 0, "vanishing DPI");
        anyhow::ensure!(config.label_size > 0.0, "vanishing label size");
        anyhow::ensure!(
            (0.0..0.5).contains(&config.margin),
            "invalid margin {}, must be in [0, 0.5)",
            config.margin
        );

        let paths = OutputPaths::new(&config.input, config.format)?;
        Ok(Self { paths, config })
    }

    pub fn paths(&self) -> &OutputPaths {
        &self.paths
    }

    /// Read the input, validate it, and save the chart and the legend.
    pub fn run(&self) -> anyhow::Result<Schedule> {
        let tasks = crate::parser::parse_file(self.config.mode, &self.config.input)?;
        let schedule = Schedule::build(self.config.mode, tasks)?;

        if self.config.debug {
            for task in &schedule.tasks {
                print!("{}", task.describe(0));
            }
        }

        crate::chart::draw_chart(&schedule, &self.config, &self.paths)
            .with_context(|| format!("cannot save {}", self.paths.chart.display()))?;
        log::info!("saved {}", self.paths.chart.display());

        if self.config.plot_legend {
            crate::chart::draw_legend(&schedule, &self.config, &self.paths)
                .with_context(|| format!("cannot save {}", self.paths.legend.display()))?;
            log::info!("saved {}", self.paths.legend.display());
        }

        Ok(schedule)
    }
}
