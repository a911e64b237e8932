// SPDX-FileCopyrightText: © 2024 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use clap::Parser;
use gantt_plot::gantt::{Config, GanttChart, Mode};
use gantt_plot::output::ImageFormat;

/// Exit status on invalid arguments or input.
const EXIT_FAILURE: i32 = 5;

#[derive(Debug, clap::Parser)]
#[command(long_about = None)]
struct Args {
    /// Type of the result: MTS (multitasking) or SCH (scheduling)
    #[arg(value_enum)]
    mode: Mode,
    /// Path to the .gantt file
    path: std::path::PathBuf,
    /// Resolution of the images, in dots per inch
    #[arg(long, default_value_t = 300)]
    dpi: u32,
    /// Space between a main task and its sub-tasks, in hours (MTS only)
    #[arg(long, default_value_t = 0.02)]
    margin: f64,
    /// Size of the batch size labels, in points
    #[arg(long, default_value_t = 7.0)]
    label_size: f64,
    /// Format of the images
    #[arg(long, value_enum, default_value_t = ImageFormat::Png)]
    format: ImageFormat,
    /// Do not save the legend
    #[arg(long, default_value_t = false)]
    no_legend: bool,
    /// Print all the tasks after validation
    #[arg(long, default_value_t = false)]
    debug: bool,
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = Config {
        debug: args.debug,
        plot_legend: !args.no_legend,
        label_size: args.label_size,
        dpi: args.dpi,
        margin: args.margin,
        format: args.format,
        ..Config::new(args.mode, args.path)
    };
    log::debug!("{:?}", config);

    let schedule = GanttChart::new(config)?.run()?;
    log::info!(
        "plotted {} tasks on {} machines",
        schedule.tasks.len(),
        schedule.machines.len()
    );
    Ok(())
}

fn main() {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                err.exit()
            }
            _ => {
                if let Err(print_err) = err.print() {
                    log::error!("cannot print usage: {}", print_err);
                }
                std::process::exit(EXIT_FAILURE);
            }
        },
    };

    if let Err(err) = run(args) {
        log::error!("{:#}", err);
        println!("ERROR! {:#}", err);
        std::process::exit(EXIT_FAILURE);
    }
}
