// SPDX-FileCopyrightText: © 2024 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};

use crate::gantt::{Config, Mode, Schedule};
use crate::output::{ImageFormat, OutputPaths};
use crate::task::{distinct_slots, makespan, on_machine, Task};

/// Pastel2 qualitative palette.
const PASTEL2: [RGBColor; 8] = [
    RGBColor(179, 226, 205),
    RGBColor(253, 205, 172),
    RGBColor(203, 213, 232),
    RGBColor(244, 202, 228),
    RGBColor(230, 245, 201),
    RGBColor(255, 242, 174),
    RGBColor(241, 226, 204),
    RGBColor(204, 204, 204),
];
const FRAME_COLOR: RGBColor = RGBColor(128, 128, 128);

/// Figure sizes, in inches.
const CHART_SIZE: (f64, f64) = (10.0, 5.0);
const LEGEND_SIZE: (f64, f64) = (5.0, 5.0);

/// Bar heights, in rows.
const BAR_HEIGHT: f64 = 0.8;
const INNER_BAR_HEIGHT: f64 = 0.65;
/// Space above the first and below the last row.
const ROW_PADDING: f64 = 0.7;

/// Font size of titles, ticks, and legend entries, in points.
const FONT_SIZE: f64 = 10.0;

/// Upper bound on the number of ticks on the time axis.
const MAX_TIME_TICKS: usize = 100;

/// Color assigned to the `index`-th of `num` keys, sampling the palette evenly.
pub fn palette_color(index: usize, num: usize) -> RGBColor {
    let x = if num > 1 {
        index as f64 / (num - 1) as f64
    } else {
        0.0
    };
    let i = ((x * PASTEL2.len() as f64) as usize).min(PASTEL2.len() - 1);
    PASTEL2[i]
}

/// Number of ticks on the time axis, one per hour up to `MAX_TIME_TICKS`.
fn time_ticks(x_max: f64) -> usize {
    (x_max.max(0.0).min(MAX_TIME_TICKS as f64) as usize).saturating_add(1)
}

/// Batch size as shown on a bar, always with a decimal part (e.g., 32.0).
fn batch_label(batch_size: f64) -> String {
    format!("{:?}", batch_size)
}

fn key_color(keys: &[String], key: &str) -> RGBColor {
    palette_color(keys.iter().position(|k| k == key).unwrap_or(0), keys.len())
}

fn pixels(size: (f64, f64), dpi: u32) -> (u32, u32) {
    (
        (size.0 * dpi as f64).round() as u32,
        (size.1 * dpi as f64).round() as u32,
    )
}

fn font(points: f64, dpi: u32) -> FontDesc<'static> {
    FontDesc::new(
        FontFamily::SansSerif,
        points * dpi as f64 / 72.0,
        FontStyle::Normal,
    )
}

/// Save the Gantt chart: one row per machine, time on the x axis.
pub fn draw_chart(
    schedule: &Schedule,
    config: &Config,
    paths: &OutputPaths,
) -> anyhow::Result<()> {
    let size = pixels(CHART_SIZE, config.dpi);
    match config.format {
        ImageFormat::Png => plot_chart(
            BitMapBackend::new(&paths.chart, size).into_drawing_area(),
            schedule,
            config,
            &paths.basename,
        ),
        ImageFormat::Svg => plot_chart(
            SVGBackend::new(&paths.chart, size).into_drawing_area(),
            schedule,
            config,
            &paths.basename,
        ),
    }
}

/// Save the legend mapping colors to operations (SCH) or orders (MTS).
pub fn draw_legend(
    schedule: &Schedule,
    config: &Config,
    paths: &OutputPaths,
) -> anyhow::Result<()> {
    let size = pixels(LEGEND_SIZE, config.dpi);
    match config.format {
        ImageFormat::Png => plot_legend(
            BitMapBackend::new(&paths.legend, size).into_drawing_area(),
            schedule.color_keys(),
            config,
        ),
        ImageFormat::Svg => plot_legend(
            SVGBackend::new(&paths.legend, size).into_drawing_area(),
            schedule.color_keys(),
            config,
        ),
    }
}

fn plot_chart<DB>(
    root: DrawingArea<DB, Shift>,
    schedule: &Schedule,
    config: &Config,
    title: &str,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let num_rows = schedule.machines.len();
    let x_max = makespan(&schedule.tasks).ceil().max(1.0);
    let y_range = -ROW_PADDING..(num_rows as f64 - 1.0 + ROW_PADDING);
    let text = font(FONT_SIZE, config.dpi);
    let text_px = FONT_SIZE * config.dpi as f64 / 72.0;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, font(FONT_SIZE * 1.2, config.dpi))
        .margin(text_px as u32)
        .set_label_area_size(LabelAreaPosition::Left, (text_px * 4.0) as u32)
        .set_label_area_size(LabelAreaPosition::Bottom, (text_px * 3.0) as u32)
        .build_cartesian_2d(0.0..x_max, y_range)?;

    // label only the integer ticks, which are the row centers
    let machines = &schedule.machines;
    let row_label = |y: &f64| {
        let row = y.round();
        if (y - row).abs() < 1e-6 && row >= 0.0 && (row as usize) < machines.len() {
            machines[row as usize].clone()
        } else {
            String::new()
        }
    };

    chart
        .configure_mesh()
        .disable_y_mesh()
        .light_line_style(TRANSPARENT)
        .bold_line_style(BLACK.mix(0.25))
        .x_labels(time_ticks(x_max))
        .x_label_formatter(&|x| format!("{:.0}", x))
        .y_labels(2 * num_rows + 2)
        .y_label_formatter(&row_label)
        .x_desc("Time (Hours)")
        .label_style(text.clone())
        .axis_desc_style(text)
        .draw()?;

    let label_style = TextStyle::from(font(config.label_size, config.dpi))
        .pos(Pos::new(HPos::Center, VPos::Center));

    for (row, machine) in schedule.machines.iter().enumerate() {
        let y = row as f64;
        let compatible_tasks = on_machine(&schedule.tasks, machine).collect::<Vec<&Task>>();
        for slot in distinct_slots(compatible_tasks.iter().copied()) {
            let task = match compatible_tasks.iter().rev().find(|t| t.slot() == slot) {
                Some(task) => *task,
                None => continue,
            };
            let mut bars = vec![];
            let mut labels = vec![];

            match schedule.mode {
                Mode::Sch => {
                    bars.push(Rectangle::new(
                        [
                            (slot.begin, y - BAR_HEIGHT / 2.0),
                            (slot.end, y + BAR_HEIGHT / 2.0),
                        ],
                        key_color(&schedule.operations, &task.operation).filled(),
                    ));
                    labels.push(((slot.begin + slot.end) / 2.0, task.batch_size));
                }
                Mode::Mts => {
                    bars.push(Rectangle::new(
                        [
                            (slot.begin, y - BAR_HEIGHT / 2.0),
                            (slot.end, y + BAR_HEIGHT / 2.0),
                        ],
                        FRAME_COLOR.mix(0.7).filled(),
                    ));
                    let duration = slot.end - slot.begin;
                    if task.subtasks.is_empty() {
                        bars.push(Rectangle::new(
                            [
                                (slot.begin + config.margin, y - INNER_BAR_HEIGHT / 2.0),
                                (slot.end - config.margin, y + INNER_BAR_HEIGHT / 2.0),
                            ],
                            key_color(&schedule.orders, &task.order).filled(),
                        ));
                        labels.push(((slot.begin + slot.end) / 2.0, task.batch_size));
                    } else {
                        // stack the sub-tasks proportionally to their batch size
                        let num_subtasks = task.subtasks.len() as f64;
                        let mut left = slot.begin + config.margin;
                        for sub in &task.subtasks {
                            let share = if task.batch_size > 0.0 {
                                sub.batch_size / task.batch_size
                            } else {
                                1.0 / num_subtasks
                            };
                            let width = share * duration - 2.0 * config.margin / num_subtasks;
                            bars.push(Rectangle::new(
                                [
                                    (left, y - INNER_BAR_HEIGHT / 2.0),
                                    (left + width, y + INNER_BAR_HEIGHT / 2.0),
                                ],
                                key_color(&schedule.orders, &sub.order).filled(),
                            ));
                            labels.push((left + width / 2.0, sub.batch_size));
                            left += width;
                        }
                    }
                }
            }

            chart.draw_series(bars)?;
            chart.draw_series(labels.into_iter().map(|(x, batch_size)| {
                Text::new(batch_label(batch_size), (x, y), label_style.clone())
            }))?;
        }
    }

    root.present()?;
    Ok(())
}

fn plot_legend<DB>(
    root: DrawingArea<DB, Shift>,
    keys: &[String],
    config: &Config,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let text_px = (FONT_SIZE * config.dpi as f64 / 72.0).round() as i32;
    let line_height = 2 * text_px;
    let patch_width = 2 * text_px;
    let width = keys
        .iter()
        .map(|k| k.chars().count() as i32)
        .max()
        .unwrap_or(0)
        * text_px
        + 2 * patch_width;
    let origin = (text_px, text_px);

    root.draw(&Rectangle::new(
        [
            origin,
            (
                origin.0 + width,
                origin.1 + line_height * keys.len() as i32 + text_px,
            ),
        ],
        BLACK.mix(0.3).stroke_width(1),
    ))?;

    let label_style =
        TextStyle::from(font(FONT_SIZE, config.dpi)).pos(Pos::new(HPos::Left, VPos::Center));
    for (i, key) in keys.iter().enumerate() {
        let y = origin.1 + text_px + line_height * i as i32;
        root.draw(&Rectangle::new(
            [
                (origin.0 + text_px / 2, y),
                (origin.0 + text_px / 2 + patch_width, y + text_px),
            ],
            palette_color(i, keys.len()).filled(),
        ))?;
        root.draw(&Text::new(
            key.clone(),
            (origin.0 + text_px + patch_width, y + text_px / 2),
            label_style.clone(),
        ))?;
    }

    root.present()?;
    Ok(())
}
