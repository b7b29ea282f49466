use anyhow::{bail, Result};
use clap::Args;
use serde_json::Value;
use textplots::{Chart, Plot, Shape};

use crate::config::ClientConfig;
use crate::export::format_cell;
use crate::labels::LabelFormatter;
use crate::pivot::PivotTable;
use crate::query::QueryInput;

#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    #[command(flatten)]
    pub input: QueryInput,

    /// Column to plot, by identifier or display label; defaults to the last numeric column
    #[arg(short, long)]
    pub measure: Option<String>,

    /// Chart width in characters
    #[arg(long, default_value_t = 120)]
    pub width: u32,

    /// Chart height in characters
    #[arg(long, default_value_t = 30)]
    pub height: u32,
}

pub async fn run(args: ChartArgs, config: &ClientConfig, formatter: &LabelFormatter) -> Result<()> {
    let response = args.input.execute(config).await?;
    let table = PivotTable::from_result(&response.resultado);

    if table.is_empty() {
        bail!("the query returned no rows to chart");
    }

    let column = match &args.measure {
        Some(measure) => {
            let Some(column) = table.column_index(measure, formatter) else {
                bail!("no column matches {measure:?}");
            };
            column
        }
        None => {
            let Some(column) = last_numeric_column(&table) else {
                bail!("the result has no numeric column; pass --measure");
            };
            column
        }
    };

    let points = measure_points(&table, column);
    if points.is_empty() {
        bail!(
            "column {} holds no numeric values",
            formatter.format(&table.headers[column])
        );
    }

    render_chart(&table, column, &points, formatter, args.width, args.height);
    Ok(())
}

/// `(row index, value)` for every row whose cell in `column` is numeric.
pub fn measure_points(table: &PivotTable, column: usize) -> Vec<(f32, f32)> {
    table
        .body
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let value = row.get(column)?.as_f64()?;
            Some((index as f32, value as f32))
        })
        .collect()
}

pub fn last_numeric_column(table: &PivotTable) -> Option<usize> {
    (0..table.headers.len()).rev().find(|&column| {
        table
            .body
            .iter()
            .any(|row| matches!(row.get(column), Some(Value::Number(_))))
    })
}

fn render_chart(
    table: &PivotTable,
    column: usize,
    points: &[(f32, f32)],
    formatter: &LabelFormatter,
    width: u32,
    height: u32,
) {
    println!(
        "{} across {} rows",
        formatter.format(&table.headers[column]),
        points.len()
    );

    let max_x = points.last().map(|(x, _)| *x + 1.0).unwrap_or(1.0);
    Chart::new(width.max(40), height.max(10), -0.5, max_x)
        .lineplot(&Shape::Bars(points))
        .display();

    for (x, _) in points {
        let row = &table.body[*x as usize];
        let label = row
            .first()
            .map(format_cell)
            .unwrap_or_default();
        println!("{:>4} {label}", *x as usize);
    }
    println!();
}
