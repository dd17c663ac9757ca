//! Per-tick metrics output in table or JSON-lines form.

use std::io::{self, Write};

use clap::ValueEnum;
use predation_core::PopulationSample;
use predation_simulation::Vitals;
use serde::Serialize;

const TICK_LABEL: &str = "Tick";
const VITALS_LABELS: [&str; 2] = ["Births", "Deaths"];
const MIN_COLUMN_WIDTH: usize = 6;

/// Shape of the rows written to stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Aligned columns with a header line.
    Table,
    /// One JSON object per line.
    Json,
}

/// One JSON line; field names match the published metric names.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct MetricsRow {
    tick: u64,
    predators: usize,
    apex_predators: usize,
    mutated_predators: usize,
    herbivores: usize,
    grass: usize,
    tree: usize,
    births: usize,
    deaths: usize,
}

impl MetricsRow {
    fn new(sample: &PopulationSample, vitals: &Vitals) -> Self {
        Self {
            tick: sample.tick,
            predators: sample.predators,
            apex_predators: sample.apex_predators,
            mutated_predators: sample.mutated_predators,
            herbivores: sample.herbivores,
            grass: sample.grass,
            tree: sample.tree,
            births: vitals.total_births(),
            deaths: vitals.deaths(),
        }
    }
}

/// Writes metric rows in the selected format.
#[derive(Debug)]
pub(crate) struct Report<W> {
    format: OutputFormat,
    out: W,
}

impl<W: Write> Report<W> {
    pub(crate) fn new(format: OutputFormat, out: W) -> Self {
        Self { format, out }
    }

    /// Column headings for table output; JSON lines carry their own keys.
    pub(crate) fn write_header(&mut self) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return Ok(());
        }

        write!(self.out, "{TICK_LABEL:>width$}", width = MIN_COLUMN_WIDTH)?;
        for (label, _) in PopulationSample::default().metrics() {
            write!(self.out, " {label:>width$}", width = column_width(label))?;
        }
        for label in VITALS_LABELS {
            write!(self.out, " {label:>width$}", width = column_width(label))?;
        }
        writeln!(self.out)
    }

    pub(crate) fn write_row(&mut self, sample: &PopulationSample, vitals: &Vitals) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, &MetricsRow::new(sample, vitals))?;
                writeln!(self.out)
            }
            OutputFormat::Table => {
                write!(self.out, "{:>width$}", sample.tick, width = MIN_COLUMN_WIDTH)?;
                for (label, value) in sample.metrics() {
                    write!(self.out, " {value:>width$}", width = column_width(label))?;
                }
                let [births, deaths] = VITALS_LABELS;
                write!(
                    self.out,
                    " {:>width$}",
                    vitals.total_births(),
                    width = column_width(births)
                )?;
                writeln!(
                    self.out,
                    " {:>width$}",
                    vitals.deaths(),
                    width = column_width(deaths)
                )
            }
        }
    }

    pub(crate) fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

fn column_width(label: &str) -> usize {
    label.len().max(MIN_COLUMN_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::{OutputFormat, Report};
    use predation_core::PopulationSample;
    use predation_simulation::Vitals;

    fn sample() -> PopulationSample {
        PopulationSample {
            tick: 3,
            herbivores: 41,
            predators: 12,
            mutated_predators: 1,
            apex_predators: 4,
            grass: 180,
            tree: 95,
        }
    }

    fn render(format: OutputFormat) -> String {
        let mut report = Report::new(format, Vec::new());
        report.write_header().expect("header");
        report
            .write_row(&sample(), &Vitals::default())
            .expect("row");
        report.finish().expect("flush");
        String::from_utf8(report.out).expect("utf-8 output")
    }

    #[test]
    fn table_columns_line_up_with_the_header() {
        let output = render(OutputFormat::Table);
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), lines[1].len());
        assert_eq!(
            lines[0].split_whitespace().collect::<Vec<_>>(),
            vec![
                "Tick",
                "Predators",
                "ApexPredators",
                "MutatedPredators",
                "Herbivores",
                "Grass",
                "Tree",
                "Births",
                "Deaths",
            ]
        );
        assert_eq!(
            lines[1].split_whitespace().collect::<Vec<_>>(),
            vec!["3", "12", "4", "1", "41", "180", "95", "0", "0"]
        );
    }

    #[test]
    fn json_rows_use_metric_names() {
        let output = render(OutputFormat::Json);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 1, "json output has no header line");

        let row: serde_json::Value = serde_json::from_str(lines[0]).expect("valid json");
        assert_eq!(row["Tick"], 3);
        assert_eq!(row["Herbivores"], 41);
        assert_eq!(row["ApexPredators"], 4);
        assert_eq!(row["MutatedPredators"], 1);
        assert_eq!(row["Grass"], 180);
        assert_eq!(row["Deaths"], 0);
    }
}
