use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::{debug, error, info, warn};
use thiserror::Error;

use crate::error::{GraphError, Result};
use crate::graph::{Graph, Weight};

/// Outcome of loading an edge list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

#[derive(Error, Debug)]
enum RowError {
    #[error("missing {0}")]
    MissingField(&'static str),
    #[error("invalid weight {0:?}")]
    InvalidWeight(String),
}

const FIELDS: [&str; 5] = ["source id", "source name", "target id", "target name", "weight"];

/// Extracts `(source name, target name, weight)` from a
/// `sourceId,sourceName,targetId,targetName,weight` row.
fn parse_row(record: &csv::StringRecord) -> std::result::Result<(&str, &str, Weight), RowError> {
    let mut fields = [""; 5];
    for (i, &name) in FIELDS.iter().enumerate() {
        fields[i] = match record.get(i) {
            Some(field) if !field.is_empty() => field,
            _ => return Err(RowError::MissingField(name)),
        };
    }

    let weight = fields[4];
    if !weight.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RowError::InvalidWeight(weight.to_owned()));
    }
    let weight = weight
        .parse()
        .map_err(|_| RowError::InvalidWeight(weight.to_owned()))?;

    Ok((fields[1], fields[3], weight))
}

impl Graph {
    /// Adds every well formed row of the edge list at `path`.
    ///
    /// On open failure the graph is left unchanged.
    pub fn read_csv<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadReport> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| {
            error!("cannot open edge list {}: {source}", path.display());
            GraphError::Open {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let report = self.load_csv(file)?;
        info!(
            "loaded {} roads from {} ({} rows skipped)",
            report.loaded,
            path.display(),
            report.skipped
        );
        Ok(report)
    }

    /// Adds every well formed row of a comma separated edge list.
    ///
    /// The first line is a header. Rows with a missing field or a weight that
    /// isn't a non-negative integer are skipped with a warning.
    pub fn load_csv<R: io::Read>(&mut self, reader: R) -> Result<LoadReport> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut report = LoadReport::default();
        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(err) if err.is_io_error() => return Err(err.into()),
                Err(err) => {
                    warn!("skipping unreadable row: {err}");
                    report.skipped += 1;
                    continue;
                }
            };

            let line = record.position().map_or(0, |p| p.line());
            match parse_row(&record) {
                Ok((source, target, weight)) => {
                    self.add_edge(source, target, weight);
                    report.loaded += 1;
                }
                Err(err) => {
                    let row = record.iter().collect::<Vec<_>>().join(",");
                    warn!("skipping line {line} ({err}): {row}");
                    report.skipped += 1;
                }
            }
        }

        debug!("{} cities, {} roads", self.len(), self.edge_count());
        Ok(report)
    }

    /// Writes `SourceName,TargetName,Weight` rows, one per road.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(["SourceName", "TargetName", "Weight"])?;
        for (source, target, weight) in self.undirected_edges() {
            let weight = weight.to_string();
            writer.write_record([source, target, weight.as_str()])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes the graph in Graphviz DOT format, one labeled edge per road.
    pub fn write_dot<W: Write>(&self, mut writer: W) -> Result<()> {
        fn quoted(name: &str) -> String {
            format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
        }

        writeln!(writer, "graph {{")?;
        for (source, target, weight) in self.undirected_edges() {
            writeln!(
                writer,
                "    {} -- {} [label=\"{weight}\"];",
                quoted(source),
                quoted(target)
            )?;
        }
        writeln!(writer, "}}")?;
        writer.flush()?;
        Ok(())
    }

    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = create_output(path)?;
        self.write_csv(BufWriter::new(file))
            .inspect_err(|err| error!("cannot export {}: {err}", path.display()))?;
        info!("graph exported to {}", path.display());
        Ok(())
    }

    pub fn export_dot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = create_output(path)?;
        self.write_dot(BufWriter::new(file))
            .inspect_err(|err| error!("cannot export {}: {err}", path.display()))?;
        info!("graph exported to {}", path.display());
        Ok(())
    }
}

/// Creates `path` for writing, along with any missing parent directories.
fn create_output(path: &Path) -> Result<File> {
    let fail = |source: io::Error| {
        error!("cannot create {}: {source}", path.display());
        GraphError::Write {
            path: path.to_path_buf(),
            source,
        }
    };

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(fail)?;
    }
    File::create(path).map_err(fail)
}
