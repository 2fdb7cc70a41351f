use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const FIELD_NAMES: [&str; 8] = [
    "nodeId",
    "time",
    "acceleration",
    "speed",
    "distance",
    "cd",
    "battery",
    "energy",
];

#[derive(Debug, Clone, Copy)]
pub struct LogRow {
    pub node_id: usize,
    pub time: u32,
    pub acceleration: f64,
    pub speed: f64,
    pub distance: f64,
    pub cd: f64,
    pub battery: f64,
    pub energy: f64,
}

/// Comma-separated telemetry log with a header row.
pub struct CsvLog {
    writer: BufWriter<File>,
}

impl CsvLog {
    pub fn create(path: &Path) -> std::io::Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{}", FIELD_NAMES.join(","))?;
        Ok(Self { writer })
    }

    pub fn write(&mut self, row: &LogRow) -> std::io::Result<()> {
        writeln!(
            self.writer,
            "{},{},{},{},{},{},{},{}",
            row.node_id,
            row.time,
            row.acceleration,
            row.speed,
            row.distance,
            row.cd,
            row.battery,
            row.energy
        )
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}
