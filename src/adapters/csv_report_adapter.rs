//! CSV writer for signal tables.

use std::path::Path;

use crate::domain::error::MacrossError;
use crate::domain::signal_table::SignalTable;
use crate::ports::report_port::SignalReportPort;

#[derive(Debug, Default)]
pub struct CsvSignalWriter;

fn csv_error(e: csv::Error) -> MacrossError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => MacrossError::Io(io),
        other => MacrossError::Data {
            reason: format!("CSV write error: {:?}", other),
        },
    }
}

impl CsvSignalWriter {
    pub fn write_to<W: std::io::Write>(
        &self,
        table: &SignalTable,
        writer: W,
    ) -> Result<(), MacrossError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(table.column_names()).map_err(csv_error)?;

        for row in &table.rows {
            let mut record = vec![
                row.date.format("%Y-%m-%d").to_string(),
                row.close.to_string(),
                row.percent_change.to_string(),
                row.direction.to_string(),
            ];
            record.extend(row.crossings.iter().map(|c| c.to_string()));
            wtr.write_record(&record).map_err(csv_error)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

impl SignalReportPort for CsvSignalWriter {
    fn write_signals(&self, table: &SignalTable, output_path: &Path) -> Result<(), MacrossError> {
        let file = std::fs::File::create(output_path)?;
        self.write_to(table, file)?;
        tracing::info!(
            rows = table.rows.len(),
            path = %output_path.display(),
            "wrote signal table"
        );
        Ok(())
    }
}
