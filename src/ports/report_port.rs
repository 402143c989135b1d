//! Signal persistence port.

use std::path::Path;

use crate::domain::error::MacrossError;
use crate::domain::signal_table::SignalTable;

/// Port for writing computed signal tables.
pub trait SignalReportPort {
    fn write_signals(&self, table: &SignalTable, output_path: &Path) -> Result<(), MacrossError>;
}
