//! CSV export.

use ::csv::Writer;

use super::ExportError;
use super::layout::row_cells;
use crate::reports::ReportDto;

/// Writes a header of column labels and one record per report row.
///
/// Rows from every section are written in display order; amounts are plain
/// decimals and dates use the fixed report format.
pub fn write_csv(report: &ReportDto) -> Result<Vec<u8>, ExportError> {
    let columns = report.columns();
    let mut writer = Writer::from_writer(Vec::new());

    writer.write_record(columns.iter().map(|c| c.label.as_str()))?;
    for row in report.rows() {
        writer.write_record(row_cells(columns, row))?;
    }

    writer.into_inner().map_err(|err| ExportError::Io(err.into_error()))
}
