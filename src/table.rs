//! Hand-built table that can be exported as a spreadsheet.

use crate::error::TableError;

/// Sheet name used for Excel export.
pub const SHEET_NAME: &str = "Sheet1";
/// Download name for Excel export.
pub const XLSX_FILE_NAME: &str = "custom_table.xlsx";
/// Download name for CSV export.
pub const CSV_FILE_NAME: &str = "custom_table.csv";

/// Column names plus a grid of free-text cells. Every row has exactly one
/// cell per column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CustomTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Add a column. The name is trimmed; a blank name is ignored. Existing
    /// rows get an empty cell.
    pub fn add_column(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        true
    }

    /// Append an empty row.
    pub fn add_row(&mut self) {
        self.rows.push(vec![String::new(); self.columns.len()]);
    }

    /// Set one cell; out-of-range coordinates are ignored.
    pub fn set_cell(&mut self, row: usize, col: usize, value: &str) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value.to_string();
        }
    }

    /// Header row followed by the data rows.
    pub fn to_grid(&self) -> Result<Vec<Vec<String>>, TableError> {
        if self.columns.is_empty() {
            return Err(TableError::NoColumns);
        }
        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(self.columns.clone());
        grid.extend(self.rows.iter().cloned());
        Ok(grid)
    }

    /// CSV text of [`Self::to_grid`].
    pub fn to_csv(&self) -> Result<String, TableError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in self.to_grid()? {
            writer.write_record(&record)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| TableError::Io(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_column_name_ignored() {
        let mut table = CustomTable::new();
        assert!(!table.add_column("   "));
        assert!(table.columns().is_empty());
        assert!(table.add_column("  age "));
        assert_eq!(table.columns(), ["age"]);
    }

    #[test]
    fn test_new_column_extends_existing_rows() {
        let mut table = CustomTable::new();
        table.add_column("name");
        table.add_row();
        table.add_row();
        table.set_cell(1, 0, "bob");
        table.add_column("age");
        assert!(table.rows().iter().all(|r| r.len() == 2));
        assert_eq!(table.rows()[1], ["bob", ""]);
    }

    #[test]
    fn test_set_cell_out_of_range_is_ignored() {
        let mut table = CustomTable::new();
        table.add_column("a");
        table.add_row();
        table.set_cell(5, 0, "x");
        table.set_cell(0, 3, "x");
        assert_eq!(table.rows()[0], [""]);
    }

    #[test]
    fn test_grid_and_csv_export() {
        let mut table = CustomTable::new();
        table.add_column("name");
        table.add_column("note");
        table.add_row();
        table.set_cell(0, 0, "ada");
        table.set_cell(0, 1, "likes, commas");
        let grid = table.to_grid().unwrap();
        assert_eq!(grid[0], ["name", "note"]);
        assert_eq!(table.to_csv().unwrap(), "name,note\nada,\"likes, commas\"\n");
    }

    #[test]
    fn test_export_without_columns_fails() {
        assert!(matches!(
            CustomTable::new().to_grid(),
            Err(TableError::NoColumns)
        ));
    }
}
