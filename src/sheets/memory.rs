use super::{Rows, SheetStore};
use crate::error::Result;
use crate::schema::CellRange;
use std::sync::Mutex;

/// A single in-process sheet. Reads behave like the Sheets API: trailing
/// empty cells and trailing empty rows are left out.
#[derive(Debug, Default)]
pub struct MemorySheet {
    rows: Mutex<Rows>,
}

impl MemorySheet {
    pub fn new(rows: Rows) -> Self {
        MemorySheet {
            rows: Mutex::new(rows),
        }
    }

    pub fn from_cells(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    /// Copy of the full sheet contents.
    pub fn snapshot(&self) -> Rows {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Rows> {
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn trim_trailing_empty(mut cells: Vec<String>) -> Vec<String> {
    while cells.last().is_some_and(|cell| cell.is_empty()) {
        cells.pop();
    }
    cells
}

#[rocket::async_trait]
impl SheetStore for MemorySheet {
    async fn get_values(&self, range: &CellRange) -> Result<Rows> {
        let rows = self.lock();

        let selected: Box<dyn Iterator<Item = &Vec<String>>> = match range.row {
            Some(row) => Box::new(rows.iter().skip(row.saturating_sub(1)).take(1)),
            None => Box::new(rows.iter()),
        };

        let mut values: Rows = selected
            .map(|row| {
                let cells = row
                    .iter()
                    .skip(range.first_column)
                    .take(range.width())
                    .cloned()
                    .collect();
                trim_trailing_empty(cells)
            })
            .collect();

        while values.last().is_some_and(|row| row.is_empty()) {
            values.pop();
        }
        Ok(values)
    }

    async fn update_values(&self, range: &CellRange, values: Rows) -> Result<()> {
        let mut rows = self.lock();
        let first_row = range.row.unwrap_or(1).max(1) - 1;

        for (offset, new_cells) in values.into_iter().enumerate() {
            let index = first_row + offset;
            if rows.len() <= index {
                rows.resize(index + 1, Vec::new());
            }

            let row = &mut rows[index];
            for (column, value) in (range.first_column..).zip(new_cells.into_iter().take(range.width())) {
                if row.len() <= column {
                    row.resize(column + 1, String::new());
                }
                row[column] = value;
            }
        }
        Ok(())
    }
}
