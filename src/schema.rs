use std::fmt;

pub const TOKEN: usize = 0;
pub const TITLE: usize = 1;
pub const NAME: usize = 2;
pub const SURNAME: usize = 3;
pub const STATUS: usize = 4;
pub const COMMENT: usize = 5;
pub const SUBMITTED_AT: usize = 6;

/// Columns `A` to `Z`; nothing past `Z` is ever addressed.
pub const MAX_COLUMNS: usize = 26;

/// A rectangular block of cells in A1 notation. `row: None` spans whole columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub sheet: String,
    pub first_column: usize,
    pub last_column: usize,
    pub row: Option<usize>,
}

fn check_columns(first_column: usize, last_column: usize) {
    debug_assert!(
        first_column <= last_column && last_column < MAX_COLUMNS,
        "invalid column span {first_column}..={last_column}"
    );
}

impl CellRange {
    pub fn columns(sheet: &str, first_column: usize, last_column: usize) -> Self {
        check_columns(first_column, last_column);
        CellRange {
            sheet: sheet.to_string(),
            first_column,
            last_column,
            row: None,
        }
    }

    /// `row` is 1-based.
    pub fn row(sheet: &str, first_column: usize, last_column: usize, row: usize) -> Self {
        check_columns(first_column, last_column);
        debug_assert!(row >= 1, "spreadsheet rows start at 1");
        CellRange {
            sheet: sheet.to_string(),
            first_column,
            last_column,
            row: Some(row),
        }
    }

    pub fn width(&self) -> usize {
        self.last_column - self.first_column + 1
    }
}

fn column_letter(index: usize) -> char {
    char::from(b'A' + index.min(MAX_COLUMNS - 1) as u8)
}

// Always quoted: bare names like `A1` or `R1C1` would be read as cell references.
fn sheet_reference(sheet: &str) -> String {
    format!("'{}'", sheet.replace('\'', "''"))
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sheet = sheet_reference(&self.sheet);
        let first = column_letter(self.first_column);
        let last = column_letter(self.last_column);
        match self.row {
            Some(row) => write!(f, "{sheet}!{first}{row}:{last}{row}"),
            None => write!(f, "{sheet}!{first}:{last}"),
        }
    }
}

/// The ranges of the guest sheet that the service reads and writes.
#[derive(Debug, Clone)]
pub struct SheetLayout {
    pub sheet: String,
}

impl SheetLayout {
    pub fn new(sheet: &str) -> Self {
        SheetLayout {
            sheet: sheet.to_string(),
        }
    }

    pub fn invitees(&self) -> CellRange {
        CellRange::columns(&self.sheet, TOKEN, SURNAME)
    }

    pub fn tokens(&self) -> CellRange {
        CellRange::columns(&self.sheet, TOKEN, TOKEN)
    }

    /// `row` is 1-based, as in the spreadsheet.
    pub fn response(&self, row: usize) -> CellRange {
        CellRange::row(&self.sheet, STATUS, SUBMITTED_AT, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_column_ranges() {
        let layout = SheetLayout::new("Arkusz1");
        assert_eq!(layout.invitees().to_string(), "'Arkusz1'!A:D");
        assert_eq!(layout.tokens().to_string(), "'Arkusz1'!A:A");
    }

    #[test]
    fn renders_row_ranges() {
        let layout = SheetLayout::new("Goście");
        let range = layout.response(12);
        assert_eq!(range.to_string(), "'Goście'!E12:G12");
        assert_eq!(range.width(), 3);
    }

    #[test]
    fn quotes_sheet_names_with_spaces() {
        let layout = SheetLayout::new("Guest list");
        assert_eq!(layout.tokens().to_string(), "'Guest list'!A:A");
    }

    #[test]
    fn quotes_names_that_look_like_cells() {
        assert_eq!(SheetLayout::new("A1").tokens().to_string(), "'A1'!A:A");
        assert_eq!(SheetLayout::new("R1C1").response(2).to_string(), "'R1C1'!E2:G2");
        assert_eq!(SheetLayout::new("Guest's").tokens().to_string(), "'Guest''s'!A:A");
    }

    #[test]
    fn renders_last_column() {
        assert_eq!(CellRange::columns("s", 0, MAX_COLUMNS - 1).to_string(), "'s'!A:Z");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid column span")]
    fn rejects_reversed_columns() {
        CellRange::columns("Arkusz1", SUBMITTED_AT, STATUS);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid column span")]
    fn rejects_columns_past_z() {
        CellRange::row("Arkusz1", STATUS, MAX_COLUMNS, 1);
    }
}
