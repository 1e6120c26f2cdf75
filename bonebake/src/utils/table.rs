//! Table formatting utilities

use prettytable::{Cell, Row, Table};

/// Create a table with bold headers
pub fn create_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_format(*prettytable::format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).style_spec("b"))
        .collect();
    table.set_titles(Row::new(header_cells));

    table
}

/// Add a row to a table
pub fn add_table_row<I>(table: &mut Table, cells: I)
where
    I: IntoIterator<Item = String>,
{
    let row_cells: Vec<Cell> = cells.into_iter().map(|s| Cell::new(&s)).collect();
    table.add_row(Row::new(row_cells));
}

/// Add a row whose first cell is right-aligned, used for index columns
pub fn add_indexed_row<I>(table: &mut Table, index: usize, cells: I)
where
    I: IntoIterator<Item = String>,
{
    let mut row_cells = vec![Cell::new(&index.to_string()).style_spec("r")];
    row_cells.extend(cells.into_iter().map(|s| Cell::new(&s)));
    table.add_row(Row::new(row_cells));
}
