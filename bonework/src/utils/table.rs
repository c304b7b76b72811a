//! Table output for skeleton and pose reports

use prettytable::format::consts::FORMAT_NO_LINESEP_WITH_TITLE;
use prettytable::{Cell, Row, Table};

/// Start a report table with bold column titles
pub fn create_table(titles: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_format(*FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(titles.iter().map(|t| Cell::new(t).style_spec("b")).collect());
    table
}

/// Append one row of already formatted cells
pub fn add_table_row(table: &mut Table, cells: Vec<String>) {
    table.add_row(cells.iter().map(|c| Cell::new(c)).collect::<Row>());
}

/// Cell text for a boolean column
pub fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_rows_follow_titles() {
        let mut table = create_table(&["Name", "Loop"]);
        add_table_row(&mut table, vec!["Walk".to_string(), yes_no(true)]);
        add_table_row(&mut table, vec!["Die".to_string(), yes_no(false)]);

        assert_eq!(table.len(), 2);
        let text = table.to_string();
        assert!(text.contains("Walk"));
        assert!(text.contains("no"));
    }
}
