//! Plain-text grid rendering for result sets.
//!
//! Produces a bordered table with a `=` rule under the header. comfy-table
//! measures cells in terminal columns, so CJK text lines up.

use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table, TableComponent};

/// Renders headers and already-stringified rows as a grid.
///
/// Columns whose cells all parse as numbers are right aligned, including the
/// header. The result has no trailing newline.
pub fn render_grid(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut table = Table::new();

    table
        .load_preset(presets::ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Disabled)
        // Cross every rule at every column boundary.
        .set_style(TableComponent::MiddleHeaderIntersections, '+')
        .set_style(TableComponent::LeftBorderIntersections, '+')
        .set_style(TableComponent::RightBorderIntersections, '+');

    table.set_header(headers.iter().map(Cell::new));

    for row in rows {
        table.add_row(
            (0..headers.len())
                .map(|i| Cell::new(row.get(i).map(|v| v.replace('\n', " ")).unwrap_or_default())),
        );
    }

    for i in 0..headers.len() {
        let numeric = !rows.is_empty()
            && rows.iter().all(|row| {
                row.get(i)
                    .is_some_and(|v| v.trim().parse::<f64>().is_ok())
            });
        if let (true, Some(column)) = (numeric, table.column_mut(i)) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_grid_layout() {
        let grid = render_grid(
            &strings(&["id", "name"]),
            &[strings(&["1", "Alice"]), strings(&["20", "Bob"])],
        );

        let expected = "\
+----+-------+
| id | name  |
+====+=======+
|  1 | Alice |
+----+-------+
| 20 | Bob   |
+----+-------+";
        assert_eq!(grid, expected);
    }

    #[test]
    fn test_wide_characters_are_aligned() {
        let grid = render_grid(
            &strings(&["name", "salary"]),
            &[strings(&["张伟", "75000元"])],
        );

        let expected = "\
+------+---------+
| name | salary  |
+======+=========+
| 张伟 | 75000元 |
+------+---------+";
        assert_eq!(grid, expected);
    }

    #[test]
    fn test_numeric_header_is_right_aligned() {
        let grid = render_grid(&strings(&["total"]), &[strings(&["7"])]);
        assert!(grid.contains("| total |"));
        assert!(grid.contains("|     7 |"));
    }

    #[test]
    fn test_mixed_column_stays_left_aligned() {
        let grid = render_grid(&strings(&["code"]), &[strings(&["12"]), strings(&["AB"])]);
        assert!(grid.contains("| 12   |"));
        assert!(grid.contains("| AB   |"));
    }

    #[test]
    fn test_embedded_newlines_are_flattened() {
        let grid = render_grid(&strings(&["note"]), &[strings(&["a\nb"])]);
        assert!(grid.contains("| a b  |"));
    }
}
