//! Fixed-width ASCII tables for console output.

/// Render a titled fixed-width table.
///
/// The first column is left-aligned, every other column right-aligned;
/// widths fit the widest cell. Rows are printed as given; callers append
/// any Total row themselves.
pub fn render_table(title: &str, header: &[String], rows: &[Vec<String>]) -> String {
    let columns = header.len();
    let mut widths: Vec<usize> = header.iter().map(String::len).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate().take(columns) {
            widths[index] = widths[index].max(cell.len());
        }
    }
    let ruler_len = widths.iter().sum::<usize>() + 2 * columns.saturating_sub(1);

    let mut output = String::new();
    output.push_str(title);
    output.push('\n');
    output.push_str(&"=".repeat(ruler_len));
    output.push('\n');
    output.push_str(&format_row(header, &widths));
    output.push_str(&"-".repeat(ruler_len));
    output.push('\n');
    for row in rows {
        output.push_str(&format_row(row, &widths));
    }
    output.push_str(&"=".repeat(ruler_len));
    output.push('\n');
    output
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (index, (cell, width)) in cells.iter().zip(widths.iter().copied()).enumerate() {
        if index > 0 {
            line.push_str("  ");
        }
        if index == 0 {
            line.push_str(&format!("{:<width$}", cell, width = width));
        } else {
            line.push_str(&format!("{:>width$}", cell, width = width));
        }
    }
    line.push('\n');
    line
}
