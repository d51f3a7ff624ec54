//! Plain-text tables for mail bodies

/// Render a left-aligned table: header, a dashed rule per column and one
/// line per row, columns separated by two spaces.
pub fn simple_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render_line(headers, &widths));
    lines.push(render_line(&rule, &widths));
    for row in rows {
        lines.push(render_line(row, &widths));
    }
    lines.join("\n")
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(index, width)| {
            let cell = cells.get(index).map_or("", String::as_str);
            format!("{cell:<width$}")
        })
        .collect();
    padded.join("  ").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn columns_are_padded_to_the_widest_cell() {
        let table = simple_table(
            &strings(&["Navn", "Email"]),
            &[strings(&["Ada Lovelace", "ada@example.com"]), strings(&["Bo", "bo@x.dk"])],
        );
        let expected = "\
Navn          Email
------------  ---------------
Ada Lovelace  ada@example.com
Bo            bo@x.dk";
        assert_eq!(table, expected);
    }

    #[test]
    fn width_counts_characters_not_bytes() {
        let table = simple_table(&strings(&["By"]), &[strings(&["Århus"])]);
        assert_eq!(table.lines().nth(1), Some("-----"));
    }
}
