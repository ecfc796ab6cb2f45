//! Plain-text rendering of one page, for `--print` and piping.

use tabview_core::fmt::truncate;
use tabview_core::TableViewModel;

/// Widest a printed column may grow.
const MAX_COLUMN_WIDTH: u16 = 40;

/// Renders headers, a rule, the rows and the pager line.
pub fn render_plain<Id>(vm: &TableViewModel<Id>) -> String {
    let widths = vm.column_widths(MAX_COLUMN_WIDTH);
    let mut out = String::new();

    out.push_str(&format!("{}\n", vm.title));
    let headers: Vec<String> = vm
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let indicator = match vm.sort_column {
                Some(col) if col == i => {
                    if vm.sort_ascending {
                        "▲"
                    } else {
                        "▼"
                    }
                }
                _ => "",
            };
            format!("{h}{indicator}")
        })
        .collect();
    out.push_str(&line(&headers, &widths));

    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w as usize)).collect();
    out.push_str(&line(&rule, &widths));

    for row in &vm.rows {
        let cells: Vec<String> = row.cells.iter().map(|c| c.text.clone()).collect();
        out.push_str(&line(&cells, &widths));
    }

    out.push_str(&vm.pager);
    out.push('\n');
    out
}

fn line(cells: &[String], widths: &[u16]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, &w)| {
            let text = truncate(c, w as usize);
            let pad = (w as usize).saturating_sub(text.chars().count());
            format!("{text}{}", " ".repeat(pad))
        })
        .collect();
    format!("{}\n", padded.join(" ").trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabview_core::view::{RowStyleClass, ViewCell, ViewRow};

    fn vm() -> TableViewModel<u32> {
        TableViewModel {
            title: "Interview rounds".to_string(),
            headers: vec!["Round".to_string(), "Panel".to_string()],
            rows: vec![
                ViewRow {
                    id: 1,
                    cells: vec![
                        ViewCell::plain("Technical".to_string()),
                        ViewCell::plain("3".to_string()),
                    ],
                    style: RowStyleClass::Normal,
                },
                ViewRow {
                    id: 2,
                    cells: vec![
                        ViewCell::plain("HR".to_string()),
                        ViewCell::styled("-".to_string(), RowStyleClass::Dimmed),
                    ],
                    style: RowStyleClass::Selected,
                },
            ],
            sort_column: Some(0),
            sort_ascending: false,
            pager: "page 1/1 (2 rows)".to_string(),
        }
    }

    #[test]
    fn plain_table_layout() {
        let out = render_plain(&vm());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Interview rounds");
        assert_eq!(lines[1], "Round▼    Panel");
        assert_eq!(lines[2], "--------- ------");
        assert_eq!(lines[3], "Technical 3");
        assert_eq!(lines[4], "HR        -");
        assert_eq!(lines[5], "page 1/1 (2 rows)");
    }
}
