//! Fixed-column text reports in the layout of `whoami.exe`

pub const USER_SECTION: &str = "USER INFORMATION";
pub const GROUP_SECTION: &str = "GROUP INFORMATION";
pub const PRIVILEGE_SECTION: &str = "PRIVILEGES INFORMATION";

pub const USER_HEADERS: [&str; 2] = ["User Name", "SID"];
pub const GROUP_HEADERS: [&str; 4] = ["Group Name", "Type", "SID", "Attributes"];
pub const PRIVILEGE_HEADERS: [&str; 3] = ["Privilege Name", "Description", "State"];

fn width(cell: &str) -> usize {
    cell.chars().count()
}

/// Per-column width: the widest of the header and every cell in that column
pub fn column_widths<S: AsRef<str>>(headers: &[&str], rows: &[Vec<S>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(width(cell.as_ref()));
        }
    }
    widths
}

fn push_row<S: AsRef<str>>(lines: &mut Vec<String>, cells: &[S], widths: &[usize]) {
    let mut line = String::new();
    for (cell, &w) in cells.iter().zip(widths) {
        let cell = cell.as_ref();
        line.push_str(cell);
        line.extend(std::iter::repeat(' ').take(w - width(cell)));
        line.push(' ');
    }
    lines.push(line);
}

/// Render one report section
///
/// ```text
///
/// TITLE
/// -----
///
/// Header  Header
/// ======= ======
/// cell    cell
/// ```
///
/// The section starts with a blank line and has no trailing newline; every
/// line is right-trimmed. Cells past the last header are ignored.
pub fn render_section<S: AsRef<str>>(title: &str, headers: &[&str], rows: &[Vec<S>]) -> String {
    let widths = column_widths(headers, rows);

    let mut lines = vec![
        String::new(),
        title.to_string(),
        "-".repeat(width(title)),
        String::new(),
    ];

    push_row(&mut lines, headers, &widths);
    let dividers: Vec<String> = widths.iter().map(|&w| "=".repeat(w)).collect();
    push_row(&mut lines, &dividers, &widths);
    for row in rows {
        push_row(&mut lines, row, &widths);
    }

    lines
        .iter()
        .map(|line| line.trim_end_matches(' '))
        .collect::<Vec<_>>()
        .join("\n")
}
