/// Horizontal alignment of a column's cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Align {
    Left,
    Right,
}

/// Plain-text table for terminal output.
///
/// The first column (labels) is left-aligned and the rest right-aligned,
/// so numeric columns line up on their last digit.
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    widths: Vec<usize>,
}

impl Table {
    pub fn new(headers: Vec<&str>) -> Self {
        Table {
            widths: headers.iter().map(|h| h.chars().count()).collect(),
            headers: headers.into_iter().map(String::from).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; cells beyond the header count are ignored
    pub fn add_row(&mut self, row: Vec<String>) {
        for (width, cell) in self.widths.iter_mut().zip(&row) {
            *width = (*width).max(cell.chars().count());
        }
        self.rows.push(row);
    }

    fn align(column: usize) -> Align {
        if column == 0 {
            Align::Left
        } else {
            Align::Right
        }
    }

    pub fn render(&self) -> String {
        let separator = self
            .widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-");

        std::iter::once(self.format_line(&self.headers))
            .chain(std::iter::once(separator))
            .chain(self.rows.iter().map(|row| self.format_line(row)))
            .map(|line| line + "\n")
            .collect()
    }

    fn format_line(&self, cells: &[String]) -> String {
        self.widths
            .iter()
            .zip(cells)
            .enumerate()
            .map(|(column, (&width, cell))| match Self::align(column) {
                Align::Left => format!("{:<width$}", cell),
                Align::Right => format!("{:>width$}", cell),
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }
}
