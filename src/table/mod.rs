use std::cmp::max;

/// A column-aligned text table used when rendering automata and parse tables. Rows may have
/// different lengths; columns are padded to the widest cell seen.
#[derive(Default, Debug, Clone)]
pub struct Table {
    widths: Vec<usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn push_row(&mut self, row: Vec<String>) {
        if row.len() > self.widths.len() {
            self.widths.resize(row.len(), 0);
        }
        self.widths
            .iter_mut()
            .zip(&row)
            .for_each(|(width, cell)| *width = max(*width, cell.chars().count()));
        self.rows.push(row);
    }

    pub fn render(&self, sep: &str) -> String {
        let pad = |s: &str, width: usize| {
            let len = s.chars().count();
            if len < width {
                format!("{}{}", s, " ".repeat(width - len))
            } else {
                s.to_string()
            }
        };
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&self.widths)
                    .map(|(cell, width)| format!("{}{sep}", pad(cell, *width)))
                    .collect::<Vec<_>>()
                    .join("")
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_aligned() {
        let mut table = Table::default();
        table.push_row(vec!["a".into(), "bbb".into()]);
        table.push_row(vec!["aaa".into(), "b".into()]);
        assert_eq!(table.render(" "), "a   bbb\naaa b");
    }
}
