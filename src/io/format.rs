use std::io::{self, Write};

use ndarray::{ArrayView1, ArrayView2};

fn format_row(row: ArrayView1<'_, f64>) -> String {
    row.iter()
        .map(|x| format!("{x:.4}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// 行列を小数点以下 4 桁のカンマ区切りで書き出す
pub fn write_matrix<W: Write>(out: &mut W, m: ArrayView2<'_, f64>) -> io::Result<()> {
    for row in m.rows() {
        writeln!(out, "{}", format_row(row))?;
    }
    Ok(())
}

pub fn format_matrix(m: ArrayView2<'_, f64>) -> String {
    let mut text = String::new();
    for row in m.rows() {
        text.push_str(&format_row(row));
        text.push('\n');
    }
    text
}
