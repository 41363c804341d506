use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::error::{Result, SymNmfError};
use crate::points::PointSet;

/// 入力ファイルの形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointFormat {
    // カンマ区切り
    Csv,
    // 空白区切り。先頭に `n d` の行があってもよい
    Whitespace,
}

impl PointFormat {
    /// 最初の空でない行にカンマがあれば CSV とみなす
    pub fn detect(text: &str) -> Self {
        match text.lines().find(|line| !line.trim().is_empty()) {
            Some(line) if line.contains(',') => Self::Csv,
            _ => Self::Whitespace,
        }
    }
}

// ファイルから点群を読み込む
//
// # Arguments
// * `path`: 入力ファイル
//
// # Returns
// * 点群。ファイルがない、数値でない、行の長さが揃っていない場合は `InputFormat`
pub fn load_points(path: impl AsRef<Path>) -> Result<PointSet> {
    let path = path.as_ref();
    let name = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|e| SymNmfError::input_format(&name, e))?;
    parse_points(&text, &name)
}

pub fn parse_points(text: &str, source_name: &str) -> Result<PointSet> {
    let format = PointFormat::detect(text);
    let rows = match format {
        PointFormat::Csv => parse_csv(text, source_name)?,
        PointFormat::Whitespace => parse_whitespace(text, source_name)?,
    };
    if rows.is_empty() {
        return Err(SymNmfError::input_format(source_name, "no points found"));
    }

    let points = PointSet::from_rows(rows).map_err(|e| match e {
        SymNmfError::Validation(reason) => SymNmfError::input_format(source_name, reason),
        other => other,
    })?;
    debug!(?format, n = points.n(), d = points.d(), source = source_name, "loaded points");
    Ok(points)
}

fn parse_csv(text: &str, source_name: &str) -> Result<Vec<Vec<f64>>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| SymNmfError::input_format(source_name, e))?;
        let row = record
            .iter()
            .map(|field| parse_value(field, line + 1, source_name))
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }
    Ok(rows)
}

// 空白区切りの入力
//
// 先頭の空でない行がちょうど二つの正の整数なら `n d` のヘッダとみなし、
// 残りの値を行の区切りに関係なく n x d に並べ直す
fn parse_whitespace(text: &str, source_name: &str) -> Result<Vec<Vec<f64>>> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .peekable();

    if let Some((n, d)) = lines.peek().and_then(|(_, line)| parse_header(line)) {
        lines.next();
        let values = lines
            .flat_map(|(i, line)| {
                line.split_whitespace()
                    .map(move |field| parse_value(field, i + 1, source_name))
            })
            .collect::<Result<Vec<f64>>>()?;
        return reshape(values, n, d, source_name);
    }

    lines
        .map(|(i, line)| {
            line.split_whitespace()
                .map(|field| parse_value(field, i + 1, source_name))
                .collect::<Result<Vec<f64>>>()
        })
        .collect()
}

fn parse_header(line: &str) -> Option<(usize, usize)> {
    let mut fields = line.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(n), Some(d), None) => match (n.parse::<usize>().ok()?, d.parse::<usize>().ok()?) {
            (n, d) if n > 0 && d > 0 => Some((n, d)),
            _ => None,
        },
        _ => None,
    }
}

fn reshape(values: Vec<f64>, n: usize, d: usize, source_name: &str) -> Result<Vec<Vec<f64>>> {
    let expected = n
        .checked_mul(d)
        .ok_or_else(|| SymNmfError::input_format(source_name, format!("header {n} {d} is too large")))?;
    if values.len() != expected {
        return Err(SymNmfError::input_format(
            source_name,
            format!("header declares {n} points of dimension {d}, found {} values", values.len()),
        ));
    }
    Ok(values.chunks(d).map(<[f64]>::to_vec).collect())
}

fn parse_value(field: &str, line: usize, source_name: &str) -> Result<f64> {
    field.parse::<f64>().map_err(|e| {
        SymNmfError::input_format(source_name, format!("line {line}: {field:?}: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn detects_format() {
        assert_eq!(PointFormat::detect("\n1.0,2.0\n"), PointFormat::Csv);
        assert_eq!(PointFormat::detect("1.0 2.0\n3 4\n"), PointFormat::Whitespace);
    }

    #[test]
    fn parses_csv() {
        let points = parse_points("0,0\n0, 1\n1,0\n", "inline").unwrap();
        assert_eq!(points.n(), 3);
        assert_eq!(points.d(), 2);
        assert_eq!(points.point(1).to_vec(), vec![0.0, 1.0]);
    }

    #[test]
    fn parses_whitespace_and_skips_blank_lines() {
        let points = parse_points("0.5 1.5 2.5\n\n  3 4 5  \n", "inline").unwrap();
        assert_eq!(points.n(), 2);
        assert_eq!(points.d(), 3);
        assert_eq!(points.point(1).to_vec(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn header_line_declares_shape() {
        let points = parse_points("3 2\n0 0\n0 1\n1 0\n", "inline").unwrap();
        assert_eq!(points.n(), 3);
        assert_eq!(points.d(), 2);
        assert_eq!(points.point(0).to_vec(), vec![0.0, 0.0]);
        assert_eq!(points.point(2).to_vec(), vec![1.0, 0.0]);
    }

    #[test]
    fn header_values_may_span_lines() {
        let points = parse_points("3 2\n0 0 0 1 1 0\n", "inline").unwrap();
        assert_eq!(points.n(), 3);
        assert_eq!(points.point(1).to_vec(), vec![0.0, 1.0]);

        let points = parse_points("2 3\n1.5\n2.5 3.5\n4 5\n6\n", "inline").unwrap();
        assert_eq!(points.point(0).to_vec(), vec![1.5, 2.5, 3.5]);
        assert_eq!(points.point(1).to_vec(), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn header_count_mismatch_is_rejected() {
        let err = parse_points("3 2\n0 0\n0 1\n", "inline").unwrap_err();
        assert!(matches!(err, SymNmfError::InputFormat { .. }));
        assert!(err.to_string().contains("found 4 values"));
        assert!(parse_points("2 2\n1 2 3\n", "inline").is_err());
    }

    #[test]
    fn headerless_rows_are_points() {
        // 先頭行が整数二つでなければヘッダではない
        let points = parse_points("0.5 2\n1 1\n", "inline").unwrap();
        assert_eq!(points.n(), 2);
        assert_eq!(points.point(0).to_vec(), vec![0.5, 2.0]);

        let points = parse_points("3 2 1\n0 0 0\n", "inline").unwrap();
        assert_eq!(points.n(), 2);
        assert_eq!(points.d(), 3);

        // 0 を含む整数二つは点として読む
        let points = parse_points("0 0\n0 1\n1 0\n", "inline").unwrap();
        assert_eq!(points.n(), 3);
        assert_eq!(points.point(0).to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn header_and_csv_give_the_same_points() {
        let with_header = parse_points("3 2\n0 0\n0 1\n1 0\n", "inline").unwrap();
        let csv = parse_points("0,0\n0,1\n1,0\n", "inline").unwrap();
        assert_eq!(with_header, csv);
    }

    #[test]
    fn ragged_csv_is_rejected() {
        let err = parse_points("1,2\n3\n", "inline").unwrap_err();
        assert!(matches!(err, SymNmfError::InputFormat { .. }));
    }

    #[test]
    fn ragged_whitespace_is_rejected() {
        let err = parse_points("1 2\n3\n", "inline").unwrap_err();
        assert!(matches!(err, SymNmfError::InputFormat { .. }));
    }

    #[test]
    fn non_numeric_is_rejected() {
        let err = parse_points("1,2\n3,abc\n", "inline").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(parse_points("\n \n", "inline").is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0.0,0.0").unwrap();
        writeln!(file, "1.0,1.0").unwrap();
        let points = load_points(file.path()).unwrap();
        assert_eq!(points.n(), 2);
    }

    #[test]
    fn missing_file_is_input_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_points(dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, SymNmfError::InputFormat { .. }));
    }
}
