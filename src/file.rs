// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::config::options::ExportFormat;
use crate::csv::{parse_rows, write_row};
use crate::error::{CollateError, Result};
use crate::normalize::{NormalizedDataset, NormalizedRow, TOTAL};

const PROBE_FILE: &str = "test.txt";

/// Write a normalized dataset as CSV/TSV: `[axis1, axis2, columns…, Total]`
/// then one line per row. Returns the final path written to.
pub fn export_dataset(data: &NormalizedDataset, path: &Path, format: ExportFormat) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let sep = format.delim();
    let mut out = BufWriter::new(File::create(path)?); // truncate/overwrite

    let mut header = Vec::with_capacity(data.columns.len() + 2);
    header.extend(data.index_names.iter().cloned());
    header.extend(data.columns.iter().cloned());
    write_row(&mut out, &header, sep)?;

    for row in &data.rows {
        let mut line = Vec::with_capacity(row.cells.len() + 2);
        line.push(row.t1.clone());
        line.push(row.t2.clone());
        line.extend(row.cells.iter().map(|v| v.to_string()));
        write_row(&mut out, &line, sep)?;
    }
    out.flush()?;

    logf!(path = %path.display(), rows = data.len(), "dataset written");
    Ok(path.to_path_buf())
}

/// Read back a file written by [`export_dataset`].
pub fn load_dataset(path: &Path, format: ExportFormat) -> Result<NormalizedDataset> {
    let text = fs::read_to_string(path)?;
    parse_dataset(&text, format.delim())
}

pub(crate) fn parse_dataset(text: &str, sep: char) -> Result<NormalizedDataset> {
    let mut lines = parse_rows(text, sep).into_iter();
    let header = lines.next().ok_or_else(|| CollateError::Malformed(s!("empty file")))?;

    if header.len() < 3 || header.last().map(String::as_str) != Some(TOTAL) {
        return Err(CollateError::Malformed(format!("unexpected header: {}", header.join(","))));
    }

    let index_names = [header[0].clone(), header[1].clone()];
    let columns: Vec<String> = header[2..].to_vec();

    let mut rows = Vec::new();
    for (n, line) in lines.enumerate() {
        if line.len() != header.len() {
            return Err(CollateError::Malformed(format!(
                "line {} has {} fields, expected {}",
                n + 2,
                line.len(),
                header.len()
            )));
        }
        let mut it = line.into_iter();
        let t1 = it.next().unwrap_or_default();
        let t2 = it.next().unwrap_or_default();
        let cells = it
            .map(|cell| {
                cell.trim()
                    .parse::<i64>()
                    .map_err(|_| CollateError::Malformed(format!("line {}: {cell:?} is not a count", n + 2)))
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(NormalizedRow { t1, t2, cells });
    }

    Ok(NormalizedDataset { index_names, columns, rows })
}

/// Fail early when nothing can be written to `dir`. A probe file that cannot
/// be removed afterwards is only worth a warning.
pub fn check_writable(dir: &Path) -> Result<()> {
    let not_writable = || CollateError::OutputNotWritable(dir.to_path_buf());

    ensure_directory(dir).map_err(|_| not_writable())?;
    let probe = dir.join(PROBE_FILE);
    fs::write(&probe, b"").map_err(|_| not_writable())?;

    if let Err(e) = fs::remove_file(&probe) {
        logw!(path = %probe.display(), error = %e, "could not remove write probe");
    }
    Ok(())
}

/// Absolute form of a user-supplied output path; a directory hint
/// (trailing separator or an existing directory) gets `default_filename`.
pub fn resolve_out_path(user_o: &Path, default_filename: &str) -> Result<PathBuf> {
    let p = if looks_like_dir_hint(user_o) || user_o.is_dir() {
        user_o.join(default_filename)
    } else {
        user_o.to_path_buf()
    };
    Ok(std::path::absolute(p)?)
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(CollateError::OutputNotWritable(dir.to_path_buf()));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

pub fn looks_like_dir_hint(p: &Path) -> bool {
    let s = p.to_string_lossy();
    s.ends_with('/') || s.ends_with('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NormalizedDataset {
        NormalizedDataset {
            index_names: [s!("Month"), s!("Nationality")],
            columns: vec![s!("Harris"), s!("Miami"), s!(TOTAL)],
            rows: vec![
                NormalizedRow { t1: s!("Jan"), t2: s!("Korea, South"), cells: vec![2, 0, 2] },
                NormalizedRow { t1: s!("Jan"), t2: s!("Mexico"), cells: vec![1234, 5, 1239] },
            ],
        }
    }

    #[test]
    fn export_then_load_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        for format in [ExportFormat::Csv, ExportFormat::Tsv] {
            let path = dir.path().join(join!("data.", format.ext()));
            export_dataset(&sample(), &path, format).unwrap();
            assert_eq!(load_dataset(&path, format).unwrap(), sample());
        }
    }

    #[test]
    fn header_lists_axes_then_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data.csv");
        export_dataset(&sample(), &path, ExportFormat::Csv).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().next(), Some("Month,Nationality,Harris,Miami,Total"));
        assert!(text.contains("Jan,\"Korea, South\",2,0,2"));
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(matches!(parse_dataset("", ','), Err(CollateError::Malformed(_))));
        assert!(matches!(parse_dataset("a,b,c\n", ','), Err(CollateError::Malformed(_))));
        assert!(matches!(parse_dataset("a,b,Total\nx,y\n", ','), Err(CollateError::Malformed(_))));
        assert!(matches!(parse_dataset("a,b,Total\nx,y,many\n", ','), Err(CollateError::Malformed(_))));
    }

    #[test]
    fn probe_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        check_writable(dir.path()).unwrap();
        assert!(!dir.path().join(PROBE_FILE).exists());
    }

    #[test]
    fn file_in_place_of_directory_is_not_writable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();
        assert!(matches!(check_writable(&blocker), Err(CollateError::OutputNotWritable(_))));
    }

    #[test]
    fn dir_hint_gets_default_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let out = resolve_out_path(dir.path(), "dataset.csv").unwrap();
        assert!(out.is_absolute());
        assert!(out.ends_with("dataset.csv"));
    }
}
