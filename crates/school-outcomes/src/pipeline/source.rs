use super::normalizer::normalize_label;
use calamine::{open_workbook_auto, Data, Reader};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to read workbook {path}: {source}")]
    Workbook {
        path: String,
        source: calamine::Error,
    },
    #[error("invalid CSV data in {name}: {source}")]
    Csv { name: String, source: csv::Error },
    #[error("workbook {path} has no sheet named '{sheet}'")]
    MissingSheet { path: String, sheet: String },
    #[error("workbook {path} contains no sheets")]
    EmptyWorkbook { path: String },
    #[error("unsupported file type for {path}; expected .xlsx, .xlsm, .xls, .xlsb, .ods or .csv")]
    UnsupportedFormat { path: String },
    #[error("{name} has no header row after skipping {header_rows} rows")]
    MissingHeader { name: String, header_rows: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    Workbook,
    Csv,
}

impl SourceFormat {
    fn detect(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(Self::Workbook),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// One data row of a source table along with its 1-based position in the file.
#[derive(Debug, Clone)]
pub struct RawRow {
    pub line: usize,
    pub cells: Vec<String>,
}

/// Rectangular string table as read from a spreadsheet or CSV export, with
/// normalized and de-duplicated header names.
#[derive(Debug, Clone)]
pub struct RawTable {
    name: String,
    headers: Vec<String>,
    rows: Vec<RawRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TablePreview {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

impl RawTable {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        sheet: Option<&str>,
        header_rows: usize,
    ) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let path_label = path.display().to_string();

        let table = match SourceFormat::detect(path) {
            Some(SourceFormat::Workbook) => Self::from_workbook(path, sheet, header_rows)?,
            Some(SourceFormat::Csv) => {
                if let Some(sheet) = sheet {
                    debug!(path = %path_label, sheet, "ignoring sheet name for CSV source");
                }
                let file = std::fs::File::open(path).map_err(|source| SourceError::Io {
                    path: path_label.clone(),
                    source,
                })?;
                Self::from_csv_reader(path_label, file, header_rows)?
            }
            None => return Err(SourceError::UnsupportedFormat { path: path_label }),
        };

        info!(
            table = %table.name,
            rows = table.rows.len(),
            columns = table.headers.len(),
            "loaded source table"
        );
        Ok(table)
    }

    pub fn from_csv_reader<R: Read>(
        name: impl Into<String>,
        reader: R,
        header_rows: usize,
    ) -> Result<Self, SourceError> {
        let name = name.into();
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        // The csv reader drops blank lines, so rows are placed by line number.
        let mut grid = Vec::new();
        for record in csv_reader.records() {
            let record = record.map_err(|source| SourceError::Csv {
                name: name.clone(),
                source,
            })?;
            let line = record
                .position()
                .map(|position| position.line() as usize)
                .unwrap_or(grid.len() + 1);
            grid.push((line, record.iter().map(str::to_string).collect::<Vec<_>>()));
        }

        Self::from_grid(name, grid, header_rows, 0)
    }

    fn from_workbook(
        path: &Path,
        sheet: Option<&str>,
        header_rows: usize,
    ) -> Result<Self, SourceError> {
        let path_label = path.display().to_string();
        let mut workbook = open_workbook_auto(path).map_err(|source| SourceError::Workbook {
            path: path_label.clone(),
            source,
        })?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = match sheet {
            Some(requested) => sheet_names
                .iter()
                .find(|name| name.as_str() == requested)
                .cloned()
                .ok_or_else(|| SourceError::MissingSheet {
                    path: path_label.clone(),
                    sheet: requested.to_string(),
                })?,
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| SourceError::EmptyWorkbook {
                    path: path_label.clone(),
                })?,
        };

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|source| SourceError::Workbook {
                path: path_label.clone(),
                source,
            })?;

        // The used range starts at the first non-empty cell, while the header
        // offset counts from the top of the sheet.
        let (start_row, start_col) = range
            .start()
            .map(|(row, col)| (row as usize, col as usize))
            .unwrap_or((0, 0));
        let grid = range
            .rows()
            .enumerate()
            .map(|(index, row)| {
                let cells = row.iter().map(cell_text).collect::<Vec<_>>();
                (start_row + index + 1, cells)
            })
            .collect::<Vec<_>>();

        let name = format!("{path_label}[{sheet_name}]");
        Self::from_grid(name, grid, header_rows, start_col)
    }

    /// Builds a table from `(line, cells)` pairs: lines up to `header_rows`
    /// are preamble, the next one holds the headers.
    fn from_grid<I>(
        name: String,
        grid: I,
        header_rows: usize,
        column_offset: usize,
    ) -> Result<Self, SourceError>
    where
        I: IntoIterator<Item = (usize, Vec<String>)>,
    {
        let mut lines = grid.into_iter().skip_while(|(line, _)| *line <= header_rows);
        let (_, header_cells) = lines.next().ok_or_else(|| SourceError::MissingHeader {
            name: name.clone(),
            header_rows,
        })?;
        let headers = label_headers(header_cells, column_offset);

        let rows = lines
            .filter(|(_, cells)| cells.iter().any(|cell| !cell.trim().is_empty()))
            .map(|(line, cells)| RawRow { line, cells })
            .collect();

        Ok(Self {
            name,
            headers,
            rows,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    /// Position of a column by header name, compared after normalization.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        let wanted = normalize_label(header);
        self.headers.iter().position(|candidate| *candidate == wanted)
    }

    pub fn preview(&self, limit: usize) -> TablePreview {
        TablePreview {
            name: self.name.clone(),
            headers: self.headers.clone(),
            rows: self
                .rows
                .iter()
                .take(limit)
                .map(|row| row.cells.clone())
                .collect(),
            total_rows: self.rows.len(),
        }
    }
}

impl RawRow {
    /// Cell text at `index`; ragged rows read as empty past their last cell.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }
}

fn label_headers(cells: Vec<String>, column_offset: usize) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    cells
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let mut label = normalize_label(&raw);
            if label.is_empty() {
                label = format!("Unnamed:{}", index + column_offset);
            }
            match seen.get_mut(&label) {
                Some(count) => {
                    *count += 1;
                    format!("{label}.{count}")
                }
                None => {
                    seen.insert(label.clone(), 0);
                    label
                }
            }
        })
        .collect()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.clone(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const PREAMBLE: &str = "学校基本調査\n,,\n\n注記\n単位：校\n";

    fn table(body: &str) -> RawTable {
        let csv = format!("{PREAMBLE}{body}");
        RawTable::from_csv_reader("schools.csv", Cursor::new(csv), 5).expect("table parses")
    }

    #[test]
    fn skips_preamble_and_reads_header_row() {
        let table = table("区分,計\n東京都,430\n大阪府,250\n");
        assert_eq!(table.headers(), ["区分", "計"]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[0].cell(0), "東京都");
        assert_eq!(table.rows()[0].line, 7);
    }

    #[test]
    fn names_blank_and_repeated_headers_like_dataframes() {
        let table = table(",区分,計,計\n,北海道,1,2\n");
        assert_eq!(table.headers(), ["Unnamed:0", "区分", "計", "計.1"]);
        assert_eq!(table.column_index("計.1"), Some(3));
        assert_eq!(table.column_index("Unnamed: 0"), Some(0));
    }

    #[test]
    fn drops_blank_rows_and_tolerates_ragged_rows() {
        let table = table("区分,計\n東京都,430\n,\n大阪府\n");
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[1].cell(1), "");
    }

    #[test]
    fn missing_header_row_is_reported() {
        let err = RawTable::from_csv_reader("short.csv", Cursor::new("a\nb\n"), 5)
            .expect_err("header missing");
        assert!(matches!(err, SourceError::MissingHeader { header_rows: 5, .. }));
    }

    #[test]
    fn preview_limits_rows_and_reports_total() {
        let table = table("区分,計\nA,1\nB,2\nC,3\n");
        let preview = table.preview(2);
        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.total_rows, 3);
        assert_eq!(preview.rows[1], vec!["B".to_string(), "2".to_string()]);
    }

    #[test]
    fn rejects_unknown_extensions() {
        let err = RawTable::from_path("data/schools.json", None, 5).expect_err("unsupported");
        assert!(matches!(err, SourceError::UnsupportedFormat { .. }));
    }

    #[test]
    fn missing_csv_file_is_an_io_error() {
        let err = RawTable::from_path("./does-not-exist.csv", None, 5).expect_err("io error");
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[test]
    fn missing_workbook_is_a_workbook_error() {
        let err =
            RawTable::from_path("./does-not-exist.xlsx", Some("国立"), 5).expect_err("no file");
        assert!(matches!(err, SourceError::Workbook { .. }));
    }
}
