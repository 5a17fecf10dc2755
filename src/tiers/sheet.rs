//! Where tier-list grids come from: the live gviz endpoint, or a local
//! `.xlsx`/`.csv` export of the same sheet.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader};
use thiserror::Error;

use crate::data::registry::record_dataset;
use crate::data::{read_json_if_exists, write_json, DataError};
use crate::fetch::{FetchError, HttpClient};
use crate::tiers::extract::{extract_tier_map, TierMap};
use crate::tiers::gviz::{parse_gviz_table, table_to_matrix, GvizError, Matrix};

pub const CHAR_TIERS_FILE: &str = "char_tiers.json";

#[derive(Debug, Error)]
pub enum TierSheetError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Gviz(#[from] GvizError),
    #[error("failed to read workbook: {0}")]
    Xlsx(#[from] calamine::Error),
    #[error("workbook has no sheet named '{0}'")]
    SheetNotFound(String),
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Data(#[from] DataError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierSheetSource {
    Gviz {
        base_url: String,
        sheet_id: String,
        sheet_name: String,
    },
    Xlsx {
        path: PathBuf,
        /// First sheet when unset.
        sheet: Option<String>,
    },
    Csv {
        path: PathBuf,
    },
}

impl TierSheetSource {
    /// Provenance string recorded in the registry.
    pub fn describe(&self) -> String {
        match self {
            Self::Gviz {
                sheet_id,
                sheet_name,
                ..
            } => format!("gviz:{sheet_id}/{sheet_name}"),
            Self::Xlsx { path, sheet } => match sheet {
                Some(sheet) => format!("xlsx:{}#{sheet}", path.display()),
                None => format!("xlsx:{}", path.display()),
            },
            Self::Csv { path } => format!("csv:{}", path.display()),
        }
    }

    pub async fn load(&self, client: &HttpClient) -> Result<Matrix, TierSheetError> {
        match self {
            Self::Gviz {
                base_url,
                sheet_id,
                sheet_name,
            } => fetch_tier_sheet(client, base_url, sheet_id, sheet_name).await,
            Self::Xlsx { path, sheet } => matrix_from_xlsx(path, sheet.as_deref()),
            Self::Csv { path } => {
                let file = File::open(path).map_err(|source| TierSheetError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                matrix_from_csv(file)
            }
        }
    }
}

pub fn gviz_url(base_url: &str, sheet_id: &str, sheet_name: &str) -> String {
    format!(
        "{}/{sheet_id}/gviz/tq?tqx=out:json&sheet={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(sheet_name)
    )
}

pub async fn fetch_tier_sheet(
    client: &HttpClient,
    base_url: &str,
    sheet_id: &str,
    sheet_name: &str,
) -> Result<Matrix, TierSheetError> {
    let text = client
        .get_text(&gviz_url(base_url, sheet_id, sheet_name))
        .await?;
    let table = parse_gviz_table(&text)?;
    tracing::info!(
        sheet = sheet_name,
        "fetched tier sheet: {} columns, {} rows",
        table.cols.len(),
        table.rows.len()
    );
    Ok(table_to_matrix(&table))
}

fn xlsx_cell(data: &Data) -> Option<String> {
    match data {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Worksheet grid anchored at A1, so row 0 stays the sheet header even when
/// the used range starts further in.
pub fn matrix_from_xlsx(path: &Path, sheet: Option<&str>) -> Result<Matrix, TierSheetError> {
    let mut workbook = calamine::open_workbook_auto(path)?;
    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| TierSheetError::SheetNotFound("<first>".to_string()))?,
    };
    if !workbook.sheet_names().contains(&sheet_name) {
        return Err(TierSheetError::SheetNotFound(sheet_name));
    }
    let range = workbook.worksheet_range(&sheet_name)?;

    let (top, left) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));
    let mut rows: Vec<Vec<Option<String>>> = vec![Vec::new(); top];
    for row in range.rows() {
        let mut cells = vec![None; left];
        cells.extend(row.iter().map(xlsx_cell));
        rows.push(cells);
    }

    let columns = rows
        .first()
        .map(|header| header.iter().map(|c| c.clone().unwrap_or_default()).collect())
        .unwrap_or_default();
    tracing::info!(sheet = %sheet_name, "read {} rows from {}", rows.len(), path.display());
    Ok(Matrix { columns, rows })
}

/// Headerless, ragged CSV; the first record is kept as the header row.
pub fn matrix_from_csv<R: Read>(reader: R) -> Result<Matrix, TierSheetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| (!field.is_empty()).then(|| field.to_string()))
                .collect::<Vec<_>>(),
        );
    }

    let columns = rows
        .first()
        .map(|header: &Vec<Option<String>>| {
            header.iter().map(|c| c.clone().unwrap_or_default()).collect()
        })
        .unwrap_or_default();
    Ok(Matrix { columns, rows })
}

pub fn load_tier_map(path: impl AsRef<Path>) -> Result<TierMap, DataError> {
    Ok(read_json_if_exists(path.as_ref())?.unwrap_or_default())
}

/// Load the grid from `source`, extract the tier map, and write it plus the
/// registry entry under `data_dir`.
pub async fn generate_char_tiers(
    client: &HttpClient,
    source: &TierSheetSource,
    data_dir: &Path,
) -> Result<TierMap, TierSheetError> {
    let matrix = source.load(client).await?;
    let tiers = extract_tier_map(&matrix.rows);
    tracing::info!("extracted {} character tiers", tiers.len());

    write_json(&data_dir.join(CHAR_TIERS_FILE), &tiers)?;
    record_dataset(
        data_dir.join(crate::data::registry::REGISTRY_FILE),
        "char_tiers",
        &source.describe(),
        CHAR_TIERS_FILE,
    )?;
    Ok(tiers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gviz_url_encodes_sheet_name() {
        assert_eq!(
            gviz_url("https://docs.google.com/spreadsheets/d/", "abc", "The Tier List"),
            "https://docs.google.com/spreadsheets/d/abc/gviz/tq?tqx=out:json&sheet=The%20Tier%20List"
        );
    }

    #[test]
    fn csv_keeps_ragged_rows_and_empty_cells() {
        let csv = "Tier,Vanguard,Guard\nEX,,\n,Ines,Mountain\nS+,Ulpianus\n";
        let matrix = matrix_from_csv(csv.as_bytes()).unwrap();
        assert_eq!(matrix.columns, vec!["Tier", "Vanguard", "Guard"]);
        assert_eq!(matrix.rows.len(), 4);
        assert_eq!(matrix.rows[1], vec![Some("EX".to_string()), None, None]);
        assert_eq!(matrix.rows[3].len(), 2);

        let tiers = extract_tier_map(&matrix.rows);
        assert_eq!(tiers["Ines"], "EX");
        assert_eq!(tiers["Ulpianus"], "S+");
    }

    #[test]
    fn missing_xlsx_is_an_error() {
        let err = matrix_from_xlsx(Path::new("does/not/exist.xlsx"), None).unwrap_err();
        assert!(matches!(err, TierSheetError::Xlsx(_)));
    }

    #[test]
    fn source_description_names_the_origin() {
        let source = TierSheetSource::Xlsx {
            path: PathBuf::from("tiers.xlsx"),
            sheet: Some("The Tier List".into()),
        };
        assert_eq!(source.describe(), "xlsx:tiers.xlsx#The Tier List");
    }
}
