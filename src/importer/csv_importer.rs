// ==========================================
// 地铁列车投运编排系统 - 编组快照 CSV 导入
// ==========================================
// 表头: id,name,fitness_status,job_cards_open,branding_hours,
//       mileage_km,cleaning_status,stabling_position[,status]
// 红线: 未知枚举标签直接报错,不做猜测
// ==========================================

use crate::domain::Trainset;
use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// 必填列
const REQUIRED_COLUMNS: [&str; 8] = [
    "id",
    "name",
    "fitness_status",
    "job_cards_open",
    "branding_hours",
    "mileage_km",
    "cleaning_status",
    "stabling_position",
];

// ==========================================
// TrainsetCsvImporter
// ==========================================
pub struct TrainsetCsvImporter;

impl TrainsetCsvImporter {
    pub fn new() -> Self {
        Self
    }

    /// 从文件导入
    pub fn import_file(&self, file_path: &Path) -> ImportResult<Vec<Trainset>> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        if let Some(ext) = file_path.extension() {
            if ext != "csv" {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        let file = File::open(file_path)?;
        let trainsets = self.import_reader(file)?;
        info!(
            path = %file_path.display(),
            count = trainsets.len(),
            "编组快照导入完成"
        );
        Ok(trainsets)
    }

    /// 从任意 reader 导入（行号从 2 起算,第 1 行为表头）
    pub fn import_reader<R: Read>(&self, reader: R) -> ImportResult<Vec<Trainset>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(ImportError::MissingField {
                    row: 1,
                    field: column.to_string(),
                });
            }
        }

        let mut trainsets = Vec::new();
        let mut seen_ids = HashSet::new();
        for (idx, result) in reader.records().enumerate() {
            let row_number = idx + 2;
            let record = result?;

            let row: HashMap<&str, &str> = headers
                .iter()
                .map(String::as_str)
                .zip(record.iter())
                .collect();

            // 跳过完全空白的行
            if row.values().all(|v| v.is_empty()) {
                continue;
            }

            let trainset = Self::map_row(&row, row_number)?;
            if !seen_ids.insert(trainset.id) {
                return Err(ImportError::DuplicateId {
                    row: row_number,
                    id: trainset.id,
                });
            }
            trainsets.push(trainset);
        }

        debug!(count = trainsets.len(), "CSV 行映射完成");
        Ok(trainsets)
    }

    // ==========================================
    // 字段映射
    // ==========================================

    fn map_row(row: &HashMap<&str, &str>, row_number: usize) -> ImportResult<Trainset> {
        let status = match row.get("status").copied() {
            Some(raw) if !raw.is_empty() => Some(parse_field(raw, "status", row_number)?),
            _ => None,
        };

        Ok(Trainset {
            id: parse_required(row, "id", row_number)?,
            name: required(row, "name", row_number)?.to_string(),
            fitness_status: parse_required(row, "fitness_status", row_number)?,
            job_cards_open: parse_required(row, "job_cards_open", row_number)?,
            branding_hours: parse_required(row, "branding_hours", row_number)?,
            mileage_km: parse_required(row, "mileage_km", row_number)?,
            cleaning_status: parse_required(row, "cleaning_status", row_number)?,
            stabling_position: parse_required(row, "stabling_position", row_number)?,
            status,
        })
    }
}

impl Default for TrainsetCsvImporter {
    fn default() -> Self {
        Self::new()
    }
}

fn required<'a>(row: &HashMap<&str, &'a str>, field: &str, row_number: usize) -> ImportResult<&'a str> {
    match row.get(field).copied() {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ImportError::MissingField {
            row: row_number,
            field: field.to_string(),
        }),
    }
}

fn parse_required<T>(row: &HashMap<&str, &str>, field: &str, row_number: usize) -> ImportResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = required(row, field, row_number)?;
    parse_field(raw, field, row_number)
}

fn parse_field<T>(raw: &str, field: &str, row_number: usize) -> ImportResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ImportError::TypeConversionError {
        row: row_number,
        field: field.to_string(),
        message: format!("{} ({})", e, raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{CleaningStatus, FitnessStatus, InductionStatus};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str =
        "id,name,fitness_status,job_cards_open,branding_hours,mileage_km,cleaning_status,stabling_position";

    #[test]
    fn test_import_reader_maps_client_labels() {
        let csv = format!(
            "{}\n1,Rake 01,Valid,0,120.5,75000,Complete,3\n2,Rake 02,Pending,4,80,90000,In Progress,7\n",
            HEADER
        );
        let trainsets = TrainsetCsvImporter::new()
            .import_reader(csv.as_bytes())
            .unwrap();

        assert_eq!(trainsets.len(), 2);
        assert_eq!(trainsets[0].fitness_status, FitnessStatus::Valid);
        assert_eq!(trainsets[1].cleaning_status, CleaningStatus::InProgress);
        assert_eq!(trainsets[1].job_cards_open, 4);
        assert_eq!(trainsets[0].status, None);
    }

    #[test]
    fn test_optional_status_column() {
        let csv = format!(
            "{},status\n1,Rake 01,Valid,0,100,60000,Complete,1,Standby\n2,Rake 02,Valid,0,100,60000,Complete,2,\n",
            HEADER
        );
        let trainsets = TrainsetCsvImporter::new()
            .import_reader(csv.as_bytes())
            .unwrap();

        assert_eq!(trainsets[0].status, Some(InductionStatus::Standby));
        assert_eq!(trainsets[1].status, None);
    }

    #[test]
    fn test_unknown_label_rejected() {
        let csv = format!("{}\n1,Rake 01,Unknown,0,100,60000,Complete,1\n", HEADER);
        let err = TrainsetCsvImporter::new()
            .import_reader(csv.as_bytes())
            .unwrap_err();

        assert!(matches!(
            err,
            ImportError::TypeConversionError { row: 2, ref field, .. } if field == "fitness_status"
        ));
    }

    #[test]
    fn test_missing_column_rejected() {
        let csv = "id,name\n1,Rake 01\n";
        let err = TrainsetCsvImporter::new()
            .import_reader(csv.as_bytes())
            .unwrap_err();
        assert!(matches!(err, ImportError::MissingField { row: 1, .. }));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let csv = format!(
            "{}\n5,Rake 05,Valid,0,100,60000,Complete,1\n5,Rake 05b,Valid,0,100,60000,Complete,2\n",
            HEADER
        );
        let err = TrainsetCsvImporter::new()
            .import_reader(csv.as_bytes())
            .unwrap_err();
        assert!(matches!(err, ImportError::DuplicateId { row: 3, id: 5 }));
    }

    #[test]
    fn test_import_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        writeln!(file, "9,Rake 09,Expired,1,50,110000,Pending,10").unwrap();

        let trainsets = TrainsetCsvImporter::new().import_file(file.path()).unwrap();
        assert_eq!(trainsets.len(), 1);
        assert_eq!(trainsets[0].fitness_status, FitnessStatus::Expired);
    }

    #[test]
    fn test_wrong_extension_rejected() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("xlsx");
        std::fs::write(&path, "").unwrap();

        let err = TrainsetCsvImporter::new().import_file(&path).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(_)));
        std::fs::remove_file(&path).unwrap();
    }
}
