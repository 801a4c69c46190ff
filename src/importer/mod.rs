// ==========================================
// 地铁列车投运编排系统 - 导入层
// ==========================================
// 职责: 外部编组快照导入 / 示例车队
// 支持: CSV
// ==========================================

pub mod csv_importer;
pub mod error;
pub mod sample_fleet;

// 重导出核心类型
pub use csv_importer::TrainsetCsvImporter;
pub use error::{ImportError, ImportResult};
pub use sample_fleet::{sample_fleet, SAMPLE_FLEET_SIZE};
