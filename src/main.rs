// ==========================================
// 地铁列车投运编排系统 - 命令行入口
// ==========================================
// 日志输出到 stderr, 结果输出到 stdout
// ==========================================

use anyhow::Context;
use clap::{Parser, Subcommand};
use metro_induction::app::{get_default_db_path, AppState};
use metro_induction::domain::{InductionStatus, OptimizationRequest};
use metro_induction::logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "metro-induction",
    about = "地铁列车夜间投运编排 (Ready / Standby / Maintenance)",
    version,
    propagate_version = true
)]
struct Cli {
    /// SQLite 数据库路径（默认: $METRO_INDUCTION_DB_PATH 或用户数据目录）
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 写入 25 列示例车队
    Seed,
    /// 从 CSV 导入编组快照
    Import {
        /// CSV 文件路径
        path: PathBuf,
    },
    /// 列出当前编组
    List {
        #[arg(long)]
        json: bool,
    },
    /// 执行投运优化（缺失的目标使用运营策略默认值）
    Optimize {
        #[arg(long)]
        ready: Option<i64>,
        #[arg(long)]
        standby: Option<i64>,
        #[arg(long)]
        maintenance: Option<i64>,
        /// 以 JSON 输出完整结果
        #[arg(long)]
        json: bool,
    },
    /// 最近的优化运行
    Runs {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// 健康检查
    Health,
    /// 查看 / 覆写配置
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// 输出已覆写的配置项（JSON）
    Show,
    /// 覆写单个配置项
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let cli = Cli::parse();
    let db_path = cli.db.unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path).map_err(anyhow::Error::msg)?;
    let api = state.induction_api.clone();

    match cli.command {
        Commands::Seed => {
            let written = api.seed_sample_fleet()?;
            println!("已写入 {} 列示例编组", written);
        }
        Commands::Import { path } => {
            let written = api
                .import_csv(path.clone())
                .with_context(|| format!("导入失败: {}", path.display()))?;
            println!("已导入 {} 列编组", written);
        }
        Commands::List { json } => {
            let trainsets = api.list_trainsets()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&trainsets)?);
            } else {
                println!(
                    "{:>4}  {:<10} {:<8} {:>5} {:<12} {:>9} {:>10} {:>4}  {}",
                    "id", "name", "fitness", "jobs", "cleaning", "brand_h", "mileage", "bay", "status"
                );
                for t in &trainsets {
                    println!(
                        "{:>4}  {:<10} {:<8} {:>5} {:<12} {:>9.1} {:>10.0} {:>4}  {}",
                        t.id,
                        t.name,
                        t.fitness_status.to_string(),
                        t.job_cards_open,
                        t.cleaning_status.to_string(),
                        t.branding_hours,
                        t.mileage_km,
                        t.stabling_position,
                        t.status.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string())
                    );
                }
            }
        }
        Commands::Optimize {
            ready,
            standby,
            maintenance,
            json,
        } => {
            let request = OptimizationRequest {
                target_ready: ready,
                target_standby: standby,
                target_maintenance: maintenance,
            };
            let response = api.optimize(request).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                let summary = &response.result.summary;
                println!("run_id: {}", response.run_id);
                println!(
                    "目标: Ready={} Standby={} Maintenance={}",
                    response.effective_targets.ready,
                    response.effective_targets.standby,
                    response.effective_targets.maintenance
                );
                for status in InductionStatus::ALL {
                    let ids = response.result.ids_with_status(status);
                    println!("{:<12} {:>3}  {:?}", status.to_string(), ids.len(), ids);
                }
                if !summary.shortfall.is_empty() {
                    println!(
                        "缺口: Ready={} Standby={}",
                        summary.shortfall.ready, summary.shortfall.standby
                    );
                }
                println!("optimization_score: {:.2}", response.result.optimization_score);
                println!("完成时间: {}", summary.optimization_timestamp.to_rfc3339());
            }
        }
        Commands::Runs { limit } => {
            for run in api.list_recent_runs(limit)? {
                println!(
                    "{}  {}  R={} S={} M={}  score={:.2}",
                    run.completed_at.to_rfc3339(),
                    run.run_id,
                    run.ready_count,
                    run.standby_count,
                    run.maintenance_count,
                    run.optimization_score
                );
            }
        }
        Commands::Health => {
            println!("{}", serde_json::to_string_pretty(&api.health_check()?)?);
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let snapshot = state
                    .config_manager
                    .get_config_snapshot()
                    .map_err(|e| anyhow::anyhow!("{}", e))?;
                println!("{}", snapshot);
            }
            ConfigAction::Set { key, value } => {
                state
                    .config_manager
                    .set_config_value(&key, &value)
                    .map_err(|e| anyhow::anyhow!("{}", e))?;
                println!("{} = {}", key, value);
            }
        },
    }

    Ok(())
}
