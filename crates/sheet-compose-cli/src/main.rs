mod logger;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use logger::CliLogger;
use sheet_compose::{
    ComposeMode, ComposeOptions, ComposeRequest, ElementId, HostDocument, ManualOverride,
    PlacementOutcome, SheetStatus,
};
use std::path::PathBuf;

const MAX_LOG_ENTRIES: usize = 500;

#[derive(Parser)]
#[command(name = "shc", about = "Compose drawing views onto sheets", version)]
struct Cli {
    /// Show debug output (placement positions, crop rescaling)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the views that can be selected for composition
    Views {
        /// Project file (JSON document)
        #[arg(short, long)]
        project: PathBuf,
    },

    /// Place views onto new sheets
    Compose {
        /// Project file (JSON document)
        #[arg(short, long)]
        project: PathBuf,

        /// View id(s) to place, in order
        #[arg(long = "view", required = true, num_args = 1..)]
        views: Vec<u64>,

        /// Composition mode
        #[arg(long, default_value = "grid", value_enum)]
        mode: ModeArg,

        /// Options file (JSON), defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Grid columns
        #[arg(long)]
        columns: Option<usize>,

        /// Explicit position as ID:X:Y[:SCALE], millimeters from the top-left corner
        #[arg(long = "override", value_parser = parse_override)]
        overrides: Vec<ManualOverride>,

        /// Where to write the composed project
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show statistics only, don't change the document
        #[arg(long)]
        stats_only: bool,
    },

    /// Write the default options to a file
    InitConfig {
        /// Options file to create
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Grid,
    PerView,
    Paginated,
}

impl From<ModeArg> for ComposeMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Grid => Self::SingleSheetGrid,
            ModeArg::PerView => Self::SheetPerView,
            ModeArg::Paginated => Self::PaginatedGrid,
        }
    }
}

fn parse_override(value: &str) -> Result<ManualOverride, String> {
    let parts: Vec<&str> = value.split(':').collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(format!("expected ID:X:Y[:SCALE], got '{}'", value));
    }

    let view = parts[0]
        .parse::<u64>()
        .map_err(|e| format!("invalid view id '{}': {}", parts[0], e))?;
    let center_x_mm = parts[1]
        .parse::<f64>()
        .map_err(|e| format!("invalid x '{}': {}", parts[1], e))?;
    let center_y_mm = parts[2]
        .parse::<f64>()
        .map_err(|e| format!("invalid y '{}': {}", parts[2], e))?;
    let scale = match parts.get(3) {
        Some(s) => Some(
            s.parse::<u32>()
                .map_err(|e| format!("invalid scale '{}': {}", s, e))?,
        ),
        None => None,
    };

    Ok(ManualOverride {
        view: ElementId(view),
        center_x_mm,
        center_y_mm,
        scale,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let logger = CliLogger::new(MAX_LOG_ENTRIES, level);
    logger.clone().init()?;

    match cli.command {
        Commands::Views { project } => {
            let doc = sheet_compose::load_project(&project)
                .await
                .with_context(|| format!("Failed to load {}", project.display()))?;

            let views = sheet_compose::selectable_views(&doc);
            if views.is_empty() {
                println!("No selectable views in {}", project.display());
            }
            for view in views {
                let hosted = doc
                    .sheet_hosting_view(view.id)
                    .and_then(|sheet| doc.sheet(sheet))
                    .map(|sheet| format!("on {}", sheet.number))
                    .unwrap_or_default();
                println!(
                    "{:>6}  {:<16}  1:{:<5} {} {}",
                    view.id.0,
                    view.kind.label(),
                    view.scale,
                    view.name,
                    hosted
                );
            }
        }

        Commands::Compose {
            project,
            views,
            mode,
            config,
            columns,
            overrides,
            output,
            stats_only,
        } => {
            let mut options = match &config {
                Some(path) => ComposeOptions::load(path)
                    .await
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => ComposeOptions::default(),
            };
            if let Some(columns) = columns {
                options.columns = columns;
            }

            let doc = sheet_compose::load_project(&project)
                .await
                .with_context(|| format!("Failed to load {}", project.display()))?;

            let request = ComposeRequest {
                views: views.into_iter().map(ElementId).collect(),
                mode: mode.into(),
                overrides,
            };

            // Planning happens against the size of the title block new sheets will use
            let title_block = doc
                .default_title_block_type()
                .and_then(|id| doc.title_block_type_size(id))
                .unwrap_or(options.fallback_title_block);

            let stats =
                sheet_compose::calculate_statistics(&doc, &request, title_block, &options)?;
            println!("Composition Statistics:");
            println!("  Selected views: {}", stats.selected_views);
            println!("  Eligible views: {}", stats.eligible_views);
            println!("  Views per sheet: {}", stats.views_per_sheet);
            println!("  Planned sheets: {}", stats.planned_sheets);
            println!("  Planned views: {}", stats.planned_views);
            if stats.dropped_views > 0 {
                println!("  Dropped views: {}", stats.dropped_views);
            }

            if stats_only {
                return Ok(());
            }

            let Some(output) = output else {
                bail!("--output is required unless --stats-only is given");
            };

            let (doc, report) = sheet_compose::compose_owned(doc, request, options).await?;

            for sheet in &report.sheets {
                let status = match sheet.status {
                    SheetStatus::Committed => "created",
                    SheetStatus::RolledBack => "rolled back",
                };
                println!(
                    "Sheet {} '{}' {} ({} view(s))",
                    sheet.number,
                    sheet.name,
                    status,
                    sheet.placed_count()
                );
                for outcome in &sheet.outcomes {
                    if let PlacementOutcome::Placed {
                        view,
                        placed_view,
                        duplicated: true,
                        ..
                    } = outcome
                    {
                        println!("  view {} placed as duplicate {}", view, placed_view);
                    }
                }
            }
            for (view, reason) in report.failures() {
                log::warn!("View {} not placed: {}", view, reason);
            }

            println!("{}", report.summary());
            if logger.warning_count() > 0 {
                println!("{} warning(s) logged", logger.warning_count());
            }

            if report.placed_count() == 0 {
                bail!("No views were placed; {} left unchanged", project.display());
            }

            sheet_compose::save_project(&doc, &output)
                .await
                .with_context(|| format!("Failed to save {}", output.display()))?;
            println!("Composed → {}", output.display());
        }

        Commands::InitConfig { output } => {
            ComposeOptions::default().save(&output).await?;
            println!("Default options → {}", output.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_override() {
        let o = parse_override("12:100.5:200").unwrap();
        assert_eq!(o.view, ElementId(12));
        assert_eq!(o.center_x_mm, 100.5);
        assert_eq!(o.center_y_mm, 200.0);
        assert_eq!(o.scale, None);

        let o = parse_override("3:10:20:100").unwrap();
        assert_eq!(o.scale, Some(100));
    }

    #[test]
    fn test_parse_override_rejects_malformed() {
        assert!(parse_override("12:100").is_err());
        assert!(parse_override("x:1:2").is_err());
        assert!(parse_override("1:2:3:4:5").is_err());
        assert!(parse_override("1:2:3:-4").is_err());
    }

    #[test]
    fn test_cli_parses_compose() {
        let cli = Cli::try_parse_from([
            "shc", "compose", "--project", "p.json", "--view", "4", "5", "--mode", "per-view",
            "--output", "out.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Compose { views, mode, .. } => {
                assert_eq!(views, vec![4, 5]);
                assert_eq!(ComposeMode::from(mode), ComposeMode::SheetPerView);
            }
            _ => panic!("Expected compose command"),
        }
    }
}
