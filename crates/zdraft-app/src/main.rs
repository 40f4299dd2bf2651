//! ZDraft 命令行入口
//!
//! 载入图形快照，按名称执行一个绘图命令（交互输入来自标准输入），再写回快照。

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use zdraft_ui::commands::{self, CommandReport};
use zdraft_ui::{CommandError, CommandRegistry, ConsolePrompter, DraftSettings};

#[derive(Parser, Debug)]
#[command(author, version, about = "Drafting utilities: measure lines, label blocks, array blocks along a path", long_about = None)]
struct Cli {
    /// 命令名、短命令或别名（如 ARRAYPATH / AP）
    #[arg(value_name = "COMMAND")]
    command: String,

    /// 图形快照（JSON）
    #[arg(short, long, value_name = "DRAWING")]
    drawing: PathBuf,

    /// 输出文件，缺省时覆盖输入
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 配置文件（JSON）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 不写回文件
    #[arg(long)]
    dry_run: bool,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(io::stderr)
            .finish(),
    )?;

    let settings = DraftSettings::load_or_default(cli.config.as_deref())?;
    let registry = CommandRegistry::new().with_aliases(&settings.aliases);

    let Some(kind) = registry.lookup(&cli.command) else {
        let suggestions = registry.complete(&cli.command);
        if !suggestions.is_empty() {
            eprintln!("Did you mean: {}", suggestions.join(", "));
        }
        return Err(CommandError::UnknownCommand(cli.command).into());
    };

    let mut document = zdraft_file::load(&cli.drawing)
        .with_context(|| format!("Failed to load {}", cli.drawing.display()))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut prompter = ConsolePrompter::new(stdin.lock(), stdout.lock());

    let report = match commands::run(kind, &mut document, &mut prompter, &settings) {
        Ok(report) => report,
        Err(CommandError::Cancelled) => {
            info!("{} cancelled", kind.name());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    drop(prompter);
    print_report(&report, io::stdout().lock())?;

    let modified = !matches!(report, CommandReport::Measured(_));
    if modified && !cli.dry_run {
        let target = cli.output.as_ref().unwrap_or(&cli.drawing);
        zdraft_file::save(&document, target)
            .with_context(|| format!("Failed to save {}", target.display()))?;
    }

    Ok(())
}

fn print_report(report: &CommandReport, mut out: impl Write) -> io::Result<()> {
    match report {
        CommandReport::Measured(m) => writeln!(out, "{:.4}", m.length),
        CommandReport::Labeled(ids) => writeln!(out, "{} labels", ids.len()),
        CommandReport::Arrayed { outcome, .. } => match outcome.shortfall() {
            Some(missing) => writeln!(
                out,
                "{} of {} blocks created ({} did not fit)",
                outcome.blocks_created(),
                outcome.blocks_planned,
                missing
            ),
            None => writeln!(out, "{} blocks created", outcome.blocks_created()),
        },
    }
}
