use std::path::PathBuf;

use clap::Parser;
use log::{error, info};
use serde::Serialize;

use sigbin_core::SignalFile;
use sigbin_types::{SampleMatrix, SigbinResult};

#[derive(Parser, Debug)]
#[command(
    name = "sigbin-cli",
    version = env!("CARGO_PKG_VERSION"),
    about = "Inspect block-segmented signal recordings",
    long_about = None,
)]
struct Cli {
    /// Путь к бинарному файлу записи
    input: PathBuf,
    /// Вывести отчёт в формате JSON вместо сводки
    #[arg(long)]
    json: bool,
    /// Начало окна выборок (секунды); требует --duration
    #[arg(long)]
    start: Option<f64>,
    /// Длительность окна (секунды); требует --start
    #[arg(long)]
    duration: Option<f64>,
    /// Сколько первых строк окна напечатать
    #[arg(long, default_value = "5")]
    head: usize,
    /// Тихий режим (только ошибки)
    #[arg(short, long)]
    quiet: bool,
}

/// Машинный отчёт о файле (для `--json`).
#[derive(Debug, Serialize)]
struct FileReport {
    path: String,
    bytes_in_file: u64,
    num_channels: u32,
    sampling_rate_hz: f64,
    duration_secs: f64,
    n_blocks: usize,
    total_samples: u64,
    header_sizes: Vec<u32>,
    num_samples_by_block: Vec<u64>,
}

impl FileReport {
    fn collect(
        path: &PathBuf,
        file: &SignalFile<std::fs::File>,
    ) -> Self {
        Self {
            path: path.display().to_string(),
            bytes_in_file: file.bytes_in_file(),
            num_channels: file.num_channels(),
            sampling_rate_hz: file.sampling_rate(),
            duration_secs: file.duration(),
            n_blocks: file.n_blocks(),
            total_samples: file.total_samples(),
            header_sizes: file.header_sizes(),
            num_samples_by_block: file.num_samples_by_block(),
        }
    }
}

fn print_summary(report: &FileReport) {
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  Input         : {}", report.path);
    info!("  Size          : {:.1} MB", report.bytes_in_file as f64 / 1e6);
    info!("  Channels      : {}", report.num_channels);
    info!("  Sampling rate : {:.1} Hz", report.sampling_rate_hz);
    info!("  Duration      : {:.3} s", report.duration_secs);
    info!("  Blocks        : {}", report.n_blocks);
    info!("  Total samples : {}", report.total_samples);

    for (i, (hs, ns)) in report
        .header_sizes
        .iter()
        .zip(&report.num_samples_by_block)
        .enumerate()
    {
        info!("  Block {i:<4}    : header {hs} B, {ns} samples");
    }

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

fn print_window_head(
    window: &SampleMatrix,
    head: usize,
) {
    info!(
        "  Window        : {} samples × {} channels",
        window.num_samples(),
        window.num_channels(),
    );

    for row in 0..head.min(window.num_samples()) {
        let line: Vec<String> = window
            .row(row)
            .iter()
            .take(8)
            .map(|v| format!("{v:>12.5}"))
            .collect();
        let ellipsis = if window.num_channels() > 8 { " …" } else { "" };

        info!("  [{row:>6}] {}{ellipsis}", line.join(" "));
    }
}

fn run(cli: &Cli) -> SigbinResult<()> {
    let mut file = SignalFile::open(&cli.input)?;
    let report = FileReport::collect(&cli.input, &file);

    if cli.json {
        // JSON идёт в stdout, всё остальное — через логгер
        println!(
            "{}",
            serde_json::to_string_pretty(&report).expect("report serialization"),
        );
    } else {
        print_summary(&report);
    }

    if let (Some(start), Some(duration)) = (cli.start, cli.duration) {
        let window = file.read_raw_samples(start, duration)?;
        print_window_head(&window, cli.head);
    }

    file.close();

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.quiet { "error" } else { "info" };

    env_logger::Builder::new()
        .filter_level(level.parse().unwrap())
        .format_target(false)
        .format_timestamp_secs()
        .init();

    if cli.start.is_some() != cli.duration.is_some() {
        error!("--start and --duration must be given together");
        std::process::exit(2);
    }

    if let Err(e) = run(&cli) {
        error!("{}: {e}", cli.input.display());
        std::process::exit(1);
    }
}
