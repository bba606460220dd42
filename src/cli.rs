//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::cached_data_port::CachedDataPort;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_cache_adapter::JsonCacheAdapter;
use crate::domain::analysis::{analyze, AnalysisConfig, InstrumentAnalysis};
use crate::domain::backtest::{BacktestOutcome, BacktestResult};
use crate::domain::config_validation::{validate_analysis_config, validate_data_config};
use crate::domain::error::SignalError;
use crate::domain::universe::{parse_symbols, screen_universe, ScreenReport};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "signalscope", about = "Technical-indicator signal scoring and backtesting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score one instrument and backtest its buy signals
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: String,
        /// Write the scored frame as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Score the latest bar of many instruments
    Screen {
        #[arg(short, long)]
        config: PathBuf,
        /// Comma-separated symbols; defaults to every symbol in the data directory
        #[arg(long)]
        symbols: Option<String>,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            symbol,
            output,
        } => run_analyze(&config, &symbol, output.as_deref()),
        Command::Screen { config, symbols } => run_screen(&config, symbols.as_deref()),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SignalError> {
    FileConfigAdapter::from_file(path).map_err(|e| SignalError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// CSV directory from `[data] csv_dir`, wrapped in the JSON cache when
/// `[data] cache_file` is set.
pub fn build_data_port(config: &dyn ConfigPort) -> Result<Box<dyn DataPort + Sync>, SignalError> {
    validate_data_config(config)?;
    let csv_dir = config
        .get_string("data", "csv_dir")
        .ok_or_else(|| SignalError::ConfigMissing {
            section: "data".to_string(),
            key: "csv_dir".to_string(),
        })?;
    let csv = CsvAdapter::new(PathBuf::from(csv_dir.trim()));

    match config.get_string("data", "cache_file") {
        Some(cache_file) if !cache_file.trim().is_empty() => {
            let cache = JsonCacheAdapter::new(PathBuf::from(cache_file.trim()));
            Ok(Box::new(CachedDataPort::new(csv, cache)))
        }
        _ => Ok(Box::new(csv)),
    }
}

fn fail(err: SignalError) -> ExitCode {
    error!("{err}");
    (&err).into()
}

pub fn run_analyze(config_path: &Path, symbol: &str, output_path: Option<&Path>) -> ExitCode {
    info!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let analysis_config = match AnalysisConfig::from_config(&config) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let data_port = match build_data_port(&config) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    let symbol = symbol.trim().to_uppercase();
    let series = match data_port.fetch_series(&symbol) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    info!(symbol = %symbol, bars = series.len(), "loaded price series");

    let analysis = analyze(&series, &analysis_config);
    print!("{}", format_analysis(&analysis));

    if let Some(path) = output_path {
        if let Err(e) = CsvReportAdapter::new().write(&analysis, path) {
            return fail(e);
        }
    }

    ExitCode::SUCCESS
}

pub fn run_screen(config_path: &Path, symbols: Option<&str>) -> ExitCode {
    info!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let analysis_config = match AnalysisConfig::from_config(&config) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let data_port = match build_data_port(&config) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    let symbols = match symbols {
        Some(list) => match parse_symbols(list) {
            Ok(s) => s,
            Err(e) => {
                error!("invalid --symbols: {e}");
                return ExitCode::from(2);
            }
        },
        None => match data_port.list_symbols() {
            Ok(s) => s,
            Err(e) => return fail(e),
        },
    };
    if symbols.is_empty() {
        warn!("no symbols to screen");
        return ExitCode::SUCCESS;
    }

    info!(count = symbols.len(), "screening symbols");
    let report = screen_universe(data_port.as_ref(), &symbols, &analysis_config);
    print!("{}", format_screen(&report));

    ExitCode::SUCCESS
}

pub fn run_list_symbols(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let data_port = match build_data_port(&config) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    match data_port.list_symbols() {
        Ok(symbols) if symbols.is_empty() => {
            warn!("No symbols found");
            ExitCode::SUCCESS
        }
        Ok(symbols) => {
            for symbol in &symbols {
                println!("{}", symbol);
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

pub fn run_validate(config_path: &Path) -> ExitCode {
    info!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    if let Err(e) = validate_data_config(&config) {
        return fail(e);
    }
    if let Err(e) = validate_analysis_config(&config) {
        return fail(e);
    }
    let analysis_config = match AnalysisConfig::from_config(&config) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    println!("Configuration is valid.");
    println!("  buy threshold:   {}", analysis_config.scoring.buy_threshold);
    println!("  sell threshold:  {}", analysis_config.scoring.sell_threshold);
    println!("  hold period:     {} days", analysis_config.hold_period);
    println!("  lookback window: {} days", analysis_config.lookback_window);
    println!("  mode:            {}", analysis_config.mode);
    ExitCode::SUCCESS
}

pub fn format_analysis(analysis: &InstrumentAnalysis) -> String {
    let series = analysis.frame.series();
    let mut out = String::new();
    out.push_str(&format!("Symbol:  {}\n", analysis.symbol));
    out.push_str(&format!(
        "Bars:    {} ({} to {})\n",
        series.len(),
        series.first().date,
        series.last().date
    ));
    if !analysis.frame.history_complete() {
        out.push_str("History: fewer than 200 bars, SMA200 is still an expanding average\n");
    }

    match analysis.latest_score() {
        Some(score) => out.push_str(&format!(
            "Latest:  buy {:.2}{}  sell {:.2}{}\n",
            score.buy_score,
            if score.buy_signal { " [BUY]" } else { "" },
            score.sell_score,
            if score.sell_signal { " [SELL]" } else { "" },
        )),
        None => out.push_str("Latest:  not scored\n"),
    }

    out.push_str(&format_backtest("First signal", &analysis.first_signal));
    out.push_str(&format_backtest("All signals", &analysis.all_signals));
    out
}

pub fn format_backtest(label: &str, result: &BacktestResult) -> String {
    let summary = match (result.outcome, result.average_return) {
        (BacktestOutcome::NoSignal, _) | (_, None) => "no signal".to_string(),
        (BacktestOutcome::ResolvedFallback, Some(r)) => {
            format!("{:+.2}% (exit at last available close)", r * 100.0)
        }
        (BacktestOutcome::Resolved, Some(r)) => format!("{:+.2}%", r * 100.0),
    };
    let mut line = format!("{}: {}", label, summary);
    if let Some(date) = result.first_signal_date {
        line.push_str(&format!(", first signal {}", date));
    }
    if result.trades.len() > 1 {
        line.push_str(&format!(", {} trades", result.trades.len()));
    }
    if !result.data_sufficient {
        line.push_str(", insufficient data");
    }
    line.push('\n');
    line
}

pub fn format_screen(report: &ScreenReport) -> String {
    let mut out = format!(
        "{:<10} {:<10} {:>10} {:>6} {:>6}  {}\n",
        "SYMBOL", "DATE", "CLOSE", "BUY", "SELL", "SIGNAL"
    );
    for entry in &report.entries {
        let signal = match (entry.score.buy_signal, entry.score.sell_signal) {
            (true, true) => "BUY/SELL",
            (true, false) => "BUY",
            (false, true) => "SELL",
            (false, false) => "-",
        };
        out.push_str(&format!(
            "{:<10} {:<10} {:>10.2} {:>6.2} {:>6.2}  {}{}\n",
            entry.symbol,
            entry.date,
            entry.close,
            entry.score.buy_score,
            entry.score.sell_score,
            signal,
            if entry.history_complete { "" } else { " (short history)" },
        ));
    }
    for skipped in &report.skipped {
        out.push_str(&format!("{:<10} skipped: {}\n", skipped.symbol, skipped.reason));
    }
    out
}
