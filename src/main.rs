mod cli;

use anyhow::Context;
use chrono_tz::Tz;
use cli::{CliArgs, Mode};
use env_logger::Env;
use iridium_burst_parser::csv_out::write_csv;
use iridium_burst_parser::dfs::{convert, ConvertOptions};
use iridium_burst_parser::errors::AppError;
use iridium_burst_parser::filter::{parse_datetime_arg, parse_tz, TimeWindow};
use iridium_burst_parser::frame_stats::{collect_stats, records};
use iridium_burst_parser::line_source::LineSource;
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

fn setup_logging(level: &str) {
    let env = Env::default().filter_or("RUST_LOG", match level {
        "essential" => "info",
        "debug" => "debug",
        "trace" => "trace",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    });
    env_logger::Builder::from_env(env).init();
}

fn build_window(args: &CliArgs) -> Result<TimeWindow, AppError> {
    let tz: Option<Tz> = args.tz.as_deref().map(parse_tz).transpose()?;
    Ok(TimeWindow {
        start: args.start.as_deref().map(|s| parse_datetime_arg(s, tz)).transpose()?,
        end: args.end.as_deref().map(|s| parse_datetime_arg(s, tz)).transpose()?,
    })
}

fn open_out(path: &Path) -> anyhow::Result<Box<dyn Write>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }
    let f = File::create(path).with_context(|| format!("create output {}", path.display()))?;
    Ok(Box::new(BufWriter::new(f)))
}

fn main() -> anyhow::Result<()> {
    let args = cli::parse_cli();
    setup_logging(&args.log_level);

    let mode: Mode = args.mode.parse().map_err(anyhow::Error::msg)?;
    let window = build_window(&args)?;
    if !window.is_unbounded() {
        info!("time window {:?} .. {:?}", window.start, window.end);
    }

    let mut opts = ConvertOptions { window: window.clone(), ..ConvertOptions::default() };
    if let Some(p) = args.corrupt_lcw.clone() {
        opts.corrupt_lcw_pattern = p;
    }
    // checked before any output file is created
    opts.validate()?;

    let lines = LineSource::open(&args.input_files).context("open inputs")?;
    let mut out = open_out(&args.out)?;

    match mode {
        Mode::Dfs => {
            let report = convert(lines, &mut out, &opts)?;
            if report.frames_written == 0 {
                eprintln!("No usable data found");
                std::process::exit(1);
            }
        }
        Mode::Stats => {
            let stats = collect_stats(lines, &window)?;
            if args.json {
                serde_json::to_writer_pretty(&mut out, &stats)?;
                writeln!(out)?;
            } else {
                out.write_all(stats.render_text().as_bytes())?;
            }
            out.flush()?;
        }
        Mode::Csv => {
            write_csv(records(lines, &window), &mut out)?;
        }
    }

    info!("Done.");
    Ok(())
}
