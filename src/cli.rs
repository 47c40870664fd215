use argparse::{ArgumentParser, Collect, Store, StoreOption, StoreTrue};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Dfs,
    Stats,
    Csv,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dfs" => Ok(Mode::Dfs),
            "stats" => Ok(Mode::Stats),
            "csv" => Ok(Mode::Csv),
            other => Err(format!("unknown mode {:?} (dfs|stats|csv)", other)),
        }
    }
}

pub struct CliArgs {
    pub input_files: Vec<PathBuf>,
    pub mode: String,
    pub out: PathBuf,
    pub start: Option<String>,
    pub end: Option<String>,
    pub tz: Option<String>,
    pub corrupt_lcw: Option<String>,
    pub json: bool,
    pub log_level: String,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            input_files: vec![],
            mode: "dfs".into(),
            out: PathBuf::from("-"),
            start: None,
            end: None,
            tz: None,
            corrupt_lcw: None,
            json: false,
            log_level: "essential".into(),
        }
    }
}

pub fn parse_cli() -> CliArgs {
    let mut args = CliArgs::default();
    {
        let mut ap = ArgumentParser::new();
        ap.set_description("Convert iridium-parser.py output: VOC frames to DFS, or frame statistics / CSV");
        ap.refer(&mut args.input_files)
            .add_argument("input", Collect, "Files to read, if empty or -, stdin is used");
        ap.refer(&mut args.mode)
            .add_option(&["-m", "--mode"], Store, "Output: dfs|stats|csv");
        ap.refer(&mut args.out)
            .add_option(&["-o", "--out"], Store, "Output path, - for stdout");
        ap.refer(&mut args.start)
            .add_option(&["--start"], StoreOption, "Filter events before this time");
        ap.refer(&mut args.end)
            .add_option(&["--end"], StoreOption, "Filter events after this time");
        ap.refer(&mut args.tz)
            .add_option(&["--tz"], StoreOption, "Timezone (IANA name) for --start/--end, default UTC");
        ap.refer(&mut args.corrupt_lcw)
            .add_option(&["--corrupt-lcw"], StoreOption, "LCW substring marking frames to drop (dfs)");
        ap.refer(&mut args.json)
            .add_option(&["--json"], StoreTrue, "Print statistics as JSON (stats)");
        ap.refer(&mut args.log_level)
            .add_option(&["--log"], Store, "Log level (essential|debug|trace|warn|error)");
        ap.parse_args_or_exit();
    }
    args
}
