use crate::errors::AppError;
use log::{debug, trace};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Lines from one or more inputs, read in order. Each yielded line is trimmed and has
/// any UTF-8 BOM removed.
pub struct LineSource {
    readers: VecDeque<(String, Box<dyn BufRead>)>,
    buf: String,
    done: bool,
}

impl LineSource {
    /// Open every path up front. No paths, or `-`, means stdin.
    pub fn open(paths: &[PathBuf]) -> Result<Self, AppError> {
        let mut readers: VecDeque<(String, Box<dyn BufRead>)> = VecDeque::new();
        if paths.is_empty() {
            readers.push_back(stdin_reader());
        }
        for path in paths {
            if path.as_os_str() == "-" {
                readers.push_back(stdin_reader());
                continue;
            }
            readers.push_back((path.display().to_string(), open_file(path)?));
        }
        Ok(Self { readers, buf: String::new(), done: false })
    }

    pub fn from_reader<R: BufRead + 'static>(name: &str, reader: R) -> Self {
        let mut readers: VecDeque<(String, Box<dyn BufRead>)> = VecDeque::new();
        readers.push_back((name.to_string(), Box::new(reader)));
        Self { readers, buf: String::new(), done: false }
    }
}

impl Iterator for LineSource {
    type Item = Result<String, AppError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let (name, reader) = self.readers.front_mut()?;
            self.buf.clear();
            match reader.read_line(&mut self.buf) {
                Ok(0) => {
                    debug!("finished reading {}", name);
                    self.readers.pop_front();
                }
                Ok(_) => {
                    let line = strip_bom(self.buf.trim()).trim_start();
                    trace!("{}: {:?}", name, line);
                    return Some(Ok(line.to_string()));
                }
                Err(e) => {
                    // a broken input ends the stream
                    self.done = true;
                    return Some(Err(AppError::IO(format!("read {}: {}", name, e))));
                }
            }
        }
    }
}

#[inline]
fn strip_bom(s: &str) -> &str {
    s.strip_prefix('\u{FEFF}').unwrap_or(s)
}

fn stdin_reader() -> (String, Box<dyn BufRead>) {
    ("<stdin>".to_string(), Box::new(BufReader::new(io::stdin())))
}

fn open_file(path: &Path) -> Result<Box<dyn BufRead>, AppError> {
    let f = File::open(path).map_err(|e| AppError::IO(format!("open {}: {}", path.display(), e)))?;
    Ok(Box::new(BufReader::new(f)))
}
