//! goohost report parser.
//!
//! goohost writes one result per line. The layout depends on the scan type:
//! `ip` scans write `<hostname> <address>`, `host` scans write a bare
//! hostname, and anything else is kept verbatim as a raw line.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::errors::PluginError;
use crate::models::record::{Record, ScanMode};
use crate::parsers::ParseError;
use crate::services::resolver::Resolver;

/// Parser for goohost text reports.
pub struct GoohostParser<'r> {
    mode: ScanMode,
    resolver: &'r dyn Resolver,
}

impl<'r> GoohostParser<'r> {
    pub fn new(mode: ScanMode, resolver: &'r dyn Resolver) -> Self {
        Self { mode, resolver }
    }

    pub fn source_tool(&self) -> &str {
        "goohost"
    }

    /// Open the report at `path` and return its records lazily.
    ///
    /// The returned iterator owns the file handle; it is closed as soon as
    /// the iterator is dropped, whether or not it was read to the end.
    pub fn parse(&self, path: &Path) -> Result<Records<'r, BufReader<File>>, PluginError> {
        let source = path.display().to_string();
        let file = File::open(path).map_err(|e| PluginError::io(source.clone(), e))?;
        tracing::debug!(path = %source, mode = %self.mode, "Opened goohost report");
        Ok(self.parse_reader(BufReader::new(file), source))
    }

    /// Parse records from any buffered reader.
    pub fn parse_reader<R: BufRead>(&self, reader: R, source: String) -> Records<'r, R> {
        Records {
            lines: reader.lines(),
            line_no: 0,
            failed: false,
            mode: self.mode,
            resolver: self.resolver,
            source,
        }
    }
}

/// Lazy, single-pass sequence of records read from a report.
///
/// Yields `PluginError::MalformedLine` for lines that do not fit the scan
/// mode and `PluginError::Io` if reading fails; iteration ends after an
/// I/O error.
pub struct Records<'r, R> {
    lines: Lines<R>,
    line_no: usize,
    failed: bool,
    mode: ScanMode,
    resolver: &'r dyn Resolver,
    source: String,
}

impl<R: BufRead> Iterator for Records<'_, R> {
    type Item = Result<Record, PluginError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(PluginError::io(self.source.clone(), e)));
                }
            };
            self.line_no += 1;

            if let Some(result) = parse_line(self.mode, self.resolver, &line, self.line_no) {
                return Some(result.map_err(PluginError::MalformedLine));
            }
        }
    }
}

/// Parse a single report line. Blank lines yield `None`.
pub fn parse_line(
    mode: ScanMode,
    resolver: &dyn Resolver,
    line: &str,
    line_no: usize,
) -> Option<Result<Record, ParseError>> {
    if line.trim().is_empty() {
        return None;
    }

    let record = match mode {
        ScanMode::Ip => {
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next()) {
                (Some(host), Some(ip)) => Ok(Record::Host {
                    host: host.to_string(),
                    ip: ip.to_string(),
                    resolution: None,
                }),
                _ => Err(ParseError {
                    line: line_no,
                    message: format!("expected hostname and address, found {:?}", line.trim()),
                }),
            }
        }
        ScanMode::Host => {
            let host = line.trim();
            let resolution = resolver.resolve(host);
            Ok(Record::Host {
                host: host.to_string(),
                ip: resolution.into_address(host),
                resolution: Some(resolution),
            })
        }
        ScanMode::Raw => Ok(Record::Raw {
            line: line.to_string(),
        }),
    };

    Some(record)
}
