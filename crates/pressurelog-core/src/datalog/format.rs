//! Log file format
//!
//! One entry per line, `YYYY-MM-DD,HH:MM,<value>` with the value always
//! rendered with two fractional digits. Lines that do not parse are skipped
//! on load so a write cut short by a power loss never blocks startup.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate, Timelike};

use super::{LogEntry, LogError, LogStore};

/// Default file name for the persisted log
pub const DEFAULT_LOG_FILE: &str = "pressure_log.csv";

/// Render one entry as a log line, without the trailing newline
pub fn format_line(entry: &LogEntry) -> String {
    let t = entry.timestamp();
    format!(
        "{:04}-{:02}-{:02},{:02}:{:02},{:.2}",
        t.year(),
        t.month(),
        t.day(),
        t.hour(),
        t.minute(),
        entry.value()
    )
}

/// Parse one log line
///
/// Returns `None` when the line does not have exactly three fields, when a
/// date or time component is missing or out of range, or when the value is
/// not written with exactly two fractional digits. A value cut short by an
/// interrupted write (`12.9`, `12.`, `1`) is therefore rejected rather than
/// loaded with the wrong magnitude. Surrounding whitespace (including `\r`)
/// is ignored.
pub fn parse_line(line: &str) -> Option<LogEntry> {
    let mut fields = line.trim().split(',');
    let date = fields.next()?;
    let time = fields.next()?;
    let value = fields.next()?;
    if fields.next().is_some() {
        return None;
    }

    let mut date_parts = date.split('-');
    let year: i32 = date_parts.next()?.parse().ok()?;
    let month: u32 = date_parts.next()?.parse().ok()?;
    let day: u32 = date_parts.next()?.parse().ok()?;
    if date_parts.next().is_some() {
        return None;
    }

    let (hour, minute) = time.split_once(':')?;
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;

    if !is_fixed_point(value) {
        return None;
    }
    let value: f64 = value.parse().ok()?;

    let timestamp = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)?;
    Some(LogEntry::new(timestamp, value))
}

/// `-?<digits>.<two digits>`, the only shape `format_line` produces
fn is_fixed_point(field: &str) -> bool {
    let digits = field.strip_prefix('-').unwrap_or(field);
    match digits.split_once('.') {
        Some((whole, frac)) => {
            !whole.is_empty()
                && whole.bytes().all(|b| b.is_ascii_digit())
                && frac.len() == 2
                && frac.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// Write entries to a writer, oldest first
///
/// Returns the number of lines written.
pub fn write_entries<'a, W, I>(writer: W, entries: I) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a LogEntry>,
{
    let mut writer = BufWriter::new(writer);
    let mut count = 0;

    for entry in entries {
        writeln!(writer, "{}", format_line(entry))?;
        count += 1;
    }

    writer.flush()?;
    Ok(count)
}

/// Read entries from a reader into a new store of the given capacity
///
/// Reading stops once `capacity` valid entries have been loaded. Malformed
/// lines are skipped. A read error part way through keeps what was loaded so
/// far.
pub fn read_entries<R: BufRead>(reader: R, capacity: usize) -> LogStore {
    let mut store = LogStore::new(capacity);
    let mut skipped = 0usize;

    for line in reader.split(b'\n') {
        if store.len() >= capacity {
            break;
        }

        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Stopped reading log after {} entries: {e}", store.len());
                break;
            }
        };

        match std::str::from_utf8(&line).ok().and_then(parse_line) {
            Some(entry) => {
                store.append(entry);
            }
            None => {
                if !line.iter().all(u8::is_ascii_whitespace) {
                    skipped += 1;
                }
            }
        }
    }

    if skipped > 0 {
        tracing::debug!("Skipped {skipped} malformed log lines");
    }

    store
}

/// Render entries as CSV text in the log file format
pub fn to_csv_string<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let mut out = String::new();
    for entry in entries {
        out.push_str(&format_line(entry));
        out.push('\n');
    }
    out
}

/// The durable log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    /// Create a handle for the log file at `path`
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the log file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Overwrite the log file with the given entries
    ///
    /// Returns the number of entries written.
    pub fn save<'a, I>(&self, entries: I) -> Result<usize, LogError>
    where
        I: IntoIterator<Item = &'a LogEntry>,
    {
        let file = File::create(&self.path).map_err(|source| LogError::Open {
            path: self.path.clone(),
            source,
        })?;

        let count = write_entries(&file, entries).map_err(|source| LogError::Write {
            path: self.path.clone(),
            source,
        })?;

        file.sync_all().map_err(|source| LogError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!("Saved {count} entries to {}", self.path.display());
        Ok(count)
    }

    /// Load the log file into a store of the given capacity
    ///
    /// A missing file yields an empty store.
    pub fn load(&self, capacity: usize) -> Result<LogStore, LogError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("No previous log found at {}", self.path.display());
                return Ok(LogStore::new(capacity));
            }
            Err(source) => {
                return Err(LogError::Open {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let store = read_entries(BufReader::new(file), capacity);
        tracing::info!(
            "Loaded {} entries from {}",
            store.len(),
            self.path.display()
        );
        Ok(store)
    }

    /// Delete the log file; a missing file is not an error
    pub fn remove(&self) -> Result<(), LogError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(LogError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_format_line_padding() {
        let entry = LogEntry::new(ts("2024-03-05 07:04:00"), 5.0);
        assert_eq!(format_line(&entry), "2024-03-05,07:04,5.00");
    }

    #[test]
    fn test_format_line_rounds_to_two_digits() {
        let entry = LogEntry::new(ts("2024-01-01 10:00:00"), 12.346);
        assert_eq!(format_line(&entry), "2024-01-01,10:00,12.35");

        let entry = LogEntry::new(ts("2024-01-01 10:00:00"), -1.5);
        assert_eq!(format_line(&entry), "2024-01-01,10:00,-1.50");
    }

    #[test]
    fn test_format_line_drops_seconds() {
        let entry = LogEntry::new(ts("2024-01-01 10:00:42"), 1.0);
        assert_eq!(format_line(&entry), "2024-01-01,10:00,1.00");
    }

    #[test]
    fn test_parse_line() {
        let entry = parse_line("2024-01-01,10:10,12.50").unwrap();
        assert_eq!(entry.timestamp(), ts("2024-01-01 10:10:00"));
        assert_eq!(entry.value(), 12.5);

        // CRLF line endings from a hand-edited file
        assert!(parse_line("2024-01-01,10:10,12.50\r").is_some());
    }

    #[test]
    fn test_parse_line_rejects_bad_shape() {
        assert!(parse_line("").is_none());
        assert!(parse_line("2024-01-01,10:10").is_none());
        assert!(parse_line("2024-01-01,10:10,").is_none());
        assert!(parse_line("2024-01-01,10:10,1.00,extra").is_none());
        assert!(parse_line("2024-01,10:10,1.00").is_none());
        assert!(parse_line("2024-01-01,1010,1.00").is_none());
        assert!(parse_line("2024-13-01,10:10,1.00").is_none());
        assert!(parse_line("2024-01-01,25:10,1.00").is_none());
        assert!(parse_line("2024-01-01,10:10,abc").is_none());
        assert!(parse_line("2024-01-01,10:10,NaN").is_none());
        assert!(parse_line("2024-01-01,10:10,inf").is_none());
    }

    #[test]
    fn test_parse_line_requires_two_decimals() {
        assert_eq!(
            parse_line("2024-01-01,10:10,-3.25").map(|e| e.value()),
            Some(-3.25)
        );

        // Values cut short mid-write
        assert!(parse_line("2024-01-01,10:10,1").is_none());
        assert!(parse_line("2024-01-01,10:10,12.").is_none());
        assert!(parse_line("2024-01-01,10:10,12.9").is_none());
        assert!(parse_line("2024-01-01,10:10,-").is_none());

        assert!(parse_line("2024-01-01,10:10,12.905").is_none());
        assert!(parse_line("2024-01-01,10:10,.90").is_none());
        assert!(parse_line("2024-01-01,10:10,+1.00").is_none());
        assert!(parse_line("2024-01-01,10:10,1e2.00").is_none());
    }

    #[test]
    fn test_read_entries_stops_at_capacity() {
        let data = "2024-01-01,10:00,1.00\n2024-01-01,10:10,2.00\n2024-01-01,10:20,3.00\n";
        let store = read_entries(data.as_bytes(), 2);

        let values: Vec<f64> = store.iter().map(|e| e.value()).collect();
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_read_entries_skips_invalid_utf8() {
        let mut data = b"2024-01-01,10:00,1.00\n".to_vec();
        data.extend_from_slice(&[0xff, 0xfe, b'\n']);
        data.extend_from_slice(b"2024-01-01,10:10,2.00\n");

        let store = read_entries(data.as_slice(), 10);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_to_csv_string() {
        let entries = vec![
            LogEntry::new(ts("2024-01-01 10:00:00"), 1.0),
            LogEntry::new(ts("2024-01-01 10:10:00"), 2.25),
        ];
        assert_eq!(
            to_csv_string(&entries),
            "2024-01-01,10:00,1.00\n2024-01-01,10:10,2.25\n"
        );
    }
}
