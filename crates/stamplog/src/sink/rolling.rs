//! Date- and size-rotated log files
//!
//! Files are named `application-<date>.log`, where `<date>` is the
//! configured date template rendered at write time. When a file would grow
//! past the size limit the same date continues in
//! `application-<date>.<n>.log`. Rotated files can be gzipped, and old files
//! are pruned after every rotation according to the retention policy.

use std::cmp::Reverse;
use std::ffi::OsStr;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::clock::Clock;
use crate::config::{FileConfig, Retention};
use crate::template::Template;

const FILE_PREFIX: &str = "application-";
const FILE_SUFFIX: &str = ".log";
const ARCHIVE_SUFFIX: &str = ".gz";

/// A log file that rotates by date and size
#[derive(Debug)]
pub struct RollingFile {
    folder: PathBuf,
    files_name: Template,
    max_size: u64,
    retention: Retention,
    zipped: bool,
    clock: Arc<dyn Clock>,
    current: Segment,
}

#[derive(Debug)]
struct Segment {
    date: String,
    index: u32,
    file: File,
    written: u64,
}

impl RollingFile {
    /// Open (or continue) today's file in `config.folder`
    ///
    /// The folder must already exist.
    pub fn open(config: &FileConfig, clock: Arc<dyn Clock>) -> io::Result<Self> {
        let date = config.files_name.render(&clock.now());
        let current = open_segment(
            &config.folder,
            date,
            0,
            config.max_size,
            config.zipped_archive,
        )?;

        let rolling = Self {
            folder: config.folder.clone(),
            files_name: config.files_name.clone(),
            max_size: config.max_size,
            retention: config.retention,
            zipped: config.zipped_archive,
            clock,
            current,
        };
        rolling.prune()?;
        Ok(rolling)
    }

    /// Path of the file currently written to
    pub fn path(&self) -> PathBuf {
        segment_path(&self.folder, &self.current.date, self.current.index)
    }

    /// Append one line, rotating first when the date changed or the line
    /// would push the current file past the size limit
    pub fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        let date = self.files_name.render(&self.clock.now());
        let len = line.len() as u64;

        let housekeeping = if date != self.current.date {
            self.rotate(date, 0)?
        } else if self.current.written > 0 && self.current.written + len > self.max_size {
            let next = self.current.index + 1;
            self.rotate(date, next)?
        } else {
            Ok(())
        };

        self.current.file.write_all(line)?;
        self.current.written += len;
        housekeeping
    }

    /// Switch to a new segment. The outer error means the switch failed; the
    /// inner one reports archiving or pruning that failed after it.
    fn rotate(&mut self, date: String, index: u32) -> io::Result<io::Result<()>> {
        self.current.file.flush()?;
        let previous = self.path();

        self.current = open_segment(&self.folder, date, index, self.max_size, self.zipped)?;

        let archived = if self.zipped {
            archive(&previous)
        } else {
            Ok(())
        };
        Ok(archived.and(self.prune()))
    }

    /// Delete managed files that fall outside the retention policy
    fn prune(&self) -> io::Result<()> {
        let current = self.path();
        let mut files: Vec<(PathBuf, SystemTime)> = fs::read_dir(&self.folder)?
            .filter_map(Result::ok)
            .filter(|entry| is_managed(&entry.file_name()))
            .map(|entry| entry.path())
            .filter(|path| *path != current)
            .filter_map(|path| {
                let modified = fs::metadata(&path).ok()?.modified().ok()?;
                Some((path, modified))
            })
            .collect();

        match self.retention {
            Retention::Days(_) => {
                let Some(max_age) = self.retention.max_age() else {
                    return Ok(());
                };
                let now = SystemTime::from(self.clock.now());
                for (path, modified) in files {
                    if now.duration_since(modified).is_ok_and(|age| age > max_age) {
                        remove_quietly(&path);
                    }
                }
            }
            Retention::Count(keep) => {
                // newest first; the current file takes one of the slots
                files.sort_by_key(|(path, modified)| Reverse((*modified, segment_key(path))));
                for (path, _) in files.into_iter().skip(keep.saturating_sub(1)) {
                    remove_quietly(&path);
                }
            }
        }
        Ok(())
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_line(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.current.file.flush()
    }
}

/// Open the first segment at or after `index` that still has room
fn open_segment(
    folder: &Path,
    date: String,
    mut index: u32,
    max_size: u64,
    zipped: bool,
) -> io::Result<Segment> {
    loop {
        let path = segment_path(folder, &date, index);
        if zipped && archive_path(&path).exists() {
            index += 1;
            continue;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        if written < max_size {
            return Ok(Segment {
                date,
                index,
                file,
                written,
            });
        }
        index += 1;
    }
}

fn segment_path(folder: &Path, date: &str, index: u32) -> PathBuf {
    if index == 0 {
        folder.join(format!("{FILE_PREFIX}{date}{FILE_SUFFIX}"))
    } else {
        folder.join(format!("{FILE_PREFIX}{date}.{index}{FILE_SUFFIX}"))
    }
}

fn archive_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(ARCHIVE_SUFFIX);
    PathBuf::from(name)
}

/// Gzip `path` next to itself and remove the original
fn archive(path: &Path) -> io::Result<()> {
    let mut source = File::open(path)?;
    let mut encoder = GzEncoder::new(File::create(archive_path(path))?, Compression::default());
    io::copy(&mut source, &mut encoder)?;
    encoder.finish()?;
    drop(source);
    fs::remove_file(path)
}

fn is_managed(name: &OsStr) -> bool {
    name.to_str().is_some_and(|name| {
        name.starts_with(FILE_PREFIX)
            && (name.ends_with(FILE_SUFFIX) || name.ends_with(".log.gz"))
    })
}

/// `(date, index)` parsed back out of a managed file name
fn segment_key(path: &Path) -> (String, u32) {
    let name = path
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or_default();
    let stem = name
        .strip_prefix(FILE_PREFIX)
        .unwrap_or(name)
        .trim_end_matches(ARCHIVE_SUFFIX)
        .trim_end_matches(FILE_SUFFIX);

    match stem.rsplit_once('.') {
        Some((date, index)) if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) => {
            (date.to_string(), index.parse().unwrap_or(0))
        }
        _ => (stem.to_string(), 0),
    }
}

fn remove_quietly(path: &Path) {
    // Another process may have removed it already.
    let _ = fs::remove_file(path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::FileSettings;
    use flate2::read::GzDecoder;
    use io::Read;
    use pretty_assertions::assert_eq;
    use time::Duration;
    use time::macros::datetime;

    fn config(folder: &Path, settings: FileSettings) -> FileConfig {
        FileSettings {
            folder: Some(folder.to_path_buf()),
            ..settings
        }
        .resolve()
        .unwrap()
    }

    fn names(folder: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(folder)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn names_file_after_rendered_date() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(datetime!(2024-03-07 09:00 UTC)));
        let mut file = RollingFile::open(&config(dir.path(), FileSettings::default()), clock).unwrap();

        file.write_line(b"first\n").unwrap();
        file.flush().unwrap();

        assert_eq!(names(dir.path()), ["application-2024-03-07.log"]);
        assert_eq!(
            fs::read_to_string(dir.path().join("application-2024-03-07.log")).unwrap(),
            "first\n"
        );
    }

    #[test]
    fn rotates_when_date_changes() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(datetime!(2024-03-07 23:59 UTC)));
        let mut file =
            RollingFile::open(&config(dir.path(), FileSettings::default()), clock.clone()).unwrap();

        file.write_line(b"late\n").unwrap();
        clock.advance(Duration::minutes(2));
        file.write_line(b"early\n").unwrap();

        assert_eq!(
            names(dir.path()),
            ["application-2024-03-07.log", "application-2024-03-08.log"]
        );
        assert_eq!(file.path(), dir.path().join("application-2024-03-08.log"));
        assert_eq!(
            fs::read_to_string(dir.path().join("application-2024-03-08.log")).unwrap(),
            "early\n"
        );
    }

    #[test]
    fn rotates_on_size_without_splitting_lines() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(datetime!(2024-03-07 09:00 UTC)));
        let settings = FileSettings {
            max_size: Some("16".to_string()),
            ..FileSettings::default()
        };
        let mut file = RollingFile::open(&config(dir.path(), settings), clock).unwrap();

        file.write_line(b"0123456789\n").unwrap();
        file.write_line(b"abcdefghij\n").unwrap();
        // a single oversized line still lands in one (fresh) file
        file.write_line(b"a line longer than sixteen bytes\n").unwrap();

        assert_eq!(
            names(dir.path()),
            [
                "application-2024-03-07.1.log",
                "application-2024-03-07.2.log",
                "application-2024-03-07.log",
            ]
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("application-2024-03-07.1.log")).unwrap(),
            "abcdefghij\n"
        );
    }

    #[test]
    fn continues_existing_file_on_open() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("application-2024-03-07.log"), "before\n").unwrap();

        let clock = Arc::new(ManualClock::new(datetime!(2024-03-07 09:00 UTC)));
        let mut file = RollingFile::open(&config(dir.path(), FileSettings::default()), clock).unwrap();
        file.write_line(b"after\n").unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("application-2024-03-07.log")).unwrap(),
            "before\nafter\n"
        );
    }

    #[test]
    fn archives_rotated_files() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(datetime!(2024-03-07 09:00 UTC)));
        let settings = FileSettings {
            zipped_archive: Some(true),
            ..FileSettings::default()
        };
        let mut file = RollingFile::open(&config(dir.path(), settings), clock.clone()).unwrap();

        file.write_line(b"archived line\n").unwrap();
        clock.advance(Duration::days(1));
        file.write_line(b"fresh line\n").unwrap();

        assert_eq!(
            names(dir.path()),
            ["application-2024-03-07.log.gz", "application-2024-03-08.log"]
        );

        let mut decoded = String::new();
        GzDecoder::new(File::open(dir.path().join("application-2024-03-07.log.gz")).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "archived line\n");
    }

    #[test]
    fn keeps_only_newest_files_by_count() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(datetime!(2024-03-01 09:00 UTC)));
        let settings = FileSettings {
            max_file: Some("2".to_string()),
            ..FileSettings::default()
        };
        let mut file = RollingFile::open(&config(dir.path(), settings), clock.clone()).unwrap();

        for _ in 0..4 {
            file.write_line(b"line\n").unwrap();
            clock.advance(Duration::days(1));
        }
        file.write_line(b"line\n").unwrap();

        assert_eq!(
            names(dir.path()),
            ["application-2024-03-04.log", "application-2024-03-05.log"]
        );
    }

    #[test]
    fn prunes_files_older_than_retention_days() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("application-2024-01-01.log");
        let recent = dir.path().join("application-2024-03-06.log");
        let unrelated = dir.path().join("notes.txt");
        let touched = [
            (&stale, datetime!(2024-01-01 12:00 UTC)),
            (&recent, datetime!(2024-03-06 12:00 UTC)),
            (&unrelated, datetime!(2024-01-01 12:00 UTC)),
        ];
        for (path, modified) in touched {
            fs::write(path, "x\n").unwrap();
            File::options()
                .write(true)
                .open(path)
                .unwrap()
                .set_modified(SystemTime::from(modified))
                .unwrap();
        }

        let clock = Arc::new(ManualClock::new(datetime!(2024-03-07 09:00 UTC)));
        let settings = FileSettings {
            max_file: Some("14d".to_string()),
            ..FileSettings::default()
        };
        RollingFile::open(&config(dir.path(), settings), clock).unwrap();

        assert_eq!(
            names(dir.path()),
            [
                "application-2024-03-06.log",
                "application-2024-03-07.log",
                "notes.txt",
            ]
        );
    }

    #[test]
    fn retention_days_follow_the_injected_clock() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(datetime!(2024-03-07 09:00 UTC)));
        let settings = FileSettings {
            max_file: Some("2d".to_string()),
            ..FileSettings::default()
        };
        let mut file = RollingFile::open(&config(dir.path(), settings), clock.clone()).unwrap();
        file.write_line(b"day one\n").unwrap();
        File::options()
            .write(true)
            .open(dir.path().join("application-2024-03-07.log"))
            .unwrap()
            .set_modified(SystemTime::from(datetime!(2024-03-07 09:00 UTC)))
            .unwrap();

        clock.advance(Duration::days(1));
        file.write_line(b"day two\n").unwrap();
        assert_eq!(
            names(dir.path()),
            ["application-2024-03-07.log", "application-2024-03-08.log"]
        );

        clock.advance(Duration::days(2));
        file.write_line(b"day four\n").unwrap();
        assert!(!dir.path().join("application-2024-03-07.log").exists());
        assert!(dir.path().join("application-2024-03-10.log").exists());
    }

    #[test]
    fn failed_archive_still_writes_the_line() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(datetime!(2024-03-07 23:59 UTC)));
        let settings = FileSettings {
            zipped_archive: Some(true),
            ..FileSettings::default()
        };
        let mut file = RollingFile::open(&config(dir.path(), settings), clock.clone()).unwrap();
        file.write_line(b"late\n").unwrap();

        // the archive target is occupied by a directory, so gzipping fails
        fs::create_dir(dir.path().join("application-2024-03-07.log.gz")).unwrap();
        clock.advance(Duration::minutes(2));

        assert!(file.write_line(b"early\n").is_err());
        assert_eq!(file.path(), dir.path().join("application-2024-03-08.log"));
        assert_eq!(
            fs::read_to_string(dir.path().join("application-2024-03-08.log")).unwrap(),
            "early\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("application-2024-03-07.log")).unwrap(),
            "late\n"
        );

        file.write_line(b"next\n").unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("application-2024-03-08.log")).unwrap(),
            "early\nnext\n"
        );
    }

    #[test]
    fn segment_keys() {
        assert_eq!(
            segment_key(Path::new("logs/application-2024-03-07.2.log.gz")),
            ("2024-03-07".to_string(), 2)
        );
        assert_eq!(
            segment_key(Path::new("application-2024-03-07.log")),
            ("2024-03-07".to_string(), 0)
        );
    }
}
