//! Store record format
//!
//! A store is a UTF-8 text file of newline-terminated lines:
//!
//! ```text
//! NOTES V1.0
//! =docs/              directory header (name ends with '/')
//! @docs/notes.txt     file header
//! !base64             optional, marks the file's data lines as base64
//! ~hello              data line, repeated
//! #@docs/old.txt      tombstone: '#' prepended to a deleted line
//! ```
//!
//! Parsing recovers from malformed lines (they are skipped and reported as
//! [`ParseWarning`]s); only a wrong header aborts.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use tracing::{debug, warn};

use super::{StorageError, StorageResult};
use crate::entry::Entry;

/// Version tag on the first line of every store
pub const HEADER_TAG: &str = "NOTES V1.0";

/// Marker for a file header line
pub const FILE_MARKER: char = '@';

/// Marker for a directory header line
pub const DIR_MARKER: char = '=';

/// Marker for a data line
pub const DATA_MARKER: char = '~';

/// Marker prepended to deleted lines
pub const TOMBSTONE_MARKER: char = '#';

/// Line following a file header when its data is base64
pub const ENCODED_SENTINEL: &str = "!base64";

/// Path separator; directory names end with it
pub const SEPARATOR: char = '/';

/// Maximum data line length, including the marker, excluding the terminator
pub const MAX_LINE_LEN: usize = 254;

/// Maximum entry name length
pub const MAX_NAME_LEN: usize = 254;

/// Maximum width of a data line's payload
pub const DATA_WIDTH: usize = MAX_LINE_LEN - 1;

/// A single classified store line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record<'a> {
    /// `@name`
    File(&'a str),
    /// `=name/` (the separator is not checked here)
    Directory(&'a str),
    /// `~payload`
    Data(&'a str),
    /// The encoded-content sentinel
    EncodedSentinel,
    /// `#anything`
    Tombstone(&'a str),
    /// Anything else
    Unknown(&'a str),
}

impl<'a> Record<'a> {
    /// Classify a line by its leading marker
    pub fn classify(line: &'a str) -> Self {
        if line == ENCODED_SENTINEL {
            return Record::EncodedSentinel;
        }
        let mut chars = line.chars();
        match chars.next() {
            Some(FILE_MARKER) => Record::File(chars.as_str()),
            Some(DIR_MARKER) => Record::Directory(chars.as_str()),
            Some(DATA_MARKER) => Record::Data(chars.as_str()),
            Some(TOMBSTONE_MARKER) => Record::Tombstone(chars.as_str()),
            _ => Record::Unknown(line),
        }
    }
}

/// A recoverable anomaly found while loading a store
///
/// Line numbers are 1-based and count the header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// Directory header whose name does not end with the separator
    MalformedDirectory { line: usize, name: String },
    /// File or directory header with an empty name
    EmptyName { line: usize },
    /// Data line with no file header before it
    OrphanData { line: usize },
    /// Line with no recognised marker
    UnknownRecord { line: usize, text: String },
    /// Second header for a name already seen; the first one wins
    DuplicateEntry { line: usize, name: String },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::MalformedDirectory { line, name } => write!(
                f,
                "line {}: directory '{}' is not correctly formatted (must end with '{}')",
                line, name, SEPARATOR
            ),
            ParseWarning::EmptyName { line } => write!(f, "line {}: entry has an empty name", line),
            ParseWarning::OrphanData { line } => {
                write!(f, "line {}: data line does not belong to a file", line)
            }
            ParseWarning::UnknownRecord { line, text } => {
                write!(f, "line {}: unknown record type: '{}'", line, text)
            }
            ParseWarning::DuplicateEntry { line, name } => write!(
                f,
                "line {}: '{}' already exists; keeping the first occurrence",
                line, name
            ),
        }
    }
}

/// Result of parsing a store
#[derive(Debug, Default)]
pub struct ParsedStore {
    /// Live entries in file order
    pub entries: Vec<Entry>,
    /// Lines that were skipped
    pub warnings: Vec<ParseWarning>,
    /// Number of tombstoned lines seen
    pub tombstoned_lines: usize,
}

/// Split store text into lines on `\n` only
///
/// A trailing newline does not produce an empty last line. Carriage returns
/// are kept, since plain content lines may carry them.
pub fn store_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive('\n')
        .map(|line| line.strip_suffix('\n').unwrap_or(line))
}

/// Parse store text into live entries
///
/// Fails only when the first line is not [`HEADER_TAG`]; every other problem
/// is reported as a warning and the line skipped.
pub fn parse_store(text: &str, path: &Path) -> StorageResult<ParsedStore> {
    let mut lines = store_lines(text).enumerate().peekable();

    let header = lines.next().map(|(_, line)| line).unwrap_or("");
    if header != HEADER_TAG {
        return Err(StorageError::InvalidHeader {
            path: path.to_path_buf(),
            expected: HEADER_TAG,
            found: header.to_string(),
        });
    }

    let mut parsed = ParsedStore::default();
    let mut seen = HashSet::new();

    while let Some((idx, line)) = lines.next() {
        let line_no = idx + 1;

        let entry = match Record::classify(line) {
            Record::File(name) => {
                let mut is_encoded = false;
                if matches!(lines.peek(), Some((_, next)) if *next == ENCODED_SENTINEL) {
                    is_encoded = true;
                    lines.next();
                }

                let mut content = Vec::new();
                while let Some(&(_, next)) = lines.peek() {
                    let Record::Data(data) = Record::classify(next) else {
                        break;
                    };
                    if is_encoded {
                        content.push(data.to_string());
                    } else {
                        content.push(format!("{}\n", data));
                    }
                    lines.next();
                }

                if name.is_empty() {
                    parsed.warnings.push(ParseWarning::EmptyName { line: line_no });
                    continue;
                }
                Entry::from_record(name, content, is_encoded)
            }
            Record::Directory(name) => {
                if name.is_empty() {
                    parsed.warnings.push(ParseWarning::EmptyName { line: line_no });
                    continue;
                }
                if !name.ends_with(SEPARATOR) {
                    parsed.warnings.push(ParseWarning::MalformedDirectory {
                        line: line_no,
                        name: name.to_string(),
                    });
                    continue;
                }
                Entry::directory(name)
            }
            Record::Data(_) => {
                parsed.warnings.push(ParseWarning::OrphanData { line: line_no });
                continue;
            }
            Record::Tombstone(_) => {
                debug!("Skipping tombstoned line {}", line_no);
                parsed.tombstoned_lines += 1;
                continue;
            }
            Record::EncodedSentinel | Record::Unknown(_) => {
                parsed.warnings.push(ParseWarning::UnknownRecord {
                    line: line_no,
                    text: line.to_string(),
                });
                continue;
            }
        };

        if !seen.insert(entry.name.clone()) {
            parsed.warnings.push(ParseWarning::DuplicateEntry {
                line: line_no,
                name: entry.name,
            });
            continue;
        }
        parsed.entries.push(entry);
    }

    for warning in &parsed.warnings {
        warn!("{}: {}", path.display(), warning);
    }

    Ok(parsed)
}

/// Append the record lines for one entry
pub fn render_entry(entry: &Entry, out: &mut String) {
    if entry.is_dir {
        out.push(DIR_MARKER);
        out.push_str(&entry.name);
        out.push('\n');
        return;
    }

    out.push(FILE_MARKER);
    out.push_str(&entry.name);
    out.push('\n');

    if entry.is_encoded {
        out.push_str(ENCODED_SENTINEL);
        out.push('\n');
    }

    for line in &entry.content {
        out.push(DATA_MARKER);
        out.push_str(line.strip_suffix('\n').unwrap_or(line));
        out.push('\n');
    }
}

/// Render a complete store: header followed by every entry in order
pub fn render_store<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> String {
    let mut out = String::from(HEADER_TAG);
    out.push('\n');
    for entry in entries {
        render_entry(entry, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ParsedStore {
        parse_store(text, Path::new("test.notes")).unwrap()
    }

    #[test]
    fn test_classify() {
        assert_eq!(Record::classify("@a/b"), Record::File("a/b"));
        assert_eq!(Record::classify("=a/"), Record::Directory("a/"));
        assert_eq!(Record::classify("~data"), Record::Data("data"));
        assert_eq!(Record::classify("#@gone"), Record::Tombstone("@gone"));
        assert_eq!(Record::classify(ENCODED_SENTINEL), Record::EncodedSentinel);
        assert_eq!(Record::classify("?what"), Record::Unknown("?what"));
        assert_eq!(Record::classify(""), Record::Unknown(""));
    }

    #[test]
    fn test_store_lines() {
        assert_eq!(store_lines("a\nb\n").collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(store_lines("a\nb").collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(store_lines("a\r\n").collect::<Vec<_>>(), vec!["a\r"]);
        assert_eq!(store_lines("").count(), 0);
    }

    #[test]
    fn test_header_required() {
        let err = parse_store("NOTES V2.0\n@a\n", Path::new("x.notes")).unwrap_err();
        assert!(matches!(err, StorageError::InvalidHeader { .. }));

        let err = parse_store("", Path::new("x.notes")).unwrap_err();
        assert!(matches!(err, StorageError::InvalidHeader { .. }));
    }

    #[test]
    fn test_header_only() {
        let parsed = parse("NOTES V1.0\n");
        assert!(parsed.entries.is_empty());
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_parse_entries() {
        let parsed = parse("NOTES V1.0\n=a/\n@a/notes.txt\n~hello\n~world\n@a/empty\n");
        assert_eq!(parsed.entries.len(), 3);

        assert_eq!(parsed.entries[0], Entry::directory("a/"));

        let notes = &parsed.entries[1];
        assert_eq!(notes.name, "a/notes.txt");
        assert!(!notes.is_dir);
        assert!(!notes.is_encoded);
        assert_eq!(notes.content, vec!["hello\n", "world\n"]);

        assert!(parsed.entries[2].content.is_empty());
    }

    #[test]
    fn test_parse_encoded() {
        let parsed = parse("NOTES V1.0\n@bin\n!base64\n~AAEC\n~Aw==\n");
        let entry = &parsed.entries[0];
        assert!(entry.is_encoded);
        assert_eq!(entry.content, vec!["AAEC", "Aw=="]);
        assert_eq!(entry.bytes().unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_malformed_directory_skipped() {
        let parsed = parse("NOTES V1.0\n=nodir\n=ok/\n");
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].name, "ok/");
        assert_eq!(
            parsed.warnings,
            vec![ParseWarning::MalformedDirectory {
                line: 2,
                name: "nodir".to_string()
            }]
        );
    }

    #[test]
    fn test_unknown_and_orphan_lines_skipped() {
        let parsed = parse("NOTES V1.0\n~orphan\n?junk\n!base64\n@f\n~x\n");
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].content, vec!["x\n"]);
        assert_eq!(
            parsed.warnings,
            vec![
                ParseWarning::OrphanData { line: 2 },
                ParseWarning::UnknownRecord {
                    line: 3,
                    text: "?junk".to_string()
                },
                ParseWarning::UnknownRecord {
                    line: 4,
                    text: "!base64".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_tombstones_skipped() {
        let parsed = parse("NOTES V1.0\n#@gone\n#~data\n@kept\n~data\n");
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].name, "kept");
        assert_eq!(parsed.tombstoned_lines, 2);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_duplicate_first_wins() {
        let parsed = parse("NOTES V1.0\n@f\n~first\n@f\n~second\n");
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].content, vec!["first\n"]);
        assert_eq!(
            parsed.warnings,
            vec![ParseWarning::DuplicateEntry {
                line: 4,
                name: "f".to_string()
            }]
        );
    }

    #[test]
    fn test_empty_names_rejected() {
        let parsed = parse("NOTES V1.0\n@\n~data\n=\n");
        assert!(parsed.entries.is_empty());
        assert_eq!(
            parsed.warnings,
            vec![
                ParseWarning::EmptyName { line: 2 },
                ParseWarning::EmptyName { line: 4 }
            ]
        );
    }

    #[test]
    fn test_render_entry_shapes() {
        let mut out = String::new();
        render_entry(&Entry::directory("a/"), &mut out);
        render_entry(&Entry::from_bytes("a/t", b"one\ntwo\n"), &mut out);
        render_entry(&Entry::from_bytes("a/b", &[0, 1, 2, 3]), &mut out);
        assert_eq!(out, "=a/\n@a/t\n~one\n~two\n@a/b\n!base64\n~AAECAw==\n");
    }

    #[test]
    fn test_render_then_parse_preserves_entries() {
        let entries = vec![
            Entry::directory("docs/"),
            Entry::from_bytes("docs/readme", b"line one\n\nline three\n"),
            Entry::from_bytes("docs/blob", &[0xde, 0xad, 0xbe, 0xef]),
            Entry::from_bytes("docs/empty", b""),
        ];
        let text = render_store(&entries);
        let parsed = parse(&text);
        assert_eq!(parsed.entries, entries);
    }

    #[test]
    fn test_rendered_lines_fit_width() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(5000).collect();
        let entry = Entry::from_bytes("big", &bytes);
        let text = render_store([&entry]);
        assert!(store_lines(&text).all(|line| line.chars().count() <= MAX_LINE_LEN));
    }
}
