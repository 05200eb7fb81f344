//! Tombstone rewriting
//!
//! Deleting an entry never erases bytes: every line belonging to it is
//! re-emitted with [`TOMBSTONE_MARKER`] prepended and everything else is
//! copied unchanged. A file's header, encoded sentinel and data lines are
//! tombstoned together. For a directory, every header whose name the
//! directory contains is tombstoned along with that file's block.
//!
//! Header names are compared after the same truncation applied at load, so
//! an over-long hand-edited header still matches its registry entry.

use super::record::{store_lines, Record, SEPARATOR, TOMBSTONE_MARKER};
use crate::entry::{directory_name, truncate_name, Entry};

/// Result of tombstoning an entry in store text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tombstoned {
    /// Rewritten store text
    pub text: String,
    /// Number of lines newly tombstoned
    pub lines: usize,
}

/// Rewrite store text with `target` (and anything it contains) tombstoned
///
/// The header line is always copied unchanged.
pub fn tombstone(text: &str, target: &Entry) -> Tombstoned {
    let mut out = String::with_capacity(text.len() + 16);
    let mut count = 0;
    let mut in_dead_block = false;

    for (idx, line) in store_lines(text).enumerate() {
        let kill = if idx == 0 {
            false
        } else {
            match Record::classify(line) {
                Record::File(name) => {
                    in_dead_block = target.contains(&truncate_name(name));
                    in_dead_block
                }
                Record::Directory(name) => {
                    in_dead_block = false;
                    if name.ends_with(SEPARATOR) {
                        target.contains(&directory_name(name))
                    } else {
                        false
                    }
                }
                Record::Data(_) | Record::EncodedSentinel => in_dead_block,
                Record::Tombstone(_) | Record::Unknown(_) => {
                    in_dead_block = false;
                    false
                }
            }
        };

        if kill {
            out.push(TOMBSTONE_MARKER);
            count += 1;
        }
        out.push_str(line);
        out.push('\n');
    }

    Tombstoned { text: out, lines: count }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORE: &str = "NOTES V1.0\n\
=a/\n\
@a/notes.txt\n\
~hello\n\
=a/b/\n\
@a/b/bin\n\
!base64\n\
~AAEC\n\
@ab\n\
~kept\n\
@top\n\
~one\n\
~two\n";

    #[test]
    fn test_tombstone_file_block() {
        let target = Entry::from_record("top", Vec::new(), false);
        let result = tombstone(STORE, &target);

        assert_eq!(result.lines, 3);
        assert!(result.text.ends_with("#@top\n#~one\n#~two\n"));
        assert!(result.text.contains("@ab\n~kept\n"));
    }

    #[test]
    fn test_tombstone_encoded_block() {
        let target = Entry::from_record("a/b/bin", Vec::new(), true);
        let result = tombstone(STORE, &target);

        assert_eq!(result.lines, 3);
        assert!(result.text.contains("#@a/b/bin\n#!base64\n#~AAEC\n"));
    }

    #[test]
    fn test_tombstone_directory_cascades() {
        let target = Entry::directory("a/");
        let result = tombstone(STORE, &target);

        assert_eq!(
            result.text,
            "NOTES V1.0\n\
#=a/\n\
#@a/notes.txt\n\
#~hello\n\
#=a/b/\n\
#@a/b/bin\n\
#!base64\n\
#~AAEC\n\
@ab\n\
~kept\n\
@top\n\
~one\n\
~two\n"
        );
        assert_eq!(result.lines, 7);
    }

    #[test]
    fn test_existing_tombstones_untouched() {
        let text = "NOTES V1.0\n#@old\n#~x\n@old\n~y\n";
        let target = Entry::from_record("old", Vec::new(), false);
        let result = tombstone(text, &target);

        assert_eq!(result.text, "NOTES V1.0\n#@old\n#~x\n#@old\n#~y\n");
        assert_eq!(result.lines, 2);
    }

    #[test]
    fn test_overlong_headers_match_truncated_name() {
        let long_file = "f".repeat(300);
        let long_dir = format!("{}/", "d".repeat(300));
        let text = format!("NOTES V1.0\n@{}\n~x\n={}\n@other\n", long_file, long_dir);

        let target = Entry::from_record(&long_file, Vec::new(), false);
        let result = tombstone(&text, &target);
        assert_eq!(result.lines, 2);
        assert!(result.text.contains("@other\n"));

        let target = Entry::directory(&long_dir);
        let result = tombstone(&text, &target);
        assert_eq!(result.lines, 1);
        assert!(result.text.contains(&format!("#={}\n", long_dir)));
    }

    #[test]
    fn test_unmatched_target_copies_everything() {
        let target = Entry::from_record("missing", Vec::new(), false);
        let result = tombstone(STORE, &target);

        assert_eq!(result.text, STORE);
        assert_eq!(result.lines, 0);
    }
}
