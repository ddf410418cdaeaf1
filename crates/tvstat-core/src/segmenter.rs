//! Segmenter — cuts a raw `time -v` log into one [`RawBlock`] per execution.
//!
//! Blocks are found by splitting on [`BLOCK_DELIMITER`]. Text before the
//! first delimiter is preamble and is discarded; pieces with fewer than
//! `min_lines` lines are truncated fragments and are dropped.

use regex::Regex;

use crate::types::{RawBlock, BLOCK_DELIMITER};

/// Lazy iterator over the blocks of one file.
///
/// Cloning yields an independent iterator that restarts from the same
/// position, so a fresh [`segment`] call or a clone taken up front can replay
/// the file without re-reading it.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    pieces: std::str::Split<'a, &'static str>,
    source: &'a str,
    min_lines: usize,
    command_pattern: Option<&'a Regex>,
    kept: usize,
}

/// Segment `text` (read from `source`) into report blocks.
///
/// `command_pattern` is the category's expected command line; it only
/// annotates each block via [`RawBlock::command_matches`].
pub fn segment<'a>(
    text: &'a str,
    source: &'a str,
    min_lines: usize,
    command_pattern: Option<&'a Regex>,
) -> Segments<'a> {
    let mut pieces = text.split(BLOCK_DELIMITER);
    // Preamble before the first delimiter (or the whole text if none).
    pieces.next();
    Segments {
        pieces,
        source,
        min_lines,
        command_pattern,
        kept: 0,
    }
}

impl Iterator for Segments<'_> {
    type Item = RawBlock;

    fn next(&mut self) -> Option<RawBlock> {
        for piece in self.pieces.by_ref() {
            let body = piece.trim();
            if body.is_empty() || body.lines().count() < self.min_lines {
                tracing::trace!(source = self.source, "dropping truncated block fragment");
                continue;
            }

            let command = command_line(body);
            let command_matches = match (self.command_pattern, command.as_deref()) {
                (Some(re), Some(cmd)) => Some(re.is_match(cmd)),
                _ => None,
            };

            let index = self.kept;
            self.kept += 1;
            return Some(RawBlock {
                text: format!("{BLOCK_DELIMITER} {body}"),
                source: self.source.to_string(),
                index,
                command,
                command_matches,
            });
        }
        None
    }
}

/// The first line of a block body, if it is a quoted command.
fn command_line(body: &str) -> Option<String> {
    let first = body.lines().next()?.trim();
    (first.len() >= 2 && first.starts_with('"') && first.ends_with('"'))
        .then(|| first.to_string())
}
