//! SRT (SubRip) caption parsing.
//!
//! SRT is a plain sequence of blocks:
//! - A numeric index
//! - Timing in HH:MM:SS,mmm --> HH:MM:SS,mmm format
//! - One or more text lines
//! - Blank line separator

use slidecut_core::{RationalTime, Result, SlideError};
use slidecut_timeline::CaptionCue;
use std::path::Path;

/// Parse SRT text into caption cues, in file order.
pub fn parse(content: &str) -> Result<Vec<CaptionCue>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut cues = Vec::new();
    let mut lines = content.lines().map(str::trim_end).peekable();

    while lines.peek().is_some() {
        // Skip empty lines
        while lines.peek().is_some_and(|l| l.trim().is_empty()) {
            lines.next();
        }

        let Some(first) = lines.next() else {
            break;
        };

        // The index line is optional in the wild; accept a block that opens
        // directly with its timing.
        let timing_line = if first.contains("-->") {
            first
        } else {
            match lines.next() {
                Some(line) => line,
                None => break,
            }
        };
        let (start, end) = parse_timing_line(timing_line.trim())?;

        let mut text_lines = Vec::new();
        while let Some(line) = lines.peek() {
            if line.trim().is_empty() {
                break;
            }
            text_lines.push(*line);
            lines.next();
        }

        if !text_lines.is_empty() {
            cues.push(CaptionCue::new(start, end, text_lines.join("\n")));
        }
    }

    Ok(cues)
}

/// Read and parse an SRT file.
pub fn parse_file(path: &Path) -> Result<Vec<CaptionCue>> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

fn parse_timing_line(line: &str) -> Result<(RationalTime, RationalTime)> {
    let (start, end) = line
        .split_once("-->")
        .ok_or_else(|| SlideError::Caption(format!("Invalid timing line: {}", line)))?;

    let start = parse_timestamp(start.trim())?;
    // Position hints may follow the end timestamp
    let end = parse_timestamp(end.split_whitespace().next().unwrap_or(""))?;
    if end < start {
        return Err(SlideError::Caption(format!("Cue ends before it starts: {}", line)));
    }
    Ok((start, end))
}

/// Parse `HH:MM:SS,mmm` (a `.` before the milliseconds is also accepted).
fn parse_timestamp(text: &str) -> Result<RationalTime> {
    let invalid = || SlideError::Caption(format!("Invalid timestamp: {}", text));

    let (clock, millis) = text
        .split_once(|c: char| c == ',' || c == '.')
        .ok_or_else(invalid)?;
    let mut parts = clock.split(':');
    let (Some(h), Some(m), Some(s), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let field = |v: &str| v.trim().parse::<i64>().map_err(|_| invalid());
    let (hours, minutes, seconds, millis) = (field(h)?, field(m)?, field(s)?, field(millis)?);
    let in_range = |v: i64, limit: i64| (0..limit).contains(&v);
    if hours < 0 || !in_range(minutes, 60) || !in_range(seconds, 60) || !in_range(millis, 1000) {
        return Err(invalid());
    }

    Ok(RationalTime::from_millis(
        ((hours * 60 + minutes) * 60 + seconds) * 1000 + millis,
    ))
}
