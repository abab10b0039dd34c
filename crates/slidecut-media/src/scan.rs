//! Image folder scanning in natural order.

use slidecut_core::{Result, SlideError};
use slidecut_timeline::MediaItem;
use std::cmp::Ordering;
use std::path::Path;
use tracing::debug;

/// List the images directly inside `dir`, natural-sorted by file name.
///
/// `extensions` are matched case-insensitively and without the dot.
/// Hidden files are skipped.
pub fn scan_folder(dir: &Path, extensions: &[String]) -> Result<Vec<MediaItem>> {
    if !dir.is_dir() {
        return Err(SlideError::NotFound(format!(
            "Image folder not found: {}",
            dir.display()
        )));
    }

    let mut items = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)));
        if matches {
            items.push(MediaItem::new(path));
        }
    }

    items.sort_by(|a, b| natural_cmp(&a.name, &b.name));
    debug!(folder = %dir.display(), count = items.len(), "scanned image folder");
    Ok(items)
}

/// Compare names the way people expect: `img2` before `img10`.
///
/// Digit runs compare by value (leading zeros ignored), everything else
/// compares case-insensitively. Full ties fall back to a plain byte compare
/// so the order is total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Chunks::new(a);
    let mut right = Chunks::new(b);

    loop {
        let ordering = match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Chunk::Digits(x)), Some(Chunk::Digits(y))) => compare_digits(x, y),
            (Some(Chunk::Text(x)), Some(Chunk::Text(y))) => compare_text(x, y),
            (Some(Chunk::Digits(_)), Some(Chunk::Text(_))) => Ordering::Less,
            (Some(Chunk::Text(_)), Some(Chunk::Digits(_))) => Ordering::Greater,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

fn compare_digits(x: &str, y: &str) -> Ordering {
    let x = x.trim_start_matches('0');
    let y = y.trim_start_matches('0');
    x.len().cmp(&y.len()).then_with(|| x.cmp(y))
}

fn compare_text(x: &str, y: &str) -> Ordering {
    let x = x.chars().flat_map(char::to_lowercase);
    let y = y.chars().flat_map(char::to_lowercase);
    x.cmp(y)
}

enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Chunks<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(self.rest.len());
        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(if digits {
            Chunk::Digits(chunk)
        } else {
            Chunk::Text(chunk)
        })
    }
}
