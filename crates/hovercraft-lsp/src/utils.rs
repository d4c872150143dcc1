// Dweve Hovercraft - Table-driven hover documentation
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Position and URI helpers.
//!
//! LSP positions count UTF-16 code units within a line; the hover engine
//! counts characters. The conversions here go through a [`Rope`], which
//! indexes both, and never panic on out-of-range input.

use hovercraft_core::FileTypeKey;
use ropey::Rope;
use std::path::PathBuf;
use tower_lsp::lsp_types::{Position, Url};

/// Character range `[start, end)` of a line. The line break, if any, is
/// included.
fn line_char_range(rope: &Rope, line: usize) -> Option<(usize, usize)> {
    if line >= rope.len_lines() {
        return None;
    }
    let start = rope.line_to_char(line);
    let end = start + rope.line(line).len_chars();
    Some((start, end))
}

/// Convert an LSP position into a character offset within its line.
///
/// Returns `(line text, offset)`. A position past the end of the line, or
/// on a line that does not exist, yields `None`.
///
/// # Example
///
/// ```
/// use hovercraft_lsp::utils::line_and_offset;
/// use ropey::Rope;
/// use tower_lsp::lsp_types::Position;
///
/// // "😀" is two UTF-16 code units but one character.
/// let rope = Rope::from_str("first\n😀 word\n");
/// let (line, offset) = line_and_offset(&rope, Position::new(1, 3)).unwrap();
/// assert_eq!(line, "😀 word\n");
/// assert_eq!(offset, 2);
/// ```
pub fn line_and_offset(rope: &Rope, position: Position) -> Option<(String, usize)> {
    let (line_start, line_end) = line_char_range(rope, position.line as usize)?;
    let line_start_cu = rope.char_to_utf16_cu(line_start);
    let line_end_cu = rope.char_to_utf16_cu(line_end);
    let target_cu = line_start_cu + position.character as usize;
    if target_cu >= line_end_cu {
        return None;
    }
    let target_char = rope.utf16_cu_to_char(target_cu);
    let line = rope.slice(line_start..line_end).to_string();
    Some((line, target_char - line_start))
}

/// Convert a character offset within `line` of `rope` back to an LSP
/// position. Offsets past the end of the line are clamped to it.
pub fn position_in_line(rope: &Rope, line: u32, char_offset: usize) -> Position {
    let Some((line_start, line_end)) = line_char_range(rope, line as usize) else {
        return Position::new(line, 0);
    };
    let target = (line_start + char_offset).min(line_end);
    let character = rope.char_to_utf16_cu(target) - rope.char_to_utf16_cu(line_start);
    Position::new(line, character as u32)
}

/// File-type candidates for a document URI, most specific first.
///
/// Works for non-`file` schemes too (`untitled:`, `vscode-notebook-cell:`)
/// by looking at the last path segment.
pub fn file_type_candidates(uri: &Url) -> Vec<FileTypeKey> {
    let name = uri
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_else(|| uri.path());
    FileTypeKey::candidates_for_file_name(name)
}

/// Local path of a `file://` URI.
pub fn uri_to_path(uri: &Url) -> Option<PathBuf> {
    if uri.scheme() != "file" {
        return None;
    }
    uri.to_file_path().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_positions() {
        let rope = Rope::from_str("console.log(x)\nsecond line");
        let (line, offset) = line_and_offset(&rope, Position::new(0, 9)).unwrap();
        assert_eq!(line, "console.log(x)\n");
        assert_eq!(offset, 9);

        let (line, offset) = line_and_offset(&rope, Position::new(1, 0)).unwrap();
        assert_eq!(line, "second line");
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_out_of_range_positions() {
        let rope = Rope::from_str("abc\ndef");
        assert!(line_and_offset(&rope, Position::new(0, 4)).is_none());
        assert!(line_and_offset(&rope, Position::new(1, 3)).is_none());
        assert!(line_and_offset(&rope, Position::new(5, 0)).is_none());
        assert!(line_and_offset(&Rope::new(), Position::new(0, 0)).is_none());
    }

    #[test]
    fn test_utf16_surrogate_pairs() {
        let rope = Rope::from_str("😀😀 größe");
        let (_, offset) = line_and_offset(&rope, Position::new(0, 5)).unwrap();
        assert_eq!(offset, 3);
        assert_eq!(position_in_line(&rope, 0, 3), Position::new(0, 5));
        assert_eq!(position_in_line(&rope, 0, 8), Position::new(0, 10));
    }

    #[test]
    fn test_position_in_line_clamps() {
        let rope = Rope::from_str("ab\ncd");
        assert_eq!(position_in_line(&rope, 1, 99), Position::new(1, 2));
        assert_eq!(position_in_line(&rope, 7, 1), Position::new(7, 0));
    }

    #[test]
    fn test_file_type_candidates() {
        let uri = Url::parse("file:///ws/src/index.d.ts").unwrap();
        let keys: Vec<_> = file_type_candidates(&uri)
            .iter()
            .map(|k| k.as_str().to_string())
            .collect();
        assert_eq!(keys, vec!["d.ts", "ts"]);

        let untitled = Url::parse("untitled:Untitled-1").unwrap();
        assert!(file_type_candidates(&untitled).is_empty());
    }

    #[test]
    fn test_uri_to_path() {
        let uri = Url::parse("file:///ws/.vscode/hovercraft.py.csv").unwrap();
        #[cfg(unix)]
        assert_eq!(uri_to_path(&uri), Some(PathBuf::from("/ws/.vscode/hovercraft.py.csv")));
        assert!(uri_to_path(&Url::parse("untitled:x").unwrap()).is_none());
    }
}
