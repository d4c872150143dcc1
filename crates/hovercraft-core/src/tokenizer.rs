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

//! Word-under-cursor extraction.
//!
//! Offsets are character offsets (Unicode scalar values), not bytes, so a
//! cursor after `"ä"` is offset 1. All slicing goes through `char_indices`
//! and is therefore always on a UTF-8 boundary.
//!
//! A word is a maximal run of alphanumeric characters and `_`. The character
//! at the cursor must itself be part of the word; a cursor on `.`, a space
//! or a newline yields no token. Because newlines are never word characters,
//! a token cannot span two lines.

use std::ops::Range;

/// A word found at a cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The word text.
    pub value: String,
    /// Character offset of the first character.
    pub start: usize,
    /// Character offset one past the last character.
    pub end: usize,
}

impl Token {
    /// The token span as a character range.
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of characters in the token.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Tokens are never empty; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Whether `c` can be part of a word.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// The word covering character `offset` in `text`, if any.
///
/// # Examples
///
/// ```
/// use hovercraft_core::tokenizer::token_at;
///
/// let text = "console.log(\"x\")";
/// let console = token_at(text, 0).unwrap();
/// assert_eq!(console.value, "console");
/// assert_eq!((console.start, console.end), (0, 7));
///
/// assert!(token_at(text, 7).is_none()); // the '.'
/// assert_eq!(token_at(text, 8).unwrap().value, "log");
/// ```
pub fn token_at(text: &str, offset: usize) -> Option<Token> {
    let (byte_pos, ch) = text.char_indices().nth(offset)?;
    if !is_word_char(ch) {
        return None;
    }

    let mut start_byte = byte_pos;
    let mut start = offset;
    for (idx, c) in text[..byte_pos].char_indices().rev() {
        if !is_word_char(c) {
            break;
        }
        start_byte = idx;
        start -= 1;
    }

    let mut end_byte = byte_pos;
    let mut end = offset;
    for (idx, c) in text[byte_pos..].char_indices() {
        if !is_word_char(c) {
            break;
        }
        end_byte = byte_pos + idx + c.len_utf8();
        end += 1;
    }

    Some(Token {
        value: text[start_byte..end_byte].to_string(),
        start,
        end,
    })
}
