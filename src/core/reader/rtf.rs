//! `.rtf` text extraction.
//!
//! A small RTF reader: it tracks group nesting, drops ignorable
//! destinations (font and colour tables, stylesheets, document info,
//! pictures, `{\*...}` groups) and turns the remaining control words
//! into plain text. `\'hh` escapes are read as Windows-1252 and
//! `\uN` as a UTF-16 code unit followed by `\ucN` fallback characters.

use std::fs;
use std::path::Path;

use crate::core::error::{ChunkwiseError, Result};
use crate::core::reader::DocumentParser;

/// Destinations whose content is never text
const IGNORED_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "stylesheet",
    "info",
    "pict",
    "object",
    "header",
    "headerl",
    "headerr",
    "headerf",
    "footer",
    "footerl",
    "footerr",
    "footerf",
    "listtable",
    "listoverridetable",
    "rsidtbl",
    "generator",
    "xmlnstbl",
    "themedata",
    "colorschememapping",
    "latentstyles",
    "datastore",
    "fldinst",
    "filetbl",
    "revtbl",
];

/// Code points for Windows-1252 bytes 0x80..=0x9F
const CP1252_HIGH: [u32; 32] = [
    0x20AC, 0x81, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, 0x02C6, 0x2030, 0x0160, 0x2039,
    0x0152, 0x8D, 0x017D, 0x8F, 0x90, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014,
    0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0x9D, 0x017E, 0x0178,
];

/// Parser for Rich Text Format documents
#[derive(Debug, Default, Clone, Copy)]
pub struct RtfParser;

impl RtfParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParser for RtfParser {
    fn extensions(&self) -> &'static [&'static str] {
        &["rtf"]
    }

    fn parse(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path)?;
        let raw = String::from_utf8_lossy(&bytes);
        rtf_to_text(&raw).map_err(|message| ChunkwiseError::parse(path, message))
    }
}

#[derive(Debug, Clone, Copy)]
struct GroupState {
    ignorable: bool,
    /// Fallback characters following each `\uN`
    uc: usize,
}

/// Convert RTF source to plain text.
///
/// Returns an error message when the input has no `{\rtf` header.
pub fn rtf_to_text(raw: &str) -> std::result::Result<String, String> {
    if !raw.trim_start().starts_with("{\\rtf") {
        return Err("missing {\\rtf header".to_string());
    }

    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len() / 2);
    let mut stack: Vec<GroupState> = Vec::new();
    let mut state = GroupState {
        ignorable: false,
        uc: 1,
    };
    // Fallback characters still to skip after a \uN
    let mut skip = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '{' => {
                stack.push(state);
                skip = 0;
                i += 1;
            }
            '}' => {
                // Unbalanced closing braces are tolerated
                if let Some(prev) = stack.pop() {
                    state = prev;
                }
                skip = 0;
                i += 1;
            }
            '\\' => {
                i += 1;
                let Some(&next) = chars.get(i) else { break };

                if next.is_ascii_alphabetic() {
                    let word_start = i;
                    while i < chars.len() && chars[i].is_ascii_alphabetic() {
                        i += 1;
                    }
                    let word: String = chars[word_start..i].iter().collect();

                    let param_start = i;
                    if i < chars.len() && chars[i] == '-' {
                        i += 1;
                    }
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                    let param: Option<i32> = if i > param_start {
                        chars[param_start..i]
                            .iter()
                            .collect::<String>()
                            .parse()
                            .ok()
                    } else {
                        None
                    };

                    // A single space delimits the control word
                    if i < chars.len() && chars[i] == ' ' {
                        i += 1;
                    }

                    if IGNORED_DESTINATIONS.contains(&word.as_str()) {
                        state.ignorable = true;
                        continue;
                    }

                    match word.as_str() {
                        "uc" => state.uc = param.unwrap_or(1).max(0) as usize,
                        "u" => {
                            if let Some(n) = param {
                                let code = (if n < 0 { n + 65536 } else { n }) as u32;
                                if !state.ignorable {
                                    out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
                                }
                                skip = state.uc;
                            }
                        }
                        _ if state.ignorable => {}
                        _ => {
                            if let Some(text) = control_word_text(&word) {
                                out.push_str(text);
                            }
                        }
                    }
                } else {
                    i += 1;
                    match next {
                        '*' => state.ignorable = true,
                        '\'' => {
                            let hex: String = chars.iter().skip(i).take(2).collect();
                            i += hex.chars().count();
                            if skip > 0 {
                                skip -= 1;
                            } else if !state.ignorable {
                                if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                                    out.push(cp1252_char(byte));
                                }
                            }
                        }
                        '\\' | '{' | '}' if !state.ignorable => out.push(next),
                        '~' if !state.ignorable => out.push('\u{00A0}'),
                        '_' if !state.ignorable => out.push('\u{2011}'),
                        '\n' | '\r' if !state.ignorable => out.push('\n'),
                        // \- optional hyphen and unknown control symbols
                        _ => {}
                    }
                }
            }
            '\r' | '\n' => i += 1,
            _ => {
                if skip > 0 {
                    skip -= 1;
                } else if !state.ignorable {
                    out.push(c);
                }
                i += 1;
            }
        }
    }

    Ok(out)
}

/// Text produced by a control word outside ignorable groups
fn control_word_text(word: &str) -> Option<&'static str> {
    let text = match word {
        "par" | "line" | "row" => "\n",
        "sect" | "page" => "\n\n",
        "tab" | "cell" => "\t",
        "emdash" => "\u{2014}",
        "endash" => "\u{2013}",
        "emspace" | "enspace" | "qmspace" => " ",
        "bullet" => "\u{2022}",
        "lquote" => "\u{2018}",
        "rquote" => "\u{2019}",
        "ldblquote" => "\u{201C}",
        "rdblquote" => "\u{201D}",
        _ => return None,
    };
    Some(text)
}

fn cp1252_char(byte: u8) -> char {
    let code = match byte {
        0x80..=0x9F => CP1252_HIGH[(byte - 0x80) as usize],
        _ => byte as u32,
    };
    char::from_u32(code).unwrap_or('\u{FFFD}')
}
