//! Stack frame data and stack text parsing
//!
//! Frames are produced from the textual stack attached to a thrown error.
//! Two layouts are understood: the Rust `std::backtrace` display format and
//! V8-style `at fn (file:line:col)` lines forwarded by script hosts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Method name used when a frame has location but no symbol
pub const UNKNOWN_METHOD: &str = "<unknown>";

/// A single parsed stack frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    /// Source file, if the frame carried a location
    pub file: Option<String>,
    /// 1-based line number
    pub line_number: Option<u32>,
    /// 1-based column
    pub column: Option<u32>,
    /// Function or symbol name
    pub method_name: String,
}

impl StackFrame {
    /// Create a frame with only a method name
    pub fn new(method_name: impl Into<String>) -> Self {
        Self {
            file: None,
            line_number: None,
            column: None,
            method_name: method_name.into(),
        }
    }

    /// Attach a source location
    pub fn at(mut self, file: impl Into<String>, line_number: u32, column: u32) -> Self {
        self.file = Some(file.into());
        self.line_number = Some(line_number);
        self.column = Some(column);
        self
    }

    /// Whether this frame belongs to the toolchain, a dependency or the
    /// unwinding machinery rather than application code
    pub fn is_internal(&self) -> bool {
        const INTERNAL_PREFIXES: [&str; 6] = [
            "std::",
            "core::",
            "alloc::",
            "__rust",
            "rust_begin_unwind",
            "dev_overlay::capture",
        ];

        if INTERNAL_PREFIXES
            .iter()
            .any(|prefix| self.method_name.starts_with(prefix))
        {
            return true;
        }

        match &self.file {
            Some(file) => {
                file.starts_with("/rustc/")
                    || file.contains("/.cargo/registry/")
                    || file.contains("\\.cargo\\registry\\")
                    || file.starts_with("node:")
            }
            None => false,
        }
    }

    /// Short `file:line:col` string for display
    pub fn location(&self) -> Option<String> {
        let file = self.file.as_deref()?;
        Some(match (self.line_number, self.column) {
            (Some(line), Some(column)) => format!("{}:{}:{}", file, line, column),
            (Some(line), None) => format!("{}:{}", file, line),
            _ => file.to_string(),
        })
    }
}

/// Why a stack text produced no frames
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackParseError {
    /// The stack text was empty or whitespace only
    #[error("stack text is empty")]
    Empty,
    /// No line of the stack text looked like a frame
    #[error("no stack frames recognised in {lines} line(s)")]
    NoFrames { lines: usize },
}

/// Turns stack text into frames
pub trait StackParser {
    /// Parse the stack text of a thrown error
    fn parse(&self, stack: &str) -> Result<Vec<StackFrame>, StackParseError>;
}

/// Parser for Rust backtraces and V8-style stacks
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStackParser;

impl StackParser for DefaultStackParser {
    fn parse(&self, stack: &str) -> Result<Vec<StackFrame>, StackParseError> {
        if stack.trim().is_empty() {
            return Err(StackParseError::Empty);
        }

        let mut frames: Vec<StackFrame> = Vec::new();
        // Index of a Rust symbol frame still waiting for its `at` line
        let mut pending: Option<usize> = None;
        let mut saw_rust_index = false;
        let mut lines = 0;

        for raw in stack.lines() {
            lines += 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(symbol) = strip_frame_index(line) {
                saw_rust_index = true;
                frames.push(StackFrame::new(symbol));
                pending = Some(frames.len() - 1);
                continue;
            }

            if let Some(rest) = line.strip_prefix("at ") {
                let rest = rest.trim();
                if let Some((method, location)) = split_v8_call(rest) {
                    let mut frame = StackFrame::new(method);
                    apply_location(&mut frame, location);
                    frames.push(frame);
                    pending = None;
                    continue;
                }

                match pending.take() {
                    Some(index) if frames[index].file.is_none() => {
                        apply_location(&mut frames[index], rest);
                    }
                    _ => {
                        let mut frame = StackFrame::new(UNKNOWN_METHOD);
                        apply_location(&mut frame, rest);
                        frames.push(frame);
                    }
                }
                continue;
            }

            // Inlined symbols share the index of the frame above them
            if saw_rust_index && raw.starts_with(char::is_whitespace) {
                frames.push(StackFrame::new(line));
                pending = Some(frames.len() - 1);
            }
        }

        if frames.is_empty() {
            return Err(StackParseError::NoFrames { lines });
        }
        Ok(frames)
    }
}

/// `"12: symbol"` -> `Some("symbol")`
fn strip_frame_index(line: &str) -> Option<&str> {
    let (index, symbol) = line.split_once(':')?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let symbol = symbol.trim();
    if symbol.is_empty() {
        None
    } else {
        Some(symbol)
    }
}

/// `"fn (file:1:2)"` -> `Some(("fn", "file:1:2"))`
fn split_v8_call(rest: &str) -> Option<(&str, &str)> {
    let inner = rest.strip_suffix(')')?;
    let open = inner.rfind(" (")?;
    let method = inner[..open].trim();
    let location = &inner[open + 2..];
    if method.is_empty() {
        None
    } else {
        Some((method, location))
    }
}

fn apply_location(frame: &mut StackFrame, location: &str) {
    let location = location.trim();
    let mut parts = location.rsplitn(3, ':');
    let last = parts.next();
    let middle = parts.next();
    let head = parts.next();

    match (head, middle.and_then(parse_num), last.and_then(parse_num)) {
        (Some(file), Some(line), Some(column)) => {
            frame.file = Some(file.to_string());
            frame.line_number = Some(line);
            frame.column = Some(column);
        }
        _ => match location.rsplit_once(':') {
            Some((file, line)) if parse_num(line).is_some() => {
                frame.file = Some(file.to_string());
                frame.line_number = parse_num(line);
            }
            _ => frame.file = Some(location.to_string()),
        },
    }
}

fn parse_num(text: &str) -> Option<u32> {
    text.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUST_BACKTRACE: &str = "   0: std::backtrace::Backtrace::force_capture
             at /rustc/abc123/library/std/src/backtrace.rs:312:9
   1: demo::render_panel
             at ./src/app.rs:88:13
      demo::render_panel::{{closure}}
             at ./src/app.rs:91:17
   2: main
";

    #[test]
    fn test_parse_rust_backtrace() {
        let frames = DefaultStackParser.parse(RUST_BACKTRACE).unwrap();

        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0].method_name, "std::backtrace::Backtrace::force_capture");
        assert_eq!(frames[1], StackFrame::new("demo::render_panel").at("./src/app.rs", 88, 13));
        assert_eq!(frames[2].method_name, "demo::render_panel::{{closure}}");
        assert_eq!(frames[2].line_number, Some(91));
        assert_eq!(frames[3].method_name, "main");
        assert!(frames[3].file.is_none());
    }

    #[test]
    fn test_parse_v8_stack() {
        let stack = "Error: boom
    at Page (webpack-internal:///./app/page.tsx:12:9)
    at /srv/app/chunk.js:4:1";
        let frames = DefaultStackParser.parse(stack).unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(
            frames[0],
            StackFrame::new("Page").at("webpack-internal:///./app/page.tsx", 12, 9)
        );
        assert_eq!(frames[1].method_name, UNKNOWN_METHOD);
        assert_eq!(frames[1].file.as_deref(), Some("/srv/app/chunk.js"));
        assert_eq!(frames[1].column, Some(1));
    }

    #[test]
    fn test_parse_location_without_column() {
        let frames = DefaultStackParser.parse("    at render (src/view.rs:40)").unwrap();
        assert_eq!(frames[0].line_number, Some(40));
        assert_eq!(frames[0].column, None);
        assert_eq!(frames[0].location().as_deref(), Some("src/view.rs:40"));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(DefaultStackParser.parse("  \n "), Err(StackParseError::Empty));
    }

    #[test]
    fn test_parse_unrecognised_text() {
        let result = DefaultStackParser.parse("disabled backtrace");
        assert_eq!(result, Err(StackParseError::NoFrames { lines: 1 }));
    }

    #[test]
    fn test_internal_frames() {
        assert!(StackFrame::new("core::panicking::panic_fmt").is_internal());
        assert!(StackFrame::new("foo")
            .at("/rustc/abc/library/core/src/option.rs", 1, 1)
            .is_internal());
        assert!(!StackFrame::new("demo::render_panel")
            .at("./src/app.rs", 88, 13)
            .is_internal());
    }
}
