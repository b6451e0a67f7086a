//! Driving external validation tools and interpreting what they print.

pub mod parser;
pub mod process;

pub use parser::{LineEvent, ParsedOutput, classify_line, parse_output, parse_output_bytes};
pub use process::{ToolCommand, ToolOutput, run_tool};
