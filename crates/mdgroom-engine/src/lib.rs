pub mod escape;
pub mod fence;
pub mod io;
pub mod linefix;
pub mod nest;
pub mod process;
pub mod segment;

// Re-export key types for easier usage
pub use io::{FileOutcome, IoError, process_file, process_file_report, scan_markdown_files};
pub use nest::FenceNote;
pub use process::{ProcessReport, process_lines, process_lines_report};
pub use segment::{Segment, SegmentKind, scan};
