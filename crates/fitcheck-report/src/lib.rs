//! fitcheck-report: HTML and Markdown renderers for assessment reports.

pub mod html;
pub mod markdown;
