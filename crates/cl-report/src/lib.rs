// Text and JSON rendering of chord analyses for chordline.

pub mod listing;
pub mod parse;
pub mod report;
pub mod time;
pub mod timeline;

pub use report::Report;
pub use timeline::Timeline;
