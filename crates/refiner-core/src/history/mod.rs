//! Analysis history domain module.

mod model;

pub use model::HistoryRecord;
