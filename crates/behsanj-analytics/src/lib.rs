//! behsanj-analytics
//!
//! Pure aggregation over finalized survey records: satisfaction and NPS
//! scores, per-question breakdowns, the urgent follow-up worklist, and the
//! dashboard's filter → group → paginate pipeline. No I/O.

pub mod filter;
pub mod summary;

pub use filter::{DashboardFilter, FeedbackGroup, PAGE_SIZE, SourceFilter, TimeRange};
pub use summary::{Analytics, CategoryScore, QuestionComments, TextComment, YesNoStat, summarize};
