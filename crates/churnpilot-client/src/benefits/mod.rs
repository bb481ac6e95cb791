//! Period resolution, per-credit usage tracking, reminder snoozes and card
//! deadlines. Every function here is pure given its inputs and `today`.

pub mod date;
pub mod deadlines;
pub mod period;
pub mod usage;
