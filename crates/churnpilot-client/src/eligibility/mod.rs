//! Rolling 24-month application window ("5/24"), recomputed on every call.

pub mod five_twenty_four;
pub mod policy;
