#![allow(dead_code)]

pub mod portfolio_testkit;
