//! wraplite library
//!
//! Core library for the wraplite desktop wrapper: a thin shell around a
//! third-party web application that throttles its resource usage based on
//! window focus and visibility.

pub mod agent;
pub mod app;
pub mod controller;
pub mod ipc;
pub mod shell;
pub mod storage;
pub mod system;
