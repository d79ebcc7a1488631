//! Core infrastructure shared by the unpack and package steps

pub mod fs;
pub mod output;
