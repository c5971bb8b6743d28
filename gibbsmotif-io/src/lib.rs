#![doc = include_str!("../README.md")]

extern crate gibbsmotif;

pub mod error;
pub mod sequences;
pub mod table;
