#![doc = include_str!("../README.md")]

pub mod node;
pub mod views;

pub use node::{Anomaly, Node, NodeKind};
