//! Classic snake on a square grid: a deterministic per-tick engine, a
//! persisted high score, and two macroquad renderers.

pub mod config;
pub mod game;
pub mod input;
pub mod render;
pub mod storage;
pub mod ticker;
