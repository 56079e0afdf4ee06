// Copyright @yucwang 2026

pub mod fault;
pub mod jitter;
pub mod weathering;
