// Copyright @yucwang 2026

pub mod appearance;
pub mod image;
