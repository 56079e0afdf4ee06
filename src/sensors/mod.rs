// Copyright @yucwang 2026

pub mod camera;
pub mod flight;
pub mod perspective;
