// Copyright @yucwang 2026

pub mod grid;
pub mod icosahedron;
pub mod logo;
pub mod sphere;
