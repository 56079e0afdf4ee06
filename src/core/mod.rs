// Copyright @yucwang 2021

pub mod error;
pub mod geometry;
pub mod grid;
pub mod mesh;
pub mod normals;
pub mod rng;
pub mod scene;
pub mod scene_loader;
