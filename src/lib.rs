// Copyright @yucwang 2021

pub mod core;
pub mod io;
pub mod math;
pub mod perturb;
pub mod renderers;
pub mod sensors;
pub mod shapes;
pub mod textures;
