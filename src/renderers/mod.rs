// Copyright @yucwang 2021

pub mod frame_loop;
pub mod headless;
pub mod renderer;
pub mod shader;
pub mod uniforms;
