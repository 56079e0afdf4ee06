// Copyright 2026 @TwoCookingMice

pub mod aabb;
pub mod constants;
pub mod transform;
