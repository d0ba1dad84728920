//! Render pipelines used by the GPU driver.
//!
//! - `basic` draws scene geometry; one pipeline per distinct material state
//! - `overlay` draws screen-space rectangles on top of or below the scene, in call order

pub mod basic;
pub mod overlay;
