pub mod component;
pub mod element;
pub mod ir;
pub mod output;
pub mod template;
pub mod transform;
pub mod walker;

pub use transform::*;
