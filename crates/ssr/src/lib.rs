//! SSR (Server-Side Rendering) transform
//!
//! This crate generates server output that concatenates string-part
//! templates with escaped values instead of building DOM nodes.
//!
//! ## Output Format
//!
//! ```js
//! // Input JSX
//! <div class={style()}>{count()}</div>
//!
//! // SSR Output
//! const $$_templ = ["<div class=\"", "\">", "</div>"];
//! ssr($$_templ, escape(mergeClasses(style()), true), escape(count()))
//! ```
//!
//! With `hydratable` set, a `<!$>` marker follows every insertion so a
//! hydrating client finds the same markers its own templates contain.

pub mod component;
pub mod element;
pub mod ir;
pub mod template;
pub mod transform;

pub use transform::*;
