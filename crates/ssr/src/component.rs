//! SSR component transform
//!
//! Components render through `createComponent` on the server as well. Props
//! keep their getters so reactive values are read while rendering.

use common::emit::Emitted;
use common::jsx::ComponentNode;
use common::props::{component_segments, print_props};
use common::{EmitHost, Result};

use crate::transform::SsrTransform;

pub fn transform_component(t: &mut SsrTransform<'_>, component: &ComponentNode) -> Result<Emitted> {
    t.use_helper("createComponent");
    let props = print_props(&component_segments(component), t)?;
    Ok(Emitted::mapped(format!("createComponent({}, {props})", component.tag), component.span.start))
}
