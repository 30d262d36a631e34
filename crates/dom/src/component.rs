//! Component transform
//! Handles <MyComponent /> -> createComponent(MyComponent, {...})

use common::emit::Emitted;
use common::jsx::ComponentNode;
use common::props::{component_segments, print_props};
use common::{EmitHost, Result};

use crate::transform::DomTransform;

/// Transform a component element
pub fn transform_component(t: &mut DomTransform<'_>, component: &ComponentNode) -> Result<Emitted> {
    t.use_helper("createComponent");
    let props = print_props(&component_segments(component), t)?;
    Ok(Emitted::mapped(
        format!("createComponent({}, {props})", component.tag),
        component.span.start,
    ))
}
