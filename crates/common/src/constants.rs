//! Static tables used by the template compiler

use phf::{phf_map, phf_set};

/// Elements that never carry children or a closing tag
pub static VOID_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
};

/// SVG elements. A template rooted at one of these (other than `svg`
/// itself) must be parsed inside an `<svg>` wrapper at runtime.
pub static SVG_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "svg", "animate", "animateMotion", "animateTransform", "circle", "clipPath",
    "defs", "desc", "ellipse", "feBlend", "feColorMatrix", "feComposite",
    "feFlood", "feGaussianBlur", "feMerge", "feMergeNode", "feOffset",
    "filter", "foreignObject", "g", "image", "line", "linearGradient",
    "marker", "mask", "metadata", "path", "pattern", "polygon", "polyline",
    "radialGradient", "rect", "stop", "switch", "symbol", "text", "textPath",
    "tspan", "use", "view",
};

/// Events that bubble and are safe to handle with one document-level listener
pub static DELEGATED_EVENTS: phf::Set<&'static str> = phf_set! {
    "beforeinput", "click", "dblclick", "contextmenu", "focusin", "focusout",
    "input", "keydown", "keyup", "mousedown", "mousemove", "mouseout",
    "mouseover", "mouseup", "pointerdown", "pointermove", "pointerout",
    "pointerover", "pointerup", "touchend", "touchmove", "touchstart",
};

/// Names written through element properties rather than attributes
pub static PROPERTIES: phf::Set<&'static str> = phf_set! {
    "value", "checked", "selected", "muted", "multiple", "indeterminate",
    "innerHTML", "textContent", "innerText",
};

/// Properties whose initial value is expressible as a markup attribute
pub static REFLECTED_PROPERTIES: phf::Set<&'static str> = phf_set! {
    "value", "checked", "selected", "muted", "multiple",
};

/// Boolean attributes: present means true, absent means false
pub static BOOLEANS: phf::Set<&'static str> = phf_set! {
    "allowfullscreen", "async", "autofocus", "autoplay", "checked", "controls",
    "default", "disabled", "formnovalidate", "hidden", "indeterminate", "inert",
    "ismap", "loop", "multiple", "muted", "nomodule", "novalidate", "open",
    "playsinline", "readonly", "required", "reversed", "seamless", "selected",
};

/// React-style attribute names mapped to their markup names
pub static ALIASES: phf::Map<&'static str, &'static str> = phf_map! {
    "className" => "class",
    "htmlFor" => "for",
};

/// CSS properties that take plain numbers
pub static UNITLESS_STYLES: phf::Set<&'static str> = phf_set! {
    "animation-iteration-count", "aspect-ratio", "border-image-outset",
    "border-image-slice", "border-image-width", "box-flex", "box-flex-group",
    "box-ordinal-group", "column-count", "columns", "fill-opacity", "flex",
    "flex-grow", "flex-negative", "flex-order", "flex-positive", "flex-shrink",
    "flood-opacity", "font-weight", "grid-column", "grid-column-end",
    "grid-column-span", "grid-column-start", "grid-row", "grid-row-end",
    "grid-row-span", "grid-row-start", "line-clamp", "line-height", "opacity",
    "order", "orphans", "stop-opacity", "stroke-dasharray", "stroke-dashoffset",
    "stroke-miterlimit", "stroke-opacity", "stroke-width", "tab-size", "widows",
    "z-index", "zoom",
};

/// Named character references decoded in JSX text and attribute strings
pub static HTML_ENTITIES: phf::Map<&'static str, char> = phf_map! {
    "amp" => '&',
    "lt" => '<',
    "gt" => '>',
    "quot" => '"',
    "apos" => '\'',
    "nbsp" => '\u{a0}',
    "copy" => '\u{a9}',
    "reg" => '\u{ae}',
    "hellip" => '\u{2026}',
    "mdash" => '\u{2014}',
    "ndash" => '\u{2013}',
    "laquo" => '\u{ab}',
    "raquo" => '\u{bb}',
    "middot" => '\u{b7}',
    "times" => '\u{d7}',
    "bull" => '\u{2022}',
};

/// Comment injected by the DOM target to split adjacent dynamic children
pub const DOM_MARKER: &str = "<!>";

/// Comment the hydration walker seeks to locate insertion points
pub const HYDRATION_MARKER: &str = "<!$>";

/// Default module the runtime helpers are imported from
pub const DEFAULT_MODULE: &str = "templ/runtime";
