//! Template renderer for the drawing page.
//!
//! The page is a single HTML template (`studio/assets/draw.html`) with
//! placeholder tokens like `{{TOKEN}}`, loaded at compile time.

const TEMPLATE: &str = include_str!("assets/draw.html");

/// Renders the drawing page for the served model.
pub fn render_draw_page(model_name: &str, layers: &[usize]) -> String {
    let layers: Vec<String> = layers.iter().map(|n| n.to_string()).collect();
    let html = TEMPLATE
        .replace("{{MODEL_NAME}}", &html_escape(model_name))
        .replace("{{LAYERS}}", &layers.join(" &rarr; "));
    blank_remaining(html)
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Replaces any `{{TOKEN}}` that wasn't already substituted with an empty
/// string.
fn blank_remaining(mut html: String) -> String {
    while let Some(start) = html.find("{{") {
        if let Some(end) = html[start..].find("}}") {
            let abs_end = start + end + 2;
            html.replace_range(start..abs_end, "");
        } else {
            break;
        }
    }
    html
}
