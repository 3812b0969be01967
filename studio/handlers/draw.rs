use std::io::Cursor;
use tiny_http::Response;

use crate::render::render_draw_page;
use crate::state::StudioState;

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

pub fn handle_get(state: &StudioState) -> Response<Cursor<Vec<u8>>> {
    let page = render_draw_page(&state.model_name, state.network.layer_sizes());
    crate::routes::html_response(page)
}
