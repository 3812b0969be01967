use std::io::{Cursor, Read};

use log::{debug, warn};
use serde::Deserialize;
use tiny_http::{Request, Response};

use digit_scanner::canvas::{guess_input, DigitCanvas, Guess, GRID_SIDE};
use digit_scanner::data::image_bytes_to_input;

use crate::state::StudioState;

/// Largest request body accepted, in bytes.
const MAX_BODY: u64 = 4 * 1024 * 1024;

/// Body of `POST /guess`: the pointer positions recorded while drawing, in
/// pad coordinates (10 units per grid cell).
#[derive(Debug, Deserialize)]
struct StrokeRequest {
    points: Vec<(f64, f64)>,
}

// ---------------------------------------------------------------------------
// POST /guess
// ---------------------------------------------------------------------------

/// Replays the recorded strokes on a fresh canvas and guesses the digit.
pub fn handle_points(request: &mut Request, state: &StudioState) -> Response<Cursor<Vec<u8>>> {
    let mut body = String::new();
    if let Err(e) = request.as_reader().take(MAX_BODY).read_to_string(&mut body) {
        return crate::routes::bad_request(&format!("cannot read body: {}", e));
    }
    let strokes: StrokeRequest = match serde_json::from_str(&body) {
        Ok(strokes) => strokes,
        Err(e) => return crate::routes::bad_request(&format!("invalid stroke list: {}", e)),
    };

    let mut canvas = DigitCanvas::new();
    for &(x, y) in &strokes.points {
        canvas.stroke(x, y);
    }
    debug!("guessing from {} stroke points", strokes.points.len());

    respond_guess(canvas.guess(&state.network))
}

// ---------------------------------------------------------------------------
// POST /guess/image
// ---------------------------------------------------------------------------

/// Guesses the digit in an uploaded picture (raw PNG/JPEG/BMP/GIF body).
/// `?invert` marks dark ink on a light background.
pub fn handle_image(request: &mut Request, state: &StudioState) -> Response<Cursor<Vec<u8>>> {
    let invert = query_flag(request.url(), "invert");
    let mut bytes = Vec::new();
    if let Err(e) = request.as_reader().take(MAX_BODY).read_to_end(&mut bytes) {
        return crate::routes::bad_request(&format!("cannot read body: {}", e));
    }
    if bytes.is_empty() {
        return crate::routes::bad_request("no image was uploaded");
    }

    let side = GRID_SIDE as u32;
    let input = match image_bytes_to_input(&bytes, side, side, invert) {
        Ok(input) => input,
        Err(e) => return crate::routes::bad_request(&e.to_string()),
    };

    respond_guess(guess_input(&state.network, &input))
}

/// True when the query string carries `name`, bare or with a value other
/// than `0`/`false`.
fn query_flag(url: &str, name: &str) -> bool {
    let query = match url.split_once('?') {
        Some((_, query)) => query,
        None => return false,
    };
    query.split('&').any(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        key == name && value != "0" && !value.eq_ignore_ascii_case("false")
    })
}

fn respond_guess(guess: Result<Guess, digit_scanner::FnnError>) -> Response<Cursor<Vec<u8>>> {
    match guess {
        Ok(guess) => match serde_json::to_string(&guess) {
            Ok(json) => crate::routes::json_response(json),
            Err(e) => crate::routes::bad_request(&e.to_string()),
        },
        Err(e) => {
            warn!("guess failed: {}", e);
            crate::routes::bad_request(&e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::query_flag;

    #[test]
    fn invert_flag_is_read_from_the_query() {
        assert!(query_flag("/guess/image?invert", "invert"));
        assert!(query_flag("/guess/image?size=28&invert=1", "invert"));
        assert!(!query_flag("/guess/image?invert=false", "invert"));
        assert!(!query_flag("/guess/image", "invert"));
        assert!(!query_flag("/guess/image?noinvert", "invert"));
        assert!(!query_flag("/invert/image", "invert"));
    }
}
