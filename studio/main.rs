/// digit-scanner Studio
///
/// A browser drawing pad for a trained digit network. Draw a digit with the
/// mouse, press `g` to guess it and `r` to clear the pad.
///
/// Run with:
///   cargo run --bin studio --release -- --model net.txt
/// Then open http://127.0.0.1:7878
mod state;
mod render;
mod routes;
mod handlers;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};
use tiny_http::Server;

use digit_scanner::persist;
use state::StudioState;

#[derive(Debug, Parser)]
#[command(name = "studio", about = "Drawing pad for a trained digit network")]
struct Args {
    /// Trained network (.json or text layout), 784 inputs
    #[arg(long)]
    model: PathBuf,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:7878")]
    addr: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let network = match persist::load(&args.model) {
        Ok(network) => network,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let state = match StudioState::new(network, args.model.display().to_string()) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::http(&args.addr) {
        Ok(server) => server,
        Err(e) => {
            error!("failed to bind {}: {}", args.addr, e);
            std::process::exit(1);
        }
    };
    info!("studio listening on http://{}", args.addr);

    // Each request is dispatched on its own thread; the network is only
    // read, so the handlers share it without locking.
    for request in server.incoming_requests() {
        let state_clone = state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
}
