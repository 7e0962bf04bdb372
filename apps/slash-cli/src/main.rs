//! # Slash CLI Entry Point
//!
//! ```text
//! slash quote    --bill 500 --discount 10 --min-order 300
//! slash validate --bill 200 --min-order 300
//! slash pay      --bill 500 --vpa chaipoint@okaxis
//! slash session  --discount 10 --wallet 250 < events.jsonl
//! slash spin     [--campaign wheel.json] [--roll 42]
//! ```

fn main() {
    // The actual setup is in lib.rs for testability
    if let Err(err) = slash_cli::run() {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}
