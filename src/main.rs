//! docgate entry point
//!
//! This is a minimal entrypoint that:
//! 1. Hands control to the library (via docgate::run)
//! 2. Prints errors to stderr
//! 3. Exits with non-zero on failure
//!
//! Configuration loading, store connection, and server setup all live in the
//! library so they can be exercised from tests.

#[tokio::main]
async fn main() {
    if let Err(e) = docgate::run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
