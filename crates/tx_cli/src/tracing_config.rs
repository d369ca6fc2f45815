//! Diagnostic logging for `txc`.
//!
//! The subscriber is installed only when `TX_LOG` (or `RUST_LOG`) is set.
//! Both take `RUST_LOG` filter syntax, for example `TX_LOG=tx_rewrite=trace`
//! to see every deferred target and edit. Output goes to stderr so it never
//! mixes with code printed on stdout.

use tracing_subscriber::EnvFilter;

fn build_filter() -> EnvFilter {
    match std::env::var("TX_LOG") {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::from_default_env(),
    }
}

pub fn init_tracing() {
    if std::env::var("TX_LOG").is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr)
        .init();
}
