//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `campusshare_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("campusshare_core ping={}", campusshare_core::ping());
    println!(
        "campusshare_core version={}",
        campusshare_core::core_version()
    );
}
