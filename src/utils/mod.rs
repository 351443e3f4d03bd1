//! Utility functions: image I/O helpers and logging setup.

pub mod image;

pub use image::{create_rgb_image, dynamic_to_rgb, load_image, save_png};

/// Initializes the tracing subscriber for logging.
///
/// Sets up the tracing subscriber with an environment filter and formatting
/// layer. Typically called once at the start of an application.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
