//! Build-time field manifest generator.
//!
//! This crate scans your source files for `#[derive(Tagged)]` structs and
//! writes their fields and parsed tags to a JSON manifest, for tools that
//! need the mapping without linking against the crate.
//!
//! # Example
//!
//! In your `build.rs`:
//!
//! ```ignore
//! fn main() {
//!     fieldtags_build::generate_manifest()
//!         .scan_path("src/")
//!         .output_file(format!("{}/fields.json", std::env::var("OUT_DIR").unwrap()))
//!         .skip_untagged(true)
//!         .run()
//!         .expect("Failed to generate field manifest");
//!
//!     println!("cargo:rerun-if-changed=src/");
//! }
//! ```

mod generator;
mod scanner;

pub use generator::ManifestGenerator;
pub use scanner::{ScannedRecord, scan_directory, scan_file, scan_source};

/// Create a new manifest generator with default settings.
pub fn generate_manifest() -> ManifestGenerator {
    ManifestGenerator::new()
}
