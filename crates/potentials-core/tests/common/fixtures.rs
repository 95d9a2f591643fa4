//! Test fixture loading utilities

use std::path::{Path, PathBuf};

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a fixture file as a string
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

/// Load a cached BibTeX fixture
#[allow(dead_code)]
pub fn load_bibtex_fixture(name: &str) -> String {
    load_fixture(&format!("bibtex/{}", name))
}

/// Load a potential record fixture
#[allow(dead_code)]
pub fn load_potential_fixture(name: &str) -> String {
    load_fixture(&format!("potential/{}", name))
}

/// Load a mock resolver or mirror response
#[allow(dead_code)]
pub fn load_response_fixture(name: &str) -> String {
    load_fixture(&format!("responses/{}", name))
}

/// Copy a fixture into a cache directory, creating it if needed
#[allow(dead_code)]
pub fn install_fixture(name: &str, dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    let file_name = Path::new(name).file_name().unwrap();
    std::fs::copy(fixture_path(name), dir.join(file_name)).unwrap();
}
