use std::path::PathBuf;

use mdes_store::SourceDocuments;

/// The fixture document tree, laid out like a real docs directory.
#[allow(dead_code)]
pub fn fixture_base() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/doc-base")
}

/// Standard-location documents for `version` under the fixture tree.
#[allow(dead_code)]
pub fn fixture_documents(version: &str) -> SourceDocuments {
    SourceDocuments::get(version)
        .expect("supported version")
        .with_base(fixture_base())
}
