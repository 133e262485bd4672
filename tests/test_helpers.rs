// ==========================================
// Shared integration-test helpers
// ==========================================
// Pipeline construction and temp files for file-backed tests
// ==========================================

#![allow(dead_code)]

use offshore_logistics::{logging, OffshorePipeline};
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

/// Built-in catalog, default rules, debug logging to the test writer.
pub fn pipeline() -> OffshorePipeline {
    logging::init_test();
    OffshorePipeline::with_builtin_catalog().expect("built-in catalog must load")
}

/// Write `content` to a temp file with the given suffix (".csv", ".json").
pub fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

/// Small catalog with one facility whose pools overlap on LC "700".
pub const OVERLAP_CATALOG: &str = r#"{
    "facilities": [
        {
            "facility_id": "alpha",
            "display_name": "Alpha Integrated",
            "facility_type": "integrated",
            "drilling_lcs": ["700", "701"],
            "production_lcs": ["700", "702"]
        },
        {
            "facility_id": "bravo",
            "display_name": "Bravo Rig",
            "facility_type": "drilling-rig",
            "drilling_lcs": ["800"]
        }
    ],
    "vessels": [
        { "vessel_id": "swift", "name": "Swift Runner", "in_fleet": true, "vessel_class": "psv" }
    ]
}"#;
