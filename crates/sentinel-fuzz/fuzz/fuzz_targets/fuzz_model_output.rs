#![no_main]

use aixiv_insights::models::ThemeEntry;
use aixiv_insights::relay::normalize_model_output;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Either a parse error or a theme list; typed entries must re-serialize.
    if let Ok(resp) = normalize_model_output(text) {
        for entry in &resp.themes {
            if let ThemeEntry::Theme(theme) = entry {
                assert!(serde_json::to_value(theme).is_ok());
            }
        }
    }
});
