#![no_main]

use aixiv_insights::models::ThemeExtractionRequest;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(request) = serde_json::from_slice::<ThemeExtractionRequest>(data) {
        let _ = request.requested_model();
    }
});
