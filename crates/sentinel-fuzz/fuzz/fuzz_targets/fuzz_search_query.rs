#![no_main]

use aixiv_insights::models::SearchRequest;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(request) = serde_urlencoded::from_bytes::<SearchRequest>(data) {
        // Accepted requests always map to the three mandatory parameters.
        if request.validate().is_ok() {
            assert!(request.upstream_params().len() >= 3);
        }
    }
});
