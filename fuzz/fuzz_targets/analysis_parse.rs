#![no_main]

//! Fuzz target for analysis snapshot JSON parsing.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // Malformed snapshots must be rejected, not panic.
    let _ = serde_json::from_str::<codefix_types::receipt::AnalysisReceipt>(s);
    let _ = serde_json::from_str::<codefix_types::diagnostic::Diagnostic>(s);
    let _ = serde_json::from_str::<codefix_types::fix::FixAction>(s);
});
