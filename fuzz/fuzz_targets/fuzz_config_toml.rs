#![no_main]

use folio_core::FolioConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 4096 {
        return;
    }

    // Parsing, validation and derived configs must never panic.
    for parsed in [FolioConfig::from_toml_str(text), FolioConfig::from_json_str(text)] {
        let Ok(config) = parsed else {
            continue;
        };
        if config.validate().is_empty() {
            let _resolver = config.to_resolver_config();
            let _observer = config.to_observer_options();
        }
        let line = config.to_jsonl();
        assert!(!line.contains('\n'), "jsonl record spans lines");
    }
});
