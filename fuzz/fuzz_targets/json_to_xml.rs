#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(xml) = jxml::json_to_xml(s) {
            // everything the encoder writes must parse back
            assert!(jxml::xml_to_json(&xml).is_ok(), "unparseable output: {xml}");
        }
    }
});
