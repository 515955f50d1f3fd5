#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(json) = jxml::xml_to_json(s) else {
        return;
    };
    // element names starting with the delimiter are reserved for marker keys
    if s.contains("<_") {
        return;
    }
    let xml = match jxml::json_to_xml(&json) {
        Ok(xml) => xml,
        Err(err) => panic!("json_to_xml rejected decoder output {json}: {err}"),
    };
    match jxml::xml_to_json(&xml) {
        Ok(again) => assert_eq!(again, json, "round trip changed {xml}"),
        Err(err) => panic!("xml_to_json rejected encoder output {xml}: {err}"),
    }
});
