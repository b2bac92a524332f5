#![no_main]
use libfuzzer_sys::fuzz_target;

// First line is a query path, the rest is the document
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let (path, xml) = text.split_once('\n').unwrap_or(("", text));
    if let Ok(doc) = zxml::from_str(xml) {
        let tag = path.split('/').fold(doc.tag(), |tag, segment| {
            match segment.parse::<usize>() {
                Ok(index) => tag.get(index),
                Err(_) => tag.get(segment),
            }
        });
        let _ = (tag.value(), tag.tags(), tag.attributes(), tag.namespace());
    }
});
