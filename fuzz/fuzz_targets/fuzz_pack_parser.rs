#![no_main]

use libfuzzer_sys::fuzz_target;
use marker_pack_editor::xml::{parse_pack_document, render_document, rewrite_pois_section};
use marker_pack_editor::FileKey;

fuzz_target!(|data: &[u8]| {
    let key = FileKey::new("fuzz.xml");
    let Ok(mut parsed) = parse_pack_document(&key, data) else {
        return;
    };

    // Gelesene Dokumente müssen sich immer wieder schreiben lassen
    if rewrite_pois_section(&mut parsed.document, parsed.markers.iter(), &parsed.unmanaged, "  ").is_ok() {
        let bytes = render_document(&parsed.document);
        let _ = parse_pack_document(&key, &bytes);
    }
});
