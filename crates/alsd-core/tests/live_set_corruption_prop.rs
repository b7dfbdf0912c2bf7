use alsd_core::{
    Document,
    fixtures::{demo_live_set_xml, gzip_bytes},
    load,
};
use proptest::prelude::*;

fn no_panic_load(path: &std::path::Path) -> bool {
    std::panic::catch_unwind(|| {
        let _ = load(path);
    })
    .is_ok()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn random_live_set_bytes_do_not_panic(raw in prop::collection::vec(any::<u8>(), 0..4096)) {
        let temp = tempfile::tempdir().expect("tempdir should be creatable");
        let path = temp.path().join("corrupt_random.als");
        std::fs::write(&path, raw).expect("writing random payload should work");
        prop_assert!(no_panic_load(&path));
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn truncated_live_sets_do_not_panic(prefix_len in 0usize..4096usize) {
        let temp = tempfile::tempdir().expect("tempdir should be creatable");
        let path = temp.path().join("corrupt_truncated.als");

        let mut payload = gzip_bytes(&demo_live_set_xml()).expect("compressing should work");
        let truncated_len = prefix_len.min(payload.len());
        payload.truncate(truncated_len);
        std::fs::write(&path, payload).expect("writing truncated payload should work");

        prop_assert!(no_panic_load(&path));
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn mutated_xml_does_not_panic(index in 0usize..16384usize, delta in any::<u8>()) {
        let mut payload = demo_live_set_xml().into_bytes();
        let target = index % payload.len();
        payload[target] ^= delta.max(1);
        let Ok(xml) = String::from_utf8(payload) else {
            return Ok(());
        };
        let result = std::panic::catch_unwind(|| {
            let _ = Document::from_xml(xml).project();
        });
        prop_assert!(result.is_ok());
    }
}
