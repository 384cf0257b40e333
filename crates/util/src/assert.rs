/// Asserts that each of the needles appears in the haystack, in the given order.
#[macro_export]
macro_rules! assert_contains_inorder {
    ($haystack:expr, $needles:expr) => {{
        let haystack: &str = &$haystack;
        let mut remaining: &str = haystack;
        for needle in $needles.iter() {
            let needle: &str = needle;
            match remaining.find(needle) {
                Some(index) => remaining = &remaining[index + needle.len()..],
                None => panic!(
                    "'{}' was not found in order. content:\n{}",
                    needle, haystack
                ),
            }
        }
    }};
}
