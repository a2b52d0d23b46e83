use crate::session::test_config::TestConfiguration;

/// Builtin exam practice configurations, in menu order.
pub fn builtin_tests() -> Vec<TestConfiguration> {
    vec![
        TestConfiguration::new("General Practice", 300, "general").with_criteria(25, 85),
        TestConfiguration::new("One Minute Sprint", 60, "general").with_criteria(30, 90),
        TestConfiguration::new("Data Entry Operator", 900, "data-entry").with_criteria(35, 90),
        TestConfiguration::new("Clerk Typing Test", 600, "clerk").with_criteria(30, 92),
        TestConfiguration::new("Court Typist", 600, "legal").with_criteria(40, 95),
    ]
}

/// Look a test up by name, case-insensitively, among `extra` first and then
/// the builtin list.
pub fn find_test(name: &str, extra: &[TestConfiguration]) -> Option<TestConfiguration> {
    extra
        .iter()
        .cloned()
        .chain(builtin_tests())
        .find(|t| t.test_name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_unique() {
        let tests = builtin_tests();
        for (i, a) in tests.iter().enumerate() {
            for b in &tests[i + 1..] {
                assert_ne!(a.test_name, b.test_name);
            }
        }
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let found = find_test("court typist", &[]).unwrap();
        assert_eq!(found.qualification_criteria.min_wpm, 40);
    }

    #[test]
    fn test_extra_shadows_builtin() {
        let custom = TestConfiguration::new("Court Typist", 120, "legal").with_criteria(50, 97);
        let found = find_test("Court Typist", &[custom]).unwrap();
        assert_eq!(found.time_limit, 120);
    }

    #[test]
    fn test_unknown_test() {
        assert!(find_test("nope", &[]).is_none());
    }
}
