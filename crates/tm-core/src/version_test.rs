use super::*;

#[test]
fn test_zero_version() {
    let zero = Version::zero();
    assert!(zero.is_zero());
    assert_eq!(zero, "0");
    assert!(!Version::try_new("20090212112104").unwrap().is_zero());
}

#[test]
fn test_empty_is_rejected() {
    assert!(Version::try_new("").is_none());
    assert!(Label::try_new("   ").is_none());
    assert!(serde_json::from_str::<Label>("\"\"").is_err());
}

#[test]
fn test_surrounding_whitespace_is_trimmed() {
    assert_eq!(Label::try_new(" release_1 \n").unwrap(), "release_1");
}

#[test]
fn test_ordering_is_lexicographic() {
    let a: Version = "20090212112104".parse().unwrap();
    let b: Version = "20090212112105".parse().unwrap();
    assert!(a < b);
    assert!(Version::zero() < a);
}

#[test]
fn test_serializes_as_plain_string() {
    let label = Label::try_new("rc1").unwrap();
    assert_eq!(serde_json::to_string(&label).unwrap(), "\"rc1\"");
}
