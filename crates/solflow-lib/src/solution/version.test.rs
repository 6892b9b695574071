use super::*;

#[test]
fn test_increment_policies() {
    let v = SolutionVersion::new(1, 2, 3, 4);
    assert_eq!(v.increment(IncrementPolicy::Patch), SolutionVersion::new(1, 2, 3, 5));
    assert_eq!(v.increment(IncrementPolicy::Minor), SolutionVersion::new(1, 3, 0, 0));
    assert_eq!(v.increment(IncrementPolicy::Major), SolutionVersion::new(2, 0, 0, 0));
}

#[test]
fn test_increment_never_decreases() {
    let samples = [
        SolutionVersion::default(),
        SolutionVersion::new(1, 0, 0, 0),
        SolutionVersion::new(9, 9, 9, 9),
        SolutionVersion::new(0, 0, 0, u32::MAX),
        SolutionVersion::new(u32::MAX, u32::MAX, u32::MAX, u32::MAX),
    ];
    for v in samples {
        for policy in [IncrementPolicy::Patch, IncrementPolicy::Minor, IncrementPolicy::Major] {
            assert!(v.increment(policy) >= v, "{v} under {policy}");
        }
    }
}

#[test]
fn test_increment_at_part_limit_keeps_version() {
    let v = SolutionVersion::new(u32::MAX, u32::MAX, 7, 3);
    assert_eq!(v.increment(IncrementPolicy::Minor), v);
    assert_eq!(v.increment(IncrementPolicy::Major), v);

    let minor_full = SolutionVersion::new(1, u32::MAX, 7, 3);
    assert_eq!(minor_full.increment(IncrementPolicy::Minor), minor_full);
    assert_eq!(
        minor_full.increment(IncrementPolicy::Major),
        SolutionVersion::new(2, 0, 0, 0)
    );

    let revision_full = SolutionVersion::new(1, 0, 0, u32::MAX);
    assert_eq!(revision_full.increment(IncrementPolicy::Patch), revision_full);
}

#[test]
fn test_ordering_is_component_wise() {
    assert!(SolutionVersion::new(2, 0, 0, 0) > SolutionVersion::new(1, 9, 9, 9));
    assert!(SolutionVersion::new(1, 2, 0, 0) > SolutionVersion::new(1, 1, 99, 99));
    assert!(SolutionVersion::new(1, 1, 1, 2) > SolutionVersion::new(1, 1, 1, 1));
}

#[test]
fn test_parse_and_display() {
    let v: SolutionVersion = "1.2.3.4".parse().unwrap();
    assert_eq!(v, SolutionVersion::new(1, 2, 3, 4));
    assert_eq!(v.to_string(), "1.2.3.4");

    let short: SolutionVersion = " 1.0 ".parse().unwrap();
    assert_eq!(short.to_string(), "1.0.0.0");
}

#[test]
fn test_parse_rejects_malformed_versions() {
    for bad in ["", "1", "1.2.3.4.5", "1.x.0.0", "1.-2.0.0", "1..2"] {
        assert!(bad.parse::<SolutionVersion>().is_err(), "{bad:?} should fail");
    }
}
