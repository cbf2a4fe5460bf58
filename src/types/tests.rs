use super::Milliunits;
use anyhow::Result;
use std::str::FromStr;

#[test]
fn test_milliunits_successfully_parses_valid_strings() -> Result<()> {
    let test_cases = vec![
        ("1.0", 1000),
        ("1.234", 1234),
        ("0.001", 1),
        ("-1.5", -1500),
        ("  1.0  ", 1000),
        ("-0.01", -10),
        ("+1.0", 1000),
        ("100", 100000),
        ("1.", 1000),
        ("1250,50", 1250500),
        ("-5", -5000),
    ];

    for (input_string, expected) in test_cases {
        assert_eq!(Milliunits::from_str(input_string)?, Milliunits::new(expected), "input {input_string:?}");
    }

    Ok(())
}

#[test]
fn test_milliunits_fails_to_parse_invalid_strings() {
    assert!(Milliunits::from_str("1.2345").is_err());
    assert!(Milliunits::from_str("abc").is_err());
    assert!(Milliunits::from_str("1.2.3").is_err());
    assert!(Milliunits::from_str("1.234,56").is_err());
    assert!(Milliunits::from_str("").is_err());
    assert!(Milliunits::from_str(".5").is_err());
    assert!(Milliunits::from_str("--5").is_err());
    assert!(Milliunits::from_str("1.-5").is_err());
}

#[test]
fn test_milliunits_displays_with_three_decimal_places() {
    assert_eq!(Milliunits::new(-5000).to_string(), "-5.000");
    assert_eq!(Milliunits::new(1234).to_string(), "1.234");
    assert_eq!(Milliunits::new(-10).to_string(), "-0.010");
    assert_eq!(Milliunits::new(0).to_string(), "0.000");
}

#[test]
fn test_milliunits_provides_overflow_protection_for_large_values() -> Result<()> {
    assert!(Milliunits::from_str("9223372036854776.000").is_err());
    assert!(Milliunits::from_str("-9223372036854775.807").is_ok());
    assert!(Milliunits::from_str("99999999999999999999").is_err());

    Ok(())
}

#[test]
fn test_milliunits_serializes_as_a_plain_integer() -> Result<()> {
    assert_eq!(serde_json::to_string(&Milliunits::new(-5000))?, "-5000");
    assert_eq!(serde_json::from_str::<Milliunits>("1000")?, Milliunits::new(1000));

    Ok(())
}
