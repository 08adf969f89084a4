use masterlog_core::unit_conversion::{
    correction_percent, decivolts_to_volts, format_fixed, format_signed_percent,
    kelvin_to_celsius, milli_to_unit, round_to,
};

#[test]
fn test_kelvin_to_celsius() {
    let celsius = round_to(kelvin_to_celsius(300.15), 0);
    assert_eq!(celsius, 27.0);
}

#[test]
fn test_freezing_point() {
    let celsius = kelvin_to_celsius(273.15);
    assert_eq!(celsius, 0.0);
}

#[test]
fn test_below_freezing() {
    let celsius = round_to(kelvin_to_celsius(253.15), 0);
    assert_eq!(celsius, -20.0);
}

#[test]
fn test_decivolts_to_volts() {
    let volts = round_to(decivolts_to_volts(121.0), 1);
    assert_eq!(volts, 12.1);
}

#[test]
fn test_milli_lambda() {
    let lambda = milli_to_unit(1000.0);
    assert_eq!(format_fixed(round_to(lambda, 2), 2), "1.00");
}

#[test]
fn test_rich_lambda() {
    let lambda = round_to(milli_to_unit(875.0), 2);
    assert_eq!(lambda, 0.88); // half to even
}

#[test]
fn test_correction_percent_lean() {
    let pct = correction_percent(1050.0);
    assert!((pct - 5.0).abs() < 1e-9);
    assert_eq!(format_signed_percent(pct), "+5.00%");
}

#[test]
fn test_correction_percent_rich() {
    let pct = correction_percent(950.0);
    assert!((pct + 5.0).abs() < 1e-9);
    assert_eq!(format_signed_percent(pct), "-5.00%");
}

#[test]
fn test_no_correction() {
    assert_eq!(correction_percent(1000.0), 0.0);
    assert_eq!(format_signed_percent(0.0), "+0.00%");
}

#[test]
fn test_tiny_lean_correction_prints_as_zero() {
    // 999.999 milli-units is a -0.0001 % correction, which prints as zero
    let pct = correction_percent(999.999);
    assert!(pct < 0.0);
    assert_eq!(format_signed_percent(pct), "+0.00%");
}

#[test]
fn test_round_ties_to_even() {
    assert_eq!(round_to(52.5, 0), 52.0);
    assert_eq!(round_to(53.5, 0), 54.0);
    assert_eq!(round_to(-0.5, 0), -0.0);
}
