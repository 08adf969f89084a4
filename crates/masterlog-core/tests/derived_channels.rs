//! Tests for unit conversions and computed channels applied during segmentation

use masterlog_core::datalog::{ColumnData, Session};
use pretty_assertions::assert_eq;

fn single_session(log: &str, extra_fuel_factor: f64) -> Session {
    let mut sessions = masterlog_core::segment(log.as_bytes(), extra_fuel_factor).unwrap();
    assert_eq!(sessions.len(), 1);
    sessions.remove(0)
}

#[test]
fn test_battery_voltage() {
    let session = single_session("Mess 1;Batt Volt.\n1;121\n2;138\n3;\n", 1.0);
    assert_eq!(
        session.full_table().numeric("Batt Volt.").unwrap(),
        &[Some(12.1), Some(13.8), None]
    );
}

#[test]
fn test_temperatures_to_celsius() {
    let session = single_session("Mess 1;CLT;IAT\n1;300,15;300.15\n2;363,15;x\n", 1.0);
    let table = session.full_table();

    assert_eq!(table.numeric("CLT").unwrap(), &[Some(27.0), Some(90.0)]);
    assert_eq!(table.numeric("IAT").unwrap(), &[Some(27.0), None]);
    assert_eq!(table.column("CLT").unwrap().display_at(0).as_deref(), Some("27"));
}

#[test]
fn test_lambda_formatting() {
    let session = single_session(
        "Mess 1;Lambda 1;Lambda Target\n1;1000;1000\n2;;950\n3;875;abc\n",
        1.0,
    );
    let table = session.full_table();

    assert_eq!(
        table.column("Lambda 1").unwrap().data(),
        &ColumnData::Text(vec![
            Some("1.00".into()),
            Some("".into()),
            Some("0.88".into())
        ])
    );
    assert_eq!(
        table.column("Lambda Target").unwrap().data(),
        &ColumnData::Text(vec![
            Some("1.00".into()),
            Some("0.95".into()),
            Some("".into())
        ])
    );
}

#[test]
fn test_correction_percentage() {
    let session = single_session(
        "Mess 1;Lambda Corr;Lambda Loop\n1;1050;1\n2;1050;0\n3;950;1\n4;;1\n5;1000;\n",
        1.0,
    );

    assert_eq!(
        session.full_table().column("Correção (%)").unwrap().data(),
        &ColumnData::Text(vec![
            Some("+5.00%".into()),
            None,
            Some("-5.00%".into()),
            None,
            Some("+0.00%".into())
        ])
    );
}

#[test]
fn test_near_zero_correction_has_no_negative_zero() {
    let session = single_session("Mess 1;Lambda Corr;Lambda Loop\n1;999,999;1\n", 1.0);

    assert_eq!(
        session.full_table().column("Correção (%)").unwrap().data(),
        &ColumnData::Text(vec![Some("+0.00%".into())])
    );
}

#[test]
fn test_correction_percentage_without_loop_indicator() {
    let session = single_session("Mess 1;Lambda Corr\n1;1100\n2;900\n", 1.0);

    assert_eq!(
        session.full_table().column("Correção (%)").unwrap().data(),
        &ColumnData::Text(vec![Some("+10.00%".into()), Some("-10.00%".into())])
    );
    // No VE column, so no corrected VE either
    assert!(!session.full_table().contains("VE Corrigido"));
}

#[test]
fn test_corrected_ve_masked_by_closed_loop() {
    let session = single_session(
        "Mess 1;Lambda Corr;VE Value;Lambda Loop\n1;1050;60;1\n2;1050;60;0\n3;;60;1\n4;1100;50;2\n",
        1.0,
    );
    let ve = session.full_table().column("VE Corrigido").unwrap();

    assert_eq!(
        ve.data(),
        &ColumnData::Integer(vec![Some(63), None, None, Some(55)])
    );
    assert!(!ve.is_present(1));
}

#[test]
fn test_corrected_ve_extra_fuel_factor() {
    let session = single_session("Mess 1;Lambda Corr;VE Value\n1;1000;60\n2;1000;40\n", 1.5);
    assert_eq!(
        session.full_table().column("VE Corrigido").unwrap().data(),
        &ColumnData::Integer(vec![Some(90), Some(60)])
    );
}

#[test]
fn test_derived_columns_are_appended_in_order() {
    let session = single_session(
        "Mess 1;VE Value;Lambda Corr;RPM\n1;60;1000;900\n",
        1.0,
    );
    assert_eq!(
        session.full_table().column_names(),
        vec!["Mess 1", "VE Value", "Lambda Corr", "RPM", "VE Corrigido", "Correção (%)"]
    );
    assert_eq!(
        session.display_table().column_names(),
        vec!["VE Value", "Lambda Corr", "RPM", "VE Corrigido", "Correção (%)"]
    );
}
