use super::{group_alerts_by_date, AlertRecord, FeatureRow, NeighborFeatures, SourceFeatures};

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::types::Flow;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, day).unwrap()
}

#[test]
fn test_alerts_are_grouped_by_date_in_order() {
    let alerts = vec![
        AlertRecord::new("A105", date(3)),
        AlertRecord::new("A101", date(1)),
        AlertRecord::new("A103", date(3)),
        AlertRecord::new("A105", date(3)),
    ];

    let grouped = group_alerts_by_date(&alerts);
    let dates: Vec<_> = grouped.keys().copied().collect();

    assert_eq!(dates, vec![date(1), date(3)]);
    assert_eq!(grouped[&date(1)], vec!["A101".to_string()]);
    assert_eq!(grouped[&date(3)], vec!["A103".to_string(), "A105".to_string()]);
}

#[test]
fn test_account_alerted_on_two_dates_appears_under_both() {
    let alerts = vec![
        AlertRecord::new("A101", date(1)),
        AlertRecord::new("A101", date(2)),
    ];

    let grouped = group_alerts_by_date(&alerts);

    assert_eq!(grouped.len(), 2);
}

#[test]
fn test_combine_duplicates_source_fields_onto_row() -> Result<()> {
    let source = SourceFeatures {
        account_id: "A".to_string(),
        alert_date: date(5),
        out_degree: 2,
        inbound: Flow::new(Decimal::from(10), 1),
        outbound: Flow::new(Decimal::from(350), 3)
    };
    let neighbor = NeighborFeatures {
        account_id: "B".to_string(),
        hop_distance: 1,
        total_inbound: Flow::new(Decimal::from(300), 2),
        direct_inbound: Flow::new(Decimal::from(300), 2),
        indirect_inbound: Flow::zero(),
        outbound: Flow::new(Decimal::from(50), 1),
        degree: 2,
        in_degree: 1,
        out_degree: 1
    };

    let row = FeatureRow::combine(neighbor, &source);

    assert_eq!(row.account_id, "B");
    assert_eq!(row.source_account_id, "A");
    assert_eq!(row.alert_date, date(5));
    assert_eq!(row.direct_inbound_amount, Decimal::from(300));
    assert_eq!(row.indirect_inbound_count, 0);
    assert_eq!(row.source_total_outbound_amount, Decimal::from(350));
    assert_eq!(row.source_out_degree, 2);
    assert_eq!(row.popularity, 0);
    assert!(!row.has_negative_indirect());

    Ok(())
}

#[test]
fn test_column_list_matches_serialized_header() -> Result<()> {
    let source = SourceFeatures {
        account_id: "A".to_string(),
        alert_date: date(5),
        out_degree: 1,
        inbound: Flow::zero(),
        outbound: Flow::new(Decimal::new(30050, 2), 2)
    };
    let neighbor = NeighborFeatures {
        account_id: "B".to_string(),
        hop_distance: 1,
        total_inbound: Flow::new(Decimal::new(30050, 2), 2),
        direct_inbound: Flow::new(Decimal::new(30050, 2), 2),
        indirect_inbound: Flow::zero(),
        outbound: Flow::zero(),
        degree: 1,
        in_degree: 1,
        out_degree: 0
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.serialize(FeatureRow::combine(neighbor, &source))?;
    writer.flush()?;
    let output = String::from_utf8(writer.get_ref().clone())?;
    let mut lines = output.lines();

    assert_eq!(lines.next(), Some(FeatureRow::COLUMNS.join(",").as_str()));
    assert_eq!(lines.next(), Some("B,1,300.50,300.50,0,2,2,0,0,0,1,1,0,0,A,2024-02-05,1,0,0,300.50,2"));

    Ok(())
}
