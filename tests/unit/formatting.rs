// tests/unit/formatting.rs
//! Unit tests for the notification message format

use crate::common;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use track2slack::{compose_message, count_statuses, PackageStatus, RunReport, StatusMap};

fn fixed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 5, 4).expect("valid test date")
}

fn statuses(entries: &[(&str, PackageStatus)]) -> StatusMap {
    entries
        .iter()
        .map(|(code, status)| {
            (
                track2slack::TrackingCode::new(*code).expect("valid test code"),
                *status,
            )
        })
        .collect()
}

#[test]
fn counts_group_by_status_in_first_seen_order() {
    let map = statuses(&[
        ("T1", PackageStatus::Delivered),
        ("T2", PackageStatus::InTransit),
        ("T3", PackageStatus::Delivered),
    ]);

    let counts = count_statuses(&map);
    let lines: Vec<_> = counts
        .iter()
        .map(|(status, count)| format!("{} - {} packages", status, count))
        .collect();

    assert_eq!(lines, vec!["DELIVERED - 2 packages", "IN_TRANSIT - 1 packages"]);
    assert_eq!(counts.values().sum::<usize>(), map.len());
}

#[test]
fn message_carries_date_totals_and_status_counts() {
    let deliveries = vec![
        common::delivery("c1", "T1", "Socks"),
        common::delivery("c2", "T2", "Mug"),
    ];
    let completed = vec![common::completion(&deliveries[0])];
    let report = RunReport {
        deliveries,
        statuses: statuses(&[
            ("T1", PackageStatus::Delivered),
            ("T2", PackageStatus::InTransit),
        ]),
        completed,
    };

    let message = compose_message(&report, &common::template(), fixed_date());

    assert!(message.contains(":calendar: 04 May 2023"));
    assert!(message.contains("We have 2 :package: in shipping"));
    assert!(message.contains("I found out in https://www.17track.net that:"));
    assert!(message.contains("DELIVERED - 1 packages"));
    assert!(message.contains("IN_TRANSIT - 1 packages"));
    assert!(message.contains("And also I have auto completed 1 :package: deliveries:"));
    assert!(message.contains("Cuid: c1 - Socks - https://www.17track.net/en#nums=T1"));
}

#[test]
fn status_count_lines_sum_to_distinct_tracked_codes() {
    let report = RunReport {
        deliveries: vec![
            common::delivery("c1", "A1", "One"),
            common::delivery("c2", "A2", "Two"),
            common::delivery("c3", "A3", "Three"),
        ],
        statuses: statuses(&[
            ("A1", PackageStatus::InTransit),
            ("A2", PackageStatus::InTransit),
            ("A3", PackageStatus::Unknown),
        ]),
        completed: vec![],
    };

    let message = compose_message(&report, &common::template(), fixed_date());
    let count_lines: Vec<_> = message
        .lines()
        .filter(|line| line.ends_with("packages"))
        .collect();

    assert_eq!(count_lines.len(), 2);
    assert!(message.contains("IN_TRANSIT - 2 packages"));
    assert!(message.contains("UNKNOWN - 1 packages"));
    assert!(message.contains("We have 3 :package: in shipping"));
}

#[test]
fn empty_run_still_produces_a_complete_message() {
    let report = RunReport {
        deliveries: vec![],
        statuses: StatusMap::new(),
        completed: vec![],
    };

    let message = compose_message(&report, &common::template(), fixed_date());

    assert!(message.contains("We have 0 :package: in shipping"));
    assert!(message.contains("And also I have auto completed 0 :package: deliveries:"));
    assert!(!message.contains("Cuid:"));
}
