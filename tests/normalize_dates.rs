// tests/normalize_dates.rs
use chrono::TimeZone;
use noticia_aggregator::normalize::{normalize_date, target_offset};

#[test]
fn iso_input_returns_exact_instant() {
    let got = normalize_date("2025-11-04T18:45:00-03:00").expect("iso parses");
    let want = target_offset()
        .with_ymd_and_hms(2025, 11, 4, 18, 45, 0)
        .unwrap();
    assert_eq!(got, want);
}

#[test]
fn named_portuguese_month_defaults_to_noon() {
    let got = normalize_date("4 de novembro de 2025").expect("named month parses");
    let want = target_offset()
        .with_ymd_and_hms(2025, 11, 4, 12, 0, 0)
        .unwrap();
    assert_eq!(got, want);
}

#[test]
fn prefix_stripped_and_hour_shorthand_converted() {
    let got = normalize_date("Publicado em: 04/11/2025 09h30").expect("prefixed parses");
    let want = target_offset()
        .with_ymd_and_hms(2025, 11, 4, 9, 30, 0)
        .unwrap();
    assert_eq!(got, want);
}

#[test]
fn unparseable_input_is_none() {
    assert!(normalize_date("em breve").is_none());
    assert!(normalize_date("confira a galeria de fotos").is_none());
}

#[test]
fn round_trip_is_idempotent() {
    for raw in [
        "2025-11-04T18:45:00-03:00",
        "4 de novembro de 2025",
        "Publicado em: 04/11/2025 09h30",
        "04.11.2025 18:45",
        "November 4, 2025",
    ] {
        let first = normalize_date(raw).unwrap_or_else(|| panic!("should parse: {raw}"));
        let second = normalize_date(&first.to_rfc3339())
            .unwrap_or_else(|| panic!("round trip should parse: {raw}"));
        assert_eq!(first, second, "round trip drifted for {raw}");
    }
}

#[test]
fn normalizer_output_space_is_closed() {
    // Anything the normalizer emits re-enters through the ISO branch.
    let raw = "4 nov 2025 18:45";
    let dt = normalize_date(raw).unwrap();
    assert_eq!(normalize_date(&dt.to_rfc3339()), Some(dt));
}
