//! End-to-end pipeline scenarios with an in-process provider.
//!
//! Each test builds a raw form, runs `pipeline::run` against a
//! `StaticProvider`, and checks the artifact or the mapped error.

use chrono::NaiveDate;
use pxdl_export::{pipeline, ErrorKind, RawDownloadForm};
use pxdl_md::{Market, PriceField, PriceRow, PriceTable, ProviderError, StaticProvider};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn form(pairs: &[(&str, &str)]) -> RawDownloadForm {
    RawDownloadForm::from_pairs(pairs.iter().copied())
}

fn two_day_table() -> PriceTable {
    PriceTable::from_rows(vec![
        PriceRow::new(d(2024, 1, 2))
            .with(PriceField::Open, 100.0)
            .with(PriceField::High, 102.255)
            .with(PriceField::Low, 99.5)
            .with(PriceField::Close, 101.505),
        PriceRow::new(d(2024, 1, 3))
            .with(PriceField::Open, 101.0)
            .with(PriceField::High, 101.0)
            .with(PriceField::Low, 98.0)
            .with(PriceField::Close, 100.0),
    ])
}

// ---------------------------------------------------------------------------
// Success paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn close_only_download_matches_expected_csv() {
    let provider = StaticProvider::with_table(two_day_table());
    let f = form(&[
        ("symbol", "2330"),
        ("start", "2024-01-02"),
        ("end", "2024-01-03"),
        ("fields", "Close"),
    ]);

    let art = pipeline::run(&provider, &f, Market::Twse).await.unwrap();

    assert_eq!(
        String::from_utf8(art.content.clone()).unwrap(),
        "Date,Close\n2024-01-02,101.51\n2024-01-03,100.00\n"
    );
    assert_eq!(art.filename, "2330_2024-01-02_2024-01-03.csv");
    assert_eq!(art.media_type, "text/csv");
    assert_eq!(art.row_count(), 2);

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].ticker, "2330.TW");
    assert_eq!(calls[0].start, d(2024, 1, 2));
    assert_eq!(calls[0].end, d(2024, 1, 3));
}

#[tokio::test]
async fn omitted_fields_default_to_all_four_columns() {
    let provider = StaticProvider::with_table(two_day_table());
    let f = form(&[
        ("symbol", "2330"),
        ("start", "2024-01-02"),
        ("end", "2024-01-03"),
    ]);

    let art = pipeline::run(&provider, &f, Market::Twse).await.unwrap();
    let body = String::from_utf8(art.content).unwrap();
    let mut lines = body.lines();
    assert_eq!(lines.next(), Some("Date,Open,High,Low,Close"));
    assert_eq!(lines.next(), Some("2024-01-02,100.00,102.26,99.50,101.51"));
    assert_eq!(lines.next(), Some("2024-01-03,101.00,101.00,98.00,100.00"));
    assert_eq!(lines.next(), None);
}

#[tokio::test]
async fn market_suffix_follows_configuration() {
    let provider = StaticProvider::with_table(two_day_table());
    let f = form(&[
        ("symbol", "6488"),
        ("start", "2024-01-02"),
        ("end", "2024-01-03"),
    ]);

    let art = pipeline::run(&provider, &f, Market::Tpex).await.unwrap();
    assert_eq!(provider.calls()[0].ticker, "6488.TWO");
    // Filename keeps the symbol the user typed.
    assert_eq!(art.filename, "6488_2024-01-02_2024-01-03.csv");
}

// ---------------------------------------------------------------------------
// Failure paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn provider_failure_is_provider_unavailable_500() {
    let provider =
        StaticProvider::failing(ProviderError::Transport("connection reset".to_string()));
    let f = form(&[
        ("symbol", "2330"),
        ("start", "2024-01-02"),
        ("end", "2024-01-03"),
    ]);

    let err = pipeline::run(&provider, &f, Market::Twse).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProviderUnavailable);
    assert_eq!(err.status(), 500);
    assert!(err.user_message().contains("connection reset"));
}

#[tokio::test]
async fn empty_provider_result_is_no_data_404() {
    let provider = StaticProvider::with_table(PriceTable::empty());
    for fields in [vec![], vec!["Close"], vec!["Open", "Low"]] {
        let mut pairs = vec![
            ("symbol", "2330"),
            ("start", "2024-01-06"),
            ("end", "2024-01-07"),
        ];
        pairs.extend(fields.iter().map(|f| ("fields", *f)));

        let err = pipeline::run(&provider, &form(&pairs), Market::Twse)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoData);
        assert_eq!(err.status(), 404);
    }
}

#[tokio::test]
async fn blank_symbol_never_reaches_the_provider() {
    let provider = StaticProvider::with_table(two_day_table());
    for symbol in ["", "   "] {
        let f = form(&[
            ("symbol", symbol),
            ("start", "2024-01-02"),
            ("end", "2024-01-03"),
        ]);
        let err = pipeline::run(&provider, &f, Market::Twse).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptySymbol);
        assert_eq!(err.status(), 400);
    }
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn unknown_field_and_bad_date_are_400() {
    let provider = StaticProvider::with_table(two_day_table());

    let f = form(&[
        ("symbol", "2330"),
        ("start", "2024-01-02"),
        ("end", "2024-01-03"),
        ("fields", "Volume"),
    ]);
    let err = pipeline::run(&provider, &f, Market::Twse).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownField);

    let f = form(&[("symbol", "2330"), ("start", "yesterday"), ("end", "2024-01-03")]);
    let err = pipeline::run(&provider, &f, Market::Twse).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidDate);
    assert_eq!(err.status(), 400);
}

#[tokio::test]
async fn provider_table_missing_a_requested_field_is_500() {
    let table = PriceTable::from_rows(vec![
        PriceRow::new(d(2024, 1, 2)).with(PriceField::Close, 10.0)
    ]);
    let provider = StaticProvider::with_table(table);
    let f = form(&[
        ("symbol", "2330"),
        ("start", "2024-01-02"),
        ("end", "2024-01-02"),
        ("fields", "High"),
    ]);

    let err = pipeline::run(&provider, &f, Market::Twse).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingField);
    assert_eq!(err.status(), 500);
}
