//! Snapshot tests for the serialized chart series and user-facing messages.
//!
//! Run `cargo insta review` after an intentional change to the output.

use crate::helpers::region_sales_xlsx;
use chartsheet::data::{DecodeError, UploadError, decode_spreadsheet, project};
use chartsheet::types::{ChartKind, Table};
use std::time::Duration;

fn region_sales() -> Table {
    decode_spreadsheet(&region_sales_xlsx(), "sales.xlsx").unwrap()
}

fn series_json(kind: ChartKind) -> String {
    serde_json::to_string_pretty(&project(&region_sales(), "Region", "Sales", kind)).unwrap()
}

#[test]
fn test_bar_series_snapshot() {
    insta::assert_snapshot!(series_json(ChartKind::Bar), @r#"
    {
      "kind": "bar",
      "label": "Sales",
      "points": [
        {
          "label": {
            "Text": "North"
          },
          "value": {
            "Number": 100.0
          }
        },
        {
          "label": {
            "Text": "South"
          },
          "value": {
            "Number": 150.0
          }
        }
      ],
      "style": {
        "fill": {
          "r": 59,
          "g": 130,
          "b": 246,
          "a": 0.8
        },
        "border": {
          "r": 59,
          "g": 130,
          "b": 246,
          "a": 1.0
        },
        "border_width": 2.0,
        "area_fill": false,
        "tension": 0.0
      }
    }
    "#);
}

#[test]
fn test_pie_series_snapshot() {
    insta::assert_snapshot!(series_json(ChartKind::Pie), @r#"
    {
      "kind": "pie",
      "slices": [
        {
          "label": {
            "Text": "North"
          },
          "value": {
            "Number": 100.0
          },
          "palette_index": 0,
          "color": {
            "r": 59,
            "g": 130,
            "b": 246,
            "a": 0.8
          }
        },
        {
          "label": {
            "Text": "South"
          },
          "value": {
            "Number": 150.0
          },
          "palette_index": 1,
          "color": {
            "r": 139,
            "g": 92,
            "b": 246,
            "a": 0.8
          }
        }
      ],
      "border": {
        "r": 0,
        "g": 0,
        "b": 0,
        "a": 0.2
      },
      "border_width": 2.0
    }
    "#);
}

#[test]
fn test_error_messages_snapshot() {
    let messages = [
        UploadError::SizeExceeded {
            size: 10_485_761,
            max: 10_485_760,
        }
        .to_string(),
        UploadError::UnsupportedFormat("text/csv".to_string()).to_string(),
        UploadError::from(DecodeError::InsufficientData { rows: 1 }).to_string(),
        UploadError::from(DecodeError::Corrupt("invalid zip header".to_string())).to_string(),
        UploadError::TimedOut(Duration::from_secs(30)).to_string(),
        UploadError::Cancelled.to_string(),
    ];
    insta::assert_snapshot!(messages.join("\n"), @r"
    File too large: 10485761 bytes (max 10485760 bytes)
    Unsupported file type: text/csv
    File must contain a header row and at least one data row (found 1)
    Failed to parse the Excel file: invalid zip header
    Decoding timed out after 30s
    Upload cancelled
    ");
}
