//! Round-trip conversion tests between formats.
//!
//! Every writable format must reproduce the dataset and labels it was given,
//! and a raw import must survive conversion to the processed table.

use super::make_session;
use crate::format::formats::{ProcessedCsvFormat, RawExportFormat, ScribeJsonFormat};
use crate::format::traits::{ExportOptions, ImportOptions, SessionFormat};
use crate::format::SessionData;
use crate::model::LabelInterval;

fn roundtrip(format: &dyn SessionFormat, data: &SessionData) -> SessionData {
    let (bytes, _) = format
        .export_to_bytes(data, &ExportOptions::default())
        .unwrap();
    format
        .import_from_reader(&mut bytes.as_slice(), &ImportOptions::default())
        .unwrap()
}

fn label_sets() -> Vec<Vec<LabelInterval>> {
    vec![
        Vec::new(),
        vec![LabelInterval::new("Reflux", 1500.0, 4200.5, [0x01, 0x73, 0xb2])],
        // overlapping and duplicated spans
        vec![
            LabelInterval::new("Meal", 1000.0, 9000.0, [0xcc, 0x78, 0xbc]),
            LabelInterval::new("Swallow", 2000.0, 2600.0, [0xd5, 0x5e, 0x00]),
            LabelInterval::new("Swallow", 2000.0, 2600.0, [0xd5, 0x5e, 0x00]),
            LabelInterval::new("Custom event", 0.1, 0.3, [0xde, 0x8f, 0x05]),
        ],
    ]
}

#[test]
fn test_csv_roundtrip() {
    for labels in label_sets() {
        let data = make_session(7, 12, labels);
        assert_eq!(roundtrip(&ProcessedCsvFormat, &data), data);
    }
}

#[test]
fn test_csv_roundtrip_more_labels_than_samples() {
    let labels = (0..10)
        .map(|i| LabelInterval::new("Swallow", i as f64 * 100.0, i as f64 * 100.0 + 50.0, [1, 2, 3]))
        .collect();
    let data = make_session(2, 3, labels);

    assert_eq!(roundtrip(&ProcessedCsvFormat, &data), data);
}

#[test]
fn test_scribe_roundtrip() {
    for labels in label_sets() {
        let data = make_session(12, 7, labels);
        assert_eq!(roundtrip(&ScribeJsonFormat, &data), data);
    }
}

#[test]
fn test_raw_to_csv() {
    let raw = "\
Ph Array
h1
h2
h3
1000\t6.8
1250\t3.9
1500\t4.2
----
Impedance Array
h1
h2
h3
1000\t2.1\t2.3\t2.0\t1.9\t2.4\t2.2
1100\t12.5\t2.3\t2.0\t1.9\t2.4\t2.2
----
Diary
";
    let data = RawExportFormat
        .import_from_reader(&mut raw.as_bytes(), &ImportOptions::default())
        .unwrap();
    let back = roundtrip(&ProcessedCsvFormat, &data);

    assert_eq!(back, data);
    assert_eq!(back.dataset.impedance.leads[0], vec![2.1, 11.0]);
}

#[test]
fn test_raw_import_never_yields_values_json_cannot_store() {
    let raw = "Ph Array\nh\nh\nh\n1000\t6.5\n2000\tNaN\n----\n\
               Impedance Array\nh\nh\nh\n1000\t1\t1\t1\t1\t1\t1\n----\nDiary\n";
    assert!(
        RawExportFormat
            .import_from_reader(&mut raw.as_bytes(), &ImportOptions::default())
            .is_err()
    );

    let clean = raw.replace("NaN", "6.6");
    let data = RawExportFormat
        .import_from_reader(&mut clean.as_bytes(), &ImportOptions::default())
        .unwrap();
    assert_eq!(roundtrip(&ScribeJsonFormat, &data), data);
}
