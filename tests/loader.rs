use std::path::Path;

use spectro_lab::analysis::fit_calibration;
use spectro_lab::data::loader::load_table;
use spectro_lab::data::writer::{write_csv, write_json, write_parquet};
use spectro_lab::{DataTable, InstrumentMode};

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn peaks_table() -> DataTable {
    DataTable::new(
        vec!["retention_time".into(), "height".into(), "width".into()],
        vec![vec![1.2, 45.0, 0.2], vec![2.8, 120.0, 0.35]],
    )
}

#[test]
fn csv_with_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "uv.csv", "wavelength,absorbance\n200,0.01\n250,0.18\n");
    let table = load_table(&path, InstrumentMode::UvVis, ',').unwrap();
    assert_eq!(table.column_names, vec!["wavelength", "absorbance"]);
    assert_eq!(table.rows, vec![vec![200.0, 0.01], vec![250.0, 0.18]]);
}

#[test]
fn headerless_txt_uses_mode_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "std.txt", "0;0.02\n5;0.13\n\n10;0.27\n");
    let table = load_table(&path, InstrumentMode::Calibration, ';').unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.column_names[0], "concentration (ppm)");
    assert!(fit_calibration(&table.calibration_points()).is_ok());
}

#[test]
fn tsv_uses_tabs() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "gc.tsv", "1.2\t45\t0.2\n2.8\t120\t0.35\n");
    let table = load_table(&path, InstrumentMode::Chromatography, ',').unwrap();
    assert_eq!(table.peaks().len(), 2);
}

#[test]
fn bad_csv_line_is_located() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "bad.csv", "x,y\n1,2\n3,oops\n");
    let err = load_table(&path, InstrumentMode::Ftir, ',').unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("line 3, field 2"), "{msg}");
    assert!(msg.contains("oops"), "{msg}");
}

#[test]
fn wrong_field_count_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "three.csv", "1,2,3\n");
    let err = load_table(&path, InstrumentMode::UvVis, ',').unwrap_err();
    assert!(format!("{err:#}").contains("expected 2 fields but found 3"));
}

#[test]
fn json_arrays_and_records() {
    let dir = tempfile::tempdir().unwrap();
    let arrays = write(dir.path(), "a.json", "[[200, 0.1], [250, 0.3]]");
    let table = load_table(&arrays, InstrumentMode::UvVis, ',').unwrap();
    assert_eq!(table.rows[1], vec![250.0, 0.3]);

    let xy = write(dir.path(), "b.json", r#"[{"x": 1700, "y": 0.8, "note": "C=O"}]"#);
    let table = load_table(&xy, InstrumentMode::Ftir, ',').unwrap();
    assert_eq!(table.rows[0], vec![1700.0, 0.8]);

    let missing = write(dir.path(), "c.json", r#"[{"height": 3}]"#);
    assert!(load_table(&missing, InstrumentMode::Chromatography, ',').is_err());
}

#[test]
fn written_files_load_back() {
    let dir = tempfile::tempdir().unwrap();
    let table = peaks_table();

    let csv = dir.path().join("gc.csv");
    write_csv(&table, &csv).unwrap();
    let json = dir.path().join("gc.json");
    write_json(&table, InstrumentMode::Chromatography, &json).unwrap();
    let parquet = dir.path().join("gc.parquet");
    write_parquet(&table, &parquet).unwrap();

    for path in [&csv, &json, &parquet] {
        let loaded = load_table(path, InstrumentMode::Chromatography, ',').unwrap();
        assert_eq!(loaded.rows, table.rows, "{}", path.display());
    }
    let loaded = load_table(&parquet, InstrumentMode::Chromatography, ',').unwrap();
    assert_eq!(loaded.column_names, table.column_names);
}

#[test]
fn parquet_with_too_few_numeric_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("uv.parquet");
    let table = DataTable::new(vec!["x".into(), "y".into()], vec![vec![200.0, 0.1]]);
    write_parquet(&table, &path).unwrap();
    assert!(load_table(&path, InstrumentMode::Chromatography, ',').is_err());
}

#[test]
fn unsupported_extension_and_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let xlsx = write(dir.path(), "data.xlsx", "");
    assert!(load_table(&xlsx, InstrumentMode::UvVis, ',').is_err());

    let empty = write(dir.path(), "empty.csv", "\n\n");
    let err = load_table(&empty, InstrumentMode::UvVis, ',').unwrap_err();
    assert!(err.to_string().contains("no data rows"));
}
