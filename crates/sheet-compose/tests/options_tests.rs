use sheet_compose::*;

#[test]
fn test_default_options_are_valid() {
    let options = ComposeOptions::default();
    assert!(options.validate().is_ok());
    assert_eq!(options.columns, 2);
    assert_eq!(options.grid_scale, 200);
    assert_eq!(options.grid_fill_ratio, 0.85);
    assert_eq!(options.crop_fill_ratio, 0.90);
    assert_eq!(options.scale_range, ScaleRange::new(50, 200));
    assert_eq!(options.fallback_title_block, TitleBlockSize::new(841.0, 594.0));
}

#[test]
fn test_validation_columns() {
    let mut options = ComposeOptions::default();
    options.columns = 0;
    match options.validate() {
        Err(ComposeError::Config(msg)) => assert!(msg.contains("column")),
        _ => panic!("Expected Config error"),
    }
}

#[test]
fn test_validation_fill_ratios() {
    let mut options = ComposeOptions::default();

    // Valid: full cell
    options.grid_fill_ratio = 1.0;
    assert!(options.validate().is_ok());

    // Invalid: zero
    options.grid_fill_ratio = 0.0;
    assert!(options.validate().is_err());

    // Invalid: larger than the cell
    options.grid_fill_ratio = 0.85;
    options.crop_fill_ratio = 1.2;
    assert!(options.validate().is_err());

    // Invalid: NaN
    options.crop_fill_ratio = f64::NAN;
    assert!(options.validate().is_err());
}

#[test]
fn test_validation_margins_and_scales() {
    let mut options = ComposeOptions::default();
    options.margins.side_mm = -1.0;
    assert!(options.validate().is_err());

    let mut options = ComposeOptions::default();
    options.grid_scale = 0;
    assert!(options.validate().is_err());

    let mut options = ComposeOptions::default();
    options.scale_range = ScaleRange::new(300, 100);
    assert!(options.validate().is_err());

    let mut options = ComposeOptions::default();
    options.fallback_title_block = TitleBlockSize::new(0.0, 594.0);
    assert!(options.validate().is_err());
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_save_and_load_options() {
    use tempfile::NamedTempFile;

    let mut options = ComposeOptions::default();
    options.columns = 3;
    options.grid_scale = 100;
    options.sheet_number_prefix = "S".to_string();
    options.sheet_number_base = 1;
    options.margins.bottom_mm = 60.0;

    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    // Save
    options.save(path).await.unwrap();

    // Load
    let loaded = ComposeOptions::load(path).await.unwrap();
    assert_eq!(loaded, options);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_partial_options_file_uses_defaults() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    tokio::fs::write(temp_file.path(), r#"{ "columns": 3 }"#)
        .await
        .unwrap();

    let loaded = ComposeOptions::load(temp_file.path()).await.unwrap();
    assert_eq!(loaded.columns, 3);
    assert_eq!(loaded.grid_scale, 200);
    assert_eq!(loaded.margins, LayoutMargins::default());
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_malformed_options_file() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    tokio::fs::write(temp_file.path(), "not json").await.unwrap();

    let result = ComposeOptions::load(temp_file.path()).await;
    assert!(matches!(result, Err(ComposeError::Config(_))));
}
