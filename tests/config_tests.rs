use std::io::Write;

use phonecam_degrade::config;

#[test]
fn yaml_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "degradation:\n  jpeg-quality: 30\n  dynamic-range: 1.1\ncrop:\n  resolution: 384\n"
    )
    .unwrap();

    let cfg = config::from_yaml_file(file.path()).unwrap();
    assert_eq!(cfg.degradation.jpeg_quality, 30);
    assert_eq!(cfg.degradation.dynamic_range, Some(1.1));
    assert_eq!(cfg.crop.resolution, 384);
    assert!(cfg.validate().is_ok());
}

#[test]
fn missing_file_is_an_io_error() {
    let err = config::from_yaml_file(std::path::Path::new("/nonexistent/config.yaml")).unwrap_err();
    assert!(matches!(err, phonecam_degrade::error::Error::Io(_)));
}
