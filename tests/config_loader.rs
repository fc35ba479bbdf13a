mod common;

use std::path::PathBuf;

use common::temp_config;
use moviestore::config::{Config, ConfigError};

#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.store.name, "movieSearch");
    assert_eq!(config.store.default_query, "");
    assert!(config.persistence.enabled);
    assert_eq!(config.persistence.key, "movieSearch");
    assert_eq!(config.persistence.version, 0);
    assert!(config.persistence.directory.is_none());
    assert!(config.changelog.enabled);
    assert_eq!(config.changelog.capacity, 100);
    assert_eq!(config.search.page_size, 10);
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_full_config() {
    let (_temp_dir, path) = temp_config(
        r#"
[store]
name = "movies"
default_query = "batman"

[persistence]
enabled = false
key = "movies-v2"
version = 2
directory = "/tmp/moviestore-test"

[changelog]
enabled = false
capacity = 5

[search]
page_size = 20
"#,
    );

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.store.name, "movies");
    assert_eq!(config.store.default_query, "batman");
    assert!(!config.persistence.enabled);
    assert_eq!(config.persistence.key, "movies-v2");
    assert_eq!(config.persistence.version, 2);
    assert_eq!(
        config.persistence.storage_directory(),
        PathBuf::from("/tmp/moviestore-test")
    );
    assert!(!config.changelog.enabled);
    assert_eq!(config.changelog.capacity, 5);
    assert_eq!(config.search.page_size, 20);
}

#[test]
fn test_partial_config_uses_defaults() {
    let (_temp_dir, path) = temp_config(
        r#"
[store]
default_query = "alien"
"#,
    );

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.store.default_query, "alien");
    assert_eq!(config.store.name, "movieSearch");
    assert_eq!(config.persistence, Config::default().persistence);
    assert_eq!(config.changelog.capacity, 100);
}

#[test]
fn test_empty_file_is_default() {
    let (_temp_dir, path) = temp_config("");
    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}

#[test]
fn test_validation_rejects_bad_values() {
    let cases = [
        "[store]\nname = \"\"\n",
        "[persistence]\nkey = \" \"\n",
        "[changelog]\ncapacity = 0\n",
        "[search]\npage_size = 0\n",
    ];

    for content in cases {
        let (_temp_dir, path) = temp_config(content);
        let result = Config::load_from(&path);
        assert!(
            matches!(result, Err(ConfigError::ValidationError { .. })),
            "expected validation error for {content:?}"
        );
    }
}

#[test]
fn test_parse_error() {
    let (_temp_dir, path) = temp_config("[store\nname = ");
    assert!(matches!(
        Config::load_from(&path),
        Err(ConfigError::ParseError { .. })
    ));
}

#[test]
fn test_missing_file_is_read_error() {
    let (temp_dir, _path) = temp_config("");
    let missing = temp_dir.path().join("nope.toml");
    assert!(matches!(
        Config::load_from(&missing),
        Err(ConfigError::ReadError { .. })
    ));
}

#[test]
fn test_config_path_location() {
    let path = Config::config_path();
    assert!(path.ends_with("moviestore/config.toml"));
}
