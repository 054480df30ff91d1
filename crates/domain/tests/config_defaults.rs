use orch_domain::config::WorkspaceConfig;
use std::path::PathBuf;

#[test]
fn default_appfile_path_is_appfile_toml() {
    let config = WorkspaceConfig::default();
    assert_eq!(config.appfile, PathBuf::from("Appfile.toml"));
}

#[test]
fn explicit_appfile_path_parses() {
    let toml_str = r#"
appfile = "project/App.toml"
data_dir = "/var/orch/data"
"#;
    let config: WorkspaceConfig = toml::from_str(toml_str).unwrap();
    assert_eq!(config.appfile, PathBuf::from("project/App.toml"));
    assert_eq!(config.data_dir, PathBuf::from("/var/orch/data"));
}
