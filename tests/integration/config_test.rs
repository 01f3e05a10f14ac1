//! Configuration file loading.

use std::io::Write;

use db_narrate::config::Config;
use db_narrate::db::Dataset;
use db_narrate::error::NarrateError;
use db_narrate::explain::Language;
use db_narrate::llm::LlmProvider;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_documented_example() {
    let file = write_config(
        r#"
language = "zh"

[llm]
provider = "mock"
model = "gpt-4o-mini"

[database]
url = "sqlite::memory:"
dataset = "company"

[[format.enrichments]]
column = "salary"
suffix = "元"

[[format.narratives]]
subject = "name"
attribute = "salary"
template = "{subject}'s salary is {value}"
"#,
    );

    let config = Config::load_from_file(file.path()).unwrap();

    assert_eq!(config.language, Language::Zh);
    assert_eq!(config.llm.provider, LlmProvider::Mock);
    assert_eq!(config.database.dataset, Dataset::Company);

    let rules = config.format_rules();
    assert_eq!(rules.enrichments.len(), 1);
    // An explicit narrative list wins over the language default.
    assert_eq!(
        rules.narratives[0].render("张伟", "75000元"),
        "张伟's salary is 75000元"
    );
}

#[test]
fn test_invalid_toml_is_config_error() {
    let file = write_config("[database\nurl = 1");

    let err = Config::load_from_file(file.path()).unwrap_err();

    assert!(matches!(err, NarrateError::Config(_)));
    assert_eq!(err.category(), "Configuration Error");
}

#[test]
fn test_unknown_top_level_key_rejected() {
    let file = write_config("dialect = \"postgres\"");
    assert!(Config::load_from_file(file.path()).is_err());
}
