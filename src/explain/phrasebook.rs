//! Fixed user-facing wording for explanations and transcripts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output language for explanations and transcript labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
        }
    }

    /// Returns the built-in phrasebook for this language.
    pub fn phrasebook(&self) -> &'static Phrasebook {
        match self {
            Self::En => &ENGLISH,
            Self::Zh => &CHINESE,
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Self::En),
            "zh" | "chinese" | "zh-cn" => Ok(Self::Zh),
            _ => Err(format!("Unknown language: {s}. Expected: en or zh")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connector phrases used by the explanation template and the transcript.
///
/// Phrases containing `{}` are filled with a clause fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrasebook {
    pub lead_in: &'static str,
    /// Filled with the select list and the table list, in the order given
    /// by `tables_first`.
    pub retrieves: &'static str,
    pub tables_first: bool,
    pub table_separator: &'static str,
    pub join: &'static str,
    pub filtered_by: &'static str,
    pub grouped_by: &'static str,
    pub having: &'static str,
    pub ordered_by: &'static str,
    pub limited_to: &'static str,
    pub closing: &'static str,
    pub no_results: &'static str,
    pub sql_label: &'static str,
    pub explanation_label: &'static str,
    pub result_label: &'static str,
    /// Interactive session banner, one line per entry.
    pub welcome: &'static [&'static str],
    pub input_prompt: &'static str,
    pub goodbye: &'static str,
}

pub static ENGLISH: Phrasebook = Phrasebook {
    lead_in: "This query",
    retrieves: " retrieves {} from {}",
    tables_first: false,
    table_separator: ", ",
    join: ", performing a join across tables",
    filtered_by: ", filtered by {}",
    grouped_by: ", grouped by {}",
    having: ", keeping groups where {}",
    ordered_by: ", ordered by {}",
    limited_to: ", limited to the first {} rows",
    closing: ".",
    no_results: "No matching results found.",
    sql_label: "SQL query:",
    explanation_label: "Explanation:",
    result_label: "Result:",
    welcome: &[
        "Welcome to the natural-language to SQL assistant!",
        "Type 'exit' or 'quit' to leave.",
        "Joins, comparisons, ordering and aggregate functions are supported.",
    ],
    input_prompt: "Enter your question (or 'exit' to quit): ",
    goodbye: "Thanks for using the assistant. Goodbye!",
};

pub static CHINESE: Phrasebook = Phrasebook {
    lead_in: "这个查询",
    retrieves: "从{}表中获取{}",
    tables_first: true,
    table_separator: ", ",
    join: "，进行了表连接",
    filtered_by: "，条件是{}",
    grouped_by: "，按{}进行分组",
    having: "，分组筛选条件是{}",
    ordered_by: "，结果按{}排序",
    limited_to: "，只显示前{}条结果",
    closing: "。",
    no_results: "没有找到匹配的结果。",
    sql_label: "SQL查询:",
    explanation_label: "解释:",
    result_label: "结果:",
    welcome: &[
        "欢迎使用支持多表查询的中文自然语言到SQL转换系统！",
        "输入 'exit' 或 'quit' 退出程序。",
        "本系统支持复杂查询，包括多表连接、比较、排序和聚合函数。",
    ],
    input_prompt: "请输入您的查询 (或 'exit' 退出): ",
    goodbye: "谢谢使用，再见！",
};

/// Replaces successive `{}` placeholders in `template` with `args`.
pub(crate) fn fill(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut args = args.iter();

    while let Some(pos) = rest.find("{}") {
        out.push_str(&rest[..pos]);
        out.push_str(args.next().copied().unwrap_or_default());
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_str() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert_eq!("ZH".parse::<Language>().unwrap(), Language::Zh);
        assert_eq!("chinese".parse::<Language>().unwrap(), Language::Zh);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_default_is_english() {
        assert_eq!(Language::default(), Language::En);
        assert_eq!(Language::default().phrasebook().lead_in, "This query");
    }

    #[test]
    fn test_fill_placeholders() {
        assert_eq!(fill(" retrieves {} from {}", &["a", "b"]), " retrieves a from b");
        assert_eq!(fill("no placeholders", &["a"]), "no placeholders");
        assert_eq!(fill("{} and {}", &["a"]), "a and ");
    }
}
