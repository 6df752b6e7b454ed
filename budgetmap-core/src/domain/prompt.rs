//! Prompt assembly for category suggestions and reply cleanup

use serde::Serialize;

use super::mapping::RowMapping;
use super::row::{NormalizedTransaction, RawRow};

/// A previously categorized row shown to the model as an example
#[derive(Debug, Clone, Serialize)]
pub struct PromptExample<'a> {
    pub original_data: &'a RawRow,
    pub category: &'a str,
}

/// Up to `limit` examples from mapped rows, in store order
pub fn collect_examples<'a>(rows: impl Iterator<Item = &'a RowMapping>, limit: usize) -> Vec<PromptExample<'a>> {
    rows.filter_map(|m| {
        m.mapped_category().map(|category| PromptExample {
            original_data: &m.original_data,
            category,
        })
    })
    .take(limit)
    .collect()
}

pub fn build_prompt(
    row: &RawRow,
    normalized: &NormalizedTransaction,
    categories: &[String],
    examples: &[PromptExample<'_>],
) -> String {
    let mut prompt = String::from(
        "You categorize bank transactions for a personal budget.\n\
         Answer with exactly one category name from the list and nothing else.\n\n",
    );

    prompt.push_str("Categories:\n");
    for category in categories {
        prompt.push_str("- ");
        prompt.push_str(category);
        prompt.push('\n');
    }

    if !examples.is_empty() {
        prompt.push_str("\nPreviously categorized transactions:\n");
        for example in examples {
            let data = serde_json::to_string(example.original_data).unwrap_or_default();
            prompt.push_str(&format!("{} => {}\n", data, example.category));
        }
    }

    prompt.push_str("\nTransaction:\n");
    if let Some(date) = normalized.date {
        prompt.push_str(&format!("date: {}\n", date.format("%Y-%m-%d")));
    }
    if let Some(amount) = normalized.amount {
        prompt.push_str(&format!("amount: {:.2}\n", amount));
    }
    if let Some(description) = &normalized.description {
        prompt.push_str(&format!("description: {}\n", description));
    }
    let data = serde_json::to_string(row).unwrap_or_default();
    prompt.push_str(&format!("raw: {}\n", data));

    prompt.push_str("\nCategory:");
    prompt
}

/// Reduce a free-text model reply to a bare category name
///
/// Takes the first non-empty line, drops a "Category:" label and strips
/// surrounding quotes and punctuation.
pub fn clean_suggestion(reply: &str) -> String {
    let line = reply
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");

    let line = match line.split_once(':') {
        Some((label, rest)) if label.trim().eq_ignore_ascii_case("category") => rest.trim(),
        _ => line,
    };

    line.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '"' | '\'' | '`' | '*' | '.' | ',' | ';' | ':' | '!' | '-')
    })
    .to_string()
}
