//! Prompt for the theme clustering call.

use serde::Serialize;

use crate::models::PaperSummary;

/// Only these fields reach the model, whatever the request carried.
#[derive(Serialize)]
struct PromptPaper<'a> {
    id: &'a str,
    title: &'a str,
    summary: &'a str,
}

/// Build the clustering instruction for `papers`.
#[must_use]
pub fn build_theme_prompt(papers: &[PaperSummary]) -> String {
    let listing: Vec<PromptPaper<'_>> = papers
        .iter()
        .map(|p| PromptPaper {
            id: &p.id,
            title: &p.title,
            summary: &p.summary,
        })
        .collect();
    // Serializing borrowed strings into a Vec cannot fail.
    let listing = serde_json::to_string_pretty(&listing).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"
Given the following list of AI preprint titles and summaries:
{listing}

Please perform the following tasks:
1. Identify the main research themes present in these preprints. Aim for 5-7 distinct themes.
2. For each identified theme, provide a short, descriptive name.
3. Count how many papers fall under each theme.

Return the result ONLY as a valid JSON object with the following structure:
{{
  "themes": [
    {{ "name": "Theme Name 1", "count": number_of_papers_in_theme_1 }},
    {{ "name": "Theme Name 2", "count": number_of_papers_in_theme_2 }}
  ]
}}

Ensure the theme names are concise and accurately represent the content. Focus on the core topics.
If there are very few papers or they are too diverse to form meaningful clusters, return an empty themes array or a JSON with "themes": [].
Do not include any explanatory text before or after the JSON object.
"#
    )
}
