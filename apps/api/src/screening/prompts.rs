// All LLM prompt constants and output schemas for the screening pipeline.
// Reuses cross-cutting fragments from llm_client::prompts.

use serde_json::{json, Value};

pub const SKILLS_TASK: &str = "extract_skills";
pub const KEYWORDS_TASK: &str = "extract_keywords";
pub const SCORING_TASK: &str = "compute_match_score";

pub const SKILLS_ROLE: &str = "You are an AI expert in parsing resumes.";

/// Skill extraction prompt. Fill `{resume_text}` before sending.
pub const SKILLS_PROMPT_TEMPLATE: &str = r#"Given the following resume text, extract all relevant professional skills. This includes technical skills (e.g., programming languages, software), design skills (e.g., Figma, Sketch, UI/UX), and other relevant abilities.

Return a JSON object of the form {"skills": ["..."]} with a simple array of strings and no additional commentary.

Resume Text:
{resume_text}"#;

pub const KEYWORDS_ROLE: &str =
    "You are an expert recruiter who is able to extract keywords from a job description.";

/// Keyword extraction prompt. Fill `{job_description}` before sending.
pub const KEYWORDS_PROMPT_TEMPLATE: &str = r#"Extract keywords from the following job description:

{job_description}

Return the keywords as a JSON object of the form {"keywords": ["..."]}."#;

pub const SCORING_ROLE: &str = "You are an expert AI recruiting assistant.";

/// Scoring prompt. Fill `{resume_skills}`, `{job_keywords}` and
/// `{job_description}` with `fill_template` before sending.
pub const SCORING_PROMPT_TEMPLATE: &str = r#"Your task is to calculate a match score between a candidate's skills and the keywords from a job description.

Job Description for context:
---
{job_description}
---

Candidate's Skills:
{resume_skills}

Job Keywords:
{job_keywords}

Analyze the candidate's skills against the job keywords and the overall job description.
- Consider direct matches and semantic similarities. For example, "ReactJS" is a strong match for "React". "Web Development" is related to "HTML" and "CSS".
- A UI/UX designer's skills like "Figma", "Sketch", "User Research", and "Wireframing" are highly relevant for a "UI/UX Designer" role, even if the exact words don't match the keywords perfectly. Pay close attention to the job title and core responsibilities in the full job description.
- Based on this analysis, calculate a `matchScore` from 0 to 100. A score of 0 means no relevance. A score of 100 is a perfect fit.
- Identify the `topMatchedSkills`, which are exactly the top 3 most relevant skills from the candidate's list that match the job requirements.
- Return the result as a JSON object: {"matchScore": <number>, "topMatchedSkills": ["...", "...", "..."]}."#;

/// `{"<field>": [string]}` with every property required, as strict
/// structured-output modes demand.
fn string_list_schema(field: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            field: {
                "type": "array",
                "items": {"type": "string"}
            }
        },
        "required": [field],
        "additionalProperties": false
    })
}

pub fn skills_schema() -> Value {
    string_list_schema("skills")
}

pub fn keywords_schema() -> Value {
    string_list_schema("keywords")
}

pub fn scoring_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "matchScore": {"type": "number"},
            "topMatchedSkills": {
                "type": "array",
                "items": {"type": "string"}
            }
        },
        "required": ["matchScore", "topMatchedSkills"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_carry_their_placeholders() {
        assert!(SKILLS_PROMPT_TEMPLATE.contains("{resume_text}"));
        assert!(KEYWORDS_PROMPT_TEMPLATE.contains("{job_description}"));
        for placeholder in ["{job_description}", "{resume_skills}", "{job_keywords}"] {
            assert!(SCORING_PROMPT_TEMPLATE.contains(placeholder), "missing {placeholder}");
        }
    }

    #[test]
    fn test_list_schema_requires_its_field() {
        let schema = skills_schema();
        assert_eq!(schema["required"][0], "skills");
        assert_eq!(schema["properties"]["skills"]["items"]["type"], "string");
        assert_eq!(keywords_schema()["required"][0], "keywords");
    }

    #[test]
    fn test_scoring_schema_matches_output_field_names() {
        let schema = scoring_schema();
        assert!(schema["properties"].get("matchScore").is_some());
        assert!(schema["properties"].get("topMatchedSkills").is_some());
    }
}
