// Fixed prompt text and response schema for resume generation.
// The schema uses the Gemini OpenAPI subset (upper-case type names).

use serde_json::{json, Value};

pub const RESUME_SYSTEM: &str = "You are an AI specializing in writing highly engaging and \
    structured professional resumes for fictional characters with extremely creative or quirky \
    professions. The output MUST strictly adhere to the provided JSON schema.";

pub const RESUME_USER_PROMPT: &str = "Generate a complete, structured resume for a fictional \
    character. Give them a highly unusual or quirky job title and experience.";

/// Declarative schema handed to the API as `generationConfig.responseSchema`.
pub fn resume_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": {
                "type": "STRING",
                "description": "Full name of the fictional professional."
            },
            "title": {
                "type": "STRING",
                "description": "Their unique job title or profession (e.g., Chief Fun Officer)."
            },
            "summary": {
                "type": "STRING",
                "description": "A brief, one-paragraph professional summary."
            },
            "contact": {
                "type": "OBJECT",
                "properties": {
                    "email": { "type": "STRING" },
                    "phone": { "type": "STRING" },
                    "location": { "type": "STRING" }
                },
                "required": ["email", "phone", "location"]
            },
            "experience": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "company": { "type": "STRING", "description": "Fictional company name." },
                        "role": { "type": "STRING", "description": "Job role at the company." },
                        "duration": {
                            "type": "STRING",
                            "description": "Start and end dates (e.g., '2020 - Present')."
                        },
                        "description": {
                            "type": "STRING",
                            "description": "Key achievement or responsibility in one sentence."
                        }
                    },
                    "required": ["company", "role", "duration", "description"]
                },
                "description": "A list of 2 to 3 relevant work experiences."
            },
            "skills": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of 5 key, sometimes absurd, skills."
            }
        },
        "required": ["name", "title", "summary", "contact", "experience", "skills"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_requires_every_top_level_field() {
        let schema = resume_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(
            required,
            ["name", "title", "summary", "contact", "experience", "skills"]
        );
    }

    #[test]
    fn test_schema_experience_items_require_all_fields() {
        let schema = resume_schema();
        let items = &schema["properties"]["experience"]["items"];
        assert_eq!(items["type"], "OBJECT");
        assert_eq!(items["required"].as_array().unwrap().len(), 4);
    }
}
