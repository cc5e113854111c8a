use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

pub const MIN_EXPERIENCE: usize = 2;
pub const MAX_EXPERIENCE: usize = 3;
pub const SKILL_COUNT: usize = 5;

/// A fictional professional profile. Field order matches the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resume {
    pub name: String,
    pub title: String,
    pub summary: String,
    pub contact: Contact,
    pub experience: Vec<Experience>,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    pub phone: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub company: String,
    pub role: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("{0}")]
    Shape(String),

    #[error("required field '{0}' is empty")]
    EmptyField(&'static str),

    #[error("expected 2 to 3 experience entries, got {0}")]
    ExperienceCount(usize),

    #[error("expected exactly 5 skills, got {0}")]
    SkillCount(usize),
}

impl Resume {
    /// Checks the shape guarantees every served resume must satisfy.
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        require_text("name", &self.name)?;
        require_text("title", &self.title)?;
        require_text("summary", &self.summary)?;
        require_text("contact.email", &self.contact.email)?;
        require_text("contact.phone", &self.contact.phone)?;
        require_text("contact.location", &self.contact.location)?;

        let count = self.experience.len();
        if !(MIN_EXPERIENCE..=MAX_EXPERIENCE).contains(&count) {
            return Err(SchemaViolation::ExperienceCount(count));
        }
        for entry in &self.experience {
            require_text("experience.company", &entry.company)?;
            require_text("experience.role", &entry.role)?;
            require_text("experience.duration", &entry.duration)?;
            require_text("experience.description", &entry.description)?;
        }

        if self.skills.len() != SKILL_COUNT {
            return Err(SchemaViolation::SkillCount(self.skills.len()));
        }
        if self.skills.iter().any(|s| s.trim().is_empty()) {
            return Err(SchemaViolation::EmptyField("skills"));
        }

        Ok(())
    }
}

/// A generated resume that passed [`Resume::validate`]. Serializes as the
/// JSON it was parsed from, so properties outside the schema survive.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedResume {
    resume: Resume,
    raw: Value,
}

impl GeneratedResume {
    pub fn from_value(raw: Value) -> Result<Self, SchemaViolation> {
        let resume: Resume = serde_json::from_value(raw.clone())
            .map_err(|e| SchemaViolation::Shape(e.to_string()))?;
        resume.validate()?;
        Ok(Self { resume, raw })
    }

    pub fn resume(&self) -> &Resume {
        &self.resume
    }
}

impl Serialize for GeneratedResume {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

fn require_text(field: &'static str, value: &str) -> Result<(), SchemaViolation> {
    if value.trim().is_empty() {
        Err(SchemaViolation::EmptyField(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_resume(experience: usize, skills: usize) -> Resume {
        Resume {
            name: "Gus Spindle".to_string(),
            title: "Senior Lighthouse Whisperer".to_string(),
            summary: "Talks ships home through fog.".to_string(),
            contact: Contact {
                email: "gus@beacon.example".to_string(),
                phone: "(555) FOG-HORN".to_string(),
                location: "Cape Drizzle".to_string(),
            },
            experience: (0..experience)
                .map(|i| Experience {
                    company: format!("Beacon Co {i}"),
                    role: "Keeper".to_string(),
                    duration: "2020 - Present".to_string(),
                    description: "Kept the lamp lit.".to_string(),
                })
                .collect(),
            skills: (0..skills).map(|i| format!("Skill {i}")).collect(),
        }
    }

    #[test]
    fn test_valid_resume_passes() {
        assert!(make_resume(2, 5).validate().is_ok());
        assert!(make_resume(3, 5).validate().is_ok());
    }

    #[test]
    fn test_experience_count_out_of_range() {
        assert_eq!(
            make_resume(1, 5).validate(),
            Err(SchemaViolation::ExperienceCount(1))
        );
        assert_eq!(
            make_resume(4, 5).validate(),
            Err(SchemaViolation::ExperienceCount(4))
        );
    }

    #[test]
    fn test_skill_count_must_be_exact() {
        assert_eq!(make_resume(2, 4).validate(), Err(SchemaViolation::SkillCount(4)));
        assert_eq!(make_resume(2, 6).validate(), Err(SchemaViolation::SkillCount(6)));
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut resume = make_resume(2, 5);
        resume.name = "   ".to_string();
        assert_eq!(resume.validate(), Err(SchemaViolation::EmptyField("name")));
    }

    #[test]
    fn test_blank_contact_fields_rejected() {
        let mut resume = make_resume(2, 5);
        resume.contact.email = String::new();
        assert_eq!(
            resume.validate(),
            Err(SchemaViolation::EmptyField("contact.email"))
        );

        let mut resume = make_resume(2, 5);
        resume.contact.location = " ".to_string();
        assert_eq!(
            resume.validate(),
            Err(SchemaViolation::EmptyField("contact.location"))
        );
    }

    #[test]
    fn test_generated_resume_keeps_extra_properties() {
        let mut raw = serde_json::to_value(make_resume(3, 5)).unwrap();
        raw["hobbies"] = serde_json::json!(["competitive napping"]);
        raw["contact"]["fax"] = serde_json::json!("(555) FAX-ONLY");

        let generated = GeneratedResume::from_value(raw.clone()).unwrap();

        assert_eq!(generated.resume().name, "Gus Spindle");
        assert_eq!(serde_json::to_value(&generated).unwrap(), raw);
    }

    #[test]
    fn test_generated_resume_rejects_invalid_shape() {
        let raw = serde_json::json!({ "name": "Only A Name" });
        assert!(matches!(
            GeneratedResume::from_value(raw),
            Err(SchemaViolation::Shape(_))
        ));

        let raw = serde_json::to_value(make_resume(2, 4)).unwrap();
        assert_eq!(
            GeneratedResume::from_value(raw),
            Err(SchemaViolation::SkillCount(4))
        );
    }

    #[test]
    fn test_missing_contact_fails_deserialization() {
        let json = serde_json::json!({
            "name": "A", "title": "B", "summary": "C",
            "experience": [], "skills": []
        });
        assert!(serde_json::from_value::<Resume>(json).is_err());
    }

    #[test]
    fn test_serializes_fields_in_wire_order() {
        let json = serde_json::to_string(&make_resume(2, 5)).unwrap();
        let keys = [
            "\"name\"",
            "\"title\"",
            "\"summary\"",
            "\"contact\"",
            "\"experience\"",
            "\"skills\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|key| json.find(key).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
