//! The résumé document the wizard edits, persists, improves and lays out.
//!
//! Field names serialize in camelCase so that documents written by the browser
//! storage slot (`cv_data`) load without conversion.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque entry identifier. Fresh ids are UUIDs; ids read back from older
/// storage slots (for example millisecond timestamps) are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for EntryId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("entry id must not be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub professional_title: String,
    pub summary: String,
}

/// One of the six Personal sub-fields, in wizard order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PersonalField {
    FirstName,
    LastName,
    Email,
    Phone,
    ProfessionalTitle,
    Summary,
}

impl PersonalField {
    pub const ALL: [PersonalField; 6] = [
        PersonalField::FirstName,
        PersonalField::LastName,
        PersonalField::Email,
        PersonalField::Phone,
        PersonalField::ProfessionalTitle,
        PersonalField::Summary,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PersonalField::FirstName => "First name",
            PersonalField::LastName => "Last name",
            PersonalField::Email => "Email",
            PersonalField::Phone => "Phone",
            PersonalField::ProfessionalTitle => "Professional title",
            PersonalField::Summary => "Personal summary",
        }
    }
}

impl std::str::FromStr for PersonalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "firstName" | "first_name" => Ok(PersonalField::FirstName),
            "lastName" | "last_name" => Ok(PersonalField::LastName),
            "email" => Ok(PersonalField::Email),
            "phone" => Ok(PersonalField::Phone),
            "professionalTitle" | "professional_title" => Ok(PersonalField::ProfessionalTitle),
            "summary" => Ok(PersonalField::Summary),
            other => Err(format!("unknown personal field '{other}'")),
        }
    }
}

impl PersonalData {
    pub fn get(&self, field: PersonalField) -> &str {
        match field {
            PersonalField::FirstName => &self.first_name,
            PersonalField::LastName => &self.last_name,
            PersonalField::Email => &self.email,
            PersonalField::Phone => &self.phone,
            PersonalField::ProfessionalTitle => &self.professional_title,
            PersonalField::Summary => &self.summary,
        }
    }

    pub fn set(&mut self, field: PersonalField, value: String) {
        let slot = match field {
            PersonalField::FirstName => &mut self.first_name,
            PersonalField::LastName => &mut self.last_name,
            PersonalField::Email => &mut self.email,
            PersonalField::Phone => &mut self.phone,
            PersonalField::ProfessionalTitle => &mut self.professional_title,
            PersonalField::Summary => &mut self.summary,
        };
        *slot = value;
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub id: EntryId,
    pub company: String,
    pub position: String,
    /// `YYYY-MM`; empty when not yet entered.
    pub start_date: String,
    /// `YYYY-MM`; empty means ongoing.
    pub end_date: String,
    #[serde(default)]
    pub is_current: bool,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improved_description: Option<String>,
}

impl WorkExperience {
    pub fn empty() -> Self {
        Self {
            id: EntryId::generate(),
            company: String::new(),
            position: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            is_current: false,
            description: String::new(),
            improved_description: None,
        }
    }

    /// The rewritten description wins over the raw one when present.
    pub fn effective_description(&self) -> &str {
        match self.improved_description.as_deref() {
            Some(improved) if !improved.trim().is_empty() => improved,
            _ => &self.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: EntryId,
    pub institution: String,
    pub degree: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub is_current: bool,
}

impl Education {
    pub fn empty() -> Self {
        Self {
            id: EntryId::generate(),
            institution: String::new(),
            degree: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            is_current: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Technical,
    Soft,
}

impl std::str::FromStr for SkillCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "technical" => Ok(SkillCategory::Technical),
            "soft" => Ok(SkillCategory::Soft),
            other => Err(format!("unknown skill category '{other}'")),
        }
    }
}

impl std::fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkillCategory::Technical => write!(f, "technical"),
            SkillCategory::Soft => write!(f, "soft"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    pub technical: Vec<String>,
    pub soft: Vec<String>,
}

impl Skills {
    pub fn list(&self, category: SkillCategory) -> &[String] {
        match category {
            SkillCategory::Technical => &self.technical,
            SkillCategory::Soft => &self.soft,
        }
    }

    pub fn list_mut(&mut self, category: SkillCategory) -> &mut Vec<String> {
        match category {
            SkillCategory::Technical => &mut self.technical,
            SkillCategory::Soft => &mut self.soft,
        }
    }

    /// Trims every skill and drops empties and exact duplicates, keeping first occurrences.
    pub fn normalized(self) -> Self {
        Self {
            technical: dedup_trimmed(self.technical),
            soft: dedup_trimmed(self.soft),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.technical.is_empty() && self.soft.is_empty()
    }
}

pub fn dedup_trimmed(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let trimmed = item.trim();
        if !trimmed.is_empty() && !out.iter().any(|s| s == trimmed) {
            out.push(trimmed.to_string());
        }
    }
    out
}

/// Aggregate root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub personal: PersonalData,
    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Skills,
}

impl Document {
    /// `CV_{first}_{last}.pdf`, with inner whitespace collapsed to underscores.
    pub fn export_file_name(&self) -> String {
        let part = |s: &str| s.split_whitespace().collect::<Vec<_>>().join("_");
        format!(
            "CV_{}_{}.pdf",
            part(&self.personal.first_name),
            part(&self.personal.last_name)
        )
    }
}

/// Which entry list an entry operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Experience,
    Education,
}

impl std::str::FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "experience" => Ok(EntryKind::Experience),
            "education" => Ok(EntryKind::Education),
            other => Err(format!("unknown entry kind '{other}'")),
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Experience => write!(f, "experience"),
            EntryKind::Education => write!(f, "education"),
        }
    }
}

/// Partial update of a single entry. Fields that do not apply to the entry kind are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_current: Option<bool>,
    pub description: Option<String>,
}

impl EntryPatch {
    pub fn apply_to_experience(&self, exp: &mut WorkExperience) {
        if let Some(v) = &self.company {
            exp.company = v.clone();
        }
        if let Some(v) = &self.position {
            exp.position = v.clone();
        }
        if let Some(v) = &self.start_date {
            exp.start_date = v.clone();
        }
        if let Some(v) = &self.end_date {
            exp.end_date = v.clone();
        }
        if let Some(v) = self.is_current {
            exp.is_current = v;
        }
        if exp.is_current {
            exp.end_date.clear();
        }
        if let Some(v) = &self.description {
            if *v != exp.description {
                // A hand edit supersedes the rewritten variant.
                exp.improved_description = None;
            }
            exp.description = v.clone();
        }
    }

    pub fn apply_to_education(&self, edu: &mut Education) {
        if let Some(v) = &self.institution {
            edu.institution = v.clone();
        }
        if let Some(v) = &self.degree {
            edu.degree = v.clone();
        }
        if let Some(v) = &self.start_date {
            edu.start_date = v.clone();
        }
        if let Some(v) = &self.end_date {
            edu.end_date = v.clone();
        }
        if let Some(v) = self.is_current {
            edu.is_current = v;
        }
        if edu.is_current {
            edu.end_date.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_description_prefers_improved() {
        let mut exp = WorkExperience::empty();
        exp.description = "did stuff".to_string();
        assert_eq!(exp.effective_description(), "did stuff");

        exp.improved_description = Some("Delivered stuff".to_string());
        assert_eq!(exp.effective_description(), "Delivered stuff");

        exp.improved_description = Some("   ".to_string());
        assert_eq!(exp.effective_description(), "did stuff");
    }

    #[test]
    fn test_skills_normalized_trims_and_dedups() {
        let skills = Skills {
            technical: vec![
                " Rust ".to_string(),
                "Rust".to_string(),
                "".to_string(),
                "rust".to_string(),
            ],
            soft: vec!["Teamwork".to_string()],
        }
        .normalized();
        assert_eq!(skills.technical, vec!["Rust", "rust"]);
        assert_eq!(skills.soft, vec!["Teamwork"]);
    }

    #[test]
    fn test_entry_id_parse() {
        assert_eq!("1712345678901".parse::<EntryId>().unwrap().as_str(), "1712345678901");
        assert!("  ".parse::<EntryId>().is_err());
        assert_ne!(EntryId::generate(), EntryId::generate());
    }

    #[test]
    fn test_patch_is_current_clears_end_date() {
        let mut edu = Education::empty();
        edu.end_date = "2020-06".to_string();
        EntryPatch {
            is_current: Some(true),
            ..Default::default()
        }
        .apply_to_education(&mut edu);
        assert!(edu.is_current);
        assert!(edu.end_date.is_empty());
    }

    #[test]
    fn test_patch_description_edit_drops_improved_variant() {
        let mut exp = WorkExperience::empty();
        exp.description = "raw".to_string();
        exp.improved_description = Some("polished".to_string());

        // Same text: rewrite survives.
        EntryPatch {
            description: Some("raw".to_string()),
            ..Default::default()
        }
        .apply_to_experience(&mut exp);
        assert_eq!(exp.improved_description.as_deref(), Some("polished"));

        EntryPatch {
            description: Some("raw, edited".to_string()),
            ..Default::default()
        }
        .apply_to_experience(&mut exp);
        assert_eq!(exp.improved_description, None);
        assert_eq!(exp.description, "raw, edited");
    }

    #[test]
    fn test_export_file_name() {
        let mut doc = Document::default();
        doc.personal.first_name = "María José".to_string();
        doc.personal.last_name = "González".to_string();
        assert_eq!(doc.export_file_name(), "CV_María_José_González.pdf");
    }

    #[test]
    fn test_deserializes_browser_storage_shape() {
        let raw = r#"{
            "personal": {"firstName": "Ana", "lastName": "Pérez", "email": "a@b.c",
                         "phone": "1", "professionalTitle": "Dev", "summary": "Hi"},
            "workExperience": [{"id": "6f1c2a34-5b6d-4e7f-8a9b-0c1d2e3f4a5b", "company": "Acme",
                                "position": "Eng", "startDate": "2020-01", "endDate": "",
                                "description": "x"}],
            "education": [],
            "skills": {"technical": ["SQL"], "soft": []}
        }"#;
        let doc: Document = serde_json::from_str(raw).unwrap();
        assert_eq!(doc.personal.first_name, "Ana");
        assert!(!doc.work_experience[0].is_current);
        assert_eq!(doc.work_experience[0].improved_description, None);
        assert_eq!(doc.skills.technical, vec!["SQL"]);
    }

    #[test]
    fn test_deserializes_timestamp_entry_ids() {
        let raw = r#"{
            "personal": {"firstName": "Ana", "lastName": "", "email": "", "phone": "",
                         "professionalTitle": "", "summary": ""},
            "workExperience": [{"id": "1712345678901", "company": "Acme", "position": "Eng",
                                "startDate": "2020-01", "endDate": "", "isCurrent": true,
                                "description": "x"}],
            "education": [{"id": "1712345678902", "institution": "MIT", "degree": "BSc",
                           "startDate": "2016-09", "endDate": "2020-06", "isCurrent": false}],
            "skills": {"technical": [], "soft": []}
        }"#;
        let doc: Document = serde_json::from_str(raw).unwrap();
        assert_eq!(doc.work_experience[0].id.as_str(), "1712345678901");
        assert_eq!(doc.education[0].id.as_str(), "1712345678902");

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["workExperience"][0]["id"], "1712345678901");
    }
}
