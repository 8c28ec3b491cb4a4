// Step validation. Each check returns the list of missing field paths; an empty
// list means the step may be left.

use crate::models::document::{Document, Education, PersonalData, PersonalField, Skills, WorkExperience};
use crate::wizard::steps::Step;

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn personal_field_valid(personal: &PersonalData, field: PersonalField) -> bool {
    filled(personal.get(field))
}

fn personal_issues(personal: &PersonalData) -> Vec<String> {
    PersonalField::ALL
        .iter()
        .filter(|field| !personal_field_valid(personal, **field))
        .map(|field| format!("personal.{}", camel_name(*field)))
        .collect()
}

fn camel_name(field: PersonalField) -> &'static str {
    match field {
        PersonalField::FirstName => "firstName",
        PersonalField::LastName => "lastName",
        PersonalField::Email => "email",
        PersonalField::Phone => "phone",
        PersonalField::ProfessionalTitle => "professionalTitle",
        PersonalField::Summary => "summary",
    }
}

/// An ongoing role still needs an end date here, unlike education.
fn experience_entry_issues(index: usize, exp: &WorkExperience) -> Vec<String> {
    [
        ("company", &exp.company),
        ("position", &exp.position),
        ("startDate", &exp.start_date),
        ("endDate", &exp.end_date),
        ("description", &exp.description),
    ]
    .into_iter()
    .filter(|(_, value)| !filled(value))
    .map(|(name, _)| format!("workExperience[{index}].{name}"))
    .collect()
}

fn education_entry_issues(index: usize, edu: &Education) -> Vec<String> {
    let mut issues: Vec<String> = [
        ("institution", &edu.institution),
        ("degree", &edu.degree),
        ("startDate", &edu.start_date),
    ]
    .into_iter()
    .filter(|(_, value)| !filled(value))
    .map(|(name, _)| format!("education[{index}].{name}"))
    .collect();

    if !edu.is_current && !filled(&edu.end_date) {
        issues.push(format!("education[{index}].endDate"));
    }
    issues
}

fn skills_issues(skills: &Skills) -> Vec<String> {
    let mut issues = Vec::new();
    if skills.technical.is_empty() {
        issues.push("skills.technical".to_string());
    }
    if skills.soft.is_empty() {
        issues.push("skills.soft".to_string());
    }
    issues
}

pub fn step_issues(step: Step, document: &Document) -> Vec<String> {
    match step {
        Step::Personal => personal_issues(&document.personal),
        Step::Experience if document.work_experience.is_empty() => {
            vec!["workExperience".to_string()]
        }
        Step::Experience => document
            .work_experience
            .iter()
            .enumerate()
            .flat_map(|(i, exp)| experience_entry_issues(i, exp))
            .collect(),
        Step::Education if document.education.is_empty() => vec!["education".to_string()],
        Step::Education => document
            .education
            .iter()
            .enumerate()
            .flat_map(|(i, edu)| education_entry_issues(i, edu))
            .collect(),
        Step::Skills => skills_issues(&document.skills),
        Step::Review => Vec::new(),
    }
}

pub fn step_valid(step: Step, document: &Document) -> bool {
    step_issues(step, document).is_empty()
}
