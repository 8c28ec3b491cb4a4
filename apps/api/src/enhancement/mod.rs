//! Text enhancement: rewrites free-text fields of the document into a more
//! professional register.
//!
//! The enhancer is injected as `Arc<dyn TextEnhancer>`. A batch over the whole
//! document either succeeds completely or leaves the caller's document untouched.

pub mod handlers;
pub mod prompts;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm_client::{LlmClient, LlmError};
use crate::models::document::{dedup_trimmed, Document, SkillCategory};

/// The field being rewritten, with the context the rewrite needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Summary { professional_title: String },
    ProfessionalTitle,
    WorkDescription { position: String, company: String },
    Degree { institution: String },
    SkillList { category: SkillCategory },
}

#[derive(Debug, Error)]
pub enum EnhancementError {
    #[error("text enhancement is not configured: missing API key")]
    MissingCredential,

    #[error("text enhancement failed: {0}")]
    Failed(String),
}

/// Port for single-field rewrites.
///
/// Implementations return the rewritten text, or the original text when the
/// backend produced nothing usable.
#[async_trait]
pub trait TextEnhancer: Send + Sync {
    async fn improve(&self, field: &Field, text: &str) -> Result<String, EnhancementError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LLM-backed enhancer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct LlmEnhancer {
    llm: LlmClient,
}

impl LlmEnhancer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl TextEnhancer for LlmEnhancer {
    async fn improve(&self, field: &Field, text: &str) -> Result<String, EnhancementError> {
        let prompt = prompts::build_prompt(field, text);
        let options = prompts::call_options(field);

        let result = self
            .llm
            .complete_text(&prompt, crate::llm_client::prompts::REWRITE_SYSTEM, options)
            .await;
        settle(result, text)
    }
}

/// Maps a model call outcome onto the enhancer contract. Transient failures keep
/// the original text; a missing key or a request the API rejects outright fails
/// the batch.
fn settle(result: Result<String, LlmError>, original: &str) -> Result<String, EnhancementError> {
    match result {
        Ok(rewritten) => Ok(rewritten),
        Err(LlmError::MissingApiKey) => Err(EnhancementError::MissingCredential),
        Err(LlmError::Api { status, message })
            if (400..500).contains(&status) && status != 429 =>
        {
            Err(EnhancementError::Failed(format!(
                "request rejected (status {status}): {message}"
            )))
        }
        Err(e) => {
            warn!("rewrite failed, keeping original text: {e}");
            Ok(original.to_string())
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Batch
// ────────────────────────────────────────────────────────────────────────────

/// Rewrites every enhanceable field of `document` and returns the result.
///
/// Experience descriptions land in `improved_description`; the raw description
/// is kept. Blank fields are skipped. Any error aborts the batch.
pub async fn improve_document(
    enhancer: &dyn TextEnhancer,
    document: &Document,
) -> Result<Document, EnhancementError> {
    let mut out = document.clone();
    let mut rewrites = 0usize;

    if !out.personal.summary.trim().is_empty() {
        let field = Field::Summary {
            professional_title: out.personal.professional_title.clone(),
        };
        out.personal.summary = enhancer.improve(&field, &out.personal.summary).await?;
        rewrites += 1;
    }

    if !out.personal.professional_title.trim().is_empty() {
        out.personal.professional_title = enhancer
            .improve(&Field::ProfessionalTitle, &out.personal.professional_title)
            .await?;
        rewrites += 1;
    }

    for exp in out.work_experience.iter_mut() {
        if exp.description.trim().is_empty() {
            continue;
        }
        let field = Field::WorkDescription {
            position: exp.position.clone(),
            company: exp.company.clone(),
        };
        exp.improved_description = Some(enhancer.improve(&field, &exp.description).await?);
        rewrites += 1;
    }

    for edu in out.education.iter_mut() {
        if edu.degree.trim().is_empty() {
            continue;
        }
        let field = Field::Degree {
            institution: edu.institution.clone(),
        };
        edu.degree = enhancer.improve(&field, &edu.degree).await?;
        rewrites += 1;
    }

    for category in [SkillCategory::Technical, SkillCategory::Soft] {
        let current = out.skills.list(category);
        if current.is_empty() {
            continue;
        }
        let joined = current.join(", ");
        let rewritten = enhancer
            .improve(&Field::SkillList { category }, &joined)
            .await?;
        let parsed = split_skill_list(&rewritten);
        if parsed.is_empty() {
            debug!(%category, "rewritten skill list was empty, keeping original");
        } else {
            *out.skills.list_mut(category) = parsed;
        }
        rewrites += 1;
    }

    info!(rewrites, "document improved");
    Ok(out)
}

/// Splits a comma-separated skill list, dropping blanks and repeats.
pub fn split_skill_list(text: &str) -> Vec<String> {
    dedup_trimmed(text.split(',').map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::models::document::{Education, Skills, WorkExperience};

    /// Prefixes every text with "Pro " and records the fields it saw.
    #[derive(Default)]
    struct PrefixEnhancer {
        seen: Mutex<Vec<Field>>,
    }

    #[async_trait]
    impl TextEnhancer for PrefixEnhancer {
        async fn improve(&self, field: &Field, text: &str) -> Result<String, EnhancementError> {
            self.seen.lock().unwrap().push(field.clone());
            Ok(match field {
                Field::SkillList { .. } => format!("{text}, Leadership"),
                _ => format!("Pro {text}"),
            })
        }
    }

    /// Fails on the n-th call (0-based).
    struct FailingEnhancer {
        fail_at: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextEnhancer for FailingEnhancer {
        async fn improve(&self, _field: &Field, text: &str) -> Result<String, EnhancementError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == self.fail_at {
                return Err(EnhancementError::Failed("upstream unavailable".to_string()));
            }
            Ok(format!("Pro {text}"))
        }
    }

    struct FixedEnhancer(&'static str);

    #[async_trait]
    impl TextEnhancer for FixedEnhancer {
        async fn improve(&self, _field: &Field, _text: &str) -> Result<String, EnhancementError> {
            Ok(self.0.to_string())
        }
    }

    fn sample_document() -> Document {
        let mut doc = Document::default();
        doc.personal.professional_title = "dev".to_string();
        doc.personal.summary = "i code stuff".to_string();
        let mut exp = WorkExperience::empty();
        exp.position = "Engineer".to_string();
        exp.company = "Acme".to_string();
        exp.description = "fixed bugs".to_string();
        doc.work_experience.push(exp);
        let mut edu = Education::empty();
        edu.institution = "MIT".to_string();
        edu.degree = "cs degree".to_string();
        doc.education.push(edu);
        doc.skills = Skills {
            technical: vec!["Rust".to_string(), "SQL".to_string()],
            soft: vec!["Teamwork".to_string()],
        };
        doc
    }

    #[tokio::test]
    async fn test_improve_document_rewrites_every_field() {
        let enhancer = PrefixEnhancer::default();
        let doc = sample_document();
        let out = improve_document(&enhancer, &doc).await.unwrap();

        assert_eq!(out.personal.summary, "Pro i code stuff");
        assert_eq!(out.personal.professional_title, "Pro dev");
        assert_eq!(out.work_experience[0].description, "fixed bugs");
        assert_eq!(
            out.work_experience[0].improved_description.as_deref(),
            Some("Pro fixed bugs")
        );
        assert_eq!(out.education[0].degree, "Pro cs degree");
        assert_eq!(out.skills.technical, vec!["Rust", "SQL", "Leadership"]);
        assert_eq!(out.skills.soft, vec!["Teamwork", "Leadership"]);

        // Input is not touched.
        assert_eq!(doc, sample_document());
    }

    #[tokio::test]
    async fn test_fields_carry_context() {
        let enhancer = PrefixEnhancer::default();
        improve_document(&enhancer, &sample_document()).await.unwrap();
        let seen = enhancer.seen.lock().unwrap();
        assert_eq!(
            seen[0],
            Field::Summary {
                professional_title: "dev".to_string()
            }
        );
        assert!(seen.contains(&Field::WorkDescription {
            position: "Engineer".to_string(),
            company: "Acme".to_string()
        }));
        assert!(seen.contains(&Field::Degree {
            institution: "MIT".to_string()
        }));
        assert_eq!(seen.len(), 6);
    }

    #[tokio::test]
    async fn test_blank_fields_are_skipped() {
        let enhancer = PrefixEnhancer::default();
        let out = improve_document(&enhancer, &Document::default())
            .await
            .unwrap();
        assert_eq!(out, Document::default());
        assert!(enhancer.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_any_failure_fails_the_batch() {
        let enhancer = FailingEnhancer {
            fail_at: 3,
            calls: AtomicUsize::new(0),
        };
        let result = improve_document(&enhancer, &sample_document()).await;
        assert!(matches!(result, Err(EnhancementError::Failed(_))));
    }

    #[tokio::test]
    async fn test_empty_skill_rewrite_keeps_original() {
        let mut doc = Document::default();
        doc.skills.technical = vec!["Rust".to_string()];
        let out = improve_document(&FixedEnhancer(" , ,"), &doc).await.unwrap();
        assert_eq!(out.skills.technical, vec!["Rust"]);
    }

    #[tokio::test]
    async fn test_llm_enhancer_without_key_is_missing_credential() {
        let enhancer = LlmEnhancer::new(LlmClient::new(None).unwrap());
        let result = improve_document(&enhancer, &sample_document()).await;
        assert!(matches!(result, Err(EnhancementError::MissingCredential)));
    }

    #[test]
    fn test_settle_rejected_request_fails() {
        let rejected = settle(
            Err(LlmError::Api {
                status: 401,
                message: "invalid x-api-key".to_string(),
            }),
            "raw",
        );
        match rejected {
            Err(EnhancementError::Failed(msg)) => assert!(msg.contains("401")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_settle_transient_failure_keeps_original() {
        let overloaded = settle(
            Err(LlmError::Api {
                status: 529,
                message: "overloaded".to_string(),
            }),
            "raw",
        );
        assert_eq!(overloaded.unwrap(), "raw");
        assert_eq!(
            settle(Err(LlmError::RateLimited { retries: 3 }), "raw").unwrap(),
            "raw"
        );
        assert_eq!(settle(Err(LlmError::EmptyContent), "raw").unwrap(), "raw");
        assert_eq!(settle(Ok("Polished".to_string()), "raw").unwrap(), "Polished");
        assert!(matches!(
            settle(Err(LlmError::MissingApiKey), "raw"),
            Err(EnhancementError::MissingCredential)
        ));
    }

    #[test]
    fn test_split_skill_list() {
        assert_eq!(
            split_skill_list(" Rust , SQL,,Rust, rust "),
            vec!["Rust", "SQL", "rust"]
        );
        assert!(split_skill_list("").is_empty());
    }
}
