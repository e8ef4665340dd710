//! Input records for the matching engine
//!
//! Jobs and candidates are created by upload collaborators and arrive here
//! as read-only inputs. A candidate may exist as several stored records;
//! identity is the employee id carried in `id`, never the record row.

use crate::extraction::signals::extract_experience_years;
use serde::{Deserialize, Serialize};

/// One job requisition, immutable for the duration of scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDescription {
    /// Opaque id assigned by the persistence collaborator.
    pub id: String,
    pub text: String,
    /// Fixed-length embedding of `text`, computed at upload time.
    pub embedding: Vec<f32>,
    /// Business-domain tag used for the vertical boost.
    pub vertical: Option<String>,
    /// Required years of experience, parsed from the job text.
    pub required_experience_years: Option<f32>,
}

impl JobDescription {
    /// Build a job record, parsing the required-experience figure out of
    /// the text.
    pub fn new(id: impl Into<String>, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        let text = text.into();
        let required_experience_years = extract_experience_years(&text);
        Self {
            id: id.into(),
            text,
            embedding,
            vertical: None,
            required_experience_years,
        }
    }

    pub fn with_vertical(mut self, vertical: impl Into<String>) -> Self {
        self.vertical = Some(vertical.into());
        self
    }
}

/// One candidate, keyed by employee id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    /// Employee/candidate id. Uniqueness key for deduplication.
    pub id: String,
    /// Cached extracted resume text, when the upload pipeline stored it.
    pub text: Option<String>,
    /// Handed to the text-extraction collaborator when `text` is absent.
    pub source_path: Option<String>,
    pub embedding: Vec<f32>,
    /// Normalized skill strings from the extraction pipeline.
    pub skills: Vec<String>,
    pub experience_years: Option<f32>,
    pub projects: Vec<String>,
    pub certifications: Vec<String>,
}

impl CandidateProfile {
    pub fn new(id: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            text: None,
            source_path: None,
            embedding,
            skills: Vec::new(),
            experience_years: None,
            projects: Vec::new(),
            certifications: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_source_path(mut self, path: impl Into<String>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    pub fn with_skills(mut self, skills: Vec<String>) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_experience_years(mut self, years: f32) -> Self {
        self.experience_years = Some(years);
        self
    }

    pub fn with_projects(mut self, projects: Vec<String>) -> Self {
        self.projects = projects;
        self
    }

    pub fn with_certifications(mut self, certifications: Vec<String>) -> Self {
        self.certifications = certifications;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_parses_required_experience_from_text() {
        let job = JobDescription::new("jd-1", "Backend role, 5+ years experience", vec![0.1]);
        assert_eq!(job.required_experience_years, Some(5.0));
    }

    #[test]
    fn test_job_without_experience_figure() {
        let job = JobDescription::new("jd-2", "Backend role with Python", vec![0.1]);
        assert_eq!(job.required_experience_years, None);
    }

    #[test]
    fn test_candidate_builder() {
        let candidate = CandidateProfile::new("EMP-7", vec![0.2])
            .with_text("resume text")
            .with_skills(vec!["python".to_string()])
            .with_experience_years(4.0);

        assert_eq!(candidate.id, "EMP-7");
        assert_eq!(candidate.text.as_deref(), Some("resume text"));
        assert_eq!(candidate.experience_years, Some(4.0));
        assert!(candidate.projects.is_empty());
    }
}
