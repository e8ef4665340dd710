//! Signal extractors over raw job/resume text
//!
//! Default implementations of the extraction collaborators: a
//! controlled-vocabulary skill extractor and line-based
//! certification/project/experience extractors. Hosts with richer NLP
//! pipelines can bypass these and populate the profile records directly.

pub mod signals;
pub mod skills;

pub use signals::{
    extract_certifications, extract_experience_years, extract_projects, infer_vertical,
};
pub use skills::SkillExtractor;
