//! Greedy semantic bipartite skill matching

use crate::embedding::{cosine_similarity, Embedder};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One matched (job skill, candidate skill) pair at or above the matching
/// threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillPair {
    pub job_skill: String,
    pub candidate_skill: String,
    /// Cosine similarity between the two skill embeddings, rounded to 2
    /// decimals.
    pub similarity: f32,
}

/// Pair job skills with candidate skills by embedding similarity.
///
/// For each job skill, in the order given, the highest-similarity candidate
/// skill at or above `threshold` is taken and consumed so it cannot match a
/// second job skill; ties keep the first-seen candidate skill. The matching
/// is greedy rather than globally optimal, trading optimality for a single
/// similarity pass per job skill. Returns the pairs and the coverage
/// ratio `|pairs| / max(|job_skills|, 1)` rounded to 2 decimals.
pub fn match_skills(
    embedder: &dyn Embedder,
    job_skills: &[String],
    candidate_skills: &[String],
    threshold: f32,
) -> Result<(Vec<SkillPair>, f32)> {
    let job_skills: Vec<&str> = job_skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    let candidate_skills: Vec<&str> = candidate_skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    if job_skills.is_empty() || candidate_skills.is_empty() {
        return Ok((Vec::new(), 0.0));
    }

    let job_vectors = job_skills
        .iter()
        .map(|s| embedder.embed(s))
        .collect::<Result<Vec<_>>>()?;
    let candidate_vectors = candidate_skills
        .iter()
        .map(|s| embedder.embed(s))
        .collect::<Result<Vec<_>>>()?;

    let mut pairs = Vec::new();
    let mut consumed = vec![false; candidate_skills.len()];

    for (i, job_vec) in job_vectors.iter().enumerate() {
        let mut best: Option<(usize, f32)> = None;
        for (j, candidate_vec) in candidate_vectors.iter().enumerate() {
            if consumed[j] {
                continue;
            }
            let sim = cosine_similarity(job_vec, candidate_vec)?;
            if sim >= threshold && best.map_or(true, |(_, s)| sim > s) {
                best = Some((j, sim));
            }
        }

        if let Some((j, sim)) = best {
            consumed[j] = true;
            pairs.push(SkillPair {
                job_skill: job_skills[i].to_string(),
                candidate_skill: candidate_skills[j].to_string(),
                similarity: round2(sim),
            });
        }
    }

    let ratio = pairs.len() as f32 / job_skills.len().max(1) as f32;
    Ok((pairs, round2(ratio)))
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
