//! Template-based idea generation.
//!
//! Stands in for a model-backed generator: ideas are built from the profile
//! fields plus two extra entries keyed off which trend lists came back
//! non-empty. Infallible and never returns an empty list.

use std::future::Future;

use trendlens_core::{BusinessProfile, ContentIdea, IdeaError, IdeaGenerator, TrendBundle};

/// Idea generator producing deterministic, profile-templated concepts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateIdeas;

impl IdeaGenerator for TemplateIdeas {
    fn propose_ideas(
        &self,
        profile: &BusinessProfile,
        bundle: &TrendBundle,
    ) -> impl Future<Output = Result<Vec<ContentIdea>, IdeaError>> + Send {
        let ideas = build_ideas(profile, bundle);
        async move { Ok(ideas) }
    }
}

fn build_ideas(profile: &BusinessProfile, bundle: &TrendBundle) -> Vec<ContentIdea> {
    let mut ideas = vec![
        ContentIdea {
            id: "idea_1".to_string(),
            concept: format!(
                "Highlight {}'s unique {} offerings in {}",
                profile.business_name, profile.business_type, profile.city
            ),
            trend_source: "Local Business Focus".to_string(),
            relevance_score: 0.8,
            reasoning: Some(
                "Showcasing local business strengths appeals to community-focused customers"
                    .to_string(),
            ),
        },
        ContentIdea {
            id: "idea_2".to_string(),
            concept: format!(
                "Share customer testimonials and success stories from {}",
                profile.target_audience
            ),
            trend_source: "Customer Engagement".to_string(),
            relevance_score: 0.7,
            reasoning: Some("Social proof helps build trust with potential customers".to_string()),
        },
        ContentIdea {
            id: "idea_3".to_string(),
            concept: format!(
                "Showcase behind-the-scenes content of {}",
                profile.services_offered
            ),
            trend_source: "Authenticity Trend".to_string(),
            relevance_score: 0.75,
            reasoning: Some(
                "Transparency in business operations builds customer connection".to_string(),
            ),
        },
    ];

    if !bundle.suggestions.is_empty() {
        ideas.push(ContentIdea {
            id: "idea_4".to_string(),
            concept: format!(
                "Create content around trending searches related to {}",
                profile.business_type
            ),
            trend_source: "Google Suggest UK".to_string(),
            relevance_score: 0.6,
            reasoning: Some("Leveraging search trends can increase visibility".to_string()),
        });
    }

    if !bundle.articles.is_empty() {
        ideas.push(ContentIdea {
            id: "idea_5".to_string(),
            concept: format!(
                "Share insights on how current UK news affects {}",
                profile.industry
            ),
            trend_source: "BBC Business News".to_string(),
            relevance_score: 0.65,
            reasoning: Some(
                "Connecting business to current events shows industry awareness".to_string(),
            ),
        });
    }

    ideas
}
