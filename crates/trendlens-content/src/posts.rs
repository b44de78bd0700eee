//! Per-platform post templating.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use trendlens_core::{BusinessProfile, ContentIdea};

static HASHTAG_STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]").expect("hashtag pattern is valid"));

/// Turn free text into a hashtag fragment: alphanumerics only.
fn hashtag(text: &str) -> String {
    HASHTAG_STRIP.replace_all(text, "").to_string()
}

/// Render post text for one idea on one platform.
///
/// Known platforms (`twitter`, `instagram`, `facebook`, case-insensitive)
/// get their dedicated template; anything else gets a generic one. The
/// result is never empty. Platform length conventions (such as the short
/// format's 280 characters) are a display concern and are not enforced.
#[must_use]
pub fn render_post(profile: &BusinessProfile, idea: &ContentIdea, platform: &str) -> String {
    let name = &profile.business_name;
    let city = &profile.city;
    let business_type = &profile.business_type;
    let city_tag = hashtag(city);
    let type_tag = hashtag(business_type);

    match platform.to_ascii_lowercase().as_str() {
        "twitter" => format!(
            "🎯 {}\n\nVisit {name} in {city} for quality {business_type} services!\n\n\
             #{city_tag} #{type_tag} #LocalBusiness #UK",
            idea.concept
        ),
        "instagram" => format!(
            "✨ {} ✨\n\n📍 Located in {city}\n🏢 Specializing in {}\n👥 Perfect for {}\n\n\
             Come and experience what makes {name} special!\n\n\
             #{city_tag} #{type_tag} #LocalBusiness #UK #Quality #Service",
            idea.concept, profile.services_offered, profile.target_audience
        ),
        "facebook" => format!(
            "{}\n\nAt {name}, we're proud to serve the {city} community with our {}. \
             Our focus on {} means we understand what you need.\n\n\
             Why choose us?\n✓ Local {city} business\n✓ Experienced in {}\n\
             ✓ Committed to quality service\n\n\
             Visit us today and see the difference! Contact us for more information.\n\n\
             #{city_tag}Business #{type_tag} #LocalSupport",
            idea.concept, profile.services_offered, profile.target_audience, profile.industry
        ),
        other => format!(
            "Template content for {other}: {} - {name} in {city}",
            idea.concept
        ),
    }
}

/// Render posts for every selected (idea, platform) pair.
///
/// Unknown idea ids are skipped; pairs are rendered in selection order.
/// Returns a `idea id -> platform -> text` map.
#[must_use]
pub fn generate_posts(
    profile: &BusinessProfile,
    ideas: &[ContentIdea],
    selected_ideas: &[String],
    selected_platforms: &[String],
) -> BTreeMap<String, BTreeMap<String, String>> {
    let mut results = BTreeMap::new();

    for idea_id in selected_ideas {
        let Some(idea) = ideas.iter().find(|i| &i.id == idea_id) else {
            tracing::warn!(idea_id = %idea_id, "skipping unknown idea id");
            continue;
        };

        let per_platform: BTreeMap<String, String> = selected_platforms
            .iter()
            .map(|platform| (platform.clone(), render_post(profile, idea, platform)))
            .collect();
        results.insert(idea_id.clone(), per_platform);
    }

    results
}
