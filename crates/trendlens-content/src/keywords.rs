//! Deterministic keyword derivation from a business profile.

use std::collections::HashSet;

use trendlens_core::BusinessProfile;

/// Derive the search keywords for a profile.
///
/// The list follows a fixed template over the profile fields, lowercased,
/// with empties dropped and duplicates removed while preserving first-seen
/// order. Always returns at least the generic entries, so it is never empty
/// for a validated profile.
#[must_use]
pub fn derive_keywords(profile: &BusinessProfile) -> Vec<String> {
    let business_type = profile.business_type.trim().to_lowercase();
    let city = profile.city.trim().to_lowercase();
    let industry = profile.industry.trim().to_lowercase();

    let candidates = [
        business_type.clone(),
        format!("{city} {business_type}"),
        industry.clone(),
        "local business".to_string(),
        "uk business".to_string(),
        format!("{business_type} near me"),
        city.clone(),
        format!("{industry} uk"),
    ];

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .filter(|k| seen.insert(k.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> BusinessProfile {
        BusinessProfile {
            business_name: "Joe's Coffee".to_string(),
            business_type: "Cafe".to_string(),
            city: "Bristol".to_string(),
            industry: "Hospitality".to_string(),
            target_audience: "young professionals".to_string(),
            services_offered: "specialty coffee".to_string(),
        }
    }

    #[test]
    fn derives_the_template_list_in_order() {
        let keywords = derive_keywords(&profile());
        assert_eq!(
            keywords,
            vec![
                "cafe",
                "bristol cafe",
                "hospitality",
                "local business",
                "uk business",
                "cafe near me",
                "bristol",
                "hospitality uk",
            ]
        );
    }

    #[test]
    fn lowercases_all_entries() {
        let keywords = derive_keywords(&profile());
        assert!(keywords.iter().all(|k| k == &k.to_lowercase()));
    }

    #[test]
    fn removes_duplicates_preserving_first_occurrence() {
        let mut p = profile();
        // City and industry collide with the business type after lowering.
        p.city = "Cafe".to_string();
        p.industry = "cafe".to_string();
        let keywords = derive_keywords(&p);
        assert_eq!(
            keywords.iter().filter(|k| k.as_str() == "cafe").count(),
            1,
            "duplicate keyword should appear once: {keywords:?}"
        );
        assert_eq!(keywords[0], "cafe");
    }
}
