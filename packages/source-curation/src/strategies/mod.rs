//! Discovery strategies and the dispatcher that picks them per subject.

pub mod catalog;
pub mod template;
pub mod wikipedia;

use std::sync::Arc;

use crate::scoring::CredibilityScorer;
use crate::traits::SourceStrategy;
use crate::types::CharacterProfile;

pub use catalog::Nation;
pub use template::{TemplateStrategy, UrlTemplate};
pub use wikipedia::WikipediaStrategy;

/// Broad field of activity, inferred from the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Scientific,
    Political,
    Artistic,
    Literary,
    Military,
    /// No recognizable field; general academic search
    Academic,
}

impl Field {
    /// Keyword prefixes checked in order; the first field with a hit wins.
    const KEYWORDS: &'static [(Field, &'static [&'static str])] = &[
        (
            Field::Scientific,
            &[
                "physic", "chemi", "biolog", "scien", "mathemat", "astronom", "medic",
                "engineer", "invent", "geolog", "naturalist", "relativity", "quantum",
            ],
        ),
        (
            Field::Political,
            &[
                "politic", "president", "statesm", "minister", "diplomat", "monarch", "king",
                "queen", "emperor", "revolution", "activis", "senator", "governor",
                "chancellor", "civil rights",
            ],
        ),
        (
            Field::Artistic,
            &[
                "art", "paint", "sculpt", "music", "compos", "architect", "photograph",
                "film", "danc", "opera",
            ],
        ),
        (
            Field::Literary,
            &[
                "writ", "poet", "novel", "author", "literat", "playwright", "dramatist",
                "essay",
            ],
        ),
        (
            Field::Military,
            &[
                "militar", "general", "admiral", "soldier", "war", "command", "officer",
                "marshal", "army", "naval", "navy",
            ],
        ),
    ];

    /// Classify from field, specialty and key events.
    pub fn classify(profile: Option<&CharacterProfile>) -> Field {
        let Some(profile) = profile else {
            return Field::Academic;
        };
        let text = profile.descriptor_text();
        let words: Vec<&str> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let hit = |keyword: &str| {
            if keyword.contains(' ') {
                text.contains(keyword)
            } else {
                words.iter().any(|w| w.starts_with(keyword))
            }
        };

        Self::KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| hit(k)))
            .map(|(field, _)| *field)
            .unwrap_or(Field::Academic)
    }

    pub fn strategy_name(&self) -> &'static str {
        match self {
            Field::Scientific => "scientific",
            Field::Political => "political",
            Field::Artistic => "artistic",
            Field::Literary => "literary",
            Field::Military => "military",
            Field::Academic => "academic",
        }
    }

    /// Fields whose figures are covered by international cultural bodies.
    fn is_cultural(&self) -> bool {
        matches!(self, Field::Scientific | Field::Artistic | Field::Literary)
    }
}

const CULTURAL_KEYWORDS: &[&str] = &["educat", "cultur", "philosoph", "teach", "heritage"];

/// Chooses strategies for a subject from its profile.
///
/// Wikipedia and the biographical encyclopedias are always used; the field
/// strategy, national archives, news and international organizations are
/// added as the profile warrants.
#[derive(Clone)]
pub struct StrategyDispatcher {
    scorer: CredibilityScorer,
    wikipedia: Arc<dyn SourceStrategy>,
}

impl StrategyDispatcher {
    pub fn new(scorer: CredibilityScorer) -> Self {
        let wikipedia = Arc::new(WikipediaStrategy::new(scorer.clone()));
        Self { scorer, wikipedia }
    }

    /// Replace the Wikipedia strategy, e.g. with one pointed at another API base.
    pub fn with_wikipedia(mut self, wikipedia: Arc<dyn SourceStrategy>) -> Self {
        self.wikipedia = wikipedia;
        self
    }

    fn templates(&self, name: &str, templates: Vec<UrlTemplate>) -> Arc<dyn SourceStrategy> {
        Arc::new(TemplateStrategy::new(name, templates, self.scorer.clone()))
    }

    /// Strategies for one subject, in reporting order.
    pub fn select(&self, profile: Option<&CharacterProfile>) -> Vec<Arc<dyn SourceStrategy>> {
        let field = Field::classify(profile);
        let nation = Nation::detect(profile.and_then(|p| p.nationality.as_deref()));

        let mut strategies = vec![self.wikipedia.clone()];

        let mut field_templates: Vec<UrlTemplate> = match field {
            Field::Scientific => catalog::SCIENTIFIC.to_vec(),
            Field::Political => catalog::POLITICAL.to_vec(),
            Field::Artistic => catalog::ARTISTIC.to_vec(),
            Field::Literary => catalog::LITERARY.to_vec(),
            Field::Military => catalog::MILITARY.to_vec(),
            Field::Academic => catalog::ACADEMIC.to_vec(),
        };
        if field == Field::Political {
            field_templates.extend_from_slice(nation.unwrap_or(Nation::UnitedStates).legislature());
        }
        strategies.push(self.templates(field.strategy_name(), field_templates));

        strategies.push(self.templates("biographical", catalog::BIOGRAPHICAL.to_vec()));

        if matches!(field, Field::Political | Field::Military) || nation.is_some() {
            let archives = nation.unwrap_or(Nation::UnitedStates).archives();
            strategies.push(self.templates("government_archives", archives.to_vec()));
        }

        if profile.is_some_and(CharacterProfile::is_contemporary) {
            strategies.push(self.templates("news_archives", catalog::NEWS.to_vec()));
        }

        let cultural_text = profile.map(|p| p.descriptor_text()).unwrap_or_default();
        if field.is_cultural() || CULTURAL_KEYWORDS.iter().any(|k| cultural_text.contains(k)) {
            strategies.push(self.templates("international_organizations", catalog::INTERNATIONAL.to_vec()));
        }

        strategies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DomainRegistry;

    fn dispatcher() -> StrategyDispatcher {
        StrategyDispatcher::new(CredibilityScorer::new(DomainRegistry::shared()))
    }

    fn profile(field: &str, nationality: Option<&str>, period: Option<&str>) -> CharacterProfile {
        let mut profile = CharacterProfile::fallback("Someone");
        profile.field = Some(field.into());
        profile.nationality = nationality.map(String::from);
        profile.period = period.map(String::from);
        profile
    }

    fn names(profile: Option<&CharacterProfile>) -> Vec<String> {
        dispatcher()
            .select(profile)
            .iter()
            .map(|s| s.name().to_string())
            .collect()
    }

    #[test]
    fn test_classify_fields() {
        let cases = [
            ("theoretical physics", Field::Scientific),
            ("politics", Field::Political),
            ("painting", Field::Artistic),
            ("poetry", Field::Literary),
            ("military command", Field::Military),
            ("philanthropy", Field::Academic),
        ];
        for (text, expected) in cases {
            assert_eq!(Field::classify(Some(&profile(text, None, None))), expected, "{}", text);
        }
        assert_eq!(Field::classify(None), Field::Academic);
    }

    #[test]
    fn test_art_does_not_match_party() {
        assert_eq!(
            Field::classify(Some(&profile("party organizer", None, None))),
            Field::Academic
        );
    }

    #[test]
    fn test_no_profile_uses_generic_strategies() {
        assert_eq!(names(None), vec!["wikipedia", "academic", "biographical"]);
    }

    #[test]
    fn test_modern_scientist_strategies() {
        let p = profile("physics", Some("German"), Some("1879-1955"));
        assert_eq!(
            names(Some(&p)),
            vec![
                "wikipedia",
                "scientific",
                "biographical",
                "government_archives",
                "news_archives",
                "international_organizations",
            ]
        );
    }

    #[test]
    fn test_politician_gets_archives_without_nationality() {
        let p = profile("politics", None, Some("44 BC"));
        assert_eq!(
            names(Some(&p)),
            vec!["wikipedia", "political", "biographical", "government_archives"]
        );
    }
}
