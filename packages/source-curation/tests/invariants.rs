//! Property tests for score ranges, threshold monotonicity, weight
//! normalization and registry lookup.

use proptest::prelude::*;
use std::sync::Arc;

use source_curation::registry::{DomainRegistry, DEFAULT_AUTHORITY};
use source_curation::testing::{MockFetcher, MockLlm, MockStrategy};
use source_curation::types::QualityWeights;
use source_curation::{
    quality_score, score_relevance, BiographyQuality, CharacterAnalyzer, CharacterProfile,
    CredibilityScorer, CrossValidator, FeedbackStore, SourceCandidate, SourceDiscovery,
    SourceItem, StrategyDispatcher, Subject, ValidationOptions, Validator,
};

const PAGE: &str = "<html><body><p>Marie Curie biography. Marie Curie was a physicist and \
    chemist born in Warsaw. Historical records of Marie Curie describe radioactivity.</p>\
    </body></html>";

const FIELDS: &[&str] = &[
    "theoretical physics",
    "politics",
    "painting",
    "poetry",
    "military history",
    "philosophy",
];

const DATES: &[&str] = &["1905", "1998-04", "2021-06-01", "n.d."];

const PERIODS: &[&str] = &["1879-1955", "1412-1431", "1961-"];

const HOSTS: &[&str] = &[
    "www.nobelprize.org",
    "archive.org",
    "www.loc.gov",
    "www.britannica.com",
    "example.com",
    "blog.example.net",
    "www.jstor.org",
];

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn item_strategy() -> impl Strategy<Value = SourceItem> {
    (
        "[A-Za-z ]{0,40}",
        prop::sample::select(HOSTS),
        prop::option::of("[A-Za-z ]{1,20}"),
        prop::option::of(prop::sample::select(DATES)),
    )
        .prop_map(|(title, host, author, date)| SourceItem {
            title,
            url: Some(format!("https://{}/curie", host)),
            author,
            publication_date: date.map(str::to_string),
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn quality_stays_in_range(
        credibility in -50.0f64..150.0,
        relevance in -1.0f64..2.0,
        completeness in 0.0f64..1.0,
        uniqueness in 0.0f64..1.0,
    ) {
        let q = quality_score(credibility, relevance, completeness, uniqueness);
        prop_assert!((0.0..=100.0).contains(&q));
    }

    #[test]
    fn relevance_stays_in_range(name in "[A-Za-z ]{0,20}", title in ".{0,40}", body in ".{0,400}") {
        let r = score_relevance(&name, &title, &body).score;
        prop_assert!((0.0..=1.0).contains(&r));
    }

    #[test]
    fn credibility_stays_in_range(item in item_strategy()) {
        let scorer = CredibilityScorer::new(DomainRegistry::shared());
        let c = scorer.assess(&item).overall;
        prop_assert!((0.0..=100.0).contains(&c));
    }

    #[test]
    fn raising_thresholds_never_accepts_more(
        items in prop::collection::vec(item_strategy(), 1..8),
        relevance in 0.0f64..1.0,
        relevance_step in 0.0f64..0.5,
        credibility in 0.0f64..100.0,
        credibility_step in 0.0f64..30.0,
    ) {
        let validator = Validator::new(
            CredibilityScorer::new(DomainRegistry::shared()),
            Arc::new(MockFetcher::new().with_default_page(PAGE)),
        );
        let subject = Subject::parse("Marie Curie").unwrap();
        let candidates: Vec<SourceCandidate> = items.into_iter().map(SourceCandidate::new).collect();
        let loose = ValidationOptions {
            min_relevance: relevance,
            min_credibility: credibility,
            ..Default::default()
        };
        let strict = ValidationOptions {
            min_relevance: (relevance + relevance_step).min(1.0),
            min_credibility: (credibility + credibility_step).min(100.0),
            ..Default::default()
        };

        let (loose, strict) = runtime().block_on(async {
            (
                validator.validate(&subject, candidates.clone(), &loose).await,
                validator.validate(&subject, candidates, &strict).await,
            )
        });
        prop_assert!(strict.summary.accepted_sources <= loose.summary.accepted_sources);
        prop_assert!(!loose.recommendations.is_empty());
    }

    #[test]
    fn discovery_is_idempotent(
        name in "[A-Z][a-z]{2,8} [A-Z][a-z]{2,10}",
        field in prop::option::of(prop::sample::select(FIELDS)),
        period in prop::option::of(prop::sample::select(PERIODS)),
    ) {
        let wikipedia = MockStrategy::from_fn("wikipedia", |subject: &Subject| {
            vec![SourceCandidate::new(SourceItem::web(
                subject.as_str(),
                format!("https://en.wikipedia.org/wiki/{}", subject.slug()),
            ))]
        });
        let discovery = SourceDiscovery::new(
            StrategyDispatcher::new(CredibilityScorer::new(DomainRegistry::shared()))
                .with_wikipedia(Arc::new(wikipedia)),
        );
        let subject = Subject::parse(&name).unwrap();
        let mut profile = CharacterProfile::fallback(subject.as_str());
        profile.field = field.map(str::to_string);
        profile.period = period.map(str::to_string);

        let (first, second) = runtime().block_on(async {
            (
                discovery.discover(&subject, Some(&profile)).await,
                discovery.discover(&subject, Some(&profile)).await,
            )
        });
        let urls = |report: &source_curation::DiscoveryReport| -> Vec<String> {
            report.candidates.iter().filter_map(|c| c.url().map(str::to_string)).collect()
        };
        prop_assert!(!first.candidates.is_empty());
        prop_assert_eq!(urls(&first), urls(&second));
        let mut seen = std::collections::HashSet::new();
        for url in urls(&first) {
            prop_assert!(seen.insert(url.to_lowercase()));
        }
    }

    #[test]
    fn analyzer_is_total(name in "[A-Za-z][A-Za-z .'-]{0,30}") {
        let analyzer = CharacterAnalyzer::new(Arc::new(MockLlm::new().failing()));
        let subject = Subject::parse(&name).unwrap();
        let outcome = runtime().block_on(analyzer.analyze(&subject));
        prop_assert!(outcome.fallback_used());
        prop_assert!(!outcome.value().search_terms.is_empty());
    }

    #[test]
    fn cross_validation_scores_stay_in_range(
        items in prop::collection::vec(item_strategy(), 0..12),
        contents in prop::collection::vec("[a-z ]{0,80}", 12),
    ) {
        let validator = CrossValidator::new(
            Arc::new(MockLlm::new().failing()),
            CredibilityScorer::new(DomainRegistry::shared()),
        );
        let subject = Subject::parse("Marie Curie").unwrap();
        let sources: Vec<SourceCandidate> = items
            .into_iter()
            .zip(contents)
            .map(|(item, content)| SourceCandidate::new(item).with_meta("content", content))
            .collect();

        let result = runtime().block_on(validator.validate_set(&sources, &subject));
        for score in [
            result.consistency_score,
            result.temporal_coverage,
            result.diversity_score,
            result.redundancy_level,
            result.academic_compliance,
            result.overall_quality,
        ] {
            prop_assert!((0.0..=1.0).contains(&score), "{}", score);
        }
        prop_assert!(!result.recommendations.is_empty());
    }

    #[test]
    fn normalized_weights_sum_to_one(
        a in 0.0f64..5.0, b in 0.0f64..5.0, c in 0.0f64..5.0, d in 0.0f64..5.0, e in 0.0f64..5.0,
    ) {
        let mut weights = QualityWeights {
            domain_authority: a,
            content_quality: b,
            source_type: c,
            recency: d,
            citations: e,
        };
        weights.normalize();
        prop_assert!((weights.sum() - 1.0).abs() < 0.01);
    }

    #[test]
    fn learning_keeps_weights_normalized(
        scores in prop::collection::vec(0.0f64..100.0, 1..12),
        items in prop::collection::vec(item_strategy(), 0..6),
    ) {
        let store = FeedbackStore::in_memory();
        let subject = Subject::parse("Marie Curie").unwrap();
        let sources: Vec<SourceCandidate> = items
            .into_iter()
            .map(|item| SourceCandidate::new(item).with_meta("publisher", "Nobel Foundation"))
            .collect();
        for score in scores {
            store.learn(&subject, &sources, &BiographyQuality::new(score));
            prop_assert!((store.weights().sum() - 1.0).abs() < 0.01);
        }
    }
}

#[test]
fn registry_exact_and_suffix_lookup_agree() {
    let registry = DomainRegistry::premium();
    for entry in registry.entries() {
        let exact = registry.lookup(entry.domain).unwrap();
        let suffix = registry.lookup(&format!("archive.{}", entry.domain)).unwrap();
        let url = registry
            .lookup(&format!("https://www.{}/some/page", entry.domain))
            .unwrap();
        assert_eq!(exact.domain, entry.domain);
        assert_eq!(suffix.domain, entry.domain);
        assert_eq!(url.domain, entry.domain);
    }
}

#[test]
fn registry_unknown_host() {
    let registry = DomainRegistry::premium();
    assert!(registry.lookup("unknown-host.invalid").is_none());
    assert_eq!(registry.authority("unknown-host.invalid"), DEFAULT_AUTHORITY);
}

#[test]
fn trend_rises_with_increasing_scores() {
    let store = FeedbackStore::in_memory();
    let subject = Subject::parse("Marie Curie").unwrap();
    for i in 0..12 {
        store.learn(&subject, &[], &BiographyQuality::new(60.0 + i as f64 * 2.0));
    }
    assert!(store.improvement_metrics(30).trend > 0.0);
}
