//! The curation pipeline: the inbound operations over every component.
//!
//! ```rust,ignore
//! let pipeline = CurationPipeline::from_config(&CurationConfig::from_env()?)?;
//! let response = pipeline
//!     .generate_automatic(AutomaticRequest::new("Marie Curie"))
//!     .await?;
//! ```

use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use llm_client::LlmClient;

use crate::analyzer::CharacterAnalyzer;
use crate::config::CurationConfig;
use crate::cross::CrossValidator;
use crate::discovery::{dedup_by_url, DiscoveryReport, SourceDiscovery};
use crate::error::{CurationError, Result, Stage};
use crate::feedback::FeedbackStore;
use crate::fetch::HttpFetcher;
use crate::registry::DomainRegistry;
use crate::scoring::CredibilityScorer;
use crate::strategies::StrategyDispatcher;
use crate::traits::{Llm, PageFetcher};
use crate::types::{
    AdvancedValidationResponse, AutomaticRequest, AutomaticResponse, BiographyQuality,
    CharacterProfile, ContentQualityScore, GenerationMetadata, HybridMetadata, HybridRequest,
    HybridResponse, SourceCandidate, SourceValidation, Subject, SuccessCase, ValidationOptions,
    ValidationResult,
};
use crate::validation::hybrid::{self, drop_user_duplicates, user_candidate};
use crate::validation::{aggregate, is_well_formed_url, ContentAnalyzer, Validator};

/// Discovery rounds in automatic mode.
pub const AUTOMATIC_DISCOVERY_ROUNDS: usize = 4;

pub struct CurationPipeline {
    analyzer: CharacterAnalyzer,
    discovery: SourceDiscovery,
    validator: Validator,
    content: ContentAnalyzer,
    cross: CrossValidator,
    fetcher: Arc<dyn PageFetcher>,
    registry: Arc<DomainRegistry>,
    feedback: Arc<FeedbackStore>,
}

impl CurationPipeline {
    /// Pipeline over the premium registry, the default strategies and an
    /// in-memory feedback store.
    pub fn new(llm: Arc<dyn Llm>, fetcher: Arc<dyn PageFetcher>) -> Self {
        let registry = DomainRegistry::shared();
        let scorer = CredibilityScorer::new(registry.clone());
        let content = ContentAnalyzer::new(llm.clone());
        Self {
            analyzer: CharacterAnalyzer::new(llm.clone()),
            discovery: SourceDiscovery::new(StrategyDispatcher::new(scorer.clone())),
            validator: Validator::new(scorer.clone(), fetcher.clone())
                .with_content_analyzer(content.clone()),
            content,
            cross: CrossValidator::new(llm, scorer),
            fetcher,
            registry,
            feedback: Arc::new(FeedbackStore::in_memory()),
        }
    }

    /// Pipeline talking to the configured LLM endpoint and the open web,
    /// with the feedback store at the configured path.
    pub fn from_config(config: &CurationConfig) -> Result<Self> {
        let llm: Arc<dyn Llm> = Arc::new(LlmClient::new(config.client_config())?);
        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new());
        Ok(Self::new(llm, fetcher)
            .with_feedback(Arc::new(FeedbackStore::open(&config.tracking_path))))
    }

    pub fn with_dispatcher(mut self, dispatcher: StrategyDispatcher) -> Self {
        self.discovery = SourceDiscovery::new(dispatcher);
        self
    }

    pub fn with_feedback(mut self, feedback: Arc<FeedbackStore>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn feedback(&self) -> &Arc<FeedbackStore> {
        &self.feedback
    }

    pub fn analyzer(&self) -> &CharacterAnalyzer {
        &self.analyzer
    }

    /// Discover, validate and rank sources with no user input.
    pub async fn generate_automatic(&self, request: AutomaticRequest) -> Result<AutomaticResponse> {
        let started = Instant::now();
        let subject = Subject::parse(&request.subject)?;
        request.check()?;
        let options = request.validation_options();

        let analysis = self.analyzer.analyze(&subject).await;
        let analysis_fallback_used = analysis.fallback_used();
        let profile = analysis.into_value();

        let mut seen = HashSet::new();
        let mut strategies_used: Vec<String> = Vec::new();
        let mut failures = Vec::new();
        let mut results: Vec<SourceValidation> = Vec::new();
        let mut accepted = Vec::new();
        let mut discovered = 0;

        for query in round_queries(&subject, &profile, AUTOMATIC_DISCOVERY_ROUNDS) {
            let report = self.discovery.discover(&query, Some(&profile)).await;
            for name in &report.strategies_used {
                if !strategies_used.contains(name) {
                    strategies_used.push(name.clone());
                }
            }
            failures.extend(report.failures.iter().cloned());
            let fresh = unseen(report, &mut seen);
            if fresh.is_empty() {
                break;
            }
            discovered += fresh.len();

            let response = self.validator.validate(&subject, fresh, &options).await;
            for result in response.results {
                let meets_quality = result
                    .source
                    .quality_score
                    .is_some_and(|q| q >= request.min_quality);
                if result.accepted && meets_quality {
                    accepted.push(result.source.clone());
                }
                results.push(result);
            }
            if accepted.len() >= request.min_sources {
                break;
            }
        }

        if discovered == 0 {
            return Err(CurationError::NoSources {
                stage: Stage::Discovery,
                reason: no_candidates_reason(&failures),
            });
        }

        let candidates_accepted = accepted.len();
        let (sources, trimmed) =
            trim_by_priority(accepted, request.max_sources, &self.feedback.domain_priorities());
        let min_sources_met = sources.len() >= request.min_sources;
        if !min_sources_met {
            warn!(
                subject = %subject,
                accepted = sources.len(),
                min_sources = request.min_sources,
                "Fewer sources than requested"
            );
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            subject = %subject,
            discovered,
            accepted = sources.len(),
            trimmed,
            elapsed_ms,
            "Automatic generation complete"
        );

        Ok(AutomaticResponse {
            subject: subject.to_string(),
            sources,
            profile,
            validation_summary: aggregate(&results),
            strategies_used,
            generation_metadata: GenerationMetadata {
                candidates_discovered: discovered,
                candidates_accepted,
                trimmed,
                min_sources_met,
                analysis_fallback_used,
                elapsed_ms,
                generated_at: Utc::now(),
            },
        })
    }

    /// Keep every user URL and fill up to `target_count` with discovered
    /// sources.
    pub async fn generate_hybrid(&self, request: HybridRequest) -> Result<HybridResponse> {
        let started = Instant::now();
        let subject = Subject::parse(&request.subject)?;
        request.check()?;
        let options = request.validation_options();

        let user = dedup_by_url(request.user_urls.iter().map(|url| user_candidate(url)));
        let user_response = self.validator.validate(&subject, user, &options).await;

        let mut results: Vec<SourceValidation> = Vec::new();
        let mut user_sources = Vec::new();
        let mut user_warnings = Vec::new();
        for result in user_response.results {
            let mut source = result.source.clone();
            if !result.accepted {
                let warning = user_warning(&result, &options);
                warn!(subject = %subject, warning = %warning, "Keeping user source below thresholds");
                source.set_meta("below_threshold", true);
                user_warnings.push(warning);
            }
            user_sources.push(source);
            results.push(result);
        }

        let needed = request.target_count.saturating_sub(user_sources.len());
        let mut auto_sources: Vec<SourceCandidate> = Vec::new();
        let mut discovery_rounds = 0;
        let mut discovered = 0;
        let mut duplicates_of_user_urls = 0;
        let mut failures = Vec::new();

        if request.auto_complete && needed > 0 {
            let profile = self.analyzer.analyze(&subject).await.into_value();
            let mut seen: HashSet<String> =
                user_sources.iter().filter_map(SourceCandidate::dedup_key).collect();

            for query in round_queries(&subject, &profile, request.max_rounds) {
                discovery_rounds += 1;
                let mut report = self.discovery.discover(&query, Some(&profile)).await;
                failures.extend(report.failures.iter().cloned());
                let (candidates, dropped) = drop_user_duplicates(&user_sources, report.candidates);
                duplicates_of_user_urls += dropped;
                report.candidates = candidates;

                let fresh = unseen(report, &mut seen);
                if fresh.is_empty() {
                    break;
                }
                discovered += fresh.len();

                let response = self.validator.validate(&subject, fresh, &options).await;
                for result in response.results {
                    if result.accepted && auto_sources.len() < needed {
                        auto_sources.push(result.source.clone());
                    }
                    results.push(result);
                }
                if auto_sources.len() >= needed {
                    break;
                }
            }
        }

        if user_sources.is_empty() && auto_sources.is_empty() && discovered == 0 {
            return Err(CurationError::NoSources {
                stage: Stage::Discovery,
                reason: if request.auto_complete {
                    no_candidates_reason(&failures)
                } else {
                    "no user URLs were given and auto_complete is off".to_string()
                },
            });
        }

        let user_source_count = user_sources.len();
        let auto_generated_count = auto_sources.len();
        let mut sources = user_sources;
        sources.extend(auto_sources);

        let suggestions = if request.provide_suggestions {
            hybrid::suggestions(
                &subject,
                &sources,
                request.target_count,
                request.auto_complete,
                &self.registry,
            )
        } else {
            Vec::new()
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            subject = %subject,
            user = user_source_count,
            auto = auto_generated_count,
            target = request.target_count,
            rounds = discovery_rounds,
            elapsed_ms,
            "Hybrid generation complete"
        );

        Ok(HybridResponse {
            subject: subject.to_string(),
            user_source_count,
            auto_generated_count,
            suggestions,
            validation_summary: aggregate(&results),
            metadata: HybridMetadata {
                target_met: sources.len() >= request.target_count,
                discovery_rounds,
                candidates_discovered: discovered,
                user_warnings,
                duplicates_of_user_urls,
                elapsed_ms,
                generated_at: Utc::now(),
            },
            sources,
            configuration: request,
        })
    }

    /// Validate caller-supplied candidates.
    pub async fn validate_advanced(
        &self,
        subject: &str,
        candidates: Vec<SourceCandidate>,
        options: &ValidationOptions,
    ) -> Result<AdvancedValidationResponse> {
        let subject = Subject::parse(subject)?;
        options.check()?;
        Ok(self.validator.validate(&subject, candidates, options).await)
    }

    pub async fn cross_validate(
        &self,
        sources: &[SourceCandidate],
        subject: &str,
    ) -> Result<ValidationResult> {
        let subject = Subject::parse(subject)?;
        Ok(self.cross.validate_set(sources, &subject).await)
    }

    /// Deep-analyze one page; an unreachable page scores as unavailable.
    pub async fn analyze_content(
        &self,
        url: &str,
        subject: &str,
        max_length: usize,
    ) -> Result<ContentQualityScore> {
        let subject = Subject::parse(subject)?;
        if !is_well_formed_url(url) {
            return Err(CurationError::invalid("url", format!("malformed URL: {}", url)));
        }
        if max_length == 0 {
            return Err(CurationError::invalid("max_length", "must be positive"));
        }

        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(url = %url, error = %e, "Page unreachable for content analysis");
                return Ok(ContentQualityScore::unavailable(Some(url.to_string()), &e.to_string()));
            }
        };
        if !page.is_accessible() {
            let reason = format!("HTTP {}", page.status);
            return Ok(ContentQualityScore::unavailable(Some(url.to_string()), &reason));
        }

        Ok(self
            .content
            .analyze(&subject, Some(url), &page.text(), max_length)
            .await)
    }

    /// Record a generated biography's quality against the sources it used.
    pub fn learn(
        &self,
        subject: &str,
        sources: &[SourceCandidate],
        quality: &BiographyQuality,
    ) -> Result<SuccessCase> {
        let subject = Subject::parse(subject)?;
        if !(0.0..=100.0).contains(&quality.overall_score) {
            return Err(CurationError::invalid(
                "overall_score",
                "must be between 0 and 100",
            ));
        }
        Ok(self.feedback.learn(&subject, sources, quality))
    }
}

/// The subject, then each distinct search term, up to `max_rounds` queries.
fn round_queries(subject: &Subject, profile: &CharacterProfile, max_rounds: usize) -> Vec<Subject> {
    std::iter::once(subject.clone())
        .chain(
            profile
                .search_terms
                .iter()
                .filter(|term| !term.trim().eq_ignore_ascii_case(subject.as_str()))
                .filter_map(|term| Subject::parse(term).ok()),
        )
        .take(max_rounds.max(1))
        .collect()
}

/// Candidates whose URL has not been seen in an earlier round.
fn unseen(report: DiscoveryReport, seen: &mut HashSet<String>) -> Vec<SourceCandidate> {
    report
        .candidates
        .into_iter()
        .filter(|c| c.dedup_key().map_or(true, |key| seen.insert(key)))
        .collect()
}

fn no_candidates_reason(failures: &[(String, String)]) -> String {
    if failures.is_empty() {
        "every strategy returned no candidates".to_string()
    } else {
        let failed: Vec<String> = failures
            .iter()
            .map(|(strategy, error)| format!("{} ({})", strategy, error))
            .collect();
        format!("no candidates; failed strategies: {}", failed.join(", "))
    }
}

fn user_warning(result: &SourceValidation, options: &ValidationOptions) -> String {
    let url = result.source.url().unwrap_or("-");
    let mut reasons = result.issues.clone();
    if result.accessible == Some(false) {
        reasons.push("not accessible".to_string());
    }
    if let Some(relevance) = result.relevance.filter(|r| *r < options.min_relevance) {
        reasons.push(format!("relevance {:.2} below {:.2}", relevance, options.min_relevance));
    }
    if result.credibility.overall < options.min_credibility {
        reasons.push(format!(
            "credibility {:.0} below {:.0}",
            result.credibility.overall, options.min_credibility
        ));
    }
    format!("{}: {}", url, reasons.join("; "))
}

/// Keep the `max` highest-priority sources (learned domain priority, then
/// quality), preserving their original order.
///
/// Returns the survivors and how many were dropped.
pub fn trim_by_priority(
    sources: Vec<SourceCandidate>,
    max: usize,
    priorities: &BTreeMap<String, f64>,
) -> (Vec<SourceCandidate>, usize) {
    if sources.len() <= max {
        return (sources, 0);
    }
    let priority = |c: &SourceCandidate| {
        c.host()
            .and_then(|host| priorities.get(&host).copied())
            .unwrap_or(0.0)
    };
    let quality = |c: &SourceCandidate| c.quality_score.unwrap_or(0.0);

    let mut ranked: Vec<usize> = (0..sources.len()).collect();
    ranked.sort_by(|&a, &b| {
        priority(&sources[b])
            .total_cmp(&priority(&sources[a]))
            .then(quality(&sources[b]).total_cmp(&quality(&sources[a])))
            .then(a.cmp(&b))
    });
    let keep: HashSet<usize> = ranked.into_iter().take(max).collect();
    let dropped = sources.len() - keep.len();

    let kept = sources
        .into_iter()
        .enumerate()
        .filter(|(i, _)| keep.contains(i))
        .map(|(_, c)| c)
        .collect();
    (kept, dropped)
}
