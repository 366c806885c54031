//! Locator configuration
//!
//! Every literal the matchers rely on (multilingual phrase lists, class/id
//! regexes, container selectors, wait timings) lives here so that locales can
//! be added from YAML without touching matcher logic. All sections default,
//! so an empty YAML document is the built-in configuration.

use crate::error::{Error, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete locator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Text and attribute patterns used by the matchers
    pub patterns: PatternConfig,

    /// Selectors that define each matcher's element universe
    pub selectors: SelectorConfig,

    /// Content-materialization wait timings
    pub traversal: TraversalConfig,

    /// How a winner is chosen when several strategies succeed
    pub selection: SelectionPolicy,
}

impl LocatorConfig {
    /// Validate the configuration and compile its patterns
    pub fn validate(&self) -> Result<()> {
        self.traversal.validate()?;
        self.selectors.validate()?;
        self.compile().map(|_| ())
    }

    /// Compile the pattern lists into matchers-ready form
    pub fn compile(&self) -> Result<CompiledPatterns> {
        Ok(CompiledPatterns {
            next_text: compile_all(&self.patterns.next_text)?,
            class_id: compile_all(&self.patterns.class_id)?,
            aria_label: compile_all(&self.patterns.aria_label)?,
            next_tokens: lowercase_all(&self.patterns.next_tokens),
            load_more: lowercase_all(&self.patterns.load_more),
        })
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Load a locator configuration from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<LocatorConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_config_from_str(&content)
}

/// Load a locator configuration from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<LocatorConfig> {
    // serde_yaml rejects a fully empty document, which should mean "defaults"
    if yaml.trim().is_empty() {
        return Ok(LocatorConfig::default());
    }

    let config: LocatorConfig = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse locator YAML: {e}")))?;

    config.validate()?;
    Ok(config)
}

// ============================================================================
// Patterns
// ============================================================================

/// Phrase and regex lists, tested case-insensitively
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Regexes tested against an element's extracted text, in order
    pub next_text: Vec<String>,

    /// Regexes tested against an element's class and id
    pub class_id: Vec<String>,

    /// Regexes tested against an accessible label
    pub aria_label: Vec<String>,

    /// Link texts that count as "next" inside a numbered pagination block
    pub next_tokens: Vec<String>,

    /// Substrings that mark a "load more" control
    pub load_more: Vec<String>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            next_text: to_strings(DEFAULT_NEXT_TEXT),
            class_id: to_strings(DEFAULT_CLASS_ID),
            aria_label: to_strings(DEFAULT_ARIA_LABEL),
            next_tokens: to_strings(&["next", "›", "→", "»"]),
            load_more: to_strings(DEFAULT_LOAD_MORE),
        }
    }
}

const DEFAULT_NEXT_TEXT: &[&str] = &[
    // English
    r"\bnext\b",
    // Spanish
    r"\bsiguiente\b",
    // French
    r"\bsuivante?\b",
    // German
    r"\bweiter\b",
    r"\bnächste\b",
    // Japanese
    r"次へ",
    r"次のページ",
    // Korean
    r"다음",
    // Chinese
    r"下一[页頁]",
    // Portuguese
    r"\bpróxim[ao]\b",
    // Dutch
    r"\bvolgende\b",
    // Swedish
    r"\bnästa\b",
    // Norwegian / Danish
    r"\bneste\b",
    r"\bnæste\b",
    // Directional glyphs
    r"(^|\s)[›»→]+(\s|$)",
    r"^>+$",
];

const DEFAULT_CLASS_ID: &[&str] = &[
    r"\bnext\b",
    r"pagination[-_]next",
    r"nav[-_]next",
    r"\bforward\b",
    r"arrow[-_]right",
    r"chevron[-_]right",
];

const DEFAULT_ARIA_LABEL: &[&str] = &[
    r"\bnext\b",
    r"\bforward\b",
    r"\bsiguiente\b",
    r"\bsuivante?\b",
    r"\bweiter\b",
    r"\bnächste\b",
    r"次へ",
    r"次のページ",
    r"다음",
    r"下一[页頁]",
    r"\bpróxim[ao]\b",
    r"\bvolgende\b",
    r"\bnästa\b",
    r"\bneste\b",
    r"\bnæste\b",
];

const DEFAULT_LOAD_MORE: &[&str] = &[
    // English
    "load more",
    "show more",
    "view more",
    "see more",
    "more results",
    // Spanish
    "cargar más",
    "ver más",
    "mostrar más",
    // French
    "charger plus",
    "voir plus",
    "afficher plus",
    // German
    "mehr laden",
    "mehr anzeigen",
    // Japanese
    "もっと見る",
    "さらに表示",
    // Korean
    "더 보기",
    "더보기",
    // Chinese
    "加载更多",
    "查看更多",
    "載入更多",
    // Portuguese
    "carregar mais",
    "ver mais",
    // Dutch
    "meer laden",
    "toon meer",
    // Swedish
    "visa fler",
    "ladda fler",
    // Norwegian / Danish
    "vis flere",
    "last flere",
    "indlæs flere",
];

// ============================================================================
// Selectors
// ============================================================================

/// CSS selectors that define where each matcher looks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Rel-attribute queries, tried in order
    pub rel_next: Vec<String>,

    /// Clickable universe for text and class/id matching
    pub clickable: String,

    /// Elements carrying an accessible label
    pub aria: String,

    /// Numbered pagination containers, tried in order
    pub pagination_containers: Vec<String>,

    /// Items inside a pagination container
    pub pagination_items: String,

    /// Markers for the current page
    pub current_page: String,

    /// Candidates for "load more" controls
    pub load_more_candidates: String,

    /// Explicit infinite-scroll markup
    pub infinite_scroll_markers: Vec<String>,

    /// Page-number links used to derive the total page count
    pub page_links: Vec<String>,

    /// Markers for a previous-page control
    pub previous: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            rel_next: to_strings(&[
                r#"a[rel="next"], link[rel="next"]"#,
                r#"a[rel="nofollow next"], link[rel="nofollow next"]"#,
            ]),
            clickable: "a[href], button[onclick], button[data-href]".to_string(),
            aria: "[aria-label], [aria-labelledby]".to_string(),
            pagination_containers: to_strings(&[
                ".pagination",
                ".pager",
                ".page-navigation",
                ".nav-links",
                r#"[role="navigation"]"#,
                "nav",
                ".paginator",
                ".page-numbers",
                ".wp-pagenavi",
                ".pagination-wrapper",
            ]),
            pagination_items: "a, button".to_string(),
            current_page: r#".current, .active, [aria-current="page"]"#.to_string(),
            load_more_candidates: r#"button, a, [role="button"]"#.to_string(),
            infinite_scroll_markers: to_strings(&[
                "[data-infinite-scroll]",
                ".infinite-scroll",
                "[data-auto-pager]",
            ]),
            page_links: to_strings(&[".pagination a", ".pager a", ".page-numbers a"]),
            previous: r#"a[rel="prev"], .prev, .previous"#.to_string(),
        }
    }
}

impl SelectorConfig {
    fn validate(&self) -> Result<()> {
        let singles = [
            ("selectors.clickable", &self.clickable),
            ("selectors.aria", &self.aria),
            ("selectors.pagination_items", &self.pagination_items),
            ("selectors.current_page", &self.current_page),
            ("selectors.load_more_candidates", &self.load_more_candidates),
            ("selectors.previous", &self.previous),
        ];
        for (field, value) in singles {
            if value.trim().is_empty() {
                return Err(Error::invalid_value(field, "selector cannot be empty"));
            }
        }

        let lists = [
            ("selectors.rel_next", &self.rel_next),
            ("selectors.pagination_containers", &self.pagination_containers),
            ("selectors.infinite_scroll_markers", &self.infinite_scroll_markers),
            ("selectors.page_links", &self.page_links),
        ];
        for (field, values) in lists {
            if values.iter().any(|s| s.trim().is_empty()) {
                return Err(Error::invalid_value(field, "selector cannot be empty"));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Traversal
// ============================================================================

/// Timings for the content-materialization wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// Give up after this many milliseconds without growth
    pub max_wait_ms: u64,

    /// Re-measure the body height this often
    pub poll_interval_ms: u64,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_wait_ms: 5000,
            poll_interval_ms: 100,
        }
    }
}

impl TraversalConfig {
    /// Create a traversal config
    pub fn new(max_wait_ms: u64, poll_interval_ms: u64) -> Self {
        Self {
            max_wait_ms,
            poll_interval_ms,
        }
    }

    /// Maximum wait as a duration
    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }

    /// Poll interval as a duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(Error::invalid_value(
                "traversal.poll_interval_ms",
                "must be greater than zero",
            ));
        }
        if self.poll_interval_ms > self.max_wait_ms {
            return Err(Error::invalid_value(
                "traversal.poll_interval_ms",
                format!(
                    "must not exceed traversal.max_wait_ms ({})",
                    self.max_wait_ms
                ),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Selection Policy
// ============================================================================

/// How the locator picks a winner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// First strategy in cascade order wins; later strategies never run
    #[default]
    PriorityOrder,
    /// Every strategy runs; the highest confidence wins, ties go to cascade order
    HighestConfidence,
}

// ============================================================================
// Compiled Patterns
// ============================================================================

/// Patterns ready for matching
#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    /// Compiled next-text regexes
    pub next_text: Vec<Regex>,
    /// Compiled class/id regexes
    pub class_id: Vec<Regex>,
    /// Compiled aria-label regexes
    pub aria_label: Vec<Regex>,
    /// Lowercased next tokens
    pub next_tokens: Vec<String>,
    /// Lowercased load-more phrases
    pub load_more: Vec<String>,
}

impl CompiledPatterns {
    /// Does the text match any next-text pattern?
    pub fn is_next_text(&self, text: &str) -> bool {
        any_match(&self.next_text, text)
    }

    /// Does the class/id surface match any class/id pattern?
    pub fn is_next_class_id(&self, surface: &str) -> bool {
        any_match(&self.class_id, surface)
    }

    /// Does the label match any aria-label pattern?
    pub fn is_next_label(&self, label: &str) -> bool {
        any_match(&self.aria_label, label)
    }

    /// Is the text exactly one of the next tokens?
    pub fn is_next_token(&self, text: &str) -> bool {
        let text = text.trim().to_lowercase();
        self.next_tokens.iter().any(|t| *t == text)
    }

    /// Does the text contain any load-more phrase?
    pub fn is_load_more(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.load_more.iter().any(|p| text.contains(p.as_str()))
    }
}

fn any_match(patterns: &[Regex], text: &str) -> bool {
    patterns.iter().any(|re| re.is_match(text))
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .map_err(|e| Error::pattern(p, e.to_string()))
        })
        .collect()
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use test_case::test_case;

    #[test]
    fn test_default_config_compiles() {
        let config = LocatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.traversal.max_wait_ms, 5000);
        assert_eq!(config.traversal.poll_interval_ms, 100);
        assert_eq!(config.selection, SelectionPolicy::PriorityOrder);
        assert_eq!(config.selectors.pagination_containers.len(), 10);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, LocatorConfig::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r"
traversal:
  max_wait_ms: 2000
selection: highest-confidence
patterns:
  load_more:
    - mehr zeigen
";
        let config = load_config_from_str(yaml).unwrap();
        assert_eq!(config.traversal.max_wait_ms, 2000);
        assert_eq!(config.traversal.poll_interval_ms, 100);
        assert_eq!(config.selection, SelectionPolicy::HighestConfidence);
        assert_eq!(config.patterns.load_more, vec!["mehr zeigen".to_string()]);
        assert_eq!(config.patterns.next_text, PatternConfig::default().next_text);
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let yaml = "patterns:\n  next_text:\n    - '(unclosed'\n";
        let err = load_config_from_str(yaml).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let yaml = "traversal:\n  poll_interval_ms: 0\n";
        let err = load_config_from_str(yaml).unwrap_err();
        assert!(err.to_string().contains("traversal.poll_interval_ms"));
    }

    #[test]
    fn test_poll_interval_above_max_wait_rejected() {
        let yaml = "traversal:\n  max_wait_ms: 50\n  poll_interval_ms: 100\n";
        assert!(load_config_from_str(yaml).is_err());
    }

    #[test]
    fn test_empty_selector_rejected() {
        let yaml = "selectors:\n  clickable: ''\n";
        let err = load_config_from_str(yaml).unwrap_err();
        assert!(err.to_string().contains("selectors.clickable"));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "traversal:\n  max_wait_ms: 750").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.traversal.max_wait(), Duration::from_millis(750));
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_yaml_roundtrip_of_defaults() {
        let yaml = LocatorConfig::default().to_yaml().unwrap();
        let back = load_config_from_str(&yaml).unwrap();
        assert_eq!(back, LocatorConfig::default());
    }

    #[test_case("Next" ; "english")]
    #[test_case("Next page ›" ; "english with glyph")]
    #[test_case("Siguiente" ; "spanish")]
    #[test_case("Page suivante" ; "french")]
    #[test_case("Weiter" ; "german")]
    #[test_case("次へ" ; "japanese")]
    #[test_case("다음 페이지" ; "korean")]
    #[test_case("下一页" ; "chinese")]
    #[test_case("Próxima" ; "portuguese")]
    #[test_case("Volgende" ; "dutch")]
    #[test_case("Nästa" ; "swedish")]
    #[test_case("Neste side" ; "norwegian")]
    #[test_case("»" ; "guillemet")]
    #[test_case("→" ; "arrow")]
    fn test_next_text_matches(text: &str) {
        let patterns = LocatorConfig::default().compile().unwrap();
        assert!(patterns.is_next_text(text), "expected '{text}' to match");
    }

    #[test_case("Previous" ; "previous")]
    #[test_case("Nextcloud setup" ; "word prefix")]
    #[test_case("Contact us" ; "unrelated")]
    #[test_case("2" ; "page number")]
    fn test_next_text_rejects(text: &str) {
        let patterns = LocatorConfig::default().compile().unwrap();
        assert!(!patterns.is_next_text(text), "expected '{text}' not to match");
    }

    #[test_case("btn pagination-next", true)]
    #[test_case("nav_next", true)]
    #[test_case("icon chevron-right", true)]
    #[test_case("page-link next", true)]
    #[test_case("prev", false)]
    #[test_case("nextgen-gallery", false)]
    fn test_class_id_patterns(surface: &str, expected: bool) {
        let patterns = LocatorConfig::default().compile().unwrap();
        assert_eq!(patterns.is_next_class_id(surface), expected);
    }

    #[test_case("Next page", true ; "english")]
    #[test_case("Go forward", true ; "forward")]
    #[test_case("次のページへ", true ; "japanese")]
    #[test_case("다음 페이지", true ; "korean")]
    #[test_case("目次", false ; "table of contents")]
    #[test_case("次回予告", false ; "kanji without next-page phrase")]
    #[test_case("Previous page", false ; "previous")]
    fn test_aria_label_patterns(label: &str, expected: bool) {
        let patterns = LocatorConfig::default().compile().unwrap();
        assert_eq!(patterns.is_next_label(label), expected);
    }

    #[test]
    fn test_next_tokens_and_load_more() {
        let patterns = LocatorConfig::default().compile().unwrap();
        assert!(patterns.is_next_token(" Next "));
        assert!(patterns.is_next_token("›"));
        assert!(!patterns.is_next_token("next page"));

        assert!(patterns.is_load_more("LOAD MORE"));
        assert!(patterns.is_load_more("Click to load more photos"));
        assert!(patterns.is_load_more("Ver más"));
        assert!(!patterns.is_load_more("Loading"));
    }
}
