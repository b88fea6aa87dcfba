use crate::errors::VocabularyError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Serialized form of a vocabulary, as stored in a JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyDefinition {
    /// Version string recorded alongside the topics
    pub version: String,

    /// Topics in canonical order
    pub topics: Vec<TopicDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicDefinition {
    /// Canonical label emitted as the tag
    pub label: String,

    /// Trigger keywords for the keyword tagger
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Reference description used as this topic's document by the statistical tagger
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// A loaded topic with its compiled keyword matcher
#[derive(Debug, Clone)]
pub struct Topic {
    pub label: String,
    pub reference: Option<String>,
    matcher: Option<Regex>,
}

impl Topic {
    /// Whether any trigger keyword occurs in `text` on word boundaries, ignoring case
    pub fn matches(&self, text: &str) -> bool {
        self.matcher.as_ref().is_some_and(|re| re.is_match(text))
    }
}

/// The controlled topic vocabulary. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    version: String,
    topics: Vec<Topic>,
}

impl Vocabulary {
    /// Validates a definition and compiles its keyword matchers
    pub fn new(definition: VocabularyDefinition) -> Result<Self, VocabularyError> {
        let mut seen = HashSet::new();
        let mut topics = Vec::with_capacity(definition.topics.len());

        for topic in definition.topics {
            let label = topic.label.trim().to_string();
            if label.is_empty() {
                return Err(VocabularyError::EmptyLabel);
            }
            if !seen.insert(fold_label(&label)) {
                return Err(VocabularyError::DuplicateLabel(label));
            }

            let keywords: Vec<String> = topic
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
            let matcher = compile_matcher(&label, &keywords)?;
            let reference = topic
                .reference
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty());

            topics.push(Topic {
                label,
                reference,
                matcher,
            });
        }

        ::log::debug!(
            "Loaded vocabulary {} with {} topics",
            definition.version,
            topics.len()
        );

        Ok(Self {
            version: definition.version,
            topics,
        })
    }

    /// The vocabulary shipped with the crate
    pub fn builtin() -> Result<Self, VocabularyError> {
        Self::new(builtin_definition())
    }

    /// Load a vocabulary definition from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, VocabularyError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load a vocabulary definition from a JSON string
    pub fn from_json(json: &str) -> Result<Self, VocabularyError> {
        let definition: VocabularyDefinition = serde_json::from_str(json)?;
        Self::new(definition)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Topics in canonical order
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Canonical position of a label, compared case-insensitively
    pub fn position(&self, label: &str) -> Option<usize> {
        let key = fold_label(label);
        self.topics.iter().position(|t| fold_label(&t.label) == key)
    }

    /// The vocabulary's own spelling of a label
    pub fn canonical_label(&self, label: &str) -> Option<&str> {
        self.position(label).map(|i| self.topics[i].label.as_str())
    }

    /// Whether any topic carries reference text for statistical scoring
    pub fn has_reference_corpus(&self) -> bool {
        self.topics.iter().any(|t| t.reference.is_some())
    }
}

/// Case folding shared by label lookup, duplicate detection and tag merging
pub(crate) fn fold_label(label: &str) -> String {
    label.trim().to_lowercase()
}

fn compile_matcher(label: &str, keywords: &[String]) -> Result<Option<Regex>, VocabularyError> {
    if keywords.is_empty() {
        return Ok(None);
    }

    let alternatives = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");

    RegexBuilder::new(&format!(r"\b(?:{alternatives})\b"))
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|source| VocabularyError::Pattern {
            label: label.to_string(),
            source,
        })
}

fn topic(label: &str, keywords: &[&str], reference: &str) -> TopicDefinition {
    TopicDefinition {
        label: label.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        reference: Some(reference.to_string()),
    }
}

/// Built-in topics covering the research areas FOAs are usually filed under
pub fn builtin_definition() -> VocabularyDefinition {
    VocabularyDefinition {
        version: "2025.1".to_string(),
        topics: vec![
            topic(
                "Artificial Intelligence",
                &[
                    "ai",
                    "artificial intelligence",
                    "machine learning",
                    "deep learning",
                    "neural network",
                    "neural networks",
                    "nlp",
                    "natural language processing",
                    "computer vision",
                    "robotics",
                    "autonomous systems",
                    "reinforcement learning",
                    "generative ai",
                    "large language model",
                    "large language models",
                    "llm",
                    "llms",
                ],
                "Research in artificial intelligence, machine learning, deep learning, \
                 neural networks, natural language processing, computer vision, robotics, \
                 autonomous systems, and generative AI models.",
            ),
            topic(
                "Health",
                &[
                    "health",
                    "biomedical",
                    "clinical",
                    "patient",
                    "patients",
                    "disease",
                    "diseases",
                    "medical",
                    "medicine",
                    "pharmaceutical",
                    "epidemiology",
                    "therapy",
                    "diagnostic",
                    "diagnostics",
                    "genomic",
                    "genomics",
                    "mental health",
                    "substance use",
                    "aging",
                    "dementia",
                    "alzheimer",
                ],
                "Biomedical research, clinical trials, patient care, disease prevention, \
                 public health, pharmaceutical development, mental health, genomics, \
                 epidemiology, and medical diagnostics.",
            ),
            topic(
                "Infrastructure",
                &[
                    "infrastructure",
                    "civil engineering",
                    "bridge",
                    "bridges",
                    "transportation",
                    "urban",
                    "highway",
                    "construction",
                    "structural engineering",
                    "water system",
                    "water systems",
                ],
                "Civil engineering, transportation systems, urban planning, bridge design, \
                 construction technology, water systems, and structural engineering.",
            ),
            topic(
                "Environment",
                &[
                    "climate",
                    "environment",
                    "environmental",
                    "sustainability",
                    "renewable",
                    "emissions",
                    "conservation",
                    "ecology",
                    "biodiversity",
                    "pollution",
                    "carbon",
                    "geoscience",
                    "geosciences",
                    "atmospheric",
                ],
                "Climate change research, environmental science, sustainability, \
                 carbon emissions, conservation, ecology, biodiversity, and pollution control.",
            ),
            topic(
                "Education",
                &[
                    "education",
                    "educational",
                    "student",
                    "students",
                    "curriculum",
                    "stem",
                    "pedagogy",
                    "k-12",
                    "k12",
                    "undergraduate",
                    "graduate",
                    "fellowship",
                    "fellowships",
                    "workforce development",
                ],
                "Educational research, STEM education, curriculum development, K-12 programs, \
                 higher education, fellowships, workforce development, and pedagogy.",
            ),
            topic(
                "Agriculture",
                &[
                    "agriculture",
                    "agricultural",
                    "crop",
                    "crops",
                    "farming",
                    "livestock",
                    "soil",
                    "food security",
                    "irrigation",
                    "agronomic",
                    "horticulture",
                ],
                "Agricultural research, crop science, farming technology, food security, \
                 soil science, livestock management, irrigation, and horticulture.",
            ),
            topic(
                "Cybersecurity",
                &[
                    "cybersecurity",
                    "cyber",
                    "encryption",
                    "malware",
                    "phishing",
                    "network security",
                    "vulnerability",
                    "vulnerabilities",
                    "threat detection",
                ],
                "Cybersecurity research, network security, encryption, threat detection, \
                 malware analysis, vulnerability assessment, and cyber defense.",
            ),
            topic(
                "Space",
                &[
                    "space exploration",
                    "aerospace",
                    "satellite",
                    "satellites",
                    "nasa",
                    "orbital",
                    "rocket",
                    "launch vehicle",
                    "astronomy",
                    "astrophysics",
                    "planetary",
                ],
                "Space exploration, aerospace engineering, satellite technology, \
                 orbital mechanics, launch vehicles, astronomy, and planetary science.",
            ),
            topic(
                "Energy",
                &[
                    "energy",
                    "solar",
                    "wind power",
                    "nuclear",
                    "battery",
                    "batteries",
                    "power grid",
                    "smart grid",
                    "power generation",
                    "fuel cell",
                    "fuel cells",
                    "hydrogen",
                ],
                "Energy research, solar power, wind energy, nuclear energy, battery technology, \
                 smart grids, hydrogen fuel cells, and power generation.",
            ),
            topic(
                "Humanities",
                &[
                    "humanities",
                    "arts",
                    "culture",
                    "cultural heritage",
                    "heritage",
                    "museum",
                    "museums",
                    "literature",
                    "history",
                    "archaeology",
                    "music",
                    "dance",
                    "theatre",
                    "theater",
                    "manuscript",
                    "manuscripts",
                    "digitization",
                ],
                "Humanities research, arts and culture, cultural heritage preservation, \
                 museum studies, literature, history, archaeology, music, dance, theatre, \
                 manuscript digitization, and language studies.",
            ),
            topic(
                "Social Sciences",
                &[
                    "social science",
                    "social sciences",
                    "sociology",
                    "psychology",
                    "economics",
                    "political science",
                    "behavioral",
                    "demographic",
                    "demographics",
                    "community development",
                    "equity",
                    "justice",
                ],
                "Social science research, sociology, psychology, economics, political science, \
                 behavioral studies, demographics, community development, equity, and justice.",
            ),
        ],
    }
}
