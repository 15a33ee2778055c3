use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub const MIN_DURATION_MINUTES: u32 = 15;
pub const MAX_DURATION_MINUTES: u32 = 180;
pub const DEFAULT_DURATION_MINUTES: u32 = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Friend,
    Mod,
}

impl Role {
    /// 不受配額限制的角色
    pub fn is_unlimited(self) -> bool {
        matches!(self, Role::Admin | Role::Friend | Role::Mod)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Friend => "friend",
            Role::Mod => "mod",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "friend" => Ok(Role::Friend),
            "mod" => Ok(Role::Mod),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    LessonPlan,
    Exercise,
    Game,
    Image,
    Transcript,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::LessonPlan => "lesson_plan",
            ContentType::Exercise => "exercise",
            ContentType::Game => "game",
            ContentType::Image => "image",
            ContentType::Transcript => "transcript",
        }
    }

    /// Images have their own counter; everything else shares the generic one.
    pub fn bucket(self) -> QuotaBucket {
        match self {
            ContentType::Image => QuotaBucket::Images,
            _ => QuotaBucket::Generations,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lesson_plan" => Ok(ContentType::LessonPlan),
            "exercise" => Ok(ContentType::Exercise),
            "game" => Ok(ContentType::Game),
            "image" => Ok(ContentType::Image),
            "transcript" => Ok(ContentType::Transcript),
            other => Err(format!("unknown content type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotaBucket {
    Images,
    Generations,
}

impl QuotaBucket {
    pub fn as_str(self) -> &'static str {
        match self {
            QuotaBucket::Images => "images",
            QuotaBucket::Generations => "generations",
        }
    }
}

impl fmt::Display for QuotaBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub role: Role,
    #[serde(default)]
    pub tariff: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TariffLimits {
    pub images: u32,
    pub generations: u32,
}

impl TariffLimits {
    pub fn limit_for(&self, bucket: QuotaBucket) -> u32 {
        match bucket {
            QuotaBucket::Images => self.images,
            QuotaBucket::Generations => self.generations,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TariffCatalog {
    tariffs: HashMap<String, TariffLimits>,
}

impl TariffCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tariff(mut self, name: impl Into<String>, limits: TariffLimits) -> Self {
        self.tariffs.insert(name.into(), limits);
        self
    }

    pub fn get(&self, name: &str) -> Option<&TariffLimits> {
        self.tariffs.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tariffs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tariffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tariffs.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quota {
    Limited(u32),
    Unlimited,
}

impl fmt::Display for Quota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quota::Limited(n) => write!(f, "{}", n),
            Quota::Unlimited => f.write_str("unlimited"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationLimits {
    pub total: Quota,
    pub remaining: Quota,
    pub is_unlimited: bool,
}

impl GenerationLimits {
    pub fn unlimited() -> Self {
        Self {
            total: Quota::Unlimited,
            remaining: Quota::Unlimited,
            is_unlimited: true,
        }
    }

    pub fn none() -> Self {
        Self::limited(0, 0)
    }

    pub fn limited(total: u32, remaining: u32) -> Self {
        Self {
            total: Quota::Limited(total),
            remaining: Quota::Limited(remaining),
            is_unlimited: false,
        }
    }

    pub fn allows_generation(&self) -> bool {
        match self.remaining {
            Quota::Unlimited => true,
            Quota::Limited(n) => n > 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Assessment {
    #[default]
    Formative,
    Summative,
    Diagnostic,
    Peer,
}

impl Assessment {
    pub fn as_str(self) -> &'static str {
        match self {
            Assessment::Formative => "formative",
            Assessment::Summative => "summative",
            Assessment::Diagnostic => "diagnostic",
            Assessment::Peer => "peer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonFormat {
    Online,
    #[default]
    Offline,
    Hybrid,
}

impl LessonFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            LessonFormat::Online => "online",
            LessonFormat::Offline => "offline",
            LessonFormat::Hybrid => "hybrid",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Methodologies {
    pub main_method: String,
    pub support_methods: Vec<String>,
}

/// Snapshot of the lesson-plan wizard form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    pub language: String,
    pub level: String,
    pub topic: String,
    pub duration: u32,
    pub methodologies: Methodologies,
    pub teaching_methodology: String,
    pub objectives: Vec<String>,
    pub materials: Vec<String>,
    pub assessment: Assessment,
    pub format: LessonFormat,
    pub cultural_elements: bool,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            language: String::new(),
            level: String::new(),
            topic: String::new(),
            duration: DEFAULT_DURATION_MINUTES,
            methodologies: Methodologies::default(),
            teaching_methodology: String::new(),
            objectives: Vec::new(),
            materials: Vec::new(),
            assessment: Assessment::default(),
            format: LessonFormat::default(),
            cultural_elements: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum WizardStep {
    #[default]
    Details,
    Methodology,
    Objectives,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Details,
        WizardStep::Methodology,
        WizardStep::Objectives,
        WizardStep::Review,
    ];

    pub fn number(self) -> u8 {
        match self {
            WizardStep::Details => 1,
            WizardStep::Methodology => 2,
            WizardStep::Objectives => 3,
            WizardStep::Review => 4,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(WizardStep::Details),
            2 => Some(WizardStep::Methodology),
            3 => Some(WizardStep::Objectives),
            4 => Some(WizardStep::Review),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    pub fn is_terminal(self) -> bool {
        self == WizardStep::Review
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn can_proceed(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub user_id: i64,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedContent {
    pub content_type: ContentType,
    pub content: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub limits: GenerationLimits,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_deserializes_camel_case() {
        let json = serde_json::json!({
            "language": "English",
            "level": "B1",
            "topic": "Travel",
            "duration": 45,
            "methodologies": {"mainMethod": "TBL", "supportMethods": ["PPP"]},
            "teachingMethodology": "communicative",
            "objectives": ["Learn travel vocabulary"],
            "assessment": "summative",
            "format": "online",
            "culturalElements": true
        });

        let form: FormData = serde_json::from_value(json).unwrap();
        assert_eq!(form.methodologies.main_method, "TBL");
        assert_eq!(form.methodologies.support_methods, vec!["PPP"]);
        assert_eq!(form.assessment, Assessment::Summative);
        assert_eq!(form.format, LessonFormat::Online);
        assert!(form.materials.is_empty());
        assert!(form.cultural_elements);
    }

    #[test]
    fn test_wire_values_match_backend() {
        assert_eq!(serde_json::to_value(Role::Mod).unwrap(), "mod");
        assert_eq!(serde_json::to_value(ContentType::LessonPlan).unwrap(), "lesson_plan");
        assert_eq!("transcript".parse::<ContentType>().unwrap(), ContentType::Transcript);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_image_uses_separate_bucket() {
        assert_eq!(ContentType::Image.bucket(), QuotaBucket::Images);
        assert_eq!(ContentType::Game.bucket(), QuotaBucket::Generations);
        assert_eq!(ContentType::LessonPlan.bucket(), QuotaBucket::Generations);
    }

    #[test]
    fn test_wizard_steps_are_linear() {
        assert_eq!(WizardStep::Details.next(), Some(WizardStep::Methodology));
        assert_eq!(WizardStep::Review.next(), None);
        assert_eq!(WizardStep::Details.previous(), None);
        assert_eq!(WizardStep::from_number(3), Some(WizardStep::Objectives));
        assert_eq!(WizardStep::from_number(5), None);
    }

    #[test]
    fn test_request_envelope_uses_type_key() {
        let request = GenerationRequest {
            user_id: 7,
            content_type: ContentType::Exercise,
            prompt: "Make an exercise".to_string(),
            parameters: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["type"], "exercise");
        assert_eq!(value["user_id"], 7);
        assert!(value.get("parameters").is_none());
    }
}
