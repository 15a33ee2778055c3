use anyhow::Result;
use async_trait::async_trait;
use lesson_gen::core::GenerationDispatcher;
use lesson_gen::domain::model::{
    Assessment, ContentType, FormData, GenerationLimits, GenerationRequest, LessonFormat,
    Methodologies, Quota, QuotaBucket, Role, TariffCatalog, TariffLimits, User, WizardStep,
};
use lesson_gen::{
    generate_prompt, validate_step, GenerationService, InMemoryUsageStore, LessonGenError,
    LessonPlanWizard, LimitsResolver,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_test::{assert_err, assert_ok};

#[derive(Clone)]
struct RecordingDispatcher {
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
    response: Value,
}

impl RecordingDispatcher {
    fn returning(response: Value) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            response,
        }
    }

    async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl GenerationDispatcher for RecordingDispatcher {
    async fn dispatch(&self, request: &GenerationRequest) -> lesson_gen::Result<Value> {
        self.requests.lock().await.push(request.clone());
        Ok(self.response.clone())
    }
}

struct FailingDispatcher;

#[async_trait]
impl GenerationDispatcher for FailingDispatcher {
    async fn dispatch(&self, _request: &GenerationRequest) -> lesson_gen::Result<Value> {
        Err(LessonGenError::ApiStatus {
            status: 502,
            body: "bad gateway".to_string(),
        })
    }
}

fn travel_form() -> FormData {
    FormData {
        language: "English".to_string(),
        level: "B1".to_string(),
        topic: "Travel".to_string(),
        duration: 45,
        methodologies: Methodologies {
            main_method: "TBL".to_string(),
            support_methods: vec!["PPP".to_string()],
        },
        teaching_methodology: "communicative".to_string(),
        objectives: vec!["Learn travel vocabulary".to_string()],
        materials: vec![],
        assessment: Assessment::Formative,
        format: LessonFormat::Online,
        cultural_elements: true,
    }
}

fn catalog() -> TariffCatalog {
    TariffCatalog::new().with_tariff(
        "basic",
        TariffLimits {
            images: 3,
            generations: 10,
        },
    )
}

fn teacher(tariff: Option<&str>) -> User {
    User {
        id: 1001,
        role: Role::User,
        tariff: tariff.map(str::to_string),
    }
}

#[test]
fn test_travel_form_passes_with_materials_warning() {
    let form = travel_form();

    let details = validate_step(&form, WizardStep::Details);
    let methodology = validate_step(&form, WizardStep::Methodology);
    let objectives = validate_step(&form, WizardStep::Objectives);

    assert!(details.errors.is_empty() && details.warnings.is_empty());
    assert!(methodology.errors.is_empty() && methodology.warnings.is_empty());
    assert!(objectives.errors.is_empty());
    assert_eq!(objectives.warnings.len(), 1);
    assert!(objectives.warnings[0].contains("materials"));

    let prompt = generate_prompt(&form);
    for needle in ["Travel", "TBL", "PPP", "cultural context"] {
        assert!(prompt.contains(needle), "prompt is missing {}", needle);
    }
}

#[test]
fn test_duration_blocks_exactly_outside_range() {
    for duration in 0..=300 {
        let form = FormData {
            duration,
            ..travel_form()
        };
        let blocked = !validate_step(&form, WizardStep::Details).can_proceed();
        assert_eq!(blocked, !(15..=180).contains(&duration), "duration {}", duration);
    }
}

#[test]
fn test_wizard_session_walks_travel_form() {
    let mut wizard = LessonPlanWizard::with_form(travel_form());

    for expected in [WizardStep::Methodology, WizardStep::Objectives, WizardStep::Review] {
        assert!(wizard.next_step().can_proceed());
        assert_eq!(wizard.step(), expected);
    }
    assert_eq!(wizard.last_result().warnings.len(), 1);
}

#[tokio::test]
async fn test_submit_lesson_plan_tracks_and_dispatches() -> Result<()> {
    let store = InMemoryUsageStore::new();
    store.set_remaining(1001, QuotaBucket::Generations, 2).await;
    let dispatcher = RecordingDispatcher::returning(json!({"content": "## Lesson plan: Travel"}));
    let service = GenerationService::new(
        LimitsResolver::new(catalog(), store.clone()),
        dispatcher.clone(),
    );

    let user = teacher(Some("basic"));
    let generated = service.submit_lesson_plan(Some(&user), &travel_form()).await?;

    assert_eq!(generated.content, "## Lesson plan: Travel");
    assert_eq!(generated.content_type, ContentType::LessonPlan);
    assert_eq!(generated.limits, GenerationLimits::limited(10, 1));
    assert_eq!(store.tracked_count(1001).await, 1);

    let requests = dispatcher.requests().await;
    assert_eq!(requests.len(), 1);
    let envelope = serde_json::to_value(&requests[0])?;
    assert_eq!(envelope["user_id"], 1001);
    assert_eq!(envelope["type"], "lesson_plan");
    assert!(envelope["prompt"].as_str().unwrap_or_default().contains("Travel"));
    assert_eq!(envelope["parameters"]["main"], "TBL");
    assert_eq!(envelope["parameters"]["support"], "PPP");
    assert_eq!(envelope["parameters"]["text_content"], "Travel");
    Ok(())
}

#[tokio::test]
async fn test_out_of_range_duration_and_exhausted_quota() {
    let form = FormData {
        duration: 200,
        ..travel_form()
    };
    let details = validate_step(&form, WizardStep::Details);
    assert!(details.errors.iter().any(|e| e.contains("duration out of range")));

    let store = InMemoryUsageStore::new();
    store.set_remaining(1001, QuotaBucket::Generations, 0).await;
    let limits = LimitsResolver::new(catalog(), store);
    let user = teacher(Some("basic"));

    assert!(!assert_ok!(limits.can_generate(Some(&user), ContentType::LessonPlan).await));
    let err = assert_err!(
        limits
            .check_and_track_generation(Some(&user), ContentType::LessonPlan)
            .await
    );
    assert!(matches!(
        err,
        LessonGenError::LimitReached {
            content_type: ContentType::LessonPlan
        }
    ));
}

#[tokio::test]
async fn test_invalid_form_is_rejected_before_tracking() {
    let store = InMemoryUsageStore::new();
    store.set_remaining(1001, QuotaBucket::Generations, 5).await;
    let dispatcher = RecordingDispatcher::returning(json!({"content": "never"}));
    let service = GenerationService::new(
        LimitsResolver::new(catalog(), store.clone()),
        dispatcher.clone(),
    );

    let form = FormData {
        objectives: vec![],
        ..travel_form()
    };
    let result = service
        .submit_lesson_plan(Some(&teacher(Some("basic"))), &form)
        .await;

    match result {
        Err(LessonGenError::Validation { step, errors }) => {
            assert_eq!(step, WizardStep::Objectives);
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("objectives"));
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
    assert_eq!(store.tracked_count(1001).await, 0);
    assert!(dispatcher.requests().await.is_empty());
}

#[tokio::test]
async fn test_user_without_tariff_is_denied() {
    let dispatcher = RecordingDispatcher::returning(json!({"content": "never"}));
    let service = GenerationService::new(
        LimitsResolver::new(catalog(), InMemoryUsageStore::new()),
        dispatcher.clone(),
    );

    for user in [teacher(None), teacher(Some("enterprise"))] {
        let limits = service
            .limits()
            .compute_limits(Some(&user), ContentType::Image)
            .await
            .unwrap();
        assert_eq!(limits, GenerationLimits::none());

        let result = service.submit_lesson_plan(Some(&user), &travel_form()).await;
        assert!(matches!(result, Err(LessonGenError::LimitReached { .. })));
    }
    assert!(dispatcher.requests().await.is_empty());
}

#[tokio::test]
async fn test_friend_generates_images_without_quota() {
    let dispatcher = RecordingDispatcher::returning(json!("https://cdn.example.com/img/1.png"));
    let service = GenerationService::new(
        LimitsResolver::new(TariffCatalog::new(), InMemoryUsageStore::new()),
        dispatcher.clone(),
    );
    let friend = User {
        id: 7,
        role: Role::Friend,
        tariff: None,
    };

    let generated = service
        .generate(
            Some(&friend),
            ContentType::Image,
            "A watercolor map of Europe".to_string(),
            None,
        )
        .await
        .unwrap();

    assert!(generated.limits.is_unlimited);
    assert_eq!(generated.limits.remaining, Quota::Unlimited);
    assert_eq!(dispatcher.requests().await[0].content_type, ContentType::Image);
}

#[tokio::test]
async fn test_empty_backend_result_is_generation_failure() {
    let store = InMemoryUsageStore::new();
    store.set_remaining(1001, QuotaBucket::Generations, 5).await;
    let service = GenerationService::new(
        LimitsResolver::new(catalog(), store),
        RecordingDispatcher::returning(json!({"content": ""})),
    );

    let result = service
        .generate(
            Some(&teacher(Some("basic"))),
            ContentType::Game,
            "Vocabulary bingo".to_string(),
            None,
        )
        .await;
    assert!(matches!(result, Err(LessonGenError::GenerationFailure { .. })));
}

#[tokio::test]
async fn test_dispatch_errors_propagate_unchanged() {
    let store = InMemoryUsageStore::new();
    store.set_remaining(1001, QuotaBucket::Generations, 5).await;
    let service = GenerationService::new(LimitsResolver::new(catalog(), store), FailingDispatcher);

    let result = service
        .submit_lesson_plan(Some(&teacher(Some("basic"))), &travel_form())
        .await;
    assert!(matches!(
        result,
        Err(LessonGenError::ApiStatus { status: 502, .. })
    ));
}

#[tokio::test]
async fn test_anonymous_submission_is_rejected() {
    let service = GenerationService::new(
        LimitsResolver::new(catalog(), InMemoryUsageStore::new()),
        RecordingDispatcher::returning(json!({"content": "never"})),
    );
    let result = service.submit_lesson_plan(None, &travel_form()).await;
    assert!(matches!(result, Err(LessonGenError::NotAuthenticated)));
}
