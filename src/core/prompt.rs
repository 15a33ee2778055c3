use crate::domain::model::FormData;
use serde_json::{json, Value};

pub const CULTURAL_CONTEXT_LINE: &str =
    "Include cultural context: customs, traditions and real-life situations related to the topic.";

/// Natural-language request for the generation backend.
pub fn generate_prompt(form: &FormData) -> String {
    let methods = &form.methodologies;
    let mut lines = vec![
        "Create a detailed lesson plan with the following parameters:".to_string(),
        format!("Language: {}", form.language),
        format!("Level: {}", form.level),
        format!("Topic: {}", form.topic),
        format!("Duration: {} minutes", form.duration),
        format!("Main teaching method: {}", methods.main_method),
    ];

    if !methods.support_methods.is_empty() {
        lines.push(format!(
            "Supporting methods: {}",
            methods.support_methods.join(", ")
        ));
    }

    lines.push(format!("Teaching methodology: {}", form.teaching_methodology));
    lines.push(format!("Lesson format: {}", form.format.as_str()));
    lines.push(format!("Assessment type: {}", form.assessment.as_str()));

    lines.push(String::new());
    lines.push("Learning objectives:".to_string());
    lines.extend(form.objectives.iter().map(|o| format!("- {}", o)));

    if !form.materials.is_empty() {
        lines.push(String::new());
        lines.push("Materials:".to_string());
        lines.extend(form.materials.iter().map(|m| format!("- {}", m)));
    }

    if form.cultural_elements {
        lines.push(String::new());
        lines.push(CULTURAL_CONTEXT_LINE.to_string());
    }

    lines.push(String::new());
    lines.push(format!(
        "Structure the plan into warm-up, main activities with timing, practice, \
         wrap-up and homework, and describe how the {} assessment is carried out.",
        form.assessment.as_str()
    ));

    lines.join("\n")
}

/// Normalized payload for the backend. `topic` is duplicated into
/// `text_content` for older generation endpoints.
pub fn build_payload(form: &FormData) -> Value {
    json!({
        "language": form.language,
        "level": form.level,
        "topic": form.topic,
        "text_content": form.topic,
        "duration": form.duration,
        "main": form.methodologies.main_method,
        "support": form.methodologies.support_methods.join(", "),
        "teaching_methodology": form.teaching_methodology,
        "objectives": form.objectives,
        "materials": form.materials,
        "assessment": form.assessment,
        "format": form.format,
        "cultural_elements": form.cultural_elements,
    })
}
