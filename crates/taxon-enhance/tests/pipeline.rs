use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use taxon_enhance::{
    EnhanceError, Enhancer, EnhancerSettings, GenerationRequest, GeneratorError, PromptSettings,
    RebuildStatus, TextGenerator,
};
use taxon_test_utils::{assert_ok, text_of_len, DataDir};
use taxon_tree::io::read_json;
use taxon_tree::{build, plan_batches, BuildInputs, EnhancementBatch, PlanOptions, TaxonomyNode};

const ROOT: &str = "Creative Tech Taxonomy";

/// Replays canned replies in order and records every request.
#[derive(Default)]
struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, GeneratorError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    fn with_replies(replies: Vec<Result<String, GeneratorError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::default(),
        }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GeneratorError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GeneratorError::EmptyReply))
    }
}

fn inputs(data: &DataDir) -> BuildInputs {
    BuildInputs::in_data_dir(data.data_path(), "_metadata.json", "_index.json", data.output_path())
}

fn settings(data: &DataDir) -> EnhancerSettings {
    EnhancerSettings {
        prompt: PromptSettings::default(),
        root_name: ROOT.to_string(),
        build: inputs(data),
    }
}

fn planned(data: &DataDir) -> Vec<EnhancementBatch> {
    let report = assert_ok!(build(&inputs(data)));
    let tree: TaxonomyNode = assert_ok!(read_json(&report.output, "consolidated taxonomy"));
    assert_ok!(plan_batches(&tree, &PlanOptions::default()))
        .into_iter()
        .map(|p| p.batch)
        .collect()
}

fn reply(enhancements: serde_json::Value) -> Result<String, GeneratorError> {
    Ok(json!({ "enhancements": enhancements }).to_string())
}

#[tokio::test]
async fn test_batch_updates_fragment_backup_and_output() {
    let data = DataDir::sample();
    let batches = planned(&data);
    let creative = &batches[0];
    assert_eq!(creative.batch_id, "Creative Code Frameworks_1");

    let new_description = "JavaScript library for creative coding, a web port of Processing.";
    let generator = ScriptedGenerator::with_replies(vec![Ok(format!(
        "Sure! Here is the JSON:\n{}",
        json!({"enhancements": [
            {"name": "p5.js", "description": new_description, "links": {"Official": "https://p5js.org"}},
            {"name": "Not In Batch", "description": "whatever"}
        ]})
    ))]);
    let enhancer = Enhancer::new(generator, settings(&data));

    let outcome = assert_ok!(enhancer.process_batch(creative).await);
    assert_eq!(outcome.requested, 2);
    assert_eq!(outcome.enhanced, 1);
    assert_eq!(outcome.unmatched, vec!["Not In Batch"]);
    assert_eq!(outcome.files_written, vec![data.data_path().join("creative_code.json")]);
    assert!(matches!(outcome.rebuild, RebuildStatus::Rebuilt(_)));

    let fragment = data.read_fragment("creative_code.json");
    assert_eq!(fragment["children"][0]["description"], new_description);
    assert_eq!(fragment["children"][0]["links"]["Official"], "https://p5js.org");

    let backup = data.read_fragment("creative_code_backup.json");
    assert_eq!(backup["children"][0]["description"], "ok");

    let output = data.read_json(DataDir::OUTPUT);
    assert_eq!(output["children"][0]["children"][0]["description"], new_description);

    assert!(!data.exists("game_engines_backup.json"));
}

#[tokio::test]
async fn test_prompt_carries_batch_content() {
    let data = DataDir::sample();
    let batches = planned(&data);
    let generator = ScriptedGenerator::with_replies(vec![reply(json!([]))]);
    let enhancer = Enhancer::new(generator, settings(&data));

    let outcome = assert_ok!(enhancer.process_batch(&batches[1]).await);
    assert_eq!(outcome.enhanced, 0);
    assert_eq!(outcome.rebuild, RebuildStatus::Skipped);

    let requests = enhancer.generator().requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].prompt.contains("Category: Game Engines"));
    assert!(requests[0].prompt.contains("- Godot: No description"));
    assert_eq!(requests[0].max_tokens, 2000);
}

#[tokio::test]
async fn test_malformed_reply_touches_nothing() {
    let data = DataDir::sample();
    let batches = planned(&data);
    let before = data.read_fragment("creative_code.json");

    let generator = ScriptedGenerator::with_replies(vec![Ok("I cannot produce JSON today.".into())]);
    let enhancer = Enhancer::new(generator, settings(&data));

    let err = enhancer.process_batch(&batches[0]).await.unwrap_err();
    assert!(matches!(err, EnhanceError::MalformedReply { .. }));
    assert_eq!(data.read_fragment("creative_code.json"), before);
    assert!(!data.exists("creative_code_backup.json"));
}

#[tokio::test]
async fn test_service_error_fails_batch() {
    let data = DataDir::sample();
    let batches = planned(&data);
    let generator = ScriptedGenerator::with_replies(vec![Err(GeneratorError::EmptyReply)]);
    let enhancer = Enhancer::new(generator, settings(&data));

    let err = enhancer.process_batch(&batches[0]).await.unwrap_err();
    assert!(matches!(err, EnhanceError::Generator(_)));
    assert!(!data.exists("creative_code_backup.json"));
}

#[tokio::test]
async fn test_strong_content_is_never_overwritten() {
    let data = DataDir::sample();
    let batch: EnhancementBatch = serde_json::from_value(json!({
        "batch_id": "manual_1",
        "category": "Creative Code Frameworks",
        "nodes_to_enhance": [{
            "name": "openFrameworks",
            "current_description": text_of_len(80),
            "current_links": {"Site": "https://openframeworks.cc"},
            "path": "Creative Tech Taxonomy/Creative Code Frameworks/openFrameworks"
        }]
    }))
    .unwrap();

    let generator = ScriptedGenerator::with_replies(vec![reply(json!([
        {"name": "openFrameworks", "description": "replacement", "links": {"X": "https://x"}}
    ]))]);
    let enhancer = Enhancer::new(generator, settings(&data));

    let outcome = assert_ok!(enhancer.process_batch(&batch).await);
    assert_eq!(outcome.enhanced, 0);
    assert_eq!(outcome.unmatched, vec!["openFrameworks"]);

    let fragment = data.read_fragment("creative_code.json");
    assert_eq!(fragment["children"][1]["description"], text_of_len(80));
    assert_eq!(fragment["children"][1]["links"], json!({"Site": "https://openframeworks.cc"}));
}

#[tokio::test]
async fn test_rebuild_failure_keeps_fragment_writes() {
    let data = DataDir::sample();
    let batches = planned(&data);
    std::fs::remove_file(data.data_path().join("_metadata.json")).unwrap();

    let generator = ScriptedGenerator::with_replies(vec![reply(json!([
        {"name": "Godot", "description": "Free and open-source 2D and 3D game engine with GDScript."}
    ]))]);
    let enhancer = Enhancer::new(generator, settings(&data));

    let outcome = assert_ok!(enhancer.process_batch(&batches[1]).await);
    assert_eq!(outcome.enhanced, 1);
    assert!(matches!(outcome.rebuild, RebuildStatus::Failed(_)));
    assert_eq!(
        data.read_fragment("game_engines.json")["children"][0]["description"],
        "Free and open-source 2D and 3D game engine with GDScript."
    );
}

#[tokio::test]
async fn test_backup_files_are_not_treated_as_fragments() {
    let data = DataDir::sample();
    let batches = planned(&data);
    // a stale backup holding the same weak node must not absorb the update
    data.write_fragment("creative_code_backup.json", &data.read_fragment("creative_code.json"));
    let stale = data.read_fragment("creative_code_backup.json");

    let generator = ScriptedGenerator::with_replies(vec![reply(json!([
        {"name": "p5.js", "links": ["https://p5js.org"]}
    ]))]);
    let enhancer = Enhancer::new(generator, settings(&data));

    let outcome = assert_ok!(enhancer.process_batch(&batches[0]).await);
    assert_eq!(outcome.enhanced, 1);
    assert_eq!(
        data.read_fragment("creative_code.json")["children"][0]["links"],
        json!({"Link 1": "https://p5js.org"})
    );
    // the backup now holds the pre-update fragment, which equals the stale copy
    assert_eq!(data.read_fragment("creative_code_backup.json"), stale);
}

#[tokio::test(start_paused = true)]
async fn test_run_batches_paces_and_continues_after_failure() {
    let data = DataDir::sample();
    let batches = planned(&data);
    assert_eq!(batches.len(), 3);

    let generator = ScriptedGenerator::with_replies(vec![
        reply(json!([{"name": "p5.js", "description": "A friendly JavaScript library for creative coding."}])),
        Ok("garbage".into()),
        reply(json!([])),
    ]);
    let enhancer = Enhancer::new(generator, settings(&data));

    let started = tokio::time::Instant::now();
    let summary = enhancer.run_batches(&batches, 5, Duration::from_secs(2)).await;

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(4) && elapsed < Duration::from_secs(5));
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].0, "Game Engines_1");
    assert_eq!(summary.nodes_enhanced, 1);
    assert_eq!(summary.remaining, 0);
}

#[tokio::test(start_paused = true)]
async fn test_run_batches_respects_limit() {
    let data = DataDir::sample();
    let batches = planned(&data);
    let generator = ScriptedGenerator::with_replies(vec![reply(json!([]))]);
    let enhancer = Enhancer::new(generator, settings(&data));

    let started = tokio::time::Instant::now();
    let summary = enhancer.run_batches(&batches, 1, Duration::from_secs(2)).await;

    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.remaining, 2);
}
