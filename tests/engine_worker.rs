mod common;

use std::sync::mpsc::Receiver;
use std::time::Duration;

use common::{ScriptedBackend, OPENING};
use narrative_branches::engine::engine::Engine;
use narrative_branches::engine::protocol::{EngineCommand, EngineResponse};
use narrative_branches::engine::turn::TurnPhase;
use narrative_branches::model::generation_config::GenerationConfig;
use narrative_branches::model::story_node::NodeId;

/// Collect responses until the one that settles the current command.
fn until_settled(rx: &Receiver<EngineResponse>) -> Vec<EngineResponse> {
    let mut out = Vec::new();
    loop {
        let resp = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("engine went quiet");
        let done = matches!(
            resp,
            EngineResponse::SessionUpdated(_)
                | EngineResponse::TurnFailed(_)
                | EngineResponse::ModelsListed(_)
                | EngineResponse::HealthChecked(_)
        );
        out.push(resp);
        if done {
            return out;
        }
    }
}

#[test]
fn turn_reports_progress_then_snapshot() {
    let (tx, rx) = Engine::spawn(ScriptedBackend::new(vec![Ok(OPENING)]));

    tx.send(EngineCommand::StartStory {
        config: GenerationConfig::default(),
        council: true,
    })
    .unwrap();
    let responses = until_settled(&rx);

    assert_eq!(responses.len(), 4);
    assert!(matches!(responses[0], EngineResponse::PhaseChanged(TurnPhase::Council)));
    assert!(matches!(&responses[1], EngineResponse::CouncilConvened(Some(t)) if t.consensus == "Proceed with caution."));
    assert!(matches!(responses[2], EngineResponse::PhaseChanged(TurnPhase::Generation)));
    let EngineResponse::SessionUpdated(state) = &responses[3] else {
        panic!("expected a snapshot, got {:?}", responses[3]);
    };
    assert_eq!(state.forest.len(), 1);
    assert_eq!(state.current_choices(), ["Accept the wager", "Walk away"]);
}

#[test]
fn failures_are_reported_and_the_engine_keeps_going() {
    let (tx, rx) = Engine::spawn(ScriptedBackend::new(vec![Err("backend down"), Ok(OPENING)]));

    tx.send(EngineCommand::StartStory {
        config: GenerationConfig::default(),
        council: false,
    })
    .unwrap();
    let failed = until_settled(&rx);
    let Some(EngineResponse::TurnFailed(message)) = failed.last() else {
        panic!("expected failure, got {failed:?}");
    };
    assert!(message.contains("backend down"));

    tx.send(EngineCommand::SelectNode(NodeId::new())).unwrap();
    assert!(matches!(until_settled(&rx).last(), Some(EngineResponse::TurnFailed(_))));

    tx.send(EngineCommand::StartStory {
        config: GenerationConfig::default(),
        council: false,
    })
    .unwrap();
    assert!(matches!(until_settled(&rx).last(), Some(EngineResponse::SessionUpdated(_))));
}

#[test]
fn backend_queries_are_answered() {
    let (tx, rx) = Engine::spawn(ScriptedBackend::new(vec![]));

    tx.send(EngineCommand::RefreshModels).unwrap();
    match until_settled(&rx).pop() {
        Some(EngineResponse::ModelsListed(Ok(models))) => {
            assert_eq!(models, vec!["mistralai/mistral-7b-instruct:free"]);
        }
        other => panic!("unexpected {other:?}"),
    }

    tx.send(EngineCommand::CheckHealth).unwrap();
    assert!(matches!(
        until_settled(&rx).pop(),
        Some(EngineResponse::HealthChecked(Ok(_)))
    ));
}
