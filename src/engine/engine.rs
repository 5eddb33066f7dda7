use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::engine::llm_client::NarrativeBackend;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::engine::turn::{StorySession, TurnProgress};

/// Background worker that owns the story session.
///
/// Commands are handled strictly one after another, so a turn always
/// settles before the next one starts.
pub struct Engine<B> {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    session: StorySession<B>,
}

impl<B: NarrativeBackend> Engine<B> {
    pub fn new(rx: Receiver<EngineCommand>, tx: Sender<EngineResponse>, backend: B) -> Self {
        Self {
            rx,
            tx,
            session: StorySession::new(backend),
        }
    }

    pub fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            self.handle(cmd);
        }
        log::debug!("Engine command channel closed");
    }

    fn handle(&mut self, cmd: EngineCommand) {
        let tx = &self.tx;
        let mut forward = |progress: TurnProgress| {
            let _ = tx.send(EngineResponse::from(progress));
        };

        match cmd {
            EngineCommand::StartStory { config, council } => {
                let result = self.session.start_story(config, council, &mut forward);
                self.settle(result.map_err(|e| e.to_string()));
            }

            EngineCommand::ChooseBranch { choice, council } => {
                let result = self.session.choose_branch(&choice, council, &mut forward);
                self.settle(result.map_err(|e| e.to_string()));
            }

            EngineCommand::SelectNode(id) => {
                let result = self.session.select_node(id);
                self.settle(result.map_err(|e| e.to_string()));
            }

            EngineCommand::RefreshModels => {
                let models = self.session.backend().list_models().map_err(|e| e.to_string());
                let _ = self.tx.send(EngineResponse::ModelsListed(models));
            }

            EngineCommand::CheckHealth => {
                let status = self.session.backend().health().map_err(|e| e.to_string());
                let _ = self.tx.send(EngineResponse::HealthChecked(status));
            }
        }
    }

    fn settle(&self, result: Result<(), String>) {
        let response = match result {
            Ok(()) => EngineResponse::SessionUpdated(self.session.state().clone()),
            Err(message) => {
                log::error!("Turn failed: {message}");
                EngineResponse::TurnFailed(message)
            }
        };
        let _ = self.tx.send(response);
    }
}

impl<B: NarrativeBackend + Send + 'static> Engine<B> {
    /// Start an engine on its own thread and hand back both channel ends.
    pub fn spawn(backend: B) -> (Sender<EngineCommand>, Receiver<EngineResponse>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        thread::spawn(move || {
            let mut engine = Engine::new(cmd_rx, resp_tx, backend);
            engine.run();
        });

        (cmd_tx, resp_rx)
    }
}
