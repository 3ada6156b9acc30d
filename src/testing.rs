//! In-memory fakes of the host surfaces for unit tests.

use crate::host::{CommandRunner, HostApi, Notifier, QuietGenerator, QuietOptions, SoloChatRequest};
use crate::state::Database;
use crate::tools::ToolContext;
use crate::types::{Character, ChatRecord, Group, NotifyLevel};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<(NotifyLevel, String, String)>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<(NotifyLevel, String, String)> {
        self.seen.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.all().into_iter().map(|(_, _, m)| m).collect()
    }

    pub fn errors(&self) -> usize {
        self.all()
            .iter()
            .filter(|(l, _, _)| *l == NotifyLevel::Error)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NotifyLevel, title: &str, message: &str) {
        self.seen
            .lock()
            .unwrap()
            .push((level, title.to_string(), message.to_string()));
    }
}

pub fn record(date: &str, name: &str, mes: &str) -> ChatRecord {
    ChatRecord {
        send_date: Some(serde_json::Value::String(date.into())),
        name: Some(name.into()),
        mes: Some(mes.into()),
    }
}

#[derive(Default)]
pub struct MockHost {
    pub characters: Vec<Character>,
    pub groups: Vec<Group>,
    /// Keyed by (character name, chat file).
    pub solo: HashMap<(String, String), Vec<ChatRecord>>,
    pub group: HashMap<String, Vec<ChatRecord>>,
    pub pages: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl MockHost {
    /// Three characters; Ava and Bram share group `g1` whose chat is `c2`.
    pub fn with_cast() -> Self {
        let character = |name: &str, avatar: &str| Character {
            name: name.into(),
            avatar: avatar.into(),
            chat: Some(format!("{name} - 2024-06-01")),
            scenario: None,
        };
        Self {
            characters: vec![
                character("Ava", "ava.png"),
                character("Bram", "bram.png"),
                character("Cleo", "cleo.png"),
            ],
            groups: vec![Group {
                id: "g1".into(),
                name: "Tavern".into(),
                members: vec!["ava.png".into(), "bram.png".into()],
                chat_id: Some("c2".into()),
            }],
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl HostApi for MockHost {
    async fn characters(&self) -> Result<Vec<Character>> {
        Ok(self.characters.clone())
    }

    async fn groups(&self) -> Result<Vec<Group>> {
        Ok(self.groups.clone())
    }

    async fn group_chat(&self, chat_id: &str) -> Result<Vec<ChatRecord>> {
        self.log(format!("group:{chat_id}"));
        self.group
            .get(chat_id)
            .cloned()
            .ok_or_else(|| anyhow!("Host group chat failed (404 Not Found)"))
    }

    async fn solo_chat(&self, request: &SoloChatRequest) -> Result<Vec<ChatRecord>> {
        self.log(format!(
            "solo:{}:{}:{}",
            request.ch_name, request.file_name, request.avatar_url
        ));
        self.solo
            .get(&(request.ch_name.clone(), request.file_name.clone()))
            .cloned()
            .ok_or_else(|| anyhow!("Host chat failed (404 Not Found)"))
    }

    async fn visit_link(&self, url: &str) -> Result<String> {
        self.log(format!("visit:{url}"));
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("Host page visit failed (502 Bad Gateway)"))
    }
}

pub struct MockGenerator {
    reply: String,
    pub prompts: Mutex<Vec<(String, QuietOptions)>>,
}

impl MockGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<(String, QuietOptions)> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> String {
        self.prompts().last().map(|(p, _)| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl QuietGenerator for MockGenerator {
    async fn generate_quiet(&self, prompt: &str, options: QuietOptions) -> Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), options));
        Ok(self.reply.clone())
    }
}

#[derive(Default)]
pub struct RecordingCommands {
    pub runs: Mutex<Vec<(String, CancellationToken)>>,
}

impl RecordingCommands {
    pub fn commands(&self) -> Vec<String> {
        self.runs.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
    }

    pub fn tokens(&self) -> Vec<CancellationToken> {
        self.runs.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
    }
}

#[async_trait]
impl CommandRunner for RecordingCommands {
    async fn run(&self, command: &str, cancel: CancellationToken) -> Result<()> {
        self.runs.lock().unwrap().push((command.to_string(), cancel));
        Ok(())
    }
}

pub struct Fixture {
    pub ctx: Arc<ToolContext>,
    pub host: Arc<MockHost>,
    pub generator: Arc<MockGenerator>,
    pub notifier: Arc<RecordingNotifier>,
    pub commands: Arc<RecordingCommands>,
}

pub fn fixture(host: MockHost, reply: &str) -> Fixture {
    let host = Arc::new(host);
    let generator = Arc::new(MockGenerator::replying(reply));
    let notifier = Arc::new(RecordingNotifier::default());
    let commands = Arc::new(RecordingCommands::default());
    let db = Arc::new(tokio::sync::Mutex::new(Database::open_memory().unwrap()));
    let ctx = Arc::new(ToolContext::new(
        host.clone(),
        generator.clone(),
        notifier.clone(),
        commands.clone(),
        db,
    ));
    Fixture {
        ctx,
        host,
        generator,
        notifier,
        commands,
    }
}

pub fn context(host: MockHost, reply: &str) -> Arc<ToolContext> {
    fixture(host, reply).ctx
}
