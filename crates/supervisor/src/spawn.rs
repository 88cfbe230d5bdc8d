// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent spawn/stop (the C4 operations) and the production specialist
//! launcher.

use crate::launcher::{LauncherError, SpecialistLauncher};
use crate::supervisor::Supervisor;
use crate::SupervisorError;
use async_trait::async_trait;
use pan_adapters::{MuxAdapter, NotifyAdapter};
use pan_core::{
    AgentId, AgentRecord, AgentStatus, Clock, IssueId, QueueItem, SpecialistName, WorkType,
};
use pan_routing::Router;
use pan_store::{AgentRegistry, StateLayout};
use std::path::PathBuf;

/// Default model-CLI runtime.
pub const DEFAULT_RUNTIME: &str = "claude";

/// Shell line that starts a fresh conversation.
pub(crate) fn spawn_command(runtime: &str, model: &str, prompt: Option<&str>) -> String {
    match prompt {
        Some(prompt) => format!(
            "{} --model {} {}",
            runtime,
            model,
            shell_quote(prompt)
        ),
        None => format!("{} --model {}", runtime, model),
    }
}

/// Shell line that resumes a saved provider conversation.
pub(crate) fn resume_command(runtime: &str, session_id: &str) -> String {
    format!("{} --resume {}", runtime, session_id)
}

fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

/// Everything the spawn path needs to know about a new agent.
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    pub issue_id: IssueId,
    pub workspace_path: PathBuf,
    pub work_type: WorkType,
    pub runtime: String,
    pub phase: Option<String>,
    pub branch: Option<String>,
    pub prompt: Option<String>,
}

impl SpawnRequest {
    pub fn new(issue_id: impl Into<IssueId>, workspace_path: impl Into<PathBuf>) -> Self {
        Self {
            issue_id: issue_id.into(),
            workspace_path: workspace_path.into(),
            work_type: WorkType::IssueImplementation,
            runtime: DEFAULT_RUNTIME.to_string(),
            phase: None,
            branch: None,
            prompt: None,
        }
    }

    pub fn with_work_type(mut self, work_type: WorkType) -> Self {
        self.work_type = work_type;
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
}

impl<M, N, C, L> Supervisor<M, N, C, L>
where
    M: MuxAdapter,
    N: NotifyAdapter,
    C: Clock,
    L: SpecialistLauncher,
{
    /// Spawn a new agent: validate, resolve the model, write the record at
    /// `starting`, create the session, flip to `running`.
    ///
    /// On session failure the record stays at `starting` so operators can
    /// inspect what was attempted.
    pub async fn spawn_agent(&self, request: SpawnRequest) -> Result<AgentRecord, SupervisorError> {
        let agent_id = AgentId::normalize(request.issue_id.as_str());
        let session = agent_id.session_name();

        if self.mux.session_exists(&session).await? {
            return Err(SupervisorError::SessionExists(agent_id.to_string()));
        }

        let choice = self.router.resolve(request.work_type);
        if choice.used_fallback {
            tracing::info!(
                agent_id = %agent_id,
                model = %choice.model,
                wanted = choice.original_model.as_deref().unwrap_or(""),
                "provider fallback applied"
            );
        }

        let mut record = AgentRecord::starting(
            agent_id.clone(),
            request.issue_id.clone(),
            request.workspace_path.clone(),
            request.runtime.clone(),
            choice.model.clone(),
            self.now(),
        );
        record.work_type = Some(request.work_type);
        record.phase = request.phase.clone();
        record.branch = request.branch.clone();
        self.registry.save(&record)?;

        let command = spawn_command(&request.runtime, &choice.model, request.prompt.as_deref());
        let env = self.session_env(&agent_id);
        self.mux
            .create_session(&session, &request.workspace_path, &command, &env)
            .await?;

        record.status = AgentStatus::Running;
        self.registry.save(&record)?;
        tracing::info!(
            agent_id = %agent_id,
            model = %record.model,
            workspace = %record.workspace_path.display(),
            "agent spawned"
        );
        Ok(record)
    }

    /// Stop an agent: kill the session, mark the record stopped.
    pub async fn stop_agent(&self, agent_id: &AgentId) -> Result<(), SupervisorError> {
        let mut record = self
            .registry
            .load(agent_id.as_str())?
            .ok_or_else(|| SupervisorError::RecordNotFound(agent_id.to_string()))?;

        self.mux.kill_session(&agent_id.session_name()).await?;
        record.status = AgentStatus::Stopped;
        self.registry.save(&record)?;
        tracing::info!(agent_id = %agent_id, "agent stopped");
        Ok(())
    }
}

/// Production specialist launcher: spawns warm sessions through the same
/// registry/router/mux path as issue agents.
#[derive(Clone)]
pub struct AgentSpawner<M: MuxAdapter, C: Clock> {
    layout: StateLayout,
    registry: AgentRegistry,
    router: Router,
    mux: M,
    clock: C,
    /// Parent directory for specialist workspaces
    workspaces_root: PathBuf,
}

impl<M: MuxAdapter, C: Clock> AgentSpawner<M, C> {
    pub fn new(layout: StateLayout, router: Router, mux: M, clock: C) -> Self {
        let workspaces_root = layout.root().join("workspaces");
        Self {
            registry: AgentRegistry::new(layout.clone()),
            layout,
            router,
            mux,
            clock,
            workspaces_root,
        }
    }

    pub fn with_workspaces_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspaces_root = root.into();
        self
    }

    fn work_type_for(name: &SpecialistName) -> WorkType {
        match name.as_str() {
            SpecialistName::REVIEW => WorkType::SpecialistReview,
            SpecialistName::TEST => WorkType::SpecialistTest,
            SpecialistName::MERGE => WorkType::SpecialistMerge,
            _ => WorkType::SpecialistPlan,
        }
    }

    async fn start_session(&self, name: &SpecialistName) -> Result<(), SupervisorError> {
        let agent_id = name.agent_id();
        let session = agent_id.session_name();
        let workspace = self.workspaces_root.join(name.as_str());
        std::fs::create_dir_all(&workspace).map_err(|source| pan_store::StoreError::Io {
            path: workspace.clone(),
            source,
        })?;

        let choice = self.router.resolve(Self::work_type_for(name));
        let mut record = AgentRecord::starting(
            agent_id.clone(),
            IssueId::new(name.as_str()),
            workspace.clone(),
            DEFAULT_RUNTIME,
            choice.model.clone(),
            self.clock.timestamp(),
        );
        record.work_type = Some(Self::work_type_for(name));
        self.registry.save(&record)?;

        let env = vec![
            ("PAN_AGENT_ID".to_string(), agent_id.to_string()),
            (
                "PAN_STATE_DIR".to_string(),
                self.layout.root().display().to_string(),
            ),
        ];
        self.mux
            .create_session(
                &session,
                &workspace,
                &spawn_command(DEFAULT_RUNTIME, &choice.model, None),
                &env,
            )
            .await?;

        record.status = AgentStatus::Running;
        self.registry.save(&record)?;
        Ok(())
    }
}

#[async_trait]
impl<M: MuxAdapter, C: Clock> SpecialistLauncher for AgentSpawner<M, C> {
    async fn start(&self, name: &SpecialistName) -> Result<(), LauncherError> {
        self.start_session(name)
            .await
            .map_err(|e| LauncherError::StartFailed {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }

    async fn wake(&self, name: &SpecialistName, task: &QueueItem) -> Result<(), LauncherError> {
        let session = name.agent_id().session_name();
        let message = format!(
            "New task from {}: issue {}. Check your queue for details.",
            task.source, task.payload.issue_id
        );
        let send = async {
            self.mux.send_text(&session, &message).await?;
            self.mux.send_enter(&session).await
        };
        send.await.map_err(|e| LauncherError::WakeFailed {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "spawn_tests.rs"]
mod tests;
