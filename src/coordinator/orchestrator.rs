//! Coordinator: the per-query control loop
//!
//! Drives a query through cache check, planning, sequential step execution,
//! synthesis and persistence, recording every phase change in the
//! `QueryState` machine.

use crate::agents::{Agent, AgentRegistry, AnalysisAgent, MemoryAgent, ResearchAgent};
use crate::coordinator::{QueryEvent, QueryState};
use crate::errors::{AgentError, Result};
use crate::memory::{AgentStatus, Role};
use crate::planning::{KeywordPlanner, Planner};
use crate::telemetry::{TelemetryCollector, TelemetryEvent};
use crate::types::{AgentKind, AgentResult, PlanStep, Task};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{Instrument, Span};
use uuid::Uuid;

/// Fixed reply when any step faults
pub const APOLOGY: &str = "I'm sorry, an error occurred while processing your request.";

/// Prefix marking an answer served from saved knowledge
pub const CACHE_PREFIX: &str = "(From memory) ";

/// Source recorded on knowledge written back after a query
pub const SYNTHESIS_SOURCE: &str = "synthesis";

/// Reply when the plan ran but produced no content
pub const NO_ANSWER: &str = "No answer was produced.";

/// Coordinator configuration
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Cache hits must score strictly above this confidence
    pub cache_threshold: f64,

    /// Deadline for a single step dispatch
    pub step_timeout: Duration,

    /// Append per-step agent states after a successful query
    pub track_agent_state: bool,

    /// Write answers and conversation turns back to the store
    pub persist: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            cache_threshold: 0.85,
            step_timeout: Duration::from_secs(30),
            track_agent_state: true,
            persist: true,
        }
    }
}

/// What one successful step reported, kept for the agent-state log
#[derive(Debug, Clone)]
struct StepOutcome {
    agent_name: &'static str,
    task: String,
    confidence: f64,
}

pub struct Coordinator {
    state: QueryState,
    registry: AgentRegistry,
    memory: Arc<MemoryAgent>,
    planner: Box<dyn Planner>,
    config: CoordinatorConfig,
    telemetry: Option<TelemetryCollector>,
    /// Step results of the most recent query, keyed `<agent>_<task>_result`
    context: BTreeMap<String, AgentResult>,
    last_task_id: Option<Uuid>,
    span: Span,
}

impl Coordinator {
    /// Coordinator with only the memory agent registered
    pub fn new(memory: Arc<MemoryAgent>, config: CoordinatorConfig) -> Self {
        let mut registry = AgentRegistry::new();
        registry.register(memory.clone());

        Self {
            state: QueryState::Idle,
            registry,
            memory,
            planner: Box::new(KeywordPlanner::new()),
            config,
            telemetry: None,
            context: BTreeMap::new(),
            last_task_id: None,
            span: tracing::info_span!("coordinator"),
        }
    }

    /// Coordinator with the research, analysis and memory agents
    pub fn standard(memory: MemoryAgent, config: CoordinatorConfig) -> Self {
        let mut coordinator = Self::new(Arc::new(memory), config);
        coordinator.registry.register(Arc::new(ResearchAgent::new()));
        coordinator.registry.register(Arc::new(AnalysisAgent::new()));
        coordinator
    }

    /// Register an agent, replacing any agent of the same kind.
    ///
    /// The memory agent is fixed at construction because the cache check and
    /// write-back use it directly; registering another one is a `ConfigError`.
    pub fn with_agent(mut self, agent: Arc<dyn Agent>) -> Result<Self> {
        if agent.kind() == AgentKind::Memory {
            return Err(AgentError::ConfigError(format!(
                "cannot replace the memory agent with {}",
                agent.name()
            )));
        }
        if let Some(replaced) = self.registry.register(agent) {
            tracing::debug!(agent = replaced.name(), "agent replaced");
        }
        Ok(self)
    }

    pub fn with_planner(mut self, planner: Box<dyn Planner>) -> Self {
        self.planner = planner;
        self
    }

    pub fn with_telemetry(mut self, telemetry: TelemetryCollector) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn state(&self) -> QueryState {
        self.state
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn memory(&self) -> &Arc<MemoryAgent> {
        &self.memory
    }

    /// Step results recorded by the most recent query
    pub fn context(&self) -> &BTreeMap<String, AgentResult> {
        &self.context
    }

    /// Task id under which the last answer was persisted
    pub fn last_task_id(&self) -> Option<Uuid> {
        self.last_task_id
    }

    /// The plan `query` would run, without running it
    pub fn plan(&self, query: &str) -> Vec<PlanStep> {
        self.planner.create_plan(query)
    }

    /// Answer a query. Faults never escape; they produce the fixed apology.
    pub async fn handle_query(&mut self, query: &str) -> String {
        let span = tracing::info_span!(parent: &self.span, "query", query = %query);
        async move {
            let started = Instant::now();
            match self.process(query, None).await {
                Ok(answer) => {
                    self.finish(started);
                    answer
                }
                Err(e) => self.abort(e),
            }
        }
        .instrument(span)
        .await
    }

    /// Run a prepared plan for `query`, skipping the cache check and planner
    pub async fn execute_plan(&mut self, query: &str, plan: Vec<PlanStep>) -> String {
        let span = tracing::info_span!(parent: &self.span, "plan", query = %query, steps = plan.len());
        async move {
            let started = Instant::now();
            match self.process(query, Some(plan)).await {
                Ok(answer) => {
                    self.finish(started);
                    answer
                }
                Err(e) => self.abort(e),
            }
        }
        .instrument(span)
        .await
    }

    async fn process(&mut self, query: &str, supplied: Option<Vec<PlanStep>>) -> Result<String> {
        self.context.clear();
        let plan = match supplied {
            Some(plan) => {
                self.transition(QueryEvent::PlanSupplied)?;
                plan
            }
            None => {
                self.transition(QueryEvent::QueryReceived)?;
                if let Some(answer) = self.check_cache(query).await? {
                    return Ok(answer);
                }
                self.planner.create_plan(query)
            }
        };

        tracing::info!(steps = plan.len(), "plan created");
        self.emit(TelemetryEvent::PlanCreated {
            steps: plan.len(),
            timestamp: Instant::now(),
        });
        self.transition(QueryEvent::PlanReady { steps: plan.len() })?;

        let (answer, outcomes) = self.execute_steps(plan).await?;

        self.transition(QueryEvent::AnswerReady)?;
        let reply = answer.clone().unwrap_or_else(|| NO_ANSWER.to_string());
        self.persist(query, answer.as_deref(), &reply, &outcomes).await;
        self.transition(QueryEvent::Persisted)?;

        Ok(reply)
    }

    async fn check_cache(&mut self, query: &str) -> Result<Option<String>> {
        let search = Task::SearchKnowledge {
            query: query.to_string(),
        };
        let result = match tokio::time::timeout(self.config.step_timeout, self.memory.execute_task(&search)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("cache check timed out, treating as a miss");
                AgentResult::empty(0.0)
            }
        };

        match result.content {
            Some(content) if result.confidence > self.config.cache_threshold => {
                tracing::info!(confidence = result.confidence, "answered from memory");
                self.emit(TelemetryEvent::CacheHit {
                    confidence: result.confidence,
                    timestamp: Instant::now(),
                });
                self.transition(QueryEvent::CacheHit)?;
                Ok(Some(format!("{}{}", CACHE_PREFIX, content)))
            }
            _ => {
                self.emit(TelemetryEvent::CacheMiss {
                    timestamp: Instant::now(),
                });
                self.transition(QueryEvent::CacheMiss)?;
                Ok(None)
            }
        }
    }

    /// Run steps in order, threading each step's output into the next chained step
    async fn execute_steps(&mut self, plan: Vec<PlanStep>) -> Result<(Option<String>, Vec<StepOutcome>)> {
        let mut last_output: Option<String> = None;
        let mut outcomes = Vec::with_capacity(plan.len());

        for step in plan {
            let key = step.context_key();
            let (kind, task) = step.resolve(last_output.as_deref());
            let task_name = task.name().to_string();
            let agent_name = self.agent_name(kind);
            let started = Instant::now();

            tracing::debug!(agent = %kind, task = %task_name, "dispatching step");
            match self.registry.dispatch(kind, task, self.config.step_timeout).await {
                Ok(result) => {
                    let duration_ms = started.elapsed().as_millis() as u64;
                    tracing::info!(
                        agent = %kind,
                        task = %task_name,
                        confidence = result.confidence,
                        duration_ms,
                        "step completed"
                    );
                    self.emit(TelemetryEvent::StepCompleted {
                        agent: kind,
                        task: task_name.clone(),
                        duration_ms,
                        confidence: result.confidence,
                        timestamp: Instant::now(),
                    });

                    outcomes.push(StepOutcome {
                        agent_name,
                        task: task_name,
                        confidence: result.confidence,
                    });
                    last_output = result.content.clone();
                    self.context.insert(key, result);
                    self.transition(QueryEvent::StepSucceeded)?;
                }
                Err(e) => {
                    self.emit(TelemetryEvent::StepFailed {
                        agent: kind,
                        task: task_name,
                        reason: e.to_string(),
                        timestamp: Instant::now(),
                    });
                    self.transition(QueryEvent::StepFailed)?;
                    return Err(e);
                }
            }
        }

        Ok((last_output, outcomes))
    }

    /// Write the answer back. Every failure here is logged and swallowed.
    async fn persist(&mut self, query: &str, answer: Option<&str>, reply: &str, outcomes: &[StepOutcome]) {
        if !self.config.persist {
            tracing::debug!("persistence disabled, skipping write-back");
            return;
        }

        let task_id = Uuid::new_v4();
        self.last_task_id = Some(task_id);

        match answer {
            Some(content) => {
                let saved = self
                    .memory
                    .execute_task(&Task::SaveKnowledge {
                        content: content.to_string(),
                        topic: query.to_string(),
                        source: SYNTHESIS_SOURCE.to_string(),
                        task_id,
                    })
                    .await;
                log_soft_failure("save_knowledge", &saved);
            }
            None => tracing::debug!("no answer content, knowledge not saved"),
        }

        log_soft_failure("save_conversation", &self.memory.save_conversation(Role::User, query).await);
        log_soft_failure("save_conversation", &self.memory.save_conversation(Role::System, reply).await);

        if !self.config.track_agent_state {
            return;
        }
        for outcome in outcomes {
            let details = format!("{} (confidence {:.2})", outcome.task, outcome.confidence);
            if let Err(e) = self
                .memory
                .store()
                .update_agent_state(task_id, outcome.agent_name, AgentStatus::Completed, &details)
                .await
            {
                tracing::warn!(agent = outcome.agent_name, error = %e, "failed to record agent state");
            }
        }
    }

    fn agent_name(&self, kind: AgentKind) -> &'static str {
        self.registry.get(kind).map(|a| a.name()).unwrap_or_else(|| kind.as_str())
    }

    fn transition(&mut self, event: QueryEvent) -> Result<()> {
        let next = self.state.transition(event)?;
        tracing::trace!(from = ?self.state, to = ?next, "state transition");
        self.state = next;
        Ok(())
    }

    fn finish(&mut self, started: Instant) {
        self.emit(TelemetryEvent::QueryCompleted {
            duration_ms: started.elapsed().as_millis() as u64,
            timestamp: Instant::now(),
        });
    }

    fn abort(&mut self, error: AgentError) -> String {
        tracing::error!(error = %error, "query aborted");
        if let Ok(next) = self.state.transition(QueryEvent::Fault) {
            self.state = next;
        }
        self.emit(TelemetryEvent::QueryAborted {
            timestamp: Instant::now(),
        });
        APOLOGY.to_string()
    }

    fn emit(&self, event: TelemetryEvent) {
        if let Some(telemetry) = &self.telemetry {
            telemetry.record(event);
        }
    }
}

fn log_soft_failure(task: &str, result: &AgentResult) {
    if result.confidence <= 0.0 {
        tracing::warn!(task, reply = ?result.content, "write-back failed");
    }
}
