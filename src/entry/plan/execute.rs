use std::sync::Arc;

use tracing::info;

use crate::content::{Content, FileContent, GrowableContent};
use crate::dispatcher::Dispatcher;
use crate::error::AppResult;
use crate::http::{Emitter, GenericEmitter, ReplayEmitter, UrlQueue, build_client};
use crate::metrics::RunReport;

use super::types::{BodySpec, GrowthSpec, LoadPlan, RunPlan, TestPlan};

pub(crate) async fn execute_plan(plan: RunPlan) -> AppResult<RunReport> {
    let dispatcher = build_dispatcher(plan)?;
    Ok(dispatcher.run().await)
}

/// Builds the worker pool for a plan. Payload content and the URL queue are
/// shared by every worker; each worker gets its own HTTP client.
///
/// # Errors
///
/// Returns an error when a client or the body file cannot be set up.
pub(crate) fn build_dispatcher(plan: RunPlan) -> AppResult<Dispatcher> {
    match plan {
        RunPlan::Test(plan) => build_test_dispatcher(plan),
        RunPlan::Load(plan) => build_load_dispatcher(plan),
    }
}

fn generated(spec: GrowthSpec, max_payload: usize) -> Arc<dyn GrowableContent> {
    Arc::new(Content::with_limit(
        spec.size,
        spec.increment,
        spec.multiplier,
        max_payload,
    ))
}

fn build_test_dispatcher(plan: TestPlan) -> AppResult<Dispatcher> {
    let header = plan.header.map(|spec| generated(spec, plan.max_payload));
    let body: Option<Arc<dyn GrowableContent>> = match plan.body.as_ref() {
        Some(BodySpec::Generated(spec)) => Some(generated(*spec, plan.max_payload)),
        Some(BodySpec::File(path)) => Some(Arc::new(FileContent::from_path(path)?)),
        None => None,
    };

    if let Some(header) = header.as_ref() {
        info!("Header payload starts at {} bytes", header.current_size());
    }
    if let Some(body) = body.as_ref() {
        info!("Body payload starts at {} bytes", body.current_size());
    }

    let mut emitters = Vec::with_capacity(plan.workers);
    for _ in 0..plan.workers {
        let client = build_client(plan.request_timeout, plan.proxy.as_ref())?;
        let mut emitter =
            GenericEmitter::new(plan.destination.clone(), plan.method, plan.limit, client);
        if let Some(header) = header.as_ref() {
            emitter = emitter.with_header(Arc::clone(header));
        }
        if let Some(body) = body.as_ref() {
            emitter = emitter.with_body(Arc::clone(body));
        }
        emitters.push(Emitter::Generic(emitter));
    }

    info!(
        "Testing {} {} with {} workers",
        plan.method.as_str(),
        plan.destination,
        plan.workers
    );
    Ok(Dispatcher::new(emitters, plan.timeout))
}

fn build_load_dispatcher(plan: LoadPlan) -> AppResult<Dispatcher> {
    let queue = Arc::new(UrlQueue::new(plan.urls));
    let mut emitters = Vec::with_capacity(plan.workers);
    for _ in 0..plan.workers {
        let client = build_client(plan.request_timeout, plan.proxy.as_ref())?;
        emitters.push(Emitter::Replay(ReplayEmitter::new(Arc::clone(&queue), client)));
    }

    info!(
        "Replaying {} URLs with {} workers",
        queue.len(),
        plan.workers
    );
    Ok(Dispatcher::new(emitters, plan.timeout))
}
