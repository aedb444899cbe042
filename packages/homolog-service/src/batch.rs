use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};

use serde::{Deserialize, Serialize};
use tokio::{sync::mpsc, task::JoinSet};

use homolog_config::Batch;
use homolog_domain::policy::MatchMode;

use crate::{
	Error, HomologService, MatchEngine, Result,
	matching::{self, MatchedVehicle, ResponseShape},
};

const WORKER_FAILED_CODE: &str = "worker_failed";

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BatchMatchRequest {
	pub descriptions: Vec<String>,
	#[serde(default)]
	pub strict: bool,
	#[serde(default)]
	pub response: ResponseShape,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BatchMatchItem {
	pub index: usize,
	pub description: String,
	#[serde(flatten)]
	pub result: BatchItemResult,
}

/// Per-item result. `NoMatch` and `Error` stay distinct so callers can retry failures only.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchItemResult {
	Matched {
		catalog_id: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		description: Option<String>,
	},
	NoMatch,
	Error {
		code: String,
		message: String,
	},
}
impl BatchItemResult {
	pub fn is_error(&self) -> bool {
		matches!(self, Self::Error { .. })
	}

	fn worker_failed() -> Self {
		Self::Error {
			code: WORKER_FAILED_CODE.to_string(),
			message: "Batch worker stopped before finishing this item.".to_string(),
		}
	}
}
impl From<Result<Option<MatchedVehicle>>> for BatchItemResult {
	fn from(result: Result<Option<MatchedVehicle>>) -> Self {
		match result {
			Ok(Some(vehicle)) => Self::Matched {
				catalog_id: vehicle.catalog_id,
				description: vehicle.description,
			},
			Ok(None) => Self::NoMatch,
			Err(err) => Self::Error { code: err.code().to_string(), message: err.to_string() },
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchSettings {
	max_concurrency: usize,
	max_items: usize,
	timeout: Duration,
}
impl BatchSettings {
	pub fn new(batch: &Batch) -> Result<Self> {
		homolog_config::validate_batch(batch)?;

		Ok(Self {
			max_concurrency: batch.max_concurrency as usize,
			max_items: batch.max_items as usize,
			timeout: Duration::from_millis(batch.timeout_ms),
		})
	}

	pub fn max_concurrency(&self) -> usize {
		self.max_concurrency
	}

	pub fn max_items(&self) -> usize {
		self.max_items
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}
}

impl HomologService {
	/// Matches every description independently. The result has one item per input, in input
	/// order; a failed item never fails the batch.
	pub async fn match_batch(&self, req: BatchMatchRequest) -> Result<Vec<BatchMatchItem>> {
		if req.descriptions.is_empty() {
			return Err(Error::InvalidRequest {
				message: "descriptions must contain at least one item.".to_string(),
			});
		}
		if req.descriptions.len() > self.batch.max_items {
			return Err(Error::InvalidRequest {
				message: format!(
					"descriptions has {} items; the limit is {}.",
					req.descriptions.len(),
					self.batch.max_items
				),
			});
		}

		run_batch(
			&self.engine,
			self.batch,
			req.descriptions,
			MatchMode::from_strict(req.strict),
			req.response,
		)
		.await
	}
}

async fn run_batch(
	engine: &MatchEngine,
	settings: BatchSettings,
	descriptions: Vec<String>,
	mode: MatchMode,
	shape: ResponseShape,
) -> Result<Vec<BatchMatchItem>> {
	let total = descriptions.len();
	let jobs: Arc<[String]> = descriptions.into();
	let cursor = Arc::new(AtomicUsize::new(0));
	let (tx, mut rx) = mpsc::unbounded_channel::<(usize, BatchItemResult)>();
	let mut workers = JoinSet::new();

	for _ in 0..settings.max_concurrency.min(total) {
		let engine = engine.clone();
		let jobs = jobs.clone();
		let cursor = cursor.clone();
		let tx = tx.clone();

		workers.spawn(async move {
			loop {
				let index = cursor.fetch_add(1, Ordering::Relaxed);
				let Some(text) = jobs.get(index) else {
					break;
				};
				let result = matching::match_text(&engine, text, mode, shape).await;

				if tx.send((index, BatchItemResult::from(result))).is_err() {
					break;
				}
			}
		});
	}

	drop(tx);

	tracing::info!(
		items = total,
		workers = workers.len(),
		mode = mode.as_str(),
		"Batch started."
	);

	let collect = async {
		let mut slots: Vec<Option<BatchItemResult>> = vec![None; total];

		while let Some((index, result)) = rx.recv().await {
			if let Some(slot) = slots.get_mut(index) {
				*slot = Some(result);
			}
		}
		while let Some(joined) = workers.join_next().await {
			if let Err(err) = joined {
				tracing::error!(error = %err, "Batch worker failed.");
			}
		}

		slots
	};
	let finished = tokio::time::timeout(settings.timeout, collect).await;
	let slots = match finished {
		Ok(slots) => slots,
		Err(_) => {
			workers.shutdown().await;

			let timeout_ms = settings.timeout.as_millis() as u64;

			tracing::warn!(items = total, timeout_ms, "Batch timed out; in-flight items aborted.");

			return Err(Error::BatchTimedOut { timeout_ms });
		},
	};
	let items: Vec<BatchMatchItem> = jobs
		.iter()
		.zip(slots)
		.enumerate()
		.map(|(index, (description, slot))| BatchMatchItem {
			index,
			description: description.clone(),
			result: slot.unwrap_or_else(BatchItemResult::worker_failed),
		})
		.collect();
	let failed = items.iter().filter(|item| item.result.is_error()).count();

	tracing::info!(items = total, failed, "Batch finished.");

	Ok(items)
}
