use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use waypost_router::{BoxError, GuardSpec, ResolverSpec};

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::TRACE)
		.try_init();
}

#[derive(Debug, Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
	pub fn bump(&self) {
		self.0.fetch_add(1, Ordering::SeqCst);
	}

	pub fn get(&self) -> usize {
		self.0.load(Ordering::SeqCst)
	}
}

/// Ordered record of settled evaluations.
#[derive(Debug, Clone, Default)]
pub struct Log(Arc<Mutex<Vec<&'static str>>>);

impl Log {
	pub fn push(&self, entry: &'static str) {
		self.0.lock().push(entry);
	}

	pub fn entries(&self) -> Vec<&'static str> {
		self.0.lock().clone()
	}
}

pub fn delayed_guard(log: &Log, name: &'static str, delay: Duration, pass: bool) -> GuardSpec {
	let log = log.clone();
	GuardSpec::from_async(move || {
		let log = log.clone();
		async move {
			tokio::time::sleep(delay).await;
			log.push(name);
			pass
		}
	})
	.labeled(name)
}

pub fn counted_guard(counter: &Counter, pass: bool) -> GuardSpec {
	let counter = counter.clone();
	GuardSpec::from_fn(move || {
		counter.bump();
		pass
	})
}

pub fn delayed_value<T>(log: &Log, name: &'static str, delay: Duration, value: T) -> ResolverSpec
where
	T: Clone + Send + Sync + 'static,
{
	let log = log.clone();
	ResolverSpec::from_async(move || {
		let log = log.clone();
		let value = value.clone();
		async move {
			tokio::time::sleep(delay).await;
			log.push(name);
			Ok::<_, BoxError>(value)
		}
	})
}

pub fn counted_value<T>(counter: &Counter, value: T) -> ResolverSpec
where
	T: Clone + Send + Sync + 'static,
{
	let counter = counter.clone();
	ResolverSpec::from_fn(move || {
		counter.bump();
		Ok::<_, BoxError>(value.clone())
	})
}

pub fn failing_resolver(message: &'static str) -> ResolverSpec {
	ResolverSpec::from_async(move || async move {
		tokio::task::yield_now().await;
		Err::<(), BoxError>(message.into())
	})
}
