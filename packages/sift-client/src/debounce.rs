//! Quiet-period debouncing for search-as-you-type.

use tokio::time::{Duration, Instant};

#[derive(Clone, Debug)]
struct Pending {
	text: String,
	due: Instant,
}

/// Holds the latest search text until no new text has arrived for `delay`.
#[derive(Clone, Debug)]
pub struct SearchDebouncer {
	delay: Duration,
	pending: Option<Pending>,
}
impl SearchDebouncer {
	pub fn new(delay: Duration) -> Self {
		Self { delay, pending: None }
	}

	pub fn delay(&self) -> Duration {
		self.delay
	}

	/// Replaces any pending text and restarts the quiet period at `now`.
	pub fn push(&mut self, text: impl Into<String>, now: Instant) {
		self.pending = Some(Pending { text: text.into(), due: now + self.delay });
	}

	pub fn deadline(&self) -> Option<Instant> {
		self.pending.as_ref().map(|pending| pending.due)
	}

	/// Takes the pending text once its quiet period has elapsed.
	pub fn ready(&mut self, now: Instant) -> Option<String> {
		if self.deadline()? > now {
			return None;
		}

		self.pending.take().map(|pending| pending.text)
	}

	pub fn cancel(&mut self) {
		self.pending = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_the_last_text_fires_after_the_quiet_period() {
		let start = Instant::now();
		let delay = Duration::from_millis(300);
		let mut debouncer = SearchDebouncer::new(delay);

		assert_eq!(debouncer.ready(start), None);

		debouncer.push("ru", start);
		debouncer.push("rust", start + Duration::from_millis(200));

		assert_eq!(debouncer.deadline(), Some(start + Duration::from_millis(500)));
		assert_eq!(debouncer.ready(start + Duration::from_millis(400)), None);
		assert_eq!(debouncer.ready(start + Duration::from_millis(500)).as_deref(), Some("rust"));
		assert_eq!(debouncer.ready(start + Duration::from_millis(900)), None);
		assert_eq!(debouncer.deadline(), None);
	}

	#[test]
	fn cancel_drops_pending_text() {
		let start = Instant::now();
		let mut debouncer = SearchDebouncer::new(Duration::from_millis(10));

		debouncer.push("go", start);
		debouncer.cancel();

		assert_eq!(debouncer.ready(start + Duration::from_secs(1)), None);
	}
}
