use ahash::AHashSet;

use crate::value::ListRecord;

/// Puts `pinned` first, then every `related` record whose id has not been seen yet.
///
/// On an id collision the pinned record wins. The relative order of `related` is kept.
pub fn merge<R>(pinned: Option<R>, related: Vec<R>) -> Vec<R>
where
	R: ListRecord,
{
	let capacity = related.len() + usize::from(pinned.is_some());
	let mut seen = AHashSet::with_capacity(capacity);
	let mut out = Vec::with_capacity(capacity);

	for record in pinned.into_iter().chain(related) {
		if seen.insert(record.record_id()) {
			out.push(record);
		}
	}

	out
}
