//! Recommendation candidate filtering.
//!
//! Recommendation narrows the candidate set; it never reorders it. Matching records keep the
//! resolved sort of the request.

use std::collections::BTreeSet;

use ahash::AHashMap;
use uuid::Uuid;

use crate::{predicate::Predicate, views::fields};

/// Request-scoped view of the caller's profile and history.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallerContext {
	/// `None` for anonymous callers.
	pub caller_id: Option<String>,
	pub skill_ids: BTreeSet<Uuid>,
	/// Categories of jobs the caller applied to.
	pub applied_category_ids: BTreeSet<Uuid>,
	/// Records the caller already acted on. Never shown in recommendation mode.
	pub excluded_record_ids: BTreeSet<Uuid>,
}
impl CallerContext {
	pub fn anonymous() -> Self {
		Self::default()
	}

	pub fn is_anonymous(&self) -> bool {
		self.caller_id.is_none()
	}
}

/// Skill to category mapping.
#[derive(Clone, Debug, Default)]
pub struct SkillCatalog {
	by_skill: AHashMap<Uuid, BTreeSet<Uuid>>,
}
impl SkillCatalog {
	pub fn insert(&mut self, skill_id: Uuid, category_id: Uuid) {
		self.by_skill.entry(skill_id).or_default().insert(category_id);
	}

	pub fn categories_implied_by(&self, skill_ids: &BTreeSet<Uuid>) -> BTreeSet<Uuid> {
		skill_ids
			.iter()
			.filter_map(|skill_id| self.by_skill.get(skill_id))
			.flat_map(|categories| categories.iter().copied())
			.collect()
	}
}
impl FromIterator<(Uuid, Uuid)> for SkillCatalog {
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (Uuid, Uuid)>,
	{
		let mut catalog = Self::default();

		for (skill_id, category_id) in iter {
			catalog.insert(skill_id, category_id);
		}

		catalog
	}
}

/// Everything the candidate builder needs, loaded once per request.
#[derive(Clone, Debug, Default)]
pub struct CallerProfile {
	pub context: CallerContext,
	pub catalog: SkillCatalog,
}

/// Predicate fragment layered under the base filter in recommendation mode.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CandidateFilter {
	/// `None` means no narrowing.
	pub include: Option<Predicate>,
	pub exclude_ids: BTreeSet<Uuid>,
}
impl CandidateFilter {
	pub fn is_narrowing(&self) -> bool {
		self.include.is_some()
	}

	/// Same exclusion, no narrowing.
	pub fn without_include(&self) -> Self {
		Self { include: None, exclude_ids: self.exclude_ids.clone() }
	}

	pub fn exclusion(&self) -> Option<Predicate> {
		if self.exclude_ids.is_empty() {
			return None;
		}

		Some(Predicate::negate(Predicate::is_in(fields::ID, self.exclude_ids.iter().copied())))
	}

	/// ANDs the include fragment and the exclusion onto `predicate`.
	pub fn apply(&self, predicate: Predicate) -> Predicate {
		let mut parts = vec![predicate];

		parts.extend(self.include.clone());
		parts.extend(self.exclusion());

		Predicate::and(parts)
	}
}

pub struct CandidateBuilder<'a> {
	catalog: &'a SkillCatalog,
}
impl<'a> CandidateBuilder<'a> {
	pub fn new(catalog: &'a SkillCatalog) -> Self {
		Self { catalog }
	}

	pub fn build(&self, ctx: &CallerContext) -> CandidateFilter {
		if ctx.is_anonymous() {
			return CandidateFilter::default();
		}

		let mut preferred = self.catalog.categories_implied_by(&ctx.skill_ids);

		preferred.extend(ctx.applied_category_ids.iter().copied());

		let mut arms = Vec::with_capacity(2);

		if !ctx.skill_ids.is_empty() {
			arms.push(Predicate::is_in(fields::SKILL_IDS, ctx.skill_ids.iter().copied()));
		}
		if !preferred.is_empty() {
			arms.push(Predicate::is_in(fields::CATEGORY_ID, preferred));
		}

		let include = if arms.is_empty() { None } else { Some(Predicate::or(arms)) };

		CandidateFilter { include, exclude_ids: ctx.excluded_record_ids.clone() }
	}
}
