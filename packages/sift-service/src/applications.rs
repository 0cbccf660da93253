use sift_domain::{ListParams, ListResponse, views};

use crate::{ApplicationItem, Error, Result, SiftService};

impl SiftService {
	/// The caller's own applications that were not withdrawn.
	pub async fn list_applications(
		&self,
		caller_id: Option<&str>,
		params: &ListParams,
	) -> Result<ListResponse<ApplicationItem>> {
		let Some(caller_id) = caller_id.map(str::trim).filter(|caller_id| !caller_id.is_empty())
		else {
			return Err(Error::CallerRequired {
				message: "Listing applications requires a caller.".to_string(),
			});
		};
		let predicate =
			Self::filtered(&views::APPLICATIONS, views::applications_base(caller_id), params);

		self.run_list(self.stores.applications.as_ref(), &views::APPLICATIONS, predicate, params)
			.await
	}
}
