//! Faculty page aggregation over the faculty API.

use sitepages_api::{ApiReader, RequestContext};
use sitepages_shared::{FacultyPage, Result};
use tracing::{error, info, instrument};

use crate::classify::partition_teaching;

/// Fetch the faculty listing and split it into teaching and non-teaching.
#[instrument(skip_all)]
pub async fn fetch_faculty_page(reader: &ApiReader, ctx: &RequestContext) -> Result<FacultyPage> {
    let faculty = reader.fetch_faculty(ctx).await?;
    let page = partition_teaching(faculty);
    info!(
        teaching = page.teaching.len(),
        non_teaching = page.non_teaching.len(),
        "faculty partitioned"
    );
    Ok(page)
}

/// Like [`fetch_faculty_page`], but never fails: any error is logged and
/// [`FacultyPage::EMPTY`] is returned.
pub async fn get_faculty_page(reader: &ApiReader, ctx: &RequestContext) -> FacultyPage {
    match fetch_faculty_page(reader, ctx).await {
        Ok(page) => page,
        Err(e) => {
            error!(error = %e, "error fetching faculty");
            FacultyPage::EMPTY
        }
    }
}
