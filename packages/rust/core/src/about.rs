//! About page aggregation: about text, directors and leadership from the
//! document store.

use sitepages_shared::{AboutPage, AboutRecord, Director, Leader, Result, SiteError};
use sitepages_storage::{DocumentStore, Filter, SortSpec};
use tracing::{error, info, instrument};

use crate::normalize::{decode_about, decode_records, normalize_about};

/// Collection holding per-section page text.
pub const CONTENT_COLLECTION: &str = "content";
/// Collection of board directors.
pub const DIRECTORS_COLLECTION: &str = "directors";
/// Collection of leadership records.
pub const LEADERSHIP_COLLECTION: &str = "leadership";
/// Section key of the about text inside [`CONTENT_COLLECTION`].
pub const ABOUT_SECTION: &str = "about";

/// Read one section's text record.
pub async fn read_section<S: DocumentStore>(
    store: &S,
    section: &str,
) -> Result<Option<AboutRecord>> {
    if section.is_empty() {
        return Err(SiteError::validation("section must not be empty"));
    }
    let doc = store
        .find_one(CONTENT_COLLECTION, &Filter::where_eq("section", section))
        .await?;
    decode_about(doc)
}

/// Directors in ascending display order.
pub async fn read_directors<S: DocumentStore>(store: &S) -> Result<Vec<Director>> {
    let order = SortSpec::ascending("order");
    let docs = store
        .find(DIRECTORS_COLLECTION, &Filter::all(), Some(&order))
        .await?;
    decode_records(docs, "director")
}

/// All leadership records in store order.
pub async fn read_leadership<S: DocumentStore>(store: &S) -> Result<Vec<Leader>> {
    let docs = store
        .find(LEADERSHIP_COLLECTION, &Filter::all(), None)
        .await?;
    decode_records(docs, "leader")
}

/// Read and normalize everything the About page needs. The three reads run
/// concurrently; the first failure aborts the others.
#[instrument(skip_all)]
pub async fn fetch_about_page<S: DocumentStore>(store: &S) -> Result<AboutPage> {
    let (about, directors, leadership) = tokio::try_join!(
        read_section(store, ABOUT_SECTION),
        read_directors(store),
        read_leadership(store),
    )?;

    info!(
        about_found = about.is_some(),
        directors = directors.len(),
        leadership = leadership.len(),
        "about content loaded"
    );

    Ok(AboutPage {
        about: normalize_about(about),
        directors,
        leadership,
    })
}

/// Like [`fetch_about_page`], but never fails: any error is logged and
/// [`AboutPage::EMPTY`] is returned.
pub async fn get_about_page<S: DocumentStore>(store: &S) -> AboutPage {
    match fetch_about_page(store).await {
        Ok(page) => page,
        Err(e) => {
            error!(error = %e, "error fetching about content");
            AboutPage::EMPTY
        }
    }
}
