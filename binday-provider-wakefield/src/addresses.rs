//! Postcode search on the "Where I live" landing page.

use tracing::{debug, info};

use binday_core::{
    document::{Document, Key},
    model::{AddressResult, PostcodeQuery},
    ports::ScrapeError,
};

use crate::{PICK_ADDRESS_MARKER, WHERE_I_LIVE_MARKER, WakefieldConfig, expect_title, required};

const SEARCH_INPUT: &str = "#where-i-live";
const RESULT_GROUP: &str = "div.u-mb-6";
const GROUP_LIST: &str = "ul";
const GROUP_ITEM: &str = "li";
const ADDRESS_LINK: &str = "a";

/// List the properties registered at `postcode`, in page order.
///
/// Each result takes the first entry of its group; its link text is the address and its
/// `href` is resolved against the configured base URL.
///
/// # Errors
///
/// Returns [`ScrapeError::UnexpectedPage`] when the landing or result page has an unexpected
/// title, and [`ScrapeError::MissingElement`] when a result group lacks its link. A postcode
/// without properties is not an error and yields an empty list.
pub async fn lookup(
    document: &mut dyn Document,
    config: &WakefieldConfig,
    postcode: &PostcodeQuery,
) -> Result<Vec<AddressResult>, ScrapeError> {
    document.load(&config.landing_url()?).await?;
    expect_title(document, WHERE_I_LIVE_MARKER).await?;

    let search = required(document.find_one(None, SEARCH_INPUT).await)?;
    document.clear(search).await?;
    document.type_into(search, postcode.as_str()).await?;
    document.submit_keystroke(search, Key::Enter).await?;
    expect_title(document, PICK_ADDRESS_MARKER).await?;

    let groups = document.find_all(None, RESULT_GROUP).await?;
    if groups.is_empty() {
        info!(%postcode, "no properties registered at postcode");
        return Ok(Vec::new());
    }

    let mut addresses = Vec::with_capacity(groups.len());
    for group in groups {
        let list = required(document.find_one(Some(group), GROUP_LIST).await)?;
        let item = required(document.find_one(Some(list), GROUP_ITEM).await)?;
        let link = required(document.find_one(Some(item), ADDRESS_LINK).await)?;

        let address = document.text_of(link).await?;
        let href = document
            .attribute_of(link, "href")
            .await?
            .ok_or_else(|| ScrapeError::MissingElement(format!("link target of {address:?}")))?;
        let url = config.base_url.join(href.trim())?;

        debug!(%address, %url, "found property");
        addresses.push(AddressResult { address, url });
    }

    Ok(addresses)
}
